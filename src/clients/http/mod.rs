use std::io;

use actix_cors::Cors;
use actix_web::{
    http::header,
    middleware::{self, Condition},
    web::{self, Data},
    App, HttpServer,
};

use crate::database::directory::{Directory, DirectoryError};

pub mod error;
pub mod handlers;
pub mod wire;

/// Where and how the HTTP server listens
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub address: String,
    pub port: u16,
    pub workers: usize,
    pub log_http: bool,
}

/// Body decoding does not insist on a content type, any body that fails to decode is reported
/// the same way as other invalid input
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req| {
            log::debug!("Rejected request body: {}", err);
            DirectoryError::InvalidArgument("Invalid request body".to_string()).into()
        })
}

/// Registers every directory route, the directory itself must be provided as app data.
/// A known path hit with another method answers 405, an unknown path 404, both with a JSON body
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::resource(["/", "/api/health"])
                .route(web::get().to(handlers::health))
                .default_service(web::to(handlers::method_not_allowed)),
        )
        .service(
            web::resource("/api/persons")
                .route(web::get().to(handlers::list_persons))
                .route(web::post().to(handlers::create_person))
                .default_service(web::to(handlers::method_not_allowed)),
        )
        .service(
            web::resource("/api/persons/{id}")
                .route(web::get().to(handlers::get_person))
                .route(web::put().to(handlers::update_person))
                .route(web::delete().to(handlers::delete_person))
                .default_service(web::to(handlers::method_not_allowed)),
        )
        .default_service(web::to(handlers::not_found));
}

pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_header(header::CONTENT_TYPE)
}

pub async fn run(directory: Directory, options: HttpOptions) -> io::Result<()> {
    log::info!(
        "Meibo API Server starting on {}:{} [storage: {}]",
        options.address,
        options.port,
        directory.backend_name()
    );

    let directory = Data::new(directory);
    let log_http = options.log_http;

    HttpServer::new(move || {
        App::new()
            .app_data(directory.clone())
            .configure(configure)
            .wrap(cors())
            .wrap(Condition::new(log_http, middleware::Logger::default()))
    })
    .workers(options.workers)
    .bind((options.address, options.port))?
    .run()
    .await
}
