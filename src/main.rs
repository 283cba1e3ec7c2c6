use anyhow::Context;
use clap::Parser;
use meibo::{
    clients::http::{self, HttpOptions},
    database::{directory::Directory, options::DatabaseOptions},
    persistence::storage::StorageEngine,
};

/// 📇 Meibo API Server, a JSON directory of people backed by postgres
#[derive(Parser, Debug)]
struct Cli {
    /// Database host, either `host` or `host:port`
    #[clap(long, env = "DB_HOST")]
    db_host: Option<String>,

    #[clap(long, env = "DB_USER")]
    db_user: Option<String>,

    #[clap(long, env = "DB_PASSWORD", hide_env_values = true)]
    db_password: Option<String>,

    #[clap(long, env = "DB_NAME")]
    db_name: Option<String>,

    /// Keeps people in process memory instead of postgres, nothing survives a restart
    #[clap(long)]
    in_memory: bool,

    /// Port the http server will run on
    #[clap(short, long, env = "PORT", default_value = "80")]
    port: u16,

    /// Address the http server will run on
    #[clap(short, long, env = "ADDRESS", default_value = "0.0.0.0")]
    address: String,

    /// Logs every http request
    #[clap(long)]
    log_http: bool,

    #[clap(long, env = "HTTP_WORKERS", default_value_t = 2)]
    http_workers: usize,
}

impl Cli {
    fn storage_engine(&self) -> StorageEngine {
        if self.in_memory {
            return StorageEngine::Memory;
        }

        StorageEngine::Postgres(
            DatabaseOptions::default()
                .set_host(self.db_host.clone())
                .set_user(self.db_user.clone())
                .set_password(self.db_password.clone())
                .set_database_name(self.db_name.clone()),
        )
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Cli::parse();

    let storage = args
        .storage_engine()
        .connect()
        .await
        .context("Failed to connect to database")?;

    log::info!("Connected to {} storage successfully", storage.backend_name());

    storage
        .init()
        .await
        .context("Failed to initialize database")?;

    let directory = Directory::new(storage);

    let options = HttpOptions {
        address: args.address,
        port: args.port,
        workers: args.http_workers,
        log_http: args.log_http,
    };

    http::run(directory, options)
        .await
        .context("HTTP server stopped with an error")
}
