use actix_web::{web, HttpResponse};

use crate::{
    consts::consts::PersonId,
    database::directory::{Directory, DirectoryError},
};

use super::wire::{ErrorResponse, PersonBody, PersonResponse};

pub async fn health(directory: web::Data<Directory>) -> HttpResponse {
    HttpResponse::Ok().json(directory.health())
}

pub async fn list_persons(directory: web::Data<Directory>) -> Result<HttpResponse, DirectoryError> {
    let persons: Vec<PersonResponse> = directory
        .list()
        .await?
        .into_iter()
        .map(PersonResponse::from_person)
        .collect();

    Ok(HttpResponse::Ok().json(persons))
}

pub async fn get_person(
    directory: web::Data<Directory>,
    id: web::Path<String>,
) -> Result<HttpResponse, DirectoryError> {
    let id: PersonId = id.parse()?;

    let person = directory.get(id).await?;

    Ok(HttpResponse::Ok().json(PersonResponse::from_person(person)))
}

pub async fn create_person(
    directory: web::Data<Directory>,
    body: web::Json<PersonBody>,
) -> Result<HttpResponse, DirectoryError> {
    let person = directory
        .create(body.into_inner().to_person_data())
        .await?;

    Ok(HttpResponse::Created().json(PersonResponse::from_person(person)))
}

pub async fn update_person(
    directory: web::Data<Directory>,
    id: web::Path<String>,
    body: web::Json<PersonBody>,
) -> Result<HttpResponse, DirectoryError> {
    let id: PersonId = id.parse()?;

    let person = directory
        .update(id, body.into_inner().to_person_data())
        .await?;

    Ok(HttpResponse::Ok().json(PersonResponse::from_person(person)))
}

pub async fn delete_person(
    directory: web::Data<Directory>,
    id: web::Path<String>,
) -> Result<HttpResponse, DirectoryError> {
    let id: PersonId = id.parse()?;

    directory.delete(id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Known path, unsupported method
pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(ErrorResponse {
        error: "Method not allowed".to_string(),
    })
}

/// Fallback for paths no resource matches
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "Not found".to_string(),
    })
}
