use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::database::directory::DirectoryError;

use super::wire::ErrorResponse;

impl DirectoryError {
    /// Message safe to hand to clients, storage causes stay in the log
    pub fn public_message(&self) -> String {
        match self {
            DirectoryError::InvalidArgument(message) => message.clone(),
            DirectoryError::NotFound(_) => "Person not found".to_string(),
            DirectoryError::StorageUnavailable { action, .. } => format!("Failed to {}", action),
        }
    }
}

impl ResponseError for DirectoryError {
    fn status_code(&self) -> StatusCode {
        match self {
            DirectoryError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            DirectoryError::NotFound(_) => StatusCode::NOT_FOUND,
            DirectoryError::StorageUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.public_message(),
        })
    }
}
