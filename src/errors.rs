use actix_web::HttpResponse;
use thiserror::Error;

use crate::application::checkout::CheckoutError;
use crate::domain::errors::{ApiError, DomainError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        if e.is_not_found() {
            return AppError::NotFound;
        }
        let unauthorized = e.is_unauthorized();
        match e {
            ApiError::Status { message, .. } if unauthorized => AppError::Unauthorized(message),
            ApiError::Status { message, .. } => AppError::Upstream(message),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::EmptyCart => AppError::BadRequest(e.to_string()),
            CheckoutError::NotAuthenticated => AppError::Unauthorized(e.to_string()),
            CheckoutError::Api(api) => api.into(),
        }
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(e: actix_web::error::BlockingError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = |message: String| serde_json::json!({ "error": message });
        match self {
            AppError::BadRequest(_) => HttpResponse::BadRequest().json(body(self.to_string())),
            AppError::Unauthorized(_) => HttpResponse::Unauthorized().json(body(self.to_string())),
            AppError::NotFound => HttpResponse::NotFound().json(body(self.to_string())),
            AppError::Upstream(_) => HttpResponse::BadGateway().json(body(self.to_string())),
            AppError::Internal(msg) => {
                log::error!("Internal error: {}", msg);
                HttpResponse::InternalServerError().json(body("Internal server error".to_string()))
            }
        }
    }
}
