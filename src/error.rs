//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Pricing(e) => {
                tracing::info!("Rejected pricing request: {}", e);
                let (status, error_type, errors) = match e {
                    PricingError::InvalidOccupancy { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "invalid_occupancy", None)
                    }
                    PricingError::InvalidInput { errors, .. } => {
                        (StatusCode::BAD_REQUEST, "invalid_input", Some(errors))
                    }
                };
                (
                    status,
                    PricingErrorResponse {
                        error_type: error_type.to_string(),
                        message: e.to_string(),
                        details: errors.map(|errors| serde_json::json!({ "errors": errors })),
                    },
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, internal("Database error"))
            }
            AppError::Xml(e) => {
                tracing::error!("XML error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, internal("Failed to render document"))
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, internal("Internal error"))
            }
        };

        (status, Json(body)).into_response()
    }
}

fn internal(message: &str) -> PricingErrorResponse {
    PricingErrorResponse {
        error_type: "internal".to_string(),
        message: message.to_string(),
        details: None,
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
