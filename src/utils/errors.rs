//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: String, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message,
            details: None,
            code: Some(code.to_string()),
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl AppError {
    /// Código HTTP asociado a cada variante
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_)
            | AppError::Storage(_)
            | AppError::Serialization(_)
            | AppError::Io(_)
            | AppError::Internal(_)
            | AppError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::Database(e) => {
                error!("❌ Database error: {}", e);
                ErrorResponse::new(
                    "Database Error",
                    "An error occurred while accessing the database".to_string(),
                    "DB_ERROR",
                )
                .with_details(json!({ "sql_error": e.to_string() }))
            }

            AppError::Storage(msg) => {
                error!("❌ Storage error: {}", msg);
                ErrorResponse::new(
                    "Storage Error",
                    "An error occurred while accessing the store".to_string(),
                    "STORAGE_ERROR",
                )
                .with_details(json!({ "storage_error": msg }))
            }

            AppError::Serialization(e) => {
                error!("❌ Serialization error: {}", e);
                ErrorResponse::new(
                    "Serialization Error",
                    "A stored record could not be decoded".to_string(),
                    "SERIALIZATION_ERROR",
                )
                .with_details(json!({ "serde_error": e.to_string() }))
            }

            AppError::Io(e) => {
                error!("❌ I/O error: {}", e);
                ErrorResponse::new(
                    "I/O Error",
                    "An unexpected I/O error occurred".to_string(),
                    "IO_ERROR",
                )
            }

            AppError::Validation(e) => {
                warn!("⚠️ Validation error: {}", e);
                ErrorResponse::new(
                    "Validation Error",
                    "The provided data is invalid".to_string(),
                    "VALIDATION_ERROR",
                )
                .with_details(json!(e))
            }

            AppError::Unauthorized(msg) => {
                warn!("🔒 Unauthorized access: {}", msg);
                ErrorResponse::new("Unauthorized", msg, "UNAUTHORIZED")
            }

            AppError::Forbidden(msg) => {
                warn!("🔒 Forbidden access: {}", msg);
                ErrorResponse::new("Forbidden", msg, "FORBIDDEN")
            }

            AppError::NotFound(msg) => ErrorResponse::new("Not Found", msg, "NOT_FOUND"),

            AppError::Conflict(msg) => ErrorResponse::new("Conflict", msg, "CONFLICT"),

            AppError::BadRequest(msg) => ErrorResponse::new("Bad Request", msg, "BAD_REQUEST"),

            AppError::Internal(msg) => {
                error!("❌ Internal error: {}", msg);
                ErrorResponse::new(
                    "Internal Server Error",
                    "An unexpected error occurred".to_string(),
                    "INTERNAL_ERROR",
                )
                .with_details(json!({ "internal_error": msg }))
            }

            AppError::Jwt(msg) => {
                warn!("🔒 JWT error: {}", msg);
                ErrorResponse::new("Unauthorized", "Unauthorized".to_string(), "JWT_ERROR")
            }

            AppError::Hash(msg) => {
                error!("❌ Hash error: {}", msg);
                ErrorResponse::new(
                    "Hash Error",
                    "An error occurred while processing credentials".to_string(),
                    "HASH_ERROR",
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(message: &str) -> AppError {
    AppError::Conflict(message.to_string())
}

/// Función helper para crear errores de acceso prohibido
pub fn forbidden_error(message: &str) -> AppError {
    AppError::Forbidden(message.to_string())
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

/// Función helper para crear errores internos
pub fn internal_error(message: &str) -> AppError {
    AppError::Internal(message.to_string())
}
