use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use argus_core::error::CoreError;
use argus_session::EngineError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`EngineError`] for session
/// engine failures, and adds HTTP-specific variants. Implements
/// [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `argus_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A session engine error that is not a plain domain error.
    #[error(transparent)]
    Engine(EngineError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<EngineError> for AppError {
    /// Flatten the engine's `Core` wrapper so not-found, validation and
    /// conflict errors map to their usual status codes instead of being
    /// buried under an engine variant.
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Core(core) => AppError::Core(core),
            other => AppError::Engine(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Engine errors ---
            AppError::Engine(engine) => classify_engine_error(engine),

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a session engine error into an HTTP status, error code, and
/// message.
///
/// - `DeviceUnavailable` maps to 503: the camera is down, retrying later
///   is reasonable.
/// - `DeviceBusy` maps to 409: another live session owns the camera.
/// - Everything else is an engine internal (capture faults abort the
///   session out-of-band; the pipeline guard and store failures are not
///   the caller's fault) and maps to 500 with a sanitized message.
fn classify_engine_error(err: &EngineError) -> (StatusCode, &'static str, String) {
    match err {
        EngineError::DeviceUnavailable { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            "DEVICE_UNAVAILABLE",
            err.to_string(),
        ),
        EngineError::DeviceBusy { .. } => (StatusCode::CONFLICT, "DEVICE_BUSY", err.to_string()),
        other => {
            tracing::error!(error = %other, "Session engine error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_core_errors_flatten_to_core() {
        let err: AppError = EngineError::Core(CoreError::Conflict("already terminal".into())).into();
        assert!(matches!(err, AppError::Core(CoreError::Conflict(_))));
    }

    #[test]
    fn device_unavailable_maps_to_503() {
        let engine = EngineError::DeviceUnavailable {
            source_id: "http://cam-7/snapshot".into(),
            reason: "connection refused".into(),
        };
        let (status, code, message) = classify_engine_error(&engine);
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, "DEVICE_UNAVAILABLE");
        assert!(message.contains("cam-7"));
    }

    #[test]
    fn device_busy_maps_to_conflict() {
        let engine = EngineError::DeviceBusy {
            source_id: "http://cam-7/snapshot".into(),
            session_id: 42,
        };
        let (status, code, _) = classify_engine_error(&engine);
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "DEVICE_BUSY");
    }

    #[test]
    fn store_errors_are_sanitized() {
        let engine = EngineError::Store(argus_session::StoreError::new("pool timed out"));
        let (status, _, message) = classify_engine_error(&engine);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("pool"), "raw store error must not leak");
    }
}
