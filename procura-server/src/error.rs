//! Error propagation for multi-step service helpers
//!
//! Handlers map single query failures inline with `map_err(internal)`. The
//! notification fan-out and OAuth account provisioning helpers run several
//! statements, so they propagate with `?` and convert once at the boundary.

use shared::error::{AppError, ErrorCode};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Infrastructure failure inside a service helper. Logged at the conversion
/// boundary and rendered to the client as an opaque internal error.
#[derive(Debug)]
pub struct ServiceError(BoxError);

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError(e.into())
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        tracing::error!(error = %e.0, "Service database error");
        AppError::new(ErrorCode::InternalError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_renders_opaque_internal() {
        let err: ServiceError = sqlx::Error::RowNotFound.into();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::InternalError);
    }
}
