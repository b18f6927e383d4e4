use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    SeatConflict(String),

    #[error("{0}")]
    DuplicateName(String),

    #[error("{0}")]
    GateInUse(String),

    #[error("{0}")]
    InvalidTransition(String),

    #[error("{0}")]
    TerminalState(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Persistence(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::SeatConflict(_)
            | AppError::DuplicateName(_)
            | AppError::GateInUse(_)
            | AppError::InvalidTransition(_)
            | AppError::TerminalState(_)
            | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Persistence(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for terminal clients.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation",
            AppError::SeatConflict(_) => "seat_conflict",
            AppError::DuplicateName(_) => "duplicate_name",
            AppError::GateInUse(_) => "gate_in_use",
            AppError::InvalidTransition(_) => "invalid_transition",
            AppError::TerminalState(_) => "terminal_state",
            AppError::Conflict(_) => "conflict",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::Persistence(_) => "persistence_unavailable",
            AppError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        } else {
            tracing::debug!(code = self.code(), "{}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        // Constraint violations carry workflow meaning; callers that know the
        // specific constraint remap this further (seat index, gate name).
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => AppError::Conflict(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => AppError::Validation(msg),
            _ => match err {
                DbErr::RecordNotFound(msg) => AppError::NotFound(msg),
                DbErr::RecordNotUpdated => {
                    AppError::NotFound("Record no longer exists".to_string())
                }
                other => AppError::Persistence(other.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_family_maps_to_409() {
        for err in [
            AppError::SeatConflict("seat 14C taken".to_string()),
            AppError::DuplicateName("gate A1 exists".to_string()),
            AppError::GateInUse("gate A1 busy".to_string()),
            AppError::InvalidTransition("departed to cancelled".to_string()),
            AppError::TerminalState("bag delivered".to_string()),
            AppError::Conflict("already exists".to_string()),
        ] {
            assert_eq!(err.status_code(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn test_store_failure_is_retryable() {
        let err = AppError::Persistence("connection pool timed out".to_string());
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.code(), "persistence_unavailable");
    }

    #[test]
    fn test_db_error_classification() {
        let vanished: AppError = DbErr::RecordNotUpdated.into();
        assert_eq!(vanished.status_code(), StatusCode::NOT_FOUND);

        let missing: AppError = DbErr::RecordNotFound("booking".to_string()).into();
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let broken: AppError = DbErr::Custom("socket closed".to_string()).into();
        assert_eq!(broken.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
