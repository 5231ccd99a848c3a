// src/error.rs
use async_graphql::ErrorExtensions;
use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    #[error("no content handler for record type '{0}'")]
    InvalidContent(String),

    #[error("invalid cursor")]
    InvalidCursor,

    #[error("store constraint violated: {0}")]
    Constraint(String),

    #[error("store error: {0}")]
    Store(sqlx::Error),
}

impl AppError {
    pub fn zone_not_found(id: i64) -> Self {
        AppError::NotFound { kind: "zone", id }
    }

    pub fn record_not_found(id: i64) -> Self {
        AppError::NotFound { kind: "record", id }
    }

    /// Stable machine-readable code surfaced in the GraphQL error extensions.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::InvalidContent(_) => "INVALID_CONTENT",
            AppError::InvalidCursor => "INVALID_CURSOR",
            AppError::Constraint(_) => "CONSTRAINT_VIOLATION",
            AppError::Store(_) => "STORE_ERROR",
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db)
                if matches!(
                    db.kind(),
                    ErrorKind::ForeignKeyViolation
                        | ErrorKind::NotNullViolation
                        | ErrorKind::UniqueViolation
                        | ErrorKind::CheckViolation
                ) =>
            {
                AppError::Constraint(db.message().to_string())
            }
            _ => AppError::Store(err),
        }
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string())
            .extend_with(|_, ext| ext.set("code", self.code()))
    }
}
