//! Error types for entity store operations

use thiserror::Error;

/// Errors that can occur while building, executing or hydrating statements
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("Unknown column '{column}' for table '{table}'")]
    UnknownColumn { table: &'static str, column: String },

    #[error("Missing column '{column}' in row of table '{table}'")]
    MissingColumn { table: &'static str, column: String },

    #[error("Refusing to delete from '{0}' without criteria")]
    EmptyCriteria(&'static str),

    #[error("Entity of table '{0}' has no id")]
    MissingId(&'static str),

    #[error("Invalid patch: {0}")]
    InvalidPatch(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    pub fn unknown_column(table: &'static str, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            table,
            column: column.into(),
        }
    }

    pub fn missing_column(table: &'static str, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            table,
            column: column.into(),
        }
    }

    pub fn invalid_patch(msg: impl Into<String>) -> Self {
        Self::InvalidPatch(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_column_message() {
        let err = StoreError::unknown_column("Users", "password");
        assert_eq!(
            err.to_string(),
            "Unknown column 'password' for table 'Users'"
        );
    }

    #[test]
    fn test_empty_criteria_message() {
        let err = StoreError::EmptyCriteria("Roles");
        assert!(err.to_string().contains("Roles"));
    }

    #[test]
    fn test_sqlx_error_converts() {
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StoreError::Sql(sqlx::Error::RowNotFound)));
    }
}
