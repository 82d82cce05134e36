//! Error types for routebill

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing setting: {0}")]
    MissingSetting(String),
}

/// Errors raised by a record store (file or REST backend)
#[derive(Debug, Error)]
pub enum StoreError {
    /// Delete blocked because other rows still point at this one
    #[error("{table} record {id} is still referenced by other records")]
    Referenced { table: String, id: String },

    /// Insert or update points at a row that does not exist
    #[error("{table}.{column} refers to missing record {id}")]
    MissingReference {
        table: String,
        column: String,
        id: String,
    },

    #[error("{table} record not found: {id}")]
    NotFound { table: String, id: String },

    #[error("Invalid {table} record: {message}")]
    Invalid { table: String, message: String },

    #[error("Store rejected request ({status}): {message}")]
    Remote {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Store unreachable: {0}")]
    Transport(String),

    #[error("Store IO error: {0}")]
    Io(String),
}

/// Bulk import errors (file level and row level)
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to parse file: {0}")]
    Parse(String),

    #[error("Spreadsheet has no sheets")]
    EmptyWorkbook,

    #[error("Row {row}: {message}")]
    Row { row: usize, message: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid number for {field}: {value}")]
    InvalidNumber { field: String, value: String },

    #[error("PDF export error: {0}")]
    Pdf(String),

    #[error("Excel export error: {0}")]
    Excel(String),
}

impl Error {
    /// Text shown to the user for a failed action
    pub fn user_message(&self) -> String {
        match self {
            Error::Store(StoreError::Referenced { table, .. }) => match table.as_str() {
                "items" => "Cannot delete this item because it is part of one or more bills. \
                            Please remove it from all bills first."
                    .to_string(),
                "vendors" => "Cannot delete this vendor because it has bills. \
                              Please delete those bills first."
                    .to_string(),
                "routes" => "Cannot delete this route because vendors are assigned to it."
                    .to_string(),
                _ => "Cannot delete this record because other records depend on it.".to_string(),
            },
            Error::Store(StoreError::Remote { .. }) | Error::Store(StoreError::Transport(_)) => {
                "The data store request failed. Please try again.".to_string()
            }
            Error::MissingField(_) | Error::InvalidNumber { .. } => self.to_string(),
            other => other.to_string(),
        }
    }

    /// True when the failure is a referential-integrity violation
    pub fn is_foreign_key(&self) -> bool {
        matches!(
            self,
            Error::Store(StoreError::Referenced { .. })
                | Error::Store(StoreError::MissingReference { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_foreign_key_message_is_specific() {
        let err = Error::Store(StoreError::Referenced {
            table: "items".to_string(),
            id: "i1".to_string(),
        });
        assert!(err.is_foreign_key());
        assert!(err.user_message().starts_with("Cannot delete this item"));
    }

    #[test]
    fn test_remote_failure_message_is_generic() {
        let err = Error::Store(StoreError::Remote {
            status: 500,
            code: None,
            message: "boom".to_string(),
        });
        assert!(!err.is_foreign_key());
        assert!(!err.user_message().contains("boom"));
    }

    #[test]
    fn test_missing_field_message_names_field() {
        let err = Error::MissingField("vendor".to_string());
        assert_eq!(err.user_message(), "Missing required field: vendor");
    }
}
