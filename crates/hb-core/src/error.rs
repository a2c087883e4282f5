use std::io;

use thiserror::Error;
use uuid::Uuid;

use hb_domain::{DateRangeError, ParseEnumError};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Entry not found: {0}")]
    EntryNotFound(Uuid),
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<DateRangeError> for CoreError {
    fn from(err: DateRangeError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

impl From<ParseEnumError> for CoreError {
    fn from(err: ParseEnumError) -> Self {
        CoreError::Validation(err.to_string())
    }
}
