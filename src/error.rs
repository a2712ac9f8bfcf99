//! Error types for the regraft scene graph filter.

use thiserror::Error;

/// Path parsing and validation errors
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Empty path element in {0:?}")]
    EmptyElement(String),

    #[error("Invalid path element {element:?} in {text:?}")]
    InvalidElement { text: String, element: String },
}

/// Setup-related errors (logging and configuration initialization)
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid path: {0}")]
    Path(#[from] PathError),

    #[error("Setup I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
