//! Error types.
//!
//! - [`PanelError`] is what the library returns while building a panel.
//! - [`AppError`] is what the binary reports: a message plus a process exit code.
//!
//! `PanelError` converts into `AppError`, so `?` works across the boundary.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while ingesting a source or building the panel.
#[derive(Debug, Error)]
pub enum PanelError {
    /// One or more logical fields have no column in the source header.
    #[error("CSV missing required columns: [{}]", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// The source has no header line.
    #[error("CSV has no header line")]
    EmptyHeader,

    /// Input handed to the transform engine breaks the ingestion ordering contract.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("failed to open '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl PanelError {
    /// Exit code used when this error reaches the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            PanelError::InvariantViolation(_) => 4,
            _ => 2,
        }
    }
}

pub type PanelResult<T> = Result<T, PanelError>;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<PanelError> for AppError {
    fn from(err: PanelError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
