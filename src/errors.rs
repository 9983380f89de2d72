//! Unified application error type.
//! Every layer (store, photo, core, api, cli) returns AppError so the request
//! boundary can turn any failure into a `{success:false, error}` response.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Shift lifecycle taxonomy
    // ---------------------------
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Dependency(String),

    // ---------------------------
    // IO / storage
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date-time format: {0}")]
    InvalidDateTime(String),

    #[error("Invalid stage: {0}")]
    InvalidStage(String),

    #[error("Invalid request: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Request surface
    // ---------------------------
    /// An operation answered `{success:false}`; the message is already shown.
    #[error("{0}")]
    Rejected(String),
}

impl AppError {
    /// Short category label used in the audit log.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Dependency(_) | AppError::Db(_) | AppError::Migration(_) => "dependency",
            _ => "internal",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
