//! Error types.

use thiserror::Error;

/// Errors produced while assembling or running a tuning job.
#[derive(Debug, Error)]
pub enum TuneError {
    #[error("unknown kernel: `{0}`")]
    UnknownKernel(String),

    #[error("no `{kernel}` entry in the {table} table")]
    MissingDirective { table: &'static str, kernel: String },

    #[error("tunable parameter `{0}` has no candidate values")]
    EmptySearchSpace(String),

    #[error("tunable parameter `{param}` has non-positive candidate value {value}")]
    NonPositiveValue { param: String, value: u32 },

    #[error("arguments do not match the `{0}` kernel layout")]
    ArgumentLayout(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TuneError>;
