use thiserror::Error;

/// Failures reported back to the interactive prompt.
///
/// Everything else (browser transport, IO) travels as `anyhow::Error`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("{0}")]
    Format(String),
    #[error("Timed out {0}. Please try again.")]
    Timeout(String),
    #[error("Selection error: {0}")]
    Selection(String),
    #[error("Invalid selector {0}")]
    Selector(String),
    #[error("Configuration error: {0}")]
    Config(String),
}
