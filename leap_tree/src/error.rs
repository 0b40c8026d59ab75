use thiserror::Error;

/// Errors that stop the application before its loops start.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not open window: {0}")]
    Window(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
