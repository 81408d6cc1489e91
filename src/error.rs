use thiserror::Error;

/// Errors from the fallible edges of the playground: config persistence and the terminal.
///
/// Game operations themselves never fail; input in the wrong state is ignored.
#[derive(Error, Debug)]
pub enum PlaygroundError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PlaygroundError>;
