use thiserror::Error;

/// Errors raised while parsing or validating core domain values.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid message role: {0}")]
    InvalidRole(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
