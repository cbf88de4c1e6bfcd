use thiserror::Error;

/// Core error type shared across rafflegen crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The input is not a well-formed table literal.
    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },
}

/// Convenience alias for results returned by rafflegen crates.
pub type Result<T> = std::result::Result<T, Error>;
