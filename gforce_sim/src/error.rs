use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("simulated sensor unavailable")]
    Unavailable,
    #[error("simulated sensor timeout")]
    Timeout,
    #[error("simulated dropout at read {0}")]
    Dropout(u64),
    #[error("replay exhausted")]
    Exhausted,
}

pub type Result<T> = std::result::Result<T, SimError>;
