use crate::orders::{OrderError, StorageError};
use thiserror::Error;

/// Failures surfaced at server assembly and runtime
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("order error: {0}")]
    Order(#[from] OrderError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
