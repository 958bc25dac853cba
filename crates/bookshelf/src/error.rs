use crate::store::StoreError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Book not found")]
    NotFound { upc: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
