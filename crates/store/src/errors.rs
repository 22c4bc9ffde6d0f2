use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
