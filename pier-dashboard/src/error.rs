use crate::cache::DatasetKind;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("engine rejected the request: {0}")]
    Api(String),
    #[error("{kind} dataset failed to load: {message}")]
    DatasetFailed { kind: DatasetKind, message: String },
}
