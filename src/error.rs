use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The host passed no overlay host / parent view to attach to.
    #[error("overlay host cannot be null")]
    MissingOverlayHost,
    #[error("invalid provider config: {0}")]
    InvalidConfig(String),
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("JNI error: {0}")]
    Jni(#[from] jni::errors::Error),
    #[error("unknown Android orientation constant: {0}")]
    UnknownOrientation(i32),
}
