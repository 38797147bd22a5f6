use thiserror::Error;

/// All errors produced by auris-core.
#[derive(Debug, Error)]
pub enum AurisError {
    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("recognition error (code {0})")]
    Recognition(i32),

    #[error("a recognition session is already active")]
    AlreadyListening,

    #[error("no recognition session is active")]
    NotListening,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AurisError>;
