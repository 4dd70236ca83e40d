use crate::engine::CallState;

/// Camera / microphone could not be opened. Reported to the user as-is;
/// the engine never retries on its own.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaAccessError {
    #[error("permission to use camera/microphone was denied: {0}")]
    PermissionDenied(String),

    #[error("no camera/microphone available: {0}")]
    NoDevice(String),

    #[error("media device failed: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("peer transport failure: {0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignalError {
    #[error("signaling channel is not open")]
    Closed,

    #[error("failed to encode signal: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallError {
    #[error(transparent)]
    MediaAccess(#[from] MediaAccessError),

    #[error("local media has not been started")]
    NoLocalMedia,

    #[error("`{operation}` is not allowed while {state:?}")]
    InvalidTransition {
        operation: &'static str,
        state: CallState,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Signal(#[from] SignalError),
}
