use crate::error::MediaAccessError;
use async_trait::async_trait;
use tandem_core::{MediaConstraints, TrackKind};

/// A captured local stream. Cloning yields another handle to the same tracks.
pub trait MediaStreamHandle: Clone + 'static {
    /// Enables or disables every track of `kind`. Returns `false` when the
    /// stream has no such track.
    fn set_track_enabled(&self, kind: TrackKind, enabled: bool) -> bool;

    fn is_track_enabled(&self, kind: TrackKind) -> Option<bool>;

    /// Releases the underlying devices.
    fn stop(&self);
}

/// Camera and microphone access.
#[async_trait(?Send)]
pub trait MediaDevice: 'static {
    type Stream: MediaStreamHandle;

    async fn acquire(&self, constraints: MediaConstraints)
    -> Result<Self::Stream, MediaAccessError>;
}
