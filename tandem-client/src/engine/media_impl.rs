use crate::engine::CallEngine;
use crate::error::CallError;
use crate::transport::{MediaDevice, MediaStreamHandle, PeerTransport, SignalSink};
use tandem_core::TrackKind;
use tracing::{info, warn};

impl<M, T, S> CallEngine<M, T, S>
where
    M: MediaDevice,
    T: PeerTransport<Stream = M::Stream>,
    S: SignalSink,
{
    /// Opens camera and microphone with the configured constraints. Calling
    /// it again returns the stream that is already running.
    pub async fn start_local_media(&self) -> Result<M::Stream, CallError> {
        if let Some(stream) = self.local_stream() {
            return Ok(stream);
        }

        let stream = match self.media.acquire(self.config.media).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Local media unavailable: {}", e);
                return Err(e.into());
            }
        };

        // Two overlapping starts: keep whichever finished first.
        if let Some(existing) = self.local_stream() {
            stream.stop();
            return Ok(existing);
        }

        info!("Local media started");
        self.inner.borrow_mut().local_stream = Some(stream.clone());
        Ok(stream)
    }

    /// Releases camera and microphone. A running call keeps whatever the
    /// transport already holds, so hang up first.
    pub fn stop_local_media(&self) {
        let stream = self.inner.borrow_mut().local_stream.take();
        if let Some(stream) = stream {
            stream.stop();
        }
    }

    /// Flips the audio track. Returns whether audio is now muted, or `None`
    /// without local audio.
    pub fn toggle_mute(&self) -> Option<bool> {
        self.toggle_track(TrackKind::Audio)
    }

    /// Flips the video track. Returns whether video is now off, or `None`
    /// without local video.
    pub fn toggle_video(&self) -> Option<bool> {
        self.toggle_track(TrackKind::Video)
    }

    fn toggle_track(&self, kind: TrackKind) -> Option<bool> {
        let stream = self.local_stream()?;
        let enabled = stream.is_track_enabled(kind)?;
        stream.set_track_enabled(kind, !enabled);
        Some(enabled)
    }
}
