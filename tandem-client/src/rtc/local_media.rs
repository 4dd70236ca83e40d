use crate::error::{MediaAccessError, TransportError};
use crate::transport::{MediaDevice, MediaStreamHandle};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tandem_core::{MediaConstraints, TrackKind};
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_rtp::TrackLocalStaticRTP;
use webrtc::track::track_local::{TrackLocal, TrackLocalWriter};

const STREAM_ID: &str = "tandem-local";

struct LocalTrack {
    kind: TrackKind,
    track: Arc<TrackLocalStaticRTP>,
    enabled: AtomicBool,
}

struct StreamInner {
    tracks: Vec<LocalTrack>,
    stopped: AtomicBool,
}

/// Local tracks fed by the host application with RTP packets.
#[derive(Clone)]
pub struct RtcLocalStream {
    inner: Arc<StreamInner>,
}

impl RtcLocalStream {
    pub fn new(constraints: MediaConstraints) -> Self {
        let mut tracks = Vec::new();
        if constraints.audio {
            tracks.push(LocalTrack::new(TrackKind::Audio, MIME_TYPE_OPUS));
        }
        if constraints.video {
            tracks.push(LocalTrack::new(TrackKind::Video, MIME_TYPE_VP8));
        }

        Self {
            inner: Arc::new(StreamInner {
                tracks,
                stopped: AtomicBool::new(false),
            }),
        }
    }

    pub fn tracks(&self) -> Vec<Arc<dyn TrackLocal + Send + Sync>> {
        self.inner
            .tracks
            .iter()
            .map(|t| Arc::clone(&t.track) as Arc<dyn TrackLocal + Send + Sync>)
            .collect()
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::SeqCst)
    }

    /// Writes one RTP packet to the track of `kind`. Packets for a disabled
    /// or missing track, or for a stopped stream, are dropped and `false` is
    /// returned.
    pub async fn write_rtp(&self, kind: TrackKind, packet: &[u8]) -> Result<bool, TransportError> {
        if self.is_stopped() {
            return Ok(false);
        }
        let Some(local) = self
            .inner
            .tracks
            .iter()
            .find(|t| t.kind == kind && t.enabled.load(Ordering::SeqCst))
        else {
            return Ok(false);
        };

        local.track.write(packet).await?;
        Ok(true)
    }
}

impl LocalTrack {
    fn new(kind: TrackKind, mime_type: &str) -> Self {
        let id = match kind {
            TrackKind::Audio => "audio",
            TrackKind::Video => "video",
        };
        let track = TrackLocalStaticRTP::new(
            RTCRtpCodecCapability {
                mime_type: mime_type.to_string(),
                ..Default::default()
            },
            id.to_string(),
            STREAM_ID.to_string(),
        );

        Self {
            kind,
            track: Arc::new(track),
            enabled: AtomicBool::new(true),
        }
    }
}

impl MediaStreamHandle for RtcLocalStream {
    fn set_track_enabled(&self, kind: TrackKind, enabled: bool) -> bool {
        let mut found = false;
        for track in self.inner.tracks.iter().filter(|t| t.kind == kind) {
            track.enabled.store(enabled, Ordering::SeqCst);
            found = true;
        }
        found
    }

    fn is_track_enabled(&self, kind: TrackKind) -> Option<bool> {
        self.inner
            .tracks
            .iter()
            .find(|t| t.kind == kind)
            .map(|t| t.enabled.load(Ordering::SeqCst))
    }

    fn stop(&self) {
        self.inner.stopped.store(true, Ordering::SeqCst);
    }
}

/// Device without hardware behind it: hands out empty tracks that the host
/// writes RTP into.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntheticMediaDevice;

#[async_trait(?Send)]
impl MediaDevice for SyntheticMediaDevice {
    type Stream = RtcLocalStream;

    async fn acquire(
        &self,
        constraints: MediaConstraints,
    ) -> Result<Self::Stream, MediaAccessError> {
        if !constraints.audio && !constraints.video {
            return Err(MediaAccessError::NoDevice(
                "neither audio nor video requested".to_string(),
            ));
        }
        Ok(RtcLocalStream::new(constraints))
    }
}
