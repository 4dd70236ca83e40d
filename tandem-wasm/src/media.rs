use async_trait::async_trait;
use tandem_client::{MediaAccessError, MediaDevice, MediaStreamHandle};
use tandem_core::{MediaConstraints, TrackKind};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{MediaStream, MediaStreamConstraints, MediaStreamTrack};

#[derive(Debug, Clone)]
pub struct BrowserStream {
    stream: MediaStream,
}

impl BrowserStream {
    pub fn media_stream(&self) -> &MediaStream {
        &self.stream
    }

    fn tracks(&self, kind: TrackKind) -> Vec<MediaStreamTrack> {
        let tracks = match kind {
            TrackKind::Audio => self.stream.get_audio_tracks(),
            TrackKind::Video => self.stream.get_video_tracks(),
        };
        tracks
            .iter()
            .filter_map(|t| t.dyn_into::<MediaStreamTrack>().ok())
            .collect()
    }
}

impl MediaStreamHandle for BrowserStream {
    fn set_track_enabled(&self, kind: TrackKind, enabled: bool) -> bool {
        let tracks = self.tracks(kind);
        for track in &tracks {
            track.set_enabled(enabled);
        }
        !tracks.is_empty()
    }

    fn is_track_enabled(&self, kind: TrackKind) -> Option<bool> {
        self.tracks(kind).first().map(|t| t.enabled())
    }

    fn stop(&self) {
        for track in self
            .stream
            .get_tracks()
            .iter()
            .filter_map(|t| t.dyn_into::<MediaStreamTrack>().ok())
        {
            track.stop();
        }
    }
}

/// `navigator.mediaDevices.getUserMedia`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserMedia;

#[async_trait(?Send)]
impl MediaDevice for BrowserMedia {
    type Stream = BrowserStream;

    async fn acquire(
        &self,
        constraints: MediaConstraints,
    ) -> Result<BrowserStream, MediaAccessError> {
        let window = web_sys::window()
            .ok_or_else(|| MediaAccessError::Unavailable("no window".to_string()))?;
        let devices = window
            .navigator()
            .media_devices()
            .map_err(media_error)?;

        let request = MediaStreamConstraints::new();
        request.set_audio(&JsValue::from_bool(constraints.audio));
        request.set_video(&JsValue::from_bool(constraints.video));

        let promise = devices
            .get_user_media_with_constraints(&request)
            .map_err(media_error)?;
        let stream = JsFuture::from(promise)
            .await
            .map_err(media_error)?
            .dyn_into::<MediaStream>()
            .map_err(media_error)?;

        Ok(BrowserStream { stream })
    }
}

/// Maps a `DOMException` to the matching error by its `name`.
fn media_error(err: JsValue) -> MediaAccessError {
    let name = js_sys::Reflect::get(&err, &"name".into())
        .ok()
        .and_then(|n| n.as_string())
        .unwrap_or_default();
    let detail = js_sys::Reflect::get(&err, &"message".into())
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", err));

    match name.as_str() {
        "NotAllowedError" | "SecurityError" => MediaAccessError::PermissionDenied(detail),
        "NotFoundError" | "OverconstrainedError" => MediaAccessError::NoDevice(detail),
        _ => MediaAccessError::Unavailable(detail),
    }
}
