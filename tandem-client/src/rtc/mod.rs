//! Native backend on top of `webrtc`. Lets the call engine run outside a
//! browser, e.g. for bots and for end-to-end tests.

mod local_media;
mod rtc_transport;

pub use local_media::{RtcLocalStream, SyntheticMediaDevice};
pub use rtc_transport::{RtcPeerTransport, RtcSession};

use crate::error::TransportError;

impl From<webrtc::Error> for TransportError {
    fn from(e: webrtc::Error) -> Self {
        TransportError(e.to_string())
    }
}
