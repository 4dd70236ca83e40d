//! Browser bindings: the call engine driven by `getUserMedia`,
//! `RTCPeerConnection` and a reconnecting signaling `WebSocket`.

mod client;
mod logger;
mod media;
mod signal;
mod transport;

pub use client::TandemClient;
pub use media::{BrowserMedia, BrowserStream};
pub use signal::WsSignal;
pub use transport::{BrowserSession, BrowserTransport};
