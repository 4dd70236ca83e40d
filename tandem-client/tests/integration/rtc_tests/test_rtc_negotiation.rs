use futures::channel::mpsc;
use tandem_client::rtc::{RtcPeerTransport, SyntheticMediaDevice};
use tandem_client::{
    MediaDevice, PeerTransport, SdpKind, SessionConfig, SessionEvents, SessionId,
    TransportSession,
};
use tandem_core::MediaConstraints;

use crate::integration::init_tracing;

#[tokio::test]
async fn test_rtc_sessions_exchange_descriptions() {
    init_tracing();
    let device = SyntheticMediaDevice;
    let transport = RtcPeerTransport;
    let config = SessionConfig::default();
    let (tx, _rx) = mpsc::unbounded();

    let caller_media = device.acquire(MediaConstraints::default()).await.unwrap();
    let callee_media = device.acquire(MediaConstraints::default()).await.unwrap();

    let caller = transport
        .open_session(&caller_media, &config, SessionEvents::new(SessionId(1), tx.clone()))
        .await
        .unwrap();
    let callee = transport
        .open_session(&callee_media, &config, SessionEvents::new(SessionId(2), tx))
        .await
        .unwrap();

    let offer = caller.create_offer().await.unwrap();
    assert!(offer.contains("m=audio"));
    assert!(offer.contains("m=video"));

    callee
        .set_remote_description(SdpKind::Offer, &offer)
        .await
        .unwrap();
    let answer = callee.create_answer().await.unwrap();
    assert!(answer.contains("m=audio"));

    caller
        .set_remote_description(SdpKind::Answer, &answer)
        .await
        .unwrap();

    caller.close().await;
    callee.close().await;
}

#[tokio::test]
async fn test_synthetic_device_needs_a_track() {
    let result = SyntheticMediaDevice
        .acquire(MediaConstraints {
            video: false,
            audio: false,
        })
        .await;

    assert!(result.is_err());
}
