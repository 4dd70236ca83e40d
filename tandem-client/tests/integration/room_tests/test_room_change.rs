use tandem_client::CallState;
use tandem_core::{ConnectionId, RoomId, SignalMessage};

use crate::integration::init_tracing;
use crate::utils::{Harness, TransportCall, joined};

#[tokio::test]
async fn test_switching_rooms_ends_call() {
    init_tracing();
    let mut h = Harness::new();
    h.ready().await;
    let bob = ConnectionId::new();

    h.engine.join_room("R1", "alice").await;
    h.engine.handle_signal(joined("R1", &[("bob", &bob)])).await;
    let session = h.establish_outgoing(&bob).await;
    h.signal.take();

    h.engine.join_room("R2", "alice").await;

    assert_eq!(h.engine.state(), CallState::Idle);
    assert!(h.engine.remote_peer().is_none());
    assert!(h.transport.has_call(&TransportCall::Close(session)));
    assert!(h.engine.roster().is_empty());
    assert_eq!(
        h.signal.sent(),
        vec![SignalMessage::Join {
            display_name: "alice".into(),
            room_id: RoomId::from("R2"),
        }]
    );

    h.engine.handle_signal(joined("R2", &[])).await;
    assert_eq!(h.engine.room(), Some(RoomId::from("R2")));
    assert!(h.engine.roster().is_empty());
}

#[tokio::test]
async fn test_rejoining_same_room_keeps_call() {
    init_tracing();
    let mut h = Harness::new();
    h.ready().await;
    let bob = ConnectionId::new();

    h.engine.join_room("R1", "alice").await;
    h.engine.handle_signal(joined("R1", &[("bob", &bob)])).await;
    h.establish_outgoing(&bob).await;

    h.engine.join_room("R1", "alice").await;

    assert_eq!(h.engine.state(), CallState::Active);
    assert_eq!(h.engine.remote_peer(), Some(bob));
}

#[tokio::test]
async fn test_late_roster_after_leave_is_ignored() {
    init_tracing();
    let h = Harness::new();
    h.ready().await;
    let bob = ConnectionId::new();

    h.engine.join_room("R1", "alice").await;
    h.engine.leave_room().await;
    h.engine.handle_signal(joined("R1", &[("bob", &bob)])).await;

    assert!(h.engine.roster().is_empty());
    assert!(h.engine.room().is_none());
}

#[tokio::test]
async fn test_roster_for_previous_room_is_ignored() {
    init_tracing();
    let h = Harness::new();
    h.ready().await;
    let bob = ConnectionId::new();

    h.engine.join_room("R1", "alice").await;
    h.engine.join_room("R2", "alice").await;
    h.engine.handle_signal(joined("R1", &[("bob", &bob)])).await;

    assert!(h.engine.roster().is_empty());
    assert_eq!(h.engine.room(), Some(RoomId::from("R2")));
}
