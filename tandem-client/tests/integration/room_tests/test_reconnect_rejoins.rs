use tandem_client::CallState;
use tandem_core::{ConnectionId, RoomId, SignalMessage};

use crate::integration::init_tracing;
use crate::utils::{Harness, TransportCall, joined};

#[tokio::test]
async fn test_reconnect_rejoins() {
    init_tracing();
    let mut h = Harness::new();
    h.ready().await;
    let bob = ConnectionId::new();

    h.engine.join_room("R1", "alice").await;
    h.engine.handle_signal(joined("R1", &[("bob", &bob)])).await;
    let session = h.establish_outgoing(&bob).await;
    h.signal.take();

    h.engine.on_transport_reconnected().await;

    assert_eq!(h.engine.state(), CallState::Idle);
    assert!(h.transport.has_call(&TransportCall::Close(session)));
    assert!(h.engine.roster().is_empty());
    assert_eq!(
        h.signal.sent(),
        vec![SignalMessage::Join {
            display_name: "alice".into(),
            room_id: RoomId::from("R1"),
        }]
    );

    let new_id = ConnectionId::new();
    h.engine
        .handle_signal(SignalMessage::Welcome {
            connection_id: new_id.clone(),
            ice_servers: vec![],
        })
        .await;
    h.engine.handle_signal(joined("R1", &[("bob", &bob)])).await;

    assert_eq!(h.engine.connection_id(), Some(new_id));
    assert_eq!(h.engine.roster().len(), 1);
    assert_eq!(h.engine.room(), Some(RoomId::from("R1")));
}

#[tokio::test]
async fn test_reconnect_without_room_sends_nothing() {
    init_tracing();
    let h = Harness::new();
    h.ready().await;

    h.engine.on_transport_reconnected().await;

    assert!(h.signal.sent().is_empty());
}

#[tokio::test]
async fn test_leave_room_forgets_membership() {
    init_tracing();
    let mut h = Harness::new();
    h.ready().await;
    let bob = ConnectionId::new();

    h.engine.join_room("R1", "alice").await;
    h.engine.handle_signal(joined("R1", &[("bob", &bob)])).await;
    h.establish_outgoing(&bob).await;

    h.engine.leave_room().await;
    assert_eq!(h.engine.state(), CallState::Idle);
    assert!(h.engine.room().is_none());
    assert_eq!(h.signal.sent().last(), Some(&SignalMessage::Leave));

    h.signal.take();
    h.engine.on_transport_reconnected().await;
    assert!(h.signal.sent().is_empty());
}

#[tokio::test]
async fn test_server_ice_servers_are_used() {
    init_tracing();
    let h = Harness::new();
    h.engine
        .handle_signal(SignalMessage::Welcome {
            connection_id: h.self_id.clone(),
            ice_servers: vec![tandem_core::IceServerConfig::stun("stun:example.test:3478")],
        })
        .await;
    h.engine.start_local_media().await.unwrap();

    h.engine.place_call(ConnectionId::new()).await.unwrap();

    let configs = h.transport.session_configs();
    assert_eq!(configs[0].ice_servers[0].urls, vec!["stun:example.test:3478"]);
}
