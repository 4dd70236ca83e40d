use tandem_core::{ConnectionId, RoomId, SignalMessage};

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::{join, roster, wait_for_delivery};

#[tokio::test]
async fn test_first_join_gets_empty_roster() {
    init_tracing();

    let (relay_tx, mut signal_rx, signaling) = create_test_relay();
    let a = ConnectionId::new();

    join(&relay_tx, &a, "R1", "alice").await.unwrap();

    let joined = wait_for_delivery(&mut signal_rx, &a, |m| {
        matches!(m, SignalMessage::Joined { .. })
    })
    .await
    .expect("alice should get a roster");

    assert_eq!(
        joined,
        SignalMessage::Joined {
            room_id: RoomId::from("R1"),
            members: vec![],
        }
    );

    let members = roster(&relay_tx, "R1").await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].connection_id, a);
    assert_eq!(signaling.total().await, 1, "nobody else to notify");
}
