use tandem_core::{ConnectionId, SignalMessage};

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::{join, roster};

#[tokio::test]
async fn test_rejoin_is_idempotent() {
    init_tracing();

    let (relay_tx, _signal_rx, signaling) = create_test_relay();
    let a = ConnectionId::new();
    let b = ConnectionId::new();

    join(&relay_tx, &a, "R1", "alice").await.unwrap();
    join(&relay_tx, &b, "R1", "bob").await.unwrap();
    // Reconnect handler replays the same join on the same connection.
    join(&relay_tx, &b, "R1", "bob").await.unwrap();

    let members = roster(&relay_tx, "R1").await.unwrap();
    assert_eq!(members.len(), 2, "rejoin must replace, not duplicate");

    let to_b = signaling.received_by(&b).await;
    let last_joined = to_b
        .iter()
        .rev()
        .find_map(|m| match m {
            SignalMessage::Joined { members, .. } => Some(members.clone()),
            _ => None,
        })
        .expect("bob should get a roster on each join");
    assert_eq!(last_joined.len(), 1);
    assert_eq!(last_joined[0].connection_id, a);
}
