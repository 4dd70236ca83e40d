use tandem_core::{ConnectionId, SignalMessage};

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::{disconnect, join, roster};

#[tokio::test]
async fn test_same_name_in_two_rooms() {
    init_tracing();

    let (relay_tx, _signal_rx, signaling) = create_test_relay();
    let (a1, b1) = (ConnectionId::new(), ConnectionId::new());
    let (a2, b2) = (ConnectionId::new(), ConnectionId::new());

    join(&relay_tx, &a1, "R1", "interviewer").await.unwrap();
    join(&relay_tx, &b1, "R1", "candidate").await.unwrap();
    join(&relay_tx, &a2, "R2", "interviewer").await.unwrap();
    join(&relay_tx, &b2, "R2", "candidate").await.unwrap();

    let r1 = roster(&relay_tx, "R1").await.unwrap();
    let r2 = roster(&relay_tx, "R2").await.unwrap();
    assert_eq!(r1.len(), 2);
    assert_eq!(r2.len(), 2);
    assert!(r1.iter().any(|p| p.connection_id == a1));
    assert!(r2.iter().any(|p| p.connection_id == a2));

    disconnect(&relay_tx, &a1).await.unwrap();
    roster(&relay_tx, "R1").await.unwrap();

    let heard_in_r2 = signaling
        .count_matching(|d| {
            (d.to == a2 || d.to == b2) && matches!(d.msg, SignalMessage::MemberLeft { .. })
        })
        .await;
    assert_eq!(heard_in_r2, 0, "R2 does not hear about R1's departures");
    assert_eq!(roster(&relay_tx, "R2").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_moving_rooms_notifies_old_room() {
    init_tracing();

    let (relay_tx, _signal_rx, signaling) = create_test_relay();
    let a = ConnectionId::new();
    let b = ConnectionId::new();

    join(&relay_tx, &a, "R1", "alice").await.unwrap();
    join(&relay_tx, &b, "R1", "bob").await.unwrap();
    join(&relay_tx, &a, "R2", "alice").await.unwrap();

    assert_eq!(roster(&relay_tx, "R1").await.unwrap().len(), 1);
    assert_eq!(roster(&relay_tx, "R2").await.unwrap().len(), 1);

    let left = signaling
        .count_matching(|d| {
            d.to == b
                && matches!(&d.msg, SignalMessage::MemberLeft { connection_id, .. } if connection_id == &a)
        })
        .await;
    assert_eq!(left, 1);
}
