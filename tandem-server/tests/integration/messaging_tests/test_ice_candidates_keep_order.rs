use tandem_core::{ConnectionId, SignalMessage};

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::{ice, join, roster};

#[tokio::test]
async fn test_ice_candidates_keep_order() {
    init_tracing();

    let (relay_tx, _signal_rx, signaling) = create_test_relay();
    let a = ConnectionId::new();
    let b = ConnectionId::new();

    join(&relay_tx, &a, "R1", "alice").await.unwrap();
    join(&relay_tx, &b, "R1", "bob").await.unwrap();

    for i in 0..20 {
        ice(&relay_tx, &a, &b, &format!("candidate:{i}")).await.unwrap();
    }
    roster(&relay_tx, "R1").await.unwrap();

    let relayed: Vec<String> = signaling
        .received_by(&b)
        .await
        .into_iter()
        .filter_map(|m| match m {
            SignalMessage::IceCandidateRelayed {
                from_connection_id,
                candidate,
            } => {
                assert_eq!(from_connection_id, a);
                Some(candidate.candidate)
            }
            _ => None,
        })
        .collect();

    let expected: Vec<String> = (0..20).map(|i| format!("candidate:{i}")).collect();
    assert_eq!(relayed, expected);
}
