use tandem_client::CallState;
use tandem_core::{ConnectionId, SignalMessage};

use crate::integration::init_tracing;
use crate::utils::{Harness, MAX_YIELDS, TransportCall, answer_from};

#[tokio::test]
async fn test_hang_up_during_offer() {
    init_tracing();
    let h = Harness::new();
    h.ready().await;
    let bob = ConnectionId::new();
    let gate = h.transport.gate_offer();

    let (placed, hung_up) = tokio::join!(h.engine.place_call(bob.clone()), async {
        for _ in 0..MAX_YIELDS {
            if h
                .transport
                .calls()
                .iter()
                .any(|c| matches!(c, TransportCall::CreateOffer(_)))
            {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(h.engine.state(), CallState::Offering);

        let result = h.engine.hang_up().await;
        gate.notify_one();
        result
    });

    assert!(placed.is_ok());
    assert!(hung_up.is_ok());
    assert_eq!(h.engine.state(), CallState::Idle);
    assert_eq!(
        h.signal
            .count_matching(|m| matches!(m, SignalMessage::CallOffer { .. })),
        0
    );

    let session = h.current_session();
    assert!(h.transport.has_call(&TransportCall::Close(session)));
    assert_eq!(h.states(), vec![CallState::Offering, CallState::Idle]);

    // A late answer for the abandoned call changes nothing.
    h.engine.handle_signal(answer_from(&bob, "late")).await;
    assert_eq!(h.engine.state(), CallState::Idle);
}

#[tokio::test]
async fn test_new_call_after_abandoned_offer() {
    init_tracing();
    let h = Harness::new();
    h.ready().await;
    let bob = ConnectionId::new();
    let carol = ConnectionId::new();
    let gate = h.transport.gate_offer();

    let (first, _) = tokio::join!(h.engine.place_call(bob), async {
        for _ in 0..MAX_YIELDS {
            if h.transport.last_session().is_some() {
                break;
            }
            tokio::task::yield_now().await;
        }
        h.engine.hang_up().await.unwrap();
        gate.notify_one();
    });
    assert!(first.is_ok());

    // Leave a permit so the second offer passes the gate.
    gate.notify_one();
    h.engine.place_call(carol.clone()).await.unwrap();

    assert_eq!(h.engine.state(), CallState::Offering);
    assert_eq!(h.engine.remote_peer(), Some(carol.clone()));
    let offers: Vec<_> = h
        .signal
        .sent()
        .into_iter()
        .filter_map(|m| match m {
            SignalMessage::CallOffer {
                target_connection_id,
                ..
            } => Some(target_connection_id),
            _ => None,
        })
        .collect();
    assert_eq!(offers, vec![carol]);
}
