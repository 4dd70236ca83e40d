use tandem_core::{ConnectionId, SignalMessage};

use crate::integration::init_tracing;
use crate::utils::{Harness, answer_from, candidate, incoming_call, sent_candidates};

#[tokio::test]
async fn test_caller_holds_candidates_until_answer() {
    init_tracing();
    let mut h = Harness::new();
    h.ready().await;
    let bob = ConnectionId::new();

    h.engine.place_call(bob.clone()).await.unwrap();
    let events = h.transport.events(h.current_session());

    events.local_candidate(candidate("l1"));
    events.local_candidate(candidate("l2"));
    h.pump().await;
    assert!(sent_candidates(&h.signal).is_empty());

    h.engine.handle_signal(answer_from(&bob, "answer-sdp")).await;
    events.local_candidate(candidate("l3"));
    h.pump().await;

    assert_eq!(sent_candidates(&h.signal), vec!["l1", "l2", "l3"]);
    assert!(h.signal.sent().iter().all(|m| match m {
        SignalMessage::IceCandidate {
            target_connection_id,
            ..
        } => *target_connection_id == bob,
        _ => true,
    }));
}

#[tokio::test]
async fn test_callee_sends_answer_before_candidates() {
    init_tracing();
    let mut h = Harness::new();
    h.ready().await;
    let alice = ConnectionId::new();

    h.engine
        .handle_signal(incoming_call(&alice, "alice", "offer-sdp"))
        .await;
    h.transport
        .events(h.current_session())
        .local_candidate(candidate("l1"));
    h.pump().await;

    let sent = h.signal.sent();
    assert!(matches!(sent[0], SignalMessage::CallAnswer { .. }));
    assert!(matches!(sent[1], SignalMessage::IceCandidate { .. }));
    assert_eq!(sent.len(), 2);
}
