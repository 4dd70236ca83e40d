use tandem_client::{CallError, CallState};
use tandem_core::ConnectionId;

use crate::integration::init_tracing;
use crate::utils::{Harness, candidate};

#[tokio::test]
async fn test_strict_engine_reports_invalid_transitions() {
    init_tracing();
    let mut h = Harness::new();
    h.ready().await;

    assert_eq!(
        h.engine.receive_answer("sdp".into()).await,
        Err(CallError::InvalidTransition {
            operation: "receive_answer",
            state: CallState::Idle,
        })
    );
    assert!(matches!(
        h.engine.hang_up().await,
        Err(CallError::InvalidTransition { .. })
    ));
    assert!(matches!(
        h.engine.receive_ice_candidate(candidate("c1")).await,
        Err(CallError::InvalidTransition { .. })
    ));

    let bob = ConnectionId::new();
    h.establish_outgoing(&bob).await;

    assert_eq!(
        h.engine.place_call(ConnectionId::new()).await,
        Err(CallError::InvalidTransition {
            operation: "place_call",
            state: CallState::Active,
        })
    );
    assert_eq!(
        h.engine.receive_offer(ConnectionId::new(), "offer".into()).await,
        Err(CallError::InvalidTransition {
            operation: "receive_offer",
            state: CallState::Active,
        })
    );
    assert!(matches!(
        h.engine.receive_answer("again".into()).await,
        Err(CallError::InvalidTransition { .. })
    ));
    assert_eq!(h.engine.state(), CallState::Active);
}

#[tokio::test]
async fn test_lenient_engine_ignores_invalid_transitions() {
    init_tracing();
    let h = Harness::lenient();
    h.ready().await;

    assert_eq!(h.engine.receive_answer("sdp".into()).await, Ok(()));
    assert_eq!(h.engine.hang_up().await, Ok(()));
    assert_eq!(h.engine.receive_ice_candidate(candidate("c1")).await, Ok(()));

    assert_eq!(h.engine.state(), CallState::Idle);
    assert!(h.states().is_empty());
    assert_eq!(h.transport.opened_sessions(), 0);
}

#[tokio::test]
async fn test_place_call_requires_local_media() {
    init_tracing();
    let h = Harness::new();

    assert_eq!(
        h.engine.place_call(ConnectionId::new()).await,
        Err(CallError::NoLocalMedia)
    );
    assert_eq!(h.engine.state(), CallState::Idle);
}
