use crate::config::EngineConfig;
use crate::error::CallError;
use crate::roster::{Roster, RosterEntry};
use crate::transport::{
    MediaDevice, PeerTransport, SessionConfig, SessionEnvelope, SessionEventReceiver,
    SessionEvents, SessionId, SignalSink, TransportSession,
};
use futures::channel::mpsc;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use tandem_core::{ConnectionId, IceCandidate, IceServerConfig, RoomId, SignalMessage};
use tracing::{debug, warn};

mod handle_signal_impl;
mod hang_up_impl;
mod ice_impl;
mod media_impl;
mod place_call_impl;
mod receive_answer_impl;
mod receive_offer_impl;
mod room_impl;
mod session_event_impl;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CallState {
    Idle,
    Offering,
    Answering,
    Connecting,
    Active,
}

/// Notifications for the UI layer.
#[derive(Debug, Clone)]
pub enum EngineEvent<R> {
    StateChanged {
        state: CallState,
        peer: Option<ConnectionId>,
    },
    /// `None` when the remote stream went away.
    RemoteStream(Option<R>),
    RosterChanged(Vec<RosterEntry>),
    /// Someone called while we were busy.
    IncomingCallIgnored {
        from: ConnectionId,
        display_name: String,
    },
    CallFailed {
        peer: Option<ConnectionId>,
        reason: String,
    },
}

struct PeerSession<X, R> {
    id: SessionId,
    state: CallState,
    remote: ConnectionId,
    transport: Option<Rc<X>>,
    remote_stream: Option<R>,
    /// An offer or answer is being produced or applied.
    in_flight: bool,
    /// Remote candidates may go straight to the transport.
    remote_description_set: bool,
    /// Our own candidates may be sent; the peer already has our description.
    local_ready: bool,
    pending_local: VecDeque<IceCandidate>,
    pending_remote: VecDeque<IceCandidate>,
}

impl<X, R> PeerSession<X, R> {
    fn new(id: SessionId, remote: ConnectionId, state: CallState) -> Self {
        Self {
            id,
            state,
            remote,
            transport: None,
            remote_stream: None,
            in_flight: true,
            remote_description_set: false,
            local_ready: false,
            pending_local: VecDeque::new(),
            pending_remote: VecDeque::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct Membership {
    room_id: RoomId,
    display_name: String,
}

struct EngineInner<L, X, R> {
    local_stream: Option<L>,
    session: Option<PeerSession<X, R>>,
    next_session: u64,
    self_id: Option<ConnectionId>,
    ice_servers: Option<Vec<IceServerConfig>>,
    roster: Roster,
    membership: Option<Membership>,
}

type EventHandler<R> = Rc<dyn Fn(EngineEvent<R>)>;

/// One-to-one call state machine.
///
/// Single-threaded: every await point may interleave with signaling input,
/// transport callbacks and user actions, so each async operation re-checks
/// that its session is still the current one after resuming. At most one
/// peer session exists at a time and at most one negotiation step is in
/// flight for it.
pub struct CallEngine<M, T, S>
where
    M: MediaDevice,
    T: PeerTransport<Stream = M::Stream>,
    S: SignalSink,
{
    inner: Rc<RefCell<EngineInner<M::Stream, T::Session, T::Remote>>>,
    handler: Rc<RefCell<Option<EventHandler<T::Remote>>>>,
    media: Rc<M>,
    transport: Rc<T>,
    signal: Rc<S>,
    events_tx: mpsc::UnboundedSender<SessionEnvelope<T::Remote>>,
    config: Rc<EngineConfig>,
}

impl<M, T, S> Clone for CallEngine<M, T, S>
where
    M: MediaDevice,
    T: PeerTransport<Stream = M::Stream>,
    S: SignalSink,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            handler: self.handler.clone(),
            media: self.media.clone(),
            transport: self.transport.clone(),
            signal: self.signal.clone(),
            events_tx: self.events_tx.clone(),
            config: self.config.clone(),
        }
    }
}

impl<M, T, S> CallEngine<M, T, S>
where
    M: MediaDevice,
    T: PeerTransport<Stream = M::Stream>,
    S: SignalSink,
{
    /// The returned receiver carries transport callbacks and must be driven
    /// with [`CallEngine::run_session_events`] (or fed event by event to
    /// [`CallEngine::handle_session_event`]).
    pub fn new(
        media: M,
        transport: T,
        signal: S,
        config: EngineConfig,
    ) -> (Self, SessionEventReceiver<T::Remote>) {
        let (events_tx, events_rx) = mpsc::unbounded();

        let inner = Rc::new(RefCell::new(EngineInner {
            local_stream: None,
            session: None,
            next_session: 0,
            self_id: None,
            ice_servers: None,
            roster: Roster::new(),
            membership: None,
        }));

        let engine = CallEngine {
            inner,
            handler: Rc::new(RefCell::new(None)),
            media: Rc::new(media),
            transport: Rc::new(transport),
            signal: Rc::new(signal),
            events_tx,
            config: Rc::new(config),
        };

        (engine, events_rx)
    }

    pub fn set_event_handler(&self, handler: impl Fn(EngineEvent<T::Remote>) + 'static) {
        *self.handler.borrow_mut() = Some(Rc::new(handler));
    }

    pub fn state(&self) -> CallState {
        self.inner
            .borrow()
            .session
            .as_ref()
            .map(|s| s.state)
            .unwrap_or(CallState::Idle)
    }

    pub fn remote_peer(&self) -> Option<ConnectionId> {
        self.inner.borrow().session.as_ref().map(|s| s.remote.clone())
    }

    pub fn remote_stream(&self) -> Option<T::Remote> {
        self.inner
            .borrow()
            .session
            .as_ref()
            .and_then(|s| s.remote_stream.clone())
    }

    pub fn local_stream(&self) -> Option<M::Stream> {
        self.inner.borrow().local_stream.clone()
    }

    pub fn is_negotiating(&self) -> bool {
        self.inner
            .borrow()
            .session
            .as_ref()
            .is_some_and(|s| s.in_flight)
    }

    /// Our own id, once the server has greeted us.
    pub fn connection_id(&self) -> Option<ConnectionId> {
        self.inner.borrow().self_id.clone()
    }

    pub fn roster(&self) -> Vec<RosterEntry> {
        self.inner.borrow().roster.entries().to_vec()
    }

    pub fn room(&self) -> Option<RoomId> {
        self.inner
            .borrow()
            .membership
            .as_ref()
            .map(|m| m.room_id.clone())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn emit(&self, event: EngineEvent<T::Remote>) {
        let handler = self.handler.borrow().clone();
        if let Some(handler) = handler {
            handler(event);
        }
    }

    fn emit_roster(&self) {
        let entries = self.roster();
        self.emit(EngineEvent::RosterChanged(entries));
    }

    fn send_signal(&self, msg: SignalMessage) {
        let kind = msg.kind();
        if let Err(e) = self.signal.send(msg) {
            warn!("Could not send {}: {}", kind, e);
        }
    }

    /// For negotiation messages: a lost offer or answer fails the call.
    fn send_required(&self, msg: SignalMessage) -> Result<(), CallError> {
        self.signal.send(msg)?;
        Ok(())
    }

    fn reject(&self, operation: &'static str) -> Result<(), CallError> {
        let state = self.state();
        if self.config.strict_transitions {
            return Err(CallError::InvalidTransition { operation, state });
        }
        warn!("Ignoring {} while {:?}", operation, state);
        Ok(())
    }

    fn is_current(&self, id: SessionId) -> bool {
        self.with_session(id, |_| ()).is_some()
    }

    /// Runs `f` on the session if `id` is still the current one.
    fn with_session<O>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut PeerSession<T::Session, T::Remote>) -> O,
    ) -> Option<O> {
        let mut inner = self.inner.borrow_mut();
        inner.session.as_mut().filter(|s| s.id == id).map(f)
    }

    fn begin_session(&self, remote: ConnectionId, state: CallState) -> SessionId {
        let id = {
            let mut inner = self.inner.borrow_mut();
            inner.next_session += 1;
            let id = SessionId(inner.next_session);
            inner.session = Some(PeerSession::new(id, remote.clone(), state));
            id
        };

        self.emit(EngineEvent::StateChanged {
            state,
            peer: Some(remote),
        });
        id
    }

    fn session_config(&self) -> SessionConfig {
        let ice_servers = self
            .inner
            .borrow()
            .ice_servers
            .clone()
            .unwrap_or_else(|| self.config.default_ice_servers.clone());
        SessionConfig { ice_servers }
    }

    /// Opens the transport for session `id`. `None` when the session was
    /// abandoned while the transport was being created; the fresh transport
    /// is closed again in that case.
    async fn open_transport(
        &self,
        id: SessionId,
        local: &M::Stream,
    ) -> Result<Option<Rc<T::Session>>, CallError> {
        let events = SessionEvents::new(id, self.events_tx.clone());
        let session = Rc::new(
            self.transport
                .open_session(local, &self.session_config(), events)
                .await?,
        );

        let attached = self
            .with_session(id, |s| s.transport = Some(session.clone()))
            .is_some();
        if !attached {
            session.close().await;
            return Ok(None);
        }
        Ok(Some(session))
    }

    /// Settles a negotiation step for session `id`. Failures of the current
    /// session end the call; failures of an abandoned session are dropped.
    async fn finish_negotiation(
        &self,
        id: SessionId,
        result: Result<(), CallError>,
    ) -> Result<(), CallError> {
        match result {
            Ok(()) => {
                self.with_session(id, |s| s.in_flight = false);
                Ok(())
            }
            Err(e) if self.is_current(id) => {
                warn!("{} failed: {}", id, e);
                let peer = self.end_session().await;
                self.emit(EngineEvent::CallFailed {
                    peer,
                    reason: e.to_string(),
                });
                Err(e)
            }
            Err(e) => {
                debug!("Discarding failure of abandoned {}: {}", id, e);
                Ok(())
            }
        }
    }

    /// Moves the session on once its descriptions are exchanged. Jumps
    /// straight to `Active` if remote media already arrived.
    fn enter_connecting(&self, id: SessionId) {
        let changed = self.with_session(id, |s| {
            s.state = if s.remote_stream.is_some() {
                CallState::Active
            } else {
                CallState::Connecting
            };
            (s.state, s.remote.clone())
        });

        if let Some((state, peer)) = changed {
            self.emit(EngineEvent::StateChanged {
                state,
                peer: Some(peer),
            });
        }
    }
}
