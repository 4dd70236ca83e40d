use crate::logger::Logger;
use crate::media::BrowserMedia;
use crate::signal::WsSignal;
use crate::transport::BrowserTransport;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use tandem_client::{
    CallEngine, CallState, EngineConfig, EngineEvent, ReconnectPolicy, RosterEntry,
};
use tandem_core::{ConnectionId, SignalMessage};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{MediaStream, WebSocket};

type BrowserEngine = CallEngine<BrowserMedia, BrowserTransport, WsSignal>;

/// What the page sees in its event callback, as `{ type, ... }`.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
enum UiEvent {
    StateChanged {
        state: CallState,
        peer: Option<ConnectionId>,
    },
    RosterChanged {
        members: Vec<RosterEntry>,
    },
    IncomingCallIgnored {
        from: ConnectionId,
        display_name: String,
    },
    CallFailed {
        peer: Option<ConnectionId>,
        reason: String,
    },
}

struct SocketState {
    url: String,
    attempt: u32,
    closing: bool,
    policy: ReconnectPolicy,
    handlers: Vec<Closure<dyn FnMut(JsValue)>>,
}

#[derive(Clone)]
struct Connection {
    engine: BrowserEngine,
    signal: WsSignal,
    socket: Rc<RefCell<SocketState>>,
}

#[wasm_bindgen]
pub struct TandemClient {
    conn: Connection,
}

#[wasm_bindgen]
impl TandemClient {
    /// Connects to the signaling server at `url` (e.g. `ws://host:3001/ws`)
    /// and keeps reconnecting with backoff until `close` is called.
    #[wasm_bindgen(constructor)]
    pub fn new(url: String) -> Result<TandemClient, JsValue> {
        let signal = WsSignal::default();
        let (engine, session_events) = CallEngine::new(
            BrowserMedia,
            BrowserTransport,
            signal.clone(),
            EngineConfig::default(),
        );

        let driver = engine.clone();
        spawn_local(async move { driver.run_session_events(session_events).await });

        let conn = Connection {
            engine,
            signal,
            socket: Rc::new(RefCell::new(SocketState {
                url,
                attempt: 0,
                closing: false,
                policy: ReconnectPolicy::default(),
                handlers: Vec::new(),
            })),
        };
        conn.connect()?;

        Ok(TandemClient { conn })
    }

    /// `callback(event)`; remote media arrives as `{ type: "remoteStream", stream }`
    /// with `stream` set to `null` when it ends.
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&self, callback: js_sys::Function) {
        self.conn.engine.set_event_handler(move |event| {
            let value = match event {
                EngineEvent::RemoteStream(stream) => remote_stream_event(stream),
                EngineEvent::StateChanged { state, peer } => {
                    to_js(&UiEvent::StateChanged { state, peer })
                }
                EngineEvent::RosterChanged(members) => to_js(&UiEvent::RosterChanged { members }),
                EngineEvent::IncomingCallIgnored { from, display_name } => {
                    to_js(&UiEvent::IncomingCallIgnored { from, display_name })
                }
                EngineEvent::CallFailed { peer, reason } => {
                    to_js(&UiEvent::CallFailed { peer, reason })
                }
            };
            if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                Logger::error("Event callback threw", &e);
            }
        });
    }

    /// Resolves to the local `MediaStream` for preview.
    #[wasm_bindgen(js_name = startLocalMedia)]
    pub fn start_local_media(&self) -> js_sys::Promise {
        let engine = self.conn.engine.clone();
        wasm_bindgen_futures::future_to_promise(async move {
            let stream = engine.start_local_media().await.map_err(to_js_error)?;
            Ok(stream.media_stream().clone().into())
        })
    }

    /// Switching to another room ends the current call.
    #[wasm_bindgen(js_name = joinRoom)]
    pub fn join_room(&self, room_id: String, display_name: String) -> js_sys::Promise {
        let engine = self.conn.engine.clone();
        wasm_bindgen_futures::future_to_promise(async move {
            engine.join_room(room_id, display_name).await;
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen(js_name = leaveRoom)]
    pub fn leave_room(&self) -> js_sys::Promise {
        let engine = self.conn.engine.clone();
        wasm_bindgen_futures::future_to_promise(async move {
            engine.leave_room().await;
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen(js_name = placeCall)]
    pub fn place_call(&self, target: String) -> js_sys::Promise {
        let engine = self.conn.engine.clone();
        wasm_bindgen_futures::future_to_promise(async move {
            let target: ConnectionId = target
                .parse()
                .map_err(|e| JsValue::from_str(&format!("{}", e)))?;
            engine.place_call(target).await.map_err(to_js_error)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen(js_name = hangUp)]
    pub fn hang_up(&self) -> js_sys::Promise {
        let engine = self.conn.engine.clone();
        wasm_bindgen_futures::future_to_promise(async move {
            engine.hang_up().await.map_err(to_js_error)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Returns `true` when audio is now muted, `undefined` without a microphone.
    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&self) -> Option<bool> {
        self.conn.engine.toggle_mute()
    }

    /// Returns `true` when video is now off, `undefined` without a camera.
    #[wasm_bindgen(js_name = toggleVideo)]
    pub fn toggle_video(&self) -> Option<bool> {
        self.conn.engine.toggle_video()
    }

    pub fn state(&self) -> JsValue {
        to_js(&self.conn.engine.state())
    }

    #[wasm_bindgen(js_name = connectionId)]
    pub fn connection_id(&self) -> Option<String> {
        self.conn.engine.connection_id().map(|id| id.to_string())
    }

    pub fn roster(&self) -> JsValue {
        to_js(&self.conn.engine.roster())
    }

    /// Hangs up, releases the camera and closes the socket for good.
    pub fn close(&self) -> js_sys::Promise {
        let conn = self.conn.clone();
        wasm_bindgen_futures::future_to_promise(async move {
            conn.socket.borrow_mut().closing = true;
            conn.engine.leave_room().await;
            conn.engine.stop_local_media();
            if let Some(ws) = conn.signal.replace(None) {
                let _ = ws.close();
            }
            Ok(JsValue::UNDEFINED)
        })
    }
}

impl Connection {
    fn connect(&self) -> Result<(), JsValue> {
        let url = self.socket.borrow().url.clone();
        let ws = WebSocket::new(&url)?;

        let onopen = {
            let conn = self.clone();
            Closure::<dyn FnMut(JsValue)>::wrap(Box::new(move |_| {
                Logger::info("Signaling socket open");
                conn.socket.borrow_mut().attempt = 0;
                let engine = conn.engine.clone();
                // Replays the remembered room and drops any call that lived
                // on the previous socket.
                spawn_local(async move { engine.on_transport_reconnected().await });
            }))
        };
        ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));

        let onmessage = {
            let engine = self.engine.clone();
            Closure::<dyn FnMut(JsValue)>::wrap(Box::new(move |e: JsValue| {
                let Some(text) = e
                    .dyn_into::<web_sys::MessageEvent>()
                    .ok()
                    .and_then(|e| e.data().as_string())
                else {
                    return;
                };

                match serde_json::from_str::<SignalMessage>(&text) {
                    Ok(msg) => {
                        let engine = engine.clone();
                        spawn_local(async move { engine.handle_signal(msg).await });
                    }
                    Err(e) => Logger::warn(&format!("Bad signal from server: {}", e)),
                }
            }))
        };
        ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));

        let onclose = {
            let conn = self.clone();
            Closure::<dyn FnMut(JsValue)>::wrap(Box::new(move |_| {
                if conn.socket.borrow().closing {
                    return;
                }
                Logger::warn("Signaling socket closed");
                conn.signal.replace(None);
                conn.schedule_reconnect();
            }))
        };
        ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));

        self.signal.replace(Some(ws));
        self.socket.borrow_mut().handlers = vec![onopen, onmessage, onclose];
        Ok(())
    }

    fn schedule_reconnect(&self) {
        let delay = {
            let mut socket = self.socket.borrow_mut();
            let delay = socket.policy.delay_for(socket.attempt);
            socket.attempt += 1;
            delay
        };
        let Some(delay) = delay else {
            Logger::warn("Giving up on the signaling server");
            return;
        };

        let Some(window) = web_sys::window() else {
            return;
        };
        let conn = self.clone();
        let retry = Closure::once_into_js(move || {
            if conn.socket.borrow().closing {
                return;
            }
            if let Err(e) = conn.connect() {
                Logger::error("Reconnect failed", &e);
                conn.schedule_reconnect();
            }
        });

        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        if let Err(e) = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(retry.unchecked_ref(), millis)
        {
            Logger::error("Could not schedule reconnect", &e);
        }
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn remote_stream_event(stream: Option<MediaStream>) -> JsValue {
    let event = js_sys::Object::new();
    let stream: JsValue = stream.map(Into::into).unwrap_or(JsValue::NULL);
    let _ = js_sys::Reflect::set(&event, &"type".into(), &"remoteStream".into());
    let _ = js_sys::Reflect::set(&event, &"stream".into(), &stream);
    event.into()
}
