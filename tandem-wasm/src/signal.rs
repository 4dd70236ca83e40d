use std::cell::RefCell;
use std::rc::Rc;
use tandem_client::{SignalError, SignalSink};
use tandem_core::SignalMessage;
use web_sys::WebSocket;

/// Sends over whichever socket is current; the client swaps it on reconnect.
#[derive(Clone, Default)]
pub struct WsSignal {
    ws: Rc<RefCell<Option<WebSocket>>>,
}

impl WsSignal {
    pub(crate) fn replace(&self, ws: Option<WebSocket>) -> Option<WebSocket> {
        std::mem::replace(&mut *self.ws.borrow_mut(), ws)
    }
}

impl SignalSink for WsSignal {
    fn send(&self, msg: SignalMessage) -> Result<(), SignalError> {
        let ws = self.ws.borrow();
        let Some(ws) = ws.as_ref().filter(|ws| ws.ready_state() == WebSocket::OPEN) else {
            return Err(SignalError::Closed);
        };

        let json = serde_json::to_string(&msg).map_err(|e| SignalError::Encode(e.to_string()))?;
        ws.send_with_str(&json).map_err(|_| SignalError::Closed)
    }
}
