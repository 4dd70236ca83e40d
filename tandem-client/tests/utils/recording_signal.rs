use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tandem_client::{SignalError, SignalSink};
use tandem_core::SignalMessage;

/// Captures everything the engine sends to the server.
#[derive(Clone, Default)]
pub struct RecordingSignal {
    sent: Rc<RefCell<Vec<SignalMessage>>>,
    closed: Rc<Cell<bool>>,
}

impl RecordingSignal {
    pub fn sent(&self) -> Vec<SignalMessage> {
        self.sent.borrow().clone()
    }

    pub fn take(&self) -> Vec<SignalMessage> {
        self.sent.borrow_mut().drain(..).collect()
    }

    pub fn count_matching(&self, pred: impl Fn(&SignalMessage) -> bool) -> usize {
        self.sent.borrow().iter().filter(|m| pred(m)).count()
    }

    pub fn set_closed(&self, closed: bool) {
        self.closed.set(closed);
    }
}

impl SignalSink for RecordingSignal {
    fn send(&self, msg: SignalMessage) -> Result<(), SignalError> {
        if self.closed.get() {
            return Err(SignalError::Closed);
        }
        self.sent.borrow_mut().push(msg);
        Ok(())
    }
}
