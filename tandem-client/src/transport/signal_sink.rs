use crate::error::SignalError;
use tandem_core::SignalMessage;

/// Outbound half of the signaling socket.
pub trait SignalSink: 'static {
    fn send(&self, msg: SignalMessage) -> Result<(), SignalError>;
}
