// Outbound side of the host connection
//
// Calls are fire-and-forget. A full channel drops the call with a warning
// rather than blocking the panel; the host is the source of truth and will
// resend state on the next update anyway.

use crate::events::HostCall;
use tokio::sync::mpsc::{self, error::TrySendError};

#[derive(Debug, Clone)]
pub struct HostBridge {
    tx: mpsc::Sender<HostCall>,
}

impl HostBridge {
    pub fn new(tx: mpsc::Sender<HostCall>) -> Self {
        Self { tx }
    }

    /// Bridge plus the receiving end, with room for `buffer` pending calls
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<HostCall>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self::new(tx), rx)
    }

    /// Returns false when the call was dropped
    pub fn send(&self, call: HostCall) -> bool {
        let name = call.name();
        match self.tx.try_send(call) {
            Ok(()) => {
                tracing::debug!("Host call queued: {}", name);
                true
            }
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Host call buffer full, dropped {}", name);
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("Host channel closed, dropped {}", name);
                false
            }
        }
    }
}
