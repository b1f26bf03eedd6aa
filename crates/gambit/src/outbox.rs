//! The bounded outbound queue between producers and the writer task.

use gambit_protocol::{Message, ProtocolError};
use gambit_transport::TransportError;
use tokio::sync::mpsc;

use crate::GambitError;

/// Cloneable handle for enqueuing outbound messages.
///
/// Messages reach the wire in the order they were enqueued. When the queue
/// is full, [`send`](Outbox::send) waits for the writer to catch up;
/// nothing is ever dropped.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: mpsc::Sender<Message>,
}

impl Outbox {
    /// Creates an outbox and the receiving end the writer task drains.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Enqueues `message`, waiting while the queue is full.
    ///
    /// # Errors
    /// [`ProtocolError::InvalidMessage`] for a game action a client may not
    /// send (terminal results, local-only button kinds).
    /// [`TransportError::ConnectionClosed`] once the writer has stopped.
    pub async fn send(&self, message: Message) -> Result<(), GambitError> {
        if let Message::GameAction(action) = &message {
            if !action.action.is_client_sendable() {
                return Err(ProtocolError::InvalidMessage(format!(
                    "clients cannot send {:?}",
                    action.action
                ))
                .into());
            }
        }

        let msg_type = message.msg_type();
        self.tx.send(message).await.map_err(|_| {
            TransportError::ConnectionClosed("outbound queue closed".into())
        })?;
        tracing::trace!(%msg_type, "message queued");
        Ok(())
    }

    /// Free slots left in the queue.
    pub fn capacity(&self) -> usize {
        self.tx.capacity()
    }

    /// Returns `true` once the writer has stopped draining.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
