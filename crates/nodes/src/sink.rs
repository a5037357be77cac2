//! Outgoing event buffer between the orchestrator and the transport.
//!
//! The orchestrator never sees wire framing: it pushes [`StreamEvent`] values
//! into an [`EventSink`] and the transport drains the paired receiver. Pushing
//! never blocks. When the receiver is dropped (the client went away), the sink
//! reports itself closed and the orchestrator stops at its next check.
//!
//! Status events go through [`EventSink::status`], which borrows the sink; the
//! terminal event goes through [`EventSink::finish`], which consumes it. At
//! most one terminal event can be sent and nothing can follow it.

use pipeline::{ChatError, Draft, StreamEvent};
use tokio::sync::mpsc;

/// Creates a sink and the receiver the transport drains.
pub fn channel() -> (EventSink, mpsc::UnboundedReceiver<StreamEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSink { tx }, rx)
}

/// Producer half of one invocation's event stream.
#[derive(Debug)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<StreamEvent>,
}

impl EventSink {
    /// Pushes a status event. Returns `false` if the receiver is gone.
    pub fn status(&self, content: impl Into<String>) -> bool {
        self.tx.send(StreamEvent::Status(content.into())).is_ok()
    }

    /// Pushes the terminal event for `outcome` and closes the sink.
    pub fn finish(self, outcome: Result<Draft, ChatError>) {
        let event = match outcome {
            Ok(draft) => StreamEvent::Assistant(draft.into_string()),
            Err(err) => StreamEvent::Error(err.to_string()),
        };
        let _ = self.tx.send(event);
    }

    /// `true` once the receiver has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
