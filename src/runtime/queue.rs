//! Unbounded event queue between producers and the run loop.

use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Create a connected sender/receiver pair.
///
/// The queue has no capacity limit: sending never waits, and a slow machine
/// simply falls behind. Events from one sender arrive in the order they were
/// sent.
pub fn event_queue<E>() -> (EventSender<E>, EventReceiver<E>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, EventReceiver { rx })
}

/// Returned when the receiving machine is gone. Carries the undelivered event.
#[derive(Debug, PartialEq, Eq)]
pub struct QueueClosed<E>(pub E);

impl<E> fmt::Display for QueueClosed<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("event queue is closed")
    }
}

impl<E: fmt::Debug> std::error::Error for QueueClosed<E> {}

/// Producer side of the queue. Cheap to clone and safe to share across tasks.
pub struct EventSender<E> {
    tx: mpsc::UnboundedSender<E>,
}

impl<E> Clone for EventSender<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<E> fmt::Debug for EventSender<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSender")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl<E: Send + 'static> EventSender<E> {
    /// Append an event. Never blocks.
    pub fn send(&self, event: E) -> Result<(), QueueClosed<E>> {
        self.tx.send(event).map_err(|err| QueueClosed(err.0))
    }

    /// Append an event once `delay` has elapsed.
    ///
    /// Spawns onto the current Tokio runtime. If the queue closes before the
    /// delay is over, the event is dropped.
    pub fn send_after(&self, event: E, delay: Duration) -> JoinHandle<()> {
        let sender = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if sender.send(event).is_err() {
                tracing::debug!("Dropping delayed event, queue closed");
            }
        })
    }

    /// Whether the receiving side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side of the queue. Owned by exactly one machine.
pub struct EventReceiver<E> {
    rx: mpsc::UnboundedReceiver<E>,
}

impl<E> fmt::Debug for EventReceiver<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventReceiver").finish_non_exhaustive()
    }
}

impl<E> EventReceiver<E> {
    /// Wait for the next event. Returns `None` once every sender is gone and
    /// the buffer is empty.
    pub async fn recv(&mut self) -> Option<E> {
        self.rx.recv().await
    }

    /// Take the next event if one is already buffered.
    pub fn try_recv(&mut self) -> Option<E> {
        self.rx.try_recv().ok()
    }

    /// Stop accepting new events. Buffered events can still be received.
    pub fn close(&mut self) {
        self.rx.close();
    }
}
