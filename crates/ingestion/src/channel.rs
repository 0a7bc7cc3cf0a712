//! Bounded frame channel with stop sentinel
//!
//! `send` blocks while the queue is full, `receive` blocks while it is empty
//! and not stopped. After `send_stop` the queue still delivers everything
//! already buffered, then `receive` returns `None` without blocking.
//! Nothing can be enqueued after the stop.
//!
//! Dropping every sender has the same effect as posting the stop, so a
//! producer that unwinds can never leave its receivers blocked.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_channel::{bounded, Receiver, Sender};
use contracts::SharedFrame;
use tracing::trace;

use crate::error::{IngestionError, Result};

/// Sending half of a frame channel
pub type FrameSender = ChannelSender<SharedFrame>;

/// Receiving half of a frame channel
pub type FrameReceiver = ChannelReceiver<SharedFrame>;

/// Create a named bounded channel
///
/// Zero capacity is treated as 1.
pub fn channel<T>(
    name: impl Into<String>,
    capacity: usize,
) -> (ChannelSender<T>, ChannelReceiver<T>) {
    let (tx, rx) = bounded(capacity.max(1));
    let name: Arc<str> = Arc::from(name.into());
    let stopped = Arc::new(AtomicBool::new(false));

    (
        ChannelSender {
            name: Arc::clone(&name),
            tx,
            stopped,
        },
        ChannelReceiver { name, rx },
    )
}

/// Sending half
#[derive(Debug)]
pub struct ChannelSender<T> {
    name: Arc<str>,
    tx: Sender<T>,
    stopped: Arc<AtomicBool>,
}

impl<T> Clone for ChannelSender<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            tx: self.tx.clone(),
            stopped: Arc::clone(&self.stopped),
        }
    }
}

impl<T> ChannelSender<T> {
    /// Channel name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enqueue an item, blocking while the channel is full
    ///
    /// # Errors
    /// - `ChannelStopped` if the stop was already posted
    /// - `ChannelClosed` if every receiver has been dropped
    pub fn send(&self, item: T) -> Result<()> {
        self.tx.send_blocking(item).map_err(|_| self.closed_error())
    }

    /// Post the stop sentinel
    ///
    /// Returns `true` if this call posted it, `false` if the channel was
    /// already stopped or closed.
    pub fn send_stop(&self) -> bool {
        self.stopped.store(true, Ordering::SeqCst);
        let posted = self.tx.close();
        trace!(channel = %self.name, posted, "stop sentinel");
        posted
    }

    /// Whether the channel accepts no more items
    pub fn is_stopped(&self) -> bool {
        self.tx.is_closed()
    }

    /// Number of buffered items (snapshot)
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    /// Whether the buffer is empty (snapshot)
    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }

    /// Channel capacity
    pub fn capacity(&self) -> usize {
        self.tx.capacity().unwrap_or(usize::MAX)
    }

    fn closed_error(&self) -> IngestionError {
        if self.stopped.load(Ordering::SeqCst) {
            IngestionError::ChannelStopped {
                channel: self.name.to_string(),
            }
        } else {
            IngestionError::ChannelClosed {
                channel: self.name.to_string(),
            }
        }
    }
}

/// Receiving half
#[derive(Debug)]
pub struct ChannelReceiver<T> {
    name: Arc<str>,
    rx: Receiver<T>,
}

impl<T> ChannelReceiver<T> {
    /// Channel name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dequeue the next item, blocking while the channel is empty
    ///
    /// Returns `None` once the stop is posted and the buffer is drained.
    pub fn receive(&self) -> Option<T> {
        self.rx.recv_blocking().ok()
    }

    /// Dequeue without blocking
    pub fn try_receive(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Whether the stop has been posted (items may still be buffered)
    pub fn is_stopped(&self) -> bool {
        self.rx.is_closed()
    }

    /// Number of buffered items (snapshot)
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether the buffer is empty (snapshot)
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl<T> Iterator for ChannelReceiver<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.receive()
    }
}
