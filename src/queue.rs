//! Bounded FIFO between message producers and the dispatch worker.
//!
//! Backed by an `embassy-sync` channel so producers on any task can hand off
//! to the single worker without heap allocation. A full queue makes `send`
//! wait for a free slot; nothing is dropped.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};

use crate::message::{AppMessage, MessageKind};

/// Queue depth.
pub const QUEUE_DEPTH: usize = 3;

/// Fixed-capacity message queue. Many producers, one consumer.
pub struct AppQueue {
    channel: Channel<CriticalSectionRawMutex, AppMessage, QUEUE_DEPTH>,
}

impl AppQueue {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Enqueue a message, waiting while the queue is full.
    ///
    /// Always returns `true` once the message is stored.
    pub async fn send(&self, kind: MessageKind) -> bool {
        self.channel.send(AppMessage::new(kind)).await;
        true
    }

    /// Enqueue without waiting. Hands the kind back if all slots are taken.
    pub fn try_send(&self, kind: MessageKind) -> Result<(), MessageKind> {
        match self.channel.try_send(AppMessage::new(kind)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(msg)) => Err(msg.kind),
        }
    }

    /// Wait for the next message. Only the dispatch worker calls this.
    pub(crate) async fn receive(&self) -> AppMessage {
        self.channel.receive().await
    }

    /// Number of undelivered messages.
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    /// `true` when nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// `true` when a further `send` would wait.
    pub fn is_full(&self) -> bool {
        self.channel.is_full()
    }
}

impl Default for AppQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::pin::pin;
    use embassy_futures::{block_on, poll_once};

    #[test]
    fn test_fifo_order_single_producer() {
        let queue = AppQueue::new();
        block_on(async {
            assert!(queue.send(MessageKind::BringUpHttpFrontend).await);
            assert!(queue.send(MessageKind::StationConnectRequested).await);
            assert!(queue.send(MessageKind::StationGotAddress).await);

            assert_eq!(queue.receive().await.kind, MessageKind::BringUpHttpFrontend);
            assert_eq!(queue.receive().await.kind, MessageKind::StationConnectRequested);
            assert_eq!(queue.receive().await.kind, MessageKind::StationGotAddress);
        });
        assert!(queue.is_empty());
    }

    #[test]
    fn test_fourth_send_waits_for_free_slot() {
        let queue = AppQueue::new();
        for _ in 0..QUEUE_DEPTH {
            assert!(queue.try_send(MessageKind::StationConnectRequested).is_ok());
        }
        assert!(queue.is_full());

        let mut fourth = pin!(queue.send(MessageKind::StationGotAddress));
        assert!(poll_once(fourth.as_mut()).is_pending());
        assert_eq!(queue.len(), QUEUE_DEPTH);

        block_on(queue.receive());
        assert!(poll_once(fourth.as_mut()).is_ready());
        assert_eq!(queue.len(), QUEUE_DEPTH);
    }

    #[test]
    fn test_try_send_returns_kind_when_full() {
        let queue = AppQueue::new();
        for _ in 0..QUEUE_DEPTH {
            queue.try_send(MessageKind::BringUpHttpFrontend).unwrap();
        }
        assert_eq!(
            queue.try_send(MessageKind::StationGotAddress),
            Err(MessageKind::StationGotAddress)
        );
    }
}
