//! Message queues for inter-component communication.

use std::sync::Arc;

use crate::{IgcError, Result};

/// MPMC (multi-producer, multi-consumer) queue backed by flume.
///
/// Each message is consumed by exactly one receiver. Bounded queues back the
/// engine inbox; unbounded ones back the event channel, which must never drop
/// an outbound message.
pub struct Queue<T> {
    receiver: flume::Receiver<T>,
    sender: flume::Sender<T>,
}

impl<T> Queue<T> {
    /// create a bounded queue
    pub fn new(cap: usize) -> Arc<Self> {
        let (tx, rx) = flume::bounded(cap);

        Arc::new(Self {
            receiver: rx,
            sender: tx,
        })
    }

    /// create a queue without a capacity limit
    pub fn unbounded() -> Arc<Self> {
        let (tx, rx) = flume::unbounded();

        Arc::new(Self {
            receiver: rx,
            sender: tx,
        })
    }

    /// send a message without waiting, failing when the queue is full
    pub fn send(
        &self,
        msg: T,
    ) -> Result<()> {
        self.sender.try_send(msg).map_err(|e| IgcError::Queue(e.to_string()))
    }

    /// receive a message from the queue asynchronously
    pub async fn next_async(&self) -> Option<T> {
        self.receiver.recv_async().await.ok()
    }

    /// number of messages waiting
    pub fn len(&self) -> usize {
        self.receiver.len()
    }
}

#[cfg(test)]
mod test {
    use super::Queue;

    #[tokio::test]
    async fn test_bounded_queue() {
        let queue = Queue::new(2);
        queue.send(1).unwrap();
        queue.send(2).unwrap();
        assert!(queue.send(3).is_err());

        assert_eq!(queue.next_async().await, Some(1));
        assert_eq!(queue.next_async().await, Some(2));
    }

    #[tokio::test]
    async fn test_unbounded_queue_keeps_every_message() {
        let queue = Queue::unbounded();
        for i in 0..5000 {
            queue.send(i).unwrap();
        }
        assert_eq!(queue.len(), 5000);

        for i in 0..5000 {
            assert_eq!(queue.next_async().await, Some(i));
        }
        assert_eq!(queue.len(), 0);
    }
}
