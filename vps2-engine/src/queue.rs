//! Fixed-capacity circular byte queue between producer and consumer.
//!
//! The producer side ([`ByteQueue::push`]) never blocks: when the queue is
//! full the byte is dropped, the overflow counter goes up, and a rate-limited
//! warning is logged. The consumer side ([`ByteQueue::pop`]) never blocks
//! either and returns `None` on empty. One slot is always kept free so a full
//! queue is distinguishable from an empty one by the head/tail indices alone.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::warn;

/// Minimum interval between two "queue full" warnings per queue.
const OVERFLOW_WARN_INTERVAL: Duration = Duration::from_secs(1);

/// What happened to a pushed byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Byte stored in the queue.
    Stored,
    /// Queue was full; byte discarded and the overflow counter incremented.
    Dropped,
}

/// Bounded FIFO of raw input bytes.
///
/// `push` and `pop` may run concurrently from different contexts; each
/// operation holds the internal lock for the few instructions it takes to
/// move one byte, so neither side can observe a half-updated head or tail.
pub struct ByteQueue {
    inner: Mutex<Inner>,
    capacity: usize,
}

struct Inner {
    slots: Box<[u8]>,
    head: usize,
    tail: usize,
    overflows: u64,
    last_warn: Option<Instant>,
    dropped_since_warn: u64,
}

impl ByteQueue {
    /// Create a queue with room for `capacity - 1` bytes (one slot stays
    /// empty to disambiguate full from empty).
    ///
    /// # Panics
    ///
    /// Panics if `capacity < 2`, which would leave no usable slot.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity >= 2, "ByteQueue capacity must be at least 2");
        Self {
            inner: Mutex::new(Inner {
                slots: vec![0u8; capacity].into_boxed_slice(),
                head: 0,
                tail: 0,
                overflows: 0,
                last_warn: None,
                dropped_since_warn: 0,
            }),
            capacity,
        }
    }

    /// Append one byte. Never blocks; a full queue drops the byte.
    pub fn push(&self, byte: u8) -> PushOutcome {
        let mut inner = self.inner.lock();
        let next = (inner.head + 1) % self.capacity;
        if next == inner.tail {
            inner.overflows += 1;
            inner.dropped_since_warn += 1;
            let now = Instant::now();
            let due = inner
                .last_warn
                .map_or(true, |t| now.duration_since(t) >= OVERFLOW_WARN_INTERVAL);
            if due {
                warn!(
                    "input queue full, dropped {} byte(s) ({} total overflows)",
                    inner.dropped_since_warn, inner.overflows
                );
                inner.last_warn = Some(now);
                inner.dropped_since_warn = 0;
            }
            return PushOutcome::Dropped;
        }
        let head = inner.head;
        inner.slots[head] = byte;
        inner.head = next;
        PushOutcome::Stored
    }

    /// Remove and return the oldest byte, or `None` when empty.
    pub fn pop(&self) -> Option<u8> {
        let mut inner = self.inner.lock();
        if inner.head == inner.tail {
            return None;
        }
        let byte = inner.slots[inner.tail];
        inner.tail = (inner.tail + 1) % self.capacity;
        Some(byte)
    }

    /// Number of bytes currently queued.
    pub fn len(&self) -> usize {
        let inner = self.inner.lock();
        (inner.head + self.capacity - inner.tail) % self.capacity
    }

    /// True when no bytes are queued.
    pub fn is_empty(&self) -> bool {
        let inner = self.inner.lock();
        inner.head == inner.tail
    }

    /// Configured slot count (usable space is one less).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total bytes dropped because the queue was full.
    pub fn overflows(&self) -> u64 {
        self.inner.lock().overflows
    }
}
