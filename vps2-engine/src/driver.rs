//! Dispatch driver
//!
//! One dispatch task per device drains the shared [`ByteQueue`], feeds each
//! byte through the device's decoder, and forwards completed events to the
//! sink. Producers never decode; they push bytes and ring the doorbell.
//!
//! ```text
//! [producers]  ── push ──►  [ByteQueue]  ── pop ──►  [dispatch task]
//!      │                                                  │
//!      └────────────── doorbell (mpsc) ───────────────────┘
//! ```
//!
//! The task parks on the doorbell while the queue is empty and drains to
//! empty on every wake. Doorbell capacity is small on purpose: a send that
//! fails because the channel is full means a wake is already pending, and
//! the drain it triggers will see the bytes pushed here.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::frame::{FrameAssembler, MouseReport};
use crate::queue::{ByteQueue, PushOutcome};
use crate::scancode::{KeyEvent, ScanCodeTranslator};
use crate::sink::{EventSink, MouseButton, RelAxis};

/// Wakes are coalesced, so a handful of slots is always enough.
const DOORBELL_CAPACITY: usize = 4;

/// Fully decoded event produced by an [`InputDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedEvent {
    Key(KeyEvent),
    Mouse(MouseReport),
}

/// Per-device byte decoder driven by the dispatch task.
///
/// `feed` consumes exactly one byte and returns an event only when that byte
/// completes one (multi-byte decoders buffer internally).
pub trait InputDecoder: Send + 'static {
    fn feed(&mut self, byte: u8) -> Option<DecodedEvent>;
}

impl InputDecoder for ScanCodeTranslator {
    fn feed(&mut self, byte: u8) -> Option<DecodedEvent> {
        ScanCodeTranslator::feed(self, byte).map(DecodedEvent::Key)
    }
}

impl InputDecoder for FrameAssembler {
    fn feed(&mut self, byte: u8) -> Option<DecodedEvent> {
        FrameAssembler::feed(self, byte).map(DecodedEvent::Mouse)
    }
}

enum DriverMessage {
    /// Bytes are waiting in the queue.
    Wake,
    /// Drain, then acknowledge once everything pushed so far is dispatched.
    Settle(oneshot::Sender<()>),
}

// ============================================================================
// DriverHandle
// ============================================================================

/// Producer-side handle to a spawned dispatch task.
///
/// Dropping the handle without calling [`shutdown`](DriverHandle::shutdown)
/// detaches the task; it drains whatever is already queued and exits.
pub struct DriverHandle {
    queue: Arc<ByteQueue>,
    doorbell: mpsc::Sender<DriverMessage>,
    task: JoinHandle<()>,
    label: &'static str,
}

impl DriverHandle {
    /// Spawns a dispatch task for `decoder` and `sink` on the current tokio
    /// runtime. `label` names the device in log output.
    pub fn spawn<D, S>(queue: Arc<ByteQueue>, decoder: D, sink: S, label: &'static str) -> Self
    where
        D: InputDecoder,
        S: EventSink,
    {
        let (doorbell, inbox) = mpsc::channel(DOORBELL_CAPACITY);
        let task = tokio::spawn(dispatch_task(
            Arc::clone(&queue),
            decoder,
            sink,
            inbox,
            label,
        ));
        Self {
            queue,
            doorbell,
            task,
            label,
        }
    }

    /// Pushes `bytes` in order and wakes the dispatch task. Returns how many
    /// were stored; the rest were dropped by a full queue.
    pub fn submit(&self, bytes: &[u8]) -> usize {
        let mut stored = 0;
        for &byte in bytes {
            if self.queue.push(byte) == PushOutcome::Stored {
                stored += 1;
            }
        }
        // A full doorbell already carries a wake that will drain these bytes.
        let _ = self.doorbell.try_send(DriverMessage::Wake);
        stored
    }

    /// The queue this driver drains.
    pub fn queue(&self) -> &ByteQueue {
        &self.queue
    }

    /// Resolves once every byte pushed before this call has been decoded and
    /// its events delivered to the sink.
    pub async fn settle(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self
            .doorbell
            .send(DriverMessage::Settle(ack_tx))
            .await
            .is_ok()
        {
            let _ = ack_rx.await;
        }
    }

    /// Stops the dispatch task. Consumes the handle, so no new bytes can be
    /// submitted; bytes already queued are drained before the task exits.
    pub async fn shutdown(self) {
        let DriverHandle {
            queue: _,
            doorbell,
            task,
            label,
        } = self;
        drop(doorbell);
        if task.await.is_err() {
            warn!("{} dispatch task ended abnormally", label);
        }
    }
}

// ============================================================================
// Dispatch task
// ============================================================================

async fn dispatch_task<D, S>(
    queue: Arc<ByteQueue>,
    mut decoder: D,
    mut sink: S,
    mut inbox: mpsc::Receiver<DriverMessage>,
    label: &'static str,
) where
    D: InputDecoder,
    S: EventSink,
{
    debug!("{} dispatch task started", label);

    while let Some(message) = inbox.recv().await {
        drain(&queue, &mut decoder, &mut sink);
        if let DriverMessage::Settle(ack) = message {
            let _ = ack.send(());
        }
    }

    // All senders gone; pick up anything pushed since the last wake.
    drain(&queue, &mut decoder, &mut sink);
    debug!("{} dispatch task stopped", label);
}

/// Pops until the queue reports empty, forwarding every completed event.
fn drain<D, S>(queue: &ByteQueue, decoder: &mut D, sink: &mut S)
where
    D: InputDecoder,
    S: EventSink,
{
    while let Some(byte) = queue.pop() {
        if let Some(event) = decoder.feed(byte) {
            forward(&event, sink);
        }
    }
}

/// Emits one decoded event as discrete sink calls closed by a sync marker.
///
/// Pointer frames always report all five button states; motion and wheel
/// are reported only when nonzero.
fn forward<S: EventSink>(event: &DecodedEvent, sink: &mut S) {
    match event {
        DecodedEvent::Key(key) => {
            sink.key(key.code, key.action);
        }
        DecodedEvent::Mouse(report) => {
            sink.button(MouseButton::Left, report.left);
            sink.button(MouseButton::Right, report.right);
            sink.button(MouseButton::Middle, report.middle);
            sink.button(MouseButton::Side, report.side);
            sink.button(MouseButton::Forward, report.forward);
            if report.dx != 0 {
                sink.relative(RelAxis::X, report.dx);
            }
            if report.dy != 0 {
                sink.relative(RelAxis::Y, report.dy);
            }
            if report.wheel != 0 {
                sink.relative(RelAxis::Wheel, i32::from(report.wheel));
            }
        }
    }
    sink.sync();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::KeyCode;
    use crate::modifier::{LedState, ModifierState};
    use crate::scancode::KeyAction;
    use crate::sink::{RecordingSink, SinkRecord};
    use crate::stats::KeyboardStats;

    fn keyboard_driver(capacity: usize, sink: RecordingSink) -> (DriverHandle, Arc<KeyboardStats>) {
        let stats = Arc::new(KeyboardStats::new());
        let translator = ScanCodeTranslator::new(
            Arc::new(ModifierState::new()),
            Arc::new(LedState::new()),
            Arc::clone(&stats),
        );
        let queue = Arc::new(ByteQueue::with_capacity(capacity));
        (
            DriverHandle::spawn(queue, translator, sink, "kbd-test"),
            stats,
        )
    }

    #[tokio::test]
    async fn settle_flushes_submitted_bytes() {
        let sink = RecordingSink::new();
        let (driver, stats) = keyboard_driver(64, sink.clone());

        assert_eq!(driver.submit(&[0x1E, 0x9E]), 2);
        driver.settle().await;

        assert_eq!(
            sink.records(),
            vec![
                SinkRecord::Key {
                    code: KeyCode::A,
                    action: KeyAction::Press
                },
                SinkRecord::Sync,
                SinkRecord::Key {
                    code: KeyCode::A,
                    action: KeyAction::Release
                },
                SinkRecord::Sync,
            ]
        );
        let counters = stats.snapshot();
        assert_eq!(counters.presses, 1);
        assert_eq!(counters.releases, 1);
        driver.shutdown().await;
    }

    #[tokio::test]
    async fn settle_on_idle_driver_returns() {
        let sink = RecordingSink::new();
        let (driver, _stats) = keyboard_driver(64, sink.clone());
        driver.settle().await;
        assert!(sink.records().is_empty());
        driver.shutdown().await;
    }

    #[tokio::test]
    async fn shutdown_drains_pending_bytes() {
        // Single-threaded test runtime: the task cannot run before we await,
        // so these bytes are still queued when shutdown begins.
        let sink = RecordingSink::new();
        let (driver, _stats) = keyboard_driver(64, sink.clone());
        driver.submit(&[0x1E]);
        driver.shutdown().await;

        assert_eq!(sink.sync_count(), 1);
    }

    #[tokio::test]
    async fn repeated_submits_coalesce_without_loss() {
        let sink = RecordingSink::new();
        let (driver, stats) = keyboard_driver(256, sink.clone());

        // Far more wakes than doorbell slots.
        for _ in 0..50 {
            driver.submit(&[0x1E, 0x9E]);
        }
        driver.settle().await;

        let counters = stats.snapshot();
        assert_eq!(counters.presses, 50);
        assert_eq!(counters.releases, 50);
        assert_eq!(sink.sync_count(), 100);
        driver.shutdown().await;
    }

    #[tokio::test]
    async fn queue_overflow_is_visible_through_handle() {
        // Capacity 4 stores at most 3 bytes; the task is not polled until
        // the first await, so submit sees every drop.
        let sink = RecordingSink::new();
        let (driver, _stats) = keyboard_driver(4, sink.clone());

        assert_eq!(driver.submit(&[0x1E, 0x9E, 0x30, 0xB0, 0x2E]), 3);
        assert_eq!(driver.queue().overflows(), 2);
        driver.settle().await;

        assert_eq!(sink.sync_count(), 3);
        driver.shutdown().await;
    }
}
