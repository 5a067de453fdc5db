//! Event sink boundary
//!
//! The engine stops at typed events; delivering them to an input subsystem,
//! a UI, or a test harness is the sink's job. The dispatch task calls the
//! sink from its own context, strictly in byte-arrival order, and closes
//! every logical unit (one key transition, one pointer frame) with
//! [`EventSink::sync`].

use std::sync::Arc;

use parking_lot::Mutex;

use crate::keymap::KeyCode;
use crate::scancode::KeyAction;

/// Pointer button identity as delivered to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Side,
    Forward,
}

/// Relative motion axis as delivered to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelAxis {
    X,
    Y,
    Wheel,
}

/// Consumer of decoded input events.
///
/// Button state is reported for all five buttons on every pointer frame, not
/// just the ones that changed; relative motion is reported only for nonzero
/// deltas. `sync` marks the end of one coherent unit and is the point where
/// a consumer should apply everything received since the previous marker.
pub trait EventSink: Send + 'static {
    fn key(&mut self, code: KeyCode, action: KeyAction);
    fn button(&mut self, button: MouseButton, pressed: bool);
    fn relative(&mut self, axis: RelAxis, delta: i32);
    fn sync(&mut self);
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn key(&mut self, _code: KeyCode, _action: KeyAction) {}
    fn button(&mut self, _button: MouseButton, _pressed: bool) {}
    fn relative(&mut self, _axis: RelAxis, _delta: i32) {}
    fn sync(&mut self) {}
}

/// One call captured by [`RecordingSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkRecord {
    Key { code: KeyCode, action: KeyAction },
    Button { button: MouseButton, pressed: bool },
    Relative { axis: RelAxis, delta: i32 },
    Sync,
}

/// Sink that appends every call to a shared log.
///
/// Clones share the log: hand one clone to the dispatch task and keep
/// another to inspect what arrived.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<SinkRecord>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn records(&self) -> Vec<SinkRecord> {
        self.records.lock().clone()
    }

    /// Drains the log, leaving it empty.
    pub fn take(&self) -> Vec<SinkRecord> {
        std::mem::take(&mut *self.records.lock())
    }

    /// Number of sync markers recorded, i.e. completed logical units.
    pub fn sync_count(&self) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|r| matches!(r, SinkRecord::Sync))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn key(&mut self, code: KeyCode, action: KeyAction) {
        self.records.lock().push(SinkRecord::Key { code, action });
    }

    fn button(&mut self, button: MouseButton, pressed: bool) {
        self.records.lock().push(SinkRecord::Button { button, pressed });
    }

    fn relative(&mut self, axis: RelAxis, delta: i32) {
        self.records.lock().push(SinkRecord::Relative { axis, delta });
    }

    fn sync(&mut self) {
        self.records.lock().push(SinkRecord::Sync);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_clones_share_log() {
        let sink = RecordingSink::new();
        let mut writer = sink.clone();
        writer.key(KeyCode::A, KeyAction::Press);
        writer.sync();

        assert_eq!(
            sink.records(),
            vec![
                SinkRecord::Key {
                    code: KeyCode::A,
                    action: KeyAction::Press
                },
                SinkRecord::Sync,
            ]
        );
        assert_eq!(sink.sync_count(), 1);
    }

    #[test]
    fn take_drains_the_log() {
        let sink = RecordingSink::new();
        let mut writer = sink.clone();
        writer.relative(RelAxis::X, 7);

        assert_eq!(sink.take().len(), 1);
        assert!(sink.records().is_empty());
    }

    #[test]
    fn null_sink_swallows_everything() {
        let mut sink = NullSink;
        sink.key(KeyCode::A, KeyAction::Press);
        sink.button(MouseButton::Left, true);
        sink.relative(RelAxis::Wheel, -1);
        sink.sync();
    }
}
