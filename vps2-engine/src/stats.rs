//! Monotonic usage counters, updated from the dispatch context and read by
//! the statistics interface.
//!
//! Counters live behind a mutex so a snapshot is a single coherent copy; a
//! reader can observe the state before or after an update, never halfway
//! through one. Queue overflow counts are kept by [`crate::queue::ByteQueue`]
//! itself and joined in at snapshot time by the device layer.

use parking_lot::Mutex;

use crate::frame::MouseReport;

/// Counters kept for a keyboard device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardCounters {
    pub presses: u64,
    pub releases: u64,
    pub unmapped: u64,
    pub combos: u64,
}

/// Shared keyboard counter block.
#[derive(Debug, Default)]
pub struct KeyboardStats {
    inner: Mutex<KeyboardCounters>,
}

impl KeyboardStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Coherent copy of all counters.
    pub fn snapshot(&self) -> KeyboardCounters {
        *self.inner.lock()
    }

    pub(crate) fn note_press(&self) {
        self.inner.lock().presses += 1;
    }

    pub(crate) fn note_release(&self) {
        self.inner.lock().releases += 1;
    }

    pub(crate) fn note_unmapped(&self) {
        self.inner.lock().unmapped += 1;
    }

    pub(crate) fn note_combos(&self, matched: u64) {
        if matched > 0 {
            self.inner.lock().combos += matched;
        }
    }
}

/// Counters kept for a mouse device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseCounters {
    /// Frames that passed validation and were decoded.
    pub frames: u64,
    /// Frames rejected by the validity-bit check.
    pub invalid_frames: u64,
    /// Sum of the per-button click counters.
    pub clicks: u64,
    pub left_clicks: u64,
    pub right_clicks: u64,
    pub middle_clicks: u64,
    pub side_clicks: u64,
    pub forward_clicks: u64,
    /// Frames with a nonzero scroll delta.
    pub scroll_events: u64,
    /// Signed sum of horizontal displacement, post scaling.
    pub dx_total: i64,
    /// Signed sum of vertical displacement, post scaling and sign flip.
    pub dy_total: i64,
    /// Sum of `|dx| + |dy|` per frame.
    pub distance_total: u64,
}

/// Shared mouse counter block.
#[derive(Debug, Default)]
pub struct MouseStats {
    inner: Mutex<MouseCounters>,
}

impl MouseStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Coherent copy of all counters.
    pub fn snapshot(&self) -> MouseCounters {
        *self.inner.lock()
    }

    pub(crate) fn note_invalid(&self) {
        self.inner.lock().invalid_frames += 1;
    }

    /// Fold one decoded frame into the counters. A frame with several
    /// buttons held contributes one click per held button.
    pub(crate) fn note_frame(&self, report: &MouseReport) {
        let mut c = self.inner.lock();
        c.frames += 1;
        if report.left {
            c.left_clicks += 1;
            c.clicks += 1;
        }
        if report.right {
            c.right_clicks += 1;
            c.clicks += 1;
        }
        if report.middle {
            c.middle_clicks += 1;
            c.clicks += 1;
        }
        if report.side {
            c.side_clicks += 1;
            c.clicks += 1;
        }
        if report.forward {
            c.forward_clicks += 1;
            c.clicks += 1;
        }
        if report.wheel != 0 {
            c.scroll_events += 1;
        }
        c.dx_total += i64::from(report.dx);
        c.dy_total += i64::from(report.dy);
        c.distance_total +=
            u64::from(report.dx.unsigned_abs()) + u64::from(report.dy.unsigned_abs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(dx: i32, dy: i32) -> MouseReport {
        MouseReport {
            left: false,
            right: false,
            middle: false,
            side: false,
            forward: false,
            dx,
            dy,
            wheel: 0,
        }
    }

    #[test]
    fn frame_accumulates_movement() {
        let stats = MouseStats::new();
        stats.note_frame(&report(10, -5));
        stats.note_frame(&report(-3, 2));

        let c = stats.snapshot();
        assert_eq!(c.frames, 2);
        assert_eq!(c.dx_total, 7);
        assert_eq!(c.dy_total, -3);
        assert_eq!(c.distance_total, 20);
    }

    #[test]
    fn clicks_count_per_held_button() {
        let stats = MouseStats::new();
        let mut r = report(0, 0);
        r.left = true;
        r.middle = true;
        stats.note_frame(&r);

        let c = stats.snapshot();
        assert_eq!(c.clicks, 2);
        assert_eq!(c.left_clicks, 1);
        assert_eq!(c.middle_clicks, 1);
        assert_eq!(c.right_clicks, 0);
    }

    #[test]
    fn scroll_counts_only_nonzero() {
        let stats = MouseStats::new();
        let mut r = report(0, 0);
        r.wheel = -1;
        stats.note_frame(&r);
        stats.note_frame(&report(1, 1));

        assert_eq!(stats.snapshot().scroll_events, 1);
    }

    #[test]
    fn invalid_touches_nothing_else() {
        let stats = MouseStats::new();
        stats.note_invalid();

        let c = stats.snapshot();
        assert_eq!(c.invalid_frames, 1);
        assert_eq!(
            c,
            MouseCounters {
                invalid_frames: 1,
                ..MouseCounters::default()
            }
        );
    }

    #[test]
    fn snapshot_is_idempotent() {
        let stats = KeyboardStats::new();
        stats.note_press();
        stats.note_combos(2);
        assert_eq!(stats.snapshot(), stats.snapshot());
    }
}
