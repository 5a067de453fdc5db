//! Pointer-motion frame assembly and decoding.
//!
//! Frame layout, status byte first:
//!
//! ```text
//! Byte 0: [Yovf | Xovf | Ysign | Xsign | 1 | Middle | Right | Left]
//! Byte 1: horizontal movement, signed 8-bit
//! Byte 2: vertical movement, signed 8-bit
//! Byte 3: (extended mode only) scroll nibble | side/forward buttons
//! ```
//!
//! Bit 3 of the status byte is the validity marker; a frame without it is
//! counted as invalid and discarded without touching any other statistic.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::stats::MouseStats;

/// Status-byte (byte 0) bit assignments.
pub mod status {
    pub const LEFT: u8 = 1 << 0;
    pub const RIGHT: u8 = 1 << 1;
    pub const MIDDLE: u8 = 1 << 2;
    /// Validity marker, set in every well-formed frame.
    pub const ALWAYS_ONE: u8 = 1 << 3;
    pub const X_SIGN: u8 = 1 << 4;
    pub const Y_SIGN: u8 = 1 << 5;
    pub const X_OVERFLOW: u8 = 1 << 6;
    pub const Y_OVERFLOW: u8 = 1 << 7;
}

/// Extension-byte (byte 3) fields, present only in extended frames.
pub mod extension {
    /// Low nibble holds the scroll delta.
    pub const WHEEL_MASK: u8 = 0x0F;
    /// Sign bit of the scroll nibble.
    pub const WHEEL_SIGN: u8 = 0x08;
    pub const BTN_SIDE: u8 = 1 << 4;
    pub const BTN_FORWARD: u8 = 1 << 5;
}

/// Default movement scale, percent.
pub const DEFAULT_SCALE_PERCENT: u32 = 100;

/// Selectable frame length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLength {
    /// 3-byte frames: buttons and movement only.
    Standard,
    /// 4-byte frames: adds the scroll wheel and side/forward buttons.
    Extended,
}

impl FrameLength {
    pub const fn byte_len(self) -> usize {
        match self {
            FrameLength::Standard => 3,
            FrameLength::Extended => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FrameLength::Standard => "Standard",
            FrameLength::Extended => "IntelliMouse",
        }
    }
}

/// Live mouse configuration, shared between the control surface and the
/// assembler.
///
/// Values are stored as given; range enforcement is the control boundary's
/// job. The assembler re-reads both fields at frame boundaries, so a change
/// takes effect with the next frame at the latest.
#[derive(Debug)]
pub struct MouseSettings {
    scale_percent: AtomicU32,
    extended: AtomicBool,
}

impl Default for MouseSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl MouseSettings {
    /// Extended reporting at 100% scale.
    pub fn new() -> Self {
        Self {
            scale_percent: AtomicU32::new(DEFAULT_SCALE_PERCENT),
            extended: AtomicBool::new(true),
        }
    }

    pub fn scale_percent(&self) -> u32 {
        self.scale_percent.load(Ordering::Relaxed)
    }

    pub fn set_scale_percent(&self, percent: u32) {
        self.scale_percent.store(percent, Ordering::Relaxed);
    }

    pub fn frame_length(&self) -> FrameLength {
        if self.extended.load(Ordering::Relaxed) {
            FrameLength::Extended
        } else {
            FrameLength::Standard
        }
    }

    pub fn set_frame_length(&self, length: FrameLength) {
        self.extended
            .store(length == FrameLength::Extended, Ordering::Relaxed);
    }
}

/// Decoded content of one valid frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseReport {
    pub left: bool,
    pub right: bool,
    pub middle: bool,
    /// Extended frames only; always false in standard mode.
    pub side: bool,
    /// Extended frames only; always false in standard mode.
    pub forward: bool,
    /// Horizontal displacement after scaling.
    pub dx: i32,
    /// Vertical displacement after scaling and the wire-to-screen sign flip.
    pub dy: i32,
    /// Scroll delta in -8..=7; always 0 in standard mode.
    pub wheel: i8,
}

/// Accumulates raw bytes into frames and decodes completed ones.
pub struct FrameAssembler {
    settings: Arc<MouseSettings>,
    stats: Arc<MouseStats>,
    frame: [u8; 4],
    fill: usize,
    /// Frame length captured when the current frame's first byte arrived.
    expected: FrameLength,
}

impl FrameAssembler {
    pub fn new(settings: Arc<MouseSettings>, stats: Arc<MouseStats>) -> Self {
        let expected = settings.frame_length();
        Self {
            settings,
            stats,
            frame: [0; 4],
            fill: 0,
            expected,
        }
    }

    /// Feed one byte; returns a report when the byte completes a valid
    /// frame.
    ///
    /// An invalid frame only bumps the invalid counter; the assembler resets
    /// and keeps going. Bytes buffered before a frame-length switch are
    /// never decoded under the new length.
    pub fn feed(&mut self, byte: u8) -> Option<MouseReport> {
        let live = self.settings.frame_length();
        if self.fill == 0 {
            self.expected = live;
        } else if self.expected != live {
            debug!(
                "frame length switched mid-frame, dropping {} buffered byte(s)",
                self.fill
            );
            self.fill = 0;
            self.expected = live;
        }

        self.frame[self.fill] = byte;
        self.fill += 1;
        if self.fill < self.expected.byte_len() {
            return None;
        }
        self.fill = 0;
        self.decode()
    }

    fn decode(&self) -> Option<MouseReport> {
        let status = self.frame[0];
        if status & status::ALWAYS_ONE == 0 {
            self.stats.note_invalid();
            debug!("invalid frame, validity bit clear (status 0x{:02X})", status);
            return None;
        }

        if status & status::X_OVERFLOW != 0 {
            debug!("frame reports x overflow");
        }
        if status & status::Y_OVERFLOW != 0 {
            debug!("frame reports y overflow");
        }

        let scale = self.settings.scale_percent();
        let dx = apply_scale(self.frame[1] as i8, scale);
        // Wire convention is y-up; output convention is y-down.
        let dy = -apply_scale(self.frame[2] as i8, scale);

        let mut report = MouseReport {
            left: status & status::LEFT != 0,
            right: status & status::RIGHT != 0,
            middle: status & status::MIDDLE != 0,
            side: false,
            forward: false,
            dx,
            dy,
            wheel: 0,
        };

        if self.expected == FrameLength::Extended {
            let extra = self.frame[3];
            report.wheel = sign_extend_nibble(extra & extension::WHEEL_MASK);
            report.side = extra & extension::BTN_SIDE != 0;
            report.forward = extra & extension::BTN_FORWARD != 0;
        }

        self.stats.note_frame(&report);
        debug!(
            "frame: btns[L:{} R:{} M:{} S:{} F:{}] dx:{} dy:{} wheel:{}",
            report.left,
            report.right,
            report.middle,
            report.side,
            report.forward,
            report.dx,
            report.dy,
            report.wheel
        );
        Some(report)
    }
}

/// Integer percentage scaling, truncating toward zero.
fn apply_scale(raw: i8, percent: u32) -> i32 {
    i32::from(raw) * percent as i32 / 100
}

/// Sign-extend the 4-bit scroll field using its own bit 3.
fn sign_extend_nibble(nibble: u8) -> i8 {
    if nibble & extension::WHEEL_SIGN != 0 {
        (nibble | 0xF0) as i8
    } else {
        nibble as i8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembler(length: FrameLength, scale: u32) -> (FrameAssembler, Arc<MouseStats>) {
        let settings = Arc::new(MouseSettings::new());
        settings.set_frame_length(length);
        settings.set_scale_percent(scale);
        let stats = Arc::new(MouseStats::new());
        (FrameAssembler::new(Arc::clone(&settings), Arc::clone(&stats)), stats)
    }

    fn feed_all(asm: &mut FrameAssembler, bytes: &[u8]) -> Vec<MouseReport> {
        bytes.iter().filter_map(|&b| asm.feed(b)).collect()
    }

    #[test]
    fn standard_frame_decodes_movement() {
        let (mut asm, _) = assembler(FrameLength::Standard, 100);
        assert_eq!(asm.feed(0x09), None);
        assert_eq!(asm.feed(0x0A), None);
        let report = asm.feed(0x05).unwrap();

        assert!(report.left);
        assert!(!report.right);
        assert!(!report.middle);
        assert_eq!(report.dx, 10);
        assert_eq!(report.dy, -5);
        assert_eq!(report.wheel, 0);
    }

    #[test]
    fn scale_multiplies_before_sign_flip() {
        let (mut asm, _) = assembler(FrameLength::Standard, 200);
        let report = feed_all(&mut asm, &[0x09, 0x0A, 0x05]).remove(0);
        assert_eq!(report.dx, 20);
        assert_eq!(report.dy, -10);
    }

    #[test]
    fn scale_truncates_toward_zero() {
        let (mut asm, _) = assembler(FrameLength::Standard, 150);
        // dx_raw 5 -> 7.5 -> 7; dy_raw -5 -> -7.5 -> -7 -> +7 after flip.
        let report = feed_all(&mut asm, &[0x08, 0x05, 0xFB]).remove(0);
        assert_eq!(report.dx, 7);
        assert_eq!(report.dy, 7);
    }

    #[test]
    fn negative_movement_decodes() {
        let (mut asm, _) = assembler(FrameLength::Standard, 100);
        // dx_raw -10, dy_raw 5.
        let report = feed_all(&mut asm, &[0x08, 0xF6, 0x05]).remove(0);
        assert_eq!(report.dx, -10);
        assert_eq!(report.dy, -5);
    }

    #[test]
    fn extended_frame_scroll_up() {
        let (mut asm, _) = assembler(FrameLength::Extended, 100);
        let report = feed_all(&mut asm, &[0x08, 0x00, 0x00, 0x01]).remove(0);
        assert_eq!(report.wheel, 1);
        assert!(!report.left && !report.right && !report.middle);
        assert_eq!((report.dx, report.dy), (0, 0));
    }

    #[test]
    fn extended_frame_scroll_down_sign_extends() {
        let (mut asm, _) = assembler(FrameLength::Extended, 100);
        let report = feed_all(&mut asm, &[0x08, 0x00, 0x00, 0xFF]).remove(0);
        assert_eq!(report.wheel, -1);
        // 0xFF also carries both extension buttons.
        assert!(report.side);
        assert!(report.forward);
    }

    #[test]
    fn scroll_range_covers_full_nibble() {
        let (mut asm, _) = assembler(FrameLength::Extended, 100);
        let max = feed_all(&mut asm, &[0x08, 0, 0, 0x07]).remove(0);
        assert_eq!(max.wheel, 7);
        let min = feed_all(&mut asm, &[0x08, 0, 0, 0x08]).remove(0);
        assert_eq!(min.wheel, -8);
    }

    #[test]
    fn invalid_frame_counts_and_resets() {
        let (mut asm, stats) = assembler(FrameLength::Standard, 100);
        assert_eq!(feed_all(&mut asm, &[0x00, 0x10, 0x10]), vec![]);

        let c = stats.snapshot();
        assert_eq!(c.invalid_frames, 1);
        assert_eq!(c.frames, 0);
        assert_eq!(c.dx_total, 0);
        assert_eq!(c.distance_total, 0);

        // The assembler recovered: the next frame decodes normally.
        let report = feed_all(&mut asm, &[0x09, 0x01, 0x01]).remove(0);
        assert!(report.left);
        assert_eq!(stats.snapshot().frames, 1);
    }

    #[test]
    fn length_switch_discards_partial_frame() {
        let (mut asm, stats) = assembler(FrameLength::Standard, 100);
        assert_eq!(asm.feed(0x09), None);
        assert_eq!(asm.feed(0x7F), None);

        // Switch under a partially filled frame; the two buffered bytes are
        // dropped and the next byte starts a fresh 4-byte frame.
        asm.settings.set_frame_length(FrameLength::Extended);
        let reports = feed_all(&mut asm, &[0x08, 0x02, 0x03, 0x01]);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].dx, 2);
        assert_eq!(reports[0].dy, -3);
        assert_eq!(reports[0].wheel, 1);
        assert_eq!(stats.snapshot().frames, 1);
    }

    #[test]
    fn length_switch_round_trip_keeps_partial_frame() {
        let (mut asm, stats) = assembler(FrameLength::Standard, 100);
        assert_eq!(asm.feed(0x09), None);
        assert_eq!(asm.feed(0x0A), None);

        // A switch away and back between bytes leaves the buffer alone; the
        // frame completes under the same length its bytes were captured
        // with.
        asm.settings.set_frame_length(FrameLength::Extended);
        asm.settings.set_frame_length(FrameLength::Standard);

        let report = asm.feed(0x05).unwrap();
        assert!(report.left);
        assert_eq!(report.dx, 10);
        assert_eq!(report.dy, -5);
        assert_eq!(stats.snapshot().frames, 1);
    }

    #[test]
    fn consecutive_frames_reset_between() {
        let (mut asm, stats) = assembler(FrameLength::Standard, 100);
        let reports = feed_all(&mut asm, &[0x09, 0x01, 0x01, 0x0A, 0x02, 0x02]);
        assert_eq!(reports.len(), 2);
        assert!(reports[0].left && !reports[0].right);
        assert!(!reports[1].left && reports[1].right);
        assert_eq!(stats.snapshot().frames, 2);
    }

    #[test]
    fn statistics_accumulate_across_frames() {
        let (mut asm, stats) = assembler(FrameLength::Extended, 100);
        feed_all(&mut asm, &[0x09, 0x0A, 0x05, 0x01]);
        feed_all(&mut asm, &[0x0B, 0xF6, 0x00, 0x00]);

        let c = stats.snapshot();
        assert_eq!(c.frames, 2);
        assert_eq!(c.left_clicks, 2);
        assert_eq!(c.right_clicks, 1);
        assert_eq!(c.clicks, 3);
        assert_eq!(c.scroll_events, 1);
        assert_eq!(c.dx_total, 0);
        assert_eq!(c.dy_total, -5);
        assert_eq!(c.distance_total, 25);
    }
}
