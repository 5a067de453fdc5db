//! Human-readable statistics reports
//!
//! Fixed-width label columns, one metric per line, grouped into sections.
//! Each report is a plain value snapshot; rendering goes through `Display`
//! so callers can print it anywhere without the device in hand.

use std::fmt;

use vps2_engine::{FrameLength, KeyboardCounters, Modifier, Modifiers, MouseCounters};

fn held(modifiers: Modifiers, modifier: Modifier) -> &'static str {
    if modifiers.contains(modifier.flag()) {
        "HELD"
    } else {
        "released"
    }
}

fn led(on: bool) -> &'static str {
    if on {
        "ON"
    } else {
        "OFF"
    }
}

/// Snapshot behind the keyboard statistics report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardStatusReport {
    pub uptime_secs: u64,
    pub counters: KeyboardCounters,
    pub queue_overflows: u64,
    pub modifiers: Modifiers,
    pub caps_lock: bool,
    pub num_lock: bool,
    pub scroll_lock: bool,
    pub repeat_delay_ms: u32,
    pub repeat_rate_ms: u32,
    pub queue_capacity: usize,
}

impl fmt::Display for KeyboardStatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Virtual Keyboard Driver Statistics ===")?;
        writeln!(f, "Uptime:            {} seconds", self.uptime_secs)?;
        writeln!(f, "Total Keypresses:  {}", self.counters.presses)?;
        writeln!(f, "Total Releases:    {}", self.counters.releases)?;
        writeln!(f, "Buffer Overflows:  {}", self.queue_overflows)?;
        writeln!(f, "Unknown Scancodes: {}", self.counters.unmapped)?;
        writeln!(f, "Combos Detected:   {}", self.counters.combos)?;
        writeln!(f)?;
        writeln!(f, "--- Modifier States ---")?;
        writeln!(f, "Shift:   {}", held(self.modifiers, Modifier::Shift))?;
        writeln!(f, "Ctrl:    {}", held(self.modifiers, Modifier::Ctrl))?;
        writeln!(f, "Alt:     {}", held(self.modifiers, Modifier::Alt))?;
        writeln!(f)?;
        writeln!(f, "--- LED States ---")?;
        writeln!(f, "Caps Lock:   {}", led(self.caps_lock))?;
        writeln!(f, "Num Lock:    {}", led(self.num_lock))?;
        writeln!(f, "Scroll Lock: {}", led(self.scroll_lock))?;
        writeln!(f)?;
        writeln!(f, "--- Configuration ---")?;
        writeln!(f, "Repeat Delay: {} ms", self.repeat_delay_ms)?;
        writeln!(f, "Repeat Rate:  {} ms", self.repeat_rate_ms)?;
        writeln!(f, "Buffer Size:  {}", self.queue_capacity)
    }
}

/// Snapshot behind the mouse statistics report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseStatusReport {
    pub uptime_secs: u64,
    pub frame_length: FrameLength,
    pub scale_percent: u32,
    pub counters: MouseCounters,
    pub queue_overflows: u64,
}

impl fmt::Display for MouseStatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Virtual Mouse Driver Statistics ===")?;
        writeln!(f, "Uptime:              {} seconds", self.uptime_secs)?;
        writeln!(
            f,
            "Packet Mode:         {} ({} bytes)",
            self.frame_length.label(),
            self.frame_length.byte_len()
        )?;
        writeln!(f, "DPI Multiplier:      {}%", self.scale_percent)?;
        writeln!(f)?;
        writeln!(f, "--- Packet Statistics ---")?;
        writeln!(f, "Total Packets:       {}", self.counters.frames)?;
        writeln!(f, "Invalid Packets:     {}", self.counters.invalid_frames)?;
        writeln!(f, "Buffer Overflows:    {}", self.queue_overflows)?;
        writeln!(f)?;
        writeln!(f, "--- Button Clicks ---")?;
        writeln!(f, "Total Clicks:        {}", self.counters.clicks)?;
        writeln!(f, "  Left:              {}", self.counters.left_clicks)?;
        writeln!(f, "  Right:             {}", self.counters.right_clicks)?;
        writeln!(f, "  Middle:            {}", self.counters.middle_clicks)?;
        writeln!(f, "  Side:              {}", self.counters.side_clicks)?;
        writeln!(f, "  Forward:           {}", self.counters.forward_clicks)?;
        writeln!(f)?;
        writeln!(f, "--- Movement ---")?;
        writeln!(f, "Total dX:            {}", self.counters.dx_total)?;
        writeln!(f, "Total dY:            {}", self.counters.dy_total)?;
        writeln!(f, "Total Distance:      {} units", self.counters.distance_total)?;
        writeln!(f, "Scroll Events:       {}", self.counters.scroll_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_report_layout() {
        let report = KeyboardStatusReport {
            uptime_secs: 42,
            counters: KeyboardCounters {
                presses: 10,
                releases: 9,
                unmapped: 1,
                combos: 2,
            },
            queue_overflows: 3,
            modifiers: Modifiers::CTRL,
            caps_lock: true,
            num_lock: false,
            scroll_lock: false,
            repeat_delay_ms: 250,
            repeat_rate_ms: 33,
            queue_capacity: 512,
        };

        let text = report.to_string();
        assert_eq!(
            text,
            "=== Virtual Keyboard Driver Statistics ===\n\
             Uptime:            42 seconds\n\
             Total Keypresses:  10\n\
             Total Releases:    9\n\
             Buffer Overflows:  3\n\
             Unknown Scancodes: 1\n\
             Combos Detected:   2\n\
             \n\
             --- Modifier States ---\n\
             Shift:   released\n\
             Ctrl:    HELD\n\
             Alt:     released\n\
             \n\
             --- LED States ---\n\
             Caps Lock:   ON\n\
             Num Lock:    OFF\n\
             Scroll Lock: OFF\n\
             \n\
             --- Configuration ---\n\
             Repeat Delay: 250 ms\n\
             Repeat Rate:  33 ms\n\
             Buffer Size:  512\n"
        );
    }

    #[test]
    fn mouse_report_layout() {
        let report = MouseStatusReport {
            uptime_secs: 7,
            frame_length: FrameLength::Extended,
            scale_percent: 150,
            counters: MouseCounters {
                frames: 5,
                invalid_frames: 1,
                clicks: 4,
                left_clicks: 2,
                right_clicks: 1,
                middle_clicks: 1,
                side_clicks: 0,
                forward_clicks: 0,
                scroll_events: 3,
                dx_total: 12,
                dy_total: -8,
                distance_total: 20,
            },
            queue_overflows: 0,
        };

        let text = report.to_string();
        assert!(text.starts_with("=== Virtual Mouse Driver Statistics ===\n"));
        assert!(text.contains("Packet Mode:         IntelliMouse (4 bytes)\n"));
        assert!(text.contains("DPI Multiplier:      150%\n"));
        assert!(text.contains("Total Packets:       5\n"));
        assert!(text.contains("  Left:              2\n"));
        assert!(text.contains("Total dY:            -8\n"));
        assert!(text.contains("Total Distance:      20 units\n"));
    }
}
