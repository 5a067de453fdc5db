//! Scan-code translation and keyboard state tracking.
//!
//! Each incoming byte is one key transition: the high bit distinguishes
//! release from press, the low 7 bits index the identity table in
//! [`crate::keymap`]. Modifier and lock bookkeeping happens here, before
//! the event is handed on; combo detection piggybacks on the freshly
//! updated modifier set.

use std::sync::Arc;

use tracing::debug;

use crate::combo;
use crate::keymap::{self, KeyCode};
use crate::modifier::{LedState, ModifierState};
use crate::stats::KeyboardStats;

/// High bit of a scan code marks a key release.
pub const RELEASE_FLAG: u8 = 0x80;

/// Key transition direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
}

/// One decoded key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub action: KeyAction,
}

/// Turns raw scan codes into key events.
pub struct ScanCodeTranslator {
    modifiers: Arc<ModifierState>,
    leds: Arc<LedState>,
    stats: Arc<KeyboardStats>,
}

impl ScanCodeTranslator {
    pub fn new(
        modifiers: Arc<ModifierState>,
        leds: Arc<LedState>,
        stats: Arc<KeyboardStats>,
    ) -> Self {
        Self {
            modifiers,
            leds,
            stats,
        }
    }

    /// Feed one scan code; returns the decoded event for mapped codes.
    ///
    /// Unmapped codes only bump the unmapped counter. Lock keys toggle their
    /// LED on press, never on release.
    pub fn feed(&mut self, scancode: u8) -> Option<KeyEvent> {
        let release = scancode & RELEASE_FLAG != 0;
        let index = scancode & !RELEASE_FLAG;

        let code = match keymap::lookup(index) {
            Some(code) => code,
            None => {
                self.stats.note_unmapped();
                debug!("no mapping for scan code 0x{:02X}", index);
                return None;
            }
        };

        if let Some(modifier) = code.modifier() {
            self.modifiers.set(modifier, !release);
        }
        if !release {
            if let Some(lock) = code.lock() {
                self.leds.toggle(lock);
            }
        }

        let matched = combo::check(self.modifiers.snapshot(), code, !release);
        self.stats.note_combos(matched);

        let action = if release {
            self.stats.note_release();
            KeyAction::Release
        } else {
            self.stats.note_press();
            KeyAction::Press
        };

        debug!(
            "scan code 0x{:02X} -> {:?} ({:?}), modifiers {:?}",
            index,
            code,
            action,
            self.modifiers.snapshot()
        );
        Some(KeyEvent { code, action })
    }
}
