//! Modifier and lock-key state shared between the translator and the
//! control/statistics surfaces.
//!
//! The translator mutates these from the dispatch context; the control
//! interface reads (and for LEDs, writes) them from the caller's context.
//! Each flag is an independent atomic, so neither side ever observes a
//! half-written value.

use std::sync::atomic::{AtomicBool, Ordering};

bitflags::bitflags! {
    /// Set of logical modifiers currently held.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL  = 1 << 1;
        const ALT   = 1 << 2;
    }
}

/// One logical modifier (left/right variants already coalesced).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Shift,
    Ctrl,
    Alt,
}

impl Modifier {
    /// The flag bit this modifier occupies in a [`Modifiers`] set.
    pub fn flag(self) -> Modifiers {
        match self {
            Modifier::Shift => Modifiers::SHIFT,
            Modifier::Ctrl => Modifiers::CTRL,
            Modifier::Alt => Modifiers::ALT,
        }
    }
}

/// One of the three lock keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockKey {
    Caps,
    Num,
    Scroll,
}

impl LockKey {
    pub fn label(self) -> &'static str {
        match self {
            LockKey::Caps => "Caps Lock",
            LockKey::Num => "Num Lock",
            LockKey::Scroll => "Scroll Lock",
        }
    }
}

/// Live held/released state of the three logical modifiers.
#[derive(Debug, Default)]
pub struct ModifierState {
    shift: AtomicBool,
    ctrl: AtomicBool,
    alt: AtomicBool,
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, modifier: Modifier, held: bool) {
        self.flag_for(modifier).store(held, Ordering::Relaxed);
    }

    pub fn is_held(&self, modifier: Modifier) -> bool {
        self.flag_for(modifier).load(Ordering::Relaxed)
    }

    /// All currently held modifiers as a set.
    pub fn snapshot(&self) -> Modifiers {
        let mut mods = Modifiers::empty();
        if self.shift.load(Ordering::Relaxed) {
            mods |= Modifiers::SHIFT;
        }
        if self.ctrl.load(Ordering::Relaxed) {
            mods |= Modifiers::CTRL;
        }
        if self.alt.load(Ordering::Relaxed) {
            mods |= Modifiers::ALT;
        }
        mods
    }

    fn flag_for(&self, modifier: Modifier) -> &AtomicBool {
        match modifier {
            Modifier::Shift => &self.shift,
            Modifier::Ctrl => &self.ctrl,
            Modifier::Alt => &self.alt,
        }
    }
}

/// Caps/num/scroll lock flags.
///
/// Toggled by the translator on every press of the matching lock key, and
/// directly settable through the control interface independent of that
/// toggle behavior.
#[derive(Debug, Default)]
pub struct LedState {
    caps: AtomicBool,
    num: AtomicBool,
    scroll: AtomicBool,
}

impl LedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: LockKey) -> bool {
        self.flag_for(key).load(Ordering::Relaxed)
    }

    pub fn set(&self, key: LockKey, on: bool) {
        self.flag_for(key).store(on, Ordering::Relaxed);
    }

    pub fn toggle(&self, key: LockKey) {
        self.flag_for(key).fetch_xor(true, Ordering::Relaxed);
    }

    fn flag_for(&self, key: LockKey) -> &AtomicBool {
        match key {
            LockKey::Caps => &self.caps,
            LockKey::Num => &self.num,
            LockKey::Scroll => &self.scroll,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_set_and_snapshot() {
        let state = ModifierState::new();
        assert_eq!(state.snapshot(), Modifiers::empty());

        state.set(Modifier::Ctrl, true);
        state.set(Modifier::Alt, true);
        assert!(state.is_held(Modifier::Ctrl));
        assert!(!state.is_held(Modifier::Shift));
        assert_eq!(state.snapshot(), Modifiers::CTRL | Modifiers::ALT);

        state.set(Modifier::Ctrl, false);
        assert_eq!(state.snapshot(), Modifiers::ALT);
    }

    #[test]
    fn led_toggle_flips() {
        let leds = LedState::new();
        assert!(!leds.get(LockKey::Caps));
        leds.toggle(LockKey::Caps);
        assert!(leds.get(LockKey::Caps));
        leds.toggle(LockKey::Caps);
        assert!(!leds.get(LockKey::Caps));
    }

    #[test]
    fn led_direct_set_overrides() {
        let leds = LedState::new();
        leds.toggle(LockKey::Num);
        leds.set(LockKey::Num, false);
        assert!(!leds.get(LockKey::Num));
        leds.set(LockKey::Scroll, true);
        assert!(leds.get(LockKey::Scroll));
    }

    #[test]
    fn subset_matching_on_modifier_sets() {
        let held = Modifiers::CTRL | Modifiers::ALT;
        assert!(held.contains(Modifiers::CTRL));
        assert!(held.contains(Modifiers::CTRL | Modifiers::ALT));
        assert!(!held.contains(Modifiers::SHIFT));
    }
}
