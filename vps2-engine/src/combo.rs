//! Recognition of well-known modifier+key combinations.
//!
//! Detection is a side channel: matches are counted and logged but never
//! change what the translator emits to the sink.

use tracing::info;

use crate::keymap::KeyCode;
use crate::modifier::Modifiers;

struct Combo {
    required: Modifiers,
    key: KeyCode,
    label: &'static str,
}

const CTRL_ALT: Modifiers = Modifiers::CTRL.union(Modifiers::ALT);

/// Recognized combinations. Rows are matched independently; a single
/// keystroke may complete more than one.
const COMBOS: &[Combo] = &[
    Combo {
        required: Modifiers::CTRL,
        key: KeyCode::C,
        label: "Ctrl+C (SIGINT)",
    },
    Combo {
        required: Modifiers::CTRL,
        key: KeyCode::Z,
        label: "Ctrl+Z (SIGTSTP)",
    },
    Combo {
        required: Modifiers::CTRL,
        key: KeyCode::V,
        label: "Ctrl+V (Paste)",
    },
    Combo {
        required: Modifiers::CTRL,
        key: KeyCode::X,
        label: "Ctrl+X (Cut)",
    },
    Combo {
        required: Modifiers::ALT,
        key: KeyCode::Tab,
        label: "Alt+Tab (Switch Window)",
    },
    Combo {
        required: Modifiers::ALT,
        key: KeyCode::F4,
        label: "Alt+F4 (Close Window)",
    },
    Combo {
        required: CTRL_ALT,
        key: KeyCode::Delete,
        label: "Ctrl+Alt+Delete",
    },
];

/// Count the combos completed by a freshly pressed key, logging each match.
///
/// Fires only on presses. Matching is subset-based: modifiers held beyond a
/// row's required set do not prevent that row from matching.
pub fn check(held: Modifiers, key: KeyCode, pressed: bool) -> u64 {
    if !pressed {
        return 0;
    }
    let mut matched = 0;
    for combo in COMBOS {
        if combo.key == key && held.contains(combo.required) {
            matched += 1;
            info!("combo detected: {}", combo.label);
        }
    }
    matched
}
