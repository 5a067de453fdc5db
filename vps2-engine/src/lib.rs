//! Event assembly and dispatch engine for virtual PS/2-style input devices
//!
//! Producers feed raw protocol bytes into a bounded queue; a per-device
//! dispatch task decodes them into typed events and forwards each completed
//! unit to an [`EventSink`]:
//!
//! ```text
//! [producers]          [dispatch task]
//!     │                      │
//!     ▼                      ▼
//! [ByteQueue] ──► [ScanCodeTranslator / FrameAssembler] ──► [EventSink]
//!                            │
//!                   [combo detection, stats]
//! ```
//!
//! Two decoders are provided: [`ScanCodeTranslator`] for set-1 keyboard
//! scan codes (with modifier tracking, lock-key LEDs, and shortcut combo
//! detection) and [`FrameAssembler`] for 3- and 4-byte pointer motion
//! frames. Both keep their counters in shared stats blocks that can be
//! snapshotted from any thread.
//!
//! The engine never blocks producers: when the queue is full, bytes are
//! dropped and counted instead.

pub mod combo;
pub mod driver;
pub mod frame;
pub mod keymap;
pub mod modifier;
pub mod queue;
pub mod scancode;
pub mod sink;
pub mod stats;

pub use driver::{DecodedEvent, DriverHandle, InputDecoder};
pub use frame::{
    FrameAssembler, FrameLength, MouseReport, MouseSettings, DEFAULT_SCALE_PERCENT,
};
pub use keymap::KeyCode;
pub use modifier::{LedState, LockKey, Modifier, ModifierState, Modifiers};
pub use queue::{ByteQueue, PushOutcome};
pub use scancode::{KeyAction, KeyEvent, ScanCodeTranslator, RELEASE_FLAG};
pub use sink::{EventSink, MouseButton, NullSink, RecordingSink, RelAxis, SinkRecord};
pub use stats::{KeyboardCounters, KeyboardStats, MouseCounters, MouseStats};
