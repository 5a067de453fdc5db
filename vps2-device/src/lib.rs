//! Virtual keyboard and mouse front ends
//!
//! Each device couples a dispatch pipeline from `vps2-engine` with the three
//! outward surfaces a virtual input device exposes:
//!
//! - **injection**: queue raw bytes, either directly or parsed from text
//! - **control**: motion scale, frame length, LED flags, repeat timing
//! - **statistics**: counter snapshots and a rendered text report
//!
//! A device owns its queue, decoder state, and dispatch task. Dropping it
//! without [`VirtualKeyboard::shutdown`] / [`VirtualMouse::shutdown`]
//! detaches the task, which drains what is already queued and exits.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use vps2_engine::{
    ByteQueue, DriverHandle, EventSink, FrameAssembler, FrameLength, KeyboardCounters,
    KeyboardStats, LedState, LockKey, ModifierState, Modifiers, MouseCounters, MouseSettings,
    MouseStats, ScanCodeTranslator,
};

pub mod error;
mod inject;
pub mod report;

pub use error::DeviceError;
pub use report::{KeyboardStatusReport, MouseStatusReport};

/// Byte-queue capacity shared by both device kinds.
pub const QUEUE_CAPACITY: usize = 512;

/// Bounds and defaults for the keyboard repeat settings. The engine never
/// repeats keys itself; these are stored for the sink's benefit and shown
/// in the report.
pub mod repeat {
    pub const DELAY_MIN_MS: u32 = 50;
    pub const DELAY_MAX_MS: u32 = 2000;
    pub const DELAY_DEFAULT_MS: u32 = 250;
    pub const RATE_MIN_MS: u32 = 10;
    pub const RATE_MAX_MS: u32 = 500;
    pub const RATE_DEFAULT_MS: u32 = 33;
}

/// Bounds for the mouse motion scale.
pub mod scale {
    pub const MIN_PERCENT: u32 = 10;
    pub const MAX_PERCENT: u32 = 1000;
}

// ============================================================================
// VirtualKeyboard
// ============================================================================

/// A virtual scan-code keyboard.
pub struct VirtualKeyboard {
    driver: DriverHandle,
    modifiers: Arc<ModifierState>,
    leds: Arc<LedState>,
    stats: Arc<KeyboardStats>,
    repeat_delay_ms: AtomicU32,
    repeat_rate_ms: AtomicU32,
    started: Instant,
}

impl VirtualKeyboard {
    /// Creates the device and spawns its dispatch task on the current tokio
    /// runtime.
    pub fn spawn<S: EventSink>(sink: S) -> Self {
        let modifiers = Arc::new(ModifierState::new());
        let leds = Arc::new(LedState::new());
        let stats = Arc::new(KeyboardStats::new());
        let translator = ScanCodeTranslator::new(
            Arc::clone(&modifiers),
            Arc::clone(&leds),
            Arc::clone(&stats),
        );
        let queue = Arc::new(ByteQueue::with_capacity(QUEUE_CAPACITY));
        let driver = DriverHandle::spawn(queue, translator, sink, "vkbd");
        info!("virtual keyboard up, queue capacity {}", QUEUE_CAPACITY);
        Self {
            driver,
            modifiers,
            leds,
            stats,
            repeat_delay_ms: AtomicU32::new(repeat::DELAY_DEFAULT_MS),
            repeat_rate_ms: AtomicU32::new(repeat::RATE_DEFAULT_MS),
            started: Instant::now(),
        }
    }

    /// Queues one scan code for dispatch.
    pub fn inject(&self, scancode: u8) {
        debug!("injecting scan code 0x{:02X}", scancode);
        self.driver.submit(&[scancode]);
    }

    /// Parses `text` as a single numeric scan code and queues it.
    pub fn inject_text(&self, text: &str) -> Result<(), DeviceError> {
        let scancode = inject::parse_scancode(text)?;
        info!("injecting scan code 0x{:02X}", scancode);
        self.driver.submit(&[scancode]);
        Ok(())
    }

    pub fn repeat_delay_ms(&self) -> u32 {
        self.repeat_delay_ms.load(Ordering::Relaxed)
    }

    pub fn set_repeat_delay_ms(&self, ms: u32) -> Result<(), DeviceError> {
        if !(repeat::DELAY_MIN_MS..=repeat::DELAY_MAX_MS).contains(&ms) {
            return Err(DeviceError::OutOfRange {
                name: "repeat delay",
                value: ms,
                min: repeat::DELAY_MIN_MS,
                max: repeat::DELAY_MAX_MS,
            });
        }
        self.repeat_delay_ms.store(ms, Ordering::Relaxed);
        info!("repeat delay set to {} ms", ms);
        Ok(())
    }

    pub fn repeat_rate_ms(&self) -> u32 {
        self.repeat_rate_ms.load(Ordering::Relaxed)
    }

    pub fn set_repeat_rate_ms(&self, ms: u32) -> Result<(), DeviceError> {
        if !(repeat::RATE_MIN_MS..=repeat::RATE_MAX_MS).contains(&ms) {
            return Err(DeviceError::OutOfRange {
                name: "repeat rate",
                value: ms,
                min: repeat::RATE_MIN_MS,
                max: repeat::RATE_MAX_MS,
            });
        }
        self.repeat_rate_ms.store(ms, Ordering::Relaxed);
        info!("repeat rate set to {} ms", ms);
        Ok(())
    }

    pub fn led(&self, key: LockKey) -> bool {
        self.leds.get(key)
    }

    /// Sets a lock LED directly, independent of the toggle-on-press path.
    pub fn set_led(&self, key: LockKey, on: bool) {
        self.leds.set(key, on);
        info!("{} LED {}", key.label(), if on { "ON" } else { "OFF" });
    }

    /// Live modifier held-state snapshot.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers.snapshot()
    }

    pub fn stats(&self) -> KeyboardCounters {
        self.stats.snapshot()
    }

    pub fn queue_overflows(&self) -> u64 {
        self.driver.queue().overflows()
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Snapshot of every counter and setting behind the text report.
    pub fn report(&self) -> KeyboardStatusReport {
        KeyboardStatusReport {
            uptime_secs: self.started.elapsed().as_secs(),
            counters: self.stats.snapshot(),
            queue_overflows: self.driver.queue().overflows(),
            modifiers: self.modifiers.snapshot(),
            caps_lock: self.leds.get(LockKey::Caps),
            num_lock: self.leds.get(LockKey::Num),
            scroll_lock: self.leds.get(LockKey::Scroll),
            repeat_delay_ms: self.repeat_delay_ms(),
            repeat_rate_ms: self.repeat_rate_ms(),
            queue_capacity: QUEUE_CAPACITY,
        }
    }

    /// Resolves once everything injected before this call has reached the
    /// sink.
    pub async fn settle(&self) {
        self.driver.settle().await;
    }

    /// Stops injection, drains the queue, and releases device state.
    pub async fn shutdown(self) {
        self.driver.shutdown().await;
        info!("virtual keyboard down");
    }
}

// ============================================================================
// VirtualMouse
// ============================================================================

/// A virtual motion-frame mouse.
pub struct VirtualMouse {
    driver: DriverHandle,
    settings: Arc<MouseSettings>,
    stats: Arc<MouseStats>,
    started: Instant,
}

impl VirtualMouse {
    /// Creates the device and spawns its dispatch task on the current tokio
    /// runtime. Starts in extended (4-byte) mode at 100% scale.
    pub fn spawn<S: EventSink>(sink: S) -> Self {
        let settings = Arc::new(MouseSettings::new());
        let stats = Arc::new(MouseStats::new());
        let assembler = FrameAssembler::new(Arc::clone(&settings), Arc::clone(&stats));
        let queue = Arc::new(ByteQueue::with_capacity(QUEUE_CAPACITY));
        let driver = DriverHandle::spawn(queue, assembler, sink, "vmouse");
        info!("virtual mouse up, queue capacity {}", QUEUE_CAPACITY);
        Self {
            driver,
            settings,
            stats,
            started: Instant::now(),
        }
    }

    /// Queues one complete 3- or 4-byte packet.
    ///
    /// A packet whose length does not match the current mode is carried by a
    /// temporary mode switch: in-flight bytes are settled first, the mode
    /// flipped, the packet dispatched to completion, and the mode restored.
    /// Concurrent injectors should serialize around this call or the
    /// restored mode may clip their packets.
    pub async fn inject_packet(&self, bytes: &[u8]) -> Result<(), DeviceError> {
        let length = match bytes.len() {
            3 => FrameLength::Standard,
            4 => FrameLength::Extended,
            n => return Err(DeviceError::PacketLength { count: n }),
        };

        let current = self.settings.frame_length();
        if length == current {
            self.driver.submit(bytes);
            return Ok(());
        }

        debug!(
            "length mismatch, switching {} -> {} for one packet",
            current.label(),
            length.label()
        );
        self.driver.settle().await;
        self.settings.set_frame_length(length);
        self.driver.submit(bytes);
        self.driver.settle().await;
        self.settings.set_frame_length(current);
        Ok(())
    }

    /// Parses `text` as 3 or 4 whitespace-separated byte values and queues
    /// them as one packet.
    pub async fn inject_text(&self, text: &str) -> Result<(), DeviceError> {
        let bytes = inject::parse_packet(text)?;
        info!("injecting {}-byte packet {:02x?}", bytes.len(), bytes);
        self.inject_packet(&bytes).await
    }

    pub fn scale_percent(&self) -> u32 {
        self.settings.scale_percent()
    }

    pub fn set_scale_percent(&self, percent: u32) -> Result<(), DeviceError> {
        if !(scale::MIN_PERCENT..=scale::MAX_PERCENT).contains(&percent) {
            return Err(DeviceError::OutOfRange {
                name: "scale percent",
                value: percent,
                min: scale::MIN_PERCENT,
                max: scale::MAX_PERCENT,
            });
        }
        self.settings.set_scale_percent(percent);
        info!("DPI multiplier set to {}%", percent);
        Ok(())
    }

    pub fn frame_length(&self) -> FrameLength {
        self.settings.frame_length()
    }

    /// Switches between 3- and 4-byte packets. A partially assembled frame
    /// from the old mode is discarded, never decoded under the new length.
    pub fn set_frame_length(&self, length: FrameLength) {
        self.settings.set_frame_length(length);
        info!(
            "IntelliMouse mode {} ({}-byte packets)",
            if length == FrameLength::Extended {
                "enabled"
            } else {
                "disabled"
            },
            length.byte_len()
        );
    }

    pub fn stats(&self) -> MouseCounters {
        self.stats.snapshot()
    }

    pub fn queue_overflows(&self) -> u64 {
        self.driver.queue().overflows()
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Snapshot of every counter and setting behind the text report.
    pub fn report(&self) -> MouseStatusReport {
        MouseStatusReport {
            uptime_secs: self.started.elapsed().as_secs(),
            frame_length: self.settings.frame_length(),
            scale_percent: self.settings.scale_percent(),
            counters: self.stats.snapshot(),
            queue_overflows: self.driver.queue().overflows(),
        }
    }

    /// Resolves once everything injected before this call has reached the
    /// sink.
    pub async fn settle(&self) {
        self.driver.settle().await;
    }

    /// Stops injection, drains the queue, and releases device state.
    pub async fn shutdown(self) {
        self.driver.shutdown().await;
        info!("virtual mouse down");
    }
}
