//! Animation catalogue for addressable RGB LED strips.
//!
//! This crate provides:
//! - A `Strip` trait: the pixel buffer every animation draws into
//! - Backends: an in-memory `VirtualStrip`, `SmartLedStrip` over any
//!   `smart_leds` driver, and `MatrixStrip` for LED matrix panels
//!   (`hardware` feature)
//! - The animations themselves (fades, scanner, rainbow, meteor, snake, ...)
//! - Color helpers and signal handling for clean shutdown
//!
//! The binary (`main.rs`) wires these together behind a small CLI.

pub mod animations;
pub mod color;
pub mod error;
pub mod preview;
pub mod strip;

pub use color::Color;
pub use error::{Result, StripError};
pub use strip::{Backend, Strip, VirtualStrip, available_backends, open_strip};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ── Strip configuration ────────────────────────────────────────────

/// Construction-time settings shared by every strip backend.
///
/// # Rust concept: derive macros
/// `Clone, Copy` make this cheaply copyable. Both fields are fixed for the
/// lifetime of a strip, so there are no setters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StripConfig {
    pub led_count: usize,
    /// Publish every `set`/`fill` immediately instead of waiting for `show`.
    pub auto_write: bool,
}

impl StripConfig {
    pub fn new(led_count: usize, auto_write: bool) -> Self {
        Self {
            led_count,
            auto_write,
        }
    }
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            led_count: 60,
            auto_write: true,
        }
    }
}

/// Dimensions of an LED matrix panel, used by the matrix backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelConfig {
    pub rows: u32,
    pub cols: u32,
}

impl PanelConfig {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Total number of pixels on the panel.
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.cols)
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self { rows: 64, cols: 64 }
    }
}

// ── Shutdown ───────────────────────────────────────────────────────

/// Set up a Ctrl+C handler that sets `running` to false.
///
/// # Rust concept: Arc and AtomicBool
/// The flag is shared between the animation loop and the signal handler.
/// `Arc` lets both own it, `AtomicBool` makes it safe to flip from the
/// handler thread without a mutex.
pub fn setup_signal_handler() -> std::result::Result<Arc<AtomicBool>, ctrlc::Error> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    Ok(running)
}

/// Check if the animation loop should keep running.
pub fn is_running(running: &AtomicBool) -> bool {
    running.load(Ordering::SeqCst)
}

// ── Tests ──────────────────────────────────────────────────────────
