//! Pixel buffer abstraction: the `Strip` trait and backend selection.
//!
//! Every animation is written against `Strip`, never against a concrete
//! backend. The caller picks the backend at construction time and hands it
//! in, so a real LED strip, an LED matrix panel and the in-memory
//! `VirtualStrip` are interchangeable.
//!
//! ## Rust concepts
//! - Traits with default methods (`get_range`, `set_range`)
//! - Trait objects (`Box<dyn Strip>`) for runtime backend selection
//! - `#[cfg(feature = ...)]` to compile hardware support in or out

#[cfg(feature = "hardware")]
mod matrix;
mod smart;
mod virtual_strip;

#[cfg(feature = "hardware")]
pub use matrix::MatrixStrip;
pub use smart::SmartLedStrip;
pub use virtual_strip::VirtualStrip;

use crate::color::Color;
use crate::error::{Result, StripError};
use crate::{PanelConfig, StripConfig};
use std::fmt;
use std::ops::Range;
use std::thread;
use std::time::Duration;

/// An addressable strip of `led_count` pixels.
///
/// Writes go to a pending buffer. `show` publishes everything written so
/// far exactly once. When `auto_write` is set, `set` and `fill` publish on
/// their own as well.
pub trait Strip {
    /// Number of pixels; fixed for the lifetime of the strip.
    fn led_count(&self) -> usize;

    /// Whether writes are published without an explicit `show`.
    fn auto_write(&self) -> bool;

    /// Read the pending color at `index`.
    fn get(&self, index: usize) -> Result<Color>;

    /// Read the pending colors of `range`.
    fn get_range(&self, range: Range<usize>) -> Result<Vec<Color>> {
        range.map(|index| self.get(index)).collect()
    }

    fn set(&mut self, index: usize, color: Color) -> Result<()>;

    /// Set every `step`-th index of `range` to `color`, in order, sleeping
    /// `delay` after each write. Writes are not batched.
    fn set_range(
        &mut self,
        range: Range<usize>,
        step: usize,
        color: Color,
        delay: Duration,
    ) -> Result<()> {
        if step == 0 {
            return Err(StripError::InvalidParameter(
                "set_range step must be at least 1".to_string(),
            ));
        }

        for index in range.step_by(step) {
            self.set(index, color)?;
            thread::sleep(delay);
        }
        Ok(())
    }

    /// Set every pixel `0..led_count` to `color`.
    fn fill(&mut self, color: Color) -> Result<()>;

    /// Publish the pending buffer to the output.
    fn show(&mut self) -> Result<()>;
}

impl<S: Strip + ?Sized> Strip for Box<S> {
    fn led_count(&self) -> usize {
        (**self).led_count()
    }

    fn auto_write(&self) -> bool {
        (**self).auto_write()
    }

    fn get(&self, index: usize) -> Result<Color> {
        (**self).get(index)
    }

    fn get_range(&self, range: Range<usize>) -> Result<Vec<Color>> {
        (**self).get_range(range)
    }

    fn set(&mut self, index: usize, color: Color) -> Result<()> {
        (**self).set(index, color)
    }

    fn set_range(
        &mut self,
        range: Range<usize>,
        step: usize,
        color: Color,
        delay: Duration,
    ) -> Result<()> {
        (**self).set_range(range, step, color, delay)
    }

    fn fill(&mut self, color: Color) -> Result<()> {
        (**self).fill(color)
    }

    fn show(&mut self) -> Result<()> {
        (**self).show()
    }
}

/// Reject an index outside `[0, led_count)`.
pub(crate) fn check_index(index: usize, led_count: usize) -> Result<()> {
    if index < led_count {
        Ok(())
    } else {
        Err(StripError::IndexOutOfBounds { index, led_count })
    }
}

// ── Backend selection ──────────────────────────────────────────────

/// Backends that `open_strip` can construct from configuration alone.
///
/// `SmartLedStrip` is not listed: it wraps a driver the caller already
/// owns, so it is always built directly with `SmartLedStrip::new`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Backend {
    /// In-memory buffer, optionally previewed in the terminal.
    Virtual,
    /// RGB LED matrix panel driven through `rpi-led-matrix`.
    Matrix,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Virtual, Backend::Matrix];

    pub fn name(self) -> &'static str {
        match self {
            Backend::Virtual => "virtual",
            Backend::Matrix => "matrix",
        }
    }

    /// Whether this backend was compiled into the crate.
    pub fn is_available(self) -> bool {
        match self {
            Backend::Virtual => true,
            Backend::Matrix => cfg!(feature = "hardware"),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Backend::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown backend {s:?} (expected virtual or matrix)"))
    }
}

/// Probe which backends this build can construct.
pub fn available_backends() -> Vec<Backend> {
    Backend::ALL
        .into_iter()
        .filter(|b| b.is_available())
        .collect()
}

/// Construct the requested backend.
///
/// Fails with `BackendUnavailable` when the backend was not compiled in or
/// its device could not be initialized. `panel` is only used by the matrix
/// backend.
pub fn open_strip(
    backend: Backend,
    config: StripConfig,
    panel: PanelConfig,
) -> Result<Box<dyn Strip>> {
    tracing::info!(
        "Opening {} strip: {} LEDs, auto_write={}",
        backend,
        config.led_count,
        config.auto_write
    );

    match backend {
        Backend::Virtual => Ok(Box::new(VirtualStrip::new(config))),
        #[cfg(feature = "hardware")]
        Backend::Matrix => Ok(Box::new(MatrixStrip::new(config, panel)?)),
        #[cfg(not(feature = "hardware"))]
        Backend::Matrix => {
            let _ = panel;
            Err(StripError::BackendUnavailable {
                backend,
                reason: "built without the `hardware` feature".to_string(),
            })
        }
    }
}
