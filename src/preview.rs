//! Visualizing a `VirtualStrip` during development.
//!
//! Two outputs:
//! - `TerminalPreview`: redraws the strip on one terminal line on every
//!   show, using 24-bit ANSI background colors
//! - `timeline_image` / `save_timeline`: one image row per shown frame, so
//!   a whole animation can be inspected as a single PNG

use crate::color::Color;
use crate::error::{Result, StripError};
use image::{Rgb, RgbImage};
use std::io::Write;
use std::path::Path;

/// Receives every frame a `VirtualStrip` publishes.
pub trait FrameSink {
    fn publish(&mut self, frame: &[Color]) -> Result<()>;
}

/// Draws each frame as a row of colored cells on a single terminal line.
pub struct TerminalPreview<W: Write> {
    out: W,
    cell: &'static str,
}

impl TerminalPreview<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalPreview<W> {
    pub fn new(out: W) -> Self {
        Self { out, cell: "  " }
    }

    /// Use a narrower single-column cell, for long strips.
    #[must_use]
    pub fn narrow(mut self) -> Self {
        self.cell = " ";
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for TerminalPreview<W> {
    fn publish(&mut self, frame: &[Color]) -> Result<()> {
        let mut line = String::with_capacity(frame.len() * 24 + 8);
        line.push('\r');
        for c in frame {
            line.push_str(&format!("\x1b[48;2;{};{};{}m{}", c.r, c.g, c.b, self.cell));
        }
        line.push_str("\x1b[0m");

        self.out.write_all(line.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

/// Render frames as an image: frame `n` becomes row `n`, LED `i` column `i`.
///
/// Each LED is drawn as a `scale`×`scale` square. Fails with
/// `InvalidParameter` when the scaled image would not fit in memory.
pub fn timeline_image(frames: &[Vec<Color>], scale: u32) -> Result<RgbImage> {
    let scale = scale.max(1);
    let led_count = frames.iter().map(Vec::len).max().unwrap_or(0);
    let (width, height) = scaled_dimensions(led_count, frames.len(), scale)?;

    Ok(RgbImage::from_fn(width, height, |x, y| {
        let frame = &frames[(y / scale) as usize];
        let c = frame.get((x / scale) as usize).copied().unwrap_or_default();
        Rgb([c.r, c.g, c.b])
    }))
}

fn scaled_dimensions(led_count: usize, frame_count: usize, scale: u32) -> Result<(u32, u32)> {
    let too_large = || {
        StripError::InvalidParameter(format!(
            "timeline of {frame_count} frames x {led_count} LEDs at scale {scale} is too large"
        ))
    };
    let scaled = |n: usize| {
        u32::try_from(n)
            .ok()
            .and_then(|n| n.checked_mul(scale))
            .ok_or_else(too_large)
    };

    let (width, height) = (scaled(led_count)?, scaled(frame_count)?);
    // Three bytes per pixel must still be addressable.
    u64::from(width)
        .checked_mul(u64::from(height))
        .and_then(|px| px.checked_mul(3))
        .and_then(|bytes| usize::try_from(bytes).ok())
        .ok_or_else(too_large)?;
    Ok((width, height))
}

/// Write `timeline_image` to `path`; the format follows the extension.
///
/// Image formats cannot encode a zero-sized image, so an empty recording
/// writes nothing and only logs a warning.
pub fn save_timeline(frames: &[Vec<Color>], scale: u32, path: &Path) -> Result<()> {
    if frames.iter().all(Vec::is_empty) {
        tracing::warn!("No frames recorded, not writing {}", path.display());
        return Ok(());
    }

    timeline_image(frames, scale)?.save(path)?;
    tracing::info!("Saved {} frames to {}", frames.len(), path.display());
    Ok(())
}
