//! The animation catalogue.
//!
//! Every animation is a free function that takes any `Strip` and runs
//! synchronously: it writes pixels, calls `show`, and sleeps between frames
//! on the calling thread. Nothing is returned except errors; a failing strip
//! write aborts the animation and is propagated with `?`.
//!
//! ## Rust concepts
//! - `S: Strip + ?Sized` accepts both concrete strips and `dyn Strip`
//! - Randomness is passed in as `&mut impl Rng`, so tests can seed it
//! - Iterator adapters (`chain`, `rev`) describe sweep order

mod snake;

pub use snake::{INITIAL_LENGTH, SnakeGame, SnakeParams, Tick, snake};

use crate::color::{Color, calculate_color_percent, wheel};
use crate::error::{Result, StripError};
use crate::strip::Strip;
use rand::Rng;
use std::thread;
use std::time::Duration;

pub const RGB_FADE_DELAY: Duration = Duration::from_millis(3);
pub const STROBE_DELAY: Duration = Duration::from_millis(100);
pub const RUNNING_LIGHTS_DELAY: Duration = Duration::from_millis(50);
pub const COLOR_WIPE_DELAY: Duration = Duration::from_millis(50);
pub const RAINBOW_CYCLE_DELAY: Duration = Duration::from_millis(20);

// ── Fades ────────────────────────────────────────────────────────────

/// Fade the whole strip from black up to `color` and back down.
///
/// Brightness steps are `0..=255` then `255..=0`, 512 frames in total,
/// each `step / 256` of full brightness.
pub fn fade_in_n_out<S: Strip + ?Sized>(strip: &mut S, color: Color, delay: Duration) -> Result<()> {
    for step in (0..256u16).chain((0..256u16).rev()) {
        strip.fill(calculate_color_percent(color, f32::from(step) / 256.0))?;
        strip.show()?;
        thread::sleep(delay);
    }
    Ok(())
}

/// `fade_in_n_out` through red, green, then red again.
pub fn rgb_fade<S: Strip + ?Sized>(strip: &mut S, delay: Duration) -> Result<()> {
    tracing::debug!("rgb_fade: delay={:?}", delay);
    for color in [Color::RED, Color::GREEN, Color::RED] {
        fade_in_n_out(strip, color, delay)?;
    }
    Ok(())
}

/// Flash the whole strip `count` times, alternating `color` and black.
pub fn strobe<S: Strip + ?Sized>(
    strip: &mut S,
    color: Color,
    count: usize,
    delay: Duration,
) -> Result<()> {
    for _ in 0..count {
        strip.fill(color)?;
        strip.show()?;
        thread::sleep(delay);
        strip.fill(Color::BLACK)?;
        strip.show()?;
        thread::sleep(delay);
    }
    Ok(())
}

/// Decay one pixel toward black.
///
/// Channels at or below 10 snap to 0. Brighter channels lose
/// `channel * value / 256`, and the result is truncated.
pub fn fade_to_black<S: Strip + ?Sized>(strip: &mut S, index: usize, value: u8) -> Result<()> {
    let faded = strip.get(index)?.map(|c| {
        if c <= 10 {
            0
        } else {
            let c = u16::from(c);
            (c - (c * u16::from(value)).div_ceil(256)) as u8
        }
    });
    strip.set(index, faded)
}

/// One frame of sparkle: each pixel has a 25% chance of lighting up in
/// `color`, otherwise it fades by `fade_value`. Call repeatedly.
pub fn random_fade<S, R>(strip: &mut S, color: Color, fade_value: u8, rng: &mut R) -> Result<()>
where
    S: Strip + ?Sized,
    R: Rng + ?Sized,
{
    for index in 0..strip.led_count() {
        if rng.random_bool(0.25) {
            strip.set(index, color)?;
        } else {
            fade_to_black(strip, index, fade_value)?;
        }
    }
    strip.show()
}

// ── Scanner ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScannerParams {
    pub color: Color,
    /// Number of full-brightness pixels in the moving block.
    pub size: usize,
    /// Pause between frames.
    pub speed_delay: Duration,
    /// Extra pause at each end of the sweep.
    pub return_delay: Duration,
}

impl Default for ScannerParams {
    fn default() -> Self {
        Self {
            color: Color::RED,
            size: 4,
            speed_delay: Duration::from_millis(10),
            return_delay: Duration::from_millis(50),
        }
    }
}

/// Sweep a block of `size` lit pixels, flanked by two dim pixels, back and
/// forth across the strip.
///
/// The block starts at positions `0..led_count - size - 2`, so the trailing
/// dim pixel never leaves the strip. Strips too short for the block show
/// nothing.
pub fn scanner<S: Strip + ?Sized>(strip: &mut S, params: &ScannerParams) -> Result<()> {
    let span = strip
        .led_count()
        .saturating_sub(params.size.saturating_add(2));
    tracing::debug!("scanner: size={} span={}", params.size, span);

    for position in 0..span {
        scanner_frame(strip, params, position)?;
    }
    thread::sleep(params.return_delay);

    for position in (0..span).rev() {
        scanner_frame(strip, params, position)?;
    }
    thread::sleep(params.return_delay);

    Ok(())
}

fn scanner_frame<S: Strip + ?Sized>(strip: &mut S, params: &ScannerParams, position: usize) -> Result<()> {
    let dim = params.color.dimmed(10);

    strip.fill(Color::BLACK)?;
    strip.set(position, dim)?;
    for offset in 1..=params.size {
        strip.set(position + offset, params.color)?;
    }
    strip.set(position + params.size + 1, dim)?;
    strip.show()?;
    thread::sleep(params.speed_delay);
    Ok(())
}

// ── Waves and wipes ──────────────────────────────────────────────────

/// A sine brightness wave travelling along the strip for `2 * led_count`
/// frames.
pub fn running_lights<S: Strip + ?Sized>(strip: &mut S, color: Color, delay: Duration) -> Result<()> {
    let led_count = strip.led_count();
    let mut phase = 0usize;

    for _ in 0..led_count * 2 {
        phase += 1;
        for index in 0..led_count {
            let level = ((index + phase) as f64).sin() * 127.0 + 128.0;
            strip.set(index, calculate_color_percent(color, (level / 255.0) as f32))?;
        }
        strip.show()?;
        thread::sleep(delay);
    }
    Ok(())
}

/// Light pixels one at a time from index 0 to the end.
pub fn color_wipe<S: Strip + ?Sized>(strip: &mut S, color: Color, delay: Duration) -> Result<()> {
    for index in 0..strip.led_count() {
        strip.set(index, color)?;
        strip.show()?;
        thread::sleep(delay);
    }
    Ok(())
}

/// Rotate the full hue wheel across the strip, five times around.
pub fn rainbow_cycle<S: Strip + ?Sized>(strip: &mut S, delay: Duration) -> Result<()> {
    let led_count = strip.led_count();

    for frame in 0..256 * 5 {
        for index in 0..led_count {
            let position = (index * 256 / led_count + frame) & 255;
            strip.set(index, wheel(position as u8))?;
        }
        strip.show()?;
        thread::sleep(delay);
    }
    Ok(())
}

// ── Meteor ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeteorParams {
    pub color: Color,
    /// Length of the bright head.
    pub size: usize,
    /// `fade_to_black` amount applied to the trail each frame.
    pub decay: u8,
    /// Fade each trail pixel with 50% probability instead of always.
    pub random_decay: bool,
    pub delay: Duration,
}

impl Default for MeteorParams {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            size: 10,
            decay: 64,
            random_decay: true,
            delay: Duration::from_millis(30),
        }
    }
}

/// A meteor of `size` pixels crossing the strip, leaving a decaying trail.
///
/// Runs for `2 * led_count` frames so the trail has time to fade out after
/// the head leaves the strip.
pub fn meteor_rain<S, R>(strip: &mut S, params: &MeteorParams, rng: &mut R) -> Result<()>
where
    S: Strip + ?Sized,
    R: Rng + ?Sized,
{
    let led_count = strip.led_count();
    strip.fill(Color::BLACK)?;

    for lead in 0..led_count * 2 {
        for index in 0..led_count {
            if !params.random_decay || rng.random_bool(0.5) {
                fade_to_black(strip, index, params.decay)?;
            }
        }

        for offset in 0..params.size {
            if let Some(index) = lead.checked_sub(offset).filter(|&i| i < led_count) {
                strip.set(index, params.color)?;
            }
        }

        strip.show()?;
        thread::sleep(params.delay);
    }
    Ok(())
}

// ── Alternating blocks ───────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlternatingParams {
    pub color_one: Color,
    pub color_two: Color,
    /// Block width in pixels.
    pub size: usize,
    pub delay: Duration,
}

impl Default for AlternatingParams {
    fn default() -> Self {
        Self {
            color_one: Color::RED,
            color_two: Color::BLUE,
            size: 3,
            delay: Duration::from_millis(500),
        }
    }
}

/// Two frames of alternating `size`-wide blocks, the second with the colors
/// swapped.
pub fn alternating<S: Strip + ?Sized>(strip: &mut S, params: &AlternatingParams) -> Result<()> {
    if params.size == 0 {
        return Err(StripError::InvalidParameter(
            "alternating block size must be at least 1".to_string(),
        ));
    }

    let frames = [
        (params.color_one, params.color_two),
        (params.color_two, params.color_one),
    ];
    for (first, second) in frames {
        for index in 0..strip.led_count() {
            let color = if index % (params.size * 2) < params.size {
                first
            } else {
                second
            };
            strip.set(index, color)?;
        }
        strip.show()?;
        thread::sleep(params.delay);
    }
    Ok(())
}
