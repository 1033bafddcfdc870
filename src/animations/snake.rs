//! A one-player snake that crawls along the strip eating food.
//!
//! The game state lives in `SnakeGame` and advances one `tick` at a time,
//! so it can be stepped and inspected directly. `snake` is the blocking
//! loop around it and is the only animation that does not end on its own:
//! it runs until the `running` flag is cleared.

use super::strobe;
use crate::color::Color;
use crate::error::{Result, StripError};
use crate::is_running;
use crate::strip::Strip;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::ops::Range;
use std::sync::atomic::AtomicBool;
use std::thread;
use std::time::Duration;

/// Body length after a reset.
pub const INITIAL_LENGTH: usize = 3;

const RESET_FLASHES: usize = 2;
const RESET_FLASH_DELAY: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnakeParams {
    pub snake_color: Color,
    pub food_color: Color,
    /// Pause between ticks.
    pub snake_speed: Duration,
}

impl Default for SnakeParams {
    fn default() -> Self {
        Self {
            snake_color: Color::GREEN,
            food_color: Color::RED,
            snake_speed: Duration::from_millis(50),
        }
    }
}

/// What happened during one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Moved,
    Ate,
    Reset,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnakeGame {
    led_count: usize,
    /// One past the frontmost body pixel; the body is `head - length..head`.
    head: usize,
    length: usize,
    food: Option<usize>,
}

impl SnakeGame {
    /// Smallest strip on which the snake can move without resetting every
    /// tick.
    pub const MIN_LEDS: usize = INITIAL_LENGTH + 3;

    pub fn new<R: Rng + ?Sized>(led_count: usize, rng: &mut R) -> Result<Self> {
        if led_count < Self::MIN_LEDS {
            return Err(StripError::InvalidParameter(format!(
                "snake needs at least {} LEDs, strip has {}",
                Self::MIN_LEDS,
                led_count
            )));
        }

        let mut game = Self {
            led_count,
            head: 0,
            length: INITIAL_LENGTH,
            food: None,
        };
        game.food = game.roll_food(rng);
        Ok(game)
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn food(&self) -> Option<usize> {
        self.food
    }

    /// Body indices, clipped to the strip.
    pub fn body(&self) -> Range<usize> {
        let end = self.head.min(self.led_count);
        self.head.saturating_sub(self.length).min(end)..end
    }

    /// Pick a food index uniformly among pixels the body does not cover.
    fn roll_food<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        let body = self.body();
        let free: Vec<usize> = (0..self.led_count)
            .filter(|i| !body.contains(i))
            .collect();
        free.choose(rng).copied()
    }

    fn needs_reset(&self) -> bool {
        self.head.saturating_sub(self.length + 1) > self.led_count
            || self.length >= self.led_count.saturating_sub(2)
    }

    /// Advance the game by one step and draw it.
    pub fn tick<S, R>(&mut self, strip: &mut S, params: &SnakeParams, rng: &mut R) -> Result<Tick>
    where
        S: Strip + ?Sized,
        R: Rng + ?Sized,
    {
        // The pixel the tail left on the previous tick.
        if let Some(vacated) = self.head.checked_sub(self.length + 1) {
            if vacated < self.led_count {
                strip.set(vacated, Color::BLACK)?;
            }
        }

        for index in self.body() {
            strip.set(index, params.snake_color)?;
        }
        if let Some(food) = self.food {
            strip.set(food, params.food_color)?;
        }

        let mut outcome = Tick::Moved;
        if self.food == Some(self.head) {
            self.length += 1;
            outcome = Tick::Ate;
        }
        self.head += 1;
        if outcome == Tick::Ate {
            self.food = self.roll_food(rng);
        }

        if self.needs_reset() {
            tracing::info!(
                "Snake reset at length {} (head {})",
                self.length,
                self.head
            );
            self.head = 0;
            self.length = INITIAL_LENGTH;
            self.food = self.roll_food(rng);
            strobe(strip, params.snake_color, RESET_FLASHES, RESET_FLASH_DELAY)?;
            return Ok(Tick::Reset);
        }

        strip.show()?;
        Ok(outcome)
    }
}

/// Play snake until `running` is cleared, sleeping `snake_speed` per tick.
pub fn snake<S, R>(strip: &mut S, params: &SnakeParams, running: &AtomicBool, rng: &mut R) -> Result<()>
where
    S: Strip + ?Sized,
    R: Rng + ?Sized,
{
    let mut game = SnakeGame::new(strip.led_count(), rng)?;
    tracing::debug!("snake: {} LEDs, food at {:?}", strip.led_count(), game.food());

    strip.fill(Color::BLACK)?;
    strip.show()?;

    while is_running(running) {
        game.tick(strip, params, rng)?;
        thread::sleep(params.snake_speed);
    }
    Ok(())
}
