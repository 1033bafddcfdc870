//! Strip backend for RGB LED matrix panels.
//!
//! The strip is laid out row-major across the panel: LED `i` sits at column
//! `i % cols`, row `i / cols`. The `rpi-led-matrix` C library is not
//! thread-safe, so a `MatrixStrip` must stay on the thread that created it.

use super::{Backend, Strip, check_index};
use crate::color::Color;
use crate::error::{Result, StripError};
use crate::{PanelConfig, StripConfig};
use rpi_led_matrix::{LedCanvas, LedMatrix, LedMatrixOptions, LedRuntimeOptions};

/// Create a matrix configured for our hardware:
/// Pi Zero 2 W + Adafruit Bonnet + configurable panel size.
///
/// # Rust concept: Result and the ? operator
/// Matrix initialization fails when not running as root or when GPIO is
/// unavailable. The C library reports `&'static str` errors, which we wrap
/// as `BackendUnavailable` so callers see a single failure condition.
pub fn create_matrix(panel: PanelConfig) -> Result<LedMatrix> {
    let unavailable = |reason: &str| StripError::BackendUnavailable {
        backend: Backend::Matrix,
        reason: reason.to_string(),
    };

    let mut options = LedMatrixOptions::new();
    options.set_rows(panel.rows);
    options.set_cols(panel.cols);
    options.set_hardware_mapping("adafruit-hat");
    options.set_pwm_bits(8).map_err(unavailable)?;
    options.set_pwm_lsb_nanoseconds(130);

    let mut rt_options = LedRuntimeOptions::new();
    rt_options.set_gpio_slowdown(2); // Pi Zero 2 W requires slowdown=2

    LedMatrix::new(Some(options), Some(rt_options)).map_err(unavailable)
}

/// A strip drawn onto an LED matrix panel.
pub struct MatrixStrip {
    matrix: LedMatrix,
    // `None` only while a swap is in flight.
    canvas: Option<LedCanvas>,
    pixels: Vec<Color>,
    panel: PanelConfig,
    auto_write: bool,
}

impl MatrixStrip {
    pub fn new(config: StripConfig, panel: PanelConfig) -> Result<Self> {
        if config.led_count as u64 > panel.pixel_count() {
            return Err(StripError::InvalidParameter(format!(
                "{} LEDs do not fit on a {}x{} panel",
                config.led_count, panel.cols, panel.rows
            )));
        }

        let matrix = create_matrix(panel)?;
        let canvas = matrix.offscreen_canvas();
        tracing::info!("Matrix panel ready: {}x{}", panel.cols, panel.rows);

        Ok(Self {
            matrix,
            canvas: Some(canvas),
            pixels: vec![Color::BLACK; config.led_count],
            panel,
            auto_write: config.auto_write,
        })
    }

    pub fn panel(&self) -> PanelConfig {
        self.panel
    }

    fn position(&self, index: usize) -> (i32, i32) {
        let cols = self.panel.cols as usize;
        ((index % cols) as i32, (index / cols) as i32)
    }

    fn flush(&mut self) -> Result<()> {
        let mut canvas = self
            .canvas
            .take()
            .ok_or_else(|| StripError::Device("matrix canvas lost during swap".to_string()))?;

        canvas.clear();
        for (index, color) in self.pixels.iter().enumerate() {
            let (x, y) = self.position(index);
            canvas.set(x, y, &(*color).into());
        }

        self.canvas = Some(self.matrix.swap(canvas));
        Ok(())
    }
}

impl Strip for MatrixStrip {
    fn led_count(&self) -> usize {
        self.pixels.len()
    }

    fn auto_write(&self) -> bool {
        self.auto_write
    }

    fn get(&self, index: usize) -> Result<Color> {
        check_index(index, self.pixels.len())?;
        Ok(self.pixels[index])
    }

    fn set(&mut self, index: usize, color: Color) -> Result<()> {
        check_index(index, self.pixels.len())?;
        self.pixels[index] = color;

        if self.auto_write {
            self.flush()?;
        }
        Ok(())
    }

    fn fill(&mut self, color: Color) -> Result<()> {
        self.pixels.fill(color);

        if self.auto_write {
            self.flush()?;
        }
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        self.flush()
    }
}
