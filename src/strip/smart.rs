use super::{Strip, check_index};
use crate::StripConfig;
use crate::color::Color;
use crate::error::{Result, StripError};
use smart_leds::{RGB8, SmartLedsWrite};
use std::fmt::Debug;

/// Hardware strip over any `smart_leds` driver (WS2812, SK6812, APA102, ...).
///
/// LED drivers are write-only, so the strip keeps its own buffer to answer
/// `get` and streams the whole buffer to the driver on every publish.
pub struct SmartLedStrip<W> {
    driver: W,
    pixels: Vec<Color>,
    auto_write: bool,
}

impl<W> SmartLedStrip<W>
where
    W: SmartLedsWrite<Color = RGB8>,
    W::Error: Debug,
{
    pub fn new(driver: W, config: StripConfig) -> Self {
        Self {
            driver,
            pixels: vec![Color::BLACK; config.led_count],
            auto_write: config.auto_write,
        }
    }

    pub fn driver(&self) -> &W {
        &self.driver
    }

    pub fn into_driver(self) -> W {
        self.driver
    }

    fn flush(&mut self) -> Result<()> {
        self.driver
            .write(self.pixels.iter().copied())
            .map_err(|e| StripError::Device(format!("{e:?}")))
    }
}

impl<W> Strip for SmartLedStrip<W>
where
    W: SmartLedsWrite<Color = RGB8>,
    W::Error: Debug,
{
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

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Records every frame written to it.
    #[derive(Default)]
    struct RecordingDriver {
        frames: Vec<Vec<RGB8>>,
        fail: bool,
    }

    impl SmartLedsWrite for RecordingDriver {
        type Error = &'static str;
        type Color = RGB8;

        fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
        where
            T: IntoIterator<Item = I>,
            I: Into<Self::Color>,
        {
            if self.fail {
                return Err("bus fault");
            }
            self.frames.push(iterator.into_iter().map(Into::into).collect());
            Ok(())
        }
    }

    #[test]
    fn show_writes_one_frame() {
        let mut strip = SmartLedStrip::new(RecordingDriver::default(), StripConfig::new(3, false));
        strip.set(0, Color::RED).unwrap();
        strip.set(2, Color::BLUE).unwrap();
        assert!(strip.driver().frames.is_empty());

        strip.show().unwrap();
        let frames = strip.into_driver().frames;
        assert_eq!(
            frames,
            vec![vec![
                RGB8::new(255, 0, 0),
                RGB8::new(0, 0, 0),
                RGB8::new(0, 0, 255)
            ]]
        );
    }

    #[test]
    fn auto_write_streams_every_mutation() {
        let mut strip = SmartLedStrip::new(RecordingDriver::default(), StripConfig::new(2, true));
        strip.fill(Color::WHITE).unwrap();
        strip.set(1, Color::BLACK).unwrap();
        assert_eq!(strip.driver().frames.len(), 2);
        assert_eq!(strip.get(0).unwrap(), Color::WHITE);
        assert_eq!(strip.get(1).unwrap(), Color::BLACK);
    }

    #[test]
    fn driver_failure_surfaces_as_device_error() {
        let driver = RecordingDriver {
            fail: true,
            ..Default::default()
        };
        let mut strip = SmartLedStrip::new(driver, StripConfig::new(2, false));
        strip.fill(Color::RED).unwrap();
        let err = strip.show().unwrap_err();
        assert!(matches!(err, StripError::Device(ref msg) if msg.contains("bus fault")));
    }

    #[test]
    fn rejects_out_of_range_writes() {
        let mut strip = SmartLedStrip::new(RecordingDriver::default(), StripConfig::new(2, true));
        assert!(strip.set(2, Color::RED).is_err());
        assert!(strip.driver().frames.is_empty());
    }
}
