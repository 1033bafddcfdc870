use super::{Strip, check_index};
use crate::StripConfig;
use crate::color::Color;
use crate::error::Result;
use crate::preview::FrameSink;

/// In-memory strip for development and tests.
///
/// Keeps the pending buffer and the last shown frame separately, counts
/// publishes, and can keep a history of every shown frame or forward each
/// frame to a `FrameSink` (terminal preview).
pub struct VirtualStrip {
    pixels: Vec<Color>,
    shown: Vec<Color>,
    auto_write: bool,
    show_count: usize,
    history: Option<Vec<Vec<Color>>>,
    sink: Option<Box<dyn FrameSink>>,
}

impl VirtualStrip {
    pub fn new(config: StripConfig) -> Self {
        Self {
            pixels: vec![Color::BLACK; config.led_count],
            shown: vec![Color::BLACK; config.led_count],
            auto_write: config.auto_write,
            show_count: 0,
            history: None,
            sink: None,
        }
    }

    /// Forward every published frame to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: impl FrameSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Keep a copy of every published frame.
    #[must_use]
    pub fn with_history(mut self) -> Self {
        self.history = Some(Vec::new());
        self
    }

    /// The pending (not necessarily shown) buffer.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// The last published frame.
    pub fn shown(&self) -> &[Color] {
        &self.shown
    }

    /// How many frames have been published.
    pub fn show_count(&self) -> usize {
        self.show_count
    }

    /// Every published frame, oldest first. Empty unless `with_history`.
    pub fn history(&self) -> &[Vec<Color>] {
        self.history.as_deref().unwrap_or_default()
    }

    fn publish(&mut self) -> Result<()> {
        self.shown.copy_from_slice(&self.pixels);
        self.show_count += 1;

        if let Some(history) = &mut self.history {
            history.push(self.shown.clone());
        }
        if let Some(sink) = &mut self.sink {
            sink.publish(&self.shown)?;
        }
        Ok(())
    }
}

impl Strip for VirtualStrip {
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
            self.publish()?;
        }
        Ok(())
    }

    fn fill(&mut self, color: Color) -> Result<()> {
        self.pixels.fill(color);

        if self.auto_write {
            self.publish()?;
        }
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        self.publish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StripError;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn strip(led_count: usize, auto_write: bool) -> VirtualStrip {
        VirtualStrip::new(StripConfig::new(led_count, auto_write))
    }

    #[test]
    fn starts_black() {
        let s = strip(3, true);
        assert_eq!(s.pixels(), &[Color::BLACK; 3]);
        assert_eq!(s.shown(), &[Color::BLACK; 3]);
        assert_eq!(s.show_count(), 0);
    }

    #[test]
    fn fill_then_read_every_index() {
        for n in [1, 7, 60] {
            let mut s = strip(n, false);
            let c = Color::new(1, 2, 3);
            s.fill(c).unwrap();
            for i in 0..n {
                assert_eq!(s.get(i).unwrap(), c);
            }
        }
    }

    #[test]
    fn fill_show_set_show_scenario() {
        let base = Color::new(10, 20, 30);
        let mut s = strip(5, false);

        s.fill(base).unwrap();
        s.show().unwrap();
        assert_eq!(s.shown(), &[base; 5]);

        s.set(2, Color::BLACK).unwrap();
        s.show().unwrap();
        assert_eq!(s.get(2).unwrap(), Color::BLACK);
        for i in [0, 1, 3, 4] {
            assert_eq!(s.get(i).unwrap(), base);
        }
        assert_eq!(s.shown(), &[base, base, Color::BLACK, base, base]);
    }

    #[test]
    fn without_auto_write_only_show_publishes() {
        let mut s = strip(4, false);
        s.set(0, Color::RED).unwrap();
        s.set(1, Color::RED).unwrap();
        s.fill(Color::GREEN).unwrap();
        assert_eq!(s.show_count(), 0);
        assert_eq!(s.shown(), &[Color::BLACK; 4]);

        s.show().unwrap();
        assert_eq!(s.show_count(), 1);
        assert_eq!(s.shown(), &[Color::GREEN; 4]);
    }

    #[test]
    fn auto_write_publishes_every_mutation() {
        let mut s = strip(4, true);
        s.set(0, Color::RED).unwrap();
        assert_eq!(s.shown()[0], Color::RED);
        s.fill(Color::BLUE).unwrap();
        assert_eq!(s.show_count(), 2);
        assert_eq!(s.shown(), &[Color::BLUE; 4]);
    }

    #[test]
    fn out_of_bounds_access_is_rejected() {
        let mut s = strip(5, false);
        assert!(matches!(
            s.set(5, Color::RED),
            Err(StripError::IndexOutOfBounds {
                index: 5,
                led_count: 5
            })
        ));
        assert!(s.get(99).is_err());
        assert!(s.get_range(3..6).is_err());
        assert_eq!(s.pixels(), &[Color::BLACK; 5]);
    }

    #[test]
    fn history_records_each_show() {
        let mut s = strip(2, false).with_history();
        s.set(0, Color::RED).unwrap();
        s.show().unwrap();
        s.set(1, Color::RED).unwrap();
        s.show().unwrap();
        assert_eq!(
            s.history(),
            &[
                vec![Color::RED, Color::BLACK],
                vec![Color::RED, Color::RED]
            ]
        );
    }

    #[test]
    fn history_is_empty_when_not_enabled() {
        let mut s = strip(2, false);
        s.show().unwrap();
        assert!(s.history().is_empty());
    }

    struct SharedSink(Rc<RefCell<Vec<Vec<Color>>>>);

    impl FrameSink for SharedSink {
        fn publish(&mut self, frame: &[Color]) -> Result<()> {
            self.0.borrow_mut().push(frame.to_vec());
            Ok(())
        }
    }

    #[test]
    fn sink_receives_published_frames() {
        let frames = Rc::new(RefCell::new(Vec::new()));
        let mut s = strip(3, false).with_sink(SharedSink(frames.clone()));
        s.fill(Color::WHITE).unwrap();
        s.show().unwrap();
        s.show().unwrap();
        assert_eq!(frames.borrow().len(), 2);
        assert_eq!(frames.borrow()[1], vec![Color::WHITE; 3]);
    }
}
