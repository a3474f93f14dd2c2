use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, Timelike};

use super::Effect;
use crate::canvas::{Canvas, CanvasError, Pixel};
use crate::color::{BLUE, GREEN, RED};
use crate::models::Color;

const UPDATE_FREQUENCY: Duration = Duration::from_secs(1);

/// The wall-clock time in binary: the strip is split into three groups
/// showing hours (red), minutes (green) and seconds (blue), least
/// significant bit at each group's right edge. Purely a function of the
/// current time; no animation state persists between frames.
pub struct BinaryClock {
    shown: Option<(u32, u32, u32)>,
}

impl BinaryClock {
    pub fn new() -> Self {
        Self { shown: None }
    }

    fn paint(
        canvas: &mut Canvas,
        hours: u32,
        minutes: u32,
        seconds: u32,
    ) -> Result<(), CanvasError> {
        let group = canvas.size() / 3;

        canvas.set_all(Pixel::blank());
        Self::paint_group(canvas, 0, group, hours, *RED)?;
        Self::paint_group(canvas, group, group, minutes, *GREEN)?;
        Self::paint_group(canvas, group * 2, group, seconds, *BLUE)?;
        Ok(())
    }

    fn paint_group(
        canvas: &mut Canvas,
        start: usize,
        len: usize,
        value: u32,
        colour: Color,
    ) -> Result<(), CanvasError> {
        for slot in 0..len {
            if (value >> slot) & 1 == 1 {
                canvas.set_pixel(start + len - 1 - slot, Pixel::solid(colour))?;
            }
        }
        Ok(())
    }
}

impl Default for BinaryClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Effect for BinaryClock {
    fn name(&self) -> &'static str {
        "binary_clock"
    }

    fn description(&self) -> &'static str {
        "The current time in binary"
    }

    fn update_frequency(&self) -> Duration {
        UPDATE_FREQUENCY
    }

    async fn compose(&mut self, canvas: &mut Canvas) -> Result<(), CanvasError> {
        let now = Local::now();
        let (hours, minutes, seconds) = (now.hour(), now.minute(), now.second());
        self.shown = Some((hours, minutes, seconds));
        Self::paint(canvas, hours, minutes, seconds)
    }
}

impl fmt::Display for BinaryClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shown {
            Some((hours, minutes, seconds)) => write!(
                f,
                "BinaryClock({:02}:{:02}:{:02})",
                hours, minutes, seconds
            ),
            None => write!(f, "BinaryClock(unset)"),
        }
    }
}
