use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use super::Effect;
use crate::canvas::{Canvas, CanvasError, Pixel};
use crate::color::COLOUR_WHEEL;

const UPDATE_FREQUENCY: Duration = Duration::from_millis(500);

/// A basic effect which just shows a sequence of solid colours.
pub struct SolidColours {
    step: usize,
}

impl SolidColours {
    pub fn new() -> Self {
        Self { step: 0 }
    }
}

impl Default for SolidColours {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Effect for SolidColours {
    fn name(&self) -> &'static str {
        "solid_colours"
    }

    fn description(&self) -> &'static str {
        "A sequence of solid colours"
    }

    fn update_frequency(&self) -> Duration {
        UPDATE_FREQUENCY
    }

    async fn compose(&mut self, canvas: &mut Canvas) -> Result<(), CanvasError> {
        canvas.set_all(Pixel::solid(COLOUR_WHEEL[self.step]));
        self.step = (self.step + 1) % COLOUR_WHEEL.len();
        Ok(())
    }
}

impl fmt::Display for SolidColours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SolidColours(step:{})", self.step)
    }
}
