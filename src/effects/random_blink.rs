use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::RngExt;

use super::Effect;
use crate::canvas::{Canvas, CanvasError, Pixel};
use crate::color::WHITE;

const UPDATE_FREQUENCY: Duration = Duration::from_millis(200);

/// Lights a small random subset of pixels each frame, blanking the rest.
pub struct RandomBlink {
    rng: SmallRng,
    lit: usize,
}

impl RandomBlink {
    pub fn new() -> Self {
        Self {
            rng: rand::make_rng::<SmallRng>(),
            lit: 0,
        }
    }
}

impl Default for RandomBlink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Effect for RandomBlink {
    fn name(&self) -> &'static str {
        "random_blink"
    }

    fn description(&self) -> &'static str {
        "Random pixels blinking"
    }

    fn update_frequency(&self) -> Duration {
        UPDATE_FREQUENCY
    }

    async fn compose(&mut self, canvas: &mut Canvas) -> Result<(), CanvasError> {
        canvas.set_all(Pixel::blank());

        let count = (canvas.size() / 6).max(1);
        for _ in 0..count {
            let index = self.rng.random_range(0..canvas.size());
            canvas.set_pixel(index, Pixel::solid(*WHITE))?;
        }

        self.lit = count;
        Ok(())
    }
}

impl fmt::Display for RandomBlink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RandomBlink(lit:{})", self.lit)
    }
}
