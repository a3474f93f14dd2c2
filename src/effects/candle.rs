use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::RngExt;

use super::Effect;
use crate::canvas::{Canvas, CanvasError, Pixel};
use crate::models::Color;

const UPDATE_FREQUENCY: Duration = Duration::from_millis(150);

/// Base flame colour; green and blue are attenuated with the flicker level
/// so the flame yellows as it dims.
const BASE_RED: u8 = 255;
const BASE_GREEN: u8 = 147;
const BASE_BLUE: u8 = 41;

/// Flicker band. Levels random-walk inside it so consecutive frames stay
/// close, which reads as a flame rather than noise.
const MIN_LEVEL: f32 = 0.35;
const MAX_LEVEL: f32 = 1.0;
const FLICKER_STEP: f32 = 0.12;

/// A simulated candle flame: every pixel carries its own flicker level,
/// nudged by a small random step each frame and clamped to the flame band.
pub struct Candle {
    levels: Vec<f32>,
    rng: SmallRng,
}

impl Candle {
    pub fn new() -> Self {
        Self {
            levels: Vec::new(),
            rng: rand::make_rng::<SmallRng>(),
        }
    }
}

impl Default for Candle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Effect for Candle {
    fn name(&self) -> &'static str {
        "candle"
    }

    fn description(&self) -> &'static str {
        "A flickering candle flame"
    }

    fn update_frequency(&self) -> Duration {
        UPDATE_FREQUENCY
    }

    async fn compose(&mut self, canvas: &mut Canvas) -> Result<(), CanvasError> {
        if self.levels.len() != canvas.size() {
            self.levels
                .resize(canvas.size(), (MIN_LEVEL + MAX_LEVEL) / 2.0);
        }

        for (i, level) in self.levels.iter_mut().enumerate() {
            *level = (*level + self.rng.random_range(-FLICKER_STEP..FLICKER_STEP))
                .clamp(MIN_LEVEL, MAX_LEVEL);

            let flame = Color::new(
                BASE_RED,
                (BASE_GREEN as f32 * *level) as u8,
                (BASE_BLUE as f32 * *level * *level) as u8,
            );
            canvas.set_pixel(i, Pixel::new(flame, *level * Pixel::default_brightness()))?;
        }

        Ok(())
    }
}

impl fmt::Display for Candle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (min, max) = self
            .levels
            .iter()
            .fold((MAX_LEVEL, MIN_LEVEL), |(min, max), level| {
                (min.min(*level), max.max(*level))
            });
        write!(f, "Candle(levels:{:.2}..{:.2})", min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn levels_stay_in_the_flame_band() {
        let mut canvas = Canvas::new(5).unwrap();
        let mut effect = Candle::new();

        for _ in 0..100 {
            effect.compose(&mut canvas).await.unwrap();
            for level in &effect.levels {
                assert!(*level >= MIN_LEVEL && *level <= MAX_LEVEL);
            }
        }
    }

    #[tokio::test]
    async fn flame_is_warm_and_lit() {
        let mut canvas = Canvas::new(5).unwrap();
        let mut effect = Candle::new();
        effect.compose(&mut canvas).await.unwrap();

        for i in 0..canvas.size() {
            let pixel = canvas.get_pixel(i).unwrap();
            assert_eq!(pixel.red(), BASE_RED);
            assert!(pixel.green() >= pixel.blue());
            assert!(pixel.brightness() > 0.0 && pixel.brightness() <= 1.0);
        }
    }

    #[tokio::test]
    async fn flicker_state_persists_across_frames() {
        let mut canvas = Canvas::new(5).unwrap();
        let mut effect = Candle::new();
        effect.compose(&mut canvas).await.unwrap();
        let before = effect.levels.clone();

        effect.compose(&mut canvas).await.unwrap();
        for (before, after) in before.iter().zip(&effect.levels) {
            // One frame can move a level by at most the flicker step
            assert!((before - after).abs() <= FLICKER_STEP);
        }
    }
}
