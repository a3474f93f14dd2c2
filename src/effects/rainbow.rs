use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use super::Effect;
use crate::canvas::{Canvas, CanvasError, Pixel};
use crate::color;

const UPDATE_FREQUENCY: Duration = Duration::from_millis(50);
const HUE_PERIOD: f32 = 360.0;
const HUE_STEP: f32 = 6.0;

/// A rolling rainbow: each pixel's hue is offset along the strip, and the
/// whole pattern drifts by a fixed step per frame.
pub struct Rainbow {
    offset: f32,
}

impl Rainbow {
    pub fn new() -> Self {
        Self { offset: 0.0 }
    }
}

impl Default for Rainbow {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Effect for Rainbow {
    fn name(&self) -> &'static str {
        "rainbow"
    }

    fn description(&self) -> &'static str {
        "A rolling rainbow across the strip"
    }

    fn update_frequency(&self) -> Duration {
        UPDATE_FREQUENCY
    }

    async fn compose(&mut self, canvas: &mut Canvas) -> Result<(), CanvasError> {
        let spacing = HUE_PERIOD / canvas.size() as f32;

        for i in 0..canvas.size() {
            let hue = (self.offset + i as f32 * spacing) % HUE_PERIOD;
            canvas.set_pixel(i, Pixel::solid(color::hsv(hue, 1.0, 1.0)))?;
        }

        self.offset = (self.offset + HUE_STEP) % HUE_PERIOD;
        Ok(())
    }
}

impl fmt::Display for Rainbow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rainbow(offset:{:.0})", self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hue_varies_along_the_strip() {
        let mut canvas = Canvas::new(6).unwrap();
        let mut effect = Rainbow::new();
        effect.compose(&mut canvas).await.unwrap();

        let first = canvas.get_pixel(0).unwrap().color();
        let middle = canvas.get_pixel(3).unwrap().color();
        assert_ne!(first, middle);
    }

    #[tokio::test]
    async fn offset_wraps_at_the_hue_period() {
        let mut reference = Canvas::new(4).unwrap();
        let mut effect = Rainbow::new();
        effect.compose(&mut reference).await.unwrap();

        // One full wrap later the frame repeats exactly
        let mut canvas = Canvas::new(4).unwrap();
        let mut wrapped = Rainbow::new();
        let steps = (HUE_PERIOD / HUE_STEP) as usize;
        for _ in 0..steps + 1 {
            wrapped.compose(&mut canvas).await.unwrap();
        }

        for i in 0..canvas.size() {
            assert_eq!(
                reference.get_pixel(i).unwrap().color(),
                canvas.get_pixel(i).unwrap().color()
            );
        }
    }
}
