use std::f32::consts::TAU;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use super::Effect;
use crate::canvas::{Canvas, CanvasError, Pixel};
use crate::models::Color;

/// Frames per display window; the update frequency is derived from the
/// configured effect duration so one full wave traversal fits the window.
const STEPS: u32 = 50;

/// A sine wave travelling along the strip, shaded green at the troughs
/// through red at the crests.
pub struct GradientGraph {
    phase: f32,
    frequency: Duration,
}

impl GradientGraph {
    pub fn new(effect_window: Duration) -> Self {
        Self {
            phase: 0.0,
            frequency: effect_window / STEPS,
        }
    }
}

#[async_trait]
impl Effect for GradientGraph {
    fn name(&self) -> &'static str {
        "gradient_graph"
    }

    fn description(&self) -> &'static str {
        "A moving graph of colour gradients"
    }

    fn update_frequency(&self) -> Duration {
        self.frequency
    }

    async fn compose(&mut self, canvas: &mut Canvas) -> Result<(), CanvasError> {
        for i in 0..canvas.size() {
            let angle = self.phase + (i as f32 / canvas.size() as f32) * TAU;
            let height = (angle.sin() + 1.0) / 2.0;
            let colour = Color::new(
                (255.0 * height) as u8,
                (255.0 * (1.0 - height)) as u8,
                0,
            );
            canvas.set_pixel(i, Pixel::solid(colour))?;
        }

        self.phase = (self.phase + TAU / STEPS as f32) % TAU;
        Ok(())
    }
}

impl fmt::Display for GradientGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GradientGraph(phase:{:.2})", self.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_fits_the_display_window() {
        let effect = GradientGraph::new(Duration::from_secs(10));
        assert_eq!(effect.update_frequency(), Duration::from_millis(200));
    }

    #[tokio::test]
    async fn fills_the_whole_canvas() {
        let mut canvas = Canvas::new(5).unwrap();
        let mut effect = GradientGraph::new(Duration::from_secs(10));
        effect.compose(&mut canvas).await.unwrap();

        for i in 0..canvas.size() {
            let colour = canvas.get_pixel(i).unwrap().color();
            // The gradient always has some red or green in it
            assert!(colour.red as u16 + colour.green as u16 > 0);
        }
    }

    #[tokio::test]
    async fn phase_advances_between_frames() {
        let mut canvas = Canvas::new(5).unwrap();
        let mut effect = GradientGraph::new(Duration::from_secs(10));
        effect.compose(&mut canvas).await.unwrap();
        let first = canvas.clone();

        effect.compose(&mut canvas).await.unwrap();
        assert_ne!(first, canvas);
    }
}
