use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use super::Effect;
use crate::canvas::{Canvas, CanvasError, Pixel};
use crate::feeds::BroadcastSource;

const UPDATE_FREQUENCY: Duration = Duration::from_secs(5);

/// Shows the colour currently broadcast by the CheerLights channel on the
/// whole strip. Fetch failures blank the canvas; the next frame tries again.
pub struct CheerLights {
    source: Box<dyn BroadcastSource>,
    colour: Option<String>,
}

impl CheerLights {
    pub fn new(source: Box<dyn BroadcastSource>) -> Self {
        Self {
            source,
            colour: None,
        }
    }
}

#[async_trait]
impl Effect for CheerLights {
    fn name(&self) -> &'static str {
        "cheerlights"
    }

    fn description(&self) -> &'static str {
        "The colour everyone is showing"
    }

    fn update_frequency(&self) -> Duration {
        UPDATE_FREQUENCY
    }

    async fn compose(&mut self, canvas: &mut Canvas) -> Result<(), CanvasError> {
        match self.source.current_colour().await {
            Ok(text) => match Pixel::from_hex(&text) {
                Ok(pixel) => {
                    canvas.set_all(pixel);
                    self.colour = Some(text);
                }
                Err(error) => {
                    debug!(error = %error, payload = %text, "cheerlights payload is not a colour");
                    canvas.set_all(Pixel::blank());
                    self.colour = None;
                }
            },
            Err(error) => {
                debug!(error = %error, "cheerlights fetch failed");
                canvas.set_all(Pixel::blank());
                self.colour = None;
            }
        }

        Ok(())
    }
}

impl fmt::Display for CheerLights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CheerLights(Colour:{})",
            self.colour.as_deref().unwrap_or("None")
        )
    }
}
