use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use super::Effect;
use crate::canvas::{Canvas, CanvasError, Pixel};
use crate::feeds::BlockSource;
use crate::models::Color;

const UPDATE_FREQUENCY: Duration = Duration::from_secs(3);

/// Random colours from the ANU Quantum Random Numbers Server: one
/// hex-encoded 3-byte block per pixel, at full brightness. Any fetch
/// failure or payload-shape mismatch blanks the canvas.
pub struct AnuRandom {
    source: Box<dyn BlockSource>,
    data: Option<Vec<String>>,
}

impl AnuRandom {
    pub fn new(source: Box<dyn BlockSource>) -> Self {
        Self { source, data: None }
    }

    fn blank(&mut self, canvas: &mut Canvas) {
        canvas.set_all(Pixel::blank());
        self.data = None;
    }
}

#[async_trait]
impl Effect for AnuRandom {
    fn name(&self) -> &'static str {
        "anu_random"
    }

    fn description(&self) -> &'static str {
        "Quantum random colours"
    }

    fn update_frequency(&self) -> Duration {
        UPDATE_FREQUENCY
    }

    async fn compose(&mut self, canvas: &mut Canvas) -> Result<(), CanvasError> {
        let blocks = match self.source.blocks(canvas.size()).await {
            Ok(blocks) => blocks,
            Err(error) => {
                debug!(error = %error, "quantum fetch failed");
                self.blank(canvas);
                return Ok(());
            }
        };

        if blocks.len() < canvas.size() {
            debug!(
                received = blocks.len(),
                needed = canvas.size(),
                "quantum payload too short"
            );
            self.blank(canvas);
            return Ok(());
        }

        let mut pixels = Vec::with_capacity(canvas.size());
        for block in &blocks[..canvas.size()] {
            match hex::decode(block) {
                Ok(bytes) if bytes.len() == 3 => {
                    pixels.push(Pixel::new(Color::new(bytes[0], bytes[1], bytes[2]), 1.0));
                }
                _ => {
                    debug!(block = %block, "quantum payload block is not a colour");
                    self.blank(canvas);
                    return Ok(());
                }
            }
        }

        for (i, pixel) in pixels.into_iter().enumerate() {
            canvas.set_pixel(i, pixel)?;
        }
        self.data = Some(blocks);

        Ok(())
    }
}

impl fmt::Display for AnuRandom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            Some(blocks) => write!(f, "AnuRandom(Quantum:{})", blocks.join(",")),
            None => write!(f, "AnuRandom(Quantum:None)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::FeedError;

    struct StaticBlocks(Vec<&'static str>);

    #[async_trait]
    impl BlockSource for StaticBlocks {
        async fn blocks(&self, _count: usize) -> Result<Vec<String>, FeedError> {
            Ok(self.0.iter().map(|block| block.to_string()).collect())
        }
    }

    struct FailingFeed;

    #[async_trait]
    impl BlockSource for FailingFeed {
        async fn blocks(&self, _count: usize) -> Result<Vec<String>, FeedError> {
            Err(FeedError::MalformedPayload("stub failure"))
        }
    }

    fn assert_blank(canvas: &Canvas) {
        for i in 0..canvas.size() {
            assert_eq!(canvas.get_pixel(i).unwrap(), Pixel::blank());
        }
    }

    #[tokio::test]
    async fn maps_blocks_to_pixels() {
        let mut canvas = Canvas::new(3).unwrap();
        let mut effect = AnuRandom::new(Box::new(StaticBlocks(vec![
            "ff0000", "00ff00", "0000ff",
        ])));
        effect.compose(&mut canvas).await.unwrap();

        let expected = [Color::new(255, 0, 0), Color::new(0, 255, 0), Color::new(0, 0, 255)];
        for (i, colour) in expected.iter().enumerate() {
            let pixel = canvas.get_pixel(i).unwrap();
            assert_eq!(pixel.color(), *colour);
            assert_eq!(pixel.brightness(), 1.0);
        }
    }

    #[tokio::test]
    async fn fetch_failure_blanks_the_canvas() {
        let mut canvas = Canvas::new(3).unwrap();
        let mut effect = AnuRandom::new(Box::new(FailingFeed));
        effect.compose(&mut canvas).await.unwrap();

        assert_blank(&canvas);
        assert_eq!(effect.to_string(), "AnuRandom(Quantum:None)");
    }

    #[tokio::test]
    async fn short_payload_blanks_the_canvas() {
        let mut canvas = Canvas::new(3).unwrap();
        let mut effect = AnuRandom::new(Box::new(StaticBlocks(vec!["ff0000", "00ff00"])));
        effect.compose(&mut canvas).await.unwrap();

        assert_blank(&canvas);
    }

    #[tokio::test]
    async fn malformed_block_blanks_the_canvas() {
        let mut canvas = Canvas::new(3).unwrap();
        let mut effect = AnuRandom::new(Box::new(StaticBlocks(vec![
            "ff0000", "zzzzzz", "0000ff",
        ])));
        effect.compose(&mut canvas).await.unwrap();

        assert_blank(&canvas);
    }
}
