//! The hardware side of the strip
//!
//! The render loop talks to a [Strip], which buffers one frame of pixels and
//! hands it to a backend on [Strip::show]. Backends cover a terminal
//! preview, a text file and ws2812 LEDs over SPI.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::canvas::Pixel;
use crate::models::{self, DeviceConfig};

mod dummy;
mod file;
mod ws2812spi;

#[derive(Debug, Error)]
pub enum StripError {
    #[error("pixel index out of range: {index} (strip size {size})")]
    OutOfRange { index: usize, size: usize },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("format error: {0}")]
    Format(#[from] std::fmt::Error),
}

#[async_trait]
pub(crate) trait StripImpl: Send {
    /// Push one frame to the hardware.
    ///
    /// `leds` is always exactly the configured LED count long; the [Strip]
    /// wrapper maintains that invariant.
    async fn write(&mut self, leds: &[Pixel]) -> Result<(), StripError>;
}

pub struct Strip {
    inner: Box<dyn StripImpl>,
    leds: Vec<Pixel>,
    clear_on_exit: bool,
}

impl Strip {
    pub fn new(config: &models::Device) -> Result<Self, StripError> {
        let inner: Box<dyn StripImpl> = match config {
            models::Device::Dummy(config) => Box::new(dummy::DummyStrip::new(config)),
            models::Device::File(config) => Box::new(file::FileStrip::new(config)?),
            models::Device::Ws2812Spi(config) => Box::new(ws2812spi::Ws2812SpiStrip::new(config)),
        };

        Ok(Self {
            inner,
            leds: vec![Pixel::blank(); config.led_count()],
            clear_on_exit: false,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_impl(inner: Box<dyn StripImpl>, led_count: usize) -> Self {
        Self {
            inner,
            leds: vec![Pixel::blank(); led_count],
            clear_on_exit: false,
        }
    }

    pub fn led_count(&self) -> usize {
        self.leds.len()
    }

    /// Hint that shutting down should leave the strip dark; honoured by
    /// [Strip::close].
    pub fn set_clear_on_exit(&mut self) {
        self.clear_on_exit = true;
    }

    /// Stage one pixel of the next frame.
    pub fn set_pixel(&mut self, index: usize, pixel: Pixel) -> Result<(), StripError> {
        let size = self.leds.len();
        let slot = self
            .leds
            .get_mut(index)
            .ok_or(StripError::OutOfRange { index, size })?;
        *slot = pixel;
        Ok(())
    }

    /// Flush the staged frame to the hardware.
    pub async fn show(&mut self) -> Result<(), StripError> {
        self.inner.write(&self.leds).await
    }

    /// Blank the whole strip, immediately.
    pub async fn clear(&mut self) -> Result<(), StripError> {
        for led in &mut self.leds {
            *led = Pixel::blank();
        }
        self.show().await
    }

    pub async fn close(&mut self) -> Result<(), StripError> {
        if self.clear_on_exit {
            self.clear().await?;
        }
        Ok(())
    }
}

impl fmt::Debug for Strip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strip")
            .field("led_count", &self.leds.len())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::capture_strip;
    use super::*;
    use crate::models::Color;

    #[tokio::test]
    async fn show_flushes_the_staged_frame() {
        let (mut strip, frames) = capture_strip(3);
        strip
            .set_pixel(1, Pixel::new(Color::new(1, 2, 3), 1.0))
            .unwrap();
        strip.show().await.unwrap();

        let frames = frames.lock().unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0][0], Pixel::blank());
        assert_eq!(frames[0][1], Pixel::new(Color::new(1, 2, 3), 1.0));
    }

    #[test]
    fn set_pixel_rejects_out_of_range() {
        let (mut strip, _) = capture_strip(3);
        assert!(matches!(
            strip.set_pixel(3, Pixel::blank()),
            Err(StripError::OutOfRange { index: 3, size: 3 })
        ));
    }

    #[tokio::test]
    async fn close_clears_only_when_hinted() {
        let (mut strip, frames) = capture_strip(2);
        strip.close().await.unwrap();
        assert!(frames.lock().unwrap().is_empty());

        strip.set_clear_on_exit();
        strip
            .set_pixel(0, Pixel::new(Color::new(9, 9, 9), 1.0))
            .unwrap();
        strip.close().await.unwrap();

        let frames = frames.lock().unwrap();
        assert_eq!(frames.len(), 1);
        assert!(frames[0].iter().all(|led| *led == Pixel::blank()));
    }
}
