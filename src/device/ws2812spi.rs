use async_trait::async_trait;
use spidev::{SpiModeFlags, Spidev, SpidevOptions, SpidevTransfer};

use super::{StripError, StripImpl};
use crate::canvas::Pixel;
use crate::models;

const SPI_BYTES_PER_LED: usize = 3 * SPI_BYTES_PER_COLOUR;
const SPI_BYTES_PER_COLOUR: usize = 4;
const SPI_FRAME_END_LATCH_BYTES: usize = 116;
const BITPAIR_TO_BYTE: [u8; 4] = [0b10001000, 0b10001100, 0b11001000, 0b11001100];

/// ws2812 LEDs behind a SPI transceiver. The device node may not exist yet
/// when the strip is configured, so opening it is retried on every write
/// until it succeeds.
pub(super) struct Ws2812SpiStrip {
    dev: ImplState,
    config: models::Ws2812Spi,
    notified_error: bool,
    buf: Vec<u8>,
}

enum ImplState {
    Pending,
    Ready(Spidev),
}

impl ImplState {
    fn as_dev(&self) -> Option<&Spidev> {
        match self {
            ImplState::Ready(dev) => Some(dev),
            _ => None,
        }
    }

    fn try_init(&mut self, config: &models::Ws2812Spi) -> Result<&Spidev, StripError> {
        match self {
            ImplState::Pending => {
                let mut dev = Spidev::open(&config.output)?;
                let options = SpidevOptions::new()
                    .bits_per_word(8)
                    .max_speed_hz(config.rate as _)
                    .mode(SpiModeFlags::SPI_MODE_0)
                    .build();
                dev.configure(&options)?;

                info!(path = %config.output, "initialized SPI device");

                *self = ImplState::Ready(dev);
                Ok(self.as_dev().expect("state is ready"))
            }

            ImplState::Ready(dev) => Ok(dev),
        }
    }
}

impl Ws2812SpiStrip {
    pub(super) fn new(config: &models::Ws2812Spi) -> Self {
        let buf = vec![
            0;
            config.led_count as usize * SPI_BYTES_PER_LED + SPI_FRAME_END_LATCH_BYTES
        ];

        let mut this = Self {
            dev: ImplState::Pending,
            config: config.clone(),
            notified_error: false,
            buf,
        };

        // Try to open the device early
        if let Err(error) = this.dev.try_init(&this.config) {
            warn!(%error, path = %this.config.output, "failed to initialize SPI device, will try again later");
        }

        this
    }
}

#[async_trait]
impl StripImpl for Ws2812SpiStrip {
    async fn write(&mut self, leds: &[Pixel]) -> Result<(), StripError> {
        // Encode the frame, brightness folded into the channel bytes
        let mut ptr = 0;
        for led in leds {
            let (r, g, b) = self
                .config
                .color_order
                .reorder_from_rgb(led.scaled())
                .into_components();
            let mut color_bits = ((r as u32) << 16) | ((g as u32) << 8) | (b as u32);

            for j in (0..SPI_BYTES_PER_LED).rev() {
                self.buf[ptr + j] = BITPAIR_TO_BYTE[(color_bits & 0x3) as usize];
                color_bits >>= 2;
            }

            ptr += SPI_BYTES_PER_LED;
        }

        for dst in self.buf.iter_mut().skip(ptr) {
            *dst = 0;
        }

        if self.config.invert {
            for byte in &mut self.buf {
                *byte = !*byte;
            }
        }

        let mut transfer = SpidevTransfer::write(&self.buf);

        match self.dev.try_init(&self.config) {
            Ok(dev) => {
                self.notified_error = false;
                dev.transfer(&mut transfer)?;
            }
            Err(error) => {
                if !self.notified_error {
                    self.notified_error = true;
                    error!(error = %error, "failed to initialize SPI device");
                }
            }
        }

        Ok(())
    }
}
