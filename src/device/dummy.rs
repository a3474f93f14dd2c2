use std::fmt::Write;

use async_trait::async_trait;

use super::{StripError, StripImpl};
use crate::canvas::Pixel;
use crate::models;

/// Terminal preview backend: renders each frame to the log instead of
/// hardware, with the pixel brightness already folded into the channels.
pub(super) struct DummyStrip {
    mode: models::DummyDeviceMode,
    ansi_buf: String,
}

impl DummyStrip {
    pub(super) fn new(config: &models::Dummy) -> Self {
        Self {
            mode: config.mode,
            ansi_buf: String::new(),
        }
    }
}

#[async_trait]
impl StripImpl for DummyStrip {
    async fn write(&mut self, leds: &[Pixel]) -> Result<(), StripError> {
        match self.mode {
            models::DummyDeviceMode::Text => {
                for (i, led) in leds.iter().enumerate() {
                    let scaled = led.scaled();
                    info!(
                        led = %format_args!("{:3}", i),
                        red = %format_args!("{:3}", scaled.red),
                        green = %format_args!("{:3}", scaled.green),
                        blue = %format_args!("{:3}", scaled.blue),
                    );
                }
            }

            models::DummyDeviceMode::Ansi => {
                // Build a truecolor ANSI sequence for the whole frame
                self.ansi_buf.clear();

                for led in leds {
                    let scaled = led.scaled();
                    write!(
                        &mut self.ansi_buf,
                        "\x1B[38;2;{red};{green};{blue}m█",
                        red = scaled.red,
                        green = scaled.green,
                        blue = scaled.blue
                    )?;
                }

                write!(&mut self.ansi_buf, "\x1B[0m")?;

                info!("{}", &self.ansi_buf);
            }
        }

        Ok(())
    }
}
