use std::fmt::Write;
use std::time;

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use super::{StripError, StripImpl};
use crate::canvas::Pixel;
use crate::models;

/// Appends each frame to a text file, one line per frame, with an optional
/// timestamp and the elapsed time since the previous write.
pub(super) struct FileStrip {
    print_timestamp: bool,
    file_handle: File,
    last_write_time: time::Instant,
    str_buf: String,
}

impl FileStrip {
    pub(super) fn new(config: &models::File) -> Result<Self, StripError> {
        let file_handle = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.output)?;

        Ok(Self {
            print_timestamp: config.print_time_stamp,
            file_handle: File::from_std(file_handle),
            last_write_time: time::Instant::now(),
            str_buf: String::new(),
        })
    }
}

#[async_trait]
impl StripImpl for FileStrip {
    async fn write(&mut self, leds: &[Pixel]) -> Result<(), StripError> {
        self.str_buf.clear();

        if self.print_timestamp {
            let now = Utc::now();
            let elapsed_time_ms = self.last_write_time.elapsed().as_millis();
            self.last_write_time = time::Instant::now();

            write!(self.str_buf, "{} | +{}", now, elapsed_time_ms)?;
        }

        write!(self.str_buf, " [")?;
        for led in leds {
            let scaled = led.scaled();
            write!(
                self.str_buf,
                "{{{},{},{}}}",
                scaled.red, scaled.green, scaled.blue
            )?;
        }
        writeln!(self.str_buf, "]")?;

        self.file_handle.write_all(self.str_buf.as_bytes()).await?;
        self.file_handle.flush().await?;

        Ok(())
    }
}
