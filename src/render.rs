//! The render loop: compose, push to hardware, sleep
//!
//! One tick asks the current effect for a frame, copies the canvas out to
//! the strip (honouring the invert flag) and sleeps for the effect's update
//! frequency. Effects rotate once their duration window is spent; the loop
//! stops when the repeat budget runs out, the operator interrupts, or an
//! unexpected error surfaces. Cleanup runs no matter which of those it was.

use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::signal;
use tokio::time;

use crate::canvas::{Canvas, CanvasError};
use crate::device::{Strip, StripError};
use crate::models::Settings;
use crate::parade::{Parade, ParadeError};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Parade(#[from] ParadeError),
    #[error(transparent)]
    Canvas(#[from] CanvasError),
    #[error(transparent)]
    Strip(#[from] StripError),
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// How long each effect stays selected.
    pub duration: Duration,
    /// How many duration windows to run before stopping.
    pub repeat: u32,
    /// Reverse the physical index mapping.
    pub invert: bool,
}

impl From<&Settings> for RenderOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            duration: Duration::from_secs(settings.duration as u64),
            repeat: settings.repeat,
            invert: settings.invert,
        }
    }
}

/// Run the parade to completion. The strip is cleared on the way out
/// regardless of how the loop ended.
pub async fn run(
    parade: &mut Parade,
    canvas: &mut Canvas,
    strip: &mut Strip,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    strip.set_clear_on_exit();

    let result = parade_loop(parade, canvas, strip, options).await;
    match &result {
        Ok(()) => info!("parade finished"),
        Err(error) => error!(error = %error, "unexpected render failure"),
    }

    // Cleanup is unconditional
    if let Err(error) = strip.clear().await {
        error!(error = %error, "failed to clear strip");
    }
    if let Err(error) = strip.close().await {
        error!(error = %error, "failed to close strip");
    }

    result
}

async fn parade_loop(
    parade: &mut Parade,
    canvas: &mut Canvas,
    strip: &mut Strip,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    let mut remaining = options.repeat as i64;
    let mut anchor: Option<Instant> = None;

    loop {
        // Rotate once the current effect has used up its window; the unset
        // anchor forces a rotation on the very first tick.
        if anchor
            .map(|anchor| anchor.elapsed() > options.duration)
            .unwrap_or(true)
        {
            remaining -= 1;
            if remaining < 0 {
                break;
            }

            let effect = parade.next()?;
            info!(effect = %effect.name(), remaining = remaining, "switching effect");
            anchor = Some(Instant::now());
        }

        let effect = parade.current_mut()?;
        effect.compose(canvas).await?;
        debug!(state = %effect);
        trace!(canvas = %canvas);

        push_frame(canvas, strip, options.invert)?;
        strip.show().await?;

        let nap = effect.update_frequency();
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("execution interrupted");
                break;
            }
            _ = time::sleep(nap) => {}
        }
    }

    Ok(())
}

/// Copy the canvas out to the strip, mapping logical to physical indices.
fn push_frame(canvas: &Canvas, strip: &mut Strip, invert: bool) -> Result<(), RenderError> {
    for i in 0..canvas.size() {
        let position = if invert { canvas.size() - 1 - i } else { i };
        strip.set_pixel(position, canvas.get_pixel(i)?)?;
    }
    Ok(())
}
