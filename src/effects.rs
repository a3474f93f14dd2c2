//! The effect contract and the built-in effect variants
//!
//! Every effect owns whatever state its animation needs and composes one
//! full frame into the shared canvas per call. Remote-feed effects degrade
//! to a blank frame on any fetch failure; they never propagate I/O errors.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::canvas::{Canvas, CanvasError};
use crate::feeds::{BlockSource, BroadcastSource};

mod anu_random;
mod binary_clock;
mod candle;
mod cheerlights;
mod gradient_graph;
mod rainbow;
mod random_blink;
mod solid_colours;

pub use anu_random::AnuRandom;
pub use binary_clock::BinaryClock;
pub use candle::Candle;
pub use cheerlights::CheerLights;
pub use gradient_graph::GradientGraph;
pub use rainbow::Rainbow;
pub use random_blink::RandomBlink;
pub use solid_colours::SolidColours;

/// One frame-producing animation. The `Display` implementation shows the
/// effect's internal state for debug logging.
#[async_trait]
pub trait Effect: Send + fmt::Display {
    /// Stable identifier, unique within the parade.
    fn name(&self) -> &'static str;

    /// One line for the effect listing.
    fn description(&self) -> &'static str;

    /// How long to sleep between frames while this effect is selected.
    fn update_frequency(&self) -> Duration;

    /// Write exactly `canvas.size()` pixel values into the canvas. Must
    /// fully determine the visible frame; no stale pixels may survive from
    /// a previous effect.
    async fn compose(&mut self, canvas: &mut Canvas) -> Result<(), CanvasError>;
}

/// The statically declared effect registry, in display order.
pub fn registry(
    effect_window: Duration,
    cheerlights: Box<dyn BroadcastSource>,
    quantum: Box<dyn BlockSource>,
) -> Vec<Box<dyn Effect>> {
    vec![
        Box::new(Candle::new()),
        Box::new(GradientGraph::new(effect_window)),
        Box::new(SolidColours::new()),
        Box::new(BinaryClock::new()),
        Box::new(Rainbow::new()),
        Box::new(CheerLights::new(cheerlights)),
        Box::new(AnuRandom::new(quantum)),
        Box::new(RandomBlink::new()),
    ]
}
