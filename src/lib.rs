//! `shimmer` drives a parade of decorative lighting effects on a small
//! addressable-LED strip attached to a single-board computer.
//!
//! One render loop asks the currently selected [effect](effects::Effect) to
//! compose a frame into the shared [canvas](canvas::Canvas), pushes the frame
//! to the [strip](device::Strip) and sleeps for the effect's preferred update
//! frequency. The [parade](parade::Parade) decides which effect is current,
//! cycling in order or picking at random.

#[macro_use]
extern crate tracing;

pub mod canvas;
pub mod color;
pub mod device;
pub mod effects;
pub mod feeds;
pub mod models;
pub mod parade;
pub mod render;
