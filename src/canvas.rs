//! Frame buffer mirroring the physical strip's pixel count

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use thiserror::Error;

use crate::models::Color;

/// Brightness setting on the 1-10 scale applied to pixels built without an
/// explicit brightness. Set once at startup, before any effect runs.
static DEFAULT_BRIGHTNESS: AtomicU8 = AtomicU8::new(8);

#[derive(Debug, Error)]
pub enum PixelError {
    #[error("pixel requires 3 or 4 bytes, found {0}")]
    InvalidLength(usize),
    #[error("invalid hex colour: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// A single LED: colour channels plus a brightness independent of them.
///
/// Brightness is not validated against hardware capability here; backends
/// clamp or scale as they see fit when the frame is pushed out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pixel {
    color: Color,
    brightness: f32,
}

impl Pixel {
    pub fn new(color: Color, brightness: f32) -> Self {
        Self { color, brightness }
    }

    /// A pixel at the process-wide default brightness.
    pub fn solid(color: Color) -> Self {
        Self::new(color, Self::default_brightness())
    }

    /// The cleared/error state: all channels and brightness at zero.
    pub fn blank() -> Self {
        Self::new(Color::new(0, 0, 0), 0.0)
    }

    /// Build from 3 raw bytes (default brightness) or 4 (the last byte is
    /// the brightness, scaled down from 0-255).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PixelError> {
        match bytes {
            &[r, g, b] => Ok(Self::solid(Color::new(r, g, b))),
            &[r, g, b, brightness] => Ok(Self::new(
                Color::new(r, g, b),
                brightness as f32 / 255.0,
            )),
            other => Err(PixelError::InvalidLength(other.len())),
        }
    }

    /// Parse a hex colour string, with or without a leading `#`.
    pub fn from_hex(text: &str) -> Result<Self, PixelError> {
        let bytes = hex::decode(text.trim_start_matches('#'))?;
        Self::from_bytes(&bytes)
    }

    /// Configure the process-wide default brightness from the 1-10 setting.
    pub fn set_default_brightness(setting: u8) {
        DEFAULT_BRIGHTNESS.store(setting, Ordering::Relaxed);
    }

    pub fn default_brightness() -> f32 {
        DEFAULT_BRIGHTNESS.load(Ordering::Relaxed) as f32 / 10.0
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn red(&self) -> u8 {
        self.color.red
    }

    pub fn green(&self) -> u8 {
        self.color.green
    }

    pub fn blue(&self) -> u8 {
        self.color.blue
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Channel bytes with the brightness folded in, for device backends that
    /// have no separate brightness control.
    pub fn scaled(&self) -> Color {
        Color::new(
            (self.color.red as f32 * self.brightness) as u8,
            (self.color.green as f32 * self.brightness) as u8,
            (self.color.blue as f32 * self.brightness) as u8,
        )
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pixel(r:{}, g:{}, b:{}, brightness:{})",
            self.red(),
            self.green(),
            self.blue(),
            self.brightness
        )
    }
}

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("canvas size must be positive")]
    ZeroSize,
    #[error("pixel index out of range: {index} (canvas size {size})")]
    OutOfRange { index: usize, size: usize },
}

/// Fixed-size frame buffer. The length never changes after construction;
/// effects write into it and the render loop reads it back out.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pixels: Vec<Pixel>,
}

impl Canvas {
    pub fn new(size: usize) -> Result<Self, CanvasError> {
        if size == 0 {
            return Err(CanvasError::ZeroSize);
        }

        Ok(Self {
            pixels: vec![Pixel::blank(); size],
        })
    }

    pub fn size(&self) -> usize {
        self.pixels.len()
    }

    pub fn get_pixel(&self, index: usize) -> Result<Pixel, CanvasError> {
        self.pixels
            .get(index)
            .copied()
            .ok_or_else(|| CanvasError::OutOfRange {
                index,
                size: self.pixels.len(),
            })
    }

    pub fn set_pixel(&mut self, index: usize, pixel: Pixel) -> Result<(), CanvasError> {
        let size = self.pixels.len();
        let slot = self
            .pixels
            .get_mut(index)
            .ok_or(CanvasError::OutOfRange { index, size })?;
        *slot = pixel;
        Ok(())
    }

    /// Overwrite every slot with the same value.
    pub fn set_all(&mut self, pixel: Pixel) {
        for slot in &mut self.pixels {
            *slot = pixel;
        }
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, pixel) in self.pixels.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", pixel)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_from_three_bytes() {
        let pixel = Pixel::from_bytes(&[10, 20, 30]).unwrap();
        assert_eq!(pixel.red(), 10);
        assert_eq!(pixel.green(), 20);
        assert_eq!(pixel.blue(), 30);
        // Default brightness applied only when omitted
        let other = Pixel::solid(Color::new(10, 20, 30));
        assert_eq!(pixel, other);
    }

    #[test]
    fn pixel_from_four_bytes() {
        let pixel = Pixel::from_bytes(&[10, 20, 30, 255]).unwrap();
        assert_eq!(pixel.red(), 10);
        assert_eq!(pixel.green(), 20);
        assert_eq!(pixel.blue(), 30);
        assert_eq!(pixel.brightness(), 1.0);
    }

    #[test]
    fn pixel_from_wrong_arity() {
        assert!(matches!(
            Pixel::from_bytes(&[1, 2]),
            Err(PixelError::InvalidLength(2))
        ));
        assert!(matches!(
            Pixel::from_bytes(&[1, 2, 3, 4, 5]),
            Err(PixelError::InvalidLength(5))
        ));
    }

    #[test]
    fn pixel_from_hex() {
        let pixel = Pixel::from_hex("#ff8000").unwrap();
        assert_eq!(
            (pixel.red(), pixel.green(), pixel.blue()),
            (255, 128, 0)
        );

        let bare = Pixel::from_hex("ff8000").unwrap();
        assert_eq!(pixel, bare);

        let full = Pixel::from_hex("#ff8000ff").unwrap();
        assert_eq!(full.brightness(), 1.0);
    }

    #[test]
    fn pixel_from_invalid_hex() {
        assert!(matches!(
            Pixel::from_hex("zzzzzz"),
            Err(PixelError::InvalidHex(_))
        ));
        // Valid hex, but not a colour
        assert!(matches!(
            Pixel::from_hex("ffee"),
            Err(PixelError::InvalidLength(2))
        ));
    }

    #[test]
    fn default_brightness_follows_setting() {
        Pixel::set_default_brightness(5);
        assert_eq!(Pixel::default_brightness(), 0.5);
        assert_eq!(Pixel::from_bytes(&[1, 2, 3]).unwrap().brightness(), 0.5);
        Pixel::set_default_brightness(8);
        assert_eq!(Pixel::default_brightness(), 0.8);
    }

    #[test]
    fn scaled_folds_brightness_into_channels() {
        let pixel = Pixel::new(Color::new(200, 100, 0), 0.5);
        assert_eq!(pixel.scaled(), Color::new(100, 50, 0));

        let full = Pixel::new(Color::new(200, 100, 0), 1.0);
        assert_eq!(full.scaled(), Color::new(200, 100, 0));
    }

    #[test]
    fn canvas_starts_blank() {
        let canvas = Canvas::new(4).unwrap();
        assert_eq!(canvas.size(), 4);
        for i in 0..4 {
            assert_eq!(canvas.get_pixel(i).unwrap(), Pixel::blank());
        }
    }

    #[test]
    fn canvas_rejects_zero_size() {
        assert!(matches!(Canvas::new(0), Err(CanvasError::ZeroSize)));
    }

    #[test]
    fn canvas_rejects_out_of_range() {
        let mut canvas = Canvas::new(3).unwrap();
        assert!(matches!(
            canvas.get_pixel(3),
            Err(CanvasError::OutOfRange { index: 3, size: 3 })
        ));
        assert!(matches!(
            canvas.set_pixel(7, Pixel::blank()),
            Err(CanvasError::OutOfRange { index: 7, size: 3 })
        ));
    }

    #[test]
    fn canvas_writes_are_visible_and_local() {
        let mut canvas = Canvas::new(3).unwrap();
        let pixel = Pixel::new(Color::new(10, 20, 30), 1.0);
        canvas.set_pixel(1, pixel).unwrap();
        assert_eq!(canvas.get_pixel(1).unwrap(), pixel);
        assert_eq!(canvas.get_pixel(0).unwrap(), Pixel::blank());
        assert_eq!(canvas.get_pixel(2).unwrap(), Pixel::blank());
    }

    #[test]
    fn canvas_set_all() {
        let mut canvas = Canvas::new(3).unwrap();
        let pixel = Pixel::new(Color::new(1, 2, 3), 1.0);
        canvas.set_all(pixel);
        for i in 0..3 {
            assert_eq!(canvas.get_pixel(i).unwrap(), pixel);
        }
    }
}
