//! Named colours and colour-space helpers

use palette::{FromColor, Hsv, Srgb};

use crate::models::Color;

lazy_static::lazy_static! {
    pub static ref RED: Color = Color::new(255, 0, 0);
    pub static ref ORANGE: Color = Color::new(255, 165, 0);
    pub static ref YELLOW: Color = Color::new(255, 255, 0);
    pub static ref GREEN: Color = Color::new(0, 255, 0);
    pub static ref BLUE: Color = Color::new(0, 0, 255);
    pub static ref INDIGO: Color = Color::new(75, 0, 130);
    pub static ref VIOLET: Color = Color::new(238, 130, 238);
    pub static ref WHITE: Color = Color::new(255, 255, 255);

    /// The wheel paraded by the solid colours effect, in display order.
    pub static ref COLOUR_WHEEL: [Color; 8] = [
        *RED, *ORANGE, *YELLOW, *GREEN, *BLUE, *INDIGO, *VIOLET, *WHITE,
    ];
}

/// Convert an HSV colour (hue in degrees, saturation and value in `[0, 1]`)
/// to RGB channel bytes.
pub fn hsv(hue: f32, saturation: f32, value: f32) -> Color {
    let rgb = Srgb::from_color(Hsv::new_srgb(hue, saturation, value)).into_format::<u8>();
    Color::new(rgb.red, rgb.green, rgb.blue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsv_primaries() {
        assert_eq!(hsv(0.0, 1.0, 1.0), *RED);
        assert_eq!(hsv(120.0, 1.0, 1.0), *GREEN);
        assert_eq!(hsv(240.0, 1.0, 1.0), *BLUE);
    }

    #[test]
    fn hsv_desaturated_is_grey() {
        let grey = hsv(42.0, 0.0, 0.5);
        assert_eq!(grey.red, grey.green);
        assert_eq!(grey.green, grey.blue);
    }
}
