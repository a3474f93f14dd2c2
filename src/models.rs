//! Configuration model for the strip and the effect parade

use ambassador::{delegatable_trait, Delegate};
use derive_more::From;
use serde_derive::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, VariantNames};
use thiserror::Error;
use validator::Validate;

pub type Color = palette::rgb::LinSrgb<u8>;

/// How the parade picks the next effect.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, VariantNames,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum DisplayMode {
    Cycle,
    Random,
}

impl Default for DisplayMode {
    fn default() -> Self {
        Self::Cycle
    }
}

/// Runtime settings, from the configuration file with the command line
/// folded on top. Ranges match the original shim demo limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub parade: DisplayMode,
    /// How long to display each effect for, in seconds
    #[validate(range(min = 1, max = 180))]
    pub duration: u32,
    /// How many duration windows to run before stopping
    #[validate(range(min = 1, max = 240))]
    pub repeat: u32,
    /// Default pixel brightness on a 1-10 scale
    #[validate(range(min = 1, max = 10))]
    pub brightness: u8,
    /// Reverse the physical index mapping
    pub invert: bool,
    /// Effect names to restrict the parade to; empty means all
    pub effects: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            parade: DisplayMode::Cycle,
            duration: 10,
            repeat: 1,
            brightness: 8,
            invert: false,
            effects: Vec::new(),
        }
    }
}

#[delegatable_trait]
pub trait DeviceConfig: Sync + Send {
    fn led_count(&self) -> usize;
}

macro_rules! impl_device_config {
    ($t:ty) => {
        impl DeviceConfig for $t {
            fn led_count(&self) -> usize {
                self.led_count as _
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DummyDeviceMode {
    Text,
    Ansi,
}

impl Default for DummyDeviceMode {
    fn default() -> Self {
        Self::Ansi
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Dummy {
    #[validate(range(min = 1))]
    pub led_count: u32,
    pub mode: DummyDeviceMode,
}

impl_device_config!(Dummy);

impl Default for Dummy {
    fn default() -> Self {
        Self {
            // The Pimoroni LED shim pixel count
            led_count: 28,
            mode: Default::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct File {
    #[validate(range(min = 1))]
    pub led_count: u32,
    pub output: String,
    #[serde(default = "Default::default")]
    pub print_time_stamp: bool,
}

impl_device_config!(File);

fn default_ws_spi_rate() -> i32 {
    3000000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Ws2812Spi {
    #[serde(default = "Default::default")]
    pub color_order: ColorOrder,
    #[validate(range(min = 1))]
    pub led_count: u32,
    #[serde(default = "Default::default")]
    pub invert: bool,
    pub output: String,
    #[serde(default = "default_ws_spi_rate")]
    pub rate: i32,
}

impl_device_config!(Ws2812Spi);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorOrder {
    Rgb,
    Rbg,
    Grb,
    Gbr,
    Brg,
    Bgr,
}

impl Default for ColorOrder {
    fn default() -> Self {
        Self::Rgb
    }
}

impl ColorOrder {
    pub fn reorder_from_rgb(&self, color: Color) -> Color {
        let (r, g, b) = color.into_components();

        Color::from_components(match self {
            ColorOrder::Rgb => (r, g, b),
            ColorOrder::Rbg => (r, b, g),
            ColorOrder::Grb => (g, r, b),
            ColorOrder::Gbr => (g, b, r),
            ColorOrder::Brg => (b, r, g),
            ColorOrder::Bgr => (b, g, r),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Delegate, From)]
#[serde(rename_all = "lowercase", tag = "type", deny_unknown_fields)]
#[delegate(DeviceConfig)]
pub enum Device {
    Dummy(Dummy),
    File(File),
    Ws2812Spi(Ws2812Spi),
}

impl Default for Device {
    fn default() -> Self {
        Self::Dummy(Dummy::default())
    }
}

impl Validate for Device {
    fn validate(&self) -> Result<(), validator::ValidationErrors> {
        match self {
            Device::Dummy(device) => device.validate(),
            Device::File(device) => device.validate(),
            Device::Ws2812Spi(device) => device.validate(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    #[validate(nested)]
    pub device: Device,
    #[validate(nested)]
    pub settings: Settings,
}

impl Config {
    pub async fn load_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let full = tokio::fs::read_to_string(path).await?;
        Ok(toml::from_str(&full)?)
    }

    pub fn to_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mode_parses_case_insensitively() {
        use std::str::FromStr;

        assert_eq!(DisplayMode::from_str("CYCLE").unwrap(), DisplayMode::Cycle);
        assert_eq!(DisplayMode::from_str("cycle").unwrap(), DisplayMode::Cycle);
        assert_eq!(
            DisplayMode::from_str("Random").unwrap(),
            DisplayMode::Random
        );
        assert!(DisplayMode::from_str("BANANA").is_err());
    }

    #[test]
    fn display_mode_displays_uppercase() {
        assert_eq!(DisplayMode::Cycle.to_string(), "CYCLE");
        assert_eq!(DisplayMode::Random.to_string(), "RANDOM");
    }

    #[test]
    fn default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn settings_ranges_are_enforced() {
        let mut settings = Settings::default();
        settings.duration = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.repeat = 241;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.brightness = 11;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn device_led_count_is_enforced() {
        let device = Device::Dummy(Dummy {
            led_count: 0,
            mode: DummyDeviceMode::Text,
        });
        assert!(device.validate().is_err());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config::default();
        let text = config.to_string().unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn color_order_reorders_channels() {
        let color = Color::new(1, 2, 3);
        assert_eq!(ColorOrder::Rgb.reorder_from_rgb(color), Color::new(1, 2, 3));
        assert_eq!(ColorOrder::Grb.reorder_from_rgb(color), Color::new(2, 1, 3));
        assert_eq!(ColorOrder::Bgr.reorder_from_rgb(color), Color::new(3, 2, 1));
    }
}
