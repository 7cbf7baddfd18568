//! Accumulation color policies shared by the raster generators.

use serde::{Deserialize, Serialize};

use crate::raster::Rgba;

/// How a generator colors the pixels it plots. Not every generator
/// supports every mode; constructors reject unsupported combinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    /// Black for the stochastic generators; propagate the source pixel's
    /// own RGB for the deterministic pixel generator.
    Plain,
    /// Density mapped to hue by repeated incremental tinting.
    Heatmap,
    /// Red channel proportional to the selected transform's table index.
    ColorByTransform,
    /// Fixed red/green/blue cycled by transform index, for inspecting
    /// which transform produced which region.
    Demo,
}

impl ColorMode {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "plain" => Ok(ColorMode::Plain),
            "heatmap" => Ok(ColorMode::Heatmap),
            "color-by-transform" => Ok(ColorMode::ColorByTransform),
            "demo" => Ok(ColorMode::Demo),
            other => Err(format!("unknown color mode \"{}\"", other)),
        }
    }
}

/// The flame palette: a fixed red ramp over the smoothed color scalar,
/// with the hit-density count carried in alpha.
pub fn flame_ramp(color: f64, alpha: u8) -> Rgba {
    let red = (color.clamp(0.0, 1.0) * 255.0).round() as u8;
    [red, 0, 0, alpha]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_modes() {
        assert_eq!(ColorMode::parse("plain"), Ok(ColorMode::Plain));
        assert_eq!(ColorMode::parse("heatmap"), Ok(ColorMode::Heatmap));
        assert_eq!(
            ColorMode::parse("color-by-transform"),
            Ok(ColorMode::ColorByTransform)
        );
        assert_eq!(ColorMode::parse("demo"), Ok(ColorMode::Demo));
        assert!(ColorMode::parse("neon").is_err());
    }

    #[test]
    fn ramp_is_clamped() {
        assert_eq!(flame_ramp(0.0, 1), [0, 0, 0, 1]);
        assert_eq!(flame_ramp(1.0, 255), [255, 0, 0, 255]);
        assert_eq!(flame_ramp(2.0, 5), [255, 0, 0, 5]);
    }
}
