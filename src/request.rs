//! Rendering request model

use crate::error::{Error, Result};
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Filename used when the user does not pick one
pub const DEFAULT_FILENAME: &str = "qr_code.png";

/// Everything needed to produce one QR image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Text to encode; may be empty
    pub payload: String,

    /// Smallest symbol version to try (1 to 40)
    pub version: i64,

    /// Error-correction level
    pub ec_level: EcLevel,

    /// Pixels per module edge
    pub box_size: i64,

    /// Quiet zone width in modules
    pub border: i64,

    /// Module color
    pub fill_color: ColorSpec,

    /// Quiet zone and light module color
    pub back_color: ColorSpec,

    /// Destination image; overwritten if present
    pub filename: PathBuf,
}

impl RenderRequest {
    /// Request for `payload` with every other field taken from `defaults`
    pub fn with_defaults(payload: impl Into<String>, defaults: &RenderDefaults) -> Self {
        Self {
            payload: payload.into(),
            version: defaults.version,
            ec_level: defaults.ec_level,
            box_size: defaults.box_size,
            border: defaults.border,
            fill_color: defaults.fill_color.clone(),
            back_color: defaults.back_color.clone(),
            filename: defaults.filename.clone(),
        }
    }
}

/// Values applied to every field the user did not customize
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderDefaults {
    /// Starting symbol version
    pub version: i64,
    /// Error-correction level
    pub ec_level: EcLevel,
    /// Pixels per module edge
    pub box_size: i64,
    /// Quiet zone width in modules
    pub border: i64,
    /// Module color
    pub fill_color: ColorSpec,
    /// Background color
    pub back_color: ColorSpec,
    /// Output path
    pub filename: PathBuf,
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            version: 1,
            ec_level: EcLevel::L,
            box_size: 10,
            border: 4,
            fill_color: ColorSpec::new("black"),
            back_color: ColorSpec::new("white"),
            filename: PathBuf::from(DEFAULT_FILENAME),
        }
    }
}

/// QR error-correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EcLevel {
    /// About 7% recovery
    #[default]
    L,
    /// About 15% recovery
    M,
    /// About 25% recovery
    Q,
    /// About 30% recovery
    H,
}

impl EcLevel {
    /// Map a user-typed letter to a level.
    ///
    /// Matching is case-insensitive but otherwise exact; anything else
    /// resolves to [`EcLevel::L`] without complaint.
    pub fn from_letter(value: &str) -> Self {
        Self::parse(value).unwrap_or(EcLevel::L)
    }

    /// Strict variant of [`EcLevel::from_letter`] used for config and env values
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "L" => Some(EcLevel::L),
            "M" => Some(EcLevel::M),
            "Q" => Some(EcLevel::Q),
            "H" => Some(EcLevel::H),
            _ => None,
        }
    }

    /// Single-letter name
    pub fn as_char(self) -> char {
        match self {
            EcLevel::L => 'L',
            EcLevel::M => 'M',
            EcLevel::Q => 'Q',
            EcLevel::H => 'H',
        }
    }
}

impl fmt::Display for EcLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl From<EcLevel> for qrcode::EcLevel {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::L => qrcode::EcLevel::L,
            EcLevel::M => qrcode::EcLevel::M,
            EcLevel::Q => qrcode::EcLevel::Q,
            EcLevel::H => qrcode::EcLevel::H,
        }
    }
}

/// A color exactly as the user typed it.
///
/// The vocabulary belongs to the color parser, so nothing is checked until
/// [`ColorSpec::to_rgb`] is called at render time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorSpec(String);

impl ColorSpec {
    /// Wrap a raw specifier
    pub fn new(spec: impl Into<String>) -> Self {
        Self(spec.into())
    }

    /// The raw specifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve to an opaque RGB pixel. Alpha is discarded.
    pub fn to_rgb(&self) -> Result<Rgb<u8>> {
        let color = self
            .0
            .parse::<csscolorparser::Color>()
            .map_err(|e| Error::Color {
                spec: self.0.clone(),
                reason: e.to_string(),
            })?;
        let [r, g, b, _] = color.to_rgba8();
        Ok(Rgb([r, g, b]))
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request() {
        let request = RenderRequest::with_defaults("hello", &RenderDefaults::default());
        assert_eq!(request.payload, "hello");
        assert_eq!(request.version, 1);
        assert_eq!(request.ec_level, EcLevel::L);
        assert_eq!(request.box_size, 10);
        assert_eq!(request.border, 4);
        assert_eq!(request.fill_color.as_str(), "black");
        assert_eq!(request.back_color.as_str(), "white");
        assert_eq!(request.filename, PathBuf::from("qr_code.png"));
    }

    #[test]
    fn test_ec_level_from_letter() {
        assert_eq!(EcLevel::from_letter("m"), EcLevel::M);
        assert_eq!(EcLevel::from_letter("Q"), EcLevel::Q);
        assert_eq!(EcLevel::from_letter("h"), EcLevel::H);
        assert_eq!(EcLevel::from_letter("x"), EcLevel::L);
        assert_eq!(EcLevel::from_letter(""), EcLevel::L);
        assert_eq!(EcLevel::from_letter(" M"), EcLevel::L);
        assert!(EcLevel::parse("x").is_none());
    }

    #[test]
    fn test_color_spec_resolution() {
        assert_eq!(ColorSpec::new("black").to_rgb().unwrap(), Rgb([0, 0, 0]));
        assert_eq!(ColorSpec::new("#ff8000").to_rgb().unwrap(), Rgb([255, 128, 0]));
        assert_eq!(
            ColorSpec::new("rgb(0, 0, 255)").to_rgb().unwrap(),
            Rgb([0, 0, 255])
        );
    }

    #[test]
    fn test_color_spec_rejects_unknown() {
        let err = ColorSpec::new("notacolor").to_rgb().unwrap_err();
        assert!(matches!(err, Error::Color { ref spec, .. } if spec == "notacolor"));
        assert!(ColorSpec::new("").to_rgb().is_err());
    }
}
