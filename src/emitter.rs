//! Turn a resolved request into an image file

use crate::error::Result;
use crate::qr::{QrEncoder, Raster, version_number};
use crate::request::RenderRequest;
use image::RgbImage;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// What was written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Emitted {
    /// Output path
    pub path: PathBuf,
    /// Version requested by the caller
    pub requested_version: i64,
    /// Version actually used after auto-fit
    pub version: i16,
    /// Symbol width in modules
    pub modules: usize,
    /// Image edge length in pixels
    pub pixels: u32,
}

/// Encode and rasterise `request` without touching the filesystem.
pub fn build(request: &RenderRequest) -> Result<(RgbImage, Emitted)> {
    let encoder = QrEncoder::new(request.version, request.ec_level)?;
    let raster = Raster::new(
        request.box_size,
        request.border,
        &request.fill_color,
        &request.back_color,
    )?;

    let code = encoder.encode(request.payload.as_bytes())?;
    let image = raster.render(&code)?;

    let emitted = Emitted {
        path: request.filename.clone(),
        requested_version: request.version,
        version: version_number(&code),
        modules: code.width(),
        pixels: image.width(),
    };
    Ok((image, emitted))
}

/// Build the image, save it over `request.filename`, and confirm on `out`.
pub fn emit<W: Write>(request: &RenderRequest, out: &mut W) -> Result<Emitted> {
    let (image, emitted) = build(request)?;

    image.save(&emitted.path)?;
    tracing::info!(
        path = %emitted.path.display(),
        version = emitted.version,
        level = %request.ec_level,
        pixels = emitted.pixels,
        "Saved QR image"
    );

    writeln!(
        out,
        "QR code generated and saved as '{}'.",
        emitted.path.display()
    )?;
    Ok(emitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::request::{ColorSpec, EcLevel, RenderDefaults};

    #[test]
    fn test_build_reports_fitted_version() {
        let mut request = RenderRequest::with_defaults("x".repeat(60), &RenderDefaults::default());
        request.ec_level = EcLevel::H;
        let (image, emitted) = build(&request).unwrap();
        assert!(emitted.version > 1);
        assert_eq!(emitted.requested_version, 1);
        assert_eq!(emitted.modules, 17 + 4 * emitted.version as usize);
        assert_eq!(image.width(), emitted.pixels);
        assert_eq!(emitted.pixels as usize, (emitted.modules + 8) * 10);
    }

    #[test]
    fn test_build_is_deterministic() {
        let request = RenderRequest::with_defaults("same input", &RenderDefaults::default());
        let (first, _) = build(&request).unwrap();
        let (second, _) = build(&request).unwrap();
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn test_build_surfaces_collaborator_errors() {
        let defaults = RenderDefaults::default();

        let mut bad_color = RenderRequest::with_defaults("p", &defaults);
        bad_color.back_color = ColorSpec::new("not-a-color");
        assert!(matches!(build(&bad_color), Err(Error::Color { .. })));

        let mut bad_version = RenderRequest::with_defaults("p", &defaults);
        bad_version.version = 41;
        assert!(matches!(build(&bad_version), Err(Error::InvalidVersion(41))));

        let mut huge_box = RenderRequest::with_defaults("p", &defaults);
        huge_box.box_size = 1_000_000;
        assert!(matches!(
            build(&huge_box),
            Err(Error::InvalidDimension { name: "box size", .. })
        ));

        let mut too_long = RenderRequest::with_defaults("z".repeat(3000), &defaults);
        too_long.ec_level = EcLevel::H;
        assert!(matches!(build(&too_long), Err(Error::DataTooLong { .. })));
    }
}
