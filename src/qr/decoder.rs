//! QR read-back using rqrr

use crate::error::{Error, Result};
use image::{DynamicImage, GrayImage};
use std::path::Path;

/// Text and metadata recovered from a rendered symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSymbol {
    /// Decoded payload
    pub text: String,
    /// Symbol version reported by the decoder
    pub version: usize,
}

/// QR code decoder used to check written images
pub struct QrDecoder {}

impl QrDecoder {
    /// Create a new QR decoder with default settings
    pub fn new() -> Self {
        Self {}
    }

    /// Load an image from disk and decode the first symbol in it
    pub fn decode_file(&self, path: &Path) -> Result<DecodedSymbol> {
        let img = image::open(path)?;
        self.decode(&img)
    }

    /// Decode a QR code from an image
    pub fn decode(&self, img: &DynamicImage) -> Result<DecodedSymbol> {
        self.decode_gray(img.to_luma8())
    }

    /// Decode a QR code from a grayscale image
    pub fn decode_gray(&self, img: GrayImage) -> Result<DecodedSymbol> {
        let mut prepared = rqrr::PreparedImage::prepare(img);
        let grids = prepared.detect_grids();

        let grid = grids
            .first()
            .ok_or_else(|| Error::QrDecode("no QR code found in image".to_string()))?;

        match grid.decode() {
            Ok((meta, content)) => {
                tracing::debug!(
                    "Decoded QR: version={:?}, ecc_level={:?}, length={}",
                    meta.version,
                    meta.ecc_level,
                    content.len()
                );

                Ok(DecodedSymbol {
                    text: content,
                    version: meta.version.0,
                })
            }
            Err(e) => Err(Error::QrDecode(format!("Decode failed: {:?}", e))),
        }
    }

    /// Decode `path` and require the text to equal `expected`
    pub fn verify(&self, path: &Path, expected: &str) -> Result<DecodedSymbol> {
        let decoded = self.decode_file(path)?;
        if decoded.text != expected {
            return Err(Error::Verify(format!(
                "{} decodes to {:?}, expected {:?}",
                path.display(),
                decoded.text,
                expected
            )));
        }
        Ok(decoded)
    }
}

impl Default for QrDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::{QrEncoder, Raster};
    use crate::request::{ColorSpec, EcLevel};

    fn rendered(text: &str) -> DynamicImage {
        let code = QrEncoder::new(1, EcLevel::M).unwrap().encode(text.as_bytes()).unwrap();
        let raster = Raster::new(4, 4, &ColorSpec::new("black"), &ColorSpec::new("white")).unwrap();
        DynamicImage::ImageRgb8(raster.render(&code).unwrap())
    }

    #[test]
    fn test_decodes_rendered_symbol() {
        let decoded = QrDecoder::new().decode(&rendered("read me back")).unwrap();
        assert_eq!(decoded.text, "read me back");
        assert_eq!(decoded.version, 1);
    }

    #[test]
    fn test_blank_image_has_no_symbol() {
        let blank = GrayImage::from_pixel(64, 64, image::Luma([255]));
        let err = QrDecoder::new().decode_gray(blank).unwrap_err();
        assert!(matches!(err, Error::QrDecode(_)));
    }
}
