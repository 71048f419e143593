//! Rasterise a QR symbol into an RGB image

use crate::error::{Error, Result};
use crate::request::ColorSpec;
use image::{Rgb, RgbImage};
use qrcode::{Color, QrCode};

/// Largest RGB buffer a render may allocate, matching `image`'s default allocation limit
pub const MAX_IMAGE_BYTES: u64 = 512 * 1024 * 1024;

/// Module size, quiet zone and palette for rasterising a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Raster {
    box_size: u32,
    border: u32,
    fill: Rgb<u8>,
    back: Rgb<u8>,
}

impl Raster {
    /// Validate dimensions and resolve both colors.
    pub fn new(box_size: i64, border: i64, fill: &ColorSpec, back: &ColorSpec) -> Result<Self> {
        let box_size = u32::try_from(box_size)
            .ok()
            .filter(|&size| size > 0)
            .ok_or(Error::InvalidDimension {
                name: "box size",
                value: box_size,
                reason: "must be a positive integer",
            })?;
        let border = u32::try_from(border).map_err(|_| Error::InvalidDimension {
            name: "border",
            value: border,
            reason: "must be a non-negative integer",
        })?;

        Ok(Self {
            box_size,
            border,
            fill: fill.to_rgb()?,
            back: back.to_rgb()?,
        })
    }

    /// Edge length in pixels of the image for a symbol `modules` wide
    pub fn side_pixels(&self, modules: usize) -> Result<u32> {
        let modules = u32::try_from(modules).map_err(|_| Error::Image("symbol too wide".into()))?;
        let side = self
            .border
            .checked_mul(2)
            .and_then(|quiet| quiet.checked_add(modules))
            .and_then(|total| total.checked_mul(self.box_size))
            .ok_or(Error::InvalidDimension {
                name: "box size",
                value: i64::from(self.box_size),
                reason: "image dimensions overflow",
            })?;

        let bytes = (u64::from(side) * u64::from(side)).saturating_mul(3);
        if bytes > MAX_IMAGE_BYTES {
            return Err(Error::InvalidDimension {
                name: "box size",
                value: i64::from(self.box_size),
                reason: "image exceeds the 512 MiB raster limit",
            });
        }

        Ok(side)
    }

    /// Paint `code` with one `box_size` square per module.
    pub fn render(&self, code: &QrCode) -> Result<RgbImage> {
        let width = code.width();
        let side = self.side_pixels(width)?;
        let colors = code.to_colors();
        let border = self.border as usize;

        let image = RgbImage::from_fn(side, side, |x, y| {
            let mx = (x / self.box_size) as usize;
            let my = (y / self.box_size) as usize;
            let inside = (border..border + width).contains(&mx)
                && (border..border + width).contains(&my);

            if inside && colors[(my - border) * width + (mx - border)] == Color::Dark {
                self.fill
            } else {
                self.back
            }
        });

        tracing::trace!(side, modules = width, "Rendered QR raster");
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black_on_white(box_size: i64, border: i64) -> Raster {
        Raster::new(
            box_size,
            border,
            &ColorSpec::new("black"),
            &ColorSpec::new("white"),
        )
        .unwrap()
    }

    #[test]
    fn test_dimensions_follow_box_and_border() {
        let code = QrCode::new(b"hello").unwrap();
        let image = black_on_white(10, 4).render(&code).unwrap();
        assert_eq!(image.width(), (21 + 8) * 10);
        assert_eq!(image.height(), image.width());

        let tight = black_on_white(1, 0).render(&code).unwrap();
        assert_eq!(tight.width(), 21);
    }

    #[test]
    fn test_quiet_zone_uses_background() {
        let code = QrCode::new(b"hello").unwrap();
        let image = black_on_white(3, 2).render(&code).unwrap();
        assert_eq!(*image.get_pixel(0, 0), Rgb([255, 255, 255]));
        assert_eq!(*image.get_pixel(5, 5), Rgb([255, 255, 255]));
        // Top-left finder pattern corner starts right after the border.
        assert_eq!(*image.get_pixel(6, 6), Rgb([0, 0, 0]));
        assert_eq!(*image.get_pixel(8, 8), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_custom_palette() {
        let code = QrCode::new(b"palette").unwrap();
        let raster = Raster::new(2, 1, &ColorSpec::new("navy"), &ColorSpec::new("#ffffe0")).unwrap();
        let image = raster.render(&code).unwrap();
        assert_eq!(*image.get_pixel(0, 0), Rgb([0xff, 0xff, 0xe0]));
        assert_eq!(*image.get_pixel(2, 2), Rgb([0, 0, 0x80]));
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        let white = ColorSpec::new("white");
        let black = ColorSpec::new("black");
        assert!(matches!(
            Raster::new(0, 4, &black, &white),
            Err(Error::InvalidDimension { name: "box size", .. })
        ));
        assert!(matches!(
            Raster::new(10, -1, &black, &white),
            Err(Error::InvalidDimension { name: "border", .. })
        ));
    }

    #[test]
    fn test_rejects_oversized_raster() {
        let code = QrCode::new(b"hello").unwrap();
        let err = black_on_white(1_000_000, 4).render(&code).err();
        assert!(matches!(
            err,
            Some(Error::InvalidDimension { name: "box size", value: 1_000_000, .. })
        ));

        // 21 modules + 8 border at 100 px is well under the limit.
        assert!(black_on_white(100, 4).side_pixels(21).is_ok());
    }

    #[test]
    fn test_rejects_unknown_color() {
        let err = Raster::new(10, 4, &ColorSpec::new("blurple"), &ColorSpec::new("white"));
        assert!(matches!(err, Err(Error::Color { .. })));
    }
}
