//! QR symbol construction, rasterisation and read-back
//!
//! Encoding is delegated to the `qrcode` crate and decoding to `rqrr`; this
//! module only adds the version auto-fit policy and the box/border/color
//! raster layout.

mod decoder;
mod encoder;
mod render;

pub use decoder::{DecodedSymbol, QrDecoder};
pub use encoder::{MAX_VERSION, QrEncoder, version_number};
pub use render::Raster;
