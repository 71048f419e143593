//! QR symbol encoder with version auto-fit

use crate::error::{Error, Result};
use crate::request::EcLevel;
use qrcode::types::QrError;
use qrcode::{QrCode, Version};

/// Largest normal QR version
pub const MAX_VERSION: i16 = 40;

/// QR symbol encoder
#[derive(Debug, Clone, Copy)]
pub struct QrEncoder {
    /// First version tried
    version: i16,
    /// Error correction level
    ecc_level: EcLevel,
}

impl QrEncoder {
    /// Create an encoder starting at `version`, which must lie in 1..=40
    pub fn new(version: i64, ecc_level: EcLevel) -> Result<Self> {
        if !(1..=i64::from(MAX_VERSION)).contains(&version) {
            return Err(Error::InvalidVersion(version));
        }

        Ok(Self {
            version: version as i16,
            ecc_level,
        })
    }

    /// Requested starting version
    pub fn version(&self) -> i16 {
        self.version
    }

    /// Configured error correction level
    pub fn ecc_level(&self) -> EcLevel {
        self.ecc_level
    }

    /// Encode `data`, growing the version until it fits.
    ///
    /// Returns the symbol built at the smallest version not below the
    /// requested one, or [`Error::DataTooLong`] once version 40 overflows.
    pub fn encode(&self, data: &[u8]) -> Result<QrCode> {
        for version in self.version..=MAX_VERSION {
            match QrCode::with_version(data, Version::Normal(version), self.ecc_level.into()) {
                Ok(code) => {
                    if version != self.version {
                        tracing::debug!(
                            requested = self.version,
                            fitted = version,
                            "Escalated QR version to fit payload"
                        );
                    }
                    return Ok(code);
                }
                Err(QrError::DataTooLong) => continue,
                Err(e) => {
                    return Err(Error::QrEncode(format!(
                        "version {version}, level {}: {e}",
                        self.ecc_level
                    )));
                }
            }
        }

        Err(Error::DataTooLong {
            len: data.len(),
            level: self.ecc_level.as_char(),
        })
    }
}

/// Numeric version of a built symbol
pub fn version_number(code: &QrCode) -> i16 {
    match code.version() {
        Version::Normal(n) | Version::Micro(n) => n,
    }
}
