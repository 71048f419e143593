//! qrmint - interactive QR code image generator
//!
//! Asks for a payload on the terminal, optionally collects rendering
//! parameters, and writes the resulting QR symbol as an image file.
//!
//! # Features
//!
//! - **Prompt dialogue**: fixed question sequence with all-or-nothing
//!   fallback to defaults when a numeric answer is malformed
//! - **Auto-fit**: the requested version is a floor, grown until the payload fits
//! - **Styling**: module size, quiet zone and any CSS color for both palettes
//! - **Read-back**: optional decode of the written file with `rqrr`
//!
//! # Example
//!
//! ```no_run
//! use qrmint::{RenderDefaults, Session};
//! use std::io;
//!
//! fn main() -> anyhow::Result<()> {
//!     let stdin = io::stdin().lock();
//!     let stdout = io::stdout().lock();
//!
//!     let mut session = Session::new(stdin, stdout, RenderDefaults::default());
//!     let generation = session.run()?;
//!
//!     println!("version {}", generation.emitted.version);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod config;
pub mod emitter;
pub mod error;
pub mod logging;
pub mod output;
pub mod prompt;
pub mod qr;
pub mod request;

// Re-exports for convenience
pub use error::{Error, Result};

pub use config::{LogRotation, LoggingOptions, QrmintConfig};
pub use emitter::Emitted;
pub use prompt::{Collected, Customization, InputCollector};
pub use qr::{QrDecoder, QrEncoder, Raster};
pub use request::{ColorSpec, EcLevel, RenderDefaults, RenderRequest};

use std::io::{BufRead, Write};

/// One prompt-then-generate cycle over a console
pub struct Session<R, W> {
    input: R,
    output: W,
    defaults: RenderDefaults,
    verify: bool,
}

/// Outcome of [`Session::run`]
#[derive(Debug, Clone)]
pub struct Generation {
    /// Request that was rendered
    pub request: RenderRequest,
    /// How customization went
    pub customization: Customization,
    /// File and symbol details
    pub emitted: Emitted,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Create a session reading answers from `input` and writing prompts to `output`
    pub fn new(input: R, output: W, defaults: RenderDefaults) -> Self {
        Self {
            input,
            output,
            defaults,
            verify: false,
        }
    }

    /// Decode the written image and fail unless it reproduces the payload
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Collect input, write the image, and return what happened.
    pub fn run(&mut self) -> Result<Generation> {
        let Collected {
            request,
            customization,
        } = InputCollector::new(&mut self.input, &mut self.output).collect(&self.defaults)?;

        tracing::debug!(?request, ?customization, "Resolved rendering request");
        let emitted = emitter::emit(&request, &mut self.output)?;

        if self.verify {
            let decoded = QrDecoder::new().verify(&emitted.path, &request.payload)?;
            tracing::info!(version = decoded.version, "Read-back verification passed");
        }

        Ok(Generation {
            request,
            customization,
            emitted,
        })
    }

    /// Output sink, for callers that print after the run
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }
}
