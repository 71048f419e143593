//! Interactive collection of the payload and optional rendering parameters

use crate::error::{Error, Result};
use crate::request::{ColorSpec, EcLevel, RenderDefaults, RenderRequest};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Prompt for the text to encode
pub const PAYLOAD_PROMPT: &str = "Enter the data to encode in the QR code: ";
/// Prompt asking whether to customize
pub const CUSTOMIZE_PROMPT: &str = "Do you want to customize the QR code (yes/no)? ";
/// Prompts for the seven customization fields, in the order they are asked
pub const FIELD_PROMPTS: [&str; 7] = [
    "Enter the QR code version (1 to 40, 1 is the smallest): ",
    "Enter the error correction level (L, M, Q, H): ",
    "Enter the box size (default is 10): ",
    "Enter the border size (default is 4): ",
    "Enter the QR code color (default is black): ",
    "Enter the background color (default is white): ",
    "Enter the filename to save as (e.g., 'my_qr_code.png'): ",
];

/// How the final request was arrived at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Customization {
    /// The user declined to customize
    Declined,
    /// Every custom field was accepted
    Applied,
    /// A field failed to coerce and all custom values were dropped
    Discarded {
        /// Message shown to the user
        reason: String,
    },
}

/// A request together with how it was built
#[derive(Debug, Clone)]
pub struct Collected {
    /// Fully resolved request
    pub request: RenderRequest,
    /// Customization outcome
    pub customization: Customization,
}

/// Customization answers before any coercion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCustomization {
    /// Version text
    pub version: String,
    /// Error-correction letter
    pub ec_level: String,
    /// Box size text
    pub box_size: String,
    /// Border text
    pub border: String,
    /// Fill color text
    pub fill_color: String,
    /// Background color text
    pub back_color: String,
    /// Output filename text
    pub filename: String,
}

impl RawCustomization {
    /// Coerce every field, failing on the first integer that does not parse.
    pub fn resolve(self, payload: String) -> Result<RenderRequest> {
        let version = parse_int("version", &self.version)?;
        let ec_level = EcLevel::from_letter(&self.ec_level);
        let box_size = parse_int("box size", &self.box_size)?;
        let border = parse_int("border", &self.border)?;

        Ok(RenderRequest {
            payload,
            version,
            ec_level,
            box_size,
            border,
            fill_color: ColorSpec::new(self.fill_color),
            back_color: ColorSpec::new(self.back_color),
            filename: PathBuf::from(self.filename),
        })
    }
}

/// Integer coercion with the usual terminal leniency: any Unicode whitespace
/// around the number, an optional sign, and single `_` separators between
/// digits (`1_000`).
fn parse_int(field: &'static str, value: &str) -> Result<i64> {
    let trimmed = value.trim();
    let digits = strip_separators(trimmed).unwrap_or_else(|| trimmed.to_string());

    digits.parse::<i64>().map_err(|source| Error::InvalidField {
        field,
        value: value.to_string(),
        source,
    })
}

/// Remove `_` separators, or `None` if any underscore is not flanked by digits.
fn strip_separators(text: &str) -> Option<String> {
    if !text.contains('_') {
        return Some(text.to_string());
    }

    let chars: Vec<char> = text.chars().collect();
    let flanked = chars.iter().enumerate().all(|(i, &c)| {
        c != '_'
            || (i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).is_some_and(char::is_ascii_digit))
    });

    flanked.then(|| chars.into_iter().filter(|&c| c != '_').collect())
}

/// Case-insensitive, untrimmed comparison against "yes"
pub fn wants_customization(answer: &str) -> bool {
    answer.to_lowercase() == "yes"
}

/// Console front end asking the fixed sequence of questions
pub struct InputCollector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InputCollector<R, W> {
    /// Wrap an input/output pair
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Run the prompt sequence and build a request.
    ///
    /// Integer coercion failures are reported on `output` and answered with
    /// `defaults`; every other error is returned.
    pub fn collect(&mut self, defaults: &RenderDefaults) -> Result<Collected> {
        let payload = self.ask(PAYLOAD_PROMPT)?;
        let answer = self.ask(CUSTOMIZE_PROMPT)?;

        if !wants_customization(&answer) {
            tracing::debug!(answer = %answer, "Customization declined");
            return Ok(Collected {
                request: RenderRequest::with_defaults(payload, defaults),
                customization: Customization::Declined,
            });
        }

        let raw = self.ask_fields()?;
        match raw.resolve(payload.clone()) {
            Ok(request) => Ok(Collected {
                request,
                customization: Customization::Applied,
            }),
            Err(err) if err.is_recoverable() => {
                let reason = err.to_string();
                tracing::warn!(error = %reason, "Discarding customization");
                writeln!(self.output, "Invalid input, using default values. Error: {reason}")?;
                Ok(Collected {
                    request: RenderRequest::with_defaults(payload, defaults),
                    customization: Customization::Discarded { reason },
                })
            }
            Err(err) => Err(err),
        }
    }

    fn ask_fields(&mut self) -> Result<RawCustomization> {
        let [version, ec_level, box_size, border, fill_color, back_color, filename] =
            FIELD_PROMPTS;

        Ok(RawCustomization {
            version: self.ask(version)?,
            ec_level: self.ask(ec_level)?,
            box_size: self.ask(box_size)?,
            border: self.ask(border)?,
            fill_color: self.ask(fill_color)?,
            back_color: self.ask(back_color)?,
            filename: self.ask(filename)?,
        })
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("end of input at prompt '{}'", prompt.trim_end()),
            )));
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }
}
