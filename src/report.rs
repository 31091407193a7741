use serde::Serialize;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::validate::ValidationError;

/// One reported validation failure: the error category plus the
/// offending record text, rejoined with commas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub error: ValidationError,
    pub record: String,
}

impl Diagnostic {
    pub fn new(error: ValidationError, record: String) -> Self {
        Self { error, record }
    }
}

/// Output format for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `<ErrorMessage>: <record>`, one line per failing record.
    Text,
    /// One JSON object per failing record.
    Json,
}

/// Writes diagnostics to the output stream in input order.
///
/// Valid records produce no output; the reporter only ever sees
/// failures. Tracks whether anything was emitted so the caller can
/// decide the exit status under `--strict`.
pub struct Reporter<W> {
    out: W,
    format: Format,
    emitted: usize,
}

impl<W: WriteColor> Reporter<W> {
    pub fn new(out: W, format: Format) -> Self {
        Self {
            out,
            format,
            emitted: 0,
        }
    }

    /// Emit one diagnostic.
    pub fn report(&mut self, diagnostic: &Diagnostic) -> std::io::Result<()> {
        self.emitted += 1;
        match self.format {
            Format::Text => {
                self.out
                    .set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
                write!(self.out, "{}", diagnostic.error)?;
                self.out.reset()?;
                writeln!(self.out, ": {}", diagnostic.record)
            }
            Format::Json => {
                serde_json::to_writer(&mut self.out, diagnostic)?;
                writeln!(self.out)
            }
        }
    }

    /// Number of diagnostics emitted so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Flush the underlying stream and return it.
    pub fn finish(mut self) -> std::io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
