use anyhow::{Context, Error, Result};
use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use termcolor::{BufferedStandardStream, ColorChoice};

use geofeedcheck::input::FileOrStdin;
use geofeedcheck::record::{self, GeofeedRecord};
use geofeedcheck::reference::{ReferenceTable, DEFAULT_REFERENCE_FILE};
use geofeedcheck::report::{Diagnostic, Format, Reporter};
use geofeedcheck::validate::{validate, ValidationError};

/// Check if the error chain contains a broken pipe error.
#[inline(always)]
fn is_broken_pipe(err: &Error) -> bool {
    // Look for a broken pipe error in the error chain
    for cause in err.chain() {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::BrokenPipe {
                return true;
            }
        }
    }
    false
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the ISO 3166-2 reference CSV used to validate country
    /// and region codes
    #[clap(
        short = 'r',
        long,
        value_name = "FILE",
        value_hint = clap::ValueHint::FilePath,
        env = "GEOFEED_ISO3166_2",
        default_value = DEFAULT_REFERENCE_FILE
    )]
    reference: Utf8PathBuf,

    /// Use markers to highlight the error category
    #[clap(short = 'C', long, value_enum, default_value_t = ArgsColorChoice::Auto)]
    color: ArgsColorChoice,

    /// Output diagnostics as JSON, one object per failing record
    #[clap(long)]
    json: bool,

    /// Exit with a failure status if any record fails validation
    #[clap(long)]
    strict: bool,

    /// Input geofeed file(s) to validate. Leave empty or use "-" to
    /// read from stdin
    #[clap(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    input: Vec<Utf8PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
enum ArgsColorChoice {
    Always,
    Never,
    Auto,
}

fn main() -> ExitCode {
    // Use a separate run function to handle the actual work
    let err = match run_main() {
        Ok(code) => return code,
        Err(err) => err,
    };

    // Handle broken pipe errors gracefully
    if is_broken_pipe(&err) {
        return ExitCode::SUCCESS;
    }

    // Print detailed error information based on environment variables
    if std::env::var("RUST_BACKTRACE").is_ok_and(|v| v == "1")
        && std::env::var("RUST_LIB_BACKTRACE").map_or(true, |v| v == "1")
    {
        writeln!(&mut std::io::stderr(), "{:?}", err).unwrap();
    } else {
        writeln!(&mut std::io::stderr(), "{:#}", err).unwrap();
    }

    ExitCode::FAILURE
}

fn run_main() -> Result<ExitCode> {
    let mut args = Args::parse();

    // if no files specified, add stdin
    if args.input.is_empty() {
        args.input.push(Utf8PathBuf::from("-"));
    }

    // determine appropriate colormode. auto simply
    // tests if stdout is a tty (if so, then yes color)
    // or otherwise don't color if it's to a file or another pipe
    let colormode = match args.color {
        ArgsColorChoice::Auto => {
            if std::io::stdout().is_terminal() {
                ColorChoice::Always
            } else {
                ColorChoice::Never
            }
        }
        ArgsColorChoice::Always => ColorChoice::Always,
        ArgsColorChoice::Never => ColorChoice::Never,
    };

    // JSON output is machine-read, never colored
    let colormode = if args.json {
        ColorChoice::Never
    } else {
        colormode
    };

    run(args, colormode)
}

fn run(args: Args, colormode: ColorChoice) -> Result<ExitCode> {
    // The reference table is loaded once, before any input is read.
    // A missing or unreadable dataset is fatal: region codes cannot be
    // validated without it.
    let table = ReferenceTable::load(&args.reference)
        .with_context(|| format!("failed to load reference dataset: {}", args.reference))?;

    let format = if args.json { Format::Json } else { Format::Text };
    let out = BufferedStandardStream::stdout(colormode);
    let mut reporter = Reporter::new(out, format);

    for path in &args.input {
        let source = FileOrStdin::from_path(path.clone());
        let reader = source.reader()?;

        // Geofeed framing per RFC 8025: one record per line, fields may
        // be double-quoted, `#` starts a comment, blank lines skipped.
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut row = csv::ByteRecord::new();
        loop {
            let more = csv_reader
                .read_byte_record(&mut row)
                .with_context(|| format!("failed to read geofeed input: {}", source))?;
            if !more {
                break;
            }

            let diagnostic = match GeofeedRecord::from_row(&row) {
                Some(record) => match validate(&record, &table) {
                    Ok(()) => continue,
                    Err(error) => Diagnostic::new(error, record.to_string()),
                },
                None => Diagnostic::new(ValidationError::MalformedRecord, record::join_row(&row)),
            };

            reporter
                .report(&diagnostic)
                .context("failed to write diagnostic")?;
        }
    }

    let failed = reporter.emitted() > 0;
    reporter.finish().context("failed to flush output")?;

    if args.strict && failed {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
