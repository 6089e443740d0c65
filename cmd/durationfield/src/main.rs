//! durationfield - Parse, format and encode durations from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use durationfield::{Duration, DurationField, Precision, RawValue};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Parse, format and encode durations.
///
/// Durations are written as `<amount><unit>` components, e.g. `1w2d3h` or
/// `1h 30min`, with units w, d, h, min, s, ms and us. Stored values are
/// integers counted in the chosen precision (microseconds, seconds or days).
#[derive(Parser)]
#[command(name = "durationfield")]
#[command(about = "Duration text and integer storage tool")]
#[command(version)]
pub struct Cli {
    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a duration string and print its canonical form
    Parse {
        /// Duration string, e.g. "1h30min"
        #[arg(allow_hyphen_values = true)]
        text: String,
    },
    /// Render a count of microseconds as a duration string
    Format {
        /// Total microseconds
        #[arg(allow_negative_numbers = true)]
        micros: i64,
    },
    /// Parse a duration string and print the integer stored for it
    Encode {
        /// Duration string, e.g. "1d"
        #[arg(allow_hyphen_values = true)]
        text: String,
        /// Storage precision: microseconds, seconds or days
        #[arg(short, long, default_value_t = Precision::Microseconds)]
        precision: Precision,
    },
    /// Decode a stored integer or a duration string
    Decode {
        /// Integer in precision units, or a duration string
        #[arg(allow_hyphen_values = true)]
        raw: String,
        /// Storage precision: microseconds, seconds or days
        #[arg(short, long, default_value_t = Precision::Microseconds)]
        precision: Precision,
    },
}

/// JSON output for a single duration.
#[derive(Serialize)]
struct Report {
    duration: Duration,
    days: u64,
    seconds: u32,
    microseconds: u32,
    total_microseconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    precision: Option<Precision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    encoded: Option<i64>,
}

impl Report {
    fn new(d: Duration) -> Self {
        Self {
            duration: d,
            days: d.days(),
            seconds: d.seconds(),
            microseconds: d.microseconds(),
            total_microseconds: d.as_micros(),
            precision: None,
            encoded: None,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match &cli.command {
        Commands::Parse { text } => {
            let d = durationfield::parse(text)?;
            print_duration(&cli, Report::new(d))
        }
        Commands::Format { micros } => {
            let d = durationfield::decode(*micros, Precision::Microseconds)?
                .context("no duration decoded")?;
            print_duration(&cli, Report::new(d))
        }
        Commands::Encode { text, precision } => {
            let field = DurationField::new(*precision);
            let d = durationfield::parse(text)?;
            let encoded = field.prepare(d)?.context("no value encoded")?;
            tracing::debug!(%d, %precision, encoded, "encoded duration");

            if cli.json {
                let report = Report {
                    precision: Some(*precision),
                    encoded: Some(encoded),
                    ..Report::new(d)
                };
                print_json(&report)
            } else {
                println!("{}", encoded);
                Ok(())
            }
        }
        Commands::Decode { raw, precision } => {
            let field = DurationField::new(*precision);
            let value = raw_value(raw);
            tracing::debug!(kind = value.kind(), %precision, "decoding input");

            let d = field.to_duration(value)?.context("no duration decoded")?;
            let report = Report {
                precision: Some(*precision),
                ..Report::new(d)
            };
            print_duration(&cli, report)
        }
    }
}

/// Classifies a command line argument the way a column or form would hand it
/// over: integers, then other numbers, then text.
fn raw_value(raw: &str) -> RawValue {
    let trimmed = raw.trim();
    if let Ok(units) = trimmed.parse::<i64>() {
        return RawValue::Integer(units);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => RawValue::Float(v),
        _ => RawValue::Text(raw.to_string()),
    }
}

fn print_duration(cli: &Cli, report: Report) -> Result<()> {
    if cli.json {
        print_json(&report)
    } else {
        println!("{}", report.duration);
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
