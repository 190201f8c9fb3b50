//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{CsvSink, CsvSource};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_adapter::JsonSink;
use crate::domain::config_validation::{
    build_atr_period, build_brick_sizing, build_column_map, build_range_bar_config, build_tie_break,
};
use crate::domain::error::WrbarsError;
use crate::domain::range_bar::{RangeBarConfig, TieBreak};
use crate::domain::renko::BrickSizing;
use crate::domain::series::PriceSeries;
use crate::domain::time_key::TimeKey;
use crate::domain::transform::{BarTransform, RangeBarTransform, RenkoTransform};
use crate::domain::volatility::adaptive_brick_size;
use crate::ports::config_port::ConfigPort;
use crate::ports::series_sink::SeriesSink;
use crate::ports::series_source::SeriesSource;

#[derive(Parser, Debug)]
#[command(name = "wrbars", about = "Price-driven bar reconstruction (Renko, range bars)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build Renko bricks from the close column
    Renko {
        #[command(flatten)]
        io: IoArgs,
        #[arg(long)]
        brick_size: Option<f64>,
        /// Size bricks from the mean rolling ATR
        #[arg(long)]
        adaptive: bool,
        #[arg(long)]
        period: Option<usize>,
    },
    /// Build range bars from the high and low columns
    RangeBars {
        #[command(flatten)]
        io: IoArgs,
        #[arg(long)]
        range_size: Option<f64>,
        #[arg(long)]
        tie_break: Option<TieBreak>,
    },
    /// Print the adaptive brick size for a series
    Atr {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        period: Option<usize>,
    },
    /// Show row count and time range of a series
    Info {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct IoArgs {
    #[arg(short, long)]
    pub input: PathBuf,
    /// Defaults to stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,
    /// Indent JSON output; ignored for CSV
    #[arg(long)]
    pub pretty: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Renko {
            io,
            brick_size,
            adaptive,
            period,
        } => {
            let config = match load_config(io.config.as_ref()) {
                Ok(c) => c,
                Err(code) => return code,
            };
            match resolve_brick_sizing(brick_size, adaptive, period, &config) {
                Ok(sizing) => run_transform(&io, &config, &RenkoTransform { sizing }),
                Err(e) => report(&e),
            }
        }
        Command::RangeBars {
            io,
            range_size,
            tie_break,
        } => {
            let config = match load_config(io.config.as_ref()) {
                Ok(c) => c,
                Err(code) => return code,
            };
            match resolve_range_bar_config(range_size, tie_break, &config) {
                Ok(rb) => run_transform(&io, &config, &RangeBarTransform { config: rb }),
                Err(e) => report(&e),
            }
        }
        Command::Atr {
            input,
            config,
            period,
        } => run_atr(&input, config.as_ref(), period),
        Command::Info { input, config } => run_info(&input, config.as_ref()),
    }
}

fn report(err: &WrbarsError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

/// Loads the INI file if one was given, otherwise an empty configuration.
pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    match path {
        None => Ok(FileConfigAdapter::empty()),
        Some(p) => {
            eprintln!("Loading config from {}", p.display());
            FileConfigAdapter::from_file(p).map_err(|e| report(&e))
        }
    }
}

/// Flags win over the `[renko]` section. `--adaptive` ignores any brick size.
pub fn resolve_brick_sizing(
    brick_size: Option<f64>,
    adaptive: bool,
    period: Option<usize>,
    config: &dyn ConfigPort,
) -> Result<BrickSizing, WrbarsError> {
    let sizing = if adaptive {
        let period = match period {
            Some(p) => p,
            None => build_atr_period(config)?,
        };
        BrickSizing::Adaptive { period }
    } else if let Some(size) = brick_size {
        BrickSizing::Fixed(size)
    } else {
        match build_brick_sizing(config)? {
            BrickSizing::Adaptive { period: from_config } => BrickSizing::Adaptive {
                period: period.unwrap_or(from_config),
            },
            fixed => fixed,
        }
    };
    sizing.validate()?;
    Ok(sizing)
}

/// Flags win over the `[range_bar]` section.
pub fn resolve_range_bar_config(
    range_size: Option<f64>,
    tie_break: Option<TieBreak>,
    config: &dyn ConfigPort,
) -> Result<RangeBarConfig, WrbarsError> {
    let mut rb = match range_size {
        Some(size) => RangeBarConfig::new(size).with_tie_break(build_tie_break(config)?),
        None => build_range_bar_config(config)?,
    };
    if let Some(tb) = tie_break {
        rb.tie_break = tb;
    }
    rb.validate()?;
    Ok(rb)
}

/// Loads `input` with the configured column names and applies `transform`.
pub fn reconstruct(
    input: &Path,
    config: &dyn ConfigPort,
    transform: &dyn BarTransform<TimeKey>,
) -> Result<(PriceSeries<TimeKey>, PriceSeries<TimeKey>), WrbarsError> {
    let columns = build_column_map(config);
    let series = CsvSource::new(input.to_path_buf()).load(&columns)?;
    let bars = transform.apply(&series)?;
    Ok((series, bars))
}

pub fn write_output(
    series: &PriceSeries<TimeKey>,
    format: OutputFormat,
    pretty: bool,
    output: Option<&Path>,
) -> Result<(), WrbarsError> {
    let sink: Box<dyn SeriesSink> = match format {
        OutputFormat::Csv => Box::new(CsvSink),
        OutputFormat::Json => Box::new(JsonSink { pretty }),
    };
    match output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            sink.write_to(series, &mut out)?;
            out.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            sink.write_to(series, &mut out)?;
        }
    }
    Ok(())
}

fn run_transform(io: &IoArgs, config: &dyn ConfigPort, transform: &dyn BarTransform<TimeKey>) -> ExitCode {
    eprintln!("Loading series from {}", io.input.display());
    let (series, bars) = match reconstruct(&io.input, config, transform) {
        Ok(r) => r,
        Err(e) => return report(&e),
    };

    eprintln!(
        "{}: {} input rows -> {} bars",
        transform.name(),
        series.len(),
        bars.len()
    );

    if let Err(e) = write_output(&bars, io.format, io.pretty, io.output.as_deref()) {
        return report(&e);
    }
    if let Some(path) = &io.output {
        eprintln!("Wrote {}", path.display());
    }
    ExitCode::SUCCESS
}

fn load_series(input: &Path, config_path: Option<&PathBuf>) -> Result<(FileConfigAdapter, PriceSeries<TimeKey>), ExitCode> {
    let config = load_config(config_path)?;
    let columns = build_column_map(&config);
    let series = CsvSource::new(input.to_path_buf())
        .load(&columns)
        .map_err(|e| report(&e))?;
    Ok((config, series))
}

fn run_atr(input: &Path, config_path: Option<&PathBuf>, period: Option<usize>) -> ExitCode {
    let (config, series) = match load_series(input, config_path) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let period = match period {
        Some(p) => p,
        None => match build_atr_period(&config) {
            Ok(p) => p,
            Err(e) => return report(&e),
        },
    };

    match adaptive_brick_size(series.high(), series.low(), series.close(), period) {
        Ok(size) => {
            println!("{}", size);
            ExitCode::SUCCESS
        }
        Err(e) => report(&e),
    }
}

fn run_info(input: &Path, config_path: Option<&PathBuf>) -> ExitCode {
    let (_, series) = match load_series(input, config_path) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let time = series.time();
    // extract() rejects empty input, so both ends exist
    if let (Some(first), Some(last)) = (time.first(), time.last()) {
        println!("{} rows, {} to {}", series.len(), first, last);
    }
    if !time.windows(2).all(|w| w[0] <= w[1]) {
        eprintln!("warning: time column is not in ascending order");
    }
    ExitCode::SUCCESS
}
