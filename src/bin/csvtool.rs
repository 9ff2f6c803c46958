//! CLI tool to extract columns from a CSV stream.
//!
//! Usage:
//!   csvtool 3 0 < people.csv
//!   csvtool --named dept id --new Department Key --input people.csv -o out.csv
//!   csvtool 1 --filter 0,10-20 --input people.csv
//!
//! Reads stdin and writes stdout unless told otherwise.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use csvtool_rs::{ColumnSpec, ExtractError, ExtractOptions, ExtractSummary, IntervalSet, extract};
use log::{LevelFilter, error, info};

/// Extract, reorder and rename CSV columns.
#[derive(Parser)]
#[command(name = "csvtool", version)]
struct Cli {
    /// The columns to extract (indices, or header names with --named)
    #[arg(required = true)]
    columns: Vec<String>,

    /// Input file (default stdin, also `-`)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Destination to write (default stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Columns are header names instead of indices
    #[arg(long)]
    named: bool,

    /// The new column names, one per column
    #[arg(long, num_args = 1..)]
    new: Option<Vec<String>>,

    /// Lines to keep, as "-a,b,c-d,e-" (line 0 is the header line)
    #[arg(long, default_value = "-", allow_hyphen_values = true)]
    filter: String,

    /// Drop the lines matched by --filter instead of keeping them
    #[arg(long)]
    invert_filter: bool,

    /// Do not print the header row
    #[arg(long)]
    no_print_header: bool,

    /// Logging level
    #[arg(short = 'L', long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Apply the logging level to every log target, not only this tool
    #[arg(long)]
    log_root: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    #[value(alias = "critical")]
    Error,
    #[value(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn init_logging(level: LevelFilter, root: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if root {
        builder.filter_level(level);
    } else {
        builder
            .filter_module("csvtool_rs", level)
            .filter_module(module_path!(), level);
    }
    builder.init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level.into(), cli.log_root);

    let columns = match ColumnSpec::parse_all(&cli.columns, cli.named) {
        Ok(columns) => columns,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    let rows = match cli.filter.parse::<IntervalSet>() {
        Ok(rows) => rows,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    let options = ExtractOptions {
        columns,
        new_names: cli.new,
        rows,
        invert: cli.invert_filter,
        print_header: !cli.no_print_header,
    };
    if let Err(e) = options.validate() {
        error!("{e}");
        process::exit(1);
    }

    match run(cli.input.as_deref(), cli.output.as_deref(), &options) {
        Ok(summary) => {
            info!(
                "Processed {} -> {} records",
                summary.rows_read, summary.rows_written
            );
        }
        Err(e) if e.is_broken_pipe() => process::exit(0),
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}

fn run(
    input: Option<&Path>,
    output: Option<&Path>,
    options: &ExtractOptions,
) -> Result<ExtractSummary, ExtractError> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) if path != Path::new("-") => Box::new(BufReader::new(File::open(path)?)),
        _ => Box::new(io::stdin().lock()),
    };

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            Box::new(BufWriter::new(File::create(path)?))
        }
        None => Box::new(io::stdout().lock()),
    };

    extract(reader, writer, options)
}
