//! A command-line application to convert Tecplot-like tabular output to CSV,
//! or to print just the final record of a history.

#![allow(clippy::needless_return)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::*;
use vandv::prelude::*;

/// The arguments passed to the converter.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about)]
struct Cli {
  /// Zones to write. Can be specified more than once, or comma-separated.
  /// If absent, all zones are written, one after the other.
  #[arg(short = 'z', long = "zones", num_args = 0.., value_delimiter = ',')]
  zones: Vec<String>,
  /// Only write the final record, found by reading the file backwards.
  #[arg(short = 'l', long = "last")]
  last: bool,
  /// The delimiter used in the CSV.
  #[arg(short = 'd', long = "delim", default_value = ",")]
  delim: char,
  /// Comment character of the input.
  #[arg(short = 'c', long = "comment", default_value = "#")]
  comment: char,
  /// Output extra/debug info while parsing and converting.
  #[arg(short = 'v', long = "verbose")]
  verbose: bool,
  /// Path to write output to. If absent, writes to standard output.
  #[arg(short = 'o')]
  output: Option<PathBuf>,
  /// The name of the input file (.dat, .tec or .csv).
  input: PathBuf,
}

/// Writes the requested output, returning any error.
fn run(args: &Cli) -> Result<(), Box<dyn std::error::Error>> {
  let dialect = Dialect { tabular_comment: args.comment, ..Dialect::default() };
  // init the csv writer
  let output: BufWriter<Box<dyn Write>> = BufWriter::new(
    if let Some(ref op) = args.output {
      Box::new(File::create(op)?)
    } else {
      Box::new(io::stdout())
    }
  );
  let delim_byte: u8 = u8::try_from(args.delim)
    .map_err(|_| format!("delimiter {:?} is not a single byte", args.delim))?;
  let mut wtr = csv::WriterBuilder::new()
    .delimiter(delim_byte)
    .flexible(true)
    .from_writer(output);
  if args.last {
    info!("Reading the final record of {}...", args.input.display());
    let rec = final_values_with(&args.input, &dialect)?;
    wtr.write_record(rec.iter().map(|(n, _)| n))?;
    wtr.write_record(rec.iter().map(|(_, v)| v.to_string()))?;
    wtr.flush()?;
    return Ok(());
  }
  info!("Parsing {}...", args.input.display());
  let ds = parse_file_with(&args.input, &dialect)?;
  info!("Done parsing.");
  for name in args.zones.iter() {
    if ds.zone(name).is_none() {
      warn!("No zone named {} in {}.", name, args.input.display());
    }
  }
  info!("Writing CSV records...");
  for zone in ds.zones.iter() {
    if args.zones.is_empty() || args.zones.contains(&zone.name) {
      debug!("Writing zone {} ({} rows).", zone.name, zone.nrows());
      zone.write_csv(&mut wtr)?;
    }
  }
  info!("All done.");
  return Ok(());
}

fn main() -> ExitCode {
  // init cli stuff
  let args = Cli::parse();
  let log_level = if args.verbose {
    LevelFilter::Debug
  } else {
    LevelFilter::Info
  };
  env_logger::builder().filter_level(log_level).init();
  if !args.input.is_file() {
    error!("Provided path either does not exist or is not a file!");
    return ExitCode::FAILURE;
  }
  if let Err(e) = run(&args) {
    error!("{}", e);
    return ExitCode::FAILURE;
  }
  return ExitCode::SUCCESS;
}
