//! This program runs grid convergence studies. It consumes a "script", which
//! is just a TOML file listing one or more studies, each naming three meshes
//! and the histories of the runs on them (or giving spacings and solutions
//! outright), and reports the discretization error of each.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![allow(clippy::needless_return)]

pub(crate) mod study;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, info, error};
use toml::de::Error as TomlError;

use crate::study::{Script, StudyResult};

/// The arguments passed to the study runner.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
  /// Print the results as JSON.
  #[arg(short, long)]
  json: bool,
  /// Output extra/debug info while reading files.
  #[arg(short, long)]
  verbose: bool,
  /// Path to the study script.
  script: PathBuf
}

/// Runs a script in a given path and outputs results. Returns the number of
/// studies that failed.
fn run_script(path: &Path, json: bool) -> Result<usize, Box<dyn Error>> {
  let contents = std::fs::read_to_string(path)?;
  let try_script: Result<Script, TomlError> = toml::from_str(&contents);
  let script = try_script?;
  let base = path.parent().unwrap_or(Path::new("."));
  let mut results: Vec<StudyResult> = Vec::new();
  let mut failed = 0;
  for study in script.studies.iter() {
    info!("Running study {}...", study.name);
    match study.run(base) {
      Ok(res) => {
        if !json {
          println!("==> {}", res.name);
          for line in res.report.to_string().lines() {
            println!("  {}", line);
          }
        }
        results.push(res);
      },
      Err(e) => {
        error!("Study {} failed: {}", study.name, e);
        failed += 1;
      }
    }
  }
  if json {
    println!("{}", serde_json::to_string_pretty(&results)?);
  } else if script.studies.is_empty() {
    println!("no studies in script");
  }
  return Ok(failed);
}

fn main() -> ExitCode {
  let args = Cli::parse();
  let log_level = if args.verbose {
    LevelFilter::Debug
  } else {
    LevelFilter::Info
  };
  env_logger::builder().filter_level(log_level).init();
  return match run_script(&args.script, args.json) {
    Ok(0) => ExitCode::SUCCESS,
    Ok(_) => ExitCode::FAILURE,
    Err(e) => {
      error!("{}", e);
      ExitCode::FAILURE
    }
  };
}
