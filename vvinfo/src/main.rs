//! Dumps information on solver files: zones and variables of tabular files,
//! mesh headers, configuration directives and force logs.

#![allow(clippy::needless_return)]

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use log::{LevelFilter, info, warn, error};
use serde::Serialize;
use vandv::prelude::*;

/// Kinds of file this tool knows about.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum FileKind {
  /// A Tecplot or CSV tabular file.
  Tabular,
  /// A mesh file.
  Mesh,
  /// A configuration file.
  Config,
  /// A force breakdown.
  Forces,
  /// A performance summary.
  Performance
}

impl FileKind {
  /// Guesses the kind of a file from its extension.
  fn guess(path: &Path) -> Option<Self> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    return match ext.as_str() {
      "dat" | "tec" | "csv" => Some(Self::Tabular),
      "su2" => Some(Self::Mesh),
      "cfg" => Some(Self::Config),
      _ => None
    };
  }
}

#[derive(Parser)]
#[command(author, version)]
struct Cli {
  /// Kind of file. If absent, it's guessed from the extension.
  #[arg(short, long)]
  kind: Option<FileKind>,
  /// Print a JSON summary instead of a log.
  #[arg(short, long)]
  json: bool,
  /// Only read a single mesh header keyword.
  #[arg(short = 'K', long)]
  keyword: Option<MeshKeyword>,
  /// Output extra/debug info while parsing.
  #[arg(short, long)]
  verbose: bool,
  /// File paths.
  #[arg(required = true)]
  files: Vec<PathBuf>
}

const INDENT: &str = "  ";

/// Shape of a single zone.
#[derive(Serialize)]
struct ZoneSummary {
  name: String,
  variables: Vec<String>,
  rows: usize
}

/// What was found in a file.
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Summary {
  Tabular { zones: Vec<ZoneSummary> },
  Mesh(MeshMetadata),
  Config {
    constraints: ConstraintSpec,
    geo_probes: Option<GeoProbeSpec>
  },
  Forces(BTreeMap<String, f64>),
  Performance(BTreeMap<String, f64>)
}

/// Reads a file into a summary.
fn summarize(path: &Path, kind: FileKind, args: &Cli) -> ParseResult<Summary> {
  return Ok(match kind {
    FileKind::Tabular => {
      let ds = parse_file(path)?;
      Summary::Tabular {
        zones: ds.zones.into_iter()
          .map(|z| ZoneSummary { rows: z.nrows(), name: z.name, variables: z.variables })
          .collect()
      }
    },
    FileKind::Mesh => {
      let file = File::open(path).map_err(|e| ParseError::from(e).in_file(path))?;
      let reader = BufReader::new(file);
      Summary::Mesh(
        scan_mesh(reader, args.keyword, &Dialect::default())
          .map_err(|e| e.in_file(path))?
      )
    },
    FileKind::Config => {
      let constraints = constraints_from_file(path)?;
      let geo_probes = match geo_probes_from_file(path) {
        Ok(g) => Some(g),
        Err(e) => {
          warn!("No geometric probes: {}", e);
          None
        }
      };
      Summary::Config { constraints, geo_probes }
    },
    FileKind::Forces => Summary::Forces(force_breakdown_from_file(path)?),
    FileKind::Performance => Summary::Performance(performance_from_file(path)?)
  });
}

/// Logs a summary.
fn log_summary(summary: &Summary) {
  match summary {
    Summary::Tabular { zones } => {
      info!("{} zone(s) found:", zones.len());
      for z in zones {
        info!("{}- {}: {} rows", INDENT, z.name, z.rows);
        info!("{}{}variables: {}", INDENT, INDENT, z.variables.join(", "));
      }
    },
    Summary::Mesh(meta) => {
      for kw in MeshKeyword::all() {
        match meta.get(*kw) {
          Some(v) => info!("{}= {}", kw, v),
          None => info!("{} not found.", kw)
        }
      }
      for (tag, n) in meta.markers.iter() {
        info!("{}- marker {}: {} elements", INDENT, tag, n);
      }
    },
    Summary::Config { constraints, geo_probes } => {
      if constraints.is_empty() {
        info!("No constraints.");
      }
      for (name, c) in constraints.iter() {
        info!("{}- {} {} {} (scale {})", INDENT, name, c.sign, c.value, c.scale);
      }
      for (name, stations) in geo_probes.iter().flatten() {
        info!("{}- probe {} at {:?}", INDENT, name, stations);
      }
    },
    Summary::Forces(values) | Summary::Performance(values) => {
      for (name, v) in values.iter() {
        info!("{}- {}: {}", INDENT, name, v);
      }
    }
  }
}

fn main() {
  // init cli stuff
  let args = Cli::parse();
  let log_level = if args.verbose {
    LevelFilter::Debug
  } else {
    LevelFilter::Info
  };
  env_logger::builder().filter_level(log_level).init();
  let mut failed = false;
  let mut summaries: BTreeMap<String, Summary> = BTreeMap::new();
  for path in args.files.iter() {
    if !path.is_file() {
      error!("{} either does not exist or is not a file!", path.display());
      failed = true;
      continue;
    }
    let Some(kind) = args.kind.or_else(|| FileKind::guess(path)) else {
      error!("Can't tell what {} is, pass --kind.", path.display());
      failed = true;
      continue;
    };
    info!("Reading {}...", path.display());
    match summarize(path, kind, &args) {
      Ok(s) => {
        if !args.json {
          log_summary(&s);
        }
        summaries.insert(path.display().to_string(), s);
      },
      Err(e) => {
        error!("{}", e);
        failed = true;
      }
    }
  }
  if args.json {
    match serde_json::to_string_pretty(&summaries) {
      Ok(s) => println!("{}", s),
      Err(e) => {
        error!("{}", e);
        failed = true;
      }
    }
  }
  if failed {
    std::process::exit(1);
  }
}
