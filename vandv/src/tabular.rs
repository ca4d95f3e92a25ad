//! This module implements the in-memory structure of a tabular result file
//! (zones of equally-long named series) and the format dispatch that picks a
//! sub-parser from the file extension.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use clap::ValueEnum;
use log::debug;
use nalgebra::DMatrix;
use serde::{Serialize, Deserialize};

use crate::delimited::DelimitedParser;
use crate::dialect::Dialect;
use crate::error::*;
use crate::tecplot::OnePassParser;

/// The tabular formats we can read.
#[derive(
  Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, ValueEnum
)]
#[clap(rename_all = "snake_case")]
pub enum TabularFormat {
  /// Tecplot-like multi-zone ASCII, usually `.dat`.
  Tecplot,
  /// Comma-delimited with a single header row.
  Csv
}

impl TabularFormat {
  /// Picks a format from a file extension.
  pub fn from_path<P: AsRef<Path>>(path: P) -> ParseResult<Self> {
    let ext = path.as_ref()
      .extension()
      .and_then(|e| e.to_str())
      .unwrap_or("")
      .to_ascii_lowercase();
    return match ext.as_str() {
      "dat" | "tec" => Ok(Self::Tecplot),
      "csv" => Ok(Self::Csv),
      _ => Err(ParseError::new(ErrorKind::UnsupportedFormat(ext)))
    };
  }
}

impl Display for TabularFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", match self {
      Self::Tecplot => "Tecplot",
      Self::Csv => "CSV"
    });
  }
}

/// A named sub-table. Every variable has exactly one value per row; the data
/// matrix has one column per variable, in declaration order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Zone {
  /// The zone name.
  pub name: String,
  /// The variable names, in the order they were declared.
  pub variables: Vec<String>,
  /// The data, one row per record.
  pub data: DMatrix<f64>
}

impl Zone {
  /// Number of records in the zone.
  pub fn nrows(&self) -> usize {
    return self.data.nrows();
  }

  /// Returns the column index for a variable.
  pub fn index_of(&self, var: &str) -> Option<usize> {
    return self.variables.iter().position(|v| v == var);
  }

  /// Copies out the series for a variable.
  pub fn series(&self, var: &str) -> Option<Vec<f64>> {
    let col = self.index_of(var)?;
    return Some(self.data.column(col).iter().copied().collect());
  }

  /// Iterates over (name, series) pairs in declaration order.
  pub fn iter_series(&self) -> impl Iterator<Item = (&str, Vec<f64>)> + '_ {
    return self.variables.iter()
      .enumerate()
      .map(|(i, v)| (v.as_str(), self.data.column(i).iter().copied().collect()));
  }

  /// Returns the last record as (name, value) pairs, if there's any record.
  pub fn last_record(&self) -> Option<Vec<(String, f64)>> {
    let last = self.nrows().checked_sub(1)?;
    return Some(
      self.variables.iter()
        .cloned()
        .zip(self.data.row(last).iter().copied())
        .collect()
    );
  }

  /// Writes the zone as CSV: a header of variable names then one row per
  /// record.
  pub fn write_csv<W: Write>(&self, wtr: &mut csv::Writer<W>) -> ParseResult<()> {
    wtr.write_record(&self.variables)?;
    for row in self.data.row_iter() {
      wtr.write_record(row.iter().map(|x| x.to_string()))?;
    }
    wtr.flush()?;
    return Ok(());
  }
}

/// Accumulates rows for a zone while a file is being read.
#[derive(Clone, Debug)]
pub struct ZoneBuilder {
  /// The zone name.
  name: String,
  /// The variable names. Empty until declared or synthesized.
  variables: Vec<String>,
  /// Row-major values.
  values: Vec<f64>,
  /// Rows seen so far.
  nrows: usize
}

impl ZoneBuilder {
  /// Starts a zone with the currently-declared variables (possibly none).
  pub fn new<S: Into<String>>(name: S, variables: &[String]) -> Self {
    return Self {
      name: name.into(),
      variables: variables.to_vec(),
      values: Vec::new(),
      nrows: 0
    };
  }

  /// The zone name.
  pub fn name(&self) -> &str {
    return &self.name;
  }

  /// The variable names, empty if none have been declared or synthesized.
  pub fn variables(&self) -> &[String] {
    return &self.variables;
  }

  /// Number of rows pushed so far.
  pub fn nrows(&self) -> usize {
    return self.nrows;
  }

  /// Appends a row. If the zone has no variables yet, names are synthesized
  /// as `var0`, `var1`, ... from this row's width.
  pub fn push_row(&mut self, row: Vec<f64>) -> ParseResult<()> {
    if self.variables.is_empty() {
      self.variables = synth_names(row.len());
      debug!(
        "Zone \"{}\" has no declared variables, using {} synthesized names.",
        self.name,
        row.len()
      );
    }
    if row.len() != self.variables.len() {
      return Err(ParseError::malformed_row(self.variables.len(), row.len()));
    }
    self.values.extend(row);
    self.nrows += 1;
    return Ok(());
  }

  /// Finishes the zone.
  pub fn finish(self) -> Zone {
    let ncols = self.variables.len();
    let data = DMatrix::from_row_slice(self.nrows, ncols, &self.values);
    return Zone { name: self.name, variables: self.variables, data };
  }
}

/// Synthesizes column names for files that never declare any.
pub fn synth_names(n: usize) -> Vec<String> {
  return (0..n).map(|i| format!("var{}", i)).collect();
}

/// A parsed tabular file: zones in the order they were opened.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TabularDataset {
  /// The zones.
  pub zones: Vec<Zone>
}

impl TabularDataset {
  /// Instantiates an empty dataset.
  pub fn new() -> Self {
    return Self::default();
  }

  /// Inserts a zone. A zone with the same name is replaced in place.
  pub fn insert_zone(&mut self, zone: Zone) {
    if let Some(old) = self.zones.iter_mut().find(|z| z.name == zone.name) {
      *old = zone;
    } else {
      self.zones.push(zone);
    }
  }

  /// Looks up a zone by name.
  pub fn zone(&self, name: &str) -> Option<&Zone> {
    return self.zones.iter().find(|z| z.name == name);
  }

  /// The first zone, which is the only one for history files.
  pub fn first_zone(&self) -> Option<&Zone> {
    return self.zones.first();
  }

  /// Zone names, in order.
  pub fn zone_names(&self) -> impl Iterator<Item = &str> {
    return self.zones.iter().map(|z| z.name.as_str());
  }

  /// Looks up a series in a zone.
  pub fn series(&self, zone: &str, var: &str) -> Option<Vec<f64>> {
    return self.zone(zone)?.series(var);
  }
}

/// Reads a tabular file, picking the sub-parser from its extension.
pub fn parse_file<P: AsRef<Path>>(path: P) -> ParseResult<TabularDataset> {
  return parse_file_with(path, &Dialect::default());
}

/// Reads a tabular file with a given dialect.
pub fn parse_file_with<P: AsRef<Path>>(
  path: P,
  dialect: &Dialect
) -> ParseResult<TabularDataset> {
  let path = path.as_ref();
  let format = TabularFormat::from_path(path).map_err(|e| e.in_file(path))?;
  let file = File::open(path).map_err(|e| ParseError::from(e).in_file(path))?;
  let reader = BufReader::new(file);
  debug!("Reading {} as {}.", path.display(), format);
  let parsed = match format {
    TabularFormat::Tecplot => OnePassParser::parse_bufread(reader, dialect),
    TabularFormat::Csv => DelimitedParser::parse_bufread(reader, dialect)
  };
  return parsed.map_err(|e| e.in_file(path));
}
