//! This module implements a cheap way to get only the final record of a
//! tabular file: recover the variable names from the top of the file, then
//! seek back from the end for the last line.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek};
use std::path::Path;

use log::debug;
use serde::{Serialize, Deserialize};

use crate::delimited::read_csv_header;
use crate::dialect::Dialect;
use crate::error::*;
use crate::tabular::{TabularFormat, synth_names};
use crate::tecplot::{LineResponse, OnePassParser};
use crate::util::*;

/// The final values of every variable in a file, in declaration order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LastRecord {
  /// (name, value) pairs.
  pub values: Vec<(String, f64)>
}

impl LastRecord {
  /// Looks up a value by variable name.
  pub fn get(&self, name: &str) -> Option<f64> {
    return self.values.iter()
      .find(|(n, _)| n == name)
      .map(|(_, v)| *v);
  }

  /// Iterates over (name, value) pairs.
  pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
    return self.values.iter().map(|(n, v)| (n.as_str(), *v));
  }

  /// Number of variables.
  pub fn len(&self) -> usize {
    return self.values.len();
  }

  /// True if there are no variables.
  pub fn is_empty(&self) -> bool {
    return self.values.is_empty();
  }
}

/// Recovers the variable names of a Tecplot-like file, following the same
/// line rules as the full parser. Stops as soon as the names are known; if
/// the first thing found is data, the names are the ones synthesized for it.
/// Returns None if the file has neither declaration nor data.
pub fn tecplot_header<R: BufRead>(
  reader: &mut R,
  dialect: &Dialect
) -> ParseResult<Option<Vec<String>>> {
  let mut parser = OnePassParser::new(dialect.clone());
  let mut line = String::new();
  loop {
    line.clear();
    if reader.read_line(&mut line)? == 0 {
      return Ok(None);
    }
    let resp = parser.consume(line.trim_end_matches(['\r', '\n']))?;
    match resp {
      LineResponse::Variables(_) | LineResponse::Data => {
        return Ok(Some(parser.variables().to_vec()));
      },
      _ => continue
    }
  }
}

/// Reads the header of a source in the given format, then its last line with
/// any content, and zips them together.
pub fn last_record_from<R: Read + Seek>(
  src: R,
  format: TabularFormat,
  dialect: &Dialect
) -> ParseResult<LastRecord> {
  let mut reader = BufReader::new(src);
  let header = match format {
    TabularFormat::Tecplot => tecplot_header(&mut reader, dialect)?,
    TabularFormat::Csv => Some(read_csv_header(&mut reader, dialect)?.0)
  };
  let mut src = reader.into_inner();
  // blank and comment-only lines at the end don't hold the last record
  let last = read_last_line_skipping(&mut src, |l| {
    dialect.strip_tabular_comment(l).trim().is_empty()
  })?;
  let fields = split_fields(dialect.strip_tabular_comment(&last));
  let values = parse_row(&fields)?;
  let names = header.unwrap_or_else(|| synth_names(values.len()));
  if names.len() != values.len() {
    return Err(ParseError::malformed_row(names.len(), values.len()));
  }
  debug!("Recovered {} final values.", values.len());
  return Ok(LastRecord { values: names.into_iter().zip(values).collect() });
}

/// Returns the final value of every variable in a tabular file.
pub fn final_values<P: AsRef<Path>>(path: P) -> ParseResult<LastRecord> {
  return final_values_with(path, &Dialect::default());
}

/// Returns the final value of every variable in a tabular file, with a given
/// dialect.
pub fn final_values_with<P: AsRef<Path>>(
  path: P,
  dialect: &Dialect
) -> ParseResult<LastRecord> {
  let path = path.as_ref();
  let format = TabularFormat::from_path(path).map_err(|e| e.in_file(path))?;
  let file = File::open(path).map_err(|e| ParseError::from(e).in_file(path))?;
  return last_record_from(file, format, dialect).map_err(|e| e.in_file(path));
}
