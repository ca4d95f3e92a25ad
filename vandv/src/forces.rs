//! This module implements readers for the solver's text logs: the force
//! breakdown file and the performance summary at the end of a run.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::*;
use crate::util::parse_f64;

/// Parses the last whitespace-separated token of a chunk as a float.
fn last_token(chunk: &str) -> ParseResult<f64> {
  let tok = chunk.split_whitespace().last().unwrap_or("");
  return parse_f64(tok);
}

/// Reads the total force coefficients from a force breakdown. Every `Total`
/// line gives the coefficient and, if present, its pressure (`p` suffix) and
/// friction (`v` suffix) parts. Stops after the `CFy` line.
pub fn read_force_breakdown<R: BufRead>(
  reader: R
) -> ParseResult<BTreeMap<String, f64>> {
  let mut forces = BTreeMap::new();
  for (i, line) in reader.lines().enumerate() {
    let line = line.map_err(|e| ParseError::from(e).at_line(i + 1))?;
    let prefix = line.split(':').next().unwrap_or("");
    let Some((_, coeff)) = prefix.split_once("Total ") else {
      continue;
    };
    let coeff = coeff.trim();
    for chunk in line.split('|') {
      let key = if chunk.contains("Total") {
        coeff.to_string()
      } else if chunk.contains("Pressure") {
        format!("{}p", coeff)
      } else if chunk.contains("Friction") {
        format!("{}v", coeff)
      } else {
        continue;
      };
      forces.insert(key, last_token(chunk).map_err(|e| e.at_line(i + 1))?);
    }
    if line.contains("CFy") {
      break;
    }
  }
  return Ok(forces);
}

/// Reads a performance summary: every `name: ... value` chunk between `|`
/// separators.
pub fn read_performance<R: BufRead>(
  reader: R
) -> ParseResult<BTreeMap<String, f64>> {
  let mut perf = BTreeMap::new();
  for (i, line) in reader.lines().enumerate() {
    let line = line.map_err(|e| ParseError::from(e).at_line(i + 1))?;
    if !line.contains('|') {
      continue;
    }
    for chunk in line.split('|').filter(|c| !c.trim().is_empty()) {
      let name = chunk.split(':').next().unwrap_or("").trim().to_string();
      perf.insert(name, last_token(chunk).map_err(|e| e.at_line(i + 1))?);
    }
  }
  return Ok(perf);
}

/// Reads a force breakdown file.
pub fn force_breakdown_from_file<P: AsRef<Path>>(
  path: P
) -> ParseResult<BTreeMap<String, f64>> {
  let path = path.as_ref();
  let file = File::open(path).map_err(|e| ParseError::from(e).in_file(path))?;
  return read_force_breakdown(BufReader::new(file)).map_err(|e| e.in_file(path));
}

/// Reads a performance summary file.
pub fn performance_from_file<P: AsRef<Path>>(
  path: P
) -> ParseResult<BTreeMap<String, f64>> {
  let path = path.as_ref();
  let file = File::open(path).map_err(|e| ParseError::from(e).in_file(path))?;
  return read_performance(BufReader::new(file)).map_err(|e| e.in_file(path));
}
