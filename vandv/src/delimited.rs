//! This module implements the CSV sub-parser: an optional leading comment
//! line, a header of (possibly quoted) names, then a rectangular numeric
//! block in which comment lines are skipped.

use std::io::BufRead;

use log::debug;

use crate::dialect::Dialect;
use crate::error::*;
use crate::tabular::*;
use crate::util::*;

/// Consumes the optional comment line and the header of a CSV source.
/// Returns the header names and the number of lines consumed. Only one
/// leading comment line is skipped, and only if the marker starts the line.
pub fn read_csv_header<R: BufRead>(
  reader: &mut R,
  dialect: &Dialect
) -> ParseResult<(Vec<String>, usize)> {
  let mut consumed = 0;
  let mut line = String::new();
  if reader.read_line(&mut line)? == 0 {
    return Err(ParseError::new(ErrorKind::MissingHeader));
  }
  consumed += 1;
  if line.starts_with(dialect.tabular_comment) {
    debug!("Skipping leading comment line.");
    line.clear();
    if reader.read_line(&mut line)? == 0 {
      return Err(ParseError::new(ErrorKind::MissingHeader));
    }
    consumed += 1;
  }
  let header = split_names(line.trim_end_matches(['\r', '\n']));
  if header.iter().all(|h| h.is_empty()) {
    return Err(ParseError::new(ErrorKind::MissingHeader).at_line(consumed));
  }
  return Ok((header, consumed));
}

/// The CSV parser.
pub struct DelimitedParser;

impl DelimitedParser {
  /// Parses from a BufRead instance. All rows go into a single zone named
  /// after the dialect's default zone.
  pub fn parse_bufread<R: BufRead>(
    mut reader: R,
    dialect: &Dialect
  ) -> ParseResult<TabularDataset> {
    let (header, skipped) = read_csv_header(&mut reader, dialect)?;
    let mut zb = ZoneBuilder::new(dialect.default_zone.clone(), &header);
    // the csv crate only takes single-byte comment markers
    let comment = u8::try_from(dialect.tabular_comment)
      .ok()
      .filter(u8::is_ascii);
    let mut rdr = csv::ReaderBuilder::new()
      .has_headers(false)
      .flexible(true)
      .trim(csv::Trim::All)
      .comment(comment)
      .from_reader(reader);
    for (i, rec) in rdr.records().enumerate() {
      let rec = rec.map_err(|e| {
        let err = ParseError::from(e);
        let line = err.line.map_or(skipped + i + 1, |l| skipped + l);
        ParseError { line: Some(line), ..err }
      })?;
      let lineno = rec.position()
        .map_or(skipped + i + 1, |p| skipped + p.line() as usize);
      // blank lines come through as a single empty field
      if rec.len() == 1 && rec[0].is_empty() {
        continue;
      }
      let fields: Vec<&str> = rec.iter().collect();
      let row = parse_row(&fields).map_err(|e| e.at_line(lineno))?;
      zb.push_row(row).map_err(|e| e.at_line(lineno))?;
    }
    debug!("Read {} CSV rows of {} columns.", zb.nrows(), header.len());
    let mut data = TabularDataset::new();
    data.insert_zone(zb.finish());
    return Ok(data);
  }
}
