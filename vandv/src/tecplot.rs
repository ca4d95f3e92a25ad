//! This module implements the parser for Tecplot-like ASCII tabular files:
//! an optional title, an optional variable list (possibly continued onto the
//! next line), any number of zones, and whitespace- or comma-delimited rows.
//!
//! It's a one-pass line classifier. It doesn't care how lines are fed into it.

use std::io::BufRead;

use log::{debug, warn};
use serde::{Serialize, Deserialize};

use crate::dialect::Dialect;
use crate::error::*;
use crate::tabular::*;
use crate::util::*;

/// Where the parser is in the file.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ParserState {
  /// Nothing structural seen yet.
  Start,
  /// Variables declared, no zone open.
  HaveVariables,
  /// A zone is open (declared, or the default one opened by a data row).
  InZone
}

/// The parser responds this when it successfully classifies a line.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[non_exhaustive]
pub enum LineResponse {
  /// The line was empty or entirely a comment.
  Comment,
  /// The line was the title.
  Title,
  /// The line declared this many variables.
  Variables(usize),
  /// The line started a variable declaration continued on the next line.
  AwaitingVariables,
  /// The line opened a zone with this name.
  Zone(String),
  /// The line was a data row.
  Data,
  /// The line held quoted text with no keyword we know.
  Decorative
}

/// This is the Tecplot-like parser.
pub struct OnePassParser {
  /// Lexical conventions.
  dialect: Dialect,
  /// Where we are.
  state: ParserState,
  /// The active variable names.
  variables: Vec<String>,
  /// True if the next line holds the variable names.
  continued: bool,
  /// The zone being filled, if any.
  zone: Option<ZoneBuilder>,
  /// Finished zones.
  data: TabularDataset,
  /// Number of zones opened so far.
  zones_opened: usize,
  /// The total number of consumed lines.
  total_lines: usize
}

impl Default for OnePassParser {
  fn default() -> Self {
    return Self::new(Dialect::default());
  }
}

impl OnePassParser {
  /// Instantiates a new parser.
  pub fn new(dialect: Dialect) -> Self {
    return Self {
      dialect,
      state: ParserState::Start,
      variables: Vec::new(),
      continued: false,
      zone: None,
      data: TabularDataset::new(),
      zones_opened: 0,
      total_lines: 0
    };
  }

  /// Returns the current parser state.
  pub fn state(&self) -> ParserState {
    return self.state;
  }

  /// Returns the active variable names.
  pub fn variables(&self) -> &[String] {
    return &self.variables;
  }

  /// Number of lines consumed so far.
  pub fn total_lines(&self) -> usize {
    return self.total_lines;
  }

  /// Flushes the open zone into the dataset.
  fn flush_zone(&mut self) {
    if let Some(zb) = self.zone.take() {
      debug!(
        "Finishing zone \"{}\" with {} rows on line {}.",
        zb.name(),
        zb.nrows(),
        self.total_lines
      );
      let zone = zb.finish();
      if self.data.zone(&zone.name).is_some() {
        warn!(
          "Zone \"{}\" appears more than once, keeping the last one.",
          zone.name
        );
      }
      self.data.insert_zone(zone);
    }
  }

  /// Opens a new zone, flushing the current one.
  fn open_zone(&mut self, name: String) {
    self.flush_zone();
    debug!("Opening zone \"{}\" on line {}.", name, self.total_lines);
    self.zone = Some(ZoneBuilder::new(name, &self.variables));
    self.zones_opened += 1;
    self.state = ParserState::InZone;
  }

  /// Sets the active variable list.
  fn declare(&mut self, variables: Vec<String>) -> LineResponse {
    debug!(
      "Line {} declares {} variables.", self.total_lines, variables.len()
    );
    let n = variables.len();
    self.variables = variables;
    match self.zone {
      Some(ref mut zb) if zb.nrows() == 0 => {
        *zb = ZoneBuilder::new(zb.name().to_string(), &self.variables);
      },
      Some(_) => warn!(
        "Variables redeclared on line {} in the middle of a zone; they'll \
        apply from the next zone on.",
        self.total_lines
      ),
      None => self.state = ParserState::HaveVariables
    }
    return LineResponse::Variables(n);
  }

  /// Takes the zone name from a zone line: whatever follows the last `=`.
  fn zone_name(&self, line: &str) -> String {
    return match line.rsplit_once('=') {
      Some((_, name)) if !unquote(name).is_empty() => unquote(name).to_string(),
      _ => format!("ZONE{}", self.zones_opened)
    };
  }

  /// Appends a data row to the open zone, opening the default one if needed.
  fn push_data(&mut self, line: &str) -> ParseResult<LineResponse> {
    if self.zone.is_none() {
      let name = self.dialect.default_zone.clone();
      self.open_zone(name);
    }
    let row = parse_row(&split_fields(line))?;
    if let Some(ref mut zb) = self.zone {
      zb.push_row(row)?;
      // synthesized names stick for the rest of the file
      if self.variables.is_empty() {
        self.variables = zb.variables().to_vec();
      }
    }
    return Ok(LineResponse::Data);
  }

  /// Consumes a line into the parser.
  pub fn consume(&mut self, line: &str) -> ParseResult<LineResponse> {
    self.total_lines += 1;
    let lineno = self.total_lines;
    if self.continued {
      self.continued = false;
      let names = split_names(self.dialect.strip_tabular_comment(line));
      if names.iter().any(|n| n.is_empty()) {
        return Err(ParseError::new(ErrorKind::MissingHeader).at_line(lineno));
      }
      return Ok(self.declare(names));
    }
    let line = self.dialect.strip_tabular_comment(line);
    if line.trim().is_empty() {
      return Ok(LineResponse::Comment);
    }
    let lower = line.to_lowercase();
    if lower.contains("title") {
      return Ok(LineResponse::Title);
    }
    if lower.contains("variable") {
      let Some(decl) = rhs(line) else {
        warn!("Line {} mentions variables but declares none.", lineno);
        return Ok(LineResponse::Decorative);
      };
      if decl.contains(self.dialect.continuation) {
        self.continued = true;
        return Ok(LineResponse::AwaitingVariables);
      }
      let names = split_names(decl);
      if names.iter().any(|n| n.is_empty()) {
        return Err(ParseError::new(ErrorKind::MissingHeader).at_line(lineno));
      }
      return Ok(self.declare(names));
    }
    if lower.contains("zone") {
      let name = self.zone_name(line);
      self.open_zone(name.clone());
      return Ok(LineResponse::Zone(name));
    }
    if line.contains('"') {
      return Ok(LineResponse::Decorative);
    }
    return self.push_data(line).map_err(|e| e.at_line(lineno));
  }

  /// Finishes up and returns the dataset.
  pub fn finish(mut self) -> TabularDataset {
    if self.continued {
      warn!("File ended while waiting for a continued variable list.");
    }
    self.flush_zone();
    return self.data;
  }

  /// Parses from a BufRead instance.
  pub fn parse_bufread<R: BufRead>(
    reader: R,
    dialect: &Dialect
  ) -> ParseResult<TabularDataset> {
    let mut parser = Self::new(dialect.clone());
    for line in reader.lines() {
      let line = line
        .map_err(|e| ParseError::from(e).at_line(parser.total_lines + 1))?;
      parser.consume(&line)?;
    }
    return Ok(parser.finish());
  }
}
