//! This module implements readers for the few solver configuration
//! directives we need: optimisation constraints and geometry probe stations.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use itertools::Itertools;
use log::debug;
use serde::{Serialize, Deserialize};

use crate::dialect::Dialect;
use crate::error::*;
use crate::util::*;

/// The constraint directive.
pub const OPT_CONSTRAINT: &str = "OPT_CONSTRAINT";

/// The directive listing geometry probe types.
pub const GEO_DESCRIPTION: &str = "GEO_DESCRIPTION";

/// The directive listing geometry probe locations.
pub const GEO_LOCATION_STATIONS: &str = "GEO_LOCATION_STATIONS";

/// The comparison in a constraint clause.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Comparison {
  /// Upper bound.
  Less,
  /// Lower bound.
  Greater,
  /// Equality.
  Equal
}

impl Comparison {
  /// Returns all comparisons.
  pub const fn all() -> &'static [Self] {
    return &[Self::Less, Self::Greater, Self::Equal];
  }

  /// Returns the operator character.
  pub const fn symbol(&self) -> char {
    return match self {
      Self::Less => '<',
      Self::Greater => '>',
      Self::Equal => '='
    };
  }
}

impl Display for Comparison {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", self.symbol());
  }
}

/// A single constraint on an objective.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Constraint {
  /// The threshold.
  pub value: f64,
  /// How the objective compares to the threshold.
  pub sign: Comparison,
  /// The scale factor applied to the constraint.
  pub scale: f64
}

/// Constraints by objective name.
pub type ConstraintSpec = BTreeMap<String, Constraint>;

/// Probe locations by geometric quantity. A quantity listed more than once
/// gets every one of its locations, in order.
pub type GeoProbeSpec = BTreeMap<String, Vec<Vec<f64>>>;

/// Returns the right-hand side if this is an active line for a directive.
fn directive<'a>(line: &'a str, key: &str, dialect: &Dialect) -> Option<&'a str> {
  if dialect.is_config_comment(line) || lhs(line) != Some(key) {
    return None;
  }
  return rhs(line);
}

/// Parses one `(name op value) * scale` clause.
fn parse_clause(clause: &str) -> ParseResult<(String, Constraint)> {
  let (expr, scale) = match clause.split_once('*') {
    Some((e, s)) => (e, parse_f64(s)?),
    None => (clause, 1.0)
  };
  let expr = expr.trim_matches(|c: char| c.is_whitespace() || c == '(' || c == ')');
  let ops: Vec<(usize, Comparison)> = expr.char_indices()
    .filter_map(|(i, c)| {
      Comparison::all().iter().find(|cmp| cmp.symbol() == c).map(|cmp| (i, *cmp))
    })
    .collect();
  let (at, sign) = match ops.as_slice() {
    [one] => *one,
    [] => return Err(ParseError::inconsistent(
      format!("no comparison in constraint \"{}\"", clause.trim())
    )),
    _ => return Err(ParseError::inconsistent(
      format!("more than one comparison in constraint \"{}\"", clause.trim())
    ))
  };
  let name = expr[..at].trim();
  if name.is_empty() {
    return Err(ParseError::inconsistent(
      format!("constraint \"{}\" has no objective", clause.trim())
    ));
  }
  let value = parse_f64(&expr[at+1..])?;
  return Ok((name.to_string(), Constraint { value, sign, scale }));
}

/// Reads the constraint directive. Only the first active one counts. A
/// missing directive, or one set to NONE, gives no constraints.
pub fn read_constraints<R: BufRead>(
  reader: R,
  dialect: &Dialect
) -> ParseResult<ConstraintSpec> {
  let mut constraints = ConstraintSpec::new();
  for (i, line) in reader.lines().enumerate() {
    let line = line.map_err(|e| ParseError::from(e).at_line(i + 1))?;
    let Some(decl) = directive(&line, OPT_CONSTRAINT, dialect) else {
      continue;
    };
    if decl.trim().eq_ignore_ascii_case("NONE") {
      break;
    }
    for clause in decl.split(';').filter(|c| !c.trim().is_empty()) {
      let (name, c) = parse_clause(clause).map_err(|e| e.at_line(i + 1))?;
      debug!("Constraint: {} {} {} (scale {}).", name, c.sign, c.value, c.scale);
      constraints.insert(name, c);
    }
    break;
  }
  return Ok(constraints);
}

/// Reads the geometry probe directives and pairs names with locations by
/// position. Both directives must be present with the same number of items.
pub fn read_geo_probes<R: BufRead>(
  reader: R,
  dialect: &Dialect
) -> ParseResult<GeoProbeSpec> {
  let mut names: Option<Vec<String>> = None;
  let mut locations: Option<Vec<Vec<f64>>> = None;
  for (i, line) in reader.lines().enumerate() {
    let line = line.map_err(|e| ParseError::from(e).at_line(i + 1))?;
    if let Some(decl) = directive(&line, GEO_DESCRIPTION, dialect) {
      names = Some(
        decl.split(';')
          .map(str::trim)
          .filter(|s| !s.is_empty())
          .map(String::from)
          .collect()
      );
    } else if let Some(decl) = directive(&line, GEO_LOCATION_STATIONS, dialect) {
      let groups = decl.split(';')
        .map(|g| g.trim().trim_start_matches('(').trim_end_matches(')'))
        .filter(|g| !g.trim().is_empty())
        .map(|g| g.split(',').map(parse_f64).collect::<ParseResult<Vec<_>>>())
        .collect::<ParseResult<Vec<_>>>()
        .map_err(|e| e.at_line(i + 1))?;
      locations = Some(groups);
    }
  }
  let (names, locations) = match (names, locations) {
    (Some(n), Some(l)) => (n, l),
    _ => return Err(ParseError::inconsistent(format!(
      "both {} and {} must be defined", GEO_DESCRIPTION, GEO_LOCATION_STATIONS
    )))
  };
  if names.len() != locations.len() {
    return Err(ParseError::inconsistent(format!(
      "{} has {} items but {} has {}",
      GEO_DESCRIPTION,
      names.len(),
      GEO_LOCATION_STATIONS,
      locations.len()
    )));
  }
  let mut probes = GeoProbeSpec::new();
  for (name, loc) in names.into_iter().zip_eq(locations) {
    probes.entry(name).or_default().push(loc);
  }
  return Ok(probes);
}

/// Reads the constraints from a configuration file.
pub fn constraints_from_file<P: AsRef<Path>>(
  path: P
) -> ParseResult<ConstraintSpec> {
  let path = path.as_ref();
  let file = File::open(path).map_err(|e| ParseError::from(e).in_file(path))?;
  return read_constraints(BufReader::new(file), &Dialect::default())
    .map_err(|e| e.in_file(path));
}

/// Reads the geometry probes from a configuration file.
pub fn geo_probes_from_file<P: AsRef<Path>>(
  path: P
) -> ParseResult<GeoProbeSpec> {
  let path = path.as_ref();
  let file = File::open(path).map_err(|e| ParseError::from(e).in_file(path))?;
  return read_geo_probes(BufReader::new(file), &Dialect::default())
    .map_err(|e| e.in_file(path));
}
