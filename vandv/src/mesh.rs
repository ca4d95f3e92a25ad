//! This module implements the reader for SU2-style mesh headers: `KEY= value`
//! lines giving the dimension, point and element counts, and the boundary
//! markers with their element counts. Connectivity and coordinate lines have
//! no `=` and are skipped without inspection.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use clap::ValueEnum;
use log::debug;
use serde::{Serialize, Deserialize};

use crate::dialect::Dialect;
use crate::error::*;
use crate::util::lhs;

/// Keyword that names a boundary marker.
pub const MARKER_TAG: &str = "MARKER_TAG";

/// Keyword that gives the element count of the last named marker.
pub const MARKER_ELEMS: &str = "MARKER_ELEMS";

/// The scalar keywords in a mesh header.
#[derive(
  Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
  ValueEnum
)]
#[clap(rename_all = "UPPER")]
#[serde(rename_all = "UPPERCASE")]
pub enum MeshKeyword {
  /// Spatial dimension.
  Ndime,
  /// Number of elements.
  Nelem,
  /// Number of points.
  Npoin,
  /// Number of boundary markers.
  Nmark
}

impl MeshKeyword {
  /// Returns all keywords.
  pub const fn all() -> &'static [Self] {
    return &[Self::Ndime, Self::Nelem, Self::Npoin, Self::Nmark];
  }

  /// Returns the keyword as written in the file.
  pub const fn name(&self) -> &'static str {
    return match self {
      Self::Ndime => "NDIME",
      Self::Nelem => "NELEM",
      Self::Npoin => "NPOIN",
      Self::Nmark => "NMARK"
    };
  }
}

impl Display for MeshKeyword {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", self.name());
  }
}

impl FromStr for MeshKeyword {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    return Self::all()
      .iter()
      .copied()
      .find(|k| k.name() == s)
      .ok_or(());
  }
}

/// What a mesh header tells us.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MeshMetadata {
  /// Spatial dimension.
  pub ndime: Option<usize>,
  /// Number of points.
  pub npoin: Option<usize>,
  /// Number of elements.
  pub nelem: Option<usize>,
  /// Number of markers.
  pub nmark: Option<usize>,
  /// Element count for every boundary marker.
  pub markers: BTreeMap<String, usize>
}

impl MeshMetadata {
  /// Gets a scalar keyword's value.
  pub fn get(&self, kw: MeshKeyword) -> Option<usize> {
    return match kw {
      MeshKeyword::Ndime => self.ndime,
      MeshKeyword::Nelem => self.nelem,
      MeshKeyword::Npoin => self.npoin,
      MeshKeyword::Nmark => self.nmark
    };
  }

  /// Sets a scalar keyword's value.
  fn set(&mut self, kw: MeshKeyword, value: usize) {
    let slot = match kw {
      MeshKeyword::Ndime => &mut self.ndime,
      MeshKeyword::Nelem => &mut self.nelem,
      MeshKeyword::Npoin => &mut self.npoin,
      MeshKeyword::Nmark => &mut self.nmark
    };
    *slot = Some(value);
  }
}

/// Parses the count after the last `=` of a line.
fn count_after_eq(line: &str) -> ParseResult<usize> {
  let value = line.rsplit('=').next().unwrap_or("").trim();
  return value.parse::<usize>().map_err(|_| ParseError::bad_number(value));
}

/// Scans a mesh header. With a filter, stops at the first line whose key is
/// exactly that keyword and records only it; without one, reads the whole
/// header including markers. Filters are limited to the scalar keywords of
/// [`MeshKeyword`]: other keys, `MARKER_TAG` included, can't be looked up on
/// their own. A keyword that never shows up stays `None`,
/// which is distinct from a zero count.
pub fn scan_mesh<R: BufRead>(
  reader: R,
  filter: Option<MeshKeyword>,
  dialect: &Dialect
) -> ParseResult<MeshMetadata> {
  let mut meta = MeshMetadata::default();
  let mut lines = reader.lines().enumerate();
  while let Some((i, line)) = lines.next() {
    let lineno = i + 1;
    let line = line.map_err(|e| ParseError::from(e).at_line(lineno))?;
    if dialect.is_config_comment(&line) {
      continue;
    }
    let key = match lhs(&line) {
      Some(k) => k,
      None => continue
    };
    if let Some(target) = filter {
      if key == target.name() {
        let n = count_after_eq(&line).map_err(|e| e.at_line(lineno))?;
        meta.set(target, n);
        debug!("Found {} = {} on line {}.", target, n, lineno);
        return Ok(meta);
      }
      continue;
    }
    if let Ok(kw) = key.parse::<MeshKeyword>() {
      let n = count_after_eq(&line).map_err(|e| e.at_line(lineno))?;
      meta.set(kw, n);
    } else if key == MARKER_TAG {
      let tag = line.rsplit('=').next().unwrap_or("").trim().to_string();
      // the element count follows somewhere after the tag
      let mut elems: Option<usize> = None;
      for (j, next) in lines.by_ref() {
        let next = next.map_err(|e| ParseError::from(e).at_line(j + 1))?;
        if next.contains(MARKER_ELEMS) {
          elems = Some(count_after_eq(&next).map_err(|e| e.at_line(j + 1))?);
          break;
        }
      }
      let elems = elems.ok_or_else(|| {
        ParseError::inconsistent(format!(
          "marker \"{}\" has no {}", tag, MARKER_ELEMS
        )).at_line(lineno)
      })?;
      if meta.markers.insert(tag.clone(), elems).is_some() {
        return Err(ParseError::inconsistent(
          format!("marker \"{}\" is defined twice", tag)
        ).at_line(lineno));
      }
      debug!("Marker \"{}\" has {} elements.", tag, elems);
    }
  }
  if filter.is_none() {
    if let Some(n) = meta.nmark {
      if n != meta.markers.len() {
        return Err(ParseError::inconsistent(format!(
          "{} says {} markers but {} were found",
          MeshKeyword::Nmark,
          n,
          meta.markers.len()
        )));
      }
    }
  }
  return Ok(meta);
}

/// Reads the whole header of a mesh file.
pub fn read_mesh<P: AsRef<Path>>(path: P) -> ParseResult<MeshMetadata> {
  let path = path.as_ref();
  let file = File::open(path).map_err(|e| ParseError::from(e).in_file(path))?;
  return scan_mesh(BufReader::new(file), None, &Dialect::default())
    .map_err(|e| e.in_file(path));
}

/// Looks up a single keyword in a mesh file, reading only as far as needed.
/// Returns `Ok(None)` if the keyword isn't there.
pub fn mesh_value<P: AsRef<Path>>(
  path: P,
  kw: MeshKeyword
) -> ParseResult<Option<usize>> {
  let path = path.as_ref();
  let file = File::open(path).map_err(|e| ParseError::from(e).in_file(path))?;
  let meta = scan_mesh(BufReader::new(file), Some(kw), &Dialect::default())
    .map_err(|e| e.in_file(path))?;
  return Ok(meta.get(kw));
}
