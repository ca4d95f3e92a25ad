//! This module turns a set of mesh files into a mesh family: a representative
//! grid spacing for every member, ready to be paired with solutions for a GCI
//! estimate.

use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Serialize, Deserialize};

use crate::error::*;
use crate::gci::RefinementSample;
use crate::mesh::*;

/// Lists the files in a directory whose names contain `extension`, sorted by
/// name.
pub fn mesh_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<PathBuf>> {
  let mut found = Vec::new();
  for entry in std::fs::read_dir(dir)? {
    let path = entry?.path();
    let matches = path.file_name()
      .and_then(|n| n.to_str())
      .is_some_and(|n| n.contains(extension));
    if path.is_file() && matches {
      found.push(path);
    }
  }
  found.sort();
  return Ok(found);
}

/// One member of a mesh family.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MeshLevel {
  /// The mesh file.
  pub path: PathBuf,
  /// The size count (points or elements).
  pub count: usize,
  /// The representative spacing, `(1/count)^(1/ndime)`.
  pub h: f64
}

/// A family of meshes of the same geometry at different resolutions.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MeshFamily {
  /// Spatial dimension, from the first mesh.
  pub ndime: usize,
  /// The members, in the order they were given.
  pub levels: Vec<MeshLevel>
}

/// Representative grid spacing from a size count and a dimension.
pub fn spacing(count: usize, ndime: usize) -> f64 {
  return (1.0 / count as f64).powf(1.0 / ndime as f64);
}

impl MeshFamily {
  /// Reads the dimension from the first mesh and the size count from every
  /// mesh. `key` is normally NPOIN or NELEM.
  pub fn from_meshes<P: AsRef<Path>>(
    paths: &[P],
    key: MeshKeyword
  ) -> ParseResult<Self> {
    let first = paths.first()
      .ok_or_else(|| ParseError::inconsistent("empty mesh family"))?;
    let ndime = read_mesh(first)?
      .ndime
      .filter(|&n| n > 0)
      .ok_or_else(|| {
        ParseError::inconsistent(format!("no valid {}", MeshKeyword::Ndime))
          .in_file(first)
      })?;
    let mut levels = Vec::with_capacity(paths.len());
    for p in paths {
      let count = mesh_value(p, key)?
        .filter(|&n| n > 0)
        .ok_or_else(|| {
          ParseError::inconsistent(format!("no valid {}", key)).in_file(p)
        })?;
      let h = spacing(count, ndime);
      debug!("{}: {} = {}, h = {}", p.as_ref().display(), key, count, h);
      levels.push(MeshLevel { path: p.as_ref().to_path_buf(), count, h });
    }
    return Ok(Self { ndime, levels });
  }

  /// Spacings, in the order the meshes were given.
  pub fn spacings(&self) -> Vec<f64> {
    return self.levels.iter().map(|l| l.h).collect();
  }

  /// Pairs three members with their solutions (same order as the members)
  /// and orders the triple fine to coarse.
  pub fn refinement_sample(&self, phi: &[f64]) -> ParseResult<RefinementSample> {
    if self.levels.len() != 3 || phi.len() != 3 {
      return Err(ParseError::inconsistent(format!(
        "a refinement sample needs 3 meshes and 3 solutions, got {} and {}",
        self.levels.len(),
        phi.len()
      )));
    }
    let pairs = [
      (self.levels[0].h, phi[0]),
      (self.levels[1].h, phi[1]),
      (self.levels[2].h, phi[2])
    ];
    return Ok(RefinementSample::from_pairs(pairs));
  }
}
