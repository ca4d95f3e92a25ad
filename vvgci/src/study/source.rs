//! This simple sub-module implements the ways a study can name its meshes.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vandv::prelude::*;

/// Default mesh file extension.
fn default_extension() -> String {
  return ".su2".to_string();
}

/// Joins a relative path onto the script's directory.
pub(crate) fn resolve(base: &Path, p: &Path) -> PathBuf {
  if p.is_absolute() {
    return p.to_path_buf();
  }
  return base.join(p);
}

/// Either an explicit list of mesh files or a directory to scan for them.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum MeshSource {
  /// Explicit list, in the same order as the histories.
  List(Vec<PathBuf>),
  /// Every file in a directory whose name contains the extension, sorted by
  /// name.
  Directory {
    /// The directory.
    dir: PathBuf,
    /// Extension to look for.
    #[serde(default = "default_extension")]
    extension: String
  }
}

impl MeshSource {
  /// Lists the mesh files, relative paths taken from `base`.
  pub(crate) fn paths(&self, base: &Path) -> io::Result<Vec<PathBuf>> {
    return match self {
      Self::List(v) => Ok(v.iter().map(|p| resolve(base, p)).collect()),
      Self::Directory { dir, extension } => {
        mesh_files(resolve(base, dir), extension)
      }
    };
  }
}
