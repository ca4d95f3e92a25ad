//! Contains error types for studies and their runnings.

use std::error::Error;
use std::fmt::Display;
use std::io;
use std::path::PathBuf;

use vandv::prelude::*;

/// Errors when running a study.
#[derive(Debug)]
pub(crate) enum StudyError {
  /// A file couldn't be read or parsed.
  Parse(ParseError),
  /// A directory couldn't be listed.
  Io(io::Error),
  /// The estimator refused the sample.
  Gci(GciError),
  /// A history file lacks the requested variable.
  MissingVariable {
    /// The history file.
    file: PathBuf,
    /// The variable that wasn't there.
    variable: String
  },
  /// Meshes and histories don't pair up.
  Mismatch {
    /// Number of meshes.
    meshes: usize,
    /// Number of histories.
    histories: usize
  }
}

impl Display for StudyError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::Parse(e) => e.fmt(f),
      Self::Io(e) => e.fmt(f),
      Self::Gci(e) => e.fmt(f),
      Self::MissingVariable { file, variable } => write!(
        f, "no variable {} in {}", variable, file.display()
      ),
      Self::Mismatch { meshes, histories } => write!(
        f, "{} meshes but {} histories", meshes, histories
      )
    };
  }
}

impl Error for StudyError {}

impl From<ParseError> for StudyError {
  fn from(e: ParseError) -> Self {
    return Self::Parse(e);
  }
}

impl From<io::Error> for StudyError {
  fn from(e: io::Error) -> Self {
    return Self::Io(e);
  }
}

impl From<GciError> for StudyError {
  fn from(e: GciError) -> Self {
    return Self::Gci(e);
  }
}
