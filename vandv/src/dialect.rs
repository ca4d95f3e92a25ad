//! This module implements the small set of lexical conventions that differ
//! between the files we read: comment markers, continuation markers, and the
//! name given to data that never declared a zone.

use serde::{Serialize, Deserialize};

/// The default name for data rows that appear before any zone is declared.
pub const DEFAULT_ZONE: &str = "ZONE0";

/// Lexical conventions for the files being read. The default matches what
/// SU2 writes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Dialect {
  /// Comment marker inside tabular (Tecplot-like and CSV) files.
  pub tabular_comment: char,
  /// Comment prefix for mesh files and solver configuration files.
  pub config_comment: char,
  /// Marks a variable declaration continued onto the next line.
  pub continuation: char,
  /// Zone name used when a file never opens a zone.
  pub default_zone: String
}

impl Default for Dialect {
  fn default() -> Self {
    return Self {
      tabular_comment: '#',
      config_comment: '%',
      continuation: '\\',
      default_zone: DEFAULT_ZONE.to_string()
    };
  }
}

impl Dialect {
  /// Returns true if a mesh/config line is commented out.
  pub fn is_config_comment(&self, line: &str) -> bool {
    return line.starts_with(self.config_comment);
  }

  /// Cuts a tabular line at its comment marker, if there is one.
  pub fn strip_tabular_comment<'a>(&self, line: &'a str) -> &'a str {
    return match line.find(self.tabular_comment) {
      Some(i) => &line[..i],
      None => line
    };
  }
}
