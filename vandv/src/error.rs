//! Contains the error type shared by every reader in this library.

use std::error::Error;
use std::fmt::Display;
use std::io;
use std::path::Path;

/// The kinds of failure a reader can run into.
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
  /// The file extension isn't one we know how to read. Recoverable: the
  /// caller may try something else.
  UnsupportedFormat(String),
  /// A data row has a different number of fields than the declared schema.
  MalformedRow {
    /// Number of declared columns.
    expected: usize,
    /// Number of fields actually found on the row.
    found: usize
  },
  /// A field that should have been a number wasn't.
  BadNumber(String),
  /// No variable-name header could be recovered from the file.
  MissingHeader,
  /// A configuration or mesh directive is unusable as written.
  InconsistentConfig(String),
  /// Reading failed at the OS level.
  Io(io::Error),
  /// The CSV reader/writer failed for reasons other than row length.
  Csv(csv::Error)
}

/// An error from parsing a file, with as much location context as we have.
#[derive(Debug)]
pub struct ParseError {
  /// The name of the file being read, if known.
  pub file: Option<String>,
  /// The 1-based line number where the problem was found, if known.
  pub line: Option<usize>,
  /// What went wrong.
  pub kind: ErrorKind
}

impl ParseError {
  /// Creates an error with no location context.
  pub fn new(kind: ErrorKind) -> Self {
    return Self { file: None, line: None, kind };
  }

  /// Shorthand for an inconsistent configuration error.
  pub fn inconsistent<S: Into<String>>(reason: S) -> Self {
    return Self::new(ErrorKind::InconsistentConfig(reason.into()));
  }

  /// Shorthand for a malformed row error.
  pub fn malformed_row(expected: usize, found: usize) -> Self {
    return Self::new(ErrorKind::MalformedRow { expected, found });
  }

  /// Shorthand for a bad number error.
  pub fn bad_number<S: Into<String>>(field: S) -> Self {
    return Self::new(ErrorKind::BadNumber(field.into()));
  }

  /// Attaches a line number, unless one is already known.
  pub fn at_line(mut self, line: usize) -> Self {
    self.line = self.line.or(Some(line));
    return self;
  }

  /// Attaches the file name from a path, unless one is already known.
  pub fn in_file<P: AsRef<Path>>(mut self, path: P) -> Self {
    if self.file.is_none() {
      self.file = Some(path.as_ref().display().to_string());
    }
    return self;
  }

  /// Returns true if the caller may reasonably fall back to something else.
  pub fn is_recoverable(&self) -> bool {
    return matches!(self.kind, ErrorKind::UnsupportedFormat(_));
  }
}

impl Display for ErrorKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::UnsupportedFormat(ext) => write!(
        f, "unsupported format \"{}\" (only tabular Tecplot or CSV)", ext
      ),
      Self::MalformedRow { expected, found } => write!(
        f, "row has {} fields but {} columns are declared", found, expected
      ),
      Self::BadNumber(s) => write!(f, "could not parse \"{}\" as a number", s),
      Self::MissingHeader => write!(f, "no variable names found"),
      Self::InconsistentConfig(s) => write!(f, "inconsistent definition: {}", s),
      Self::Io(e) => e.fmt(f),
      Self::Csv(e) => e.fmt(f)
    };
  }
}

impl Display for ParseError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match (&self.file, self.line) {
      (Some(file), Some(line)) => write!(f, "{}:{}: ", file, line)?,
      (Some(file), None) => write!(f, "{}: ", file)?,
      (None, Some(line)) => write!(f, "line {}: ", line)?,
      (None, None) => {}
    };
    return self.kind.fmt(f);
  }
}

impl Error for ParseError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    return match &self.kind {
      ErrorKind::Io(e) => Some(e),
      ErrorKind::Csv(e) => Some(e),
      _ => None
    };
  }
}

impl From<io::Error> for ParseError {
  fn from(value: io::Error) -> Self {
    return Self::new(ErrorKind::Io(value));
  }
}

impl From<csv::Error> for ParseError {
  fn from(value: csv::Error) -> Self {
    let line = value.position().map(|p| p.line() as usize);
    let unequal = match value.kind() {
      csv::ErrorKind::UnequalLengths { expected_len, len, .. } => {
        Some((*expected_len as usize, *len as usize))
      },
      _ => None
    };
    let err = match unequal {
      Some((expected, found)) => Self::malformed_row(expected, found),
      None => Self::new(ErrorKind::Csv(value))
    };
    return match line {
      Some(l) => err.at_line(l),
      None => err
    };
  }
}

/// Shorthand for results in this library.
pub type ParseResult<T> = Result<T, ParseError>;
