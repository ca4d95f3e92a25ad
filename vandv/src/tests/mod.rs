//! Unit tests for the library, split by subject.

mod airfoil;
mod config;
mod tabular;
mod util;

/// Asserts two floats are within a tolerance.
pub(crate) fn assert_near(a: f64, b: f64, tol: f64) {
  assert!((a - b).abs() <= tol, "{} and {} differ by more than {}", a, b, tol);
}

/// Writes contents to a named temporary file with the given suffix.
pub(crate) fn temp_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
  use std::io::Write;
  let mut f = tempfile::Builder::new()
    .suffix(suffix)
    .tempfile()
    .expect("could not create temp file");
  f.write_all(contents.as_bytes()).expect("could not write temp file");
  f.flush().expect("could not flush temp file");
  return f;
}
