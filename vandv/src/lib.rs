//! This library implements types and functions to reduce the text output of
//! CFD solvers (tabular history/solution files, mesh headers, configuration
//! directives, force logs) into in-memory datasets, and to estimate the
//! discretization error of a mesh-refinement family from them.
//!
//! It was created to automate verification studies: run the same case on a
//! family of meshes, pull the converged value of some output from each run,
//! and compute the grid convergence index.
//!
//! All readers are one-pass and generic over `BufRead`, with file-level
//! helpers that attach the file name to any error.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![allow(clippy::needless_return)]

pub mod airfoil;
pub mod config;
pub mod delimited;
pub mod dialect;
pub mod error;
pub mod family;
pub mod forces;
pub mod gci;
pub mod last_record;
pub mod mesh;
pub mod tabular;
pub mod tecplot;
pub mod util;

/// Imports the most relevant exports from the library.
pub mod prelude {
  pub use crate::airfoil::*;
  pub use crate::config::*;
  pub use crate::delimited::DelimitedParser;
  pub use crate::dialect::{Dialect, DEFAULT_ZONE};
  pub use crate::error::*;
  pub use crate::family::*;
  pub use crate::forces::*;
  pub use crate::gci::*;
  pub use crate::last_record::*;
  pub use crate::mesh::*;
  pub use crate::tabular::*;
  pub use crate::tecplot::{OnePassParser, ParserState, LineResponse};
}

#[cfg(test)]
mod tests;
