//! This module implements the grid convergence index (GCI) method for
//! estimating discretization error from three members of a mesh family, with
//! the extensions for ill-behaved apparent orders described in the NASA TMR
//! uncertainty summary (https://turbmodels.larc.nasa.gov/uncertainty_summary.pdf).
//!
//! Grids are numbered fine to coarse: 1 is the finest.

use std::error::Error;
use std::fmt::Display;

use log::{debug, warn};
use serde::{Serialize, Deserialize};

/// Safety factor on the convergence index.
pub const SAFETY_FACTOR: f64 = 1.25;

/// Below this apparent order the GCI is capped by the solution spread.
pub const LOW_ORDER: f64 = 0.95;

/// Above this apparent order the GCI is recomputed with this order.
pub const HIGH_ORDER: f64 = 3.05;

/// Factor on the solution spread when no order can be trusted.
pub const SPREAD_FACTOR: f64 = 3.0;

/// Where the apparent order solve starts.
pub const DEFAULT_SEED: f64 = 2.0;

/// Iteration cap for the apparent order solve.
const MAX_ITERATIONS: usize = 100;

/// Step-halvings allowed per Newton iteration.
const MAX_HALVINGS: usize = 40;

/// Relative step size below which the solve has converged.
const STEP_TOLERANCE: f64 = 1e-12;

/// Three grid spacings and the corresponding solutions, fine to coarse.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RefinementSample {
  /// Representative grid spacings, finest first.
  pub h: [f64; 3],
  /// Solutions on each grid.
  pub phi: [f64; 3]
}

impl RefinementSample {
  /// Builds a sample from (h, phi) pairs in any order, sorting them fine to
  /// coarse.
  pub fn from_pairs(mut pairs: [(f64, f64); 3]) -> Self {
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    return Self {
      h: [pairs[0].0, pairs[1].0, pairs[2].0],
      phi: [pairs[0].1, pairs[1].1, pairs[2].1]
    };
  }

  /// Runs the estimator on this sample.
  pub fn estimate(&self) -> Result<ErrorReport, GciError> {
    return estimate(self.h, self.phi);
  }
}

/// Inputs the method can't be applied to at all.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GciError {
  /// Spacings must be finite, positive and strictly increasing.
  InvalidSpacing([f64; 3]),
  /// The fine-grid solution is zero, so relative errors are undefined.
  ZeroSolution,
  /// Two consecutive grids gave the same solution.
  ZeroDifference,
  /// The apparent order solve didn't converge; holds the last iterate.
  NoConvergence(f64)
}

impl Display for GciError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::InvalidSpacing(h) => write!(
        f,
        "grid spacings {:?} must be positive and increase from fine to coarse",
        h
      ),
      Self::ZeroSolution => write!(f, "the fine-grid solution is zero"),
      Self::ZeroDifference => write!(
        f, "two consecutive grids gave identical solutions"
      ),
      Self::NoConvergence(p) => write!(
        f, "apparent order solve did not converge (last iterate {})", p
      )
    };
  }
}

impl Error for GciError {}

/// Which guideline correction applied to a monotonically converging sample.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum Correction {
  /// The apparent order is in the trusted range; no correction.
  Nominal,
  /// Negative apparent order; the GCI is replaced by the spread estimate.
  NegativeOrder {
    /// `3 * spread / |phi1|`.
    corrected_gci: f64
  },
  /// Apparent order between zero and the low threshold.
  LowOrder {
    /// `min(GCI, 1.25 * spread / |phi1|)`.
    corrected_gci: f64
  },
  /// Apparent order above the high threshold.
  HighOrder {
    /// The GCI at the high threshold order, capped by the spread estimate.
    corrected_gci: f64
  }
}

/// The result of a GCI estimate.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "branch")]
pub enum ErrorReport {
  /// The solutions oscillate, so there's no apparent order to speak of.
  Oscillatory {
    /// `|(phi1 - phi2) / phi1|`.
    relative_error: f64,
    /// `3 * spread / |phi1|`.
    corrected_gci: f64
  },
  /// The solutions converge monotonically (or diverge monotonically).
  Converged {
    /// The apparent order of accuracy.
    apparent_order: f64,
    /// `|(phi1 - phi2) / phi1|`.
    relative_error: f64,
    /// The Richardson-extrapolated value.
    extrapolated: f64,
    /// Fine-grid error relative to the extrapolated value.
    extrapolated_relative_error: f64,
    /// The fine-grid convergence index.
    gci: f64,
    /// The correction applied for out-of-range orders.
    correction: Correction
  }
}

impl ErrorReport {
  /// The error code: 0 nominal, 1 oscillatory, 2 negative order, 3 low
  /// order, 4 high order.
  pub fn error_code(&self) -> u8 {
    return match self {
      Self::Oscillatory { .. } => 1,
      Self::Converged { correction, .. } => match correction {
        Correction::Nominal => 0,
        Correction::NegativeOrder { .. } => 2,
        Correction::LowOrder { .. } => 3,
        Correction::HighOrder { .. } => 4
      }
    };
  }

  /// The apparent order, if there is one.
  pub fn apparent_order(&self) -> Option<f64> {
    return match self {
      Self::Converged { apparent_order, .. } => Some(*apparent_order),
      Self::Oscillatory { .. } => None
    };
  }

  /// The relative fine-grid error, always available.
  pub fn relative_error(&self) -> f64 {
    return match self {
      Self::Converged { relative_error, .. } => *relative_error,
      Self::Oscillatory { relative_error, .. } => *relative_error
    };
  }

  /// The extrapolated value, if there is one.
  pub fn extrapolated(&self) -> Option<f64> {
    return match self {
      Self::Converged { extrapolated, .. } => Some(*extrapolated),
      Self::Oscillatory { .. } => None
    };
  }

  /// The extrapolated relative error, if there is one.
  pub fn extrapolated_relative_error(&self) -> Option<f64> {
    return match self {
      Self::Converged { extrapolated_relative_error, .. } => {
        Some(*extrapolated_relative_error)
      },
      Self::Oscillatory { .. } => None
    };
  }

  /// The uncorrected convergence index, if there is one.
  pub fn gci(&self) -> Option<f64> {
    return match self {
      Self::Converged { gci, .. } => Some(*gci),
      Self::Oscillatory { .. } => None
    };
  }

  /// The corrected convergence index, if a correction applied.
  pub fn corrected_gci(&self) -> Option<f64> {
    return match self {
      Self::Oscillatory { corrected_gci, .. } => Some(*corrected_gci),
      Self::Converged { correction, .. } => match correction {
        Correction::Nominal => None,
        Correction::NegativeOrder { corrected_gci }
        | Correction::LowOrder { corrected_gci }
        | Correction::HighOrder { corrected_gci } => Some(*corrected_gci)
      }
    };
  }

  /// The convergence index to quote: the corrected one if a correction
  /// applied, the plain one otherwise.
  pub fn effective_gci(&self) -> f64 {
    return self.corrected_gci()
      .or(self.gci())
      .unwrap_or(f64::NAN);
  }

  /// A human-readable warning for the branch taken, if it isn't nominal.
  pub fn warning(&self) -> Option<String> {
    return match self.error_code() {
      1 => Some("Oscillatory convergence".to_string()),
      2 => Some("Negative apparent order".to_string()),
      3 => Some(format!("Apparent order is less than {}", LOW_ORDER)),
      4 => Some(format!("Apparent order is greater than {}", HIGH_ORDER)),
      _ => None
    };
  }
}

/// Writes an optional value, or NA.
fn fmt_opt(x: Option<f64>) -> String {
  return x.map_or("NA".to_string(), |v| format!("{}", v));
}

impl Display for ErrorReport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    writeln!(f, "Computed apparent order: {}", fmt_opt(self.apparent_order()))?;
    writeln!(f, "Relative fine-grid error: {}", self.relative_error())?;
    writeln!(f, "Extrapolated value: {}", fmt_opt(self.extrapolated()))?;
    writeln!(
      f,
      "Extrapolated relative fine-grid error: {}",
      fmt_opt(self.extrapolated_relative_error())
    )?;
    writeln!(f, "Fine-grid convergence index: {}", fmt_opt(self.gci()))?;
    writeln!(
      f,
      "Fine-grid convergence index, corrected: {}",
      fmt_opt(self.corrected_gci())
    )?;
    return write!(f, "Error code: {}", self.error_code());
  }
}

/// The residual of the apparent order equation at `p`:
/// `(ln|e32/e21| + ln((r21^p - s)/(r32^p - s))) / ln(r21) - p`.
pub fn order_residual(p: f64, r21: f64, r32: f64, eps21: f64, eps32: f64) -> f64 {
  let ratio = eps32 / eps21;
  let s = ratio.signum();
  let q = ((r21.powf(p) - s) / (r32.powf(p) - s)).ln();
  return (ratio.abs().ln() + q) / r21.ln() - p;
}

/// Solves for the apparent order with a damped Newton iteration on a
/// numerical derivative, starting at `seed`.
pub fn solve_apparent_order(
  r21: f64,
  r32: f64,
  eps21: f64,
  eps32: f64,
  seed: f64
) -> Result<f64, GciError> {
  let f = |p: f64| order_residual(p, r21, r32, eps21, eps32);
  let mut p = seed;
  let mut fp = f(p);
  if !fp.is_finite() {
    return Err(GciError::NoConvergence(p));
  }
  for it in 0..MAX_ITERATIONS {
    if fp == 0.0 {
      return Ok(p);
    }
    let dp = 1e-6 * p.abs().max(1.0);
    let slope = (f(p + dp) - f(p - dp)) / (2.0 * dp);
    if !slope.is_finite() || slope == 0.0 {
      return Err(GciError::NoConvergence(p));
    }
    let mut step = fp / slope;
    let mut accepted = false;
    for _ in 0..MAX_HALVINGS {
      let cand = p - step;
      let fc = f(cand);
      if fc.is_finite() && fc.abs() < fp.abs() {
        p = cand;
        fp = fc;
        accepted = true;
        break;
      }
      step /= 2.0;
    }
    if !accepted || step.abs() <= STEP_TOLERANCE * p.abs().max(1.0) {
      // can't improve any further: fine if we're already on the root
      if fp.abs() <= 1e-9 {
        debug!("Apparent order {} after {} iterations.", p, it + 1);
        return Ok(p);
      }
      if !accepted {
        return Err(GciError::NoConvergence(p));
      }
    }
  }
  if fp.abs() <= 1e-9 {
    return Ok(p);
  }
  return Err(GciError::NoConvergence(p));
}

/// Estimates the discretization error of the finest grid. Grid 1 is the
/// finest; `h` must increase strictly.
pub fn estimate(h: [f64; 3], phi: [f64; 3]) -> Result<ErrorReport, GciError> {
  return estimate_with_seed(h, phi, DEFAULT_SEED);
}

/// Same as [`estimate`], with a chosen starting order for the solve (the
/// nominal order of the scheme is a good alternative to the default).
pub fn estimate_with_seed(
  h: [f64; 3],
  phi: [f64; 3],
  seed: f64
) -> Result<ErrorReport, GciError> {
  let valid_h = h.iter().all(|x| x.is_finite() && *x > 0.0)
    && h[0] < h[1]
    && h[1] < h[2];
  if !valid_h {
    return Err(GciError::InvalidSpacing(h));
  }
  if phi[0] == 0.0 {
    return Err(GciError::ZeroSolution);
  }
  let r21 = h[1] / h[0];
  let r32 = h[2] / h[1];
  let eps21 = phi[1] - phi[0];
  let eps32 = phi[2] - phi[1];
  if eps21 == 0.0 || eps32 == 0.0 {
    return Err(GciError::ZeroDifference);
  }
  let spread = (phi[1] - phi[0]).abs()
    .max((phi[2] - phi[1]).abs())
    .max((phi[2] - phi[0]).abs());
  let spread_rel = spread / phi[0].abs();
  let relative_error = ((phi[0] - phi[1]) / phi[0]).abs();

  if eps32 / eps21 < 0.0 {
    let report = ErrorReport::Oscillatory {
      relative_error,
      corrected_gci: SPREAD_FACTOR * spread_rel
    };
    warn!("{}", report.warning().unwrap_or_default());
    return Ok(report);
  }

  let p = solve_apparent_order(r21, r32, eps21, eps32, seed)?;
  let r21p = r21.powf(p);
  let extrapolated = (phi[0] * r21p - phi[1]) / (r21p - 1.0);
  let extrapolated_relative_error = ((extrapolated - phi[0]) / extrapolated).abs();
  let gci = SAFETY_FACTOR * relative_error / (r21p - 1.0);
  let correction = if p < 0.0 {
    Correction::NegativeOrder { corrected_gci: SPREAD_FACTOR * spread_rel }
  } else if p > 0.0 && p < LOW_ORDER {
    Correction::LowOrder {
      corrected_gci: gci.min(SAFETY_FACTOR * spread_rel)
    }
  } else if p > HIGH_ORDER {
    let capped = SAFETY_FACTOR * relative_error / (r21.powf(HIGH_ORDER) - 1.0);
    Correction::HighOrder {
      corrected_gci: capped.min(SAFETY_FACTOR * spread_rel)
    }
  } else {
    Correction::Nominal
  };
  let report = ErrorReport::Converged {
    apparent_order: p,
    relative_error,
    extrapolated,
    extrapolated_relative_error,
    gci,
    correction
  };
  if let Some(w) = report.warning() {
    warn!("{}", w);
  }
  return Ok(report);
}
