//! This module splits an unordered airfoil point cloud into upper and lower
//! surfaces.
//!
//! It's a heuristic, not a topological guarantee:
//!   1. points are sorted by x (ties by z);
//!   2. points with z at least that of the first point seed the upper
//!      surface, the rest seed the lower one;
//!   3. the surface that reaches further aft is walked in order, and each of
//!      its points past the other surface's trailing x moves over if it's
//!      strictly closer in z to that surface's last point.

use itertools::Itertools;
use serde::{Serialize, Deserialize};

use crate::error::*;

/// A point in the chord/thickness plane.
#[derive(
  Copy, Clone, Debug, Serialize, Deserialize, PartialEq, derive_more::From
)]
pub struct Point {
  /// Chord-wise coordinate.
  pub x: f64,
  /// Thickness-wise coordinate.
  pub z: f64
}

/// Moves points from `walked` onto `other` when they sit closer to it.
/// `other` only grows at its end, so its last point is always the trailing
/// one; the trailing point of `walked` is the last one that stayed.
fn reassign(walked: &mut Vec<Point>, other: &mut Vec<Point>) {
  let mut moved: Vec<usize> = Vec::new();
  let mut last_ind = 0;
  for (i, pt) in walked.iter().enumerate() {
    let Some(last_other) = other.last().copied() else {
      break;
    };
    let last_walked = walked[last_ind];
    if pt.x >= last_other.x {
      let to_walked = (pt.z - last_walked.z).abs();
      let to_other = (pt.z - last_other.z).abs();
      if to_other < to_walked {
        other.push(*pt);
        moved.push(i);
        continue;
      }
    }
    last_ind = i;
  }
  let mut i = 0;
  walked.retain(|_| {
    let keep = !moved.contains(&i);
    i += 1;
    keep
  });
}

/// Splits airfoil coordinates into (upper, lower) surfaces, each sorted by x.
pub fn split_surfaces(x: &[f64], z: &[f64]) -> ParseResult<(Vec<Point>, Vec<Point>)> {
  if x.len() != z.len() {
    return Err(ParseError::malformed_row(x.len(), z.len()));
  }
  let coords: Vec<Point> = x.iter()
    .zip(z)
    .map(|(&x, &z)| Point::from((x, z)))
    .sorted_by(|a, b| a.x.total_cmp(&b.x).then(a.z.total_cmp(&b.z)))
    .collect();
  let Some(first) = coords.first().copied() else {
    return Ok((Vec::new(), Vec::new()));
  };
  let (mut upper, mut lower): (Vec<Point>, Vec<Point>) = coords.into_iter()
    .partition(|p| p.z >= first.z);
  let (Some(u), Some(l)) = (upper.last().copied(), lower.last().copied()) else {
    return Ok((upper, lower));
  };
  if u.x < l.x {
    reassign(&mut lower, &mut upper);
  } else {
    reassign(&mut upper, &mut lower);
  }
  return Ok((upper, lower));
}
