use std::f64::consts::PI;

use crate::prelude::*;

/// Half-thickness of a NACA 0012 section.
fn naca0012(x: f64) -> f64 {
  return 0.6 * (
    0.2969 * x.sqrt() - 0.1260 * x - 0.3516 * x.powi(2) + 0.2843 * x.powi(3)
    - 0.1015 * x.powi(4)
  );
}

/// A symmetric point cloud: shared leading and trailing edge points, cosine
/// spacing, shuffled.
fn symmetric_cloud(n: usize) -> (Vec<f64>, Vec<f64>) {
  let mut pts: Vec<(f64, f64)> = vec![(0.0, 0.0), (1.0, 0.0)];
  for i in 1..n {
    let x = 0.5 * (1.0 - (PI * i as f64 / n as f64).cos());
    let t = naca0012(x);
    pts.push((x, t));
    pts.push((x, -t));
  }
  // deterministic shuffle: odd indices reversed, then even ones
  let shuffled: Vec<(f64, f64)> = pts.iter().copied().skip(1).step_by(2).rev()
    .chain(pts.iter().copied().step_by(2))
    .collect();
  return shuffled.into_iter().unzip();
}

#[test]
fn test_symmetric_split() {
  let (x, z) = symmetric_cloud(40);
  let (upper, lower) = split_surfaces(&x, &z).unwrap();
  assert_eq!(upper.len() + lower.len(), x.len());
  assert!(upper.iter().all(|p| p.z >= 0.0));
  assert!(lower.iter().all(|p| p.z <= 0.0));
  assert_eq!(upper.len(), 41);
  assert_eq!(lower.len(), 39);
  assert!(upper.windows(2).all(|w| w[0].x <= w[1].x));
  assert!(lower.windows(2).all(|w| w[0].x <= w[1].x));
}

#[test]
fn test_reassigns_trailing_points() {
  // the blunt trailing edge starts on the upper side but continues the
  // lower surface
  let x = [0.0, 0.5, 0.9, 1.0, 0.5, 0.8];
  let z = [0.0, 0.1, 0.0, 0.0, -0.1, -0.02];
  let (upper, lower) = split_surfaces(&x, &z).unwrap();
  assert_eq!(upper, vec![Point { x: 0.0, z: 0.0 }, Point { x: 0.5, z: 0.1 }]);
  assert_eq!(lower.len(), 4);
  assert_eq!(lower[2], Point { x: 0.9, z: 0.0 });
  assert_eq!(lower.last(), Some(&Point { x: 1.0, z: 0.0 }));
}

#[test]
fn test_degenerate_inputs() {
  let (upper, lower) = split_surfaces(&[], &[]).unwrap();
  assert!(upper.is_empty() && lower.is_empty());
  let (upper, lower) = split_surfaces(&[0.0, 1.0], &[0.0, 0.1]).unwrap();
  assert_eq!(upper.len(), 2);
  assert!(lower.is_empty());
  assert!(split_surfaces(&[0.0, 1.0], &[0.0]).is_err());
}
