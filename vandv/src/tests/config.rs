use std::io::Cursor;

use crate::prelude::*;
use crate::tests::*;

/// An excerpt of a shape optimisation configuration.
const CONFIG: &str = "\
% Optimisation constraints
% OPT_CONSTRAINT= ( LIFT > 1.0 ) * 1.0
OPT_CONSTRAINT= ( LIFT > 0.328188 ) * 0.001; ( MOMENT_Z > 0.0 ) * 0.001; \
(AIRFOIL_THICKNESS = 0.12)*0.01
OPT_OBJECTIVE= DRAG * 0.001
GEO_DESCRIPTION= AIRFOIL_THICKNESS; AIRFOIL_AREA; AIRFOIL_THICKNESS
GEO_MARKER= ( airfoil )
GEO_LOCATION_STATIONS= (0.0, 0.5); (0.0, 1.0, 0.25); (0.0, 0.75)
";

fn constraints(s: &str) -> ParseResult<ConstraintSpec> {
  return read_constraints(Cursor::new(s), &Dialect::default());
}

fn probes(s: &str) -> ParseResult<GeoProbeSpec> {
  return read_geo_probes(Cursor::new(s), &Dialect::default());
}

#[test]
fn test_constraints() {
  let parsed = constraints(CONFIG).unwrap();
  assert_eq!(parsed.len(), 3);
  let lift = parsed["LIFT"];
  assert_eq!(lift.sign, Comparison::Greater);
  assert_near(lift.value, 0.328188, 1e-15);
  assert_near(lift.scale, 0.001, 1e-15);
  assert_eq!(parsed["MOMENT_Z"].sign, Comparison::Greater);
  let t = parsed["AIRFOIL_THICKNESS"];
  assert_eq!(t.sign, Comparison::Equal);
  assert_eq!(t.sign.to_string(), "=");
  assert_near(t.scale, 0.01, 1e-15);
  // no scale means unit scale
  let parsed = constraints("OPT_CONSTRAINT= (CD < 0.02)\n").unwrap();
  assert_eq!(parsed["CD"].scale, 1.0);
  assert_eq!(parsed["CD"].sign, Comparison::Less);
}

#[test]
fn test_constraints_missing_or_none() {
  assert!(constraints("OPT_OBJECTIVE= DRAG\n").unwrap().is_empty());
  assert!(constraints("OPT_CONSTRAINT= NONE\n").unwrap().is_empty());
  assert!(constraints("% OPT_CONSTRAINT= (A > 1)*1\n").unwrap().is_empty());
}

#[test]
fn test_bad_constraints() {
  for bad in [
    "OPT_CONSTRAINT= (LIFT 0.3) * 1\n",
    "OPT_CONSTRAINT= (LIFT >= 0.3) * 1\n",
    "OPT_CONSTRAINT= (> 0.3) * 1\n",
  ] {
    let err = constraints(bad).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InconsistentConfig(_)), "{}", bad);
    assert_eq!(err.line, Some(1));
  }
  let err = constraints("OPT_CONSTRAINT= (LIFT > big) * 1\n").unwrap_err();
  assert!(matches!(err.kind, ErrorKind::BadNumber(_)));
}

#[test]
fn test_geo_probes() {
  let parsed = probes(CONFIG).unwrap();
  assert_eq!(parsed.len(), 2);
  assert_eq!(parsed["AIRFOIL_THICKNESS"], vec![vec![0.0, 0.5], vec![0.0, 0.75]]);
  assert_eq!(parsed["AIRFOIL_AREA"], vec![vec![0.0, 1.0, 0.25]]);
}

#[test]
fn test_bad_geo_probes() {
  let err = probes("GEO_DESCRIPTION= A; B\nGEO_LOCATION_STATIONS= (0.5)\n")
    .unwrap_err();
  assert!(matches!(err.kind, ErrorKind::InconsistentConfig(_)));
  let err = probes("GEO_DESCRIPTION= A\n").unwrap_err();
  assert!(matches!(err.kind, ErrorKind::InconsistentConfig(_)));
  let err = probes("GEO_DESCRIPTION= A\n% GEO_LOCATION_STATIONS= (0.5)\n")
    .unwrap_err();
  assert!(matches!(err.kind, ErrorKind::InconsistentConfig(_)));
}
