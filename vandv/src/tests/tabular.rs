use std::io::Cursor;

use crate::prelude::*;
use crate::tests::*;

/// Two zones of whitespace-delimited data, with title and comments.
const MULTI_ZONE: &str = "\
# skin friction comparison
TITLE = \"Flat plate\"
VARIABLES = \"x\", \"cf\"
ZONE T=\"SA\"
0.1 0.004
0.2 0.0035
ZONE T=\"SST\"
0.1 0.0041
0.2 0.0036 # last good point
0.3 0.0033
";

fn tecplot(s: &str) -> ParseResult<TabularDataset> {
  return OnePassParser::parse_bufread(Cursor::new(s), &Dialect::default());
}

fn csv(s: &str) -> ParseResult<TabularDataset> {
  return DelimitedParser::parse_bufread(Cursor::new(s), &Dialect::default());
}

#[test]
fn test_multi_zone() {
  let data = tecplot(MULTI_ZONE).unwrap();
  assert_eq!(data.zone_names().collect::<Vec<_>>(), vec!["SA", "SST"]);
  let sa = data.zone("SA").unwrap();
  assert_eq!(sa.variables, vec!["x", "cf"]);
  assert_eq!(sa.series("cf").unwrap(), vec![0.004, 0.0035]);
  let sst = data.zone("SST").unwrap();
  assert_eq!(sst.nrows(), 3);
  assert_eq!(sst.series("x").unwrap(), vec![0.1, 0.2, 0.3]);
  for zone in data.zones.iter() {
    let lens: Vec<usize> = zone.iter_series().map(|(_, s)| s.len()).collect();
    assert!(lens.iter().all(|l| *l == zone.nrows()));
  }
}

#[test]
fn test_continued_variables() {
  let s = "\
TITLE = \"history\"
VARIABLES = \\
\"Iteration\",\"CL\",\"CD\"
1, 0.10, 0.010
2, 0.20, 0.020
";
  let data = tecplot(s).unwrap();
  let zone = data.zone(DEFAULT_ZONE).unwrap();
  assert_eq!(zone.variables, vec!["Iteration", "CL", "CD"]);
  assert_eq!(zone.series("CD").unwrap(), vec![0.01, 0.02]);
}

#[test]
fn test_synthesized_names() {
  let s = "# only data\n1 2 3\n4 5 6\n";
  let data = tecplot(s).unwrap();
  let zone = data.first_zone().unwrap();
  assert_eq!(zone.name, DEFAULT_ZONE);
  assert_eq!(zone.variables, vec!["var0", "var1", "var2"]);
  assert_eq!(zone.series("var2").unwrap(), vec![3.0, 6.0]);
  // synthesized names stick for later zones
  let s = "1 2\nZONE T=\"second\"\n3 4\n";
  let data = tecplot(s).unwrap();
  assert_eq!(data.zone("second").unwrap().variables, vec!["var0", "var1"]);
}

#[test]
fn test_zone_name_after_last_equals() {
  let mut parser = OnePassParser::default();
  assert_eq!(parser.state(), ParserState::Start);
  parser.consume("VARIABLES = \"a\"").unwrap();
  assert_eq!(parser.state(), ParserState::HaveVariables);
  let resp = parser.consume("ZONE T = \"wing\"").unwrap();
  assert_eq!(resp, LineResponse::Zone("wing".to_string()));
  assert_eq!(parser.state(), ParserState::InZone);
  let resp = parser.consume("AUXDATA Common.Solver=\"SU2\"").unwrap();
  assert_eq!(resp, LineResponse::Decorative);
  assert_eq!(parser.consume("   ").unwrap(), LineResponse::Comment);
  assert_eq!(parser.consume("1.5").unwrap(), LineResponse::Data);
  let data = parser.finish();
  assert_eq!(data.series("wing", "a").unwrap(), vec![1.5]);
}

#[test]
fn test_empty_zone_keeps_variables() {
  let s = "VARIABLES = x, y\nZONE T=\"empty\"\nZONE T=\"full\"\n1 2\n";
  let data = tecplot(s).unwrap();
  let empty = data.zone("empty").unwrap();
  assert_eq!(empty.variables, vec!["x", "y"]);
  assert_eq!(empty.nrows(), 0);
  assert_eq!(data.zone("full").unwrap().nrows(), 1);
}

#[test]
fn test_malformed_row() {
  let s = "VARIABLES = \"x\", \"y\"\n1 2\n3 4\n5 6 7\n";
  let err = tecplot(s).unwrap_err();
  assert_eq!(err.line, Some(4));
  assert!(matches!(
    err.kind,
    ErrorKind::MalformedRow { expected: 2, found: 3 }
  ));
  let err = tecplot("VARIABLES = x\n1\nabc\n").unwrap_err();
  assert!(matches!(err.kind, ErrorKind::BadNumber(_)));
}

#[test]
fn test_csv() {
  let s = "\
# SU2 history
\"Inner_Iter\"   ,\"rms[Rho]\" , \"CD\"
0, -1.5, 0.05
1, -2.5, 0.04
2, -3.5, 0.03
";
  let data = csv(s).unwrap();
  let zone = data.first_zone().unwrap();
  assert_eq!(zone.variables, vec!["Inner_Iter", "rms[Rho]", "CD"]);
  assert_eq!(zone.series("rms[Rho]").unwrap(), vec![-1.5, -2.5, -3.5]);
  let err = csv("a,b\n1,2\n3\n").unwrap_err();
  assert!(matches!(err.kind, ErrorKind::MalformedRow { expected: 2, found: 1 }));
  assert_eq!(err.line, Some(3));
  let err = csv("").unwrap_err();
  assert!(matches!(err.kind, ErrorKind::MissingHeader));
}

#[test]
fn test_csv_comment_rows() {
  let data = csv("a,b\n1,2\n# restart\n3,4\n").unwrap();
  let zone = data.first_zone().unwrap();
  assert_eq!(zone.series("a").unwrap(), vec![1.0, 3.0]);
  assert_eq!(zone.series("b").unwrap(), vec![2.0, 4.0]);
  // the marker follows the dialect
  let dialect = Dialect { tabular_comment: '!', ..Dialect::default() };
  let src = Cursor::new("a,b\n1,2\n! restart\n3,4\n");
  let data = DelimitedParser::parse_bufread(src, &dialect).unwrap();
  assert_eq!(data.first_zone().unwrap().nrows(), 2);
  let err = csv("a,b\n1,2\n! restart\n").unwrap_err();
  assert!(matches!(err.kind, ErrorKind::BadNumber(_)));
}

#[test]
fn test_empty_variable_declarations() {
  let mut parser = OnePassParser::default();
  // no `=`: nothing is declared
  assert_eq!(
    parser.consume("Variables follow on the next zone").unwrap(),
    LineResponse::Decorative
  );
  assert_eq!(parser.state(), ParserState::Start);
  assert!(parser.variables().is_empty());
  let err = tecplot("VARIABLES =\n1 2\n").unwrap_err();
  assert!(matches!(err.kind, ErrorKind::MissingHeader));
  assert_eq!(err.line, Some(1));
  let err = tecplot("VARIABLES = x, , y\n1 2 3\n").unwrap_err();
  assert!(matches!(err.kind, ErrorKind::MissingHeader));
  let err = tecplot("VARIABLES = \\\n\n1 2\n").unwrap_err();
  assert!(matches!(err.kind, ErrorKind::MissingHeader));
  assert_eq!(err.line, Some(2));
}

#[test]
fn test_csv_round_trip() {
  let data = tecplot(MULTI_ZONE).unwrap();
  let zone = data.zone("SST").unwrap();
  let mut wtr = ::csv::Writer::from_writer(Vec::new());
  zone.write_csv(&mut wtr).unwrap();
  let bytes = wtr.into_inner().unwrap();
  let back = csv(&String::from_utf8(bytes).unwrap()).unwrap();
  let again = back.first_zone().unwrap();
  assert_eq!(again.variables, zone.variables);
  for (var, series) in zone.iter_series() {
    let other = again.series(var).unwrap();
    assert_eq!(other.len(), series.len());
    for (a, b) in series.iter().zip(other.iter()) {
      assert_near(*a, *b, 1e-12);
    }
  }
}

#[test]
fn test_dispatch() {
  let err = TabularFormat::from_path("results.vtu").unwrap_err();
  assert!(err.is_recoverable());
  assert!(matches!(err.kind, ErrorKind::UnsupportedFormat(_)));
  let f = temp_file(".dat", MULTI_ZONE);
  let data = parse_file(f.path()).unwrap();
  assert_eq!(data.zones.len(), 2);
  let f = temp_file(".csv", "a,b\n1,2\n");
  let data = parse_file(f.path()).unwrap();
  assert_eq!(data.series(DEFAULT_ZONE, "b").unwrap(), vec![2.0]);
  let f = temp_file(".dat", "VARIABLES = x\n1 2\n");
  let err = parse_file(f.path()).unwrap_err();
  assert!(err.file.is_some());
  assert!(!err.is_recoverable());
}
