use std::io::Cursor;

use crate::util::*;

#[test]
fn test_split_fields() {
  assert_eq!(split_fields("1.0  2.0\t3"), vec!["1.0", "2.0", "3"]);
  assert_eq!(split_fields(" 1.0, 2.0 ,3 "), vec!["1.0", "2.0", "3"]);
  assert_eq!(unquote("  \"rms[Rho]\" "), "rms[Rho]");
  assert_eq!(split_names("\"a\", b ,\"c d\""), vec!["a", "b", "c d"]);
  assert!(parse_f64("1.5e-3").is_ok());
  assert!(parse_f64("1.5d-3").is_err());
}

#[test]
fn test_read_last_line() {
  let last = |s: &str| read_last_line(&mut Cursor::new(s.as_bytes())).unwrap();
  assert_eq!(last("a\nb\nc\n"), "c");
  assert_eq!(last("a\nb\nc"), "c");
  assert_eq!(last("only"), "only");
  assert_eq!(last("only\n"), "only");
  assert_eq!(last(""), "");
  // longer than one backwards step, with the break straddling chunks
  let long_line = "7".repeat(1000);
  let text = format!("{}\n{}\r\n", "1".repeat(300), long_line);
  assert_eq!(last(&text), long_line);
  let text = format!("{}\n{}", "1".repeat(10), "2".repeat(255));
  assert_eq!(last(&text), "2".repeat(255));
}

#[test]
fn test_read_last_line_skipping() {
  let last = |s: &str| {
    read_last_line_skipping(&mut Cursor::new(s.as_bytes()), |l| {
      l.trim().is_empty() || l.starts_with('#')
    }).unwrap()
  };
  assert_eq!(last("a\nb\n  \n# end\n"), "b");
  assert_eq!(last("a\r\n# x\r\n\t\r\n"), "a");
  assert_eq!(last("# only comments\n\n"), "");
  // skipped lines spanning several backwards steps
  let text = format!("1 2\n{}", "#\n".repeat(500));
  assert_eq!(last(&text), "1 2");
}
