//! This module implements utility functions without much need for defining
//! context or not enough of it to warrant them having their own modules.

use std::io::{self, Read, Seek, SeekFrom};

use crate::error::*;

/// How many bytes to step back at a time when looking for the last line.
const TAIL_CHUNK: u64 = 256;

/// Strips surrounding whitespace and double quotes from a name.
pub fn unquote(s: &str) -> &str {
  return s.trim().trim_matches('"').trim();
}

/// Splits a declaration list (variable names, CSV header) on commas and
/// unquotes every name.
pub fn split_names(s: &str) -> Vec<String> {
  return s.split(',')
    .map(unquote)
    .map(String::from)
    .collect();
}

/// Splits a data row into fields: on commas if there's one in the line,
/// otherwise on whitespace.
pub fn split_fields(line: &str) -> Vec<&str> {
  if line.contains(',') {
    return line.split(',').map(str::trim).collect();
  }
  return line.split_whitespace().collect();
}

/// Parses a single float, tolerating surrounding whitespace.
pub fn parse_f64(field: &str) -> ParseResult<f64> {
  return field.trim()
    .parse::<f64>()
    .map_err(|_| ParseError::bad_number(field.trim()));
}

/// Parses every field of a row as floats.
pub fn parse_row(fields: &[&str]) -> ParseResult<Vec<f64>> {
  return fields.iter().map(|f| parse_f64(f)).collect();
}

/// Returns the text after the first `=`, if any.
pub(crate) fn rhs(line: &str) -> Option<&str> {
  return line.split_once('=').map(|(_, r)| r);
}

/// Returns the trimmed text before the first `=`, if there is an `=` at all.
pub(crate) fn lhs(line: &str) -> Option<&str> {
  return line.split_once('=').map(|(l, _)| l.trim());
}

/// Returns the last line of a seekable source without reading all of it.
/// Trailing line terminators are ignored, so a file ending in a newline
/// still yields its last line of text.
pub fn read_last_line<R: Read + Seek>(src: &mut R) -> io::Result<String> {
  return read_last_line_skipping(src, str::is_empty);
}

/// Like [`read_last_line`], but also steps back past trailing lines for
/// which `skip` is true. Lines are passed without their terminator. Returns
/// an empty string if every line is skipped.
pub fn read_last_line_skipping<R, F>(src: &mut R, skip: F) -> io::Result<String>
where
  R: Read + Seek,
  F: Fn(&str) -> bool
{
  let mut pos = src.seek(SeekFrom::End(0))?;
  // tail[..end - pos] is what's left to look at
  let mut end = pos;
  let mut tail: Vec<u8> = Vec::new();
  loop {
    let step = TAIL_CHUNK.min(pos);
    if step > 0 {
      pos -= step;
      src.seek(SeekFrom::Start(pos))?;
      let mut chunk = vec![0u8; step as usize];
      src.read_exact(&mut chunk)?;
      chunk.extend_from_slice(&tail);
      tail = chunk;
    }
    // complete lines, from the back
    loop {
      let body = &tail[..(end - pos) as usize];
      let Some(nl) = body.iter().rposition(|&b| b == b'\n') else {
        break;
      };
      let text = String::from_utf8_lossy(&body[nl+1..]);
      let line = text.trim_end_matches('\r');
      if !skip(line) {
        return Ok(line.to_string());
      }
      end = pos + nl as u64;
    }
    if step == 0 {
      // start of the source: what's left is the first line
      let text = String::from_utf8_lossy(&tail[..(end - pos) as usize]);
      let line = text.trim_end_matches('\r');
      if skip(line) {
        return Ok(String::new());
      }
      return Ok(line.to_string());
    }
  }
}
