//! Trace Record Parsing.
//!
//! A trace is a text file with one access per line: an access kind (`r` or
//! `w`), whitespace, and a hexadecimal byte address, optionally `0x`-prefixed:
//!
//! ```text
//! r 7b032ac4
//! w 0x7b0329f0
//! ```
//!
//! Blank lines are skipped. Any other deviation is fatal for the run and is
//! reported with its 1-based line number.

use std::io::BufRead;

use crate::common::{AccessKind, TraceError};

/// One parsed trace line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Read or write.
    pub kind: AccessKind,
    /// Byte address.
    pub address: u32,
}

/// Parses a single trace line.
///
/// # Arguments
///
/// * `line_no` - 1-based line number, used in errors.
/// * `line` - Raw line contents.
///
/// # Returns
///
/// `Ok(None)` for a blank line, `Ok(Some(record))` for a valid access.
///
/// # Errors
///
/// [`TraceError::Malformed`], [`TraceError::UnknownKind`] or [`TraceError::BadAddress`].
pub fn parse_record(line_no: usize, line: &str) -> Result<Option<TraceRecord>, TraceError> {
    let text = line.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let mut fields = text.split_whitespace();
    let (Some(kind), Some(addr), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(TraceError::Malformed {
            line: line_no,
            text: text.to_string(),
        });
    };

    let mut chars = kind.chars();
    let kind = match (chars.next(), chars.next()) {
        (Some(c), None) => AccessKind::from_mnemonic(c).ok_or_else(|| TraceError::UnknownKind {
            line: line_no,
            kind: kind.to_string(),
        })?,
        _ => {
            return Err(TraceError::Malformed {
                line: line_no,
                text: text.to_string(),
            });
        }
    };

    let digits = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr);
    let address = u32::from_str_radix(digits, 16).map_err(|_| TraceError::BadAddress {
        line: line_no,
        text: addr.to_string(),
    })?;

    Ok(Some(TraceRecord { kind, address }))
}

/// Iterator over the records of a buffered trace source.
///
/// Yields `Err` once for the first unreadable or malformed line; callers are
/// expected to stop there.
#[derive(Debug)]
pub struct TraceReader<R> {
    reader: R,
    line_no: usize,
    buf: String,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered reader.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: String::new(),
        }
    }

    /// Number of lines consumed so far.
    pub const fn line_number(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_no += 1;
                    match parse_record(self.line_no, &self.buf) {
                        Ok(Some(record)) => return Some(Ok(record)),
                        Ok(None) => {}
                        Err(e) => return Some(Err(e)),
                    }
                }
                Err(e) => return Some(Err(TraceError::Io(e))),
            }
        }
    }
}
