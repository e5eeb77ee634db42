// SPDX-License-Identifier: MIT OR Apache-2.0
//! Line classification
//!
//! The metadata format has no syntax spanning lines, so the only lexing
//! needed is deciding what each physical line is.

use std::io::{self, BufRead};

/// A classified physical line
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Line {
	/// The first line of the stream, verbatim
	Header(String),
	/// Empty or whitespace-only
	Blank,
	/// `name: value`, both trimmed, value may be empty
	Property { name: String, value: String },
	/// Non-blank line with no `:` at all
	Text(String),
	/// Nothing left
	EndOfInput,
}

/// Pulls lines out of a reader, tracking the 1-based number
/// of the line most recently returned
pub(crate) struct Lines<R> {
	reader: R,
	buffer: String,
	lineno: usize,
	eof: bool,
}

impl<R: BufRead> Lines<R> {
	pub(crate) fn new(reader: R) -> Self {
		Self {
			reader,
			buffer: String::new(),
			lineno: 0,
			eof: false,
		}
	}
	/// Line number of the last classified line,
	/// [`Line::EndOfInput`] sits on the line after the last one read
	pub(crate) fn lineno(&self) -> usize { self.lineno }
	fn raw(&mut self) -> io::Result<Option<&str>> {
		if self.eof {
			return Ok(None);
		}
		self.buffer.clear();
		self.lineno += 1;
		if self.reader.read_line(&mut self.buffer)? == 0 {
			self.eof = true;
			return Ok(None);
		}
		let line = self.buffer.strip_suffix('\n').unwrap_or(&self.buffer);
		Ok(Some(line.strip_suffix('\r').unwrap_or(line)))
	}
	/// Read the first line as a header
	pub(crate) fn next_header(&mut self) -> io::Result<Line> {
		Ok(match self.raw()? {
			None => Line::EndOfInput,
			Some(text) if text.trim().is_empty() => Line::Blank,
			Some(text) => Line::Header(text.to_owned()),
		})
	}
	pub(crate) fn next_line(&mut self) -> io::Result<Line> {
		Ok(match self.raw()? {
			None => Line::EndOfInput,
			Some(text) => classify(text),
		})
	}
}

fn classify(text: &str) -> Line {
	if text.trim().is_empty() {
		return Line::Blank;
	}
	match text.split_once(':') {
		Some((name, value)) => Line::Property {
			name: name.trim().to_owned(),
			value: value.trim().to_owned(),
		},
		None => Line::Text(text.trim().to_owned()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn classify_shapes() {
		assert_eq!(classify(" \t"), Line::Blank);
		assert_eq!(classify("ident:   x  \t"), Line::Property {
			name: "ident".into(),
			value: "x".into(),
		});
		assert_eq!(classify("descr: a: b"), Line::Property {
			name: "descr".into(),
			value: "a: b".into(),
		});
		assert_eq!(classify("X-foo:"), Line::Property {
			name: "X-foo".into(),
			value: String::new(),
		});
		assert_eq!(classify("no colon here"), Line::Text("no colon here".into()));
	}

	#[test]
	fn line_numbers() {
		let mut lines = Lines::new("head\r\n\nkey: value".as_bytes());
		assert_eq!(lines.next_header().unwrap(), Line::Header("head".into()));
		assert_eq!(lines.lineno(), 1);
		assert_eq!(lines.next_line().unwrap(), Line::Blank);
		assert_eq!(lines.next_line().unwrap(), Line::Property {
			name: "key".into(),
			value: "value".into(),
		});
		assert_eq!(lines.lineno(), 3);
		assert_eq!(lines.next_line().unwrap(), Line::EndOfInput);
		assert_eq!(lines.lineno(), 4);
		// stays put once exhausted
		assert_eq!(lines.next_line().unwrap(), Line::EndOfInput);
		assert_eq!(lines.lineno(), 4);
	}
}
