// SPDX-License-Identifier: MIT OR Apache-2.0
//! The `application/X-atf-tp` reader
//!
//! This is a streaming parser: test cases are handed out one at a time as
//! their blocks close, so a harness can start looking at a test program's
//! metadata before the program has finished printing it.
//!
//! The format is:
//! ```text
//! Content-Type: application/X-atf-tp; version="1"
//!
//! ident: first
//! descr: The first test case
//!
//! ident: second
//! timeout: 10
//! ```

use std::io::{self, BufRead};

use thiserror::Error;

use crate::TP_CONTENT_TYPE;
use crate::line::{Line, Lines};
use crate::metadata::TestCaseRecord;
use crate::schema;

/// A grammar or schema violation, located at a 1-based source line
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("{line}: {message}")]
pub struct ParseError {
	/// Line the violation was found on
	pub line: usize,
	/// Human-readable description
	pub message: String,
}

impl ParseError {
	fn new(line: usize, message: impl Into<String>) -> Self {
		Self {
			line,
			message: message.into(),
		}
	}
	fn unexpected(line: usize, token: &str, expected: &str) -> Self {
		Self::new(line, format!("Unexpected token `{token}'; expected {expected}"))
	}
}

/// A reading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
	/// The stream is malformed
	#[error(transparent)]
	Parse(#[from] ParseError),
	/// The stream itself failed
	#[error("Failed to read test program metadata: {0}")]
	Io(#[from] io::Error),
}

type PResult<T> = Result<T, Error>;

/// a parsing event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
	/// A complete test case block
	TestCase {
		/// The block's `ident` value
		ident: String,
		/// Properties in declaration order, without defaults
		record: TestCaseRecord,
	},
	/// End of the stream, emitted exactly once after the last test case
	Eof,
}

enum ParserState {
	/// header and its blank line not read yet
	BeginDocument,
	/// next line starts a test case
	NextCase,
	/// input ran out, the end event is still owed
	Finished,
	/// end event sent or an error hit, nothing more comes out
	Done,
}

/// A streaming parser, is an [`Iterator`] of [`Event`]
///
/// Stops for good after the first error.
pub struct Parser<R> {
	lines: Lines<R>,
	state: ParserState,
}

impl<R: BufRead> Parser<R> {
	/// Create a new parser over a byte stream
	pub fn new(reader: R) -> Self {
		Self {
			lines: Lines::new(reader),
			state: ParserState::BeginDocument,
		}
	}
	fn header(&mut self) -> PResult<()> {
		match self.lines.next_header()? {
			Line::Header(text) if TP_CONTENT_TYPE.matches(&text) => {}
			Line::Header(text) => {
				return Err(ParseError::new(
					self.lines.lineno(),
					format!("Invalid header '{text}'; expected '{TP_CONTENT_TYPE}'"),
				)
				.into());
			}
			Line::EndOfInput => {
				return Err(ParseError::unexpected(self.lines.lineno(), "<<EOF>>", "header").into());
			}
			_ => {
				return Err(ParseError::unexpected(self.lines.lineno(), "<<NEWLINE>>", "header").into());
			}
		}
		match self.lines.next_line()? {
			Line::Blank => Ok(()),
			Line::EndOfInput => Err(ParseError::unexpected(self.lines.lineno(), "<<EOF>>", "new line").into()),
			Line::Property { name, .. } if name.is_empty() => {
				Err(ParseError::unexpected(self.lines.lineno(), ":", "new line").into())
			}
			Line::Property { name: token, .. } | Line::Text(token) | Line::Header(token) => {
				Err(ParseError::unexpected(self.lines.lineno(), &token, "new line").into())
			}
		}
	}
	/// Unpack a line that has to be a property
	fn property(&self, line: Line) -> PResult<(String, String)> {
		let lineno = self.lines.lineno();
		match line {
			Line::Property { name, .. } if name.is_empty() => {
				Err(ParseError::unexpected(lineno, ":", "property name").into())
			}
			Line::Property { name, value } => Ok((name, value)),
			Line::Text(_) => Err(ParseError::unexpected(lineno, "<<NEWLINE>>", "`:'").into()),
			Line::Blank | Line::Header(_) => {
				Err(ParseError::unexpected(lineno, "<<NEWLINE>>", "property name").into())
			}
			Line::EndOfInput => Err(ParseError::unexpected(lineno, "<<EOF>>", "property name").into()),
		}
	}
	/// Validate one property and add it to the block,
	/// repeated names keep the first value
	fn insert(&self, record: &mut TestCaseRecord, name: String, value: String) -> PResult<()> {
		schema::validate(&name, &value).map_err(|message| ParseError::new(self.lines.lineno(), message))?;
		if !record.insert(name.clone(), value) {
			tracing::debug!(line = self.lines.lineno(), property = %name, "ignoring repeated property");
		}
		Ok(())
	}
	/// One block, up to and including its terminating blank line or eof
	fn test_case(&mut self) -> PResult<Event> {
		let first = self.lines.next_line()?;
		let (name, value) = self.property(first)?;
		if name != "ident" {
			return Err(ParseError::new(self.lines.lineno(), "First property of a test case must be 'ident'").into());
		}
		let mut record = TestCaseRecord::new();
		self.insert(&mut record, name, value)?;
		loop {
			match self.lines.next_line()? {
				Line::Blank => break,
				Line::EndOfInput => {
					self.state = ParserState::Finished;
					break;
				}
				line => {
					let (name, value) = self.property(line)?;
					self.insert(&mut record, name, value)?;
				}
			}
		}
		let ident = record.ident().to_owned();
		tracing::trace!(line = self.lines.lineno(), %ident, "read test case");
		Ok(Event::TestCase { ident, record })
	}
	fn next_event(&mut self) -> PResult<Option<Event>> {
		match self.state {
			ParserState::BeginDocument => {
				self.header()?;
				self.state = ParserState::NextCase;
				self.test_case().map(Some)
			}
			ParserState::NextCase => self.test_case().map(Some),
			ParserState::Finished => {
				self.state = ParserState::Done;
				Ok(Some(Event::Eof))
			}
			ParserState::Done => Ok(None),
		}
	}
}

impl<R: BufRead> Iterator for Parser<R> {
	type Item = PResult<Event>;
	fn next(&mut self) -> Option<Self::Item> {
		let event = self.next_event();
		if event.is_err() {
			self.state = ParserState::Done;
		}
		event.transpose()
	}
}

/// Read every test case of a metadata stream, in declaration order
///
/// All-or-nothing: the first error discards everything read so far.
pub fn parse_metadata(reader: impl BufRead) -> Result<Vec<(String, TestCaseRecord)>, Error> {
	let mut cases = Vec::new();
	for event in Parser::new(reader) {
		match event? {
			Event::TestCase { ident, record } => cases.push((ident, record)),
			Event::Eof => break,
		}
	}
	Ok(cases)
}
