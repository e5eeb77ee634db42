// SPDX-License-Identifier: MIT OR Apache-2.0
//! Test case result files
//!
//! A finished test case leaves behind a file whose first line is one of
//! `passed`, `failed: <reason>` or `skipped: <reason>`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

/// Stands in for each line break of a reason that spans several lines
pub const NEWLINE_MARKER: &str = "<<NEWLINE UNEXPECTED>>";

/// How a test case ended
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// The test case passed
	Passed,
	/// The test case failed, with the reason it gave
	Failed(String),
	/// The test case did not run, with the reason it gave
	Skipped(String),
}

impl Outcome {
	/// Name of the outcome as used on the wire
	pub fn state(&self) -> &'static str {
		match self {
			Self::Passed => "passed",
			Self::Failed(_) => "failed",
			Self::Skipped(_) => "skipped",
		}
	}
	/// The reason given by a failed or skipped test case
	pub fn reason(&self) -> Option<&str> {
		match self {
			Self::Passed => None,
			Self::Failed(reason) | Self::Skipped(reason) => Some(reason),
		}
	}
}

/// Writes the outcome in result file form
impl fmt::Display for Outcome {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self.reason() {
			Some(reason) => write!(f, "{}: {reason}", self.state()),
			None => f.write_str(self.state()),
		}
	}
}

/// Whoops! That isn't a result file
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResultError {
	/// The file could not be read
	#[error("Failed to open {}", .path.display())]
	Open {
		/// The file that was asked for
		path: PathBuf,
		/// What went wrong reading it
		#[source]
		source: std::io::Error,
	},
	/// The file has no content at all
	#[error("Results file is empty")]
	Empty,
	/// The first line is none of the three result shapes
	#[error("Invalid results file format")]
	InvalidFormat,
}

impl FromStr for Outcome {
	type Err = ResultError;
	fn from_str(text: &str) -> Result<Self, Self::Err> {
		let mut lines = text.lines();
		let mut line = lines.next().ok_or(ResultError::Empty)?.to_owned();
		for extra in lines {
			line.push_str(NEWLINE_MARKER);
			line.push_str(extra);
		}
		match line.split_once(": ") {
			None if line == "passed" => Ok(Self::Passed),
			Some((_, "")) | None => Err(ResultError::InvalidFormat),
			Some(("failed", reason)) => Ok(Self::Failed(reason.to_owned())),
			Some(("skipped", reason)) => Ok(Self::Skipped(reason.to_owned())),
			Some(_) => Err(ResultError::InvalidFormat),
		}
	}
}

/// Parse the already-read content of a result file
pub fn parse_result_file(text: &str) -> Result<Outcome, ResultError> { text.parse() }

/// Read and parse a result file
pub fn read_result_file(path: impl AsRef<Path>) -> Result<Outcome, ResultError> {
	let path = path.as_ref();
	let text = fs::read_to_string(path).map_err(|source| ResultError::Open {
		path: path.to_owned(),
		source,
	})?;
	parse_result_file(&text)
}
