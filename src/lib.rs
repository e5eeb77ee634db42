// SPDX-License-Identifier: MIT OR Apache-2.0
//! Small streaming readers and writers for the [ATF] test-program protocols
//!
//! A test harness and the test programs it runs talk to each other through a
//! handful of tiny line-oriented text formats:
//! - `application/X-atf-tp`: a test program lists its test cases and their
//!   properties, read by [`stream::Parser`] and normalized into
//!   [`TestProgramMetadata`]
//! - the result file: a finished test case reports its [`Outcome`],
//!   read by [`parse_result_file`]
//! - `application/X-atf-tps`: the harness reports the progress of a whole run,
//!   written by [`Writer`]
//!
//! None of these readers know anything about processes or schedulers,
//! they only see a byte stream (or already-read text) and produce records,
//! or consume calls and produce bytes.
//!
//! ```
//! let input = "Content-Type: application/X-atf-tp; version=\"1\"\n\nident: first\n";
//! let metadata = atflite::get_normalized_metadata(input.as_bytes()).unwrap();
//! assert_eq!(metadata["first"].timeout(), Some(300));
//! ```
//!
//! [ATF]: https://github.com/jmmv/atf

use std::fmt;

mod line;
pub mod metadata;
pub mod result;
pub mod schema;
pub mod stream;
pub mod tps;


pub use metadata::{MetadataError, TestCaseRecord, TestProgramMetadata, get_normalized_metadata};
pub use result::{Outcome, ResultError, parse_result_file, read_result_file};
pub use stream::{ParseError, parse_metadata};
pub use tps::Writer;

/// `Content-Type` signature of the metadata format
pub const TP_CONTENT_TYPE: ContentType = ContentType {
	mime: "application/X-atf-tp",
	version: 1,
};

/// `Content-Type` signature of the status format
pub const TPS_CONTENT_TYPE: ContentType = ContentType {
	mime: "application/X-atf-tps",
	version: 2,
};

/// The header line that opens every protocol stream,
/// displays as `Content-Type: <mime>; version="<version>"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentType {
	/// MIME type of the stream
	pub mime: &'static str,
	/// Format revision
	pub version: u32,
}

impl ContentType {
	/// Whether a header line (without its line ending) is exactly this signature
	pub fn matches(&self, line: &str) -> bool { line == self.to_string() }
}

impl fmt::Display for ContentType {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "Content-Type: {}; version=\"{}\"", self.mime, self.version)
	}
}
