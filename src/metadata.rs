// SPDX-License-Identifier: MIT OR Apache-2.0
//! Test case records and whole-program metadata, start at [`TestProgramMetadata`]

use std::fmt;
use std::io::BufRead;
use std::ops::Index;

use thiserror::Error;

use crate::schema;
use crate::stream::{self, Event, Parser};

/// The properties of one test case, in declaration order
///
/// Keys are unique: inserting a key that is already present does nothing.
#[derive(Default, Clone, PartialEq, Eq, Hash)]
pub struct TestCaseRecord {
	properties: Vec<(String, String)>,
}

impl TestCaseRecord {
	/// Create a record with no properties
	pub fn new() -> Self { Self::default() }
	/// Insert a property unless one with the same name exists,
	/// returns whether it was inserted
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
		let name = name.into();
		if self.get(&name).is_some() {
			return false;
		}
		self.properties.push((name, value.into()));
		true
	}
	/// Get a property's value
	pub fn get(&self, name: &str) -> Option<&str> {
		self.properties
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}
	/// Iterator over every `(name, value)` pair in insertion order
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.properties.iter().map(|(name, value)| (name.as_str(), value.as_str()))
	}
	/// Number of properties
	pub fn len(&self) -> usize { self.properties.len() }
	/// Whether no property is set
	pub fn is_empty(&self) -> bool { self.properties.is_empty() }
	/// Fill in the schema default of every known property that isn't set
	///
	/// Applying defaults more than once changes nothing.
	pub fn apply_defaults(&mut self) {
		for (name, value) in schema::defaults() {
			self.insert(name, value);
		}
	}
	/// The test case identifier, empty on a record that was built by hand
	/// without one
	pub fn ident(&self) -> &str { self.get("ident").unwrap_or_default() }
	/// Free-form description
	pub fn descr(&self) -> Option<&str> { self.get("descr") }
	/// Timeout in seconds, validation guarantees it fits a `u64`
	pub fn timeout(&self) -> Option<u64> { self.get("timeout")?.parse().ok() }
	/// Whether the test case has a cleanup routine
	pub fn has_cleanup(&self) -> bool { self.get("has.cleanup") == Some("true") }
	/// Whether the test case needs a scratch directory
	pub fn use_fs(&self) -> bool { self.get("use.fs") == Some("true") }
	/// Programs that must be available to run the test case
	pub fn require_progs(&self) -> impl Iterator<Item = &str> {
		self.get("require.progs").unwrap_or_default().split_whitespace()
	}
}

impl fmt::Debug for TestCaseRecord {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str("TestCaseRecord ")?;
		f.debug_map().entries(self.iter()).finish()
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TestCaseRecord {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		let mut record = Self::new();
		for (name, value) in iter {
			record.insert(name, value);
		}
		record
	}
}

impl Index<&str> for TestCaseRecord {
	type Output = str;
	fn index(&self, name: &str) -> &Self::Output {
		self.get(name)
			.unwrap_or_else(|| panic!("Property {name:?} does not exist in test case"))
	}
}

/// Why a test program's metadata could not be obtained
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MetadataError {
	/// The stream was malformed or unreadable
	#[error(transparent)]
	Read(#[from] stream::Error),
	/// The stream was fine but did not declare anything
	#[error("Test program did not declare any test cases")]
	NoTestCases,
	/// Two blocks declared the same identifier
	#[error("Duplicate test case '{0}' in test program")]
	DuplicateTestCase(String),
}

/// Every test case of one test program, normalized with schema defaults
///
/// Never empty.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TestProgramMetadata {
	test_cases: Vec<(String, TestCaseRecord)>,
}

impl TestProgramMetadata {
	/// Read and normalize a metadata stream
	pub fn read(reader: impl BufRead) -> Result<Self, MetadataError> {
		Self::from_events(Parser::new(reader))
	}
	/// Normalize the events of a [`Parser`]
	pub fn from_events(events: impl IntoIterator<Item = Result<Event, stream::Error>>) -> Result<Self, MetadataError> {
		let mut test_cases: Vec<(String, TestCaseRecord)> = Vec::new();
		for event in events {
			match event? {
				Event::TestCase { ident, mut record } => {
					if test_cases.iter().any(|(known, _)| *known == ident) {
						return Err(MetadataError::DuplicateTestCase(ident));
					}
					record.apply_defaults();
					test_cases.push((ident, record));
				}
				Event::Eof => break,
			}
		}
		if test_cases.is_empty() {
			return Err(MetadataError::NoTestCases);
		}
		tracing::debug!(count = test_cases.len(), "read test program metadata");
		Ok(Self { test_cases })
	}
	/// Get a test case by identifier
	pub fn get(&self, ident: &str) -> Option<&TestCaseRecord> {
		self.test_cases
			.iter()
			.find(|(key, _)| key == ident)
			.map(|(_, record)| record)
	}
	/// Iterator over every test case in declaration order
	pub fn iter(&self) -> impl Iterator<Item = (&str, &TestCaseRecord)> {
		self.test_cases.iter().map(|(ident, record)| (ident.as_str(), record))
	}
	/// Number of test cases, at least one
	#[allow(clippy::len_without_is_empty)]
	pub fn len(&self) -> usize { self.test_cases.len() }
}

impl fmt::Debug for TestProgramMetadata {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str("TestProgramMetadata ")?;
		f.debug_map().entries(self.iter()).finish()
	}
}

impl Index<&str> for TestProgramMetadata {
	type Output = TestCaseRecord;
	fn index(&self, ident: &str) -> &Self::Output {
		self.get(ident)
			.unwrap_or_else(|| panic!("Test case {ident:?} does not exist in test program"))
	}
}

/// Read a metadata stream into normalized [`TestProgramMetadata`]
pub fn get_normalized_metadata(reader: impl BufRead) -> Result<TestProgramMetadata, MetadataError> {
	TestProgramMetadata::read(reader)
}
