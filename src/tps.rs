// SPDX-License-Identifier: MIT OR Apache-2.0
//! The `application/X-atf-tps` writer
//!
//! The status stream reports a whole run as it happens:
//! ```text
//! Content-Type: application/X-atf-tps; version="2"
//!
//! tps-count: 1
//! tp-start: the_program, 1
//! tc-start: the_case
//! tc-so:a line printed by the case
//! tc-end: the_case, passed
//! tp-end: the_program
//! ```
//!
//! The writer remembers which program and case are open, so closing calls
//! don't repeat their names. Calling things out of order (ending a case that
//! was never started, starting a case outside a program, ...) is a bug in the
//! caller and panics.

use std::io::{self, Write};
use std::mem;

use crate::TPS_CONTENT_TYPE;
use crate::result::Outcome;

struct Program {
	name: String,
	declared: usize,
	started: usize,
}

enum State {
	Idle,
	Program(Program),
	Case(Program, String),
}

/// A status stream writer over some byte sink
pub struct Writer<W: Write> {
	sink: W,
	header: bool,
	state: State,
}

impl<W: Write> Writer<W> {
	/// Create a writer, nothing is written until the first call
	pub fn new(sink: W) -> Self {
		Self {
			sink,
			header: false,
			state: State::Idle,
		}
	}
	/// Give back the sink
	pub fn into_inner(self) -> W { self.sink }
	fn line(&mut self, args: std::fmt::Arguments) -> io::Result<()> {
		if !self.header {
			write!(self.sink, "{TPS_CONTENT_TYPE}\n\n")?;
			self.header = true;
		}
		self.sink.write_fmt(args)?;
		self.sink.write_all(b"\n")
	}
	/// `info: name, value`
	pub fn info(&mut self, name: &str, value: &str) -> io::Result<()> {
		self.line(format_args!("info: {name}, {value}"))
	}
	/// `tps-count: count`, the number of programs in this run
	pub fn declare_program_count(&mut self, count: usize) -> io::Result<()> {
		self.line(format_args!("tps-count: {count}"))
	}
	/// `tp-start: name, case_count`
	pub fn start_program(&mut self, name: &str, case_count: usize) -> io::Result<()> {
		match &self.state {
			State::Idle => {}
			State::Program(open) | State::Case(open, _) => {
				panic!("Cannot start program '{name}' while '{}' is still open", open.name)
			}
		}
		self.line(format_args!("tp-start: {name}, {case_count}"))?;
		self.state = State::Program(Program {
			name: name.to_owned(),
			declared: case_count,
			started: 0,
		});
		Ok(())
	}
	/// `tp-end: name` or `tp-end: name, reason` for the open program
	///
	/// A case that is still open is abandoned along with its program.
	pub fn end_program(&mut self, reason: &str) -> io::Result<()> {
		let program = match mem::replace(&mut self.state, State::Idle) {
			State::Idle => panic!("Cannot end a program, none is open"),
			State::Program(program) => program,
			State::Case(program, case) => {
				tracing::debug!(program = %program.name, %case, "program ended with a case still open");
				program
			}
		};
		if reason.is_empty() {
			if program.started != program.declared {
				tracing::warn!(
					program = %program.name,
					declared = program.declared,
					started = program.started,
					"program ran a different number of test cases than it declared"
				);
			}
			self.line(format_args!("tp-end: {}", program.name))
		} else {
			self.line(format_args!("tp-end: {}, {reason}", program.name))
		}
	}
	/// `tc-start: name`
	pub fn start_case(&mut self, name: &str) -> io::Result<()> {
		match &self.state {
			State::Idle => panic!("Cannot start case '{name}' outside of a program"),
			State::Case(_, open) => panic!("Cannot start case '{name}' while '{open}' is still open"),
			State::Program(_) => {}
		}
		self.line(format_args!("tc-start: {name}"))?;
		if let State::Program(mut program) = mem::replace(&mut self.state, State::Idle) {
			program.started += 1;
			self.state = State::Case(program, name.to_owned());
		}
		Ok(())
	}
	fn assert_case(&self, what: &str) {
		assert!(matches!(self.state, State::Case(..)), "Cannot write {what}, no case is open");
	}
	/// `tc-so:text`, a line the open case printed to its stdout
	pub fn stdout_line(&mut self, text: &str) -> io::Result<()> {
		self.assert_case("stdout");
		self.line(format_args!("tc-so:{text}"))
	}
	/// `tc-se:text`, a line the open case printed to its stderr
	pub fn stderr_line(&mut self, text: &str) -> io::Result<()> {
		self.assert_case("stderr");
		self.line(format_args!("tc-se:{text}"))
	}
	/// `tc-end: name, state[, reason]` for the open case
	pub fn end_case(&mut self, outcome: &Outcome) -> io::Result<()> {
		let (program, case) = match mem::replace(&mut self.state, State::Idle) {
			State::Case(program, case) => (program, case),
			State::Idle | State::Program(_) => panic!("Cannot end a case, none is open"),
		};
		self.state = State::Program(program);
		match outcome.reason() {
			Some(reason) => self.line(format_args!("tc-end: {case}, {}, {reason}", outcome.state())),
			None => self.line(format_args!("tc-end: {case}, {}", outcome.state())),
		}
	}
	/// Flush the sink
	pub fn flush(&mut self) -> io::Result<()> { self.sink.flush() }
}
