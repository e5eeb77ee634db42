// SPDX-License-Identifier: MIT OR Apache-2.0
//! The table of test case properties
//!
//! Every property a test case may declare is either listed here or is a
//! custom property whose name starts with `X-`.

/// Pattern every test case identifier must match
pub const IDENT_PATTERN: &str = "^[_A-Za-z0-9]+$";

/// Prefix of custom, unchecked properties
pub const CUSTOM_PREFIX: &str = "X-";

/// What a property's value has to look like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
	/// Any non-empty text
	Text,
	/// Matches [`IDENT_PATTERN`]
	Identifier,
	/// Non-negative decimal integer
	Integer,
}

/// A known property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property {
	/// Property name as written in the stream
	pub name: &'static str,
	/// Value filled in by normalization when absent
	pub default: Option<&'static str>,
	/// Check applied to the value
	pub constraint: Constraint,
}

const fn property(name: &'static str, default: Option<&'static str>, constraint: Constraint) -> Property {
	Property {
		name,
		default,
		constraint,
	}
}

/// All known properties, defaults are applied in this order
pub static PROPERTIES: &[Property] = &[
	property("ident", None, Constraint::Identifier),
	property("descr", None, Constraint::Text),
	property("timeout", Some("300"), Constraint::Integer),
	property("require.arch", None, Constraint::Text),
	property("require.config", None, Constraint::Text),
	property("require.machine", None, Constraint::Text),
	property("require.progs", None, Constraint::Text),
	property("require.user", None, Constraint::Text),
	property("has.cleanup", Some("false"), Constraint::Text),
	property("use.fs", Some("false"), Constraint::Text),
];

/// Look up a known property by name
pub fn lookup(name: &str) -> Option<&'static Property> {
	PROPERTIES.iter().find(|prop| prop.name == name)
}

/// Whether a name is a custom `X-` property
pub fn is_custom(name: &str) -> bool {
	name.strip_prefix(CUSTOM_PREFIX).is_some_and(|rest| !rest.is_empty())
}

/// Known properties with a default, in application order
pub fn defaults() -> impl Iterator<Item = (&'static str, &'static str)> {
	PROPERTIES
		.iter()
		.filter_map(|prop| prop.default.map(|value| (prop.name, value)))
}

fn is_identifier(value: &str) -> bool {
	!value.is_empty() && value.bytes().all(|ch| ch == b'_' || ch.is_ascii_alphanumeric())
}

// digits only, no sign, and small enough for a u64
fn is_integer(value: &str) -> bool {
	!value.is_empty() && value.bytes().all(|ch| ch.is_ascii_digit()) && value.parse::<u64>().is_ok()
}

/// Check one trimmed `name: value` pair,
/// returns the message describing the first violation
pub fn validate(name: &str, value: &str) -> Result<(), String> {
	if value.is_empty() {
		return Err(format!("The value for '{name}' cannot be empty"));
	}
	let constraint = match lookup(name) {
		Some(prop) => prop.constraint,
		None if is_custom(name) => Constraint::Text,
		None => return Err(format!("Unknown property '{name}'")),
	};
	match constraint {
		Constraint::Text => Ok(()),
		Constraint::Identifier if is_identifier(value) => Ok(()),
		Constraint::Identifier => Err(format!("The identifier must match {IDENT_PATTERN}; was '{value}'")),
		Constraint::Integer if is_integer(value) => Ok(()),
		Constraint::Integer => Err(format!("The {name} property requires an integer value")),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn custom_names() {
		assert!(is_custom("X-foo"));
		assert!(!is_custom("X-"));
		assert!(!is_custom("x-foo"));
		assert!(!is_custom("foo"));
	}

	#[test]
	fn validation() {
		assert_eq!(validate("descr", "anything at all"), Ok(()));
		assert_eq!(validate("X-anything", "goes"), Ok(()));
		assert_eq!(validate("timeout", "0"), Ok(()));
		assert_eq!(
			validate("timeout", "-1"),
			Err("The timeout property requires an integer value".into())
		);
		assert_eq!(validate("timeout", "18446744073709551615"), Ok(()));
		assert_eq!(
			validate("timeout", "99999999999999999999999"),
			Err("The timeout property requires an integer value".into())
		);
		assert_eq!(
			validate("ident", "a b"),
			Err("The identifier must match ^[_A-Za-z0-9]+$; was 'a b'".into())
		);
		// emptiness is checked before the name
		assert_eq!(validate("bogus", ""), Err("The value for 'bogus' cannot be empty".into()));
		assert_eq!(validate("bogus", "x"), Err("Unknown property 'bogus'".into()));
	}

	#[test]
	fn default_order() {
		let names: Vec<_> = defaults().collect();
		assert_eq!(names, [("timeout", "300"), ("has.cleanup", "false"), ("use.fs", "false")]);
	}
}
