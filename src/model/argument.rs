//! One formal argument or return slot of a stored procedure or function

use crate::type_mapper::{self, BindType, HostTypeBinding};
use heck::{CamelCase, MixedCase};
use thiserror::Error;

/// Property name given to the return slot of a function
pub const FUNCTION_RETURN_PROPERTY: &str = "functionReturn";

/// Positional-parameter prefix stripped from (and, for names that would start
/// with a digit, re-applied to) argument names before case conversion
const POSITIONAL_PREFIX: &str = "P_";

/// Identifiers reserved in the generated language; colliding property names
/// are renamed
const RESERVED_WORDS: [&str; 53] = [
	"abstract", "assert", "boolean", "break", "byte", "case", "catch", "char",
	"class", "const", "continue", "default", "do", "double", "else", "enum",
	"extends", "final", "finally", "float", "for", "goto", "if", "implements",
	"import", "instanceof", "int", "interface", "long", "native", "new",
	"package", "private", "protected", "public", "return", "short", "static",
	"strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
	"transient", "try", "void", "volatile", "while", "true", "false", "null",
];

/// True when `word` cannot be used as an identifier in generated source
pub fn is_reserved_word(word: &str) -> bool {
	RESERVED_WORDS.contains(&word)
}

/// Rejected argument shape, raised at construction time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ArgumentError {
	pub reason: String,
}

impl ArgumentError {
	fn new(reason: impl Into<String>) -> Self {
		ArgumentError { reason: reason.into() }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	In,
	Out,
	InOut,
}

impl Direction {
	pub fn as_str(self) -> &'static str {
		match self {
			Direction::In => "IN",
			Direction::Out => "OUT",
			Direction::InOut => "INOUT",
		}
	}

	/// True for the directions a call site must read back after execution
	pub fn writes_back(self) -> bool {
		matches!(self, Direction::Out | Direction::InOut)
	}
}

/// Immutable value record for one argument row.
///
/// An absent name marks the return slot of a function. The validating
/// constructor rejects partial states: a named argument must be an input, an
/// output, or both, and a return slot is output-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
	name: Option<String>,
	native_type: String,
	udt_name: Option<String>,
	is_input: bool,
	is_output: bool,
	sequence: u32,
}

impl Argument {
	pub fn new(
		name: Option<String>,
		native_type: impl Into<String>,
		udt_name: Option<String>,
		is_input: bool,
		is_output: bool,
		sequence: u32,
	) -> Result<Self, ArgumentError> {
		match &name {
			Some(n) if !is_input && !is_output => {
				return Err(ArgumentError::new(format!(
					"argument {} is neither input nor output",
					n
				)));
			},
			None if is_input => {
				return Err(ArgumentError::new("a return slot cannot be an input"));
			},
			_ => {},
		}
		// the return slot is output-only even when the catalog leaves the
		// flag unset
		let is_output = is_output || name.is_none();
		Ok(Argument {
			name,
			native_type: native_type.into(),
			udt_name,
			is_input,
			is_output,
			sequence,
		})
	}

	/// The output-only slot holding a function's return value
	pub fn return_slot(native_type: impl Into<String>, udt_name: Option<String>) -> Self {
		Argument {
			name: None,
			native_type: native_type.into(),
			udt_name,
			is_input: false,
			is_output: true,
			sequence: 0,
		}
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub fn native_type(&self) -> &str {
		&self.native_type
	}

	pub fn udt_name(&self) -> Option<&str> {
		self.udt_name.as_deref()
	}

	pub fn is_input(&self) -> bool {
		self.is_input
	}

	pub fn is_output(&self) -> bool {
		self.is_output
	}

	pub fn sequence(&self) -> u32 {
		self.sequence
	}

	pub fn is_return_slot(&self) -> bool {
		self.name.is_none()
	}

	pub fn direction(&self) -> Direction {
		match (self.is_input, self.is_output) {
			(true, true) => Direction::InOut,
			(true, false) => Direction::In,
			// construction guarantees at least one flag
			_ => Direction::Out,
		}
	}

	/// Property name of this argument on the generated context class.
	///
	/// The positional prefix is stripped, names left starting with a digit are
	/// re-prefixed to stay syntactically valid, and the result is
	/// lower-camel-cased and renamed away from reserved words.
	pub fn host_property_name(&self) -> String {
		let raw = match &self.name {
			None => return FUNCTION_RETURN_PROPERTY.to_owned(),
			Some(n) => n,
		};
		let stripped = raw.strip_prefix(POSITIONAL_PREFIX).unwrap_or(raw);
		let restored;
		let stripped = if stripped.chars().next().map_or(false, |c| c.is_ascii_digit()) {
			restored = format!("{}{}", POSITIONAL_PREFIX, stripped);
			&restored
		} else {
			stripped
		};
		let camel = stripped.to_mixed_case();
		if is_reserved_word(&camel) {
			format!("{}Param", camel)
		} else {
			camel
		}
	}

	/// Property name with an upper-cased first letter, for accessor names
	pub fn host_property_name_big(&self) -> String {
		let mut name = self.host_property_name();
		if let Some(first) = name.get(..1) {
			let big = first.to_uppercase();
			name.replace_range(..1, &big);
		}
		name
	}

	pub fn is_collection(&self) -> bool {
		type_mapper::is_collection_type(&self.native_type)
	}

	/// Element binding of a collection argument, keyed by its declared type
	fn element_binding(&self) -> Option<HostTypeBinding> {
		if !self.is_collection() {
			return None;
		}
		self.udt_name.as_deref().map(|udt| type_mapper::map_type(udt, 1))
	}

	/// A collection whose element maps to a recognized scalar; converted
	/// directly between host sequence and database array at call sites
	pub fn is_primitive_collection(&self) -> bool {
		self.element_binding()
			.map_or(false, |binding| binding.element_host_type.is_some())
	}

	/// Host type of this argument in generated code
	pub fn resolved_host_type(&self) -> String {
		match &self.udt_name {
			Some(udt) => {
				if self.is_collection() {
					match type_mapper::map_type(udt, 1).element_host_type {
						Some(element) => format!("List<{}>", element),
						None => format!("List<{}>", udt.to_camel_case()),
					}
				} else {
					udt.to_camel_case()
				}
			},
			None => type_mapper::map_type(&self.native_type, 0).host_type,
		}
	}

	/// Element host type of a collection argument; the camel-cased type name
	/// doubles as the converter key for object collections
	pub fn element_host_type(&self) -> Option<String> {
		if !self.is_collection() {
			return None;
		}
		let udt = self.udt_name.as_deref()?;
		Some(match type_mapper::map_type(udt, 1).element_host_type {
			Some(element) => element,
			None => udt.to_camel_case(),
		})
	}

	pub fn bind_type(&self) -> BindType {
		type_mapper::map_bind_type(&self.native_type)
	}

	/// Structured types must be registered with the call API under their
	/// declared database type name
	pub fn declared_type_name(&self) -> Option<&str> {
		if self.bind_type() == BindType::Struct || self.is_collection() {
			self.udt_name.as_deref()
		} else {
			None
		}
	}

	/// Flags call sites that need numeric/boolean adaptation when reading the
	/// value back
	pub fn is_boolean_output(&self) -> bool {
		self.name.is_some()
			&& self.bind_type() == BindType::PlsqlBoolean
			&& self.direction().writes_back()
	}
}
