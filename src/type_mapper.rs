//! Maps native database/PLSQL type names to host types and bind-type codes
//!
//! The vocabulary table is built once and shared read-only for the process
//! lifetime. Lookups are pure and total: a native type the table does not
//! know degrades to the generic object host type instead of failing, so
//! generation stays best-effort.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Generic host type used when a native type has no scalar mapping
pub const HOST_OBJECT: &str = "Object";
/// Host type of cursor-like arguments; changes return handling at call sites
pub const HOST_RESULT_SET: &str = "ResultSet";
pub const HOST_BYTE_ARRAY: &str = "byte[]";

/// Bind-type codes understood by the parameterized-call API.
///
/// Most variants carry the portable type-constant codes; `Cursor` and
/// `PlsqlBoolean` are vendor sentinels with no portable equivalent
/// (-10 and 252 respectively) and are spelled out as numeric literals in
/// generated registration code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindType {
	Char,
	Varchar,
	Numeric,
	Integer,
	Double,
	Date,
	Timestamp,
	Clob,
	Blob,
	Struct,
	Array,
	Cursor,
	PlsqlBoolean,
	Other,
}

impl BindType {
	/// Numeric code supplied to the call API at parameter registration
	pub fn code(self) -> i32 {
		match self {
			BindType::Char => 1,
			BindType::Varchar => 12,
			BindType::Numeric => 2,
			BindType::Integer => 4,
			BindType::Double => 8,
			BindType::Date => 91,
			BindType::Timestamp => 93,
			BindType::Clob => 2005,
			BindType::Blob => 2004,
			BindType::Struct => 2002,
			BindType::Array => 2003,
			BindType::Cursor => -10,
			BindType::PlsqlBoolean => 252,
			BindType::Other => 1111,
		}
	}

	/// Name of the portable type constant, where one exists
	pub fn constant_name(self) -> Option<&'static str> {
		match self {
			BindType::Char => Some("CHAR"),
			BindType::Varchar => Some("VARCHAR"),
			BindType::Numeric => Some("NUMERIC"),
			BindType::Integer => Some("INTEGER"),
			BindType::Double => Some("DOUBLE"),
			BindType::Date => Some("DATE"),
			BindType::Timestamp => Some("TIMESTAMP"),
			BindType::Clob => Some("CLOB"),
			BindType::Blob => Some("BLOB"),
			BindType::Struct => Some("STRUCT"),
			BindType::Array => Some("ARRAY"),
			BindType::Other => Some("OTHER"),
			BindType::Cursor | BindType::PlsqlBoolean => None,
		}
	}
}

/// Resolved mapping from one native type (plus collection context) to the
/// generated language. A value type: recomputed on demand, never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostTypeBinding {
	pub host_type: String,
	pub bind_type: BindType,
	pub is_collection: bool,
	/// Present only for collections of a recognized scalar element
	pub element_host_type: Option<String>,
}

struct ScalarMapping {
	host_type: &'static str,
	bind_type: BindType,
}

macro_rules! scalar {
	($map:expr, $host:expr, $bind:expr, $($name:expr),+) => {
		$(
			$map.insert($name, ScalarMapping { host_type: $host, bind_type: $bind });
		)+
	};
}

static VOCABULARY: Lazy<HashMap<&'static str, ScalarMapping>> = Lazy::new(|| {
	let mut m = HashMap::new();
	scalar!(m, "String", BindType::Varchar,
		"VARCHAR2", "NVARCHAR2", "VARCHAR", "CHARACTER VARYING", "TEXT", "LONG",
		"ROWID", "UROWID", "XMLTYPE", "NAME");
	scalar!(m, "String", BindType::Char, "CHAR", "NCHAR", "CHARACTER", "BPCHAR");
	scalar!(m, "String", BindType::Clob, "CLOB", "NCLOB");
	scalar!(m, "BigDecimal", BindType::Numeric,
		"NUMBER", "NUMERIC", "DECIMAL", "DEC", "FLOAT", "REAL");
	scalar!(m, "Integer", BindType::Integer,
		"INTEGER", "INT", "SMALLINT", "BIGINT", "PLS_INTEGER", "BINARY_INTEGER",
		"INT2", "INT4", "INT8");
	scalar!(m, "Double", BindType::Double,
		"BINARY_DOUBLE", "BINARY_FLOAT", "DOUBLE PRECISION", "FLOAT4", "FLOAT8");
	scalar!(m, "Date", BindType::Date, "DATE");
	scalar!(m, "Timestamp", BindType::Timestamp,
		"TIMESTAMP", "TIMESTAMP WITH TIME ZONE", "TIMESTAMP WITH LOCAL TIME ZONE",
		"TIMESTAMP WITHOUT TIME ZONE", "TIMESTAMPTZ");
	scalar!(m, HOST_BYTE_ARRAY, BindType::Blob, "BLOB", "RAW", "LONG RAW", "BYTEA");
	scalar!(m, HOST_RESULT_SET, BindType::Cursor, "REF CURSOR", "SYS_REFCURSOR", "REFCURSOR");
	scalar!(m, "Boolean", BindType::PlsqlBoolean, "BOOLEAN", "PL/SQL BOOLEAN", "BOOL");
	m
});

/// Native type names that denote a collection rather than a scalar or object
pub fn is_collection_type(native_type: &str) -> bool {
	matches!(
		normalize(native_type).as_str(),
		"TABLE" | "VARRAY" | "PL/SQL TABLE" | "NESTED TABLE" | "ARRAY"
	)
}

fn normalize(native_type: &str) -> String {
	native_type.trim().to_uppercase()
}

/// Resolves a native type name to a host-type binding.
///
/// With `element_depth` 0 the name is mapped as the argument's own type. With
/// `element_depth` 1 the name is the element of a collection: a recognized
/// scalar yields a primitive collection (converted directly at call sites),
/// anything else an object collection whose converter is keyed by the
/// user-defined type name of the element.
pub fn map_type(native_type: &str, element_depth: u8) -> HostTypeBinding {
	let key = normalize(native_type);

	if element_depth > 0 {
		return match VOCABULARY.get(key.as_str()) {
			Some(scalar) => HostTypeBinding {
				host_type: format!("List<{}>", scalar.host_type),
				bind_type: BindType::Array,
				is_collection: true,
				element_host_type: Some(scalar.host_type.to_owned()),
			},
			None => HostTypeBinding {
				host_type: format!("List<{}>", HOST_OBJECT),
				bind_type: BindType::Array,
				is_collection: true,
				element_host_type: None,
			},
		};
	}

	if is_collection_type(&key) {
		return HostTypeBinding {
			host_type: format!("List<{}>", HOST_OBJECT),
			bind_type: BindType::Array,
			is_collection: true,
			element_host_type: None,
		};
	}

	match VOCABULARY.get(key.as_str()) {
		Some(scalar) => HostTypeBinding {
			host_type: scalar.host_type.to_owned(),
			bind_type: scalar.bind_type,
			is_collection: false,
			element_host_type: None,
		},
		None => HostTypeBinding {
			host_type: HOST_OBJECT.to_owned(),
			bind_type: if key == "OBJECT" { BindType::Struct } else { BindType::Other },
			is_collection: false,
			element_host_type: None,
		},
	}
}

/// Resolves the bind-type code the call API needs for one native type
pub fn map_bind_type(native_type: &str) -> BindType {
	let key = normalize(native_type);
	if is_collection_type(&key) {
		return BindType::Array;
	}
	if key == "OBJECT" {
		return BindType::Struct;
	}
	VOCABULARY
		.get(key.as_str())
		.map(|scalar| scalar.bind_type)
		.unwrap_or(BindType::Other)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn scalars_resolve_to_their_host_types() {
		assert_eq!(map_type("NUMBER", 0).host_type, "BigDecimal");
		assert_eq!(map_type("VARCHAR2", 0).host_type, "String");
		assert_eq!(map_type("DATE", 0).bind_type, BindType::Date);
		assert_eq!(map_type("PLS_INTEGER", 0).host_type, "Integer");
	}

	#[test]
	fn lookup_ignores_case_and_padding() {
		assert_eq!(map_type(" number ", 0), map_type("NUMBER", 0));
	}

	#[test]
	fn unknown_types_degrade_to_object() {
		let binding = map_type("T_SOMETHING_CUSTOM", 0);
		assert_eq!(binding.host_type, HOST_OBJECT);
		assert_eq!(binding.bind_type, BindType::Other);
		assert!(!binding.is_collection);
	}

	#[test]
	fn scalar_element_makes_a_primitive_collection() {
		let binding = map_type("NUMBER", 1);
		assert!(binding.is_collection);
		assert_eq!(binding.host_type, "List<BigDecimal>");
		assert_eq!(binding.element_host_type.as_deref(), Some("BigDecimal"));
	}

	#[test]
	fn object_element_makes_an_object_collection() {
		let binding = map_type("T_EMPLOYEE", 1);
		assert!(binding.is_collection);
		assert_eq!(binding.host_type, "List<Object>");
		assert_eq!(binding.element_host_type, None);
	}

	#[test]
	fn vendor_sentinels() {
		assert_eq!(map_bind_type("REF CURSOR"), BindType::Cursor);
		assert_eq!(BindType::Cursor.code(), -10);
		assert_eq!(map_bind_type("BOOLEAN"), BindType::PlsqlBoolean);
		assert_eq!(BindType::PlsqlBoolean.code(), 252);
		assert_eq!(BindType::Cursor.constant_name(), None);
	}

	#[test]
	fn structured_types() {
		assert_eq!(map_bind_type("OBJECT"), BindType::Struct);
		assert_eq!(map_bind_type("TABLE"), BindType::Array);
		assert_eq!(map_bind_type("VARRAY"), BindType::Array);
	}

	#[test]
	fn mapping_is_stable_across_calls() {
		for native in &["NUMBER", "REF CURSOR", "TABLE", "NO_SUCH_TYPE"] {
			assert_eq!(map_type(native, 0), map_type(native, 0));
			assert_eq!(map_bind_type(native), map_bind_type(native));
		}
	}
}
