//! User-defined types projected into data-class descriptors
//!
//! The same type mapping that resolves procedure arguments is applied to the
//! attribute rows of a user-defined type, producing the field list for the
//! generated entity class and its converter.

use crate::type_mapper;
use heck::{CamelCase, MixedCase};

/// One attribute row of a user-defined type, as reported by the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAttribute {
	pub attr_name: String,
	pub attr_type_name: String,
	pub attr_no: u32,
	/// Numeric scale, -1 when the catalog reports none
	pub scale: i32,
	/// True when the attribute's type is itself a user-defined type
	pub is_multi_type: bool,
	/// Catalog type code of the attribute type (`OBJECT`, `COLLECTION`) when
	/// user-defined
	pub type_code: Option<String>,
	/// Element type of a collection attribute
	pub collection_element_type: Option<String>,
}

impl TypeAttribute {
	/// Field name on the generated data class
	pub fn field_name(&self) -> String {
		self.attr_name.to_mixed_case()
	}

	pub fn field_name_big(&self) -> String {
		self.attr_name.to_camel_case()
	}

	pub fn is_collection(&self) -> bool {
		self.type_code.as_deref() == Some("COLLECTION")
	}

	fn element_type_name(&self) -> &str {
		self.collection_element_type
			.as_deref()
			.unwrap_or(&self.attr_type_name)
	}

	/// Element host type of a collection attribute; the camel-cased type name
	/// doubles as the converter key for object collections
	pub fn element_host_type(&self) -> Option<String> {
		if !self.is_collection() {
			return None;
		}
		let element = self.element_type_name();
		Some(match type_mapper::map_type(element, 1).element_host_type {
			Some(scalar) => scalar,
			None => element.to_camel_case(),
		})
	}

	pub fn is_primitive_collection(&self) -> bool {
		self.is_collection()
			&& type_mapper::map_type(self.element_type_name(), 1)
				.element_host_type
				.is_some()
	}

	/// Host type of this attribute in the generated data class
	pub fn host_type(&self) -> String {
		if let Some(element) = self.element_host_type() {
			return format!("List<{}>", element);
		}
		if self.is_multi_type {
			return self.attr_type_name.to_camel_case();
		}
		let binding = type_mapper::map_type(&self.attr_type_name, 0);
		// whole numbers are narrowed to the integral host type
		if binding.host_type == "BigDecimal" && self.scale == 0 {
			return "Integer".to_owned();
		}
		binding.host_type
	}
}

/// Data-class descriptor for one user-defined type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
	name: String,
	attributes: Vec<TypeAttribute>,
}

impl TypeDescriptor {
	pub fn new(name: impl Into<String>, mut attributes: Vec<TypeAttribute>) -> Self {
		attributes.sort_by_key(|attr| attr.attr_no);
		TypeDescriptor {
			name: name.into(),
			attributes,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn class_name(&self) -> String {
		self.name.to_camel_case()
	}

	pub fn attributes(&self) -> &[TypeAttribute] {
		&self.attributes
	}
}
