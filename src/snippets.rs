//! Per-argument statements spliced into the package-wrapper template
//!
//! Each function renders one line of generated call-site code for an
//! argument: binding inputs before the call, registering outputs, and
//! extracting written-back values afterwards. Structured types go through
//! their generated converters; the boolean sentinel type has no direct
//! representation in the call API and is adapted through numerics.

use crate::{
	model::{Argument, CallKind},
	type_mapper::{BindType, HOST_BYTE_ARRAY, HOST_RESULT_SET},
};

/// Spelling of a bind type at registration sites: the portable constant when
/// one exists, the bare vendor code otherwise
pub fn registration_constant(bind_type: BindType) -> String {
	match bind_type.constant_name() {
		Some(name) => format!("Types.{}", name),
		None => bind_type.code().to_string(),
	}
}

/// The call API numbers the return placeholder of a function first, so plan
/// positions shift by one there; procedure positions map straight through
fn call_index(call_kind: CallKind, position: u32) -> u32 {
	match call_kind {
		CallKind::Function => position + 1,
		CallKind::Procedure => position,
	}
}

fn converter_class(host_type: &str) -> String {
	format!("{}Converter", host_type)
}

/// Out-parameter registration statement; `None` for pure inputs
pub fn register_out(arg: &Argument, position: u32, call_kind: CallKind) -> Option<String> {
	if !arg.direction().writes_back() {
		return None;
	}
	let index = call_index(call_kind, position);
	let statement = if let Some(type_name) = arg.declared_type_name() {
		format!(
			"call.registerOutParameter({}, {}, \"{}\");",
			index,
			registration_constant(arg.bind_type()),
			type_name
		)
	} else if arg.bind_type() == BindType::PlsqlBoolean {
		// no portable boolean registration; read back as a numeric
		format!("call.registerOutParameter({}, Types.INTEGER);", index)
	} else {
		format!(
			"call.registerOutParameter({}, {});",
			index,
			registration_constant(arg.bind_type())
		)
	};
	Some(statement)
}

/// Input binding statement; `None` for pure outputs and the return slot
pub fn set_in(arg: &Argument, position: u32, call_kind: CallKind) -> Option<String> {
	if !arg.is_input() {
		return None;
	}
	let index = call_index(call_kind, position);
	let getter = format!("ctx.get{}()", arg.host_property_name_big());
	let statement = if arg.is_collection() {
		let type_name = arg.declared_type_name().unwrap_or("");
		if arg.is_primitive_collection() {
			format!(
				"call.setArray({}, PrimitiveTypeConverter.toArray(connection, \"{}\", {}));",
				index, type_name, getter
			)
		} else {
			let converter = converter_class(&arg.element_host_type().unwrap_or_default());
			format!(
				"call.setArray({}, {}.toArray(connection, \"{}\", {}));",
				index, converter, type_name, getter
			)
		}
	} else if arg.bind_type() == BindType::Struct {
		let converter = converter_class(&arg.resolved_host_type());
		format!(
			"call.setObject({}, {}.toStruct(connection, {}), Types.STRUCT);",
			index, converter, getter
		)
	} else if arg.bind_type() == BindType::PlsqlBoolean {
		format!(
			"call.setObject({}, PrimitiveTypeConverter.toNumeric({}));",
			index, getter
		)
	} else {
		format!("call.setObject({}, {});", index, getter)
	};
	Some(statement)
}

/// Post-call extraction statement; `None` for parameters that never write back
pub fn extract_out(arg: &Argument, position: u32, call_kind: CallKind) -> Option<String> {
	if !arg.direction().writes_back() {
		return None;
	}
	let index = call_index(call_kind, position);
	let setter = format!("ctx.set{}", arg.host_property_name_big());
	let host_type = arg.resolved_host_type();
	let statement = if arg.is_collection() {
		if arg.is_primitive_collection() {
			format!(
				"{}(PrimitiveTypeConverter.asList((Array) call.getObject({}), {}.class));",
				setter,
				index,
				arg.element_host_type().unwrap_or_default()
			)
		} else {
			let converter = converter_class(&arg.element_host_type().unwrap_or_default());
			format!(
				"{}({}.getObjectList((Array) call.getObject({})));",
				setter, converter, index
			)
		}
	} else if arg.bind_type() == BindType::Struct {
		format!(
			"{}({}.getObject((Struct) call.getObject({})));",
			setter,
			converter_class(&host_type),
			index
		)
	} else if arg.is_boolean_output() || arg.bind_type() == BindType::PlsqlBoolean {
		format!(
			"{}(PrimitiveTypeConverter.asBoolean(call.getObject({})));",
			setter, index
		)
	} else if host_type == HOST_RESULT_SET {
		format!("{}((ResultSet) call.getObject({}));", setter, index)
	} else if host_type == HOST_BYTE_ARRAY {
		format!("{}((byte[]) call.getObject({}));", setter, index)
	} else {
		format!("{}(({}) call.getObject({}));", setter, host_type, index)
	};
	Some(statement)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::Argument;

	fn out_arg(name: &str, native: &str, udt: Option<&str>) -> Argument {
		Argument::new(
			Some(name.to_owned()),
			native,
			udt.map(str::to_owned),
			false,
			true,
			1,
		)
		.unwrap()
	}

	#[test]
	fn scalar_out_registration_uses_the_portable_constant() {
		let arg = out_arg("P_SALARY", "NUMBER", None);
		assert_eq!(
			register_out(&arg, 1, CallKind::Procedure).unwrap(),
			"call.registerOutParameter(1, Types.NUMERIC);"
		);
	}

	#[test]
	fn cursor_registration_falls_back_to_the_vendor_code() {
		let arg = out_arg("P_ROWS", "REF CURSOR", None);
		assert_eq!(
			register_out(&arg, 2, CallKind::Procedure).unwrap(),
			"call.registerOutParameter(2, -10);"
		);
	}

	#[test]
	fn boolean_out_is_registered_as_integer() {
		let arg = out_arg("P_OK", "BOOLEAN", None);
		assert_eq!(
			register_out(&arg, 1, CallKind::Procedure).unwrap(),
			"call.registerOutParameter(1, Types.INTEGER);"
		);
		assert_eq!(
			extract_out(&arg, 1, CallKind::Procedure).unwrap(),
			"ctx.setOk(PrimitiveTypeConverter.asBoolean(call.getObject(1)));"
		);
	}

	#[test]
	fn structured_registration_carries_the_declared_type_name() {
		let arg = out_arg("P_EMPS", "TABLE", Some("T_EMPLOYEE_LIST"));
		assert_eq!(
			register_out(&arg, 3, CallKind::Procedure).unwrap(),
			"call.registerOutParameter(3, Types.ARRAY, \"T_EMPLOYEE_LIST\");"
		);
	}

	#[test]
	fn function_return_slot_shifts_to_the_first_call_index() {
		let slot = Argument::return_slot("NUMBER", None);
		assert_eq!(
			register_out(&slot, 0, CallKind::Function).unwrap(),
			"call.registerOutParameter(1, Types.NUMERIC);"
		);
		assert_eq!(
			extract_out(&slot, 0, CallKind::Function).unwrap(),
			"ctx.setFunctionReturn((BigDecimal) call.getObject(1));"
		);
	}

	#[test]
	fn plain_input_binding() {
		let arg =
			Argument::new(Some("P_CUSTOMER_ID".into()), "NUMBER", None, true, false, 1).unwrap();
		assert_eq!(
			set_in(&arg, 1, CallKind::Procedure).unwrap(),
			"call.setObject(1, ctx.getCustomerId());"
		);
		assert_eq!(register_out(&arg, 1, CallKind::Procedure), None);
	}

	#[test]
	fn primitive_collection_round_trip() {
		let arg = Argument::new(
			Some("P_IDS".into()),
			"TABLE",
			Some("NUMBER".into()),
			true,
			true,
			1,
		)
		.unwrap();
		assert_eq!(
			set_in(&arg, 1, CallKind::Procedure).unwrap(),
			"call.setArray(1, PrimitiveTypeConverter.toArray(connection, \"NUMBER\", ctx.getIds()));"
		);
		assert_eq!(
			extract_out(&arg, 1, CallKind::Procedure).unwrap(),
			"ctx.setIds(PrimitiveTypeConverter.asList((Array) call.getObject(1), BigDecimal.class));"
		);
	}

	#[test]
	fn object_argument_goes_through_its_converter() {
		let arg = Argument::new(
			Some("P_EMP".into()),
			"OBJECT",
			Some("T_EMPLOYEE".into()),
			true,
			false,
			1,
		)
		.unwrap();
		assert_eq!(
			set_in(&arg, 1, CallKind::Procedure).unwrap(),
			"call.setObject(1, TEmployeeConverter.toStruct(connection, ctx.getEmp()), Types.STRUCT);"
		);
	}
}
