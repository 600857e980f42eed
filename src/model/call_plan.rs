//! Compiles an ordered argument list into a call string and bind-parameter
//! plan for the parameterized-call API

use super::{
	argument::{Argument, Direction},
	procedure::ProcedureIdentity,
};
use crate::{error::GenError, type_mapper::BindType};

/// Whether the callable is a procedure or a function with a return slot.
///
/// Carried explicitly from the catalog rather than re-derived from a missing
/// first argument name, so a procedure whose first real argument lacks a
/// catalog name cannot be misclassified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CallKind {
	Procedure,
	Function,
}

impl CallKind {
	pub fn as_str(self) -> &'static str {
		match self {
			CallKind::Procedure => "procedure",
			CallKind::Function => "function",
		}
	}
}

/// One positional value supplied to the parameterized call. Order matches the
/// supplied-argument order of the underlying call API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindParameter {
	pub position: u32,
	pub direction: Direction,
	pub bind_type: BindType,
	/// Set for object and collection types; the call API needs the database
	/// type name when registering structured parameters
	pub declared_type_name: Option<String>,
}

/// The compiled invocation of one procedure or function; immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallPlan {
	call_string: String,
	parameters: Vec<BindParameter>,
	target_identifier: String,
	needs_return_value: bool,
}

impl CallPlan {
	/// Textual invocation template with placeholders, e.g.
	/// `{ call HR.EMP_PKG.GET_SALARY(?) }`
	pub fn call_string(&self) -> &str {
		&self.call_string
	}

	pub fn parameters(&self) -> &[BindParameter] {
		&self.parameters
	}

	/// Dot-joined owner, object, and procedure name
	pub fn target_identifier(&self) -> &str {
		&self.target_identifier
	}

	/// True when any parameter writes back, i.e. generated call sites must
	/// perform post-call extraction
	pub fn needs_return_value(&self) -> bool {
		self.needs_return_value
	}
}

/// Builds the call plan for one procedure/function/overload.
///
/// A function reserves bind position 0 for its return slot and numbers the
/// remaining arguments 1..N-1 in catalog-declared order; a procedure numbers
/// its arguments 1..N. One placeholder is emitted per parenthesized position.
pub fn compile(
	identity: &ProcedureIdentity,
	call_kind: CallKind,
	arguments: &[Argument],
) -> Result<CallPlan, GenError> {
	let target = identity.qualified_name();

	let placeholder_count = match call_kind {
		CallKind::Function => {
			match arguments.first() {
				None => {
					return Err(GenError::invalid_shape(
						identity.to_string(),
						"function has an empty argument list, no return slot present",
					));
				},
				Some(first) if !first.is_return_slot() => {
					return Err(GenError::invalid_shape(
						identity.to_string(),
						"function argument list does not start with its return slot",
					));
				},
				Some(_) => {},
			}
			if arguments.iter().skip(1).any(Argument::is_return_slot) {
				return Err(GenError::invalid_shape(
					identity.to_string(),
					"unnamed argument outside the return slot",
				));
			}
			arguments.len() - 1
		},
		CallKind::Procedure => {
			if arguments.iter().any(Argument::is_return_slot) {
				return Err(GenError::invalid_shape(
					identity.to_string(),
					"procedure has an unnamed argument",
				));
			}
			arguments.len()
		},
	};

	let placeholders = vec!["?"; placeholder_count].join(", ");
	let call_string = match call_kind {
		CallKind::Procedure => format!("{{ call {}({}) }}", target, placeholders),
		CallKind::Function => format!("{{ ? = call {}({}) }}", target, placeholders),
	};

	let first_position = match call_kind {
		// position 0 is the return slot
		CallKind::Function => 0,
		CallKind::Procedure => 1,
	};
	let parameters = arguments
		.iter()
		.enumerate()
		.map(|(i, arg)| BindParameter {
			position: first_position + i as u32,
			direction: arg.direction(),
			bind_type: arg.bind_type(),
			declared_type_name: arg.declared_type_name().map(str::to_owned),
		})
		.collect::<Vec<_>>();

	let needs_return_value = parameters.iter().any(|p| p.direction.writes_back());

	Ok(CallPlan {
		call_string,
		parameters,
		target_identifier: target,
		needs_return_value,
	})
}
