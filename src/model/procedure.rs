//! Descriptor for one discovered procedure/function/overload

use super::{
	argument::Argument,
	call_plan::{self, CallKind, CallPlan},
};
use crate::{
	error::GenError,
	type_mapper::{BindType, HOST_RESULT_SET},
};
use heck::{CamelCase, MixedCase};
use std::fmt;

/// Identity of one catalog object: owning schema, containing object (package
/// or empty for top-level routines), procedure name, and overload tag
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProcedureIdentity {
	pub owner: String,
	pub object_name: String,
	pub name: String,
	/// Disambiguates same-named procedures with different signatures; empty
	/// when the name is unique
	pub overload: String,
}

impl ProcedureIdentity {
	/// Dot-joined non-empty name parts, as addressed in the call string
	pub fn qualified_name(&self) -> String {
		[&self.owner, &self.object_name, &self.name]
			.iter()
			.filter(|part| !part.is_empty())
			.map(|part| part.as_str())
			.collect::<Vec<_>>()
			.join(".")
	}
}

impl fmt::Display for ProcedureIdentity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.qualified_name())?;
		if !self.overload.is_empty() {
			write!(f, "#{}", self.overload)?;
		}
		Ok(())
	}
}

/// Everything rendering needs for one procedure/function/overload.
///
/// Built exactly once through [`Builder`]; the terminal [`Builder::build`]
/// step validates the argument list, compiles the call plan, and freezes the
/// result.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureDescriptor {
	identity: ProcedureIdentity,
	call_kind: CallKind,
	arguments: Vec<Argument>,
	call_plan: CallPlan,
}

impl ProcedureDescriptor {
	pub fn builder() -> Builder {
		Builder::default()
	}

	pub fn identity(&self) -> &ProcedureIdentity {
		&self.identity
	}

	pub fn call_kind(&self) -> CallKind {
		self.call_kind
	}

	pub fn arguments(&self) -> &[Argument] {
		&self.arguments
	}

	pub fn call_plan(&self) -> &CallPlan {
		&self.call_plan
	}

	/// Name of the generated per-call context class. The overload tag keeps
	/// distinct overloads on distinct class names.
	pub fn class_name(&self) -> String {
		join_non_empty(&[
			&self.identity.object_name,
			&self.identity.name,
			&self.identity.overload,
		])
		.to_camel_case()
	}

	/// Caller-facing method name on the generated wrapper class
	pub fn method_name(&self) -> String {
		let raw = join_non_empty(&[&self.identity.name, &self.identity.overload]);
		let name = raw.to_mixed_case();
		if super::argument::is_reserved_word(&name) {
			format!("{}Call", name)
		} else {
			name
		}
	}

	/// Property names of the IN and INOUT arguments, in catalog order; forms
	/// the caller-facing method signature
	pub fn in_property_names(&self) -> Vec<String> {
		self.arguments
			.iter()
			.filter(|arg| arg.is_input())
			.map(|arg| arg.host_property_name())
			.collect()
	}

	/// True when any argument binds a cursor/result set, which changes return
	/// handling in generated code
	pub fn has_result_set_argument(&self) -> bool {
		self.arguments.iter().any(|arg| {
			arg.bind_type() == BindType::Cursor || arg.resolved_host_type() == HOST_RESULT_SET
		})
	}

	/// Host type of the function's return slot; `None` for procedures
	pub fn return_host_type(&self) -> Option<String> {
		match self.call_kind {
			CallKind::Function => self.arguments.first().map(Argument::resolved_host_type),
			CallKind::Procedure => None,
		}
	}
}

/// Staged builder: identity fields accumulate, the call plan is computed at
/// the end, and no mutation is exposed afterwards
#[derive(Debug, Default)]
pub struct Builder {
	owner: String,
	object_name: String,
	name: String,
	overload: String,
	function: bool,
	arguments: Vec<Argument>,
}

impl Builder {
	pub fn owner(mut self, owner: impl Into<String>) -> Self {
		self.owner = owner.into();
		self
	}

	pub fn object_name(mut self, object_name: impl Into<String>) -> Self {
		self.object_name = object_name.into();
		self
	}

	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	pub fn overload(mut self, overload: impl Into<String>) -> Self {
		self.overload = overload.into();
		self
	}

	pub fn call_kind(mut self, call_kind: CallKind) -> Self {
		self.function = call_kind == CallKind::Function;
		self
	}

	pub fn argument(mut self, argument: Argument) -> Self {
		self.arguments.push(argument);
		self
	}

	pub fn arguments(mut self, arguments: Vec<Argument>) -> Self {
		self.arguments = arguments;
		self
	}

	pub fn build(self) -> Result<ProcedureDescriptor, GenError> {
		let identity = ProcedureIdentity {
			owner: self.owner,
			object_name: self.object_name,
			name: self.name,
			overload: self.overload,
		};
		let call_kind = if self.function {
			CallKind::Function
		} else {
			CallKind::Procedure
		};
		let call_plan = call_plan::compile(&identity, call_kind, &self.arguments)?;
		Ok(ProcedureDescriptor {
			identity,
			call_kind,
			arguments: self.arguments,
			call_plan,
		})
	}
}

fn join_non_empty(parts: &[&String]) -> String {
	parts
		.iter()
		.filter(|part| !part.is_empty())
		.map(|part| part.as_str())
		.collect::<Vec<_>>()
		.join("_")
}
