//! Intermediate model between catalog metadata and rendering

pub mod argument;
pub mod call_plan;
pub mod procedure;
pub mod type_attribute;

pub use argument::{Argument, ArgumentError, Direction, FUNCTION_RETURN_PROPERTY};
pub use call_plan::{compile, BindParameter, CallKind, CallPlan};
pub use procedure::{ProcedureDescriptor, ProcedureIdentity};
pub use type_attribute::{TypeAttribute, TypeDescriptor};
