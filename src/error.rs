//! Error taxonomy for the generator
//!
//! Unrecognized native types are deliberately absent here: the type mapper
//! degrades them to a generic host type so a run never stops over a type it
//! has no mapping for. Everything procedure-scoped carries the qualified
//! procedure identity for diagnosis.

use std::{
	io,
	path::PathBuf,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
	/// The catalog rows for a procedure or function cannot form a valid call
	#[error("invalid procedure shape for {identity}: {reason}")]
	InvalidProcedureShape { identity: String, reason: String },

	/// A catalog query failed; retries belong to the connection layer
	#[error("catalog metadata query failed")]
	MetadataAccess(#[from] postgres::Error),

	/// A template failed to compile at startup
	#[error("template registration failed")]
	Template(#[from] Box<handlebars::TemplateError>),

	/// Rendering an artifact failed; aborts the whole run
	#[error("rendering {artifact} failed")]
	TemplateRender {
		artifact: String,
		#[source]
		source: handlebars::RenderError,
	},

	/// Writing a generated source file failed; aborts the whole run
	#[error("writing {} failed", path.display())]
	FileWrite {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("config file {}: {reason}", path.display())]
	Config { path: PathBuf, reason: String },
}

impl GenError {
	pub fn invalid_shape(identity: impl Into<String>, reason: impl Into<String>) -> Self {
		GenError::InvalidProcedureShape {
			identity: identity.into(),
			reason: reason.into(),
		}
	}
}
