//! Generator configuration, loaded from a TOML file

use crate::error::GenError;
use serde::Deserialize;
use std::{
	fs,
	path::{Path, PathBuf},
};

/// Selects the catalog objects to generate wrappers for
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ObjectFilter {
	/// Owning schema
	pub owner: String,
	/// SQL LIKE pattern on the object name
	#[serde(default = "default_name_like")]
	pub name_like: String,
}

fn default_name_like() -> String {
	"%".to_owned()
}

/// Sub-namespaces the generated artifacts are placed under
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Namespaces {
	pub entities: String,
	pub converters: String,
	pub contexts: String,
	pub packages: String,
}

impl Default for Namespaces {
	fn default() -> Self {
		Namespaces {
			entities: "entities".to_owned(),
			converters: "converters".to_owned(),
			contexts: "contexts".to_owned(),
			packages: "packages".to_owned(),
		}
	}
}

/// Call-site logging hooks, spliced verbatim into generated sources as opaque
/// text
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingHooks {
	/// Class-level initializer statement; `{}` is replaced with the generated
	/// class name
	pub initializer: String,
	/// Method invoked with a description of each call
	pub method: String,
}

/// External formatter the generated sources are piped through
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FormatterCommand {
	pub command: String,
	#[serde(default)]
	pub args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GeneratorConfig {
	/// Connection string for the catalog database
	pub connection: String,
	/// Root directory the generated source tree is written under
	pub source_root: PathBuf,
	/// Dot-separated root namespace of all generated artifacts
	pub root_namespace: String,
	#[serde(default)]
	pub namespaces: Namespaces,
	#[serde(default)]
	pub objects: Vec<ObjectFilter>,
	#[serde(default)]
	pub logging: Option<LoggingHooks>,
	#[serde(default)]
	pub formatter: Option<FormatterCommand>,
}

impl GeneratorConfig {
	pub fn from_file(path: &Path) -> Result<Self, GenError> {
		let text = fs::read_to_string(path).map_err(|e| GenError::Config {
			path: path.to_owned(),
			reason: e.to_string(),
		})?;
		toml::from_str(&text).map_err(|e| GenError::Config {
			path: path.to_owned(),
			reason: e.to_string(),
		})
	}

	/// Fully qualified namespace of one artifact group
	pub fn qualified_namespace(&self, sub: &str) -> String {
		format!("{}.{}", self.root_namespace, sub)
	}

	/// Output directory of one artifact group
	pub fn namespace_dir(&self, sub: &str) -> PathBuf {
		let mut dir = self.source_root.clone();
		for part in self.root_namespace.split('.').chain(sub.split('.')) {
			dir.push(part);
		}
		dir
	}
}
