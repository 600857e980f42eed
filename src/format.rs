//! Source reformatting collaborator
//!
//! Generated text is piped through an external formatter command when one is
//! configured. Formatting is best-effort: if the command is missing or
//! fails, the unformatted source is kept and the run continues.

use crate::config::FormatterCommand;
use std::{
	io::Write,
	process::{Command, Stdio},
};
use tracing::warn;

pub trait SourceFormatter {
	fn format(&self, source: &str) -> String;
}

/// Keeps sources exactly as rendered
pub struct NoopFormatter;

impl SourceFormatter for NoopFormatter {
	fn format(&self, source: &str) -> String {
		source.to_owned()
	}
}

/// Pipes sources through the configured external command
pub struct ExternalFormatter {
	command: FormatterCommand,
}

impl ExternalFormatter {
	pub fn new(command: FormatterCommand) -> Self {
		ExternalFormatter { command }
	}

	fn try_format(&self, source: &str) -> Option<String> {
		let mut child = Command::new(&self.command.command)
			.args(&self.command.args)
			.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.spawn()
			.map_err(|e| warn!("failed to spawn {}: {}", self.command.command, e))
			.ok()?;

		child
			.stdin
			.as_mut()?
			.write_all(source.as_bytes())
			.map_err(|e| warn!("failed to feed {}: {}", self.command.command, e))
			.ok()?;

		let output = child
			.wait_with_output()
			.map_err(|e| warn!("{} did not finish: {}", self.command.command, e))
			.ok()?;
		if !output.status.success() {
			warn!(
				"{} exited with {:?}: {}",
				self.command.command,
				output.status.code(),
				String::from_utf8_lossy(&output.stderr)
			);
			return None;
		}
		String::from_utf8(output.stdout).ok()
	}
}

impl SourceFormatter for ExternalFormatter {
	fn format(&self, source: &str) -> String {
		match self.try_format(source) {
			Some(formatted) => formatted,
			None => source.to_owned(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn noop_formatter_is_identity() {
		assert_eq!(NoopFormatter.format("class A {}"), "class A {}");
	}

	#[test]
	fn missing_command_falls_back_to_the_input() {
		let formatter = ExternalFormatter::new(FormatterCommand {
			command: "definitely-not-a-real-formatter".to_owned(),
			args: Vec::new(),
		});
		assert_eq!(formatter.format("class A {}"), "class A {}");
	}

	#[test]
	fn cat_passes_sources_through() {
		let formatter = ExternalFormatter::new(FormatterCommand {
			command: "cat".to_owned(),
			args: Vec::new(),
		});
		assert_eq!(formatter.format("class A {}\n"), "class A {}\n");
	}
}
