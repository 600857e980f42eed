//! Template rendering collaborator
//!
//! Descriptors are exposed to templates field-by-name as JSON values; the
//! shipped renderer registers the embedded template set at startup. A render
//! failure is fatal for the whole run.

use crate::error::GenError;
use handlebars::Handlebars;
use serde_json::Value;

pub trait Renderer {
	fn render(&self, template: &str, context: &Value) -> Result<String, GenError>;
}

const TEMPLATES: &[(&str, &str)] = &[
	("data_class", include_str!("../templates/data_class.hbs")),
	("converter", include_str!("../templates/converter.hbs")),
	("package", include_str!("../templates/package.hbs")),
	(
		"primitive_converter",
		include_str!("../templates/primitive_converter.hbs"),
	),
	("call_exception", include_str!("../templates/call_exception.hbs")),
];

pub struct TemplateRenderer {
	registry: Handlebars<'static>,
}

impl TemplateRenderer {
	pub fn new() -> Result<Self, GenError> {
		let mut registry = Handlebars::new();
		// generated text is source code, not markup
		registry.register_escape_fn(handlebars::no_escape);
		for (name, text) in TEMPLATES {
			registry
				.register_template_string(name, *text)
				.map_err(Box::new)?;
		}
		Ok(TemplateRenderer { registry })
	}
}

impl Renderer for TemplateRenderer {
	fn render(&self, template: &str, context: &Value) -> Result<String, GenError> {
		self.registry
			.render(template, context)
			.map_err(|source| GenError::TemplateRender {
				artifact: template.to_owned(),
				source,
			})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn embedded_templates_compile() {
		TemplateRenderer::new().unwrap();
	}

	#[test]
	fn data_class_renders_fields_and_accessors() {
		let renderer = TemplateRenderer::new().unwrap();
		let rendered = renderer
			.render(
				"data_class",
				&json!({
					"namespace": "com.example.db.contexts",
					"className": "EmpPkgGetSalary",
					"fields": [
						{ "name": "empId", "nameBig": "EmpId", "type": "BigDecimal" },
						{ "name": "salary", "nameBig": "Salary", "type": "BigDecimal" },
					],
				}),
			)
			.unwrap();
		assert!(rendered.contains("package com.example.db.contexts;"));
		assert!(rendered.contains("public class EmpPkgGetSalary {"));
		assert!(rendered.contains("private BigDecimal empId;"));
		assert!(rendered.contains("public void setSalary(BigDecimal salary) {"));
	}

	#[test]
	fn unknown_template_is_a_render_failure() {
		let renderer = TemplateRenderer::new().unwrap();
		let err = renderer.render("no_such_template", &json!({})).unwrap_err();
		assert!(matches!(err, GenError::TemplateRender { .. }));
	}
}
