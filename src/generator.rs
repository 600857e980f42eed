//! Orchestrates catalog discovery, descriptor compilation, rendering, and
//! file output
//!
//! Per-procedure compilation has no cross-procedure dependency; everything is
//! keyed and emitted in (owner, object, procedure, overload) order so a rerun
//! against an identical catalog regenerates byte-identical sources.

use crate::{
	catalog::{ArgumentRow, CatalogReader, TypeAttributeRow},
	config::GeneratorConfig,
	error::GenError,
	format::SourceFormatter,
	model::{
		Argument, ProcedureDescriptor, ProcedureIdentity, TypeAttribute, TypeDescriptor,
	},
	render::Renderer,
	snippets,
};
use heck::CamelCase;
use serde_json::{json, Value};
use std::{collections::BTreeMap, fs, path::Path};
use tracing::info;

/// Groups raw catalog rows into compiled procedure descriptors, sorted by
/// (owner, object, procedure, overload)
pub fn assemble_descriptors(rows: Vec<ArgumentRow>) -> Result<Vec<ProcedureDescriptor>, GenError> {
	let mut grouped: BTreeMap<ProcedureIdentity, Vec<ArgumentRow>> = BTreeMap::new();
	for row in rows {
		let identity = ProcedureIdentity {
			owner: row.owner.clone(),
			object_name: row.object_name.clone(),
			name: row.procedure_name.clone(),
			overload: row.overload.clone(),
		};
		grouped.entry(identity).or_default().push(row);
	}

	let mut descriptors = Vec::with_capacity(grouped.len());
	for (identity, mut group) in grouped {
		group.sort_by_key(|row| row.sequence);
		let call_kind = group[0].call_kind;
		let mut arguments = Vec::with_capacity(group.len());
		for row in group {
			let argument = Argument::new(
				row.argument_name,
				row.native_type,
				row.udt_name,
				row.is_input,
				row.is_output,
				row.sequence,
			)
			.map_err(|e| GenError::invalid_shape(identity.to_string(), e.reason))?;
			arguments.push(argument);
		}
		let descriptor = ProcedureDescriptor::builder()
			.owner(identity.owner)
			.object_name(identity.object_name)
			.name(identity.name)
			.overload(identity.overload)
			.call_kind(call_kind)
			.arguments(arguments)
			.build()?;
		descriptors.push(descriptor);
	}
	Ok(descriptors)
}

pub struct Generator<'a> {
	config: &'a GeneratorConfig,
	renderer: &'a dyn Renderer,
	formatter: &'a dyn SourceFormatter,
}

impl<'a> Generator<'a> {
	pub fn new(
		config: &'a GeneratorConfig,
		renderer: &'a dyn Renderer,
		formatter: &'a dyn SourceFormatter,
	) -> Self {
		Generator {
			config,
			renderer,
			formatter,
		}
	}

	pub fn run(&self, catalog: &mut dyn CatalogReader) -> Result<(), GenError> {
		let rows = catalog.procedure_arguments(&self.config.objects)?;
		let descriptors = assemble_descriptors(rows)?;

		self.generate_entities(catalog)?;
		self.generate_contexts(&descriptors)?;
		self.generate_packages(&descriptors)?;
		self.generate_support()?;
		Ok(())
	}

	/// One data class and one converter per user-defined type
	fn generate_entities(&self, catalog: &mut dyn CatalogReader) -> Result<(), GenError> {
		info!("entity and converter generator");

		let mut owners: Vec<&str> = self
			.config
			.objects
			.iter()
			.map(|filter| filter.owner.as_str())
			.collect();
		owners.sort_unstable();
		owners.dedup();

		for owner in owners {
			let mut type_names = catalog.type_names(owner)?;
			type_names.sort_unstable();
			for type_name in type_names {
				let attributes = catalog.type_attributes(owner, &type_name)?;
				let descriptor = TypeDescriptor::new(
					type_name,
					attributes.into_iter().map(to_type_attribute).collect(),
				);

				let entity = self.renderer.render("data_class", &self.entity_context(&descriptor))?;
				self.write_source(
					&self.config.namespaces.entities,
					&descriptor.class_name(),
					&entity,
				)?;

				let converter =
					self.renderer.render("converter", &self.converter_context(&descriptor))?;
				self.write_source(
					&self.config.namespaces.converters,
					&format!("{}Converter", descriptor.class_name()),
					&converter,
				)?;
			}
		}
		Ok(())
	}

	/// One context data class per procedure/function/overload, holding every
	/// argument and the return slot as properties
	fn generate_contexts(&self, descriptors: &[ProcedureDescriptor]) -> Result<(), GenError> {
		info!("procedure context generator");

		for descriptor in descriptors {
			let rendered =
				self.renderer.render("data_class", &self.context_context(descriptor))?;
			self.write_source(
				&self.config.namespaces.contexts,
				&descriptor.class_name(),
				&rendered,
			)?;
		}
		Ok(())
	}

	/// One callable-statement wrapper class per container (package, or owning
	/// schema for top-level routines)
	fn generate_packages(&self, descriptors: &[ProcedureDescriptor]) -> Result<(), GenError> {
		info!("package object generator");

		let mut containers: BTreeMap<(String, String), Vec<&ProcedureDescriptor>> = BTreeMap::new();
		for descriptor in descriptors {
			let identity = descriptor.identity();
			let key = (identity.owner.clone(), identity.object_name.clone());
			containers.entry(key).or_default().push(descriptor);
		}

		for ((owner, object_name), members) in containers {
			let container = if object_name.is_empty() { owner } else { object_name };
			let class_name = format!("{}Package", container.to_camel_case());
			let context = self.package_context(&class_name, &members);
			let rendered = self.renderer.render("package", &context)?;
			self.write_source(&self.config.namespaces.packages, &class_name, &rendered)?;
		}
		Ok(())
	}

	/// Fixed helpers every generated tree carries: the shared call exception
	/// and the primitive-collection converter
	fn generate_support(&self) -> Result<(), GenError> {
		let exception_context = json!({
			"namespace": self.config.qualified_namespace(&self.config.namespaces.packages),
		});
		let rendered = self.renderer.render("call_exception", &exception_context)?;
		self.write_source(
			&self.config.namespaces.packages,
			"StoredProcedureCallException",
			&rendered,
		)?;

		let converter_context = json!({
			"namespace": self.config.qualified_namespace(&self.config.namespaces.converters),
		});
		let rendered = self.renderer.render("primitive_converter", &converter_context)?;
		self.write_source(
			&self.config.namespaces.converters,
			"PrimitiveTypeConverter",
			&rendered,
		)
	}

	fn entity_context(&self, descriptor: &TypeDescriptor) -> Value {
		let fields: Vec<Value> = descriptor
			.attributes()
			.iter()
			.map(|attr| {
				json!({
					"name": attr.field_name(),
					"nameBig": attr.field_name_big(),
					"type": attr.host_type(),
				})
			})
			.collect();
		json!({
			"namespace": self.config.qualified_namespace(&self.config.namespaces.entities),
			"className": descriptor.class_name(),
			"imports": [],
			"fields": fields,
		})
	}

	fn converter_context(&self, descriptor: &TypeDescriptor) -> Value {
		let fields: Vec<Value> = descriptor
			.attributes()
			.iter()
			.enumerate()
			.map(|(index, attr)| {
				let (get_expr, put_expr) = attribute_conversions(attr, index);
				json!({
					"nameBig": attr.field_name_big(),
					"getExpr": get_expr,
					"putExpr": put_expr,
				})
			})
			.collect();
		json!({
			"namespace": self.config.qualified_namespace(&self.config.namespaces.converters),
			"entityNamespace": self.config.qualified_namespace(&self.config.namespaces.entities),
			"className": descriptor.class_name(),
			"typeName": descriptor.name(),
			"fieldCount": descriptor.attributes().len(),
			"fields": fields,
		})
	}

	fn context_context(&self, descriptor: &ProcedureDescriptor) -> Value {
		let fields: Vec<Value> = descriptor
			.arguments()
			.iter()
			.map(|arg| {
				json!({
					"name": arg.host_property_name(),
					"nameBig": arg.host_property_name_big(),
					"type": arg.resolved_host_type(),
				})
			})
			.collect();
		json!({
			"namespace": self.config.qualified_namespace(&self.config.namespaces.contexts),
			"className": descriptor.class_name(),
			"imports": [
				format!("{}.*", self.config.qualified_namespace(&self.config.namespaces.entities)),
			],
			"fields": fields,
		})
	}

	fn package_context(&self, class_name: &str, members: &[&ProcedureDescriptor]) -> Value {
		let procedures: Vec<Value> = members
			.iter()
			.map(|descriptor| {
				let plan = descriptor.call_plan();
				let kind = descriptor.call_kind();
				let mut register = Vec::new();
				let mut set = Vec::new();
				let mut extract = Vec::new();
				for (arg, param) in descriptor.arguments().iter().zip(plan.parameters()) {
					register.extend(snippets::register_out(arg, param.position, kind));
					set.extend(snippets::set_in(arg, param.position, kind));
					extract.extend(snippets::extract_out(arg, param.position, kind));
				}
				let in_params: Vec<Value> = descriptor
					.arguments()
					.iter()
					.filter(|arg| arg.is_input())
					.map(|arg| {
						json!({
							"name": arg.host_property_name(),
							"nameBig": arg.host_property_name_big(),
							"type": arg.resolved_host_type(),
						})
					})
					.collect();
				json!({
					"methodName": descriptor.method_name(),
					"contextClass": descriptor.class_name(),
					"callString": plan.call_string(),
					"targetIdentifier": plan.target_identifier(),
					"needsReturn": plan.needs_return_value(),
					"inParams": in_params,
					"registerStatements": register,
					"setStatements": set,
					"extractStatements": extract,
				})
			})
			.collect();

		let (logging_initializer, logging_method) = match &self.config.logging {
			Some(hooks) if !hooks.method.is_empty() => {
				let initializer = if hooks.initializer.is_empty() {
					None
				} else {
					Some(hooks.initializer.replace("{}", class_name))
				};
				(initializer, Some(hooks.method.clone()))
			},
			_ => (None, None),
		};

		json!({
			"namespace": self.config.qualified_namespace(&self.config.namespaces.packages),
			"contextNamespace": self.config.qualified_namespace(&self.config.namespaces.contexts),
			"converterNamespace": self.config.qualified_namespace(&self.config.namespaces.converters),
			"entityNamespace": self.config.qualified_namespace(&self.config.namespaces.entities),
			"className": class_name,
			"loggingInitializer": logging_initializer,
			"loggingMethod": logging_method,
			"procedures": procedures,
		})
	}

	fn write_source(&self, sub_namespace: &str, class_name: &str, text: &str) -> Result<(), GenError> {
		let dir = self.config.namespace_dir(sub_namespace);
		let path = dir.join(format!("{}.java", class_name));
		let formatted = self.formatter.format(text);
		write_file(&dir, &path, &formatted)?;
		info!(" ... {}", class_name);
		Ok(())
	}
}

fn write_file(dir: &Path, path: &Path, text: &str) -> Result<(), GenError> {
	fs::create_dir_all(dir).map_err(|source| GenError::FileWrite {
		path: dir.to_owned(),
		source,
	})?;
	fs::write(path, text).map_err(|source| GenError::FileWrite {
		path: path.to_owned(),
		source,
	})
}

fn to_type_attribute(row: TypeAttributeRow) -> TypeAttribute {
	TypeAttribute {
		attr_name: row.attr_name,
		attr_type_name: row.attr_type_name,
		attr_no: row.attr_no,
		scale: row.scale,
		is_multi_type: row.is_multi_type,
		type_code: row.type_code,
		collection_element_type: row.collection_element_type,
	}
}

/// Expressions reading one attribute out of a database struct and writing it
/// back, spliced into the converter template
fn attribute_conversions(attr: &TypeAttribute, index: usize) -> (String, String) {
	let getter = format!("value.get{}()", attr.field_name_big());
	if attr.is_collection() {
		let element = attr.element_host_type().unwrap_or_default();
		if attr.is_primitive_collection() {
			(
				format!(
					"PrimitiveTypeConverter.asList((Array) attributes[{}], {}.class)",
					index, element
				),
				format!(
					"PrimitiveTypeConverter.toArray(connection, \"{}\", {})",
					attr.attr_type_name, getter
				),
			)
		} else {
			(
				format!("{}Converter.getObjectList((Array) attributes[{}])", element, index),
				format!(
					"{}Converter.toArray(connection, \"{}\", {})",
					element, attr.attr_type_name, getter
				),
			)
		}
	} else if attr.is_multi_type {
		let host = attr.host_type();
		(
			format!("{}Converter.getObject((Struct) attributes[{}])", host, index),
			format!("{}Converter.toStruct(connection, {})", host, getter),
		)
	} else {
		(
			format!("({}) attributes[{}]", attr.host_type(), index),
			getter,
		)
	}
}
