//! End-to-end run against an in-memory catalog: the full source tree is
//! generated into a temp directory and checked for shape, content, and
//! rerun determinism.

use sp_bridge::{
	catalog::{ArgumentRow, CatalogReader, TypeAttributeRow},
	config::{GeneratorConfig, LoggingHooks, Namespaces, ObjectFilter},
	error::GenError,
	format::NoopFormatter,
	generator::Generator,
	model::CallKind,
	render::TemplateRenderer,
};
use std::{
	collections::BTreeMap,
	fs,
	path::{Path, PathBuf},
};

struct FixtureCatalog {
	rows: Vec<ArgumentRow>,
	types: BTreeMap<String, Vec<TypeAttributeRow>>,
}

impl CatalogReader for FixtureCatalog {
	fn procedure_arguments(&mut self, filters: &[ObjectFilter]) -> Result<Vec<ArgumentRow>, GenError> {
		Ok(self
			.rows
			.iter()
			.filter(|row| filters.iter().any(|f| f.owner == row.owner))
			.cloned()
			.collect())
	}

	fn type_names(&mut self, _owner: &str) -> Result<Vec<String>, GenError> {
		Ok(self.types.keys().cloned().collect())
	}

	fn type_attributes(&mut self, _owner: &str, type_name: &str) -> Result<Vec<TypeAttributeRow>, GenError> {
		Ok(self.types.get(type_name).cloned().unwrap_or_default())
	}
}

fn arg(
	name: Option<&str>,
	procedure: &str,
	call_kind: CallKind,
	native: &str,
	udt: Option<&str>,
	mode: (bool, bool),
	sequence: u32,
) -> ArgumentRow {
	ArgumentRow {
		owner: "HR".to_owned(),
		object_name: "EMP_PKG".to_owned(),
		procedure_name: procedure.to_owned(),
		overload: String::new(),
		call_kind,
		argument_name: name.map(str::to_owned),
		native_type: native.to_owned(),
		udt_name: udt.map(str::to_owned),
		is_input: mode.0,
		is_output: mode.1,
		sequence,
	}
}

fn fixture_catalog() -> FixtureCatalog {
	let rows = vec![
		arg(None, "GET_SALARY", CallKind::Function, "NUMBER", None, (false, true), 0),
		arg(
			Some("P_EMP_ID"),
			"GET_SALARY",
			CallKind::Function,
			"NUMBER",
			None,
			(true, false),
			1,
		),
		arg(
			Some("P_EMP"),
			"SAVE_EMPLOYEE",
			CallKind::Procedure,
			"OBJECT",
			Some("T_EMPLOYEE"),
			(true, false),
			1,
		),
		arg(
			Some("P_STATUS"),
			"SAVE_EMPLOYEE",
			CallKind::Procedure,
			"VARCHAR2",
			None,
			(false, true),
			2,
		),
	];

	let mut types = BTreeMap::new();
	types.insert(
		"T_EMPLOYEE".to_owned(),
		vec![
			TypeAttributeRow {
				attr_name: "EMP_ID".to_owned(),
				attr_type_name: "NUMBER".to_owned(),
				attr_no: 1,
				scale: -1,
				is_multi_type: false,
				type_code: None,
				collection_element_type: None,
			},
			TypeAttributeRow {
				attr_name: "FIRST_NAME".to_owned(),
				attr_type_name: "VARCHAR2".to_owned(),
				attr_no: 2,
				scale: -1,
				is_multi_type: false,
				type_code: None,
				collection_element_type: None,
			},
		],
	);

	FixtureCatalog { rows, types }
}

fn config(source_root: &Path) -> GeneratorConfig {
	GeneratorConfig {
		connection: String::new(),
		source_root: source_root.to_owned(),
		root_namespace: "com.example.db".to_owned(),
		namespaces: Namespaces::default(),
		objects: vec![ObjectFilter {
			owner: "HR".to_owned(),
			name_like: "%".to_owned(),
		}],
		logging: Some(LoggingHooks {
			initializer:
				"private static final java.util.logging.Logger LOG = java.util.logging.Logger.getLogger({}.class.getName());"
					.to_owned(),
			method: "LOG.info".to_owned(),
		}),
		formatter: None,
	}
}

fn generate_into(source_root: &Path) {
	let config = config(source_root);
	let renderer = TemplateRenderer::new().unwrap();
	let mut catalog = fixture_catalog();
	Generator::new(&config, &renderer, &NoopFormatter)
		.run(&mut catalog)
		.unwrap();
}

fn collect_tree(root: &Path) -> BTreeMap<PathBuf, String> {
	let mut files = BTreeMap::new();
	let mut pending = vec![root.to_owned()];
	while let Some(dir) = pending.pop() {
		for entry in fs::read_dir(&dir).unwrap() {
			let path = entry.unwrap().path();
			if path.is_dir() {
				pending.push(path);
			} else {
				let text = fs::read_to_string(&path).unwrap();
				files.insert(path.strip_prefix(root).unwrap().to_owned(), text);
			}
		}
	}
	files
}

#[test]
fn generates_the_expected_source_tree() {
	let dir = tempfile::tempdir().unwrap();
	generate_into(dir.path());
	let files = collect_tree(dir.path());

	let base = PathBuf::from("com/example/db");
	for relative in [
		"entities/TEmployee.java",
		"converters/TEmployeeConverter.java",
		"converters/PrimitiveTypeConverter.java",
		"contexts/EmpPkgGetSalary.java",
		"contexts/EmpPkgSaveEmployee.java",
		"packages/EmpPkgPackage.java",
		"packages/StoredProcedureCallException.java",
	] {
		assert!(
			files.contains_key(&base.join(relative)),
			"missing {}, got {:?}",
			relative,
			files.keys().collect::<Vec<_>>()
		);
	}
}

#[test]
fn package_wrapper_carries_call_strings_and_hooks() {
	let dir = tempfile::tempdir().unwrap();
	generate_into(dir.path());
	let files = collect_tree(dir.path());

	let package = &files[&PathBuf::from("com/example/db/packages/EmpPkgPackage.java")];
	assert!(package.contains("package com.example.db.packages;"));
	assert!(package.contains("{ ? = call HR.EMP_PKG.GET_SALARY(?) }"));
	assert!(package.contains("{ call HR.EMP_PKG.SAVE_EMPLOYEE(?, ?) }"));
	assert!(package.contains("public static EmpPkgGetSalary getSalary(Connection connection, BigDecimal empId)"));
	assert!(package.contains("ctx.setFunctionReturn((BigDecimal) call.getObject(1));"));
	assert!(package.contains("TEmployeeConverter.toStruct(connection, ctx.getEmp())"));
	assert!(package.contains("LOG.info(\"call HR.EMP_PKG.GET_SALARY\");"));
	assert!(package.contains("LoggerFactory") == false);
	assert!(package.contains("getLogger(EmpPkgPackage.class.getName())"));
	assert!(package.contains("throw new StoredProcedureCallException"));
}

#[test]
fn context_and_entity_classes_expose_typed_properties() {
	let dir = tempfile::tempdir().unwrap();
	generate_into(dir.path());
	let files = collect_tree(dir.path());

	let context = &files[&PathBuf::from("com/example/db/contexts/EmpPkgGetSalary.java")];
	assert!(context.contains("private BigDecimal empId;"));
	assert!(context.contains("private BigDecimal functionReturn;"));
	assert!(context.contains("public BigDecimal getFunctionReturn() {"));

	let entity = &files[&PathBuf::from("com/example/db/entities/TEmployee.java")];
	assert!(entity.contains("public class TEmployee {"));
	assert!(entity.contains("private BigDecimal empId;"));
	assert!(entity.contains("private String firstName;"));

	let converter = &files[&PathBuf::from("com/example/db/converters/TEmployeeConverter.java")];
	assert!(converter.contains("public static final String TYPE_NAME = \"T_EMPLOYEE\";"));
	assert!(converter.contains("value.setEmpId((BigDecimal) attributes[0]);"));
	assert!(converter.contains("attributes[1] = value.getFirstName();"));
}

#[test]
fn reruns_are_byte_identical() {
	let first = tempfile::tempdir().unwrap();
	let second = tempfile::tempdir().unwrap();
	generate_into(first.path());
	generate_into(second.path());
	assert_eq!(collect_tree(first.path()), collect_tree(second.path()));
}
