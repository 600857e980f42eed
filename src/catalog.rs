//! Catalog metadata access
//!
//! The generator core consumes plain row shapes through [`CatalogReader`];
//! [`PgCatalogClient`] implements it over the standard `information_schema`
//! views with prepared statements. Metadata failures propagate unchanged:
//! retries belong here or below, never in the compiler.

use crate::{
	config::ObjectFilter,
	error::GenError,
	model::CallKind,
};
use postgres::{Client, NoTls, Statement};

/// One formal argument or return slot, in catalog-declared order. The return
/// slot of a function carries no argument name and sequence 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentRow {
	pub owner: String,
	pub object_name: String,
	pub procedure_name: String,
	pub overload: String,
	pub call_kind: CallKind,
	pub argument_name: Option<String>,
	pub native_type: String,
	pub udt_name: Option<String>,
	pub is_input: bool,
	pub is_output: bool,
	pub sequence: u32,
}

/// One attribute row of a user-defined type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAttributeRow {
	pub attr_name: String,
	pub attr_type_name: String,
	pub attr_no: u32,
	pub scale: i32,
	pub is_multi_type: bool,
	pub type_code: Option<String>,
	pub collection_element_type: Option<String>,
}

/// Metadata collaborator consumed by the orchestrator
pub trait CatalogReader {
	/// Ordered argument rows for every procedure/function/overload selected
	/// by the filters
	fn procedure_arguments(&mut self, filters: &[ObjectFilter]) -> Result<Vec<ArgumentRow>, GenError>;

	/// Names of the user-defined object types owned by `owner`
	fn type_names(&mut self, owner: &str) -> Result<Vec<String>, GenError>;

	/// Attribute rows of one user-defined type, in attribute order
	fn type_attributes(&mut self, owner: &str, type_name: &str) -> Result<Vec<TypeAttributeRow>, GenError>;
}

const GET_ROUTINES: &str = "
SELECT r.routine_name::text,
       r.specific_name::text,
       r.routine_type::text,
       COALESCE(r.data_type, '')::text,
       COALESCE(r.type_udt_name, '')::text
FROM information_schema.routines r
WHERE r.routine_schema = $1
  AND r.routine_name LIKE $2
  AND r.routine_type IN ('PROCEDURE', 'FUNCTION')
ORDER BY r.routine_name, r.specific_name";

const GET_PARAMETERS: &str = "
SELECT p.parameter_name::text,
       p.data_type::text,
       COALESCE(p.udt_name, '')::text,
       p.parameter_mode::text,
       p.ordinal_position::int
FROM information_schema.parameters p
WHERE p.specific_schema = $1
  AND p.specific_name = $2
ORDER BY p.ordinal_position";

const GET_TYPE_NAMES: &str = "
SELECT t.user_defined_type_name::text
FROM information_schema.user_defined_types t
WHERE t.user_defined_type_schema = $1
ORDER BY t.user_defined_type_name";

const GET_ATTRIBUTES: &str = "
SELECT a.attribute_name::text,
       a.data_type::text,
       COALESCE(a.attribute_udt_name, '')::text,
       a.ordinal_position::int,
       COALESCE(a.numeric_scale, -1)::int,
       COALESCE(e.udt_name, '')::text
FROM information_schema.attributes a
LEFT JOIN information_schema.element_types e
  ON e.object_schema = a.udt_schema
 AND e.object_name = a.udt_name
 AND e.object_type = 'USER-DEFINED TYPE'
 AND e.collection_type_identifier = a.dtd_identifier
WHERE a.udt_schema = $1
  AND a.udt_name = $2
ORDER BY a.ordinal_position";

/// Catalog client over a live database connection
pub struct PgCatalogClient {
	client: Client,
	routines_stmt: Statement,
	parameters_stmt: Statement,
	type_names_stmt: Statement,
	attributes_stmt: Statement,
}

impl PgCatalogClient {
	pub fn connect(conninfo: &str) -> Result<Self, GenError> {
		let mut client = Client::connect(conninfo, NoTls)?;
		let routines_stmt = client.prepare(GET_ROUTINES)?;
		let parameters_stmt = client.prepare(GET_PARAMETERS)?;
		let type_names_stmt = client.prepare(GET_TYPE_NAMES)?;
		let attributes_stmt = client.prepare(GET_ATTRIBUTES)?;
		Ok(PgCatalogClient {
			client,
			routines_stmt,
			parameters_stmt,
			type_names_stmt,
			attributes_stmt,
		})
	}

	fn routine_rows(
		&mut self,
		owner: &str,
		routine: &Routine,
		overload: &str,
	) -> Result<Vec<ArgumentRow>, GenError> {
		let mut rows = Vec::new();

		let call_kind = if routine.is_function() {
			CallKind::Function
		} else {
			CallKind::Procedure
		};

		if call_kind == CallKind::Function {
			let (native_type, udt_name) =
				normalize_native(&routine.return_type, &routine.return_udt);
			rows.push(ArgumentRow {
				owner: owner.to_owned(),
				object_name: String::new(),
				procedure_name: routine.name.clone(),
				overload: overload.to_owned(),
				call_kind,
				argument_name: None,
				native_type,
				udt_name,
				is_input: false,
				is_output: true,
				sequence: 0,
			});
		}

		for row in self
			.client
			.query(&self.parameters_stmt, &[&owner, &routine.specific_name])?
		{
			let argument_name: Option<String> = row.get(0);
			let data_type: String = row.get(1);
			let udt: String = row.get(2);
			let mode: String = row.get(3);
			let position: i32 = row.get(4);

			let (native_type, udt_name) = normalize_native(&data_type, &udt);
			let (is_input, is_output) = match mode.as_str() {
				"OUT" => (false, true),
				"INOUT" => (true, true),
				_ => (true, false),
			};
			rows.push(ArgumentRow {
				owner: owner.to_owned(),
				object_name: String::new(),
				procedure_name: routine.name.clone(),
				overload: overload.to_owned(),
				call_kind,
				argument_name: argument_name.map(|n| n.to_uppercase()),
				native_type,
				udt_name,
				is_input,
				is_output,
				sequence: position as u32,
			});
		}

		Ok(rows)
	}
}

struct Routine {
	name: String,
	specific_name: String,
	routine_type: String,
	return_type: String,
	return_udt: String,
}

impl Routine {
	/// A function returning nothing binds like a procedure
	fn is_function(&self) -> bool {
		self.routine_type == "FUNCTION" && self.return_type != "void"
	}
}

impl CatalogReader for PgCatalogClient {
	fn procedure_arguments(&mut self, filters: &[ObjectFilter]) -> Result<Vec<ArgumentRow>, GenError> {
		let mut all_rows = Vec::new();

		for filter in filters {
			let routines: Vec<Routine> = self
				.client
				.query(&self.routines_stmt, &[&filter.owner, &filter.name_like])?
				.iter()
				.map(|row| Routine {
					name: row.get::<_, String>(0).to_uppercase(),
					specific_name: row.get(1),
					routine_type: row.get(2),
					return_type: row.get(3),
					return_udt: row.get(4),
				})
				.collect();

			// same-named routines get 1-based overload tags
			for (index, routine) in routines.iter().enumerate() {
				let overloaded = routines
					.iter()
					.filter(|other| other.name == routine.name)
					.count() > 1;
				let overload = if overloaded {
					let nth = routines[..index]
						.iter()
						.filter(|other| other.name == routine.name)
						.count() + 1;
					nth.to_string()
				} else {
					String::new()
				};
				let rows = self.routine_rows(&filter.owner, routine, &overload)?;
				all_rows.extend(rows);
			}
		}

		Ok(all_rows)
	}

	fn type_names(&mut self, owner: &str) -> Result<Vec<String>, GenError> {
		Ok(self
			.client
			.query(&self.type_names_stmt, &[&owner])?
			.iter()
			.map(|row| row.get::<_, String>(0).to_uppercase())
			.collect())
	}

	fn type_attributes(&mut self, owner: &str, type_name: &str) -> Result<Vec<TypeAttributeRow>, GenError> {
		// catalog identifiers are stored folded to lower case here
		let udt = type_name.to_lowercase();
		Ok(self
			.client
			.query(&self.attributes_stmt, &[&owner, &udt])?
			.iter()
			.map(|row| {
				let attr_name: String = row.get(0);
				let data_type: String = row.get(1);
				let attr_udt: String = row.get(2);
				let attr_no: i32 = row.get(3);
				let scale: i32 = row.get(4);
				let element: String = row.get(5);

				let is_multi_type = data_type == "USER-DEFINED" || data_type == "ARRAY";
				let type_code = match data_type.as_str() {
					"USER-DEFINED" => Some("OBJECT".to_owned()),
					"ARRAY" => Some("COLLECTION".to_owned()),
					_ => None,
				};
				let (attr_type_name, _) = normalize_native(&data_type, &attr_udt);
				TypeAttributeRow {
					attr_name: attr_name.to_uppercase(),
					attr_type_name: if is_multi_type {
						attr_udt.trim_start_matches('_').to_uppercase()
					} else {
						attr_type_name
					},
					attr_no: attr_no as u32,
					scale,
					is_multi_type,
					type_code,
					collection_element_type: if element.is_empty() {
						None
					} else {
						Some(element.trim_start_matches('_').to_uppercase())
					},
				}
			})
			.collect())
	}
}

/// Folds a reported data type and UDT name into the vocabulary's shape:
/// structured types become `OBJECT`/`TABLE` plus the declared type name,
/// scalars keep their (upper-cased) reported name
fn normalize_native(data_type: &str, udt_name: &str) -> (String, Option<String>) {
	match data_type {
		"USER-DEFINED" => ("OBJECT".to_owned(), non_empty_upper(udt_name)),
		"ARRAY" => (
			"TABLE".to_owned(),
			non_empty_upper(udt_name.trim_start_matches('_')),
		),
		other => (other.to_uppercase(), None),
	}
}

fn non_empty_upper(name: &str) -> Option<String> {
	if name.is_empty() {
		None
	} else {
		Some(name.to_uppercase())
	}
}
