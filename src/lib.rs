//! Connects to a database catalog and generates typed stored-procedure call
//! wrappers, context classes, and object-type converters from the metadata

pub mod catalog;

pub mod config;

pub mod error;

pub mod format;

pub mod generator;

pub mod model;

pub mod render;

pub mod snippets;

pub mod type_mapper;

use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(about = "Generates stored-procedure call wrappers from catalog metadata")]
pub struct Opt {
	/// Path to the generator configuration file
	#[structopt(short, long, default_value = "sp_bridge.toml", parse(from_os_str))]
	pub config: PathBuf,

	/// Overrides the connection string from the configuration file
	#[structopt(long)]
	pub connection: Option<String>,

	/// Skips the external formatter even when one is configured
	#[structopt(long)]
	pub no_format: bool,
}
