use sp_bridge::{
	catalog::PgCatalogClient,
	config::GeneratorConfig,
	error::GenError,
	format::{ExternalFormatter, NoopFormatter, SourceFormatter},
	generator::Generator,
	render::TemplateRenderer,
	Opt,
};
use structopt::StructOpt;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	let opt = Opt::from_args();
	if let Err(e) = run(opt) {
		error!("{}", e);
		std::process::exit(1);
	}
}

fn run(opt: Opt) -> Result<(), GenError> {
	let mut config = GeneratorConfig::from_file(&opt.config)?;
	if let Some(connection) = opt.connection {
		config.connection = connection;
	}

	let mut catalog = PgCatalogClient::connect(&config.connection)?;
	let renderer = TemplateRenderer::new()?;
	let formatter: Box<dyn SourceFormatter> = match &config.formatter {
		Some(command) if !opt.no_format => Box::new(ExternalFormatter::new(command.clone())),
		_ => Box::new(NoopFormatter),
	};

	Generator::new(&config, &renderer, formatter.as_ref()).run(&mut catalog)
}
