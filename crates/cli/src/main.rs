use clap::Parser;
use embed_cli::{cli::Cli, commands, logging, output};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let format = cli.format;

	if let Err(err) = commands::dispatch(cli, format).await {
		output::print_error(&err, format);
		std::process::exit(1);
	}
}
