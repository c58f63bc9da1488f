pub mod connect;
pub mod urls;

use embed::EmbedOptions;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use crate::output::OutputFormat;

use self::connect::ConnectArgs;

pub async fn dispatch(cli: Cli, format: OutputFormat) -> Result<()> {
	let options = EmbedOptions { host: cli.host };

	match cli.command {
		Commands::Connect {
			token,
			flow,
			redirect_url,
			screen,
			dark,
		} => {
			let args = ConnectArgs {
				token,
				flow,
				redirect_url,
				screen,
				dark,
			};
			connect::execute(options, args, format).await
		}
		Commands::Urls { token } => urls::execute(options, token.as_deref(), format),
	}
}
