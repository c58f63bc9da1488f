use clap::{Parser, Subcommand, ValueEnum};

use crate::output::OutputFormat;
use crate::styles::cli_styles;

/// Connect flow selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliFlow {
	/// Open the session in a popup and wait for the result
	Popup,
	/// Send the browser to the session page and exit
	Redirect,
}

impl CliFlow {
	pub fn as_str(self) -> &'static str {
		match self {
			CliFlow::Popup => embed::FLOW_POPUP,
			CliFlow::Redirect => embed::FLOW_REDIRECT,
		}
	}
}

#[derive(Parser, Debug)]
#[command(name = "embed")]
#[command(about = "Embed CLI - connect sessions through the Embed session UI")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: json (default) or text
	#[arg(short = 'f', long, global = true, value_enum, default_value = "json")]
	pub format: OutputFormat,

	/// API origin (defaults to https://api.useembed.com)
	#[arg(long, global = true, env = "EMBED_HOST", value_name = "URL")]
	pub host: Option<String>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Connect a session token and print the resulting connection id
	Connect {
		/// Session token issued by the Embed API
		token: String,

		/// Flow to use; defaults to popup unless --redirect-url is given
		#[arg(long, value_enum)]
		flow: Option<CliFlow>,

		/// URL the session page returns to after a redirect flow
		#[arg(long, value_name = "URL")]
		redirect_url: Option<String>,

		/// Screen size used to place the popup, as WIDTHxHEIGHT
		#[arg(long, value_name = "WxH", default_value = "1920x1080", value_parser = parse_screen)]
		screen: (u32, u32),

		/// Ask the session page for its dark theme
		#[arg(long, env = "EMBED_DARK_MODE")]
		dark: bool,
	},

	/// Print the URLs derived from the configured host
	Urls {
		/// Also print the session URL for this token
		token: Option<String>,
	},
}

fn parse_screen(value: &str) -> Result<(u32, u32), String> {
	let (width, height) = value
		.split_once(['x', 'X'])
		.ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value:?}"))?;
	let parse = |part: &str| {
		part.trim()
			.parse::<u32>()
			.map_err(|e| format!("invalid dimension {part:?}: {e}"))
	};
	Ok((parse(width)?, parse(height)?))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_connect_with_defaults() {
		let cli = Cli::try_parse_from(["embed", "connect", "tok"]).unwrap();
		match cli.command {
			Commands::Connect {
				token,
				flow,
				redirect_url,
				screen,
				dark,
			} => {
				assert_eq!(token, "tok");
				assert_eq!(flow, None);
				assert_eq!(redirect_url, None);
				assert_eq!(screen, (1920, 1080));
				assert!(!dark);
			}
			other => panic!("unexpected command: {other:?}"),
		}
	}

	#[test]
	fn parses_redirect_flow() {
		let cli = Cli::try_parse_from([
			"embed",
			"connect",
			"tok",
			"--flow",
			"redirect",
			"--redirect-url",
			"https://r",
		])
		.unwrap();
		let Commands::Connect { flow, redirect_url, .. } = cli.command else {
			panic!("expected connect");
		};
		assert_eq!(flow, Some(CliFlow::Redirect));
		assert_eq!(redirect_url.as_deref(), Some("https://r"));
	}

	#[test]
	fn rejects_unknown_flow() {
		assert!(Cli::try_parse_from(["embed", "connect", "tok", "--flow", "bogus"]).is_err());
	}

	#[test]
	fn screen_size_parsing() {
		assert_eq!(parse_screen("1280x720").unwrap(), (1280, 720));
		assert_eq!(parse_screen("800X600").unwrap(), (800, 600));
		assert!(parse_screen("800").is_err());
		assert!(parse_screen("axb").is_err());
	}

	#[test]
	fn verbosity_counts() {
		let cli = Cli::try_parse_from(["embed", "-vv", "urls"]).unwrap();
		assert_eq!(cli.verbose, 2);
	}
}
