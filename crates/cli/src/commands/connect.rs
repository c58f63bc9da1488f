//! Run the connect handshake for a session token.

use std::sync::Arc;

use embed::{ConnectOptions, Connecting, Embed, ScreenSize};
use serde_json::json;
use tracing::info;

use crate::browser::{Launcher, SystemBrowser};
use crate::cli::CliFlow;
use crate::error::Result;
use crate::output::{OutputFormat, print_result};

/// Options for the connect command.
pub struct ConnectArgs {
	pub token: String,
	pub flow: Option<CliFlow>,
	pub redirect_url: Option<String>,
	pub screen: (u32, u32),
	pub dark: bool,
}

impl ConnectArgs {
	fn connect_options(&self) -> ConnectOptions {
		ConnectOptions {
			flow: self.flow.map(|flow| flow.as_str().to_string()),
			redirect_url: self.redirect_url.clone(),
		}
	}
}

/// Opens the session in the system browser and waits for the outcome.
///
/// In the popup flow this prints the connection id once the service reports
/// success. In the redirect flow the browser is sent to the session page and
/// the command returns immediately, since nothing will report back here.
pub async fn execute(embed_options: embed::EmbedOptions, args: ConnectArgs, format: OutputFormat) -> Result<()> {
	let options = args.connect_options();
	// Fail on bad input before looking for a browser.
	if args.token.is_empty() {
		return Err(embed::Error::Validation("Session token is required".into()).into());
	}
	options.resolve_flow()?;
	embed::normalize_host(embed_options.host())?;

	let launcher = Launcher::detect()?;
	info!(target = "embed-cli", launcher = ?launcher, "using browser");

	let (width, height) = args.screen;
	let platform = Arc::new(SystemBrowser::new(launcher, ScreenSize::new(width, height), args.dark));
	let embed = Embed::new(embed_options, platform)?;

	match embed.start(&args.token, &options)? {
		Connecting::Popup(pending) => {
			let connection = pending.wait().await?;
			print_result(&connection, format, |c| c.connection_id.clone())
		}
		Connecting::Redirect { url } => {
			let value = json!({ "redirected": true, "url": url.as_str() });
			print_result(&value, format, |_| format!("Opened {url}"))
		}
	}
}
