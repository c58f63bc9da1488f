//! Show the URLs derived from the configured host.

use embed::{EmbedOptions, derive_channel_base, normalize_host, session_url};
use serde::Serialize;

use crate::error::Result;
use crate::output::{OutputFormat, print_result};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedUrls {
	pub host_base: String,
	pub channel_base: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub session_url: Option<String>,
}

pub fn derive(options: EmbedOptions, token: Option<&str>) -> Result<DerivedUrls> {
	let host_base = normalize_host(options.host())?;
	let channel_base = derive_channel_base(&host_base)?;
	Ok(DerivedUrls {
		session_url: token.filter(|t| !t.is_empty()).map(|t| session_url(&host_base, t)),
		channel_base: channel_base.to_string(),
		host_base,
	})
}

pub fn execute(options: EmbedOptions, token: Option<&str>, format: OutputFormat) -> Result<()> {
	let urls = derive(options, token)?;
	print_result(&urls, format, |u| {
		let mut text = format!("host:    {}\nchannel: {}", u.host_base, u.channel_base);
		if let Some(session) = &u.session_url {
			text.push_str(&format!("\nsession: {session}"));
		}
		text
	})
}
