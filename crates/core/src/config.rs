//! Client and per-call configuration.

use serde::{Deserialize, Serialize};

use embed_protocol::{FLOW_POPUP, FLOW_REDIRECT};

use crate::error::{Error, Result};

/// API origin used when no host is configured.
pub const DEFAULT_HOST: &str = "https://api.useembed.com";

/// Path of the push channel, resolved against the host.
pub const DEFAULT_CHANNEL_PATH: &str = "/";

/// Popup width requested by the handshake, in logical pixels.
pub const DEFAULT_POPUP_WIDTH: u32 = 500;

/// Popup height requested by the handshake, in logical pixels.
pub const DEFAULT_POPUP_HEIGHT: u32 = 600;

/// Options for constructing an [`Embed`](crate::Embed) client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedOptions {
	/// API origin for self-hosted deployments. Empty or absent means [`DEFAULT_HOST`].
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub host: Option<String>,
}

impl EmbedOptions {
	pub fn with_host(host: impl Into<String>) -> Self {
		Self {
			host: Some(host.into()),
		}
	}

	/// The configured host, falling back to [`DEFAULT_HOST`].
	pub fn host(&self) -> &str {
		match self.host.as_deref() {
			Some(host) if !host.is_empty() => host,
			_ => DEFAULT_HOST,
		}
	}
}

/// Options for a single `connect` call.
///
/// `flow` is kept as the caller supplied it so unknown values can be reported
/// as a validation error; [`ConnectOptions::resolve_flow`] turns it into a [`Flow`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectOptions {
	/// `"popup"` or `"redirect"`; unset picks based on `redirect_url`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub flow: Option<String>,
	/// Where the session page sends the browser after a redirect flow.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub redirect_url: Option<String>,
}

impl ConnectOptions {
	/// Forces the popup flow.
	pub fn popup() -> Self {
		Self {
			flow: Some(FLOW_POPUP.to_string()),
			redirect_url: None,
		}
	}

	/// Forces the redirect flow, returning to `redirect_url` when done.
	pub fn redirect(redirect_url: impl Into<String>) -> Self {
		Self {
			flow: Some(FLOW_REDIRECT.to_string()),
			redirect_url: Some(redirect_url.into()),
		}
	}

	pub fn with_flow(mut self, flow: impl Into<String>) -> Self {
		self.flow = Some(flow.into());
		self
	}

	pub fn with_redirect_url(mut self, redirect_url: impl Into<String>) -> Self {
		self.redirect_url = Some(redirect_url.into());
		self
	}

	/// Picks the flow for this call.
	///
	/// An explicit `flow` wins. Without one, a `redirect_url` selects the
	/// redirect flow and its absence selects the popup flow. Empty strings
	/// count as unset.
	pub fn resolve_flow(&self) -> Result<Flow> {
		let redirect_url = self.redirect_url.clone().filter(|url| !url.is_empty());

		match self.flow.as_deref().filter(|flow| !flow.is_empty()) {
			Some(FLOW_POPUP) => Ok(Flow::Popup),
			Some(FLOW_REDIRECT) => Ok(Flow::Redirect { redirect_url }),
			Some(other) => Err(Error::Validation(format!(
				"Invalid flow {other:?}, expected \"{FLOW_POPUP}\" or \"{FLOW_REDIRECT}\""
			))),
			None if redirect_url.is_some() => Ok(Flow::Redirect { redirect_url }),
			None => Ok(Flow::Popup),
		}
	}
}

/// How a `connect` call completes the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
	/// Open a popup and wait for the result over the push channel.
	Popup,
	/// Navigate the current page to the session, optionally returning to `redirect_url`.
	Redirect { redirect_url: Option<String> },
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_host_falls_back_to_default() {
		assert_eq!(EmbedOptions::default().host(), DEFAULT_HOST);
		assert_eq!(EmbedOptions::with_host("").host(), DEFAULT_HOST);
		assert_eq!(EmbedOptions::with_host("http://localhost:3000").host(), "http://localhost:3000");
	}

	#[test]
	fn unset_flow_without_redirect_url_is_popup() {
		assert_eq!(ConnectOptions::default().resolve_flow().unwrap(), Flow::Popup);
	}

	#[test]
	fn unset_flow_with_redirect_url_is_redirect() {
		let flow = ConnectOptions::default().with_redirect_url("https://r").resolve_flow().unwrap();
		assert_eq!(
			flow,
			Flow::Redirect {
				redirect_url: Some("https://r".into())
			}
		);
	}

	#[test]
	fn explicit_popup_ignores_redirect_url() {
		let flow = ConnectOptions::popup().with_redirect_url("https://r").resolve_flow().unwrap();
		assert_eq!(flow, Flow::Popup);
	}

	#[test]
	fn explicit_redirect_without_url() {
		let flow = ConnectOptions::default().with_flow("redirect").resolve_flow().unwrap();
		assert_eq!(flow, Flow::Redirect { redirect_url: None });
	}

	#[test]
	fn empty_strings_count_as_unset() {
		let options = ConnectOptions {
			flow: Some(String::new()),
			redirect_url: Some(String::new()),
		};
		assert_eq!(options.resolve_flow().unwrap(), Flow::Popup);
	}

	#[test]
	fn unknown_flow_is_a_validation_error() {
		let err = ConnectOptions::default().with_flow("bogus").resolve_flow().unwrap_err();
		assert!(err.is_validation());
		assert!(err.to_string().contains("bogus"));
	}

	#[test]
	fn connect_options_deserialize_camel_case() {
		let options: ConnectOptions =
			serde_json::from_str(r#"{"flow":"redirect","redirectUrl":"https://r"}"#).unwrap();
		assert_eq!(options, ConnectOptions::redirect("https://r"));
	}
}
