//! Public entry point for connecting a session.

use std::fmt;
use std::sync::Arc;

use tracing::info;
use url::Url;

use embed_protocol::redirect_params;

use crate::channel::{ChannelConnector, WebSocketConnector};
use crate::config::{ConnectOptions, DEFAULT_POPUP_HEIGHT, DEFAULT_POPUP_WIDTH, EmbedOptions, Flow};
use crate::error::{Error, Result};
use crate::handshake::{Connection, HandshakeSession, PendingConnection};
use crate::platform::{NavigationTarget, Platform};
use crate::popup::Popup;
use crate::url_builder::{self, append_params, derive_channel_base, normalize_host};

/// Client for establishing connections through the Embed session UI.
///
/// # Example
///
/// ```ignore
/// let embed = Embed::new(EmbedOptions::default(), platform)?;
/// let connection = embed.connect(&session_token, &ConnectOptions::default()).await?;
/// println!("connected: {}", connection.connection_id);
/// ```
#[derive(Clone)]
pub struct Embed {
	host_base: String,
	channel_base: Url,
	platform: Arc<dyn Platform>,
	connector: Arc<dyn ChannelConnector>,
}

/// A started `connect` call.
#[derive(Debug)]
pub enum Connecting {
	/// The popup is open and the handshake is running.
	Popup(PendingConnection),
	/// The hosting page was sent to the session; nothing will resolve here.
	Redirect { url: Url },
}

impl Embed {
	/// Builds a client, validating the configured host.
	///
	/// Push channels use [`WebSocketConnector`] unless replaced with
	/// [`with_connector`](Self::with_connector).
	pub fn new(options: EmbedOptions, platform: Arc<dyn Platform>) -> Result<Self> {
		let host_base = normalize_host(options.host())?;
		let channel_base = derive_channel_base(&host_base)?;

		Ok(Self {
			host_base,
			channel_base,
			platform,
			connector: Arc::new(WebSocketConnector),
		})
	}

	pub fn with_connector(mut self, connector: Arc<dyn ChannelConnector>) -> Self {
		self.connector = connector;
		self
	}

	/// Normalized HTTP base, without a trailing slash.
	pub fn host_base(&self) -> &str {
		&self.host_base
	}

	/// Push-channel URL derived from the host.
	pub fn channel_base(&self) -> &Url {
		&self.channel_base
	}

	/// URL of the session page for `session_token`.
	pub fn session_url(&self, session_token: &str) -> String {
		url_builder::session_url(&self.host_base, session_token)
	}

	/// Validates the request and starts the selected flow.
	///
	/// Empty tokens and unknown flows fail before any window or channel is
	/// opened. The popup flow spawns the handshake onto the current tokio
	/// runtime and returns [`Connecting::Popup`], failing with
	/// [`Error::Platform`] when called outside one. The redirect flow navigates
	/// the hosting page and returns [`Connecting::Redirect`].
	pub fn start(&self, session_token: &str, options: &ConnectOptions) -> Result<Connecting> {
		if session_token.is_empty() {
			return Err(Error::Validation("Session token is required".into()));
		}
		let flow = options.resolve_flow()?;
		let session_url = self.session_url(session_token);

		match flow {
			Flow::Popup => self.start_popup(session_url).map(Connecting::Popup),
			Flow::Redirect { redirect_url } => {
				let url = append_params(&session_url, redirect_params(redirect_url.as_deref()))?;
				info!(target = "embed", url = %url, "redirecting to session");
				self.platform.navigate(NavigationTarget::CurrentPage, &url)?;
				Ok(Connecting::Redirect { url })
			}
		}
	}

	/// Connects `session_token`, resolving once the service reports the outcome.
	///
	/// In the redirect flow the hosting page is navigated away and the returned
	/// future never completes.
	pub async fn connect(&self, session_token: &str, options: &ConnectOptions) -> Result<Connection> {
		match self.start(session_token, options)? {
			Connecting::Popup(pending) => pending.wait().await,
			Connecting::Redirect { .. } => std::future::pending().await,
		}
	}

	fn start_popup(&self, session_url: String) -> Result<PendingConnection> {
		let runtime = tokio::runtime::Handle::try_current()
			.map_err(|e| Error::Platform(format!("popup flow needs a tokio runtime: {e}")))?;
		let popup = Popup::open(self.platform.clone(), DEFAULT_POPUP_WIDTH, DEFAULT_POPUP_HEIGHT)?;
		let channel = self.connector.connect(&self.channel_base);
		info!(target = "embed", session_url = %session_url, channel = %self.channel_base, "starting popup handshake");

		let (session, pending) = HandshakeSession::new(session_url, popup, self.platform.clone());
		runtime.spawn(session.run(channel));
		Ok(pending)
	}
}

impl fmt::Debug for Embed {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Embed")
			.field("host_base", &self.host_base)
			.field("channel_base", &self.channel_base.as_str())
			.finish_non_exhaustive()
	}
}
