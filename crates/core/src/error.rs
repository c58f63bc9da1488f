//! Error types for the connect handshake.

use thiserror::Error;

/// Result type alias for embed operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running a connect handshake.
#[derive(Debug, Error)]
pub enum Error {
	/// The configured host is not a usable absolute URL.
	#[error("Invalid host URL: {0}")]
	Configuration(String),

	/// The `connect` call was rejected before any popup or channel was opened.
	#[error("Invalid connect request: {0}")]
	Validation(String),

	/// The service reported an error over the push channel.
	#[error("{message}")]
	Handshake {
		/// Error description carried by the channel message.
		message: String,
	},

	/// The platform refused to open or navigate a window.
	#[error("Platform error: {0}")]
	Platform(String),

	/// Transport-level failure on the push channel.
	#[error("Channel error: {0}")]
	Channel(String),

	/// The push channel ended before the service sent a terminal message.
	#[error("Channel closed before the handshake completed")]
	ChannelClosed,

	/// URL parse error.
	#[error("URL error: {0}")]
	Url(#[from] url::ParseError),
}

impl Error {
	/// Returns true for errors raised while building an [`Embed`](crate::Embed) client.
	pub fn is_configuration(&self) -> bool {
		matches!(self, Error::Configuration(_))
	}

	/// Returns true for errors raised synchronously by `connect` argument checks.
	pub fn is_validation(&self) -> bool {
		matches!(self, Error::Validation(_))
	}

	/// Returns true if the service rejected the session over the channel.
	pub fn is_handshake(&self) -> bool {
		matches!(self, Error::Handshake { .. })
	}
}
