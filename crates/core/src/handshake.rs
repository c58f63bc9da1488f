//! Session handshake state machine.
//!
//! One [`HandshakeSession`] owns the popup and consumes the push channel for a
//! single popup-flow `connect` call. Messages move it through:
//!
//! ```text
//!                connection_ack (navigate popup)
//!                  ┌──────────┐
//!                  ▼          │
//! AwaitingAck ──► AwaitingTerminal ──► Resolved
//!      │                 error/success  ▲
//!      └────────────────────────────────┘
//! ```
//!
//! The caller holds the matching [`PendingConnection`]. The session resolves
//! it exactly once: on the first `error` or `success` message, or with
//! [`Error::ChannelClosed`] if the channel ends first. Nothing detects the
//! user closing the popup, and no timeout is applied.

use std::ops::ControlFlow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use embed_protocol::{ChannelMessage, popup_params};

use crate::channel::PushChannel;
use crate::error::{Error, Result};
use crate::platform::Platform;
use crate::popup::Popup;
use crate::url_builder::append_params;

/// An established connection, the value a successful `connect` resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
	/// Opaque id of the connection, for later API calls.
	pub connection_id: String,
}

/// Where a [`HandshakeSession`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
	/// Waiting for the service to acknowledge the channel.
	AwaitingAck,
	/// Acknowledged; the popup shows the session page.
	AwaitingTerminal,
	/// A terminal message arrived or the channel ended.
	Resolved,
}

/// Single-use sender for the handshake outcome.
///
/// The sender is taken on first use, so a second resolution is a no-op.
#[derive(Debug)]
struct Resolver {
	tx: Option<oneshot::Sender<Result<Connection>>>,
}

impl Resolver {
	fn resolve(&mut self, outcome: Result<Connection>) -> bool {
		match self.tx.take() {
			Some(tx) => {
				// The caller may have dropped its PendingConnection.
				let _ = tx.send(outcome);
				true
			}
			None => false,
		}
	}
}

/// Caller's handle on an in-flight popup handshake.
#[derive(Debug)]
pub struct PendingConnection {
	rx: oneshot::Receiver<Result<Connection>>,
}

impl PendingConnection {
	/// Waits for the handshake to finish.
	pub async fn wait(self) -> Result<Connection> {
		self.rx.await.unwrap_or(Err(Error::ChannelClosed))
	}

	/// Returns the outcome if the handshake has already finished.
	pub fn try_result(&mut self) -> Option<Result<Connection>> {
		match self.rx.try_recv() {
			Ok(outcome) => Some(outcome),
			Err(oneshot::error::TryRecvError::Empty) => None,
			Err(oneshot::error::TryRecvError::Closed) => Some(Err(Error::ChannelClosed)),
		}
	}
}

/// Runtime state of one popup handshake.
pub struct HandshakeSession {
	session_url: String,
	popup: Popup,
	platform: Arc<dyn Platform>,
	state: HandshakeState,
	resolver: Resolver,
}

impl HandshakeSession {
	/// Creates a session for `session_url` driving `popup`.
	pub fn new(session_url: impl Into<String>, popup: Popup, platform: Arc<dyn Platform>) -> (Self, PendingConnection) {
		let (tx, rx) = oneshot::channel();
		let session = Self {
			session_url: session_url.into(),
			popup,
			platform,
			state: HandshakeState::AwaitingAck,
			resolver: Resolver { tx: Some(tx) },
		};
		(session, PendingConnection { rx })
	}

	pub fn state(&self) -> HandshakeState {
		self.state
	}

	pub fn popup(&self) -> &Popup {
		&self.popup
	}

	/// Applies one raw channel payload.
	///
	/// Returns [`ControlFlow::Break`] once the session is resolved and the
	/// channel should be closed.
	pub fn handle_message(&mut self, raw: &str) -> ControlFlow<()> {
		if self.state == HandshakeState::Resolved {
			debug!(target = "embed", "ignoring channel message after resolution");
			return ControlFlow::Break(());
		}

		let message = match ChannelMessage::parse(raw) {
			Ok(message) => message,
			Err(err) => {
				warn!(target = "embed", error = %err, "ignoring malformed channel message");
				return ControlFlow::Continue(());
			}
		};
		debug!(target = "embed", kind = message.kind(), "channel message");
		let terminal = message.is_terminal();

		match message {
			ChannelMessage::ConnectionAck { ws_client_id } => self.acknowledge(&ws_client_id),
			ChannelMessage::Error { error } => {
				info!(target = "embed", error = %error, "session failed");
				self.finish(Err(Error::Handshake { message: error }));
			}
			ChannelMessage::Success { connection_id } => {
				info!(target = "embed", connection_id = %connection_id, "session connected");
				self.finish(Ok(Connection { connection_id }));
			}
			ChannelMessage::Unknown => {}
		}

		if terminal { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
	}

	/// Consumes `channel` until the session resolves, then closes it.
	pub async fn run(mut self, mut channel: PushChannel) {
		channel.on_message(|raw| self.handle_message(raw)).await;
		channel.close();

		if self.state != HandshakeState::Resolved {
			let err = match channel.failure() {
				Some(reason) => Error::Channel(reason.to_string()),
				None => Error::ChannelClosed,
			};
			warn!(target = "embed", error = %err, "push channel ended before the session resolved");
			self.finish(Err(err));
		}
	}

	fn acknowledge(&mut self, ws_client_id: &str) {
		let params = popup_params(ws_client_id, self.platform.prefers_dark_mode());
		match append_params(&self.session_url, params) {
			Ok(url) => {
				if let Err(err) = self.popup.navigate(&url) {
					warn!(target = "embed", error = %err, "failed to navigate popup");
				}
			}
			Err(err) => warn!(target = "embed", error = %err, "failed to build popup URL"),
		}
		self.state = HandshakeState::AwaitingTerminal;
	}

	fn finish(&mut self, outcome: Result<Connection>) {
		self.state = HandshakeState::Resolved;
		if !self.resolver.resolve(outcome) {
			debug!(target = "embed", "handshake already resolved");
		}
	}
}
