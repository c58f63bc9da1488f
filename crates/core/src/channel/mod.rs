//! Push channel carrying handshake messages from the service.
//!
//! A [`PushChannel`] is the client end of a full-duplex connection. It is
//! created by a [`ChannelConnector`], which returns immediately; the transport
//! connects and reads in the background and hands raw text payloads to the
//! channel as they arrive. The opposite end is a [`ChannelFeed`], held by the
//! transport task (or by a test).
//!
//! # Lifecycle
//!
//! ```text
//! connect() ──► PushChannel ◄── frames ── ChannelFeed ◄── transport
//!                   │                          ▲
//!                close() ────── shutdown ──────┘
//! ```
//!
//! Closing is idempotent and immediate: payloads still queued are discarded,
//! and the feed observes the shutdown so the transport can send a close frame.

mod websocket;

use std::ops::ControlFlow;

use tokio::sync::{mpsc, oneshot};
use tracing::debug;
use url::Url;

pub use websocket::WebSocketConnector;

/// Opens push channels.
pub trait ChannelConnector: Send + Sync {
	/// Starts connecting to `url` and returns without waiting for the transport.
	fn connect(&self, url: &Url) -> PushChannel;
}

#[derive(Debug)]
pub(crate) enum Frame {
	Text(String),
	Failed(String),
}

/// Client end of a push channel.
#[derive(Debug)]
pub struct PushChannel {
	url: Url,
	inbound: mpsc::UnboundedReceiver<Frame>,
	shutdown: Option<oneshot::Sender<()>>,
	failure: Option<String>,
}

impl PushChannel {
	/// Creates a channel and the feed that supplies it.
	pub fn pair(url: Url) -> (PushChannel, ChannelFeed) {
		let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
		let (shutdown_tx, shutdown_rx) = oneshot::channel();

		let channel = PushChannel {
			url,
			inbound: inbound_rx,
			shutdown: Some(shutdown_tx),
			failure: None,
		};
		let feed = ChannelFeed {
			inbound: inbound_tx,
			shutdown: shutdown_rx,
		};
		(channel, feed)
	}

	pub fn url(&self) -> &Url {
		&self.url
	}

	pub fn is_closed(&self) -> bool {
		self.shutdown.is_none()
	}

	/// Transport error that ended the channel, if any.
	pub fn failure(&self) -> Option<&str> {
		self.failure.as_deref()
	}

	/// Waits for the next raw payload.
	///
	/// Returns [`None`] once the channel is closed or the transport has ended.
	pub async fn recv(&mut self) -> Option<String> {
		if self.is_closed() || self.failure.is_some() {
			return None;
		}
		match self.inbound.recv().await? {
			Frame::Text(text) => Some(text),
			Frame::Failed(reason) => {
				self.failure = Some(reason);
				None
			}
		}
	}

	/// Invokes `callback` once per inbound payload, in arrival order.
	///
	/// Delivery stops when the callback returns [`ControlFlow::Break`], the
	/// channel is closed, or the transport ends.
	pub async fn on_message<F>(&mut self, mut callback: F)
	where
		F: FnMut(&str) -> ControlFlow<()>,
	{
		while let Some(raw) = self.recv().await {
			if callback(&raw).is_break() {
				break;
			}
		}
	}

	/// Terminates the channel. Safe to call more than once.
	pub fn close(&mut self) {
		if let Some(shutdown) = self.shutdown.take() {
			let _ = shutdown.send(());
			self.inbound.close();
			debug!(target = "embed", url = %self.url, "push channel closed");
		}
	}
}

impl Drop for PushChannel {
	fn drop(&mut self) {
		self.close();
	}
}

/// Transport end of a push channel.
#[derive(Debug)]
pub struct ChannelFeed {
	inbound: mpsc::UnboundedSender<Frame>,
	shutdown: oneshot::Receiver<()>,
}

impl ChannelFeed {
	/// Queues a raw payload. Returns false if the channel is already closed.
	pub fn send(&self, raw: impl Into<String>) -> bool {
		self.inbound.send(Frame::Text(raw.into())).is_ok()
	}

	/// Ends the channel with a transport error.
	pub fn fail(self, reason: impl Into<String>) {
		let _ = self.inbound.send(Frame::Failed(reason.into()));
	}

	/// Returns true once the client end has closed or been dropped.
	pub fn is_closed(&self) -> bool {
		self.inbound.is_closed()
	}

	/// Completes once the client end has closed or been dropped.
	pub async fn closed(&self) {
		self.inbound.closed().await
	}

	pub(crate) fn into_parts(self) -> (mpsc::UnboundedSender<Frame>, oneshot::Receiver<()>) {
		(self.inbound, self.shutdown)
	}
}
