//! WebSocket transport for the push channel.

use futures_util::StreamExt;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use url::Url;

use super::{ChannelConnector, ChannelFeed, Frame, PushChannel};

/// Connects push channels over WebSocket (`ws://` or `wss://`).
///
/// The connection runs on a task spawned onto the current tokio runtime.
/// Outside a runtime the returned channel ends immediately with a failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

impl ChannelConnector for WebSocketConnector {
	fn connect(&self, url: &Url) -> PushChannel {
		let (channel, feed) = PushChannel::pair(url.clone());
		match tokio::runtime::Handle::try_current() {
			Ok(runtime) => {
				runtime.spawn(pump(url.clone(), feed));
			}
			Err(err) => {
				warn!(target = "embed", url = %url, error = %err, "no tokio runtime for push channel");
				feed.fail(format!("no tokio runtime: {err}"));
			}
		}
		channel
	}
}

/// Forwards text frames from the socket to the channel until either side closes.
async fn pump(url: Url, feed: ChannelFeed) {
	let (inbound, mut shutdown) = feed.into_parts();

	let mut socket = tokio::select! {
		_ = &mut shutdown => {
			debug!(target = "embed", url = %url, "push channel closed before connecting");
			return;
		}
		result = tokio_tungstenite::connect_async(url.as_str()) => match result {
			Ok((socket, _response)) => socket,
			Err(err) => {
				warn!(target = "embed", url = %url, error = %err, "push channel connect failed");
				let _ = inbound.send(Frame::Failed(format!("failed to connect to {url}: {err}")));
				return;
			}
		},
	};

	info!(target = "embed", url = %url, "push channel connected");

	loop {
		tokio::select! {
			_ = &mut shutdown => {
				if let Err(err) = socket.close(None).await {
					debug!(target = "embed", error = %err, "close frame not delivered");
				}
				break;
			}
			frame = socket.next() => match frame {
				Some(Ok(Message::Text(text))) => {
					if inbound.send(Frame::Text(text)).is_err() {
						break;
					}
				}
				Some(Ok(Message::Close(_))) | None => {
					debug!(target = "embed", url = %url, "push channel closed by server");
					break;
				}
				Some(Ok(_)) => {}
				Some(Err(err)) => {
					warn!(target = "embed", url = %url, error = %err, "push channel read failed");
					let _ = inbound.send(Frame::Failed(err.to_string()));
					break;
				}
			},
		}
	}
}
