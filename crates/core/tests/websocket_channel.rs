//! WebSocket push channel against a local tungstenite server.

use std::sync::Arc;

use embed::testing::FakePlatform;
use embed::{ChannelConnector, ConnectOptions, Embed, EmbedOptions, WebSocketConnector};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

async fn bind() -> (TcpListener, String) {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	(listener, addr.to_string())
}

#[tokio::test]
async fn forwards_text_frames_and_sends_close() {
	let (listener, addr) = bind().await;

	let server = tokio::spawn(async move {
		let (stream, _) = listener.accept().await.unwrap();
		let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
		ws.send(Message::Text("first".into())).await.unwrap();
		ws.send(Message::Binary(vec![1, 2, 3])).await.unwrap();
		ws.send(Message::Text("second".into())).await.unwrap();

		while let Some(frame) = ws.next().await {
			match frame {
				Ok(Message::Close(_)) => return true,
				Ok(_) => continue,
				Err(_) => break,
			}
		}
		false
	});

	let url = Url::parse(&format!("ws://{addr}/")).unwrap();
	let mut channel = WebSocketConnector.connect(&url);

	assert_eq!(channel.recv().await.as_deref(), Some("first"));
	assert_eq!(channel.recv().await.as_deref(), Some("second"));

	channel.close();
	assert!(server.await.unwrap(), "server should observe a close frame");
}

#[tokio::test]
async fn unreachable_server_ends_channel_with_failure() {
	let (listener, addr) = bind().await;
	drop(listener);

	let url = Url::parse(&format!("ws://{addr}/")).unwrap();
	let mut channel = WebSocketConnector.connect(&url);

	assert_eq!(channel.recv().await, None);
	assert!(channel.failure().is_some());
}

#[tokio::test]
async fn popup_handshake_over_websocket() {
	let (listener, addr) = bind().await;

	tokio::spawn(async move {
		let (stream, _) = listener.accept().await.unwrap();
		let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
		ws.send(Message::Text(r#"{"message_type":"connection_ack","ws_client_id":"w1"}"#.into()))
			.await
			.unwrap();
		ws.send(Message::Text(r#"{"message_type":"success","connection_id":"c1"}"#.into()))
			.await
			.unwrap();
		while let Some(Ok(frame)) = ws.next().await {
			if frame.is_close() {
				break;
			}
		}
	});

	let platform = Arc::new(FakePlatform::new().with_dark_mode(true));
	let embed = Embed::new(EmbedOptions::with_host(format!("http://{addr}/")), platform.clone()).unwrap();
	assert_eq!(embed.channel_base().as_str(), format!("ws://{addr}/"));

	let connection = embed.connect("tok", &ConnectOptions::default()).await.unwrap();

	assert_eq!(connection.connection_id, "c1");
	let navigations = platform.popup_navigations();
	assert_eq!(navigations.len(), 1);
	assert_eq!(
		navigations[0].as_str(),
		format!("http://{addr}/session/tok?flow=popup&ws_client_id=w1&prefers_dark_mode=true")
	);
}

#[test]
fn connect_outside_runtime_fails_the_channel() {
	let url = Url::parse("ws://127.0.0.1:9/").unwrap();
	let mut channel = WebSocketConnector.connect(&url);

	let runtime = tokio::runtime::Runtime::new().unwrap();
	assert_eq!(runtime.block_on(channel.recv()), None);
	assert!(channel.failure().unwrap().contains("no tokio runtime"));
}
