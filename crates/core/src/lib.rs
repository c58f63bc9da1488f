//! Embed connect client - popup and push-channel session handshake
//!
//! Connecting a session opens the Embed session page for a session token and
//! waits for the service to report the outcome:
//!
//! - **URL builder**: host normalization, push-channel URL, query parameters
//! - **Popup**: window placement and the popup's lifetime
//! - **Channel**: push channel delivering service messages (WebSocket by default)
//! - **Handshake**: state machine that steers the popup and resolves the call
//! - **Client**: [`Embed`], choosing between the popup and redirect flows
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   start()   ┌──────────┐  open/navigate  ┌──────────┐
//! │    Embed     │────────────►│  Popup   │────────────────►│ Platform │
//! └──────┬───────┘             └────▲─────┘                 └──────────┘
//!        │ connect()                │ navigate on ack
//! ┌──────▼───────┐  messages  ┌─────┴────────────┐
//! │ PushChannel  │───────────►│ HandshakeSession │──► PendingConnection
//! └──────────────┘            └──────────────────┘
//! ```
//!
//! The environment is reached only through [`Platform`], so the same handshake
//! runs in a browser binding, a desktop front end, or against
//! [`testing::FakePlatform`].

pub mod channel;
pub mod client;
pub mod config;
pub mod error;
pub mod handshake;
pub mod platform;
pub mod popup;
pub mod testing;
pub mod url_builder;

pub use channel::{ChannelConnector, ChannelFeed, PushChannel, WebSocketConnector};
pub use client::{Connecting, Embed};
pub use config::{
	ConnectOptions, DEFAULT_CHANNEL_PATH, DEFAULT_HOST, DEFAULT_POPUP_HEIGHT, DEFAULT_POPUP_WIDTH, EmbedOptions, Flow,
};
pub use embed_protocol::{ChannelMessage, FLOW_POPUP, FLOW_REDIRECT};
pub use error::{Error, Result};
pub use handshake::{Connection, HandshakeSession, HandshakeState, PendingConnection};
pub use platform::{NavigationTarget, Platform, ScreenSize, WindowHandle};
pub use popup::{Popup, WindowFeatures, WindowPlacement};
pub use url_builder::{append_params, derive_channel_base, normalize_host, session_url};
