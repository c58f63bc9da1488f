//! Wire types for the embed connect handshake.
//!
//! Two surfaces cross the process boundary during a `connect` call:
//!
//! - [`ChannelMessage`] - JSON objects pushed by the service over the push channel
//! - [`query`] - query parameters the client appends to the session URL
//!
//! Both are kept here so the server-facing vocabulary lives in one place and
//! the core crate only deals in typed values.

pub mod channel_message;
pub mod query;

pub use channel_message::ChannelMessage;
pub use query::{FLOW_POPUP, FLOW_REDIRECT, popup_params, redirect_params};
