//! Messages pushed by the service over the handshake channel.
//!
//! The service drives the handshake by sending JSON objects tagged with a
//! `message_type` field:
//!
//! 1. [`ChannelMessage::ConnectionAck`] once the channel is registered, carrying
//!    the channel client id the popup must present to the session page
//! 2. [`ChannelMessage::Success`] or [`ChannelMessage::Error`] once the user
//!    finishes (or abandons) the flow in the popup
//!
//! Kinds this client does not know decode to [`ChannelMessage::Unknown`] so a
//! newer service can add messages without breaking older clients.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Message received from the service over the push channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "message_type", rename_all = "snake_case")]
pub enum ChannelMessage {
	/// The service registered this channel and assigned it a client id.
	ConnectionAck {
		/// Identifier the session page uses to address this channel.
		#[serde(default, deserialize_with = "lenient_string")]
		ws_client_id: String,
	},
	/// The session ended in failure.
	Error {
		/// Human-readable error description.
		#[serde(default, deserialize_with = "lenient_string")]
		error: String,
	},
	/// The session ended with an established connection.
	Success {
		/// Opaque id of the established connection.
		#[serde(default, deserialize_with = "lenient_string")]
		connection_id: String,
	},
	/// Any `message_type` this client does not recognize.
	#[serde(other)]
	Unknown,
}

/// Decodes a payload field as text: `null` becomes `""` and other non-string
/// values keep their JSON rendering.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	Ok(match Value::deserialize(deserializer)? {
		Value::Null => String::new(),
		Value::String(text) => text,
		other => other.to_string(),
	})
}

impl ChannelMessage {
	/// Decodes a raw channel payload.
	pub fn parse(raw: &str) -> serde_json::Result<Self> {
		serde_json::from_str(raw)
	}

	/// Returns true for messages that end the handshake.
	pub fn is_terminal(&self) -> bool {
		matches!(self, Self::Error { .. } | Self::Success { .. })
	}

	/// Short name of the message kind, for logging.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::ConnectionAck { .. } => "connection_ack",
			Self::Error { .. } => "error",
			Self::Success { .. } => "success",
			Self::Unknown => "unknown",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn connection_ack_decodes_client_id() {
		let msg = ChannelMessage::parse(r#"{"message_type":"connection_ack","ws_client_id":"w1"}"#).unwrap();
		assert_eq!(
			msg,
			ChannelMessage::ConnectionAck {
				ws_client_id: "w1".into()
			}
		);
		assert!(!msg.is_terminal());
	}

	#[test]
	fn error_and_success_are_terminal() {
		let err = ChannelMessage::parse(r#"{"message_type":"error","error":"denied"}"#).unwrap();
		assert_eq!(err, ChannelMessage::Error { error: "denied".into() });
		assert!(err.is_terminal());

		let ok = ChannelMessage::parse(r#"{"message_type":"success","connection_id":"c1"}"#).unwrap();
		assert_eq!(
			ok,
			ChannelMessage::Success {
				connection_id: "c1".into()
			}
		);
		assert!(ok.is_terminal());
	}

	#[test]
	fn unknown_kind_decodes_to_unknown() {
		let msg = ChannelMessage::parse(r#"{"message_type":"heartbeat","seq":4}"#).unwrap();
		assert_eq!(msg, ChannelMessage::Unknown);
		assert_eq!(msg.kind(), "unknown");
		assert!(!msg.is_terminal());
	}

	#[test]
	fn missing_payload_fields_default_to_empty() {
		let msg = ChannelMessage::parse(r#"{"message_type":"success"}"#).unwrap();
		assert_eq!(
			msg,
			ChannelMessage::Success {
				connection_id: String::new()
			}
		);
	}

	#[test]
	fn null_payload_fields_decode_as_empty() {
		let err = ChannelMessage::parse(r#"{"message_type":"error","error":null}"#).unwrap();
		assert_eq!(err, ChannelMessage::Error { error: String::new() });
		assert!(err.is_terminal());

		let ok = ChannelMessage::parse(r#"{"message_type":"success","connection_id":null}"#).unwrap();
		assert_eq!(
			ok,
			ChannelMessage::Success {
				connection_id: String::new()
			}
		);
		assert!(ok.is_terminal());
	}

	#[test]
	fn non_string_payload_fields_keep_their_json_text() {
		let msg = ChannelMessage::parse(r#"{"message_type":"success","connection_id":42}"#).unwrap();
		assert_eq!(
			msg,
			ChannelMessage::Success {
				connection_id: "42".into()
			}
		);
	}

	#[test]
	fn extra_fields_are_ignored() {
		let msg = ChannelMessage::parse(r#"{"message_type":"error","error":"x","code":17}"#).unwrap();
		assert_eq!(msg, ChannelMessage::Error { error: "x".into() });
	}

	#[test]
	fn malformed_payloads_fail_to_decode() {
		assert!(ChannelMessage::parse("not json").is_err());
		assert!(ChannelMessage::parse(r#"{"ws_client_id":"w1"}"#).is_err());
		assert!(ChannelMessage::parse("[1,2,3]").is_err());
	}
}
