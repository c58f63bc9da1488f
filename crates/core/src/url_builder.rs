//! Host normalization and query-parameter helpers.

use url::Url;

use crate::config::DEFAULT_CHANNEL_PATH;
use crate::error::{Error, Result};

/// Strips a single trailing slash from `host` and checks it parses as an absolute URL.
///
/// The returned string is the host as given (minus the slash), not the
/// re-serialized URL, so session URLs can be built by plain concatenation.
pub fn normalize_host(host: &str) -> Result<String> {
	let base = host.strip_suffix('/').unwrap_or(host);
	Url::parse(base).map_err(|e| Error::Configuration(format!("{host}: {e}")))?;
	Ok(base.to_string())
}

/// Session page URL for `session_token` under a normalized host base.
pub fn session_url(host_base: &str, session_token: &str) -> String {
	format!("{host_base}/session/{session_token}")
}

/// Derives the push-channel base from an HTTP base URL.
///
/// Resolves the channel path against `base`, then swaps `https://` for
/// `wss://` and `http://` for `ws://`. Other schemes pass through unchanged.
pub fn derive_channel_base(base: &str) -> Result<Url> {
	let invalid = |e: url::ParseError| Error::Configuration(format!("{base}: {e}"));

	let resolved = Url::parse(base).and_then(|url| url.join(DEFAULT_CHANNEL_PATH)).map_err(invalid)?;
	let resolved = resolved.as_str();

	let rewritten = if let Some(rest) = resolved.strip_prefix("https://") {
		format!("wss://{rest}")
	} else if let Some(rest) = resolved.strip_prefix("http://") {
		format!("ws://{rest}")
	} else {
		resolved.to_string()
	};

	Url::parse(&rewritten).map_err(invalid)
}

/// Sets each of `params` as a query parameter on `url`.
///
/// Existing keys are overwritten in place (later duplicates dropped), new keys
/// are appended in iteration order, and unrelated parameters are preserved.
pub fn append_params<I, K, V>(url: &str, params: I) -> Result<Url>
where
	I: IntoIterator<Item = (K, V)>,
	K: AsRef<str>,
	V: AsRef<str>,
{
	let mut url = Url::parse(url)?;
	let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

	for (key, value) in params {
		let (key, value) = (key.as_ref(), value.as_ref());
		match pairs.iter().position(|(k, _)| k == key) {
			Some(first) => {
				pairs[first].1 = value.to_string();
				let mut index = 0;
				pairs.retain(|(k, _)| {
					let keep = index <= first || k != key;
					index += 1;
					keep
				});
			}
			None => pairs.push((key.to_string(), value.to_string())),
		}
	}

	if pairs.is_empty() {
		url.set_query(None);
	} else {
		url.query_pairs_mut().clear().extend_pairs(&pairs);
	}
	Ok(url)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn normalize_strips_one_trailing_slash() {
		assert_eq!(normalize_host("https://api.example.com/").unwrap(), "https://api.example.com");
		assert_eq!(normalize_host("https://api.example.com").unwrap(), "https://api.example.com");
	}

	#[test]
	fn normalize_is_idempotent() {
		for host in ["https://x", "https://x/", "http://localhost:8080/", "https://x/base/"] {
			let once = normalize_host(host).unwrap();
			assert_eq!(normalize_host(&once).unwrap(), once);
		}
	}

	#[test]
	fn normalize_rejects_relative_hosts() {
		let err = normalize_host("api.example.com").unwrap_err();
		assert!(err.is_configuration());
		assert!(normalize_host("").unwrap_err().is_configuration());
	}

	#[test]
	fn session_url_is_plain_concatenation() {
		assert_eq!(session_url("https://x", "tok"), "https://x/session/tok");
	}

	#[test]
	fn channel_base_rewrites_scheme() {
		assert_eq!(derive_channel_base("https://x").unwrap().as_str(), "wss://x/");
		assert_eq!(derive_channel_base("http://x").unwrap().as_str(), "ws://x/");
	}

	#[test]
	fn channel_base_is_rooted_and_keeps_port() {
		assert_eq!(
			derive_channel_base("http://localhost:3000/api").unwrap().as_str(),
			"ws://localhost:3000/"
		);
	}

	#[test]
	fn channel_base_rejects_unparseable_host() {
		assert!(derive_channel_base("not a url").unwrap_err().is_configuration());
	}

	#[test]
	fn append_overwrites_existing_key_and_keeps_others() {
		let url = append_params("https://x/s?a=0&b=2", [("a", "1")]).unwrap();
		assert_eq!(url.query(), Some("a=1&b=2"));
	}

	#[test]
	fn append_adds_new_keys_in_order() {
		let url = append_params("https://x/s?b=2", [("flow", "popup"), ("ws_client_id", "w1")]).unwrap();
		assert_eq!(url.query(), Some("b=2&flow=popup&ws_client_id=w1"));
	}

	#[test]
	fn append_collapses_duplicate_keys() {
		let url = append_params("https://x/s?a=0&b=2&a=3", [("a", "9")]).unwrap();
		assert_eq!(url.query(), Some("a=9&b=2"));
	}

	#[test]
	fn append_last_write_wins() {
		let url = append_params("https://x/s", [("a", "1"), ("a", "2")]).unwrap();
		assert_eq!(url.query(), Some("a=2"));
	}

	#[test]
	fn append_form_encodes_values() {
		let url = append_params("https://x/s", [("redirect_url", "https://r")]).unwrap();
		assert_eq!(url.query(), Some("redirect_url=https%3A%2F%2Fr"));
	}

	#[test]
	fn append_nothing_leaves_url_bare() {
		let url = append_params("https://x/s", Vec::<(&str, &str)>::new()).unwrap();
		assert_eq!(url.as_str(), "https://x/s");
	}
}
