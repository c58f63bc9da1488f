//! Query parameters appended to the session URL.
//!
//! The session page reads these to decide how to report completion: back
//! through the push channel (`flow=popup`) or by navigating the browser to a
//! caller-supplied URL (`flow=redirect`).

/// Selects how the session page reports completion.
pub const FLOW: &str = "flow";
/// Channel client id from the connection acknowledgment.
pub const WS_CLIENT_ID: &str = "ws_client_id";
/// `"true"` or `"false"`, the client's color-scheme preference.
pub const PREFERS_DARK_MODE: &str = "prefers_dark_mode";
/// Where the session page sends the browser when a redirect flow finishes.
pub const REDIRECT_URL: &str = "redirect_url";

/// `flow` value for the popup flow.
pub const FLOW_POPUP: &str = "popup";
/// `flow` value for the full-page redirect flow.
pub const FLOW_REDIRECT: &str = "redirect";

/// Parameters the popup is navigated with once the channel is acknowledged.
///
/// The dark-mode flag is the literal string `"true"` or `"false"`.
pub fn popup_params(ws_client_id: &str, prefers_dark_mode: bool) -> Vec<(&'static str, String)> {
	vec![
		(FLOW, FLOW_POPUP.to_string()),
		(WS_CLIENT_ID, ws_client_id.to_string()),
		(PREFERS_DARK_MODE, prefers_dark_mode.to_string()),
	]
}

/// Parameters for a full-page redirect; `redirect_url` is omitted when absent.
pub fn redirect_params(redirect_url: Option<&str>) -> Vec<(&'static str, String)> {
	let mut params = vec![(FLOW, FLOW_REDIRECT.to_string())];
	if let Some(url) = redirect_url {
		params.push((REDIRECT_URL, url.to_string()));
	}
	params
}
