use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	/// No program to open URLs with was found on PATH.
	#[error("no browser found: install a Chromium-based browser or set BROWSER")]
	NoBrowser,

	#[error(transparent)]
	Embed(#[from] embed::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl CliError {
	/// Short machine-readable code for structured error output.
	pub fn code(&self) -> &'static str {
		match self {
			CliError::NoBrowser => "BROWSER_LAUNCH_FAILED",
			CliError::Embed(err) if err.is_configuration() => "INVALID_CONFIGURATION",
			CliError::Embed(err) if err.is_validation() => "INVALID_INPUT",
			CliError::Embed(err) if err.is_handshake() => "SESSION_FAILED",
			CliError::Embed(_) => "CONNECTION_FAILED",
			CliError::Json(_) => "INTERNAL_ERROR",
		}
	}
}
