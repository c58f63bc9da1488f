//! Result and error printing.
//!
//! JSON output is one object per line on stdout so scripts can parse it;
//! text output is meant for people. Errors always go to stderr as text, and
//! additionally to stdout as a JSON envelope in JSON mode.

use clap::ValueEnum;
use serde::Serialize;
use serde_json::json;

use crate::error::{CliError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	#[default]
	Json,
	Text,
}

/// Prints a successful result.
///
/// `text` renders the value for [`OutputFormat::Text`].
pub fn print_result<T: Serialize>(value: &T, format: OutputFormat, text: impl FnOnce(&T) -> String) -> Result<()> {
	match format {
		OutputFormat::Json => println!("{}", serde_json::to_string(value)?),
		OutputFormat::Text => println!("{}", text(value)),
	}
	Ok(())
}

/// Prints an error to stderr, plus a JSON envelope on stdout in JSON mode.
pub fn print_error(err: &CliError, format: OutputFormat) {
	eprintln!("error: {err}");
	if format == OutputFormat::Json {
		println!("{}", error_envelope(err));
	}
}

fn error_envelope(err: &CliError) -> serde_json::Value {
	json!({
		"ok": false,
		"error": {
			"code": err.code(),
			"message": err.to_string(),
		}
	})
}
