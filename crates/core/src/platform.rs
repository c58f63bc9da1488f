//! Access to the host environment's windowing capabilities.
//!
//! The handshake never touches a browser directly. Everything it needs from
//! the environment (opening a window, pointing it at a URL, screen geometry,
//! the color-scheme preference) goes through [`Platform`], so the same state
//! machine runs against a real browser, a desktop opener, or a test double.

use std::fmt;

use url::Url;

use crate::error::Result;
use crate::popup::WindowFeatures;

/// Opaque identifier of a window opened through a [`Platform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(u64);

impl WindowHandle {
	pub fn new(id: u64) -> Self {
		Self(id)
	}

	pub fn id(&self) -> u64 {
		self.0
	}
}

impl fmt::Display for WindowHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "window#{}", self.0)
	}
}

/// Screen dimensions in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
	pub width: u32,
	pub height: u32,
}

impl ScreenSize {
	pub fn new(width: u32, height: u32) -> Self {
		Self { width, height }
	}
}

/// Where a navigation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationTarget {
	/// A window previously returned by [`Platform::open_window`].
	Popup(WindowHandle),
	/// The page hosting the client; navigating it unloads the caller.
	CurrentPage,
}

/// Windowing capabilities the handshake needs from its environment.
pub trait Platform: Send + Sync {
	/// Opens a new, blank window with the given features.
	fn open_window(&self, features: &WindowFeatures) -> Result<WindowHandle>;

	/// Sets the displayed location of `target` to `url`.
	///
	/// Must not close or refocus a popup target.
	fn navigate(&self, target: NavigationTarget, url: &Url) -> Result<()>;

	/// Current screen dimensions.
	fn screen_size(&self) -> ScreenSize;

	/// Whether the user prefers a dark color scheme.
	fn prefers_dark_mode(&self) -> bool;
}
