//! Popup window placement and lifetime.

use std::fmt;
use std::sync::Arc;

use tracing::debug;
use url::Url;

use crate::error::Result;
use crate::platform::{NavigationTarget, Platform, ScreenSize, WindowHandle};

/// Geometry of a popup centered on the screen, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowPlacement {
	pub width: f64,
	pub height: f64,
	pub top: f64,
	pub left: f64,
}

impl WindowPlacement {
	/// Fits a `target_width` x `target_height` window onto `screen`.
	///
	/// The size is clamped to the screen. The offsets center the requested
	/// (unclamped) size and never go negative.
	pub fn compute(target_width: u32, target_height: u32, screen: ScreenSize) -> Self {
		let (target_width, target_height) = (f64::from(target_width), f64::from(target_height));
		let (screen_width, screen_height) = (f64::from(screen.width), f64::from(screen.height));

		Self {
			width: target_width.min(screen_width),
			height: target_height.min(screen_height),
			top: (screen_height / 2.0 - target_height / 2.0).max(0.0),
			left: (screen_width / 2.0 - target_width / 2.0).max(0.0),
		}
	}
}

/// Feature set passed to the platform when opening the popup.
///
/// [`Display`](fmt::Display) renders the comma-separated `key=value` string
/// browsers accept as the `window.open` features argument.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowFeatures {
	pub placement: WindowPlacement,
	pub scrollbars: bool,
	pub resizable: bool,
	pub status: bool,
	pub toolbar: bool,
	pub location: bool,
	pub copyhistory: bool,
	pub menubar: bool,
	pub directories: bool,
}

impl WindowFeatures {
	/// Scrollable, resizable, and free of browser chrome.
	pub fn popup(placement: WindowPlacement) -> Self {
		Self {
			placement,
			scrollbars: true,
			resizable: true,
			status: false,
			toolbar: false,
			location: false,
			copyhistory: false,
			menubar: false,
			directories: false,
		}
	}
}

impl fmt::Display for WindowFeatures {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let flag = |on: bool| if on { "yes" } else { "no" };
		let p = &self.placement;
		write!(
			f,
			"width={},height={},top={},left={},scrollbars={},resizable={},status={},toolbar={},location={},copyhistory={},menubar={},directories={}",
			p.width,
			p.height,
			p.top,
			p.left,
			flag(self.scrollbars),
			flag(self.resizable),
			flag(self.status),
			flag(self.toolbar),
			flag(self.location),
			flag(self.copyhistory),
			flag(self.menubar),
			flag(self.directories),
		)
	}
}

/// A popup window owned by one handshake.
///
/// There is no close operation; the window lives as long as the user keeps it.
pub struct Popup {
	handle: WindowHandle,
	platform: Arc<dyn Platform>,
}

impl Popup {
	/// Opens a blank popup sized to fit the current screen.
	pub fn open(platform: Arc<dyn Platform>, target_width: u32, target_height: u32) -> Result<Self> {
		let placement = WindowPlacement::compute(target_width, target_height, platform.screen_size());
		let features = WindowFeatures::popup(placement);
		let handle = platform.open_window(&features)?;

		debug!(target = "embed", window = %handle, features = %features, "opened popup");
		Ok(Self { handle, platform })
	}

	/// Points the popup at `url` without closing or refocusing it.
	pub fn navigate(&self, url: &Url) -> Result<()> {
		debug!(target = "embed", window = %self.handle, url = %url, "navigating popup");
		self.platform.navigate(NavigationTarget::Popup(self.handle), url)
	}

	pub fn handle(&self) -> WindowHandle {
		self.handle
	}
}

impl fmt::Debug for Popup {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Popup").field("handle", &self.handle).finish_non_exhaustive()
	}
}
