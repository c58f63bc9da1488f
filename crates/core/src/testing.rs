//! Test doubles for driving handshakes without a browser or network.
//!
//! - [`FakePlatform`]: records opened windows and navigations, with a
//!   configurable screen size and color-scheme preference
//! - [`MemoryConnector`]: hands out in-memory [`PushChannel`]s and keeps the
//!   [`ChannelFeed`] ends for the test to push messages through
//!
//! # Example
//!
//! ```ignore
//! let platform = Arc::new(FakePlatform::new());
//! let connector = Arc::new(MemoryConnector::new());
//! let embed = Embed::new(EmbedOptions::default(), platform.clone())?
//!     .with_connector(connector.clone());
//!
//! let Connecting::Popup(pending) = embed.start("tok", &ConnectOptions::default())? else { unreachable!() };
//! let feed = connector.take_feed().unwrap();
//! feed.send(r#"{"message_type":"success","connection_id":"c1"}"#);
//! assert_eq!(pending.wait().await?.connection_id, "c1");
//! ```

use std::collections::VecDeque;

use parking_lot::Mutex;
use url::Url;

use crate::channel::{ChannelConnector, ChannelFeed, PushChannel};
use crate::error::{Error, Result};
use crate::platform::{NavigationTarget, Platform, ScreenSize, WindowHandle};
use crate::popup::WindowFeatures;

/// A window opened through [`FakePlatform`].
#[derive(Debug, Clone, PartialEq)]
pub struct OpenedWindow {
	pub handle: WindowHandle,
	pub features: WindowFeatures,
}

#[derive(Debug, Default)]
struct Recorded {
	windows: Vec<OpenedWindow>,
	navigations: Vec<(NavigationTarget, Url)>,
	next_id: u64,
}

/// In-memory [`Platform`] that records what the handshake asks of it.
#[derive(Debug)]
pub struct FakePlatform {
	screen: ScreenSize,
	prefers_dark: bool,
	block_popups: bool,
	recorded: Mutex<Recorded>,
}

impl Default for FakePlatform {
	fn default() -> Self {
		Self::new()
	}
}

impl FakePlatform {
	/// A 1920x1080 light-mode screen that allows popups.
	pub fn new() -> Self {
		Self {
			screen: ScreenSize::new(1920, 1080),
			prefers_dark: false,
			block_popups: false,
			recorded: Mutex::new(Recorded::default()),
		}
	}

	pub fn with_screen(mut self, width: u32, height: u32) -> Self {
		self.screen = ScreenSize::new(width, height);
		self
	}

	pub fn with_dark_mode(mut self, prefers_dark: bool) -> Self {
		self.prefers_dark = prefers_dark;
		self
	}

	/// Makes [`Platform::open_window`] fail, like a browser popup blocker.
	pub fn blocking_popups(mut self) -> Self {
		self.block_popups = true;
		self
	}

	pub fn opened_windows(&self) -> Vec<OpenedWindow> {
		self.recorded.lock().windows.clone()
	}

	/// URLs popups were navigated to, in order.
	pub fn popup_navigations(&self) -> Vec<Url> {
		self.navigations_where(|target| matches!(target, NavigationTarget::Popup(_)))
	}

	/// URLs the hosting page was navigated to, in order.
	pub fn page_navigations(&self) -> Vec<Url> {
		self.navigations_where(|target| matches!(target, NavigationTarget::CurrentPage))
	}

	fn navigations_where(&self, keep: impl Fn(&NavigationTarget) -> bool) -> Vec<Url> {
		self.recorded
			.lock()
			.navigations
			.iter()
			.filter(|(target, _)| keep(target))
			.map(|(_, url)| url.clone())
			.collect()
	}
}

impl Platform for FakePlatform {
	fn open_window(&self, features: &WindowFeatures) -> Result<WindowHandle> {
		if self.block_popups {
			return Err(Error::Platform("popup blocked".into()));
		}
		let mut recorded = self.recorded.lock();
		recorded.next_id += 1;
		let handle = WindowHandle::new(recorded.next_id);
		recorded.windows.push(OpenedWindow {
			handle,
			features: features.clone(),
		});
		Ok(handle)
	}

	fn navigate(&self, target: NavigationTarget, url: &Url) -> Result<()> {
		let mut recorded = self.recorded.lock();
		if let NavigationTarget::Popup(handle) = target {
			if !recorded.windows.iter().any(|w| w.handle == handle) {
				return Err(Error::Platform(format!("unknown {handle}")));
			}
		}
		recorded.navigations.push((target, url.clone()));
		Ok(())
	}

	fn screen_size(&self) -> ScreenSize {
		self.screen
	}

	fn prefers_dark_mode(&self) -> bool {
		self.prefers_dark
	}
}

/// [`ChannelConnector`] that creates in-memory channels.
#[derive(Debug, Default)]
pub struct MemoryConnector {
	feeds: Mutex<VecDeque<ChannelFeed>>,
	urls: Mutex<Vec<Url>>,
}

impl MemoryConnector {
	pub fn new() -> Self {
		Self::default()
	}

	/// Takes the feed of the oldest channel not yet taken.
	pub fn take_feed(&self) -> Option<ChannelFeed> {
		self.feeds.lock().pop_front()
	}

	/// URLs passed to [`connect`](ChannelConnector::connect), in order.
	pub fn connected_urls(&self) -> Vec<Url> {
		self.urls.lock().clone()
	}

	pub fn connection_count(&self) -> usize {
		self.urls.lock().len()
	}
}

impl ChannelConnector for MemoryConnector {
	fn connect(&self, url: &Url) -> PushChannel {
		let (channel, feed) = PushChannel::pair(url.clone());
		self.urls.lock().push(url.clone());
		self.feeds.lock().push_back(feed);
		channel
	}
}
