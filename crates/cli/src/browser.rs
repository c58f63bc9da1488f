//! Desktop [`Platform`] backed by the system browser.
//!
//! Chromium-based browsers are launched with `--app`, which gives a chromeless
//! window honoring the popup's size and position. Anything else falls back to
//! the OS URL opener, which shows the URL in a regular tab.
//!
//! A desktop process cannot point an already-open browser window somewhere
//! else, so the popup is only launched when it is first navigated (the
//! handshake opens it blank and navigates on acknowledgment).

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};

use embed::{NavigationTarget, Platform, ScreenSize, WindowFeatures, WindowHandle};
use parking_lot::Mutex;
use tracing::{debug, info};
use url::Url;

use crate::error::{CliError, Result};

/// How URLs are shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launcher {
	/// Chromium-family executable supporting `--app` windows.
	App(PathBuf),
	/// Program that opens a URL passed as its last argument.
	Opener { program: PathBuf, args: Vec<OsString> },
}

impl Launcher {
	/// Picks a launcher: `$BROWSER`, then a Chromium-based browser, then the OS opener.
	pub fn detect() -> Result<Self> {
		if let Some(browser) = std::env::var_os("BROWSER").filter(|b| !b.is_empty()) {
			return Ok(Launcher::Opener {
				program: PathBuf::from(browser),
				args: Vec::new(),
			});
		}
		if let Some(app) = find_chromium() {
			return Ok(Launcher::App(app));
		}
		find_opener().ok_or(CliError::NoBrowser)
	}

	fn command_for(&self, url: &Url, features: Option<&WindowFeatures>) -> Command {
		match self {
			Launcher::App(program) => {
				let mut cmd = Command::new(program);
				match features {
					Some(features) => {
						let p = &features.placement;
						cmd.arg(format!("--app={url}"))
							.arg(format!("--window-size={},{}", p.width.round(), p.height.round()))
							.arg(format!("--window-position={},{}", p.left.round(), p.top.round()));
					}
					None => {
						cmd.arg(url.as_str());
					}
				}
				cmd
			}
			Launcher::Opener { program, args } => {
				let mut cmd = Command::new(program);
				cmd.args(args).arg(url.as_str());
				cmd
			}
		}
	}
}

fn find_chromium() -> Option<PathBuf> {
	let candidates: &[&str] = if cfg!(target_os = "macos") {
		&[
			"/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
			"/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
			"/Applications/Chromium.app/Contents/MacOS/Chromium",
			"/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
		]
	} else if cfg!(target_os = "windows") {
		&[
			r"C:\Program Files\Google\Chrome\Application\chrome.exe",
			r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
			r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
			r"C:\Program Files\BraveSoftware\Brave-Browser\Application\brave.exe",
		]
	} else {
		&[
			"google-chrome-stable",
			"google-chrome",
			"chromium",
			"chromium-browser",
			"brave",
			"brave-browser",
			"microsoft-edge",
		]
	};

	candidates.iter().find_map(|candidate| {
		let path = Path::new(candidate);
		if path.is_absolute() {
			path.exists().then(|| path.to_path_buf())
		} else {
			which::which(candidate).ok()
		}
	})
}

fn find_opener() -> Option<Launcher> {
	if cfg!(target_os = "macos") {
		which::which("open").ok().map(|program| Launcher::Opener {
			program,
			args: Vec::new(),
		})
	} else if cfg!(target_os = "windows") {
		Some(Launcher::Opener {
			program: PathBuf::from("cmd"),
			args: vec!["/C".into(), "start".into(), "".into()],
		})
	} else {
		["xdg-open", "gio", "sensible-browser"].iter().find_map(|candidate| {
			which::which(candidate).ok().map(|program| Launcher::Opener {
				program,
				args: if *candidate == "gio" { vec!["open".into()] } else { Vec::new() },
			})
		})
	}
}

/// [`Platform`] that shows session pages in the user's browser.
#[derive(Debug)]
pub struct SystemBrowser {
	launcher: Launcher,
	screen: ScreenSize,
	prefers_dark: bool,
	windows: Mutex<HashMap<WindowHandle, WindowFeatures>>,
	next_id: AtomicU64,
}

impl SystemBrowser {
	pub fn new(launcher: Launcher, screen: ScreenSize, prefers_dark: bool) -> Self {
		Self {
			launcher,
			screen,
			prefers_dark,
			windows: Mutex::new(HashMap::new()),
			next_id: AtomicU64::new(1),
		}
	}

	pub fn launcher(&self) -> &Launcher {
		&self.launcher
	}

	fn launch(&self, url: &Url, features: Option<&WindowFeatures>) -> embed::Result<()> {
		let mut cmd = self.launcher.command_for(url, features);
		debug!(target = "embed-cli", command = ?cmd, "launching browser");
		cmd.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
		cmd.spawn()
			.map(drop)
			.map_err(|e| embed::Error::Platform(format!("failed to launch {:?}: {e}", cmd.get_program())))
	}
}

impl Platform for SystemBrowser {
	fn open_window(&self, features: &WindowFeatures) -> embed::Result<WindowHandle> {
		let handle = WindowHandle::new(self.next_id.fetch_add(1, Ordering::Relaxed));
		self.windows.lock().insert(handle, features.clone());
		debug!(target = "embed-cli", window = %handle, features = %features, "reserved popup window");
		Ok(handle)
	}

	fn navigate(&self, target: NavigationTarget, url: &Url) -> embed::Result<()> {
		match target {
			NavigationTarget::Popup(handle) => {
				let features = self
					.windows
					.lock()
					.get(&handle)
					.cloned()
					.ok_or_else(|| embed::Error::Platform(format!("unknown {handle}")))?;
				info!(target = "embed-cli", window = %handle, url = %url, "opening session popup");
				self.launch(url, Some(&features))
			}
			NavigationTarget::CurrentPage => {
				info!(target = "embed-cli", url = %url, "opening session page");
				self.launch(url, None)
			}
		}
	}

	fn screen_size(&self) -> ScreenSize {
		self.screen
	}

	fn prefers_dark_mode(&self) -> bool {
		self.prefers_dark
	}
}

#[cfg(test)]
mod tests {
	use embed::WindowPlacement;

	use super::*;

	fn args(cmd: &Command) -> Vec<String> {
		cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect()
	}

	#[test]
	fn app_launcher_places_popup_window() {
		let launcher = Launcher::App(PathBuf::from("chromium"));
		let features = WindowFeatures::popup(WindowPlacement::compute(500, 600, ScreenSize::new(1365, 767)));
		let url = Url::parse("https://api.example.com/session/tok?flow=popup").unwrap();

		let cmd = launcher.command_for(&url, Some(&features));

		assert_eq!(
			args(&cmd),
			[
				"--app=https://api.example.com/session/tok?flow=popup",
				"--window-size=500,600",
				"--window-position=433,84",
			]
		);
	}

	#[test]
	fn opener_appends_url_after_fixed_args() {
		let launcher = Launcher::Opener {
			program: PathBuf::from("gio"),
			args: vec!["open".into()],
		};
		let url = Url::parse("https://x/").unwrap();
		assert_eq!(args(&launcher.command_for(&url, None)), ["open", "https://x/"]);
	}

	#[test]
	fn navigating_unknown_popup_fails() {
		let browser = SystemBrowser::new(Launcher::App(PathBuf::from("chromium")), ScreenSize::new(800, 600), false);
		let err = browser
			.navigate(NavigationTarget::Popup(WindowHandle::new(42)), &Url::parse("https://x/").unwrap())
			.unwrap_err();
		assert!(matches!(err, embed::Error::Platform(_)));
	}

	#[test]
	fn open_window_hands_out_distinct_handles() {
		let browser = SystemBrowser::new(Launcher::App(PathBuf::from("chromium")), ScreenSize::new(800, 600), true);
		let features = WindowFeatures::popup(WindowPlacement::compute(500, 600, browser.screen_size()));
		let a = browser.open_window(&features).unwrap();
		let b = browser.open_window(&features).unwrap();
		assert_ne!(a, b);
		assert!(browser.prefers_dark_mode());
	}
}
