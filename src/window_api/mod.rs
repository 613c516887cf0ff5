//! Contains logic for querying the windowing system about the focused window.
//! [GenericWindowManager] is the main artifact of this module that abstracts
//! the operations.

#[cfg(feature = "x11")]
pub mod x11;

#[cfg(feature = "x11")]
extern crate xcb;

use std::sync::Arc;

use anyhow::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusedWindow {
    /// Raw class of the window as reported by the windowing system. On X11 this is the `WM_CLASS`
    /// property, which holds NUL separated instance and class names. For example
    /// 'firefox\0Firefox\0'
    pub class: Arc<str>,
    /// Title of the window. For example 'bash in hello' or 'Vibing in YouTube - Firefox'
    pub title: Arc<str>,
}

/// Intended to serve as a contract every windowing backend must implement.
#[cfg_attr(test, mockall::automock)]
pub trait WindowManager {
    fn get_focused_window(&mut self) -> Result<FocusedWindow>;
}

/// Serves as a WindowManager implementation that picks the backend compiled into the binary.
pub struct GenericWindowManager {
    inner: Box<dyn WindowManager>,
}

impl GenericWindowManager {
    pub fn new() -> Result<Self> {
        cfg_if::cfg_if! {
            if #[cfg(feature = "x11")] {
                use x11::LinuxWindowManager;
                Ok(Self {
                    inner: Box::new(LinuxWindowManager::new()?),
                })
            }
            else {
                // Allows the project to be compiled and tested without a display server.
                Err(anyhow::anyhow!("No window backend was enabled. Rebuild with --features x11"))
            }
        }
    }
}

impl WindowManager for GenericWindowManager {
    fn get_focused_window(&mut self) -> Result<FocusedWindow> {
        self.inner.get_focused_window()
    }
}
