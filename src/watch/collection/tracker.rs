use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, instrument};

use crate::window_api::{FocusedWindow, WindowManager};

use super::rules::NormalizationRules;

pub const UNKNOWN_APPLICATION: &str = "Unknown";

/// Currently and previously focused applications. Both start out empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusState {
    pub current: Arc<str>,
    pub previous: Arc<str>,
}

/// Detects changes of the focused application.
pub struct WindowTracker {
    manager: Box<dyn WindowManager>,
    rules: NormalizationRules,
    state: FocusState,
}

impl WindowTracker {
    pub fn new(manager: Box<dyn WindowManager>, rules: NormalizationRules) -> Self {
        Self {
            manager,
            rules,
            state: FocusState::default(),
        }
    }

    pub fn state(&self) -> &FocusState {
        &self.state
    }

    /// Queries the focused window and records it if the application differs from the current one.
    /// Returns whether the focus changed. On error the state is left untouched.
    #[instrument(skip(self))]
    pub fn poll_change(&mut self) -> Result<bool> {
        let window = self.manager.get_focused_window()?;
        let name = self.normalize(&window);

        if name == self.state.current {
            return Ok(false);
        }

        debug!("Focus moved from {:?} to {:?}", self.state.current, name);
        self.state.previous = std::mem::replace(&mut self.state.current, name);
        Ok(true)
    }

    fn normalize(&self, window: &FocusedWindow) -> Arc<str> {
        let name = application_name(&window.class);

        // The title check is keyed on what was focused before, so an editor is only recognized
        // when focus arrives at it from a terminal.
        if self.rules.is_terminal(&self.state.current) {
            if let Some(editor) = self.rules.editor_for_title(&window.title) {
                return editor.clone();
            }
        }
        name
    }
}

/// Window class consists of NUL separated instance and class names. The class name is used. An
/// empty class name would collide with the empty identity, which is never credited.
fn application_name(class: &str) -> Arc<str> {
    class
        .split('\0')
        .nth(1)
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_APPLICATION)
        .into()
}

#[cfg(test)]
mod tests {
    use anyhow::{anyhow, Result};

    use crate::{
        watch::collection::rules::NormalizationRules,
        window_api::{FocusedWindow, MockWindowManager},
    };

    use super::{application_name, FocusState, WindowTracker};

    fn window(class: &str, title: &str) -> FocusedWindow {
        FocusedWindow {
            class: class.into(),
            title: title.into(),
        }
    }

    fn tracker_with(windows: Vec<Result<FocusedWindow>>) -> WindowTracker {
        let mut manager = MockWindowManager::new();
        let mut windows = windows.into_iter();
        manager
            .expect_get_focused_window()
            .returning(move || windows.next().expect("Ran out of test windows"));
        WindowTracker::new(Box::new(manager), NormalizationRules::default())
    }

    fn current(tracker: &WindowTracker) -> &str {
        &tracker.state().current
    }

    #[test]
    fn test_application_name_from_class() {
        assert_eq!(&*application_name("firefox\0Firefox\0"), "Firefox");
        assert_eq!(&*application_name("firefox\0Firefox"), "Firefox");
        assert_eq!(&*application_name("firefox"), "Unknown");
        assert_eq!(&*application_name(""), "Unknown");
        assert_eq!(&*application_name("firefox\0"), "Unknown");
        assert_eq!(&*application_name("\0\0"), "Unknown");
    }

    #[test]
    fn test_missing_class_name_is_reported_as_unknown() -> Result<()> {
        let mut tracker = tracker_with(vec![
            Ok(window("firefox\0Firefox\0", "Home")),
            Ok(window("splash\0", "Loading")),
        ]);
        tracker.poll_change()?;

        assert!(tracker.poll_change()?);
        assert_eq!(current(&tracker), "Unknown");
        assert_eq!(&*tracker.state().previous, "Firefox");
        Ok(())
    }

    #[test]
    fn test_first_poll_is_a_change_from_empty() -> Result<()> {
        let mut tracker = tracker_with(vec![Ok(window("firefox\0Firefox\0", "Home"))]);
        assert_eq!(tracker.state(), &FocusState::default());

        assert!(tracker.poll_change()?);
        assert_eq!(current(&tracker), "Firefox");
        assert_eq!(&*tracker.state().previous, "");
        Ok(())
    }

    #[test]
    fn test_same_application_is_not_a_change() -> Result<()> {
        let mut tracker = tracker_with(vec![
            Ok(window("firefox\0Firefox\0", "Home")),
            Ok(window("kitty\0Kitty\0", "zsh")),
            Ok(window("kitty\0Kitty\0", "other tab")),
        ]);
        tracker.poll_change()?;
        tracker.poll_change()?;
        let before = tracker.state().clone();

        assert!(!tracker.poll_change()?);
        assert_eq!(tracker.state(), &before);
        assert_eq!(&*tracker.state().previous, "Firefox");
        Ok(())
    }

    #[test]
    fn test_error_does_not_mutate_state() -> Result<()> {
        let mut tracker = tracker_with(vec![
            Ok(window("firefox\0Firefox\0", "Home")),
            Err(anyhow!("Lost focus")),
            Ok(window("kitty\0Kitty\0", "zsh")),
        ]);
        tracker.poll_change()?;
        let before = tracker.state().clone();

        assert!(tracker.poll_change().is_err());
        assert_eq!(tracker.state(), &before);

        assert!(tracker.poll_change()?);
        assert_eq!(current(&tracker), "Kitty");
        assert_eq!(&*tracker.state().previous, "Firefox");
        Ok(())
    }

    #[test]
    fn test_editor_title_ignored_when_previous_not_terminal() -> Result<()> {
        let mut tracker = tracker_with(vec![
            Ok(window("firefox\0Firefox\0", "Home")),
            Ok(window("kitty\0Kitty\0", "Nvim main.rs")),
        ]);
        tracker.poll_change()?;
        tracker.poll_change()?;
        assert_eq!(current(&tracker), "Kitty");
        Ok(())
    }

    #[test]
    fn test_editor_substitution_after_terminal() -> Result<()> {
        for (title, expected) in [
            ("Nvim main.rs", "NeoVim"),
            ("Vim notes", "Vim"),
            ("NVIM opened", "LunarVim"),
            ("Nvim and NVIM", "NeoVim"),
            ("plain shell", "Kitty"),
        ] {
            let mut tracker = tracker_with(vec![
                Ok(window("alacritty\0Alacritty\0", "zsh")),
                Ok(window("kitty\0Kitty\0", title)),
            ]);
            tracker.poll_change()?;
            tracker.poll_change()?;
            assert_eq!(current(&tracker), expected, "title {title}");
        }
        Ok(())
    }

    #[test]
    fn test_substitution_uses_new_window_title() -> Result<()> {
        // Previous terminal had an editor title, the new window doesn't.
        let mut tracker = tracker_with(vec![
            Ok(window("kitty\0Kitty\0", "NVIM")),
            Ok(window("firefox\0Firefox\0", "Docs")),
        ]);
        tracker.poll_change()?;
        assert_eq!(current(&tracker), "Kitty");
        assert!(tracker.poll_change()?);
        assert_eq!(current(&tracker), "Firefox");
        Ok(())
    }

    #[test]
    fn test_editor_name_alternates_while_focused() -> Result<()> {
        let mut tracker = tracker_with(vec![
            Ok(window("kitty\0Kitty\0", "zsh")),
            Ok(window("kitty\0Kitty\0", "NVIM opened")),
            Ok(window("kitty\0Kitty\0", "NVIM opened")),
        ]);
        tracker.poll_change()?;
        assert!(tracker.poll_change()?);
        assert_eq!(current(&tracker), "LunarVim");
        assert!(tracker.poll_change()?);
        assert_eq!(current(&tracker), "Kitty");
        assert_eq!(&*tracker.state().previous, "LunarVim");
        Ok(())
    }

    #[test]
    fn test_custom_rules() -> Result<()> {
        let mut manager = MockWindowManager::new();
        let mut windows = vec![
            window("wezterm\0Wezterm\0", "zsh"),
            window("wezterm\0Wezterm\0", "hx main.rs"),
        ]
        .into_iter();
        manager
            .expect_get_focused_window()
            .returning(move || Ok(windows.next().unwrap()));
        let rules: NormalizationRules = serde_json::from_str(
            r#"{"terminals": ["Wezterm"], "editor_titles": [{"pattern": "hx", "editor": "Helix"}]}"#,
        )?;
        let mut tracker = WindowTracker::new(Box::new(manager), rules);

        tracker.poll_change()?;
        tracker.poll_change()?;
        assert_eq!(current(&tracker), "Helix");
        Ok(())
    }
}
