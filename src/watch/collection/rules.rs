use std::{collections::HashSet, path::Path, sync::Arc};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_TERMINALS: [&str; 18] = [
    "Kitty",
    "Alacritty",
    "Terminator",
    "Tilda",
    "Guake",
    "Yakuake",
    "Roxterm",
    "Eterm",
    "Rxvt",
    "Xterm",
    "Tilix",
    "Lxterminal",
    "Konsole",
    "St",
    "Gnome-terminal",
    "Xfce4-terminal",
    "Terminology",
    "Extraterm",
];

/// Order matters, "NVIM" would otherwise never be reached after "Vim".
const DEFAULT_EDITOR_TITLES: [(&str, &str); 3] =
    [("Nvim", "NeoVim"), ("Vim", "Vim"), ("NVIM", "LunarVim")];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorTitle {
    /// Substring searched for in the window title.
    pub pattern: String,
    /// Application name the window is attributed to when the pattern matches.
    pub editor: Arc<str>,
}

/// Table used to attribute terminal-hosted editors to the editor instead of the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationRules {
    pub terminals: HashSet<String>,
    pub editor_titles: Vec<EditorTitle>,
}

impl Default for NormalizationRules {
    fn default() -> Self {
        Self {
            terminals: DEFAULT_TERMINALS.iter().map(|v| v.to_string()).collect(),
            editor_titles: DEFAULT_EDITOR_TITLES
                .iter()
                .map(|(pattern, editor)| EditorTitle {
                    pattern: pattern.to_string(),
                    editor: (*editor).into(),
                })
                .collect(),
        }
    }
}

impl NormalizationRules {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read normalization rules from {path:?}"))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse normalization rules from {path:?}"))
    }

    pub fn is_terminal(&self, app: &str) -> bool {
        self.terminals.contains(app)
    }

    /// Returns the editor for the first pattern contained in the title.
    pub fn editor_for_title(&self, title: &str) -> Option<&Arc<str>> {
        self.editor_titles
            .iter()
            .find(|v| title.contains(v.pattern.as_str()))
            .map(|v| &v.editor)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use anyhow::Result;
    use tempfile::NamedTempFile;

    use super::NormalizationRules;

    #[test]
    fn test_default_terminals() {
        let rules = NormalizationRules::default();
        assert_eq!(rules.terminals.len(), 18);
        assert!(rules.is_terminal("Kitty"));
        assert!(rules.is_terminal("Gnome-terminal"));
        assert!(rules.is_terminal("St"));
        assert!(!rules.is_terminal("kitty"));
        assert!(!rules.is_terminal("Firefox"));
    }

    #[test]
    fn test_editor_title_order() {
        let rules = NormalizationRules::default();
        assert_eq!(
            rules.editor_for_title("main.rs - Nvim").map(|v| &**v),
            Some("NeoVim")
        );
        assert_eq!(rules.editor_for_title("Vim: notes").map(|v| &**v), Some("Vim"));
        assert_eq!(
            rules.editor_for_title("NVIM opened").map(|v| &**v),
            Some("LunarVim")
        );
        // Both patterns present, the earlier entry wins.
        assert_eq!(
            rules.editor_for_title("Vim and NVIM").map(|v| &**v),
            Some("Vim")
        );
        assert_eq!(rules.editor_for_title("no editor"), None);
    }

    #[test]
    fn test_rules_from_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            r#"{{
                "terminals": ["Wezterm"],
                "editor_titles": [{{ "pattern": "hx", "editor": "Helix" }}]
            }}"#
        )?;

        let rules = NormalizationRules::from_file(file.path())?;
        assert!(rules.is_terminal("Wezterm"));
        assert!(!rules.is_terminal("Kitty"));
        assert_eq!(rules.editor_for_title("hx main.rs").map(|v| &**v), Some("Helix"));
        assert_eq!(rules.editor_for_title("Nvim"), None);
        Ok(())
    }

    #[test]
    fn test_rules_from_broken_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "terminals = []")?;
        assert!(NormalizationRules::from_file(file.path()).is_err());
        Ok(())
    }
}
