// Editor theme preference
// Persisted through the code store alongside the per-language buffers.

use scriptpad_core::CodeStore;

pub const THEME_KEY: &str = "scriptpad-editor-theme";

pub const DEFAULT_THEME: &str = "dracula";

/// Themes the editor surface knows how to render.
pub const KNOWN_THEMES: &[&str] = &[
    "dracula",
    "monokai",
    "github-light",
    "solarized-dark",
    "nord",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorTheme {
    pub name: String,
}

impl EditorTheme {
    /// Load the saved preference, falling back to the default. An unknown
    /// saved name (stale config, renamed theme) also falls back.
    pub fn load(store: &dyn CodeStore) -> Self {
        let name = store
            .load(THEME_KEY)
            .filter(|n| KNOWN_THEMES.contains(&n.as_str()))
            .unwrap_or_else(|| DEFAULT_THEME.to_string());
        Self { name }
    }

    /// Validate and persist a theme choice.
    pub fn set(store: &mut dyn CodeStore, name: &str) -> Result<Self, String> {
        if !KNOWN_THEMES.contains(&name) {
            return Err(format!(
                "unknown theme '{}' (known: {})",
                name,
                KNOWN_THEMES.join(", ")
            ));
        }
        store.save(THEME_KEY, name)?;
        Ok(Self { name: name.to_string() })
    }
}
