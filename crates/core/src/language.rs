// Playground languages

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two playground languages. Lua is evaluated natively in-process;
/// Python runs in the sandboxed interpreter backend.
///
/// Exactly one language is active at a time; every dispatch on this enum
/// is an exhaustive match, so adding a language is a compile-time checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Lua,
    Python,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Lua, Language::Python];

    /// Stable label used for storage keys, share payloads, and display.
    pub fn label(self) -> &'static str {
        match self {
            Language::Lua => "lua",
            Language::Python => "python",
        }
    }

    /// Parse a label back into a language. Accepts the short Python alias
    /// for command-line convenience.
    pub fn parse(s: &str) -> Option<Language> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lua" => Some(Language::Lua),
            "python" | "py" => Some(Language::Python),
            _ => None,
        }
    }

    /// True for languages that execute in the sandboxed interpreter and
    /// therefore need one-time backend initialization.
    pub fn is_sandboxed(self) -> bool {
        matches!(self, Language::Python)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
