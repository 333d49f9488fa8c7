// Session state and persisted code storage

use std::collections::HashMap;

use crate::language::Language;

/// Prefix for every persisted key owned by the playground.
pub const APP_PREFIX: &str = "scriptpad";

/// Storage key for the saved buffer of one language.
pub fn code_key(language: Language) -> String {
    format!("{}-code-{}", APP_PREFIX, language.label())
}

/// In-memory editor state for the active playground session.
///
/// The buffer is the live editor text; it only reaches the [`CodeStore`]
/// through an explicit save or the auto-persist that happens on a
/// language switch.
#[derive(Debug)]
pub struct Session {
    pub language: Language,
    pub buffer: String,
}

impl Session {
    pub fn new(language: Language) -> Self {
        Self { language, buffer: String::new() }
    }
}

/// Key-value store for persisted editor state (saved code per language,
/// editor theme). Keys are stable strings; an absent key means the caller
/// falls back to a built-in default. Last write wins.
pub trait CodeStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), String>;
}

/// Volatile store used by tests and one-shot invocations.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CodeStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
