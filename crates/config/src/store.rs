// On-disk code store
// One plain-text file per key under ~/.config/scriptpad/store/

use std::fs;
use std::path::PathBuf;

use scriptpad_core::CodeStore;

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new() -> Self {
        let dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scriptpad")
            .join("store");
        Self { dir }
    }

    /// Store rooted at an explicit directory (tests, portable installs).
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are app-generated ("scriptpad-code-lua"); keep the name as-is.
        self.dir.join(format!("{}.txt", key))
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeStore for FileStore {
    fn load(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), String> {
        fs::create_dir_all(&self.dir).map_err(|e| e.to_string())?;
        fs::write(self.path_for(key), value).map_err(|e| e.to_string())
    }
}
