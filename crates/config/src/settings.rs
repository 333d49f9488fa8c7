// Application settings
// Loaded from ~/.config/scriptpad/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use scriptpad_core::Language;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Editor
    #[serde(rename = "editor.defaultLanguage")]
    pub default_language: String,

    // Execution
    #[serde(rename = "run.timeoutSecs")]
    pub run_timeout_secs: u64,

    #[serde(rename = "python.bin")]
    pub python_bin: Option<String>,

    // Sharing
    #[serde(rename = "share.baseUrl")]
    pub share_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Editor
            default_language: "lua".to_string(),
            // Execution
            run_timeout_secs: 30,
            python_bin: None,
            // Sharing
            share_base_url: "https://scriptpad.dev/play".to_string(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scriptpad");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    fn load_from(path: &PathBuf) -> Self {
        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(path);
            return settings;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                // Strip comments (lines starting with //)
                let cleaned: String = contents
                    .lines()
                    .filter(|line| !line.trim().starts_with("//"))
                    .collect::<Vec<_>>()
                    .join("\n");

                match serde_json::from_str(&cleaned) {
                    Ok(settings) => settings,
                    Err(e) => {
                        eprintln!("Error parsing settings.json: {}", e);
                        eprintln!("Using default settings");
                        Self::default()
                    }
                }
            }
            Err(e) => {
                eprintln!("Error reading settings.json: {}", e);
                Self::default()
            }
        }
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), String> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| e.to_string())?;

        fs::write(&path, json).map_err(|e| e.to_string())
    }

    /// Create default settings file with comments
    fn create_default_file(&self, path: &PathBuf) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("Error creating config directory: {}", e);
                return;
            }
        }

        let default_config = r#"{
    // Editor
    "editor.defaultLanguage": "lua",

    // Execution
    "run.timeoutSecs": 30,
    // Override the interpreter binary ("python.bin": "/usr/bin/python3.12")
    "python.bin": null,

    // Sharing
    "share.baseUrl": "https://scriptpad.dev/play"
}
"#;

        if let Err(e) = fs::write(path, default_config) {
            eprintln!("Error writing default settings.json: {}", e);
        }
    }

    /// The starting language, falling back to Lua on unknown names.
    pub fn language(&self) -> Language {
        Language::parse(&self.default_language).unwrap_or(Language::Lua)
    }

    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs)
    }

    pub fn python_bin(&self) -> Option<PathBuf> {
        self.python_bin.as_deref().map(PathBuf::from)
    }

    /// Get the config file path for display/opening
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}
