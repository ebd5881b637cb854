// Grid interaction settings
// Loaded from <config_dir>/fabgrid/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Navigation
    /// Rows moved per PageUp/PageDown
    #[serde(rename = "navigation.pageSize")]
    pub page_size: usize,

    // Clipboard
    /// Also write the HTML table rendition on copy
    #[serde(rename = "clipboard.writeHtml")]
    pub write_html: bool,

    /// Try the legacy fallback path when the platform clipboard fails
    #[serde(rename = "clipboard.fallbackEnabled")]
    pub fallback_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Navigation
            page_size: 10,
            // Clipboard
            write_html: true,
            fallback_enabled: true,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fabgrid");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from a specific path, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
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
                        log::warn!("error parsing {}: {e}; using defaults", path.display());
                        Self::default()
                    }
                }
            }
            Err(e) => {
                log::warn!("error reading {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    /// Save current settings to a specific path
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.page_size, 10);
        assert!(settings.write_html);
        assert!(settings.fallback_enabled);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = Settings::default();
        settings.page_size = 25;
        settings.write_html = false;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Settings::load_from(&dir.path().join("nope.json"));
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_comment_lines_are_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            "{\n// rows per page jump\n\"navigation.pageSize\": 50\n}",
        )
        .unwrap();
        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.page_size, 50);
        // Unspecified keys keep their defaults
        assert!(loaded.write_html);
    }
}
