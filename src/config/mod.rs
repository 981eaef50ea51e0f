//! Configuration module for termsuggest
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

/// Environment variable naming the settings file
pub const SETTINGS_PATH_VAR: &str = "AUTOCOMPLETE_SETTINGS_PATH";

/// Global settings instance
static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Settings as loaded, with where they came from
#[derive(Debug, Clone)]
pub struct Loaded {
    pub settings: Settings,
    /// File the settings were read from, `None` for defaults
    pub source: Option<PathBuf>,
    /// Environment overrides that were set but could not be used
    pub ignored_env: Vec<String>,
}

/// Load settings from `explicit`, or from the first default location that
/// exists, or fall back to defaults. Environment overrides are applied in
/// every case.
pub fn load(explicit: Option<&Path>) -> Result<Loaded> {
    let (mut settings, source) = match explicit {
        Some(path) => (read(path)?, Some(path.to_path_buf())),
        None => match default_paths().into_iter().find(|path| path.exists()) {
            Some(path) => (read(&path)?, Some(path)),
            None => (Settings::default(), None),
        },
    };
    let ignored_env = settings.merge_env();
    Ok(Loaded {
        settings,
        source,
        ignored_env,
    })
}

fn read(path: &Path) -> Result<Settings> {
    Settings::from_file(path)
        .with_context(|| format!("failed to load settings from {}", path.display()))
}

/// Initialize global settings from a file, environment overrides applied.
/// Returns the overrides that were ignored.
pub fn init_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let mut settings = read(path.as_ref())?;
    let ignored = settings.merge_env();
    init(settings)?;
    Ok(ignored)
}

/// Initialize global settings with defaults
pub fn init_default() -> Result<()> {
    init(Settings::default())
}

/// Initialize global settings with an already loaded value
pub fn init(settings: Settings) -> Result<()> {
    SETTINGS
        .set(settings)
        .map_err(|_| anyhow::anyhow!("Settings already initialized"))
}

/// Get a reference to the global settings, `None` before initialization
pub fn get() -> Option<&'static Settings> {
    SETTINGS.get()
}

/// Check if settings have been initialized
pub fn is_initialized() -> bool {
    SETTINGS.get().is_some()
}

/// Locations searched for settings.yml, in order
fn default_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(path) = std::env::var(SETTINGS_PATH_VAR) {
        paths.push(PathBuf::from(path));
    }
    paths.push(PathBuf::from("settings.yml"));
    paths.push(PathBuf::from("config/settings.yml"));
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("termsuggest/settings.yml"));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_explicit_file() {
        let err = load(Some(Path::new("/nonexistent/termsuggest/settings.yml"))).unwrap_err();
        assert!(err.to_string().contains("failed to load settings"));
    }

    #[test]
    fn test_default_paths_include_local_file() {
        let paths = default_paths();
        assert!(paths.contains(&PathBuf::from("settings.yml")));
    }

    #[test]
    fn test_init_from_missing_file_leaves_global_unset() {
        assert!(init_from_file("/nonexistent/termsuggest/settings.yml").is_err());
    }

    // The only test that sets the global, so its state is known here
    #[test]
    fn test_global_settings() {
        assert!(get().is_none());
        assert!(!is_initialized());

        let mut settings = Settings::default();
        settings.autocomplete.highlight_class = "match".to_string();
        init(settings).unwrap();

        assert!(is_initialized());
        let global = get().unwrap();
        assert_eq!(global.autocomplete.highlight_class, "match");

        assert!(init_default().is_err());
        assert_eq!(get().unwrap().autocomplete.highlight_class, "match");
    }
}
