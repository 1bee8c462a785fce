// Application settings
// Loaded from ~/.config/claimdesk/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use claimdesk_review::posts::PostSort;
use claimdesk_review::Thresholds;

const APP_DIR: &str = "claimdesk";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the collected posts and extracted claims
    pub data_dir: PathBuf,

    pub posts_file: String,

    pub claims_file: String,

    /// Decision store location; None = next to settings.json
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decisions_file: Option<PathBuf>,

    /// Export target, relative to the working directory unless absolute
    pub export_file: PathBuf,

    pub thresholds: Thresholds,

    pub default_sort: PostSort,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            posts_file: "posts.json".into(),
            claims_file: "claims.json".into(),
            decisions_file: None,
            export_file: PathBuf::from("verified_claims.json"),
            thresholds: Thresholds::default(),
            default_sort: PostSort::Date,
        }
    }
}

/// Fully resolved file locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub posts: PathBuf,
    pub claims: PathBuf,
    pub decisions: PathBuf,
    pub export: PathBuf,
}

impl Settings {
    fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    pub fn default_decisions_path() -> PathBuf {
        Self::config_dir().join("decisions.json")
    }

    /// Load settings from the user config directory, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`. A missing file, unreadable file or invalid
    /// JSON yields defaults; invalid thresholds are reset to defaults.
    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("error reading {}: {e}; using default settings", path.display());
                return Self::default();
            }
        };

        // Strip comments (lines starting with //)
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        let mut settings: Settings = match serde_json::from_str(&cleaned) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("error parsing {}: {e}; using default settings", path.display());
                return Self::default();
            }
        };

        if let Err(e) = settings.thresholds.validate() {
            log::warn!("{}: {e}; using default thresholds", path.display());
            settings.thresholds = Thresholds::default();
        }
        settings
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Resolve file locations, letting command-line overrides win.
    pub fn resolve(&self, data_dir: Option<&Path>, decisions: Option<&Path>) -> DataPaths {
        let data_dir = data_dir.unwrap_or(&self.data_dir);
        let decisions = decisions
            .map(Path::to_path_buf)
            .or_else(|| self.decisions_file.clone())
            .unwrap_or_else(Self::default_decisions_path);

        DataPaths {
            posts: data_dir.join(&self.posts_file),
            claims: data_dir.join(&self.claims_file),
            decisions,
            export: self.export_file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.json"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.thresholds.auto_accept, 0.85);
    }

    #[test]
    fn partial_file_with_comments() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            "{\n  // where extraction writes\n  \"data_dir\": \"/srv/desk\",\n  \"default_sort\": \"shares\"\n}",
        )
        .unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.data_dir, PathBuf::from("/srv/desk"));
        assert_eq!(settings.default_sort, PostSort::Shares);
        assert_eq!(settings.claims_file, "claims.json");
    }

    #[test]
    fn invalid_json_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ data_dir: ").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn inverted_thresholds_reset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"thresholds": {"auto_accept": 0.5, "needs_review": 0.7}}"#).unwrap();
        assert_eq!(Settings::load_from(&path).thresholds, Thresholds::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/settings.json");
        let settings = Settings {
            decisions_file: Some(PathBuf::from("/tmp/d.json")),
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn overrides_win() {
        let settings = Settings {
            decisions_file: Some(PathBuf::from("from-settings.json")),
            ..Settings::default()
        };

        let paths = settings.resolve(None, None);
        assert_eq!(paths.claims, PathBuf::from("data").join("claims.json"));
        assert_eq!(paths.decisions, PathBuf::from("from-settings.json"));

        let paths = settings.resolve(Some(Path::new("elsewhere")), Some(Path::new("cli.json")));
        assert_eq!(paths.posts, PathBuf::from("elsewhere").join("posts.json"));
        assert_eq!(paths.decisions, PathBuf::from("cli.json"));
        assert_eq!(paths.export, PathBuf::from("verified_claims.json"));
    }
}
