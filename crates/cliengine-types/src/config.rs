//! Persisted settings, stored as `settings.toml` in the working directory.
//!
//! ```toml
//! overlap_policy = "reject"
//! prompt = "> "
//! session_prompt = ">> "
//! saves_dir = "saves"
//! record_extension = "json"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File name of the settings file inside the working directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// What a registry does when a new command's argument types repeat an
/// existing command's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Fail with `OverlappingSignature`.
    #[default]
    Reject,
    /// Log a warning and register anyway.
    Warn,
    /// Skip the check.
    Allow,
}

/// Host settings. Unknown keys are ignored and missing keys take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Overlap handling for the launcher and session registries.
    pub overlap_policy: OverlapPolicy,
    /// Launcher prompt.
    pub prompt: String,
    /// In-game session prompt.
    pub session_prompt: String,
    /// Directory (relative to the working directory) holding save records.
    pub saves_dir: String,
    /// Save record file extension, without the dot.
    pub record_extension: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            overlap_policy: OverlapPolicy::Reject,
            prompt: "> ".to_string(),
            session_prompt: ">> ".to_string(),
            saves_dir: "saves".to_string(),
            record_extension: "json".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Render settings as TOML text.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Read `settings.toml` from `dir`. `Ok(None)` when the file is absent.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(SETTINGS_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)?;
        Ok(Some(Self::from_toml(&text)?))
    }

    /// Write `settings.toml` into `dir`, replacing any existing file.
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::write(dir.join(SETTINGS_FILE), self.to_toml()?)?;
        Ok(())
    }

    /// Load settings, rewriting the file with defaults when it is missing or
    /// cannot be parsed.
    pub fn load_or_init(dir: &Path) -> Result<Self> {
        match Self::load(dir) {
            Ok(Some(settings)) => Ok(settings),
            Ok(None) => {
                log::warn!("{SETTINGS_FILE} not found in {}; writing defaults", dir.display());
                let settings = Self::default();
                settings.save(dir)?;
                Ok(settings)
            },
            Err(e) => {
                log::warn!("{SETTINGS_FILE} is corrupt ({e}); overriding with defaults");
                let settings = Self::default();
                settings.save(dir)?;
                Ok(settings)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let s = Settings::from_toml("").unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.overlap_policy, OverlapPolicy::Reject);
        assert_eq!(s.record_extension, "json");
    }

    #[test]
    fn partial_toml_overrides() {
        let s = Settings::from_toml(
            r#"
overlap_policy = "warn"
saves_dir = "profiles"
"#,
        )
        .unwrap();
        assert_eq!(s.overlap_policy, OverlapPolicy::Warn);
        assert_eq!(s.saves_dir, "profiles");
        assert_eq!(s.prompt, "> ");
    }

    #[test]
    fn bad_policy_is_an_error() {
        assert!(Settings::from_toml(r#"overlap_policy = "sometimes""#).is_err());
    }

    #[test]
    fn overlap_policy_default_is_reject() {
        assert_eq!(OverlapPolicy::default(), OverlapPolicy::Reject);
    }

    #[test]
    fn load_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(dir.path()).unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings {
            prompt: "$ ".to_string(),
            ..Settings::default()
        };
        s.save(dir.path()).unwrap();
        assert_eq!(Settings::load(dir.path()).unwrap(), Some(s));
    }

    #[test]
    fn load_or_init_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load_or_init(dir.path()).unwrap();
        assert_eq!(s, Settings::default());
        assert!(dir.path().join(SETTINGS_FILE).is_file());
    }

    #[test]
    fn load_or_init_overrides_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "this is [[[not toml").unwrap();
        let s = Settings::load_or_init(dir.path()).unwrap();
        assert_eq!(s, Settings::default());
        let reread = Settings::load(dir.path()).unwrap();
        assert_eq!(reread, Some(Settings::default()));
    }
}
