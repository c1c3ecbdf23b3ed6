//! Repository configuration stored in `.lineage/config.toml`.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use lineage_merge::MergeOptions;
use serde::{Deserialize, Serialize};

use crate::error::{RepoError, RepoResult};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    pub user: UserConfig,
    pub merge: MergeConfig,
}

/// Identity recorded on new commits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub name: String,
    pub email: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            name: "Lineage User".into(),
            email: "lineage@localhost".into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub ff: FastForwardMode,
}

/// Fast-forward policy applied to every merge unless overridden.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FastForwardMode {
    /// Fast-forward when possible, merge otherwise.
    #[default]
    Allow,
    /// Refuse anything that is not a fast-forward.
    Only,
    /// Always ask for a merge commit.
    Never,
}

impl RepoConfig {
    /// Read a config file; a missing file yields the defaults.
    pub fn load(path: &Path) -> RepoResult<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&text).map_err(|e| RepoError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn save(&self, path: &Path) -> RepoResult<()> {
        let text = toml::to_string_pretty(self).map_err(|e| RepoError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Merge options preset by this config.
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions::new()
            .fast_forward_only(self.merge.ff == FastForwardMode::Only)
            .force_merge_commit(self.merge.ff == FastForwardMode::Never)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = RepoConfig::default();
        assert_eq!(c.merge.ff, FastForwardMode::Allow);
        assert_eq!(c.user.name, "Lineage User");
        assert_eq!(c.merge_options(), MergeOptions::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let c: RepoConfig = toml::from_str("[merge]\nff = \"only\"\n").unwrap();
        assert_eq!(c.merge.ff, FastForwardMode::Only);
        assert_eq!(c.user, UserConfig::default());
        assert!(c.merge_options().fast_forward_only);
        assert!(!c.merge_options().force_merge_commit);
    }

    #[test]
    fn never_presets_merge_commit() {
        let c: RepoConfig = toml::from_str("[merge]\nff = \"never\"\n").unwrap();
        assert!(c.merge_options().force_merge_commit);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(RepoConfig::load(&path).unwrap(), RepoConfig::default());

        let mut c = RepoConfig::default();
        c.user.name = "Ada".into();
        c.merge.ff = FastForwardMode::Never;
        c.save(&path).unwrap();
        assert_eq!(RepoConfig::load(&path).unwrap(), c);
    }

    #[test]
    fn bad_value_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[merge]\nff = \"sometimes\"\n").unwrap();
        assert!(matches!(RepoConfig::load(&path), Err(RepoError::Config { .. })));
    }
}
