//! Per build directory state
//!
//! Records which build system a platform build directory was prepared with, so later
//! commands can reuse it without the user repeating `--build-system`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// State file name inside a platform build directory
pub const STATE_FILE_NAME: &str = ".generateProjects.state";

/// Persisted record of a platform build directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDirState {
    /// Build system name as given by the user (alias or generator name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_system: Option<String>,

    /// Whether configurations are selected at configure time
    #[serde(default)]
    pub single_config_build_system: bool,
}

impl BuildDirState {
    /// Path of the state file in `dir`
    pub fn path(dir: &Path) -> PathBuf {
        dir.join(STATE_FILE_NAME)
    }

    /// Load the state of `dir`. A directory without a state file has empty state.
    pub fn load(dir: &Path) -> Result<Self, BuildError> {
        let path = Self::path(dir);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| BuildError::State {
            dir: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| BuildError::State {
            dir: dir.to_path_buf(),
            message: format!("cannot parse {}: {}", STATE_FILE_NAME, e),
        })
    }

    /// Write the state of `dir`, replacing any existing file
    pub fn store(&self, dir: &Path) -> Result<(), BuildError> {
        let content = serde_json::to_string(self).map_err(|e| BuildError::State {
            dir: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(Self::path(dir), content).map_err(|e| BuildError::State {
            dir: dir.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_is_empty() {
        let temp = TempDir::new().unwrap();
        let state = BuildDirState::load(temp.path()).unwrap();
        assert_eq!(state, BuildDirState::default());
        assert!(state.build_system.is_none());
        assert!(!state.single_config_build_system);
    }

    #[test]
    fn test_store_overwrites() {
        let temp = TempDir::new().unwrap();
        let first = BuildDirState {
            build_system: Some("make".to_string()),
            single_config_build_system: true,
        };
        first.store(temp.path()).unwrap();

        let second = BuildDirState {
            build_system: Some("vs2019".to_string()),
            single_config_build_system: false,
        };
        second.store(temp.path()).unwrap();

        assert_eq!(BuildDirState::load(temp.path()).unwrap(), second);
    }

    #[test]
    fn test_file_format() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(STATE_FILE_NAME),
            r#"{"buildSystem": "Unix Makefiles", "singleConfigBuildSystem": true}"#,
        )
        .unwrap();

        let state = BuildDirState::load(temp.path()).unwrap();
        assert_eq!(state.build_system.as_deref(), Some("Unix Makefiles"));
        assert!(state.single_config_build_system);

        state.store(temp.path()).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(BuildDirState::path(temp.path())).unwrap())
                .unwrap();
        assert_eq!(raw["buildSystem"], "Unix Makefiles");
        assert_eq!(raw["singleConfigBuildSystem"], true);
    }

    #[test]
    fn test_missing_keys_default() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(STATE_FILE_NAME), "{}").unwrap();
        assert_eq!(
            BuildDirState::load(temp.path()).unwrap(),
            BuildDirState::default()
        );
    }

    #[test]
    fn test_corrupt_state_is_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(STATE_FILE_NAME), "{not json").unwrap();
        let err = BuildDirState::load(temp.path()).unwrap_err();
        assert!(matches!(err, BuildError::State { .. }));
    }
}
