//! Group file loading.
//!
//! The file is a JSON object: `{ "groups": ["id", ...], "message": "text" }`.
//! Other keys are ignored.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::ConfigError;

#[derive(Deserialize, Debug, Default)]
struct RawGroupFile {
    #[serde(default)]
    groups: Option<Vec<String>>,
    #[serde(default)]
    message: Option<String>,
}

impl RawGroupFile {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn require_groups(self, path: &Path) -> Result<(Vec<String>, Option<String>), ConfigError> {
        match self.groups {
            Some(groups) if !groups.is_empty() => Ok((groups, self.message)),
            _ => Err(ConfigError::MissingGroups {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Groups plus the message to post to all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupConfig {
    pub groups: Vec<String>,
    pub message: String,
}

impl GroupConfig {
    /// Loads and validates both `groups` and `message`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let (groups, message) = RawGroupFile::read(path)?.require_groups(path)?;
        let message = match message {
            Some(m) if !m.is_empty() => m,
            _ => {
                return Err(ConfigError::MissingMessage {
                    path: path.to_path_buf(),
                })
            }
        };
        info!(msg = "loaded group config", location = ?path, groups = groups.len());
        Ok(Self { groups, message })
    }
}

/// Only the `groups` half of a group file, for the interactive flow where the
/// message is typed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupList {
    pub source: PathBuf,
    pub groups: Vec<String>,
}

impl GroupList {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let (groups, _) = RawGroupFile::read(path)?.require_groups(path)?;
        info!(msg = "loaded group ids", location = ?path, groups = groups.len());
        Ok(Self {
            source: path.to_path_buf(),
            groups,
        })
    }
}
