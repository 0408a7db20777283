use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::git::{GraphError, DEFAULT_DELIMITER, DEFAULT_REMOTES};
use crate::graph::colors::Palette;
use crate::graph::lanes::BranchRules;
use crate::graph::metadata::{validate_date_format, DEFAULT_DATE_FORMAT, DEFAULT_SHORT_HASH_LENGTH};

const CONFIG_DIR_NAME: &str = "gitk-graph";
const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_PRIMARY_BRANCH_PATTERN: &str = "^(main|master|trunk)$";

/// User settings for parsing and drawing history.
///
/// Missing keys in the JSON file fall back to their defaults, so a partial
/// file such as `{"date_format": "%d.%m.%Y"}` is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Field separator of the log format
    pub delimiter: char,
    pub short_hash_length: usize,
    /// strftime pattern for commit dates (UTC)
    pub date_format: String,
    /// Branches matching this regex win the lane key when several are present
    pub primary_branch_pattern: String,
    /// First path segments that mark a short ref name as remote-tracking
    pub remote_names: Vec<String>,
    /// `#rrggbb` lane colors; empty selects the built-in palette
    pub palette: Vec<String>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            short_hash_length: DEFAULT_SHORT_HASH_LENGTH,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            primary_branch_pattern: DEFAULT_PRIMARY_BRANCH_PATTERN.to_string(),
            remote_names: DEFAULT_REMOTES.iter().map(|r| r.to_string()).collect(),
            palette: Vec::new(),
        }
    }
}

impl GraphConfig {
    /// `<config_dir>/gitk-graph/config.json`, if the platform has a config dir.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the user config, falling back to defaults when it is missing or broken.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, GraphError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), GraphError> {
        match Self::config_path() {
            Some(path) => self.save_to(path),
            None => Err(GraphError::configuration("config_path", "no config directory on this platform")),
        }
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), GraphError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        debug!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), GraphError> {
        if self.delimiter.is_whitespace() {
            return Err(GraphError::configuration(
                "delimiter",
                format!("{:?} cannot separate log fields", self.delimiter),
            ));
        }
        if self.short_hash_length == 0 {
            return Err(GraphError::configuration("short_hash_length", "must be at least 1"));
        }
        validate_date_format(&self.date_format)?;
        self.branch_rules()?;
        self.palette()?;
        Ok(())
    }

    pub fn palette(&self) -> Result<Palette, GraphError> {
        Palette::from_hex(self.palette.as_slice())
    }

    pub fn branch_rules(&self) -> Result<BranchRules, GraphError> {
        BranchRules::new(&self.primary_branch_pattern, self.remote_names.clone())
    }
}
