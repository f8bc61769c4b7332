use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RepublishError, Result};

/// File name looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = "republish.toml";

/// File name looked up in the user config directory.
pub const USER_CONFIG_FILE: &str = ".republish.toml";

/// Represents the complete configuration for git-republish.
///
/// Every section and field has a default, so an empty file is a valid
/// configuration.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub publish: PublishConfig,

    #[serde(default)]
    pub tags: TagsConfig,

    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub package: PackageConfig,
}

fn default_branch_prefix() -> String {
    "republish".to_string()
}

fn default_commit_message() -> String {
    "Republish package contents".to_string()
}

/// Settings for the clone/commit part of the workflow.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PublishConfig {
    /// Base of the temporary branch name
    #[serde(default = "default_branch_prefix")]
    pub branch_prefix: String,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    /// Parent directory of the clone; defaults to a folder in the temp dir
    #[serde(default)]
    pub work_dir: Option<PathBuf>,

    /// Keep the clone after the tags were pushed
    #[serde(default)]
    pub keep_clone: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        PublishConfig {
            branch_prefix: default_branch_prefix(),
            commit_message: default_commit_message(),
            work_dir: None,
            keep_clone: false,
        }
    }
}

impl PublishConfig {
    /// The directory clones are created in.
    pub fn work_dir(&self) -> PathBuf {
        self.work_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("git-republish"))
    }
}

fn default_version_pattern() -> String {
    "v{version}".to_string()
}

/// Settings for tag naming and creation.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagsConfig {
    /// Pattern of the tag added by `--tag-version`
    #[serde(default = "default_version_pattern")]
    pub version_pattern: String,

    #[serde(default)]
    pub annotated: bool,

    /// Message for annotated tags; `{tag}` is replaced by the tag name
    #[serde(default)]
    pub message: Option<String>,
}

impl Default for TagsConfig {
    fn default() -> Self {
        TagsConfig {
            version_pattern: default_version_pattern(),
            annotated: false,
            message: None,
        }
    }
}

impl TagsConfig {
    /// Message attached to `tag`, if any.
    pub fn message_for(&self, tag: &str) -> Option<String> {
        self.message
            .as_ref()
            .map(|template| template.replace("{tag}", tag))
    }
}

/// How branch names are checked before use.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RefNameCheck {
    /// Ask `git check-ref-format`
    #[default]
    Git,
    /// Apply the rule set in-process
    Native,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ValidationConfig {
    #[serde(default)]
    pub ref_names: RefNameCheck,
}

fn default_exclude() -> Vec<String> {
    vec![LOCAL_CONFIG_FILE.to_string()]
}

/// Settings for the packager.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PackageConfig {
    /// Paths (files or directories) never copied into the published tree
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        PackageConfig {
            exclude: default_exclude(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `republish.toml` in current directory
/// 3. `.republish.toml` in the user configuration directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        PathBuf::from(path)
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        PathBuf::from(LOCAL_CONFIG_FILE)
    } else if let Some(config_dir) = dirs::config_dir() {
        let user_path = config_dir.join(USER_CONFIG_FILE);
        if user_path.exists() {
            user_path
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        RepublishError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_config(&config_str)
        .map_err(|e| RepublishError::config(format!("{}: {}", path.display(), e)))
}

/// Parses configuration from TOML text.
pub fn parse_config(text: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(text)
}
