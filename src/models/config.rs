use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::debug;

use crate::{
    models::args::AppArgs,
    utils::{
        dir::DirUtils,
        errors::{ResultTrait, ResultWithError},
        variables::VariablesUtils,
    },
};

const LOCAL_CONFIG_FILE: &str = "layer-inspect.yaml";
const USER_CONFIG_FILE: &str = "config.yaml";

/// Optional settings read from `layer-inspect.yaml`.
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub aws: AwsSettings,
    #[serde(default)]
    pub export: ExportSettings,
}

#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AwsSettings {
    /// Shared config profile; the SDK default chain is used when unset
    pub profile: Option<String>,
    /// Custom Lambda endpoint, e.g. a local emulator
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExportSettings {
    /// Show a spinner on stderr while downloading and extracting
    #[serde(default = "default_progress")]
    pub progress: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            progress: default_progress(),
        }
    }
}

fn default_progress() -> bool {
    true
}

impl Config {
    /// Loads the configuration: an explicit path must exist, otherwise the
    /// local and then the per-user file are tried, falling back to defaults.
    pub fn load(explicit: Option<&Path>) -> ResultWithError<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover()?,
        };

        let Some(path) = path else {
            debug!("No configuration file found, using defaults");
            return Ok(Config::default());
        };

        debug!("Loading config from {:?}", path);
        let content = fs::read_to_string(&path)
            .auto_err(&format!("Could not read config file {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> ResultWithError<Self> {
        let expanded = VariablesUtils::expand_env_vars(content)?;
        debug!("Config expanded");

        // An empty document deserializes to unit, not to an empty map
        if expanded.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(&expanded).auto_err("Invalid config format")
    }

    /// Command-line flags take precedence over file values.
    pub fn apply_args(mut self, args: &AppArgs) -> Self {
        if let Some(profile) = &args.profile {
            self.aws.profile = Some(profile.clone());
        }
        if let Some(endpoint_url) = &args.endpoint_url {
            self.aws.endpoint_url = Some(endpoint_url.clone());
        }
        self
    }

    fn discover() -> ResultWithError<Option<PathBuf>> {
        let mut candidates = vec![DirUtils::curr_dir()?.join(LOCAL_CONFIG_FILE)];
        if let Some(dir) = DirUtils::config_dir() {
            candidates.push(dir.join(USER_CONFIG_FILE));
        }

        for candidate in candidates {
            debug!("Checking for config at: {:?}", candidate);
            if candidate.is_file() {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}
