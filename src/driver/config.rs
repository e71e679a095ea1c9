use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    options::Options,
};

pub const CONFIG_FILE_NAME: &str = "Coder.toml";

/// A project config file. Namely Coder.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Option overrides layered under every request and snippet.
    #[serde(default)]
    pub defaults: BTreeMap<String, toml::Value>,
    /// Custom highlighting styles, by name.
    #[serde(default)]
    pub styles: BTreeMap<String, StyleConfig>,
}

/// Defines a custom style.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleConfig {
    /// The style this one starts from, builtin or custom.
    pub inherit: Option<String>,
    /// The `#rrggbb` page background.
    pub background: Option<String>,
    /// Token rules keyed by dotted token path (`"Comment.Single"`).
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Looks for `Coder.toml` in `dir` and its ancestors.
    pub fn find(dir: &Path) -> Option<PathBuf> {
        dir.ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|path| path.is_file())
    }

    /// The explicitly given config, else the one found from `dir`, else an
    /// empty one.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Config> {
        match explicit.map(Path::to_path_buf).or_else(|| Config::find(dir)) {
            Some(path) => Config::load(&path),
            None => Ok(Config::default()),
        }
    }

    /// `options` with the configured defaults applied on top.
    pub fn apply_defaults(&self, options: &Options) -> Result<Options> {
        let mut options = options.clone();
        for (key, value) in &self.defaults {
            let text = match value {
                toml::Value::String(text) => text.clone(),
                toml::Value::Integer(number) => number.to_string(),
                toml::Value::Float(number) => number.to_string(),
                toml::Value::Boolean(flag) => flag.to_string(),
                other => {
                    return Err(Error::InvalidOption {
                        key: key.clone(),
                        value: other.to_string(),
                    });
                }
            };
            options.set(key, &text)?;
        }
        Ok(options)
    }
}
