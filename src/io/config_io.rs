use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

pub const CONFIG_FILE_NAME: &str = "tasklist.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("cannot resolve directory '{path}': {source}")]
    DirError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where a tasklist lives: the working directory, its config, and the data file
#[derive(Debug, Clone)]
pub struct Workspace {
    pub dir: PathBuf,
    pub config: Config,
    pub data_file: PathBuf,
}

impl Workspace {
    /// Resolve from an optional `-C` directory (default: current directory)
    /// and an optional `--file` override.
    pub fn resolve(dir: Option<&Path>, file: Option<&Path>) -> Result<Self, ConfigError> {
        let dir = match dir {
            Some(d) => fs::canonicalize(d).map_err(|e| ConfigError::DirError {
                path: d.to_path_buf(),
                source: e,
            })?,
            None => std::env::current_dir().map_err(|e| ConfigError::DirError {
                path: PathBuf::from("."),
                source: e,
            })?,
        };
        let config = read_config(&dir)?;
        let data_file = resolve_data_file(&dir, &config, file);
        Ok(Workspace {
            dir,
            config,
            data_file,
        })
    }
}

/// Read `tasklist.toml` from `dir`. A missing file yields the defaults.
pub fn read_config(dir: &Path) -> Result<Config, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError { path, source: e })
}

/// Resolve the data file: an explicit `--file` wins, then `[store] file`
/// from the config, both relative to `dir`.
pub fn resolve_data_file(dir: &Path, config: &Config, file_override: Option<&Path>) -> PathBuf {
    match file_override {
        Some(f) if f.is_absolute() => f.to_path_buf(),
        Some(f) => dir.join(f),
        None => dir.join(&config.store.file),
    }
}
