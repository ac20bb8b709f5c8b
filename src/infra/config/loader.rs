use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::infra::{
    config::{file_config::FileConfig, CoreConfig},
    error::CoreError,
};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Loads the config from `path` (or `./config.toml`), overlaying file
/// values on the defaults. A missing file is not an error: defaults apply.
pub fn load(path: Option<&Path>) -> Result<CoreConfig, CoreError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = CoreConfig::default();

    if !config_path.exists() {
        return Ok(config);
    }

    let raw = fs::read_to_string(&config_path).map_err(|source| CoreError::ConfigRead {
        path: config_path.clone(),
        source,
    })?;

    let file_config: FileConfig = toml::from_str(&raw).map_err(|source| CoreError::ConfigParse {
        path: config_path,
        source,
    })?;

    file_config.merge_into(&mut config);
    Ok(config)
}
