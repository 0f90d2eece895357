pub mod builder;
pub mod defaults;
pub mod file;

use crate::error::Result;
use directories::ProjectDirs;
use file::FileConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE_NAME: &str = "config.toml";

/// `<platform config dir>/foldseq/config.toml`, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "foldseq", "foldseq").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// An explicit path must exist; the platform default is optional.
pub fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig> {
    if let Some(path) = explicit {
        return FileConfig::from_file(path);
    }
    match default_config_path() {
        Some(path) if path.is_file() => FileConfig::from_file(&path),
        Some(path) => {
            debug!("No configuration file at {:?}, using built-in defaults.", path);
            Ok(FileConfig::default())
        }
        None => Ok(FileConfig::default()),
    }
}
