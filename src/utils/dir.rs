use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::utils::errors::{ResultTrait, ResultWithError};

pub struct DirUtils;

impl DirUtils {
    pub fn curr_dir() -> ResultWithError<PathBuf> {
        std::env::current_dir().auto_err("Could not read current directory")
    }

    /// Per-user configuration directory of the tool, if the platform has one.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("layer-inspect"))
    }

    /// Makes `path` absolute against the current directory and creates it,
    /// including any missing parents.
    pub fn ensure_absolute_dir(path: &Path) -> io::Result<PathBuf> {
        let absolute = std::path::absolute(path)?;
        debug!("Creating directory {:?}", absolute);
        std::fs::create_dir_all(&absolute)?;
        Ok(absolute)
    }
}
