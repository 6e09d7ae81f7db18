use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::EngineConfig;
use crate::errors::{AdaptError, Result};

/// File name searched for by `discover`
pub const CONFIG_FILE_NAME: &str = ".adaptmap.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

fn read_config_file(path: &Path) -> std::io::Result<String> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Load a configuration file, failing on IO or parse errors
pub fn load_from_path(path: &Path) -> Result<EngineConfig> {
    let contents = read_config_file(path)?;
    toml::from_str::<EngineConfig>(&contents).map_err(|e| {
        AdaptError::config(
            format!("Failed to parse config: {}", e),
            Some(path.to_path_buf()),
        )
    })
}

/// Try one candidate location; a missing file is not worth a warning
fn try_load_config_from_path(path: &Path) -> Option<EngineConfig> {
    match load_from_path(path) {
        Ok(config) => {
            debug!("Loaded config from {}", path.display());
            Some(config)
        }
        Err(AdaptError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!("{}. Ignoring {}", e, path.display());
            None
        }
    }
}

/// `start` followed by its parents, at most `max_depth` entries
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find the nearest `.adaptmap.toml` from `start` upwards, or use defaults
pub fn discover(start: &Path) -> EngineConfig {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            EngineConfig::default()
        })
}
