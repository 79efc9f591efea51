//! Local credential storage.
//!
//! A single JSON file under the platform config directory
//! (`~/.config/raindrip/config.json` on Linux) holding the verified API
//! token. Written with owner-only permissions on Unix. A missing or
//! corrupt file reads as "not logged in" rather than an error.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    pub token: Option<String>,
}

fn config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "raindrip").map(|dirs| dirs.config_dir().join("config.json"))
}

pub fn load() -> Config {
    let Some(path) = config_file() else {
        return Config::default();
    };
    match fs::read_to_string(&path) {
        Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

pub fn save(config: &Config) -> io::Result<()> {
    let Some(path) = config_file() else {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "no home directory available",
        ));
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
        }
    }
    let data = serde_json::to_string_pretty(config).map_err(io::Error::other)?;
    fs::write(&path, data)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

pub fn delete() -> io::Result<()> {
    let Some(path) = config_file() else {
        return Ok(());
    };
    match fs::remove_file(&path) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
