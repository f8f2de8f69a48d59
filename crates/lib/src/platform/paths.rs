use std::path::PathBuf;

use crate::consts::{APP_NAME, MANIFESTS_DIR, SYSTEM_CONFIG, SYSTEM_CONFIG_ENV};
use crate::{Error, Result};

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> Result<PathBuf> {
  non_empty_var("USERPROFILE").map(PathBuf::from).ok_or(Error::NoHomeDir)
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> Result<PathBuf> {
  non_empty_var("HOME").map(PathBuf::from).ok_or(Error::NoHomeDir)
}

/// Returns the directory for configuration files for the application
#[cfg(windows)]
pub fn config_dir() -> Result<PathBuf> {
  match non_empty_var("APPDATA") {
    Some(appdata) => Ok(PathBuf::from(appdata).join(APP_NAME)),
    None => Ok(home_dir()?.join("AppData").join("Roaming").join(APP_NAME)),
  }
}

/// Returns the directory for configuration files for the application
#[cfg(not(windows))]
pub fn config_dir() -> Result<PathBuf> {
  let config_home = match non_empty_var("XDG_CONFIG_HOME") {
    Some(dir) => PathBuf::from(dir),
    None => home_dir()?.join(".config"),
  };
  Ok(config_home.join(APP_NAME))
}

/// Returns the directory for data files for the application
#[cfg(windows)]
pub fn data_dir() -> Result<PathBuf> {
  match non_empty_var("LOCALAPPDATA") {
    Some(local) => Ok(PathBuf::from(local).join(APP_NAME)),
    None => Ok(home_dir()?.join("AppData").join("Local").join(APP_NAME)),
  }
}

/// Returns the directory for data files for the application
#[cfg(not(windows))]
pub fn data_dir() -> Result<PathBuf> {
  let data_home = match non_empty_var("XDG_DATA_HOME") {
    Some(dir) => PathBuf::from(dir),
    None => home_dir()?.join(".local").join("share"),
  };
  Ok(data_home.join(APP_NAME))
}

/// Per-user configuration file layered over the system one.
pub fn user_config_file() -> Result<PathBuf> {
  Ok(config_dir()?.join("config"))
}

/// System-wide configuration file, overridable through `HOLEN_SYSTEM_CONFIG`.
pub fn system_config_file() -> PathBuf {
  non_empty_var(SYSTEM_CONFIG_ENV)
    .map(PathBuf::from)
    .unwrap_or_else(default_system_config_file)
}

#[cfg(windows)]
fn default_system_config_file() -> PathBuf {
  let program_data = non_empty_var("PROGRAMDATA").unwrap_or_else(|| "C:\\ProgramData".to_string());
  PathBuf::from(program_data).join(APP_NAME).join("config")
}

#[cfg(not(windows))]
fn default_system_config_file() -> PathBuf {
  PathBuf::from(SYSTEM_CONFIG)
}

/// Directory holding git checkouts of manifest sources.
pub fn sources_dir() -> Result<PathBuf> {
  Ok(data_dir()?.join("sources"))
}

/// Directory holding manifests installed directly into the data directory.
pub fn manifests_dir() -> Result<PathBuf> {
  Ok(data_dir()?.join(MANIFESTS_DIR))
}

fn non_empty_var(key: &str) -> Option<String> {
  std::env::var(key).ok().filter(|v| !v.is_empty())
}
