//! Layered key/value configuration.
//!
//! Configuration lives in two TOML files: a system file and a per-user file.
//! Keys are addressed as `section.key`; reads merge both layers with the user
//! layer winning, writes target exactly one layer.
//!
//! ```toml
//! [strategy]
//! priority = "binary,docker"
//!
//! [source]
//! main = "justone/holen-manifests"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::platform::paths;

/// Errors reading or writing configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("invalid key '{0}': expected 'section.key'")]
  InvalidKey(String),

  #[error("failed to read config file '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse config file '{path}': {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("failed to write config file '{path}': {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to serialize configuration: {0}")]
  Serialize(#[from] toml::ser::Error),
}

/// Read access to configuration.
pub trait ConfigGetter {
  /// Look up a `section.key` value. A missing key is `Ok(None)`.
  fn get(&self, key: &str) -> Result<Option<String>, ConfigError>;

  /// Every value across all layers, keyed by `section.key`.
  fn get_all(&self) -> Result<BTreeMap<String, String>, ConfigError>;
}

/// Configuration backed by a system file and a user file.
#[derive(Debug, Clone)]
pub struct ConfigClient {
  system_config: PathBuf,
  user_config: PathBuf,
}

impl ConfigClient {
  pub fn new(system_config: impl Into<PathBuf>, user_config: impl Into<PathBuf>) -> Self {
    Self {
      system_config: system_config.into(),
      user_config: user_config.into(),
    }
  }

  /// Client over the standard locations for this platform.
  pub fn from_env() -> crate::Result<Self> {
    Ok(Self::new(paths::system_config_file(), paths::user_config_file()?))
  }

  pub fn system_config(&self) -> &Path {
    &self.system_config
  }

  pub fn user_config(&self) -> &Path {
    &self.user_config
  }

  /// Set `key` to `value` in the system or user layer.
  pub fn set(&self, system: bool, key: &str, value: &str) -> Result<(), ConfigError> {
    let (section, name) = split_key(key)?;
    let path = self.layer(system);
    let mut table = load_table(path)?;

    let entry = table
      .entry(section.to_string())
      .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    if !entry.is_table() {
      *entry = toml::Value::Table(toml::Table::new());
    }
    if let toml::Value::Table(section_table) = entry {
      section_table.insert(name.to_string(), toml::Value::String(value.to_string()));
    }

    debug!(path = %path.display(), key, "setting config value");
    save_table(path, &table)
  }

  /// Remove `key` from the system or user layer, dropping the section when it empties.
  pub fn unset(&self, system: bool, key: &str) -> Result<(), ConfigError> {
    let (section, name) = split_key(key)?;
    let path = self.layer(system);
    let mut table = load_table(path)?;

    let now_empty = match table.get_mut(section) {
      Some(toml::Value::Table(section_table)) => {
        section_table.remove(name);
        section_table.is_empty()
      }
      _ => false,
    };
    if now_empty {
      table.remove(section);
    }

    debug!(path = %path.display(), key, "unsetting config value");
    save_table(path, &table)
  }

  fn layer(&self, system: bool) -> &Path {
    if system { &self.system_config } else { &self.user_config }
  }

  fn merged(&self) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut all = BTreeMap::new();
    for path in [&self.system_config, &self.user_config] {
      flatten_into(&load_table(path)?, &mut all);
    }
    Ok(all)
  }
}

impl ConfigGetter for ConfigClient {
  fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
    split_key(key)?;
    Ok(self.merged()?.remove(key))
  }

  fn get_all(&self) -> Result<BTreeMap<String, String>, ConfigError> {
    self.merged()
  }
}

/// Split `section.key` at the first dot.
fn split_key(key: &str) -> Result<(&str, &str), ConfigError> {
  match key.split_once('.') {
    Some((section, name)) if !section.is_empty() && !name.is_empty() => Ok((section, name)),
    _ => Err(ConfigError::InvalidKey(key.to_string())),
  }
}

/// Missing files load as an empty table.
fn load_table(path: &Path) -> Result<toml::Table, ConfigError> {
  let content = match fs::read_to_string(path) {
    Ok(content) => content,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(toml::Table::new()),
    Err(source) => {
      return Err(ConfigError::Read {
        path: path.to_path_buf(),
        source,
      });
    }
  };

  toml::from_str(&content).map_err(|source| ConfigError::Parse {
    path: path.to_path_buf(),
    source,
  })
}

fn save_table(path: &Path, table: &toml::Table) -> Result<(), ConfigError> {
  let content = toml::to_string(table)?;
  let write = |path: &Path| -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(path, content.as_bytes())
  };
  write(path).map_err(|source| ConfigError::Write {
    path: path.to_path_buf(),
    source,
  })
}

fn flatten_into(table: &toml::Table, out: &mut BTreeMap<String, String>) {
  for (section, value) in table {
    let toml::Value::Table(keys) = value else {
      continue;
    };
    for (name, value) in keys {
      let rendered = match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Table(_) => continue,
        other => other.to_string(),
      };
      out.insert(format!("{}.{}", section, name), rendered);
    }
  }
}
