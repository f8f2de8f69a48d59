//! Manifest lookup on disk.
//!
//! Manifests are plain `<name>.yaml` files. They are searched for in an
//! ordered list of directories: the working directory's `manifests/`, the
//! data directory's `manifests/`, then every configured git source checkout.
//! The first match wins.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::types::{ManifestData, UtilityRequest};
use crate::config::ConfigGetter;
use crate::consts::MANIFESTS_DIR;
use crate::platform::paths;
use crate::source::configured_sources;

const EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Errors locating or parsing a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// No directory in the search path holds a manifest for the utility.
  #[error("no manifest for '{name}' in {}", format_dirs(.searched))]
  NotFound { name: String, searched: Vec<PathBuf> },

  #[error("problems with reading file '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("problems with unmarshal of '{path}': {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },
}

fn format_dirs(dirs: &[PathBuf]) -> String {
  if dirs.is_empty() {
    return "no directories".to_string();
  }
  dirs.iter().map(|d| d.display().to_string()).collect::<Vec<_>>().join(", ")
}

/// Supplies the manifest for a requested utility.
pub trait ManifestFinder {
  fn find(&self, request: &UtilityRequest) -> Result<ManifestData, ManifestError>;
}

/// A directory searched for manifests, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDir {
  /// `local`, `data`, or the name of a git source.
  pub origin: String,
  pub path: PathBuf,
}

impl ManifestDir {
  pub fn new(origin: impl Into<String>, path: impl Into<PathBuf>) -> Self {
    Self {
      origin: origin.into(),
      path: path.into(),
    }
  }
}

/// One manifest available for dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
  pub name: String,
  pub origin: String,
  pub path: PathBuf,
}

/// Finds manifests in an ordered list of directories.
#[derive(Debug, Clone, Default)]
pub struct FileManifestFinder {
  dirs: Vec<ManifestDir>,
}

impl FileManifestFinder {
  pub fn new(dirs: Vec<ManifestDir>) -> Self {
    Self { dirs }
  }

  /// The standard search path: `./manifests`, `<data>/manifests`, then each
  /// configured source's `manifests/` directory in name order.
  pub fn from_config(config: &dyn ConfigGetter) -> crate::Result<Self> {
    let mut dirs = vec![
      ManifestDir::new("local", MANIFESTS_DIR),
      ManifestDir::new("data", paths::manifests_dir()?),
    ];

    let sources_dir = paths::sources_dir()?;
    for source in configured_sources(config)? {
      let path = sources_dir.join(source.name()).join(MANIFESTS_DIR);
      dirs.push(ManifestDir::new(source.name(), path));
    }

    Ok(Self::new(dirs))
  }

  pub fn dirs(&self) -> &[ManifestDir] {
    &self.dirs
  }

  /// All manifests visible through the search path, optionally restricted to
  /// one origin. Shadowed manifests (same name later in the path) are included
  /// so callers can see every copy.
  pub fn list(&self, source: Option<&str>) -> Result<Vec<ManifestEntry>, ManifestError> {
    let mut entries = Vec::new();

    for dir in &self.dirs {
      if source.is_some_and(|s| s != dir.origin) {
        continue;
      }

      let read_dir = match fs::read_dir(&dir.path) {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
        Err(source) => {
          return Err(ManifestError::Read {
            path: dir.path.clone(),
            source,
          });
        }
      };

      let mut found = Vec::new();
      for entry in read_dir {
        let path = entry
          .map_err(|source| ManifestError::Read {
            path: dir.path.clone(),
            source,
          })?
          .path();
        if let Some(name) = manifest_name(&path) {
          found.push(ManifestEntry {
            name,
            origin: dir.origin.clone(),
            path,
          });
        }
      }
      found.sort_by(|a, b| a.name.cmp(&b.name));
      entries.extend(found);
    }

    Ok(entries)
  }

  fn locate(&self, name: &str) -> Option<PathBuf> {
    self
      .dirs
      .iter()
      .flat_map(|dir| EXTENSIONS.iter().map(move |ext| dir.path.join(format!("{}.{}", name, ext))))
      .find(|candidate| candidate.is_file())
  }
}

impl ManifestFinder for FileManifestFinder {
  fn find(&self, request: &UtilityRequest) -> Result<ManifestData, ManifestError> {
    let Some(path) = self.locate(&request.name) else {
      return Err(ManifestError::NotFound {
        name: request.name.clone(),
        searched: self.dirs.iter().map(|d| d.path.clone()).collect(),
      });
    };

    info!(path = %path.display(), "attempting to load manifest");
    let mut manifest = load_manifest(&path)?;
    if manifest.name.is_empty() {
      manifest.name = request.name.clone();
    } else if manifest.name != request.name {
      warn!(file = %manifest.name, requested = %request.name, "manifest name differs from utility name");
    }

    debug!(?manifest, "manifest found");
    Ok(manifest)
  }
}

/// Read and parse a single manifest file.
pub fn load_manifest(path: &Path) -> Result<ManifestData, ManifestError> {
  let data = fs::read_to_string(path).map_err(|source| ManifestError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  serde_yaml::from_str(&data).map_err(|source| ManifestError::Parse {
    path: path.to_path_buf(),
    source,
  })
}

fn manifest_name(path: &Path) -> Option<String> {
  let ext = path.extension()?.to_str()?;
  if !EXTENSIONS.contains(&ext) || !path.is_file() {
    return None;
  }
  path.file_stem()?.to_str().map(str::to_string)
}
