//! Git-backed manifest sources.
//!
//! A source is configured as `source.<name> = <spec>` and checked out under
//! `<data_dir>/sources/<name>`. The spec is expanded into a clone URL:
//!
//! | spec                    | url                                   |
//! | ----------------------- | ------------------------------------- |
//! | `owner/repo`            | `https://github.com/owner/repo.git`   |
//! | `host.tld/owner/repo`   | `https://host.tld/owner/repo.git`     |
//! | `/path/to/repo.git`     | used verbatim                         |
//! | `https://...`, `*.git`  | used verbatim                         |

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::ConfigGetter;
use crate::consts::SOURCE_SECTION;
use crate::exec::{Invocation, Runner};
use crate::platform::System;
use crate::{Error, Result};

/// A manifest repository tracked through git.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSource {
  name: String,
  spec: String,
  url: String,
}

impl GitSource {
  pub fn new(name: impl Into<String>, spec: impl Into<String>) -> Self {
    let spec = spec.into();
    Self {
      name: name.into(),
      url: resolve_url(&spec),
      spec,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn spec(&self) -> &str {
    &self.spec
  }

  pub fn url(&self) -> &str {
    &self.url
  }

  /// Checkout directory of this source under `base_dir`.
  pub fn checkout_dir(&self, base_dir: &Path) -> PathBuf {
    base_dir.join(&self.name)
  }

  pub fn info(&self) -> String {
    format!("git source: {}", self.url)
  }

  /// Clone into `<base_dir>/<name>` when absent, otherwise `git pull` inside it.
  pub fn update(&self, base_dir: &Path, system: &dyn System, runner: &dyn Runner) -> Result<()> {
    let dest = self.checkout_dir(base_dir);

    let invocation = if system.file_exists(&dest) {
      info!(source = %self.name, path = %dest.display(), "pulling source");
      Invocation::new("git").arg("pull").current_dir(&dest)
    } else {
      info!(source = %self.name, url = %self.url, "cloning source");
      Invocation::new("git")
        .args(["clone", self.url.as_str()])
        .arg(&dest)
    };

    runner.run(&invocation).map_err(|source| Error::GitOperationFailed {
      name: self.name.clone(),
      source,
    })
  }

  /// Remove `<base_dir>/<name>` recursively. Absent checkouts are not an error.
  pub fn delete(&self, base_dir: &Path) -> Result<()> {
    let dest = self.checkout_dir(base_dir);
    match std::fs::remove_dir_all(&dest) {
      Ok(()) => {
        info!(source = %self.name, path = %dest.display(), "removed source");
        Ok(())
      }
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        debug!(path = %dest.display(), "source not checked out");
        Ok(())
      }
      Err(source) => Err(Error::RemoveFailed { path: dest, source }),
    }
  }
}

impl fmt::Display for GitSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({})", self.name, self.url)
  }
}

/// Expand a source spec into a clone URL.
pub fn resolve_url(spec: &str) -> String {
  if spec.starts_with('/') || spec.starts_with('.') || spec.ends_with(".git") || spec.contains("://") {
    return spec.to_string();
  }

  let segments: Vec<&str> = spec.split('/').collect();
  match segments.as_slice() {
    [host, _, _, ..] if host.contains('.') => format!("https://{}.git", spec),
    [_, _] => format!("https://github.com/{}.git", spec),
    _ => spec.to_string(),
  }
}

/// Every `source.<name>` entry in the configuration, ordered by name.
pub fn configured_sources(config: &dyn ConfigGetter) -> Result<Vec<GitSource>> {
  let prefix = format!("{}.", SOURCE_SECTION);
  let sources = config
    .get_all()?
    .into_iter()
    .filter_map(|(key, spec)| {
      let name = key.strip_prefix(&prefix)?;
      (!name.is_empty() && !spec.is_empty()).then(|| GitSource::new(name, spec))
    })
    .collect();
  Ok(sources)
}

/// Look up configured sources by name; an empty `names` selects all of them.
pub fn select_sources(config: &dyn ConfigGetter, names: &[String]) -> Result<Vec<GitSource>> {
  let all = configured_sources(config)?;
  if names.is_empty() {
    return Ok(all);
  }

  names
    .iter()
    .map(|name| {
      all
        .iter()
        .find(|source| source.name() == name)
        .cloned()
        .ok_or_else(|| Error::UnknownSource(name.clone()))
    })
    .collect()
}
