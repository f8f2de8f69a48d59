//! Run a utility from a downloaded executable.
//!
//! Artifacts live at `<data_dir>/bin/<name>/<version>/<name>` and are fetched
//! once. When the strategy declares a `sha256`, both fresh downloads and
//! cached artifacts are checked against it; a cached file that fails the check
//! is fetched again.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_yaml::Mapping;
use tracing::{debug, info, warn};

use super::resolver::{optional_string, required_string};
use super::{StrategyContext, StrategyKind, expand_template};
use crate::download::verify_file;
use crate::exec::Invocation;
use crate::manifest::VERSION_KEY;
use crate::template;
use crate::{Error, Result};

/// Typed fields of a merged binary strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinaryData {
  pub version: String,
  /// Download URL, possibly templated.
  pub base_url: String,
  /// Expected hex SHA256 of the downloaded file.
  pub sha256: Option<String>,
}

impl BinaryData {
  pub(super) fn decode(merged: &Mapping) -> Result<Self> {
    let kind = StrategyKind::Binary;
    Ok(Self {
      version: required_string(kind, merged, VERSION_KEY)?,
      base_url: required_string(kind, merged, "base_url")?,
      sha256: optional_string(kind, merged, "sha256")?,
    })
  }
}

pub struct BinaryStrategy<'a> {
  pub name: String,
  pub data: BinaryData,
  pub arch_map: BTreeMap<String, String>,
  ctx: StrategyContext<'a>,
}

impl<'a> BinaryStrategy<'a> {
  pub fn new(name: &str, data: BinaryData, arch_map: BTreeMap<String, String>, ctx: StrategyContext<'a>) -> Self {
    Self {
      name: name.to_string(),
      data,
      arch_map,
      ctx,
    }
  }

  /// Download the artifact if needed, then replace this process with it.
  pub fn run(&self, args: &[OsString]) -> Result<()> {
    let system = self.ctx.system;
    let template = template::resolve(&self.data.version, &self.arch_map, system);
    let url = expand_template(&template, &self.data.base_url)?;
    let path = artifact_path(&system.data_dir()?, &self.name, &self.data.version, system.os());

    if self.is_cached(&path) {
      debug!(path = %path.display(), "using cached binary");
    } else {
      self.fetch(&url, &path)?;
    }

    system.make_executable(&path).map_err(|source| Error::Io {
      path: path.clone(),
      source,
    })?;

    let invocation = Invocation::new(&path).args(args);
    info!(utility = %self.name, path = %path.display(), "running binary");
    self.ctx.runner.exec(&invocation).map_err(|source| Error::ExecFailed {
      command: invocation.to_string(),
      source,
    })
  }

  fn is_cached(&self, path: &Path) -> bool {
    if !self.ctx.system.file_exists(path) {
      return false;
    }
    let Some(expected) = &self.data.sha256 else {
      return true;
    };
    match verify_file(path, expected) {
      Ok(()) => true,
      Err(e) => {
        warn!(path = %path.display(), error = %e, "cached binary failed verification, downloading again");
        false
      }
    }
  }

  fn fetch(&self, url: &str, path: &Path) -> Result<()> {
    let failed = |source| Error::DownloadFailed {
      url: url.to_string(),
      source,
    };

    self.ctx.downloader.download_file(url, path).map_err(failed)?;

    let Some(expected) = &self.data.sha256 else {
      return Ok(());
    };
    verify_file(path, expected).map_err(|e| {
      if let Err(remove) = fs::remove_file(path) {
        warn!(path = %path.display(), error = %remove, "unable to remove unverified download");
      }
      failed(e)
    })
  }
}

/// Where the binary for `name` at `version` is stored.
pub fn artifact_path(data_dir: &Path, name: &str, version: &str, os: &str) -> PathBuf {
  let file = if os == "windows" {
    format!("{}.exe", name)
  } else {
    name.to_string()
  };
  data_dir.join("bin").join(name).join(version).join(file)
}
