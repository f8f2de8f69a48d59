//! Artifact acquisition: HTTP downloads and container image pulls.
//!
//! Downloads are streamed into a temporary file next to the destination and
//! only moved into place once the body has been fully received, so an
//! interrupted transfer never leaves a file that looks complete. Retrying
//! always starts from scratch.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use crate::exec::{DefaultRunner, Invocation, RunError, Runner};

/// Errors fetching a file over HTTP.
#[derive(Debug, Error)]
pub enum DownloadError {
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("server responded with HTTP {0}")]
  Status(reqwest::StatusCode),

  #[error("unable to save downloaded file '{path}': {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("hash mismatch: expected {expected}, got {actual}")]
  HashMismatch { expected: String, actual: String },
}

/// Fetches artifacts for strategies.
pub trait Downloader {
  /// Download `url` to `dest`, replacing whatever is there.
  fn download_file(&self, url: &str, dest: &Path) -> Result<(), DownloadError>;

  /// Make `image` available to the local container runtime.
  fn pull_docker_image(&self, image: &str) -> Result<(), RunError>;
}

/// Blocking HTTP client plus `docker pull` through a [`Runner`].
#[derive(Debug, Clone)]
pub struct DefaultDownloader<R = DefaultRunner> {
  runner: R,
  client: reqwest::blocking::Client,
}

impl<R: Runner> DefaultDownloader<R> {
  pub fn new(runner: R) -> Self {
    Self {
      runner,
      client: reqwest::blocking::Client::new(),
    }
  }
}

impl Default for DefaultDownloader {
  fn default() -> Self {
    Self::new(DefaultRunner)
  }
}

impl<R: Runner> Downloader for DefaultDownloader<R> {
  fn download_file(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
    info!(url = %url, path = %dest.display(), "downloading file");

    let io_err = |source: io::Error| DownloadError::Io {
      path: dest.to_path_buf(),
      source,
    };

    let parent = match dest.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
      _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(io_err)?;

    let mut response = self.client.get(url).send()?;
    if !response.status().is_success() {
      return Err(DownloadError::Status(response.status()));
    }

    let mut partial = NamedTempFile::new_in(&parent).map_err(io_err)?;
    let size = response.copy_to(partial.as_file_mut())?;
    partial.persist(dest).map_err(|e| io_err(e.error))?;

    debug!(path = %dest.display(), size, "download complete");
    Ok(())
  }

  fn pull_docker_image(&self, image: &str) -> Result<(), RunError> {
    info!(image = %image, "pulling image");
    self.runner.run(&Invocation::new("docker").args(["pull", image]))
  }
}

/// Lowercase hex SHA256 of a file's contents.
pub fn hash_file(path: &Path) -> io::Result<String> {
  let mut file = File::open(path)?;
  let mut hasher = Sha256::new();
  io::copy(&mut file, &mut hasher)?;
  Ok(hex::encode(hasher.finalize()))
}

/// Check `path` against an expected SHA256 (case-insensitive hex).
pub fn verify_file(path: &Path, expected: &str) -> Result<(), DownloadError> {
  let actual = hash_file(path).map_err(|source| DownloadError::Io {
    path: path.to_path_buf(),
    source,
  })?;
  if actual.eq_ignore_ascii_case(expected.trim()) {
    Ok(())
  } else {
    Err(DownloadError::HashMismatch {
      expected: expected.to_string(),
      actual,
    })
  }
}
