//! Crate-level error type.
//!
//! Each subsystem owns a focused error enum; [`Error`] classifies them into the
//! kinds callers act on and attaches the context (key, url, image, source name)
//! needed to render a useful message.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::download::DownloadError;
use crate::exec::RunError;
use crate::manifest::ManifestError;
use crate::strategy::StrategyKind;
use crate::template::TemplateError;

/// Errors produced while resolving, acquiring, or executing a utility.
#[derive(Debug, Error)]
pub enum Error {
  /// None of the prioritized strategy kinds is present in the manifest.
  #[error("no strategy found, tried {priority}")]
  NoStrategyFound { priority: String },

  /// A kind listed in the priority and present in the manifest that this build cannot run.
  #[error("strategy '{0}' is not supported")]
  UnsupportedStrategy(String),

  /// The requested version is not declared by the selected strategy.
  #[error("unable to find version {version} in {kind} strategy of {name}")]
  VersionNotFound {
    name: String,
    kind: StrategyKind,
    version: String,
  },

  /// The selected strategy declares no versions at all.
  #[error("{kind} strategy of {name} declares no versions")]
  NoVersions { name: String, kind: StrategyKind },

  /// A kind-specific required key is absent after merging.
  #[error("at least '{field}' is needed for the {kind} strategy to work")]
  MissingRequiredField { kind: StrategyKind, field: &'static str },

  /// A key is present but holds a value of the wrong shape.
  #[error("invalid value for '{field}' in {kind} strategy: {message}")]
  InvalidField {
    kind: StrategyKind,
    field: String,
    message: String,
  },

  /// Template expansion of an image name or URL failed.
  #[error("unable to template '{template}': {source}")]
  Template {
    template: String,
    #[source]
    source: TemplateError,
  },

  /// `docker pull` failed.
  #[error("can't pull image {image}")]
  ImagePullFailed {
    image: String,
    #[source]
    source: RunError,
  },

  /// Downloading a binary artifact failed.
  #[error("can't download binary from {url}")]
  DownloadFailed {
    url: String,
    #[source]
    source: DownloadError,
  },

  /// A clone or pull of a git source failed.
  #[error("git operation on source '{name}' failed")]
  GitOperationFailed {
    name: String,
    #[source]
    source: RunError,
  },

  /// A source name that is not configured.
  #[error("source '{0}' is not configured")]
  UnknownSource(String),

  /// Removing a checkout directory failed.
  #[error("unable to remove {path}")]
  RemoveFailed {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The manifest could not be found or parsed.
  #[error("manifest for '{name}' not found or invalid")]
  ManifestLoadFailed {
    name: String,
    #[source]
    source: ManifestError,
  },

  /// Reading or writing configuration failed.
  #[error("configuration i/o failed")]
  ConfigIoFailed(#[from] ConfigError),

  /// Replacing the process (or running its emulation) failed.
  #[error("can't run {command}")]
  ExecFailed {
    command: String,
    #[source]
    source: RunError,
  },

  /// The home directory could not be determined.
  #[error("$HOME environment variable not found")]
  NoHomeDir,

  /// Local filesystem preparation failed.
  #[error("i/o error on {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

pub type Result<T> = std::result::Result<T, Error>;
