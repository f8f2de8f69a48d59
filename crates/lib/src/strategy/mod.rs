//! Strategy resolution and execution.
//!
//! A manifest offers one or more strategy kinds for obtaining a utility.
//! [`load_strategy`] picks one according to the configured priority, merges
//! the strategy-wide defaults with the selected version record, and decodes
//! the result into a typed [`Strategy`]. Running it acquires the artifact and
//! replaces the current process with the tool.

mod binary;
mod docker;
pub mod merge;
mod resolver;

use std::ffi::OsString;
use std::fmt;

pub use binary::{BinaryData, BinaryStrategy, artifact_path};
pub use docker::{DockerData, DockerStrategy, docker_args};
pub use merge::merge;
pub use resolver::{load_strategy, priority};

use crate::Error;
use crate::config::ConfigGetter;
use crate::download::Downloader;
use crate::exec::Runner;
use crate::manifest::{ManifestFinder, UtilityRequest};
use crate::platform::System;
use crate::template::{self, TemplateContext};

/// The closed set of strategy kinds this build can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
  Docker,
  Binary,
}

impl StrategyKind {
  pub const ALL: [StrategyKind; 2] = [StrategyKind::Docker, StrategyKind::Binary];

  pub fn as_str(&self) -> &'static str {
    match self {
      StrategyKind::Docker => "docker",
      StrategyKind::Binary => "binary",
    }
  }

  pub fn from_name(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|kind| kind.as_str() == name)
  }
}

impl fmt::Display for StrategyKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Capabilities a strategy needs while resolving and running.
#[derive(Clone, Copy)]
pub struct StrategyContext<'a> {
  pub system: &'a dyn System,
  pub config: &'a dyn ConfigGetter,
  pub downloader: &'a dyn Downloader,
  pub runner: &'a dyn Runner,
}

/// A fully parameterized strategy, ready to run.
pub enum Strategy<'a> {
  Docker(DockerStrategy<'a>),
  Binary(BinaryStrategy<'a>),
}

impl Strategy<'_> {
  pub fn kind(&self) -> StrategyKind {
    match self {
      Strategy::Docker(_) => StrategyKind::Docker,
      Strategy::Binary(_) => StrategyKind::Binary,
    }
  }

  /// The selected version.
  pub fn version(&self) -> &str {
    match self {
      Strategy::Docker(s) => &s.data.version,
      Strategy::Binary(s) => &s.data.version,
    }
  }

  /// Acquire the artifact and hand the process over to it.
  ///
  /// With the Unix runner this only returns on failure.
  pub fn run(&self, args: &[OsString]) -> crate::Result<()> {
    match self {
      Strategy::Docker(s) => s.run(args),
      Strategy::Binary(s) => s.run(args),
    }
  }
}

impl fmt::Debug for Strategy<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Strategy::Docker(s) => f.debug_tuple("Docker").field(&s.data).finish(),
      Strategy::Binary(s) => f.debug_tuple("Binary").field(&s.data).finish(),
    }
  }
}

/// Find the manifest for `request`, resolve a strategy, and run it.
pub fn run_utility(
  finder: &dyn ManifestFinder,
  request: &UtilityRequest,
  args: &[OsString],
  ctx: StrategyContext<'_>,
) -> crate::Result<()> {
  let manifest = finder.find(request).map_err(|source| Error::ManifestLoadFailed {
    name: request.name.clone(),
    source,
  })?;
  let strategy = load_strategy(&manifest, request, ctx)?;
  strategy.run(args)
}

fn expand_template(ctx: &TemplateContext, value: &str) -> crate::Result<String> {
  template::expand(ctx, value).map_err(|source| Error::Template {
    template: value.to_string(),
    source,
  })
}
