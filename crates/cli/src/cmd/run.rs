use std::ffi::OsString;

use anyhow::{Context, Result};

use holen_lib::config::ConfigClient;
use holen_lib::download::DefaultDownloader;
use holen_lib::exec::DefaultRunner;
use holen_lib::manifest::{FileManifestFinder, UtilityRequest};
use holen_lib::platform::DefaultSystem;
use holen_lib::run_utility;
use holen_lib::strategy::StrategyContext;

/// Resolve `request` and hand the process over to it.
///
/// On Unix a successful run never returns here.
pub fn cmd_run(request: &UtilityRequest, args: &[OsString]) -> Result<()> {
  let config = ConfigClient::from_env().context("Failed to locate configuration")?;
  let finder = FileManifestFinder::from_config(&config).context("Failed to build manifest search path")?;

  let system = DefaultSystem;
  let downloader = DefaultDownloader::new(DefaultRunner);
  let runner = DefaultRunner;
  let ctx = StrategyContext {
    system: &system,
    config: &config,
    downloader: &downloader,
    runner: &runner,
  };

  run_utility(&finder, request, args, ctx).with_context(|| format!("Failed to run {}", request))
}
