use std::fs;

use anyhow::{Context, Result};

use holen_lib::config::ConfigClient;
use holen_lib::exec::DefaultRunner;
use holen_lib::platform::{DefaultSystem, paths};
use holen_lib::source::{configured_sources, select_sources};

use crate::output::{print_entry, print_info, print_success};

pub fn cmd_source_update(names: &[String]) -> Result<()> {
  let config = ConfigClient::from_env()?;
  let sources = select_sources(&config, names)?;
  if sources.is_empty() {
    print_info("No sources configured");
    return Ok(());
  }

  let base_dir = paths::sources_dir()?;
  fs::create_dir_all(&base_dir).with_context(|| format!("Failed to create {}", base_dir.display()))?;

  for source in &sources {
    source
      .update(&base_dir, &DefaultSystem, &DefaultRunner)
      .with_context(|| format!("Failed to update source '{}'", source.name()))?;
    print_success(&format!("Updated {}", source.name()));
  }
  Ok(())
}

pub fn cmd_source_delete(name: &str) -> Result<()> {
  let config = ConfigClient::from_env()?;
  let base_dir = paths::sources_dir()?;

  for source in select_sources(&config, &[name.to_string()])? {
    source.delete(&base_dir)?;
    print_success(&format!("Deleted checkout of {}", source.name()));
  }
  Ok(())
}

pub fn cmd_source_list() -> Result<()> {
  let config = ConfigClient::from_env()?;
  let sources = configured_sources(&config)?;
  if sources.is_empty() {
    print_info("No sources configured");
    return Ok(());
  }

  for source in &sources {
    print_entry(source.name(), &source.info());
  }
  Ok(())
}
