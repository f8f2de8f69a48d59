use anyhow::{Context, Result};

use holen_lib::config::ConfigClient;
use holen_lib::manifest::FileManifestFinder;

use crate::output::{print_entry, print_info, print_json};

pub fn cmd_list(source: Option<&str>, json: bool) -> Result<()> {
  let config = ConfigClient::from_env()?;
  let finder = FileManifestFinder::from_config(&config)?;
  let entries = finder.list(source).context("Failed to list manifests")?;

  if json {
    return print_json(&entries);
  }

  if entries.is_empty() {
    print_info("No utilities found");
    return Ok(());
  }

  for entry in &entries {
    print_entry(&entry.name, &entry.origin);
  }
  Ok(())
}
