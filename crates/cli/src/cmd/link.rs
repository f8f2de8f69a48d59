use std::path::Path;

use anyhow::{Context, Result};

use crate::output::print_success;

/// Link `<dir>/<utility>` to the running executable.
pub fn cmd_link(utility: &str, dir: Option<&Path>) -> Result<()> {
  let exe = std::env::current_exe().context("Failed to locate the holen executable")?;
  let dir = match dir {
    Some(dir) => dir.to_path_buf(),
    None => exe
      .parent()
      .context("Executable has no parent directory")?
      .to_path_buf(),
  };
  let link = dir.join(utility);

  create_link(&exe, &link).with_context(|| format!("Failed to link {}", link.display()))?;
  print_success(&format!("Linked {} to {}", link.display(), exe.display()));
  Ok(())
}

#[cfg(unix)]
fn create_link(target: &Path, link: &Path) -> Result<()> {
  std::os::unix::fs::symlink(target, link)?;
  Ok(())
}

#[cfg(not(unix))]
fn create_link(_target: &Path, _link: &Path) -> Result<()> {
  anyhow::bail!("links are only supported on Unix")
}
