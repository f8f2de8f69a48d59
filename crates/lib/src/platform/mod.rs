//! Platform detection and the [`System`] capability.
//!
//! Strategies never query the host directly; they go through [`System`] so
//! resolution and acquisition can be exercised against an in-memory host.

pub mod arch;
pub mod os;
pub mod paths;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use arch::Arch;
use os::Os;

use crate::Result;

/// Host facts and filesystem operations used by strategies and sources.
pub trait System {
  /// Lowercase OS identifier (`linux`, `darwin`, `windows`).
  fn os(&self) -> &str;

  /// Lowercase architecture identifier (`amd64`, `arm64`).
  fn arch(&self) -> &str;

  fn file_exists(&self, path: &Path) -> bool;

  fn make_executable(&self, path: &Path) -> std::io::Result<()>;

  /// Base directory for downloaded artifacts and source checkouts.
  fn data_dir(&self) -> Result<PathBuf>;

  fn current_dir(&self) -> std::io::Result<PathBuf>;

  fn stdin_is_terminal(&self) -> bool;
}

/// The running host.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSystem;

impl System for DefaultSystem {
  fn os(&self) -> &str {
    Os::current().map(|os| os.as_str()).unwrap_or(std::env::consts::OS)
  }

  fn arch(&self) -> &str {
    Arch::current().map(|arch| arch.as_str()).unwrap_or(std::env::consts::ARCH)
  }

  fn file_exists(&self, path: &Path) -> bool {
    path.exists()
  }

  #[cfg(unix)]
  fn make_executable(&self, path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
  }

  #[cfg(not(unix))]
  fn make_executable(&self, _path: &Path) -> std::io::Result<()> {
    Ok(())
  }

  fn data_dir(&self) -> Result<PathBuf> {
    paths::data_dir()
  }

  fn current_dir(&self) -> std::io::Result<PathBuf> {
    std::env::current_dir()
  }

  fn stdin_is_terminal(&self) -> bool {
    std::io::stdin().is_terminal()
  }
}

/// Builds the `{os}_{arch}` key manifests use in their arch maps.
pub fn arch_key(os: &str, arch: &str) -> String {
  format!("{}_{}", os, arch)
}
