//! Test utilities for holen-lib.
//!
//! In-memory stand-ins for the capabilities strategies depend on, plus
//! cross-platform helpers for tests that need to execute shell commands.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, ConfigGetter};
use crate::download::{DownloadError, Downloader};
use crate::exec::{Invocation, RunError, Runner};
use crate::platform::System;

/// A host with fixed identifiers and a set of paths that "exist".
#[derive(Debug)]
pub struct MemSystem {
  pub os: String,
  pub arch: String,
  pub data_dir: PathBuf,
  pub cwd: PathBuf,
  pub tty: bool,
  files: RefCell<BTreeSet<PathBuf>>,
  executables: RefCell<Vec<PathBuf>>,
}

impl MemSystem {
  pub fn new(os: &str, arch: &str) -> Self {
    Self {
      os: os.to_string(),
      arch: arch.to_string(),
      data_dir: PathBuf::from("/data/holen"),
      cwd: PathBuf::from("/work"),
      tty: false,
      files: RefCell::default(),
      executables: RefCell::default(),
    }
  }

  pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.data_dir = dir.into();
    self
  }

  pub fn add_file(&self, path: impl Into<PathBuf>) {
    self.files.borrow_mut().insert(path.into());
  }

  pub fn executables(&self) -> Vec<PathBuf> {
    self.executables.borrow().clone()
  }
}

impl Default for MemSystem {
  fn default() -> Self {
    Self::new("linux", "amd64")
  }
}

impl System for MemSystem {
  fn os(&self) -> &str {
    &self.os
  }

  fn arch(&self) -> &str {
    &self.arch
  }

  fn file_exists(&self, path: &Path) -> bool {
    self.files.borrow().contains(path)
  }

  fn make_executable(&self, path: &Path) -> std::io::Result<()> {
    self.executables.borrow_mut().push(path.to_path_buf());
    Ok(())
  }

  fn data_dir(&self) -> crate::Result<PathBuf> {
    Ok(self.data_dir.clone())
  }

  fn current_dir(&self) -> std::io::Result<PathBuf> {
    Ok(self.cwd.clone())
  }

  fn stdin_is_terminal(&self) -> bool {
    self.tty
  }
}

/// Records every invocation instead of running it.
#[derive(Debug, Default)]
pub struct MemRunner {
  invocations: RefCell<Vec<Invocation>>,
  /// Invocations whose rendered command starts with this prefix fail with exit code 1.
  pub fail_prefix: Option<String>,
}

impl MemRunner {
  pub fn failing(prefix: &str) -> Self {
    Self {
      fail_prefix: Some(prefix.to_string()),
      ..Default::default()
    }
  }

  pub fn history(&self) -> Vec<String> {
    self.invocations.borrow().iter().map(|i| i.to_string()).collect()
  }

  pub fn invocations(&self) -> Vec<Invocation> {
    self.invocations.borrow().clone()
  }

  fn record(&self, invocation: &Invocation) -> Result<(), RunError> {
    self.invocations.borrow_mut().push(invocation.clone());
    let command = invocation.to_string();
    match &self.fail_prefix {
      Some(prefix) if command.starts_with(prefix.as_str()) => Err(RunError::Failed { command, code: Some(1) }),
      _ => Ok(()),
    }
  }
}

impl Runner for MemRunner {
  fn run(&self, invocation: &Invocation) -> Result<(), RunError> {
    self.record(invocation)
  }

  fn exec(&self, invocation: &Invocation) -> Result<(), RunError> {
    self.record(invocation)
  }

  fn check(&self, invocation: &Invocation) -> bool {
    self.record(invocation).is_ok()
  }

  fn run_to_file(&self, invocation: &Invocation, _output: &Path) -> Result<(), RunError> {
    self.record(invocation)
  }
}

/// Writes fixed content for downloads and records pulls.
#[derive(Debug)]
pub struct MemDownloader {
  pub content: String,
  pub fail_download: bool,
  pub fail_pull: bool,
  downloads: RefCell<Vec<(String, PathBuf)>>,
  pulls: RefCell<Vec<String>>,
  calls: Cell<usize>,
}

impl Default for MemDownloader {
  fn default() -> Self {
    Self {
      content: "binary".to_string(),
      fail_download: false,
      fail_pull: false,
      downloads: RefCell::default(),
      pulls: RefCell::default(),
      calls: Cell::new(0),
    }
  }
}

impl MemDownloader {
  pub fn failing_download() -> Self {
    Self {
      fail_download: true,
      ..Default::default()
    }
  }

  pub fn failing_pull() -> Self {
    Self {
      fail_pull: true,
      ..Default::default()
    }
  }

  pub fn with_content(content: &str) -> Self {
    Self {
      content: content.to_string(),
      ..Default::default()
    }
  }

  pub fn downloads(&self) -> Vec<(String, PathBuf)> {
    self.downloads.borrow().clone()
  }

  pub fn pulls(&self) -> Vec<String> {
    self.pulls.borrow().clone()
  }

  pub fn calls(&self) -> usize {
    self.calls.get()
  }
}

impl Downloader for MemDownloader {
  fn download_file(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
    self.calls.set(self.calls.get() + 1);
    self.downloads.borrow_mut().push((url.to_string(), dest.to_path_buf()));
    let io_err = |source| DownloadError::Io {
      path: dest.to_path_buf(),
      source,
    };
    if self.fail_download {
      return Err(io_err(std::io::Error::other("simulated failure")));
    }
    if let Some(parent) = dest.parent() {
      std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(dest, &self.content).map_err(io_err)
  }

  fn pull_docker_image(&self, image: &str) -> Result<(), RunError> {
    self.calls.set(self.calls.get() + 1);
    self.pulls.borrow_mut().push(image.to_string());
    if self.fail_pull {
      return Err(RunError::Failed {
        command: format!("docker pull {}", image),
        code: Some(1),
      });
    }
    Ok(())
  }
}

/// Configuration held in a map.
#[derive(Debug, Default)]
pub struct MemConfig {
  pub values: BTreeMap<String, String>,
}

impl MemConfig {
  pub fn with(pairs: &[(&str, &str)]) -> Self {
    Self {
      values: pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
    }
  }
}

impl ConfigGetter for MemConfig {
  fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
    Ok(self.values.get(key).cloned())
  }

  fn get_all(&self) -> Result<BTreeMap<String, String>, ConfigError> {
    Ok(self.values.clone())
  }
}

/// Returns the shell command and args to echo an environment variable.
#[cfg(unix)]
pub fn shell_echo_env(var: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), format!("echo \"${}\"", var)])
}

#[cfg(windows)]
pub fn shell_echo_env(var: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), format!("echo %{}%", var)])
}

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// Returns the command and args to echo a message.
#[cfg(unix)]
pub fn echo_msg(msg: &str) -> (&'static str, Vec<String>) {
  ("/bin/echo", vec![msg.to_string()])
}

#[cfg(windows)]
pub fn echo_msg(msg: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), format!("echo {}", msg)])
}
