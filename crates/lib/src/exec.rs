//! Process execution.
//!
//! Three modes are provided through the [`Runner`] capability:
//!
//! - **run**: supervised child with inherited stdio; the caller continues afterwards
//! - **exec**: replace the current process with the target; on Unix this never
//!   returns on success, elsewhere the child is supervised and its exit status
//!   becomes ours
//! - **run_to_file**: supervised child whose stdout is written to a file
//!
//! [`Runner::check`] runs a probe silently and reports success.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;
use tracing::debug;

/// Errors starting or waiting on a child process.
#[derive(Debug, Error)]
pub enum RunError {
  #[error("failed to start '{program}': {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  #[error("command failed with exit code {code:?}: {command}")]
  Failed { command: String, code: Option<i32> },

  #[error("failed to create output file '{path}': {source}")]
  Output {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// A program, its arguments, and the environment it runs in.
///
/// Program and arguments are OS strings so paths and forwarded arguments reach
/// the child byte-for-byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
  pub program: OsString,
  pub args: Vec<OsString>,
  pub cwd: Option<PathBuf>,
  /// Variables layered over the inherited environment.
  pub env: Vec<(String, String)>,
}

impl Invocation {
  pub fn new(program: impl AsRef<OsStr>) -> Self {
    Self {
      program: program.as_ref().to_os_string(),
      ..Default::default()
    }
  }

  pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
    self.args.push(arg.as_ref().to_os_string());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
  {
    self.args.extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
    self
  }

  pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.cwd = Some(dir.into());
    self
  }

  pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.env.push((key.into(), value.into()));
    self
  }

  fn command(&self) -> Command {
    let mut command = Command::new(&self.program);
    command.args(&self.args);
    if let Some(cwd) = &self.cwd {
      command.current_dir(cwd);
    }
    for (key, value) in &self.env {
      command.env(key, value);
    }
    command
  }

  fn spawn_error(&self, source: std::io::Error) -> RunError {
    RunError::Spawn {
      program: self.program.to_string_lossy().into_owned(),
      source,
    }
  }

  fn check_status(&self, status: ExitStatus) -> Result<(), RunError> {
    if status.success() {
      Ok(())
    } else {
      Err(RunError::Failed {
        command: self.to_string(),
        code: status.code(),
      })
    }
  }
}

/// Shell-like rendering for logs and error messages, never parsed back.
///
/// Empty words and words containing whitespace, quotes or backslashes are
/// quoted. Bytes that are not UTF-8 are shown lossily.
impl fmt::Display for Invocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write_word(f, &self.program)?;
    for arg in &self.args {
      f.write_str(" ")?;
      write_word(f, arg)?;
    }
    Ok(())
  }
}

fn write_word(f: &mut fmt::Formatter<'_>, word: &OsStr) -> fmt::Result {
  let word = word.to_string_lossy();
  let needs_quotes = word.is_empty() || word.chars().any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\'));
  if needs_quotes {
    write!(f, "{:?}", word)
  } else {
    f.write_str(&word)
  }
}

/// Process control used by strategies, the downloader, and git sources.
pub trait Runner {
  /// Run to completion with inherited stdio; non-zero exit is an error.
  fn run(&self, invocation: &Invocation) -> Result<(), RunError>;

  /// Replace the current process with `invocation`.
  ///
  /// Returns only if the replacement could not be started. Anything that must
  /// happen before the target runs (cleanup, flushing) has to happen before
  /// calling this.
  fn exec(&self, invocation: &Invocation) -> Result<(), RunError>;

  /// Run silently and report whether it succeeded.
  fn check(&self, invocation: &Invocation) -> bool;

  /// Run to completion with stdout written to `output` (truncated first).
  fn run_to_file(&self, invocation: &Invocation, output: &Path) -> Result<(), RunError>;
}

impl<R: Runner + ?Sized> Runner for &R {
  fn run(&self, invocation: &Invocation) -> Result<(), RunError> {
    (**self).run(invocation)
  }

  fn exec(&self, invocation: &Invocation) -> Result<(), RunError> {
    (**self).exec(invocation)
  }

  fn check(&self, invocation: &Invocation) -> bool {
    (**self).check(invocation)
  }

  fn run_to_file(&self, invocation: &Invocation, output: &Path) -> Result<(), RunError> {
    (**self).run_to_file(invocation, output)
  }
}

/// Runs real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRunner;

impl Runner for DefaultRunner {
  fn run(&self, invocation: &Invocation) -> Result<(), RunError> {
    debug!(command = %invocation, cwd = ?invocation.cwd, "running command");
    let status = invocation
      .command()
      .stdin(Stdio::inherit())
      .stdout(Stdio::inherit())
      .stderr(Stdio::inherit())
      .status()
      .map_err(|e| invocation.spawn_error(e))?;
    invocation.check_status(status)
  }

  fn exec(&self, invocation: &Invocation) -> Result<(), RunError> {
    debug!(command = %invocation, extra_env = ?invocation.env, "replacing process");
    replace_process(invocation)
  }

  fn check(&self, invocation: &Invocation) -> bool {
    debug!(command = %invocation, "checking command");
    invocation
      .command()
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .status()
      .is_ok_and(|status| status.success())
  }

  fn run_to_file(&self, invocation: &Invocation, output: &Path) -> Result<(), RunError> {
    debug!(command = %invocation, output = %output.display(), "running command to file");
    let file = File::create(output).map_err(|source| RunError::Output {
      path: output.to_path_buf(),
      source,
    })?;
    let status = invocation
      .command()
      .stdin(Stdio::inherit())
      .stdout(file)
      .stderr(Stdio::inherit())
      .status()
      .map_err(|e| invocation.spawn_error(e))?;
    invocation.check_status(status)
  }
}

#[cfg(unix)]
fn replace_process(invocation: &Invocation) -> Result<(), RunError> {
  use std::os::unix::process::CommandExt;

  let mut command = invocation.command();
  let arg0 = Path::new(&invocation.program)
    .file_name()
    .map(|name| name.to_os_string())
    .unwrap_or_else(|| invocation.program.clone());
  command.arg0(arg0);

  // exec only returns on failure
  let source = command.exec();
  Err(invocation.spawn_error(source))
}

#[cfg(not(unix))]
fn replace_process(invocation: &Invocation) -> Result<(), RunError> {
  let status = invocation
    .command()
    .status()
    .map_err(|e| invocation.spawn_error(e))?;
  std::process::exit(status.code().unwrap_or(1));
}
