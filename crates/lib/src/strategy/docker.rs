//! Run a utility from a container image.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::Path;

use serde::Serialize;
use serde_yaml::Mapping;
use tracing::{debug, info};

use super::resolver::{bool_field, required_string};
use super::{StrategyContext, StrategyKind, expand_template};
use crate::exec::Invocation;
use crate::manifest::VERSION_KEY;
use crate::template;
use crate::{Error, Result};

const DOCKER_SOCKET: &str = "/var/run/docker.sock";

/// Typed fields of a merged docker strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DockerData {
  pub version: String,
  /// Image reference, possibly templated.
  pub image: String,
  /// Bind-mount the working directory and run inside it.
  pub mount_pwd: bool,
  /// Give the container access to the host's docker socket.
  pub docker_conn: bool,
  /// Keep stdin open (`-i`), plus a TTY when stdin is a terminal.
  pub interactive: bool,
}

impl DockerData {
  pub(super) fn decode(merged: &Mapping) -> Result<Self> {
    let kind = StrategyKind::Docker;
    Ok(Self {
      version: required_string(kind, merged, VERSION_KEY)?,
      image: required_string(kind, merged, "image")?,
      mount_pwd: bool_field(kind, merged, "mount_pwd", false)?,
      docker_conn: bool_field(kind, merged, "docker_conn", false)?,
      interactive: bool_field(kind, merged, "interactive", true)?,
    })
  }
}

pub struct DockerStrategy<'a> {
  pub name: String,
  pub data: DockerData,
  pub arch_map: BTreeMap<String, String>,
  ctx: StrategyContext<'a>,
}

impl<'a> DockerStrategy<'a> {
  pub fn new(name: &str, data: DockerData, arch_map: BTreeMap<String, String>, ctx: StrategyContext<'a>) -> Self {
    Self {
      name: name.to_string(),
      data,
      arch_map,
      ctx,
    }
  }

  /// Pull the image, then replace this process with `docker run`.
  pub fn run(&self, args: &[OsString]) -> Result<()> {
    let template = template::resolve(&self.data.version, &self.arch_map, self.ctx.system);
    let image = expand_template(&template, &self.data.image)?;

    self
      .ctx
      .downloader
      .pull_docker_image(&image)
      .map_err(|source| Error::ImagePullFailed {
        image: image.clone(),
        source,
      })?;

    let cwd = if self.data.mount_pwd {
      let cwd = self.ctx.system.current_dir().map_err(|source| Error::Io {
        path: ".".into(),
        source,
      })?;
      Some(cwd)
    } else {
      None
    };
    let tty = self.data.interactive && self.ctx.system.stdin_is_terminal();

    let invocation = Invocation::new("docker").args(docker_args(&self.data, &image, cwd.as_deref(), tty, args));
    info!(utility = %self.name, image = %image, "running container");
    debug!(command = %invocation, "docker invocation");

    self
      .ctx
      .runner
      .exec(&invocation)
      .map_err(|source| Error::ExecFailed {
        command: invocation.to_string(),
        source,
      })
  }
}

/// Arguments following `docker` for running `image` with `args`.
///
/// `cwd` is mounted at the same path and used as working directory when
/// present; `tty` adds `-t` to an interactive run.
pub fn docker_args(data: &DockerData, image: &str, cwd: Option<&Path>, tty: bool, args: &[OsString]) -> Vec<OsString> {
  let mut out: Vec<OsString> = vec!["run".into(), "--rm".into()];

  if data.interactive {
    out.push("-i".into());
    if tty {
      out.push("-t".into());
    }
  }

  if let Some(cwd) = cwd {
    let mut volume = cwd.as_os_str().to_os_string();
    volume.push(":");
    volume.push(cwd);
    out.push("-v".into());
    out.push(volume);
    out.push("-w".into());
    out.push(cwd.into());
  }

  if data.docker_conn {
    out.push("-v".into());
    out.push(format!("{}:{}", DOCKER_SOCKET, DOCKER_SOCKET).into());
  }

  out.push(image.into());
  out.extend(args.iter().cloned());
  out
}
