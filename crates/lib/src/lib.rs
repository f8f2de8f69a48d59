//! holen-lib: manifest-driven utility dispatch.
//!
//! Given a utility name (usually the name the binary was invoked under), this
//! crate finds the utility's manifest, selects an acquisition strategy, makes
//! the artifact available, and hands the process over to it:
//!
//! - [`manifest`]: manifest data types and on-disk lookup
//! - [`strategy`]: priority selection, version merge, docker and binary runs
//! - [`template`]: arch-map resolution and `{{.Var}}` expansion
//! - [`exec`], [`download`]: process control and artifact acquisition
//! - [`config`], [`source`]: layered configuration and git manifest sources

pub mod config;
pub mod consts;
pub mod download;
mod error;
pub mod exec;
pub mod manifest;
pub mod platform;
pub mod source;
pub mod strategy;
pub mod template;
pub mod util;

pub use error::{Error, Result};
pub use strategy::run_utility;
