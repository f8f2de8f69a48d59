//! Arch resolution and template expansion for image names and URLs.
//!
//! Templates use the `{{.Name}}` placeholder form. Only four variables exist:
//!
//! - `{{.Version}}` - the selected version
//! - `{{.OS}}` - lowercase OS identifier (`linux`, `darwin`)
//! - `{{.Arch}}` - lowercase architecture identifier (`amd64`, `arm64`)
//! - `{{.MappedArch}}` - the arch-map entry for `{OS}_{Arch}`, or empty
//!
//! Whitespace inside the braces is ignored. Any other placeholder is an error,
//! so a typo never silently expands to an empty string.
//!
//! # Example
//!
//! ```
//! use holen_lib::template::{TemplateContext, expand};
//!
//! let ctx = TemplateContext {
//!   version: "1.5".to_string(),
//!   os: "linux".to_string(),
//!   arch: "amd64".to_string(),
//!   mapped_arch: "linux64".to_string(),
//! };
//! assert_eq!(expand(&ctx, "jq-{{.Version}}-{{ .MappedArch }}").unwrap(), "jq-1.5-linux64");
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::platform::{System, arch_key};

/// Errors parsing or expanding a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
  #[error("unclosed placeholder at position {0}")]
  Unclosed(usize),

  #[error("unknown template variable: {0}")]
  UnknownVariable(String),

  #[error("malformed placeholder: {{{{{0}}}}}")]
  Malformed(String),
}

/// A substitution variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
  Version,
  Os,
  Arch,
  MappedArch,
}

impl Variable {
  fn from_name(name: &str) -> Option<Self> {
    match name {
      "Version" => Some(Self::Version),
      "OS" => Some(Self::Os),
      "Arch" => Some(Self::Arch),
      "MappedArch" => Some(Self::MappedArch),
      _ => None,
    }
  }
}

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  Literal(String),
  Variable(Variable),
}

/// Values available to templates during one strategy run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateContext {
  pub version: String,
  pub os: String,
  pub arch: String,
  pub mapped_arch: String,
}

impl TemplateContext {
  fn value(&self, variable: Variable) -> &str {
    match variable {
      Variable::Version => &self.version,
      Variable::Os => &self.os,
      Variable::Arch => &self.arch,
      Variable::MappedArch => &self.mapped_arch,
    }
  }
}

/// Build the template context for `version` on the host described by `system`.
///
/// A missing arch-map entry yields an empty `mapped_arch`; templates that do not
/// reference it are unaffected.
pub fn resolve(version: &str, arch_map: &BTreeMap<String, String>, system: &dyn System) -> TemplateContext {
  let key = arch_key(system.os(), system.arch());
  let mapped_arch = arch_map.get(&key).cloned().unwrap_or_default();
  debug!(arch_key = %key, mapped_arch = %mapped_arch, "resolved arch key");

  TemplateContext {
    version: version.to_string(),
    os: system.os().to_string(),
    arch: system.arch().to_string(),
    mapped_arch,
  }
}

/// Parse a template into literal and variable segments.
pub fn parse(input: &str) -> Result<Vec<Segment>, TemplateError> {
  let mut segments = Vec::new();
  let mut rest = input;
  let mut offset = 0;

  while let Some(start) = rest.find("{{") {
    if start > 0 {
      segments.push(Segment::Literal(rest[..start].to_string()));
    }

    let after_open = &rest[start + 2..];
    let end = after_open.find("}}").ok_or(TemplateError::Unclosed(offset + start))?;
    let inner = after_open[..end].trim();

    let name = inner
      .strip_prefix('.')
      .filter(|name| !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
      .ok_or_else(|| TemplateError::Malformed(inner.to_string()))?;
    let variable = Variable::from_name(name).ok_or_else(|| TemplateError::UnknownVariable(name.to_string()))?;
    segments.push(Segment::Variable(variable));

    let consumed = start + 2 + end + 2;
    offset += consumed;
    rest = &rest[consumed..];
  }

  if !rest.is_empty() {
    segments.push(Segment::Literal(rest.to_string()));
  }

  Ok(segments)
}

/// Expand every placeholder in `template` from `ctx`.
pub fn expand(ctx: &TemplateContext, template: &str) -> Result<String, TemplateError> {
  let mut out = String::with_capacity(template.len());
  for segment in parse(template)? {
    match segment {
      Segment::Literal(text) => out.push_str(&text),
      Segment::Variable(variable) => out.push_str(ctx.value(variable)),
    }
  }
  Ok(out)
}
