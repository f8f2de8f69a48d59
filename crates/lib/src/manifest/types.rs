//! Manifest data types.
//!
//! Strategy blocks are intentionally loose: apart from the `versions` list,
//! every key is an arbitrary YAML value that only gains meaning once a
//! strategy kind has been selected and its version record merged in.
//!
//! ```yaml
//! name: jq
//! strategies:
//!   docker:
//!     image: "realguess/jq:{{.Version}}"
//!     versions:
//!       - version: "1.5"
//!   binary:
//!     base_url: "https://github.com/stedolan/jq/releases/download/jq-{{.Version}}/jq-{{.MappedArch}}"
//!     arch_map:
//!       linux_amd64: linux64
//!       darwin_amd64: osx-amd64
//!     versions:
//!       - version: "1.5"
//!       - version: "1.4"
//!         base_url: "https://example.com/jq-{{.Version}}"
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Key under which a strategy block lists its version records.
pub const VERSIONS_KEY: &str = "versions";

/// Key every version record must carry.
pub const VERSION_KEY: &str = "version";

/// What the caller asked to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtilityRequest {
  pub name: String,
  pub version: Option<String>,
}

impl UtilityRequest {
  pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
    Self {
      name: name.into(),
      version: version.filter(|v| !v.is_empty()),
    }
  }

  /// Parse `name` or `name@version`.
  pub fn parse(spec: &str) -> Self {
    match spec.split_once('@') {
      Some((name, version)) => Self::new(name, Some(version.to_string())),
      None => Self::new(spec, None),
    }
  }
}

impl fmt::Display for UtilityRequest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.version {
      Some(version) => write!(f, "{}@{}", self.name, version),
      None => write!(f, "{}", self.name),
    }
  }
}

/// A parsed manifest file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestData {
  /// Utility name. Empty when the file omits it; finders fill it in.
  #[serde(default)]
  pub name: String,

  /// Short human description shown by `holen list`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub desc: Option<String>,

  /// Strategy blocks keyed by strategy kind name (`docker`, `binary`, ...).
  #[serde(default)]
  pub strategies: BTreeMap<String, StrategyBlock>,
}

/// One strategy's defaults plus its declared versions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyBlock {
  /// Version records in declared order; the first one is the default.
  pub versions: Vec<VersionRecord>,

  /// Strategy-wide keys, in declared order.
  #[serde(flatten)]
  pub defaults: Mapping,
}

/// A version-specific override layer. Must contain a `version` string.
pub type VersionRecord = Mapping;

/// The string value of a record's `version` key, if it is a string.
pub fn record_version(record: &VersionRecord) -> Option<&str> {
  record.get(VERSION_KEY).and_then(Value::as_str)
}
