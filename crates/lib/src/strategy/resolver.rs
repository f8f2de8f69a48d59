//! Strategy selection and decoding.

use std::collections::BTreeMap;

use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use super::binary::{BinaryData, BinaryStrategy};
use super::docker::{DockerData, DockerStrategy};
use super::merge::{get, merge};
use super::{Strategy, StrategyContext, StrategyKind};
use crate::config::ConfigGetter;
use crate::consts::{DEFAULT_PRIORITY, PRIORITY_KEY};
use crate::manifest::{ManifestData, StrategyBlock, UtilityRequest, VERSION_KEY, VersionRecord, record_version};
use crate::{Error, Result};

const ARCH_MAP_KEY: &str = "arch_map";

/// Strategy kinds to try, in order.
///
/// Read from `strategy.priority`; an absent or blank value falls back to
/// `docker,binary`. Entries are trimmed and empty entries dropped.
pub fn priority(config: &dyn ConfigGetter) -> Result<Vec<String>> {
  let configured = config.get(PRIORITY_KEY)?.filter(|value| !value.trim().is_empty());
  let raw = configured.as_deref().unwrap_or(DEFAULT_PRIORITY);

  Ok(
    raw
      .split(',')
      .map(str::trim)
      .filter(|entry| !entry.is_empty())
      .map(str::to_string)
      .collect(),
  )
}

/// Resolve the strategy that will provide `request`.
///
/// Has no side effects: nothing is pulled, downloaded, or executed until the
/// returned strategy is run.
pub fn load_strategy<'a>(
  manifest: &ManifestData,
  request: &UtilityRequest,
  ctx: StrategyContext<'a>,
) -> Result<Strategy<'a>> {
  let order = priority(ctx.config)?;
  debug!(priority = ?order, available = ?manifest.strategies.keys().collect::<Vec<_>>(), "selecting strategy");

  let (kind_name, block) = order
    .iter()
    .find_map(|name| manifest.strategies.get(name).map(|block| (name, block)))
    .ok_or_else(|| Error::NoStrategyFound {
      priority: order.join(","),
    })?;
  let kind = StrategyKind::from_name(kind_name).ok_or_else(|| Error::UnsupportedStrategy(kind_name.clone()))?;

  let record = select_version(&manifest.name, kind, block, request.version.as_deref())?;
  let merged = merge(block, record);
  let arch_map = arch_map(kind, &merged)?;

  let strategy = match kind {
    StrategyKind::Docker => {
      let data = DockerData::decode(&merged)?;
      info!(utility = %manifest.name, version = %data.version, image = %data.image, "using docker strategy");
      Strategy::Docker(DockerStrategy::new(&manifest.name, data, arch_map, ctx))
    }
    StrategyKind::Binary => {
      let data = BinaryData::decode(&merged)?;
      info!(utility = %manifest.name, version = %data.version, url = %data.base_url, "using binary strategy");
      Strategy::Binary(BinaryStrategy::new(&manifest.name, data, arch_map, ctx))
    }
  };

  Ok(strategy)
}

fn select_version<'b>(
  name: &str,
  kind: StrategyKind,
  block: &'b StrategyBlock,
  requested: Option<&str>,
) -> Result<&'b VersionRecord> {
  let record = match requested {
    Some(version) => block
      .versions
      .iter()
      .find(|record| record_version(record) == Some(version))
      .ok_or_else(|| Error::VersionNotFound {
        name: name.to_string(),
        kind,
        version: version.to_string(),
      })?,
    None => block.versions.first().ok_or_else(|| Error::NoVersions {
      name: name.to_string(),
      kind,
    })?,
  };

  if record_version(record).is_none() {
    return Err(invalid(kind, VERSION_KEY, "must be a string"));
  }

  Ok(record)
}

/// The merged `arch_map` as a string map; absent means empty.
fn arch_map(kind: StrategyKind, merged: &Mapping) -> Result<BTreeMap<String, String>> {
  let Some(value) = get(merged, ARCH_MAP_KEY) else {
    return Ok(BTreeMap::new());
  };
  let mapping = value
    .as_mapping()
    .ok_or_else(|| invalid(kind, ARCH_MAP_KEY, "expected a mapping"))?;

  mapping
    .iter()
    .map(|(key, value)| match (key.as_str(), value.as_str()) {
      (Some(key), Some(value)) => Ok((key.to_string(), value.to_string())),
      _ => Err(invalid(kind, ARCH_MAP_KEY, "keys and values must be strings")),
    })
    .collect()
}

pub(super) fn invalid(kind: StrategyKind, field: &str, message: &str) -> Error {
  Error::InvalidField {
    kind,
    field: field.to_string(),
    message: message.to_string(),
  }
}

pub(super) fn required_string(kind: StrategyKind, merged: &Mapping, field: &'static str) -> Result<String> {
  optional_string(kind, merged, field)?.ok_or(Error::MissingRequiredField { kind, field })
}

pub(super) fn optional_string(kind: StrategyKind, merged: &Mapping, field: &str) -> Result<Option<String>> {
  match get(merged, field) {
    None => Ok(None),
    Some(Value::String(value)) => Ok(Some(value.clone())),
    Some(_) => Err(invalid(kind, field, "expected a string")),
  }
}

pub(super) fn bool_field(kind: StrategyKind, merged: &Mapping, field: &str, default: bool) -> Result<bool> {
  match get(merged, field) {
    None => Ok(default),
    Some(Value::Bool(value)) => Ok(*value),
    Some(_) => Err(invalid(kind, field, "expected true or false")),
  }
}
