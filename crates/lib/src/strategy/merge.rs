//! Two-layer merge of strategy defaults and a version record.

use serde_yaml::{Mapping, Value};

use crate::manifest::{StrategyBlock, VERSIONS_KEY, VersionRecord};

/// Combine `block`'s strategy-wide keys with `record`, record keys winning.
///
/// The merge is flat: nested values such as `arch_map` are replaced wholesale.
/// Neither input is modified, so merging again yields the same mapping.
pub fn merge(block: &StrategyBlock, record: &VersionRecord) -> Mapping {
  let mut merged = block.defaults.clone();
  merged.remove(VERSIONS_KEY);

  for (key, value) in record {
    if key.as_str() == Some(VERSIONS_KEY) {
      continue;
    }
    merged.insert(key.clone(), value.clone());
  }

  merged
}

/// Look up a string-keyed entry.
pub(crate) fn get<'m>(merged: &'m Mapping, key: &str) -> Option<&'m Value> {
  merged.get(key).filter(|value| !value.is_null())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::manifest::ManifestData;

  const MANIFEST: &str = r#"
strategies:
  binary:
    base_url: "https://example.com/{{.Version}}"
    sha256: abc
    arch_map:
      linux_amd64: linux64
      darwin_amd64: osx
    versions:
      - version: "1.5"
      - version: "1.4"
        base_url: "https://old.example.com/{{.Version}}"
        arch_map:
          linux_amd64: l64
"#;

  fn block() -> StrategyBlock {
    let manifest: ManifestData = serde_yaml::from_str(MANIFEST).unwrap();
    manifest.strategies["binary"].clone()
  }

  #[test]
  fn record_keys_win_and_defaults_fill_in() {
    let block = block();
    let record = &block.versions[1];
    let merged = merge(&block, record);

    for (key, value) in &merged {
      match record.get(key) {
        Some(expected) => assert_eq!(value, expected),
        None => assert_eq!(Some(value), block.defaults.get(key)),
      }
    }
    assert_eq!(merged.get("sha256").and_then(Value::as_str), Some("abc"));
    assert!(!merged.contains_key(VERSIONS_KEY));
  }

  #[test]
  fn arch_map_is_replaced_not_merged() {
    let block = block();
    let merged = merge(&block, &block.versions[1]);

    let arch_map = merged.get("arch_map").and_then(Value::as_mapping).unwrap();
    assert_eq!(arch_map.len(), 1);
    assert_eq!(arch_map.get("linux_amd64").and_then(Value::as_str), Some("l64"));
  }

  #[test]
  fn merging_is_repeatable_and_leaves_inputs_untouched() {
    let block = block();
    let before = block.clone();
    let record = block.versions[1].clone();

    let first = merge(&block, &record);
    let second = merge(&block, &record);

    assert_eq!(first, second);
    assert_eq!(block, before);
    assert_eq!(record, before.versions[1]);
  }

  #[test]
  fn null_values_are_treated_as_absent() {
    let mut merged = Mapping::new();
    merged.insert("image".into(), Value::Null);
    assert!(get(&merged, "image").is_none());
  }
}
