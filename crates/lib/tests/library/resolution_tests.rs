//! End-to-end resolution against manifests and configuration on disk.

use std::fs;
use std::path::Path;

use holen_lib::Error;
use holen_lib::config::ConfigClient;
use holen_lib::download::DefaultDownloader;
use holen_lib::exec::DefaultRunner;
use holen_lib::manifest::{FileManifestFinder, ManifestDir, ManifestFinder, UtilityRequest};
use holen_lib::platform::DefaultSystem;
use holen_lib::source::GitSource;
use holen_lib::strategy::{Strategy, StrategyContext, StrategyKind, load_strategy};
use tempfile::TempDir;

const JQ: &str = r#"
desc: command-line JSON processor
strategies:
  docker:
    image: "realguess/jq:{{.Version}}"
    mount_pwd: true
    versions:
      - version: "1.5"
      - version: "1.4"
        image: "stedolan/jq:{{.Version}}"
  binary:
    base_url: "https://github.com/stedolan/jq/releases/download/jq-{{.Version}}/jq-{{.MappedArch}}"
    arch_map:
      linux_amd64: linux64
      darwin_amd64: osx-amd64
    versions:
      - version: "1.5"
"#;

struct Fixture {
  temp: TempDir,
  config: ConfigClient,
}

impl Fixture {
  fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let config = ConfigClient::new(temp.path().join("system.toml"), temp.path().join("user.toml"));
    let manifests = temp.path().join("manifests");
    fs::create_dir_all(&manifests).unwrap();
    fs::write(manifests.join("jq.yaml"), JQ).unwrap();
    Self { temp, config }
  }

  fn finder(&self) -> FileManifestFinder {
    FileManifestFinder::new(vec![ManifestDir::new("local", self.temp.path().join("manifests"))])
  }

  fn resolve(&self, request: &str) -> holen_lib::Result<(StrategyKind, String)> {
    let request = UtilityRequest::parse(request);
    let manifest = self
      .finder()
      .find(&request)
      .map_err(|source| Error::ManifestLoadFailed {
        name: request.name.clone(),
        source,
      })?;

    let system = DefaultSystem;
    let downloader = DefaultDownloader::new(DefaultRunner);
    let runner = DefaultRunner;
    let ctx = StrategyContext {
      system: &system,
      config: &self.config,
      downloader: &downloader,
      runner: &runner,
    };

    let strategy = load_strategy(&manifest, &request, ctx)?;
    let detail = match &strategy {
      Strategy::Docker(docker) => docker.data.image.clone(),
      Strategy::Binary(binary) => binary.data.base_url.clone(),
    };
    Ok((strategy.kind(), detail))
  }
}

#[test]
fn docker_is_preferred_without_configuration() {
  let fixture = Fixture::new();
  let (kind, image) = fixture.resolve("jq").unwrap();

  assert_eq!(kind, StrategyKind::Docker);
  assert_eq!(image, "realguess/jq:{{.Version}}");
}

#[test]
fn version_record_overrides_defaults() {
  let fixture = Fixture::new();
  let (_, image) = fixture.resolve("jq@1.4").unwrap();

  assert_eq!(image, "stedolan/jq:{{.Version}}");
}

#[test]
fn user_priority_overrides_system_priority() {
  let fixture = Fixture::new();
  fixture.config.set(true, "strategy.priority", "docker").unwrap();
  fixture.config.set(false, "strategy.priority", "binary, docker").unwrap();

  let (kind, _) = fixture.resolve("jq").unwrap();
  assert_eq!(kind, StrategyKind::Binary);

  fixture.config.unset(false, "strategy.priority").unwrap();
  let (kind, _) = fixture.resolve("jq").unwrap();
  assert_eq!(kind, StrategyKind::Docker);
}

#[test]
fn unknown_version_is_reported() {
  let fixture = Fixture::new();
  let err = fixture.resolve("jq@1.2").unwrap_err();

  assert!(matches!(err, Error::VersionNotFound { ref version, .. } if version == "1.2"));
}

#[test]
fn missing_manifest_is_a_load_failure() {
  let fixture = Fixture::new();
  let err = fixture.resolve("yq").unwrap_err();

  assert!(matches!(err, Error::ManifestLoadFailed { ref name, .. } if name == "yq"));
}

#[test]
fn priority_without_matching_kind_fails() {
  let fixture = Fixture::new();
  fixture.config.set(false, "strategy.priority", "cargo").unwrap();

  let err = fixture.resolve("jq").unwrap_err();
  assert!(matches!(err, Error::NoStrategyFound { ref priority } if priority == "cargo"));
}

#[test]
fn source_checkout_is_deleted() {
  let temp = TempDir::new().unwrap();
  let checkout = temp.path().join("main/manifests");
  fs::create_dir_all(&checkout).unwrap();
  fs::write(checkout.join("jq.yaml"), JQ).unwrap();

  let source = GitSource::new("main", "holen-dev/manifests");
  let finder = FileManifestFinder::new(vec![ManifestDir::new("main", &checkout)]);
  assert_eq!(finder.list(Some("main")).unwrap().len(), 1);

  source.delete(temp.path()).unwrap();
  assert!(!Path::new(&checkout).exists());
  assert!(finder.list(None).unwrap().is_empty());
}
