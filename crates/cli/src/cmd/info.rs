use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use holen_lib::config::ConfigClient;
use holen_lib::manifest::FileManifestFinder;
use holen_lib::platform::{DefaultSystem, System, arch_key, paths};
use holen_lib::strategy::priority;

use crate::output::{print_json, print_stat};

#[derive(Serialize)]
struct Info {
  version: &'static str,
  os: String,
  arch: String,
  arch_key: String,
  system_config: PathBuf,
  user_config: PathBuf,
  data_dir: PathBuf,
  priority: Vec<String>,
  manifest_dirs: Vec<PathBuf>,
}

pub fn cmd_info(json: bool) -> Result<()> {
  let system = DefaultSystem;
  let config = ConfigClient::from_env()?;
  let finder = FileManifestFinder::from_config(&config)?;

  let info = Info {
    version: env!("CARGO_PKG_VERSION"),
    os: system.os().to_string(),
    arch: system.arch().to_string(),
    arch_key: arch_key(system.os(), system.arch()),
    system_config: config.system_config().to_path_buf(),
    user_config: config.user_config().to_path_buf(),
    data_dir: paths::data_dir()?,
    priority: priority(&config)?,
    manifest_dirs: finder.dirs().iter().map(|dir| dir.path.clone()).collect(),
  };

  if json {
    return print_json(&info);
  }

  println!("holen v{}", info.version);
  print_stat("Platform", &info.arch_key);
  print_stat("System config", &info.system_config.display().to_string());
  print_stat("User config", &info.user_config.display().to_string());
  print_stat("Data", &info.data_dir.display().to_string());
  print_stat("Priority", &info.priority.join(","));
  for dir in &info.manifest_dirs {
    print_stat("Manifests", &dir.display().to_string());
  }
  Ok(())
}
