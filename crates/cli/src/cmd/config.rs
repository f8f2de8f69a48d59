use anyhow::{Context, Result, bail};

use holen_lib::config::{ConfigClient, ConfigGetter};

use crate::output::{print_json, print_success};

pub fn cmd_config_get(key: &str) -> Result<()> {
  let config = ConfigClient::from_env()?;
  match config.get(key).with_context(|| format!("Failed to read '{}'", key))? {
    Some(value) => {
      println!("{}", value);
      Ok(())
    }
    None => bail!("'{}' is not set", key),
  }
}

pub fn cmd_config_set(system: bool, key: &str, value: &str) -> Result<()> {
  let config = ConfigClient::from_env()?;
  config
    .set(system, key, value)
    .with_context(|| format!("Failed to set '{}'", key))?;
  print_success(&format!("{} = {}", key, value));
  Ok(())
}

pub fn cmd_config_unset(system: bool, key: &str) -> Result<()> {
  let config = ConfigClient::from_env()?;
  config
    .unset(system, key)
    .with_context(|| format!("Failed to unset '{}'", key))?;
  print_success(&format!("{} removed", key));
  Ok(())
}

pub fn cmd_config_list(json: bool) -> Result<()> {
  let config = ConfigClient::from_env()?;
  let values = config.get_all().context("Failed to read configuration")?;

  if json {
    return print_json(&values);
  }
  for (key, value) in &values {
    println!("{}={}", key, value);
  }
  Ok(())
}
