use anyhow::Context;
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;

use crate::AssetHandler;

/// Key that marks a configuration document as being in the legacy schema.
pub const LEGACY_CONFIG_KEY: &str = "legacy-config";

/// Per-asset fragment of a legacy configuration, tagged as legacy.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegacyAssetConfig {
  #[serde(rename = "legacy-config")]
  pub legacy: bool,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub args: Vec<String>,
}

impl LegacyAssetConfig {
  pub fn new(args: Vec<String>) -> Self {
    LegacyAssetConfig { legacy: true, args }
  }
}

/// Gets if the provided YAML has a truthy `legacy-config` key at its root.
///
/// This is a lenient check. Text that fails to parse is not legacy.
pub fn is_legacy_config(config_yml: &str) -> bool {
  match serde_yaml::from_str::<serde_yaml::Value>(config_yml) {
    Ok(serde_yaml::Value::Mapping(mapping)) => matches!(mapping.get(LEGACY_CONFIG_KEY), Some(serde_yaml::Value::Bool(true))),
    _ => false,
  }
}

/// Parses the asset's configuration. An empty document is the default configuration.
pub fn resolve_config<THandler: AssetHandler>(handler: &THandler, config_yml: &str) -> Result<THandler::Configuration> {
  if config_yml.trim().is_empty() {
    return Ok(Default::default());
  }
  serde_yaml::from_str(config_yml).with_context(|| format!("Invalid configuration for {}", handler.name()))
}

/// Upgrades the provided asset configuration to the current schema.
///
/// Configuration that is already current is validated and returned unchanged.
pub fn upgrade_config<THandler: AssetHandler>(handler: &THandler, config_yml: &str) -> Result<String> {
  if !is_legacy_config(config_yml) {
    resolve_config(handler, config_yml)?;
    return Ok(config_yml.to_string());
  }

  let legacy_config: LegacyAssetConfig =
    serde_yaml::from_str(config_yml).with_context(|| format!("Invalid legacy configuration for {}", handler.name()))?;
  let config = handler.upgrade_legacy_config(legacy_config.args)?;
  serde_yaml::to_string(&config).context("Failed serializing upgraded configuration")
}
