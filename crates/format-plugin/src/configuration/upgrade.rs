use anyhow::Context;
use anyhow::Result;
use asset_api::LegacyAssetConfig;
use asset_api::is_legacy_config;
use indexmap::IndexMap;
use thiserror::Error;

use super::FormatConfig;
use super::FormatterConfig;
use super::LegacyConfig;
use super::LegacyFormatterConfig;
use crate::formatters::FormatterFactory;

#[derive(Debug, Error)]
#[error("Failed to parse {schema} format configuration")]
pub struct SchemaError {
  pub schema: &'static str,
  #[source]
  pub source: serde_yaml::Error,
}

/// Upgrades the format configuration document to the current schema.
///
/// Returns `None` when the document doesn't need to be rewritten.
pub fn upgrade_config(config_text: &str, factory: &FormatterFactory) -> Result<Option<String>> {
  if is_legacy_config(config_text) {
    upgrade_legacy_config(config_text, factory)
  } else {
    upgrade_current_config(config_text, factory)
  }
}

/// The configuration that shipped as the default before formatters were assets.
fn default_legacy_formatters() -> IndexMap<String, LegacyFormatterConfig> {
  IndexMap::from([(
    "gofmt".to_string(),
    LegacyFormatterConfig {
      args: vec!["-s".to_string()],
    },
  )])
}

fn upgrade_legacy_config(config_text: &str, factory: &FormatterFactory) -> Result<Option<String>> {
  let legacy_config: LegacyConfig = serde_yaml::from_str(config_text).map_err(|source| SchemaError { schema: "legacy", source })?;

  if legacy_config.formatters == default_legacy_formatters() {
    // the current defaults behave the same as the legacy defaults
    if legacy_config.exclude.is_empty() {
      return Ok(None);
    }
    return serialize_config(&FormatConfig {
      formatters: IndexMap::new(),
      exclude: legacy_config.exclude,
    })
    .map(Some);
  }

  factory.ensure_known(legacy_config.formatters.keys().map(|name| name.as_str()))?;
  let mut type_names = legacy_config.formatters.keys().collect::<Vec<_>>();
  type_names.sort();

  let mut formatters = IndexMap::new();
  for type_name in type_names {
    let Some(creator) = factory.get(type_name) else {
      continue;
    };
    let legacy_fragment = LegacyAssetConfig::new(legacy_config.formatters[type_name].args.clone());
    let legacy_yml = serde_yaml::to_string(&legacy_fragment)?;
    let upgraded_yml = creator
      .upgrade_config(&legacy_yml)
      .with_context(|| format!("Failed to upgrade legacy configuration for formatter {}", type_name))?;
    formatters.insert(
      type_name.clone(),
      FormatterConfig {
        config: parse_upgraded_config(&upgraded_yml, type_name)?,
      },
    );
  }

  serialize_config(&FormatConfig {
    formatters,
    exclude: legacy_config.exclude,
  })
  .map(Some)
}

fn upgrade_current_config(config_text: &str, factory: &FormatterFactory) -> Result<Option<String>> {
  if config_text.trim().is_empty() {
    return Ok(None);
  }
  let mut config: FormatConfig = serde_yaml::from_str(config_text).map_err(|source| SchemaError { schema: "current", source })?;

  factory.ensure_known(config.formatters.keys().map(|name| name.as_str()))?;
  let mut type_names = config.formatters.keys().cloned().collect::<Vec<_>>();
  type_names.sort();

  let mut changed = false;
  for type_name in type_names {
    let Some(creator) = factory.get(&type_name) else {
      continue;
    };
    let formatter_config = &config.formatters[&type_name];
    let upgraded_yml = creator
      .upgrade_config(&formatter_config.config_yml()?)
      .with_context(|| format!("Failed to upgrade configuration for formatter {}", type_name))?;
    let upgraded = parse_upgraded_config(&upgraded_yml, &type_name)?;
    if upgraded != formatter_config.config {
      changed = true;
      config.formatters.insert(type_name, FormatterConfig { config: upgraded });
    }
  }

  if changed { serialize_config(&config).map(Some) } else { Ok(None) }
}

fn parse_upgraded_config(upgraded_yml: &str, type_name: &str) -> Result<Option<serde_yaml::Value>> {
  let value: serde_yaml::Value =
    serde_yaml::from_str(upgraded_yml).with_context(|| format!("Failed to parse upgraded configuration for formatter {}", type_name))?;
  Ok(if value.is_null() { None } else { Some(value) })
}

fn serialize_config(config: &FormatConfig) -> Result<String> {
  serde_yaml::to_string(config).context("Failed serializing format configuration")
}
