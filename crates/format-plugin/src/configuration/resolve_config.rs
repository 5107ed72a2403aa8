use anyhow::Context;
use anyhow::Result;
use asset_api::is_legacy_config;
use std::path::Path;

use super::ExcludeConfig;
use super::FormatConfig;
use super::ProjectConfig;
use super::SchemaError;
use super::upgrade_config;
use crate::arg_parser::CliArgs;
use crate::environment::Environment;
use crate::format::FormatParam;
use crate::formatters::FormatterFactory;
use crate::patterns::ExcludeMatcher;

/// Resolves the formatters and exclusions from the configuration files in the arguments.
///
/// Exclusions of the project configuration apply along with those of the format configuration.
pub fn resolve_format_param(args: &CliArgs, environment: &impl Environment, factory: &FormatterFactory) -> Result<FormatParam> {
  let mut config = read_format_config(environment, args.config.as_deref(), factory)?;
  if let Some(godel_config) = &args.godel_config {
    config.exclude.extend(read_project_exclude(environment, godel_config)?);
  }
  config.to_param(factory)
}

/// Reads the format configuration file. A missing file is an empty configuration.
///
/// Legacy documents are upgraded in memory.
pub fn read_format_config(environment: &impl Environment, config_path: Option<&Path>, factory: &FormatterFactory) -> Result<FormatConfig> {
  let Some(config_path) = config_path else {
    return Ok(FormatConfig::default());
  };
  if !environment.path_exists(config_path) {
    log_verbose!(environment, "No format configuration at {}", config_path.display());
    return Ok(FormatConfig::default());
  }

  let config_text = environment.read_file(config_path)?;
  parse_format_config(&config_text, factory).with_context(|| format!("Error reading configuration file {}", config_path.display()))
}

pub fn parse_format_config(config_text: &str, factory: &FormatterFactory) -> Result<FormatConfig> {
  let upgraded_text;
  let config_text = if is_legacy_config(config_text) {
    match upgrade_config(config_text, factory)? {
      Some(text) => {
        upgraded_text = text;
        upgraded_text.as_str()
      }
      None => return Ok(FormatConfig::default()),
    }
  } else {
    config_text
  };
  if config_text.trim().is_empty() {
    return Ok(FormatConfig::default());
  }
  Ok(serde_yaml::from_str(config_text).map_err(|source| SchemaError { schema: "current", source })?)
}

/// Reads the exclusions from the project configuration file.
pub fn read_project_exclude(environment: &impl Environment, config_path: &Path) -> Result<ExcludeConfig> {
  let config_text = environment.read_file(config_path)?;
  if config_text.trim().is_empty() {
    return Ok(ExcludeConfig::default());
  }
  let config: ProjectConfig =
    serde_yaml::from_str(&config_text).with_context(|| format!("Error reading project configuration file {}", config_path.display()))?;
  Ok(config.exclude)
}

impl FormatConfig {
  /// Creates every registered formatter, in registration order, with its configuration.
  pub fn to_param(&self, factory: &FormatterFactory) -> Result<FormatParam> {
    factory.ensure_known(self.formatters.keys().map(|name| name.as_str()))?;

    let mut formatters = Vec::new();
    for creator in factory.creators() {
      let config_yml = match self.formatters.get(creator.type_name()) {
        Some(formatter_config) => formatter_config.config_yml()?,
        None => String::new(),
      };
      formatters.push(creator.create(&config_yml)?);
    }

    Ok(FormatParam {
      formatters,
      exclude: ExcludeMatcher::new(&self.exclude)?,
    })
  }
}
