use anyhow::Context;
use anyhow::Result;
use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

/// Files and directories to skip, matched against paths relative to the project directory.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExcludeConfig {
  /// Globs matched against each component of a path.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub names: Vec<String>,
  /// Globs matched against a path and each of its ancestor directories.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub paths: Vec<String>,
}

impl ExcludeConfig {
  pub fn is_empty(&self) -> bool {
    self.names.is_empty() && self.paths.is_empty()
  }

  pub fn extend(&mut self, other: ExcludeConfig) {
    self.names.extend(other.names);
    self.paths.extend(other.paths);
  }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatterConfig {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub config: Option<serde_yaml::Value>,
}

impl FormatterConfig {
  /// Gets the YAML handed to the formatter. Missing configuration is empty text.
  pub fn config_yml(&self) -> Result<String> {
    match &self.config {
      Some(config) => serde_yaml::to_string(config).context("Failed serializing formatter configuration"),
      None => Ok(String::new()),
    }
  }
}

/// The format configuration document (`format-plugin.yml`).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatConfig {
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub formatters: IndexMap<String, FormatterConfig>,
  #[serde(default, skip_serializing_if = "ExcludeConfig::is_empty")]
  pub exclude: ExcludeConfig,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegacyFormatterConfig {
  #[serde(default)]
  pub args: Vec<String>,
}

/// The format configuration document as written before formatters were assets.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegacyConfig {
  #[serde(rename = "legacy-config")]
  pub legacy: bool,
  #[serde(default)]
  pub formatters: IndexMap<String, LegacyFormatterConfig>,
  #[serde(default)]
  pub exclude: ExcludeConfig,
}

/// The parts of the project configuration (`godel.yml`) that apply to formatting.
///
/// Other keys belong to other tools and are ignored.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectConfig {
  #[serde(default)]
  pub exclude: ExcludeConfig,
}
