use anyhow::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

/// `Ok(Some(text))` - Changes due to the format.
/// `Ok(None)` - No changes.
/// `Err(err)` - Error formatting.
pub type FormatResult = Result<Option<String>>;

/// Trait for implementing a formatter asset.
///
/// The same handler can be run as a standalone executable via `run_asset`
/// or wrapped in-process by the format plugin.
pub trait AssetHandler {
  /// Resolved configuration of the asset. Implementations should use
  /// `#[serde(deny_unknown_fields)]` so invalid configuration is rejected.
  type Configuration: Serialize + DeserializeOwned + Default;

  /// Name the asset is registered under (ex. `gofmt`).
  fn name(&self) -> &str;
  /// Formats the provided file text.
  fn format(&self, file_path: &Path, file_text: &str, config: &Self::Configuration) -> FormatResult;
  /// Converts the command line arguments of a legacy configuration into
  /// the current configuration for this asset.
  fn upgrade_legacy_config(&self, args: Vec<String>) -> Result<Self::Configuration>;
}
