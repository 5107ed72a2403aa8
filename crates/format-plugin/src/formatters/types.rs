use anyhow::Result;
use std::path::PathBuf;
use thiserror::Error;

/// Where a formatter's output goes.
pub enum FormatOutput<'a> {
  /// Straight to the output of this process.
  Stream,
  /// Appended to the buffer, stdout before stderr.
  Buffer(&'a mut Vec<u8>),
}

pub trait FormatterCreator {
  /// The name of the formatter.
  fn type_name(&self) -> &str;
  /// Where the formatter comes from, for error messages.
  fn source(&self) -> &str;
  /// Validates the configuration and creates the formatter.
  fn create(&self, config_yml: &str) -> Result<Box<dyn Formatter>>;
  /// Upgrades the formatter's configuration to its current schema.
  fn upgrade_config(&self, config_yml: &str) -> Result<String>;
}

pub trait Formatter {
  /// The name of the formatter.
  fn type_name(&self) -> &str;
  /// Formats the files in place, or when `list` is true, outputs the path of
  /// each file that would change instead of changing it.
  fn format(&self, file_paths: &[PathBuf], list: bool, output: FormatOutput) -> Result<()>;
}

#[derive(Debug, Error)]
pub enum BackendError {
  #[error("Failed to get the formatter name from {asset}: {message}")]
  Protocol { asset: String, message: String },
  #[error("Invalid configuration for formatter {type_name}: {message}")]
  ConfigValidation { type_name: String, message: String },
  #[error("Formatter {type_name} failed: {message}")]
  Execution { type_name: String, message: String },
}
