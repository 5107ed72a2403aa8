use anyhow::Result;
use std::path::Path;

/// File system used by an asset to read and write the files it formats.
pub trait AssetFileSystem {
  fn read_file(&self, file_path: &Path) -> Result<String>;
  fn write_file(&self, file_path: &Path, file_text: &str) -> Result<()>;
}

pub struct RealAssetFileSystem;

impl AssetFileSystem for RealAssetFileSystem {
  fn read_file(&self, file_path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(file_path)?)
  }

  fn write_file(&self, file_path: &Path, file_text: &str) -> Result<()> {
    Ok(std::fs::write(file_path, file_text)?)
  }
}
