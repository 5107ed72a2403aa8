use anyhow::Context;
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;

use crate::AssetFileSystem;
use crate::AssetHandler;

/// Formats the provided files.
///
/// When `list` is true, nothing is written and the path of every file that
/// would change is output on its own line exactly as it was provided.
pub fn format_files<THandler: AssetHandler>(
  handler: &THandler,
  fs: &impl AssetFileSystem,
  config: &THandler::Configuration,
  file_paths: &[PathBuf],
  list: bool,
  stdout: &mut dyn Write,
) -> Result<()> {
  for file_path in file_paths {
    let file_text = fs.read_file(file_path).with_context(|| format!("Error reading {}", file_path.display()))?;
    let formatted_text = handler
      .format(file_path, &file_text, config)
      .with_context(|| format!("Error formatting {}", file_path.display()))?;
    let Some(formatted_text) = formatted_text else {
      continue;
    };
    if formatted_text == file_text {
      continue;
    }

    if list {
      writeln!(stdout, "{}", file_path.display())?;
    } else {
      fs.write_file(file_path, &formatted_text)
        .with_context(|| format!("Error writing {}", file_path.display()))?;
    }
  }
  Ok(())
}
