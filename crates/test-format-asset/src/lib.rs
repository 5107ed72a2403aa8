use anyhow::Result;
use anyhow::bail;
use asset_api::AssetHandler;
use asset_api::FormatResult;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;

pub const TYPE_NAME: &str = "sortimports";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct SortImportsConfiguration {
  /// Leave blank lines inside import blocks untouched instead of removing them.
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub keep_blank_lines: bool,
}

/// Test asset that sorts the lines of Go `import ( ... )` blocks by import path.
///
/// Text containing `should_error` makes the asset error.
pub struct SortImportsHandler;

impl AssetHandler for SortImportsHandler {
  type Configuration = SortImportsConfiguration;

  fn name(&self) -> &str {
    TYPE_NAME
  }

  fn format(&self, _file_path: &Path, file_text: &str, config: &SortImportsConfiguration) -> FormatResult {
    if file_text.contains("should_error") {
      bail!("Did error.");
    }
    Ok(Some(sort_import_blocks(file_text, config)))
  }

  fn upgrade_legacy_config(&self, args: Vec<String>) -> Result<SortImportsConfiguration> {
    let mut config = SortImportsConfiguration::default();
    for arg in args {
      match arg.as_str() {
        "--keep-blank-lines" => config.keep_blank_lines = true,
        _ => bail!("Unsupported legacy {} argument: {}", TYPE_NAME, arg),
      }
    }
    Ok(config)
  }
}

fn sort_import_blocks(file_text: &str, config: &SortImportsConfiguration) -> String {
  let mut output = String::with_capacity(file_text.len());
  let mut import_lines: Option<Vec<&str>> = None;

  for line in file_text.split_inclusive('\n') {
    match import_lines.as_mut() {
      Some(lines) => {
        if line.trim() == ")" {
          lines.sort_by(|a, b| get_import_path(a).cmp(get_import_path(b)));
          for import_line in lines.drain(..) {
            output.push_str(import_line);
          }
          output.push_str(line);
          import_lines = None;
        } else if config.keep_blank_lines || !line.trim().is_empty() {
          lines.push(line);
        }
      }
      None => {
        output.push_str(line);
        if line.trim() == "import (" {
          import_lines = Some(Vec::new());
        }
      }
    }
  }

  // unterminated block
  if let Some(lines) = import_lines {
    for line in lines {
      output.push_str(line);
    }
  }

  output
}

fn get_import_path(line: &str) -> &str {
  match line.find('"') {
    Some(index) => line[index..].trim_end(),
    None => line.trim(),
  }
}
