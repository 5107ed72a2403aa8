use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use asset_api::AssetHandler;
use asset_api::FormatResult;
use serde::Deserialize;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::process::Stdio;

pub const TYPE_NAME: &str = "gofmt";

const SIMPLIFY_ARG: &str = "-s";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct GofmtConfiguration {
  /// Don't pass `-s` to gofmt.
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub skip_simplify: bool,
}

/// Formats Go files by piping them through the `gofmt` executable.
pub struct GofmtHandler {
  executable: String,
}

impl Default for GofmtHandler {
  fn default() -> Self {
    GofmtHandler {
      executable: TYPE_NAME.to_string(),
    }
  }
}

impl GofmtHandler {
  pub fn with_executable(executable: impl Into<String>) -> Self {
    GofmtHandler { executable: executable.into() }
  }

  fn get_args(&self, config: &GofmtConfiguration) -> Vec<&'static str> {
    if config.skip_simplify { Vec::new() } else { vec![SIMPLIFY_ARG] }
  }
}

impl AssetHandler for GofmtHandler {
  type Configuration = GofmtConfiguration;

  fn name(&self) -> &str {
    TYPE_NAME
  }

  fn format(&self, _file_path: &Path, file_text: &str, config: &GofmtConfiguration) -> FormatResult {
    let mut child = Command::new(&self.executable)
      .args(self.get_args(config))
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
      .with_context(|| format!("Failed to run {}", self.executable))?;
    // gofmt won't write output until stdin is closed, so drop it after writing
    let write_result = match child.stdin.take() {
      Some(mut stdin) => stdin.write_all(file_text.as_bytes()),
      None => Ok(()),
    };
    // reap the process even when writing failed
    let output = child
      .wait_with_output()
      .with_context(|| format!("Failed waiting for {}", self.executable))?;
    if let Err(err) = write_result {
      let stderr = String::from_utf8_lossy(&output.stderr);
      let stderr = stderr.trim();
      return Err(anyhow::Error::from(err).context(if stderr.is_empty() {
        format!("Failed writing to {}", self.executable)
      } else {
        format!("Failed writing to {}: {}", self.executable, stderr)
      }));
    }
    if !output.status.success() {
      bail!("{}", String::from_utf8_lossy(&output.stderr).trim());
    }
    Ok(Some(String::from_utf8(output.stdout)?))
  }

  fn upgrade_legacy_config(&self, args: Vec<String>) -> Result<GofmtConfiguration> {
    let unsupported = args.iter().filter(|arg| *arg != SIMPLIFY_ARG).collect::<Vec<_>>();
    if !unsupported.is_empty() {
      bail!("Unsupported legacy {} arguments: {:?}", TYPE_NAME, unsupported);
    }
    Ok(GofmtConfiguration {
      skip_simplify: !args.iter().any(|arg| arg == SIMPLIFY_ARG),
    })
  }
}
