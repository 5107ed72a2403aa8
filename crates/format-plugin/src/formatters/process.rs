use anyhow::Result;
use anyhow::bail;
use asset_api::CONFIG_YML_FLAG;
use asset_api::LIST_FLAG;
use asset_api::NAME_FLAG;
use asset_api::RUN_FORMAT_COMMAND;
use asset_api::UPGRADE_CONFIG_COMMAND;
use asset_api::VERIFY_CONFIG_COMMAND;
use std::path::PathBuf;

use super::BackendError;
use super::FormatOutput;
use super::Formatter;
use super::FormatterCreator;
use crate::environment::CommandOutput;
use crate::environment::CommandStdio;
use crate::environment::Environment;
use crate::environment::ProcessCommand;

/// A formatter provided by an asset executable.
pub struct ProcessFormatterCreator<TEnvironment: Environment> {
  environment: TEnvironment,
  asset_path: PathBuf,
  source: String,
  type_name: String,
}

impl<TEnvironment: Environment> ProcessFormatterCreator<TEnvironment> {
  /// Asks the asset for the name of the formatter it provides.
  pub fn new(environment: TEnvironment, asset_path: PathBuf) -> Result<Self, BackendError> {
    let source = asset_path.display().to_string();
    let protocol_error = |message: String| BackendError::Protocol {
      asset: source.clone(),
      message,
    };
    let command = ProcessCommand::new(&asset_path, vec![format!("--{}", NAME_FLAG)]);
    let output = environment
      .run_command(&command, CommandStdio::Capture)
      .map_err(|err| protocol_error(format!("Failed to execute {}: {}", command, err)))?;
    if !output.success() {
      return Err(protocol_error(get_error_text(&output)));
    }
    let type_name: String = serde_json::from_slice(&output.stdout).map_err(|err| {
      protocol_error(format!(
        "Expected a JSON string, but got '{}': {}",
        String::from_utf8_lossy(&output.stdout).trim(),
        err
      ))
    })?;
    log_verbose!(environment, "Asset {} provides formatter {}", source, type_name);

    Ok(ProcessFormatterCreator {
      environment,
      asset_path,
      source,
      type_name,
    })
  }

  fn command(&self, command_name: &str, config_yml: &str) -> ProcessCommand {
    ProcessCommand::new(
      &self.asset_path,
      vec![command_name.to_string(), format!("--{}", CONFIG_YML_FLAG), config_yml.to_string()],
    )
  }
}

impl<TEnvironment: Environment> FormatterCreator for ProcessFormatterCreator<TEnvironment> {
  fn type_name(&self) -> &str {
    &self.type_name
  }

  fn source(&self) -> &str {
    &self.source
  }

  fn create(&self, config_yml: &str) -> Result<Box<dyn Formatter>> {
    let command = self.command(VERIFY_CONFIG_COMMAND, config_yml);
    let output = self.environment.run_command(&command, CommandStdio::Capture).map_err(|err| BackendError::Execution {
      type_name: self.type_name.clone(),
      message: format!("Failed to execute {}: {}", command, err),
    })?;
    if !output.success() {
      return Err(
        BackendError::ConfigValidation {
          type_name: self.type_name.clone(),
          message: get_error_text(&output),
        }
        .into(),
      );
    }

    Ok(Box::new(ProcessFormatter {
      environment: self.environment.clone(),
      asset_path: self.asset_path.clone(),
      type_name: self.type_name.clone(),
      config_yml: config_yml.to_string(),
    }))
  }

  fn upgrade_config(&self, config_yml: &str) -> Result<String> {
    let command = self.command(UPGRADE_CONFIG_COMMAND, config_yml);
    let output = self.environment.run_command(&command, CommandStdio::Capture)?;
    if !output.success() {
      bail!("{}", get_error_text(&output));
    }
    Ok(String::from_utf8(output.stdout)?)
  }
}

pub struct ProcessFormatter<TEnvironment: Environment> {
  environment: TEnvironment,
  asset_path: PathBuf,
  type_name: String,
  config_yml: String,
}

impl<TEnvironment: Environment> ProcessFormatter<TEnvironment> {
  fn execution_error(&self, message: String) -> BackendError {
    BackendError::Execution {
      type_name: self.type_name.clone(),
      message,
    }
  }
}

impl<TEnvironment: Environment> Formatter for ProcessFormatter<TEnvironment> {
  fn type_name(&self) -> &str {
    &self.type_name
  }

  fn format(&self, file_paths: &[PathBuf], list: bool, output: FormatOutput) -> Result<()> {
    let mut args = vec![
      RUN_FORMAT_COMMAND.to_string(),
      format!("--{}", CONFIG_YML_FLAG),
      self.config_yml.clone(),
    ];
    if list {
      args.push(format!("--{}", LIST_FLAG));
    }
    args.extend(file_paths.iter().map(|file_path| file_path.to_string_lossy().to_string()));
    let command = ProcessCommand::new(&self.asset_path, args);

    let stdio = match output {
      FormatOutput::Stream => CommandStdio::Inherit,
      FormatOutput::Buffer(_) => CommandStdio::Capture,
    };
    let result = self
      .environment
      .run_command(&command, stdio)
      .map_err(|err| self.execution_error(format!("Failed to execute {}: {}", command, err)))?;

    match output {
      FormatOutput::Stream => {
        if !result.success() {
          return Err(self.execution_error(get_exit_text(&result)).into());
        }
      }
      FormatOutput::Buffer(buffer) => {
        buffer.extend_from_slice(&result.stdout);
        buffer.extend_from_slice(&result.stderr);
        // assets exit non-zero when they have files to report
        if !result.success() && !reports_any_file(&result.stdout, file_paths) {
          let message = get_error_text(&result);
          return Err(self.execution_error(if message.is_empty() { get_exit_text(&result) } else { message }).into());
        }
      }
    }
    Ok(())
  }
}

/// Gets the combined output of the asset without the `Error: ` prefix it uses.
fn get_error_text(output: &CommandOutput) -> String {
  let mut text = String::from_utf8_lossy(&output.stdout).to_string();
  text.push_str(&String::from_utf8_lossy(&output.stderr));
  let text = text.trim();
  text.strip_prefix("Error: ").unwrap_or(text).trim().to_string()
}

fn get_exit_text(output: &CommandOutput) -> String {
  match output.exit_code {
    Some(code) => format!("exited with code {}", code),
    None => "terminated by signal".to_string(),
  }
}

/// Gets if any output line is exactly one of the provided file paths.
fn reports_any_file(stdout: &[u8], file_paths: &[PathBuf]) -> bool {
  let text = String::from_utf8_lossy(stdout);
  let file_paths = file_paths.iter().map(|file_path| file_path.to_string_lossy()).collect::<Vec<_>>();
  text.lines().any(|line| file_paths.iter().any(|file_path| file_path == line))
}
