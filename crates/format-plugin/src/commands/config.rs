use anyhow::Result;
use anyhow::bail;

use crate::arg_parser::CliArgs;
use crate::configuration::resolve_format_param;
use crate::configuration::upgrade_config;
use crate::environment::Environment;
use crate::formatters::FormatterFactory;

/// Upgrades the format configuration file, printing the result or writing it back.
///
/// Nothing happens when the file is already current.
pub fn upgrade_config_file(args: &CliArgs, write: bool, environment: &impl Environment, factory: &FormatterFactory) -> Result<()> {
  let Some(config_path) = args.config.as_deref() else {
    bail!("The --config flag is required to upgrade the configuration.");
  };
  if !environment.path_exists(config_path) {
    log_verbose!(environment, "No format configuration at {}", config_path.display());
    return Ok(());
  }

  let config_text = environment.read_file(config_path)?;
  let Some(upgraded_text) = upgrade_config(&config_text, factory)? else {
    log_verbose!(environment, "Format configuration {} is current.", config_path.display());
    return Ok(());
  };

  if write {
    environment.write_file(config_path, &upgraded_text)?;
    log_verbose!(environment, "Upgraded {}", config_path.display());
  } else {
    environment.log(&upgraded_text);
  }
  Ok(())
}

/// Creates every formatter with its configuration without formatting anything.
pub fn verify_config(args: &CliArgs, environment: &impl Environment, factory: &FormatterFactory) -> Result<()> {
  let param = resolve_format_param(args, environment, factory)?;
  log_verbose!(environment, "Verified the configuration of {} formatter(s).", param.formatters.len());
  Ok(())
}
