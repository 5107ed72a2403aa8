use anyhow::Result;
use gofmt_asset::GofmtHandler;
use thiserror::Error;

use crate::arg_parser::CliArgs;
use crate::arg_parser::ParseArgsError;
use crate::arg_parser::SubCommand;
use crate::commands;
use crate::environment::Environment;
use crate::formatters::FormatterCreator;
use crate::formatters::FormatterFactory;
use crate::formatters::InProcessFormatterCreator;
use crate::formatters::ProcessFormatterCreator;

#[derive(Debug, Error)]
#[error("{inner:#}")]
pub struct AppError {
  pub inner: anyhow::Error,
  pub exit_code: i32,
}

impl From<anyhow::Error> for AppError {
  fn from(inner: anyhow::Error) -> Self {
    AppError { inner, exit_code: 1 }
  }
}

impl From<ParseArgsError> for AppError {
  fn from(err: ParseArgsError) -> Self {
    let inner = err.0;
    let exit_code = inner.downcast_ref::<clap::Error>().map(|err| err.exit_code()).unwrap_or(1);
    AppError { inner, exit_code }
  }
}

pub fn run_cli<TEnvironment: Environment>(args: &CliArgs, environment: &TEnvironment) -> Result<(), AppError> {
  match &args.sub_command {
    SubCommand::Help(help_text) => {
      environment.log(help_text);
      Ok(())
    }
    SubCommand::Version => {
      environment.log(&format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")));
      Ok(())
    }
    SubCommand::Run(cmd) => {
      let factory = create_formatter_factory(args, environment)?;
      commands::run_formatters(args, cmd, environment, &factory)
    }
    SubCommand::UpgradeConfig { write } => {
      let factory = create_formatter_factory(args, environment)?;
      commands::upgrade_config_file(args, *write, environment, &factory)?;
      Ok(())
    }
    SubCommand::VerifyConfig => {
      let factory = create_formatter_factory(args, environment)?;
      commands::verify_config(args, environment, &factory)?;
      Ok(())
    }
  }
}

/// Registers the built-in gofmt formatter when enabled, then each asset in
/// the order provided.
fn create_formatter_factory<TEnvironment: Environment>(args: &CliArgs, environment: &TEnvironment) -> Result<FormatterFactory> {
  let mut creators: Vec<Box<dyn FormatterCreator>> = Vec::new();
  if args.builtin_gofmt {
    creators.push(Box::new(InProcessFormatterCreator::new(environment.clone(), GofmtHandler::default())));
  }
  for asset_path in &args.assets {
    creators.push(Box::new(ProcessFormatterCreator::new(environment.clone(), asset_path.clone())?));
  }
  Ok(FormatterFactory::new(creators)?)
}
