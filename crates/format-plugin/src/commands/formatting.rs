use anyhow::Result;
use thiserror::Error;

use crate::arg_parser::CliArgs;
use crate::arg_parser::RunSubCommand;
use crate::configuration::resolve_format_param;
use crate::environment::Environment;
use crate::format::FormatOutcome;
use crate::format::run_format;
use crate::formatters::FormatterFactory;
use crate::run_cli::AppError;

/// The unformatted files were already printed, so there's nothing more to say.
#[derive(Debug, Error)]
#[error("")]
pub struct UnformattedFilesError;

pub fn run_formatters(args: &CliArgs, cmd: &RunSubCommand, environment: &impl Environment, factory: &FormatterFactory) -> Result<(), AppError> {
  let Some(project_dir) = args.project_dir.as_deref() else {
    return Err(anyhow::anyhow!("The --project-dir flag is required to run formatters.").into());
  };
  let param = resolve_format_param(args, environment, factory)?;

  match run_format(environment, &param, project_dir, cmd.verify, &cmd.files)? {
    FormatOutcome::Unformatted(file_paths) => {
      let text = file_paths.iter().map(|file_path| file_path.to_string_lossy()).collect::<Vec<_>>().join("\n");
      environment.log(&text);
      Err(anyhow::Error::from(UnformattedFilesError).into())
    }
    FormatOutcome::NoFiles | FormatOutcome::Formatted | FormatOutcome::Verified => Ok(()),
  }
}
