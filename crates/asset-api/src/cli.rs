use anyhow::Result;
use anyhow::bail;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap::error::ErrorKind;
use std::io::Write;
use std::path::PathBuf;

use crate::AssetFileSystem;
use crate::AssetHandler;
use crate::format_files;
use crate::resolve_config;
use crate::upgrade_config;

pub const NAME_FLAG: &str = "name";
pub const CONFIG_YML_FLAG: &str = "config-yml";
pub const LIST_FLAG: &str = "list";
pub const VERIFY_CONFIG_COMMAND: &str = "verify-config";
pub const RUN_FORMAT_COMMAND: &str = "run-format";
pub const UPGRADE_CONFIG_COMMAND: &str = "upgrade-config";

/// Runs the asset with the provided command line arguments (including the
/// executable name) and returns the exit code.
///
/// Errors are output to `stderr` as `Error: <message>`.
pub fn run_asset<THandler: AssetHandler>(
  handler: &THandler,
  args: Vec<String>,
  fs: &impl AssetFileSystem,
  stdout: &mut dyn Write,
  stderr: &mut dyn Write,
) -> i32 {
  let matches = match create_cli_parser(handler.name()).try_get_matches_from(args) {
    Ok(matches) => matches,
    Err(err) => {
      let (output, exit_code): (&mut dyn Write, i32) = match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => (stdout, 0),
        _ => (stderr, 2),
      };
      let _ = write!(output, "{}", err.render());
      return exit_code;
    }
  };

  match inner_run_asset(handler, &matches, fs, stdout) {
    Ok(()) => 0,
    Err(err) => {
      let _ = writeln!(stderr, "Error: {:#}", err);
      1
    }
  }
}

fn inner_run_asset<THandler: AssetHandler>(handler: &THandler, matches: &ArgMatches, fs: &impl AssetFileSystem, stdout: &mut dyn Write) -> Result<()> {
  if matches.get_flag(NAME_FLAG) {
    write!(stdout, "{}", serde_json::to_string(handler.name())?)?;
    return Ok(());
  }

  match matches.subcommand() {
    Some((VERIFY_CONFIG_COMMAND, matches)) => {
      resolve_config(handler, get_config_yml(matches))?;
      Ok(())
    }
    Some((RUN_FORMAT_COMMAND, matches)) => {
      let config = resolve_config(handler, get_config_yml(matches))?;
      let file_paths = matches
        .get_many::<String>("files")
        .map(|values| values.map(PathBuf::from).collect::<Vec<_>>())
        .unwrap_or_default();
      format_files(handler, fs, &config, &file_paths, matches.get_flag(LIST_FLAG), stdout)
    }
    Some((UPGRADE_CONFIG_COMMAND, matches)) => {
      let upgraded = upgrade_config(handler, get_config_yml(matches))?;
      write!(stdout, "{}", upgraded)?;
      Ok(())
    }
    _ => bail!("Expected a command or the --{} flag.", NAME_FLAG),
  }
}

fn get_config_yml(matches: &ArgMatches) -> &str {
  matches.get_one::<String>(CONFIG_YML_FLAG).map(|s| s.as_str()).unwrap_or("")
}

fn create_cli_parser(name: &str) -> Command {
  Command::new("asset")
    .bin_name(name.to_string())
    .about(format!("Formatter asset for {}", name))
    .disable_version_flag(true)
    .arg(
      Arg::new(NAME_FLAG)
        .long(NAME_FLAG)
        .help("Print the name of the formatter as a JSON string.")
        .action(ArgAction::SetTrue),
    )
    .subcommand(
      Command::new(VERIFY_CONFIG_COMMAND)
        .about("Verify that the provided YAML is valid configuration for this formatter.")
        .arg(config_yml_arg()),
    )
    .subcommand(
      Command::new(RUN_FORMAT_COMMAND)
        .about("Runs the format operation.")
        .arg(config_yml_arg())
        .arg(
          Arg::new(LIST_FLAG)
            .long(LIST_FLAG)
            .help("List the files that would be modified by the operation instead of modifying them.")
            .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("files").num_args(0..).action(ArgAction::Append)),
    )
    .subcommand(
      Command::new(UPGRADE_CONFIG_COMMAND)
        .about("Upgrades the provided configuration YAML to the current schema.")
        .arg(config_yml_arg()),
    )
}

fn config_yml_arg() -> Arg {
  Arg::new(CONFIG_YML_FLAG)
    .long(CONFIG_YML_FLAG)
    .help("YAML of the formatter configuration.")
    .required(true)
    .num_args(1)
    .allow_hyphen_values(true)
}
