use anyhow::Result;
use anyhow::bail;
use clap::ArgMatches;
use std::path::PathBuf;
use thiserror::Error;

pub struct CliArgs {
  pub sub_command: SubCommand,
  pub debug: bool,
  pub project_dir: Option<PathBuf>,
  pub config: Option<PathBuf>,
  pub godel_config: Option<PathBuf>,
  pub assets: Vec<PathBuf>,
  pub builtin_gofmt: bool,
}

impl CliArgs {
  fn new_with_sub_command(sub_command: SubCommand) -> CliArgs {
    CliArgs {
      sub_command,
      debug: false,
      project_dir: None,
      config: None,
      godel_config: None,
      assets: Vec::new(),
      builtin_gofmt: false,
    }
  }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SubCommand {
  Run(RunSubCommand),
  UpgradeConfig { write: bool },
  VerifyConfig,
  Version,
  Help(String),
}

#[derive(Debug, PartialEq, Eq)]
pub struct RunSubCommand {
  pub verify: bool,
  pub files: Vec<String>,
}

#[derive(Debug, Error)]
#[error(transparent)]
pub struct ParseArgsError(#[from] pub anyhow::Error);

pub fn parse_args(args: Vec<String>) -> Result<CliArgs, ParseArgsError> {
  inner_parse_args(args).map_err(ParseArgsError)
}

fn inner_parse_args(args: Vec<String>) -> Result<CliArgs> {
  if args.len() == 1 || (args.len() == 2 && (args[1] == "help" || args[1] == "--help")) {
    let mut cli_parser = create_cli_parser();
    let help_text = format!("{}", cli_parser.render_help());
    return Ok(CliArgs::new_with_sub_command(SubCommand::Help(help_text)));
  } else if args.len() == 2 && (args[1] == "-V" || args[1] == "--version") {
    return Ok(CliArgs::new_with_sub_command(SubCommand::Version));
  }

  let matches = create_cli_parser().try_get_matches_from(&args)?;
  let sub_command = match matches.subcommand() {
    Some(("run", matches)) => SubCommand::Run(RunSubCommand {
      verify: matches.get_flag("verify"),
      files: values_to_vec(matches.get_many("files")),
    }),
    Some(("upgrade-config", matches)) => SubCommand::UpgradeConfig {
      write: matches.get_flag("write"),
    },
    Some(("verify-config", _)) => SubCommand::VerifyConfig,
    Some(("version", _)) => SubCommand::Version,
    _ => unreachable!(),
  };

  let project_dir = get_path(&matches, "project-dir");
  if project_dir.is_none() && matches!(sub_command, SubCommand::Run(_)) {
    bail!("The --project-dir flag is required to run formatters.");
  }

  Ok(CliArgs {
    sub_command,
    debug: matches.get_flag("debug"),
    project_dir,
    config: get_path(&matches, "config"),
    godel_config: get_path(&matches, "godel-config"),
    assets: values_to_vec(matches.get_many("assets")).into_iter().map(PathBuf::from).collect(),
    builtin_gofmt: matches.get_flag("builtin-gofmt"),
  })
}

fn get_path(matches: &ArgMatches, id: &str) -> Option<PathBuf> {
  matches.get_one::<String>(id).map(PathBuf::from)
}

fn values_to_vec(values: Option<clap::parser::ValuesRef<String>>) -> Vec<String> {
  values.map(|x| x.map(std::string::ToString::to_string).collect()).unwrap_or_default()
}

fn create_cli_parser() -> clap::Command {
  use clap::Arg;
  use clap::ArgAction;
  use clap::Command;

  Command::new("format-plugin")
    .bin_name("format-plugin")
    .version(env!("CARGO_PKG_VERSION"))
    .about("Formats the Go files of a project using formatter assets.")
    .subcommand_required(true)
    .subcommand(
      Command::new("run")
        .about("Formats the provided files or every Go file in the project directory.")
        .arg(
          Arg::new("verify")
            .long("verify")
            .help("Prints the files that aren't formatted instead of formatting them. Exits with code 1 when there are any.")
            .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("files").help("Files to format. Defaults to the Go files in the project directory.").num_args(1..)),
    )
    .subcommand(
      Command::new("upgrade-config")
        .about("Upgrades the configuration file to the current schema and prints it.")
        .arg(
          Arg::new("write")
            .long("write")
            .help("Writes the upgraded configuration to the configuration file instead of printing it.")
            .action(ArgAction::SetTrue),
        ),
    )
    .subcommand(Command::new("verify-config").about("Verifies the configuration of every formatter without formatting."))
    .subcommand(Command::new("version").about("Prints the version."))
    .arg(
      Arg::new("project-dir")
        .long("project-dir")
        .value_name("dir")
        .help("Directory of the project. Files are searched for and excluded relative to it.")
        .global(true)
        .num_args(1),
    )
    .arg(
      Arg::new("config")
        .long("config")
        .value_name("file")
        .help("Path to the format configuration file. A missing file is an empty configuration.")
        .global(true)
        .num_args(1),
    )
    .arg(
      Arg::new("godel-config")
        .long("godel-config")
        .value_name("file")
        .help("Path to the project configuration file whose exclusions also apply.")
        .global(true)
        .num_args(1),
    )
    .arg(
      Arg::new("assets")
        .long("assets")
        .value_name("paths")
        .help("Formatter asset executables, in the order they run.")
        .global(true)
        .num_args(1..)
        .action(ArgAction::Append),
    )
    .arg(
      Arg::new("builtin-gofmt")
        .long("builtin-gofmt")
        .help("Provides the gofmt formatter without an asset.")
        .global(true)
        .action(ArgAction::SetTrue),
    )
    .arg(
      Arg::new("debug")
        .long("debug")
        .help("Prints additional diagnostic information.")
        .global(true)
        .action(ArgAction::SetTrue),
    )
}
