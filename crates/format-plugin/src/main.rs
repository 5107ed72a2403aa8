#![deny(clippy::print_stderr)]
#![deny(clippy::print_stdout)]

#[macro_use]
mod environment;

use environment::RealEnvironment;
use run_cli::AppError;

mod arg_parser;
mod commands;
mod configuration;
mod format;
mod formatters;
mod paths;
mod patterns;
mod run_cli;
mod utils;

#[cfg(test)]
mod test_helpers;

fn main() {
  match run() {
    Ok(()) => {}
    Err(err) => {
      let result = format!("{:#}", err.inner);
      #[allow(clippy::print_stderr)]
      if !result.is_empty() {
        eprintln!("{}", result);
      }
      std::process::exit(err.exit_code);
    }
  }
}

fn run() -> Result<(), AppError> {
  let args = arg_parser::parse_args(std::env::args().collect())?;
  let environment = RealEnvironment::new(args.debug);
  run_cli::run_cli(&args, &environment)
}
