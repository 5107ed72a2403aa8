#![deny(clippy::print_stderr)]
#![deny(clippy::print_stdout)]

use asset_api::RealAssetFileSystem;
use asset_api::run_asset;
use gofmt_asset::GofmtHandler;

fn main() {
  let exit_code = run_asset(
    &GofmtHandler::default(),
    std::env::args().collect(),
    &RealAssetFileSystem,
    &mut std::io::stdout(),
    &mut std::io::stderr(),
  );
  std::process::exit(exit_code);
}
