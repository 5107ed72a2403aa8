use asset_api::AssetHandler;
use std::path::Path;

use super::CommandOutput;
use super::Environment;
use super::TestEnvironment;

pub struct TestEnvironmentBuilder {
  environment: TestEnvironment,
}

impl TestEnvironmentBuilder {
  pub fn new() -> Self {
    Self {
      environment: TestEnvironment::new(),
    }
  }

  /// Environment with a `/project` cwd and the import sorting asset at `/assets/sortimports`.
  pub fn with_project_and_asset() -> Self {
    let mut builder = TestEnvironmentBuilder::new();
    builder
      .set_cwd("/project")
      .add_asset("/assets/sortimports", test_format_asset::SortImportsHandler);
    builder
  }

  pub fn build(&mut self) -> TestEnvironment {
    self.environment.clone()
  }

  pub fn write_file(&mut self, file_path: impl AsRef<Path>, text: &str) -> &mut Self {
    self.environment.write_file(file_path, text).unwrap();
    self
  }

  pub fn mk_dir_all(&mut self, dir_path: impl AsRef<Path>) -> &mut Self {
    self.environment.mk_dir_all(dir_path);
    self
  }

  pub fn set_cwd(&mut self, dir_path: &str) -> &mut Self {
    self.environment.set_cwd(dir_path);
    self
  }

  pub fn add_asset<THandler: AssetHandler + Send + Sync + 'static>(&mut self, asset_path: impl AsRef<Path>, handler: THandler) -> &mut Self {
    self.environment.add_asset(asset_path, handler);
    self
  }

  pub fn add_executable(
    &mut self,
    executable_path: impl AsRef<Path>,
    executable: impl Fn(&[String], &TestEnvironment) -> CommandOutput + Send + Sync + 'static,
  ) -> &mut Self {
    self.environment.add_executable(executable_path, executable);
    self
  }

  /// Adds an asset executable that identifies as `name`, accepts any
  /// configuration, and always lists `listed_files` when formatting.
  pub fn add_listing_asset(&mut self, asset_path: impl AsRef<Path>, name: &str, listed_files: &[&str]) -> &mut Self {
    let name = name.to_string();
    let listed_text = listed_files.iter().map(|file| format!("{}\n", file)).collect::<String>();
    self.add_executable(asset_path, move |args, _| match args.first().map(|arg| arg.as_str()) {
      Some("--name") => success_output(format!("\"{}\"", name)),
      Some("run-format") if args.iter().any(|arg| arg == "--list") => CommandOutput {
        // exits non-zero when it has something to report
        exit_code: Some(if listed_text.is_empty() { 0 } else { 1 }),
        stdout: listed_text.clone().into_bytes(),
        stderr: Vec::new(),
      },
      _ => success_output(String::new()),
    })
  }
}

fn success_output(stdout: String) -> CommandOutput {
  CommandOutput {
    exit_code: Some(0),
    stdout: stdout.into_bytes(),
    stderr: Vec::new(),
  }
}
