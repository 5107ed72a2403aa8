use anyhow::Result;
use anyhow::bail;
use asset_api::AssetHandler;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use super::CommandOutput;
use super::CommandStdio;
use super::DirEntry;
use super::Environment;
use super::ProcessCommand;
use crate::formatters::EnvironmentFileSystem;
use crate::utils::resolve_absolute_path;

type TestExecutable = Arc<dyn Fn(&[String], &TestEnvironment) -> CommandOutput + Send + Sync>;

#[derive(Clone)]
pub struct TestEnvironment {
  is_verbose: Arc<Mutex<bool>>,
  cwd: Arc<Mutex<PathBuf>>,
  files: Arc<Mutex<HashMap<PathBuf, String>>>,
  dirs: Arc<Mutex<HashSet<PathBuf>>>,
  executables: Arc<Mutex<HashMap<PathBuf, TestExecutable>>>,
  ran_commands: Arc<Mutex<Vec<String>>>,
  stdout_messages: Arc<Mutex<Vec<String>>>,
  stderr_messages: Arc<Mutex<Vec<String>>>,
}

impl TestEnvironment {
  pub fn new() -> TestEnvironment {
    let environment = TestEnvironment {
      is_verbose: Default::default(),
      cwd: Arc::new(Mutex::new(PathBuf::from("/"))),
      files: Default::default(),
      dirs: Default::default(),
      executables: Default::default(),
      ran_commands: Default::default(),
      stdout_messages: Default::default(),
      stderr_messages: Default::default(),
    };
    environment.dirs.lock().insert(PathBuf::from("/"));
    environment
  }

  pub fn take_stdout_messages(&self) -> Vec<String> {
    self.stdout_messages.lock().drain(..).collect()
  }

  pub fn take_stderr_messages(&self) -> Vec<String> {
    self.stderr_messages.lock().drain(..).collect()
  }

  /// Gets the commands that were run, formatted as `<executable> <args...>`.
  pub fn take_ran_commands(&self) -> Vec<String> {
    self.ran_commands.lock().drain(..).collect()
  }

  pub fn set_verbose(&self, value: bool) {
    *self.is_verbose.lock() = value;
  }

  pub fn set_cwd(&self, new_path: &str) {
    let new_path = self.resolve_path(Path::new(new_path));
    self.dirs.lock().insert(new_path.clone());
    *self.cwd.lock() = new_path;
  }

  pub fn mk_dir_all(&self, dir_path: impl AsRef<Path>) {
    let dir_path = self.resolve_path(dir_path.as_ref());
    let mut dirs = self.dirs.lock();
    for ancestor in dir_path.ancestors() {
      dirs.insert(ancestor.to_path_buf());
    }
  }

  /// Registers a fake executable that receives the command arguments.
  pub fn add_executable(
    &self,
    executable_path: impl AsRef<Path>,
    executable: impl Fn(&[String], &TestEnvironment) -> CommandOutput + Send + Sync + 'static,
  ) {
    let executable_path = self.resolve_path(executable_path.as_ref());
    self.executables.lock().insert(executable_path, Arc::new(executable));
  }

  /// Registers an executable that runs the provided asset handler in-process
  /// using this environment's file system.
  pub fn add_asset<THandler: AssetHandler + Send + Sync + 'static>(&self, asset_path: impl AsRef<Path>, handler: THandler) {
    let bin_name = asset_path.as_ref().to_string_lossy().to_string();
    self.add_executable(asset_path, move |args, environment| {
      let mut asset_args = vec![bin_name.clone()];
      asset_args.extend(args.iter().cloned());
      let mut stdout = Vec::new();
      let mut stderr = Vec::new();
      let exit_code = asset_api::run_asset(&handler, asset_args, &EnvironmentFileSystem::new(environment), &mut stdout, &mut stderr);
      CommandOutput {
        exit_code: Some(exit_code),
        stdout,
        stderr,
      }
    });
  }

  fn resolve_path(&self, path: &Path) -> PathBuf {
    resolve_absolute_path(&self.cwd.lock(), path)
  }
}

impl Environment for TestEnvironment {
  fn read_file(&self, file_path: impl AsRef<Path>) -> Result<String> {
    let file_path = self.resolve_path(file_path.as_ref());
    match self.files.lock().get(&file_path) {
      Some(text) => Ok(text.clone()),
      None => bail!("Could not find file at path {}", file_path.display()),
    }
  }

  fn write_file(&self, file_path: impl AsRef<Path>, file_text: &str) -> Result<()> {
    let file_path = self.resolve_path(file_path.as_ref());
    if let Some(parent) = file_path.parent() {
      self.mk_dir_all(parent);
    }
    self.files.lock().insert(file_path, file_text.to_string());
    Ok(())
  }

  fn path_exists(&self, file_path: impl AsRef<Path>) -> bool {
    let file_path = self.resolve_path(file_path.as_ref());
    self.files.lock().contains_key(&file_path) || self.dirs.lock().contains(&file_path)
  }

  fn dir_info(&self, dir_path: impl AsRef<Path>) -> std::io::Result<Vec<DirEntry>> {
    let dir_path = self.resolve_path(dir_path.as_ref());
    if !self.dirs.lock().contains(&dir_path) {
      return Err(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("Directory not found: {}", dir_path.display()),
      ));
    }

    let mut entries = Vec::new();
    let child_dirs = self
      .dirs
      .lock()
      .iter()
      .filter(|path| path.parent() == Some(dir_path.as_path()))
      .cloned()
      .collect::<BTreeSet<_>>();
    for child_dir in child_dirs {
      if let Some(name) = child_dir.file_name() {
        entries.push(DirEntry::Directory(name.to_os_string()));
      }
    }
    for file_path in self.files.lock().keys() {
      if file_path.parent() == Some(dir_path.as_path()) {
        if let Some(name) = file_path.file_name() {
          entries.push(DirEntry::File(name.to_os_string()));
        }
      }
    }
    Ok(entries)
  }

  fn cwd(&self) -> Result<PathBuf> {
    Ok(self.cwd.lock().clone())
  }

  fn run_command(&self, command: &ProcessCommand, stdio: CommandStdio) -> std::io::Result<CommandOutput> {
    self.ran_commands.lock().push(command.to_string());
    let executable_path = self.resolve_path(&command.executable);
    // clone out so the executable is free to use this environment
    let executable = self.executables.lock().get(&executable_path).cloned();
    let Some(executable) = executable else {
      return Err(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("No such file or directory: {}", executable_path.display()),
      ));
    };

    let output = executable(&command.args, self);
    match stdio {
      CommandStdio::Capture => Ok(output),
      CommandStdio::Inherit => {
        if !output.stdout.is_empty() {
          self.log(&String::from_utf8_lossy(&output.stdout));
        }
        if !output.stderr.is_empty() {
          self.log_stderr(&String::from_utf8_lossy(&output.stderr));
        }
        Ok(CommandOutput {
          exit_code: output.exit_code,
          stdout: Vec::new(),
          stderr: Vec::new(),
        })
      }
    }
  }

  fn log(&self, text: &str) {
    self.stdout_messages.lock().push(text.to_string());
  }

  fn log_stderr(&self, text: &str) {
    self.stderr_messages.lock().push(text.to_string());
  }

  fn is_verbose(&self) -> bool {
    *self.is_verbose.lock()
  }
}

#[cfg(test)]
mod test {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn should_list_dir_entries() {
    let environment = TestEnvironment::new();
    environment.write_file("/project/a.go", "").unwrap();
    environment.write_file("/project/sub/b.go", "").unwrap();
    let mut entries = environment.dir_info("/project").unwrap();
    entries.sort_by(|a, b| a.name().cmp(b.name()));
    assert_eq!(
      entries,
      vec![
        DirEntry::File("a.go".into()),
        DirEntry::Directory("sub".into()),
      ]
    );
    assert!(environment.dir_info("/other").is_err());
  }

  #[test]
  fn should_resolve_relative_paths_from_cwd() {
    let environment = TestEnvironment::new();
    environment.set_cwd("/project");
    environment.write_file("foo.go", "text").unwrap();
    assert_eq!(environment.read_file("/project/foo.go").unwrap(), "text");
    assert!(environment.path_exists("./foo.go"));
  }

  #[test]
  fn should_error_running_unknown_executable() {
    let environment = TestEnvironment::new();
    let command = ProcessCommand::new("/bin/missing", vec!["--name".to_string()]);
    assert!(environment.run_command(&command, CommandStdio::Capture).is_err());
    assert_eq!(environment.take_ran_commands(), vec!["/bin/missing --name"]);
  }

  #[test]
  fn should_log_inherited_output() {
    let environment = TestEnvironment::new();
    environment.add_executable("/bin/echo", |args, _| CommandOutput {
      exit_code: Some(0),
      stdout: args.join(" ").into_bytes(),
      stderr: Vec::new(),
    });
    let command = ProcessCommand::new("/bin/echo", vec!["a".to_string(), "b".to_string()]);
    let output = environment.run_command(&command, CommandStdio::Inherit).unwrap();
    assert!(output.success());
    assert!(output.stdout.is_empty());
    assert_eq!(environment.take_stdout_messages(), vec!["a b"]);
  }
}
