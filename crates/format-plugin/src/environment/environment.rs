use anyhow::Result;
use std::ffi::OsStr;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;

/// A child of a directory, by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirEntry {
  Directory(OsString),
  File(OsString),
}

impl DirEntry {
  pub fn name(&self) -> &OsStr {
    match self {
      DirEntry::Directory(name) | DirEntry::File(name) => name,
    }
  }
}

/// An executable along with the arguments to launch it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
  pub executable: PathBuf,
  pub args: Vec<String>,
}

impl ProcessCommand {
  pub fn new(executable: impl Into<PathBuf>, args: Vec<String>) -> Self {
    ProcessCommand {
      executable: executable.into(),
      args,
    }
  }
}

impl fmt::Display for ProcessCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.executable.display())?;
    for arg in &self.args {
      write!(f, " {}", arg)?;
    }
    Ok(())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStdio {
  /// Output of the process goes directly to the output of this process.
  Inherit,
  /// Output of the process is collected into the returned `CommandOutput`.
  Capture,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
  /// `None` when the process was terminated by a signal.
  pub exit_code: Option<i32>,
  pub stdout: Vec<u8>,
  pub stderr: Vec<u8>,
}

impl CommandOutput {
  pub fn success(&self) -> bool {
    self.exit_code == Some(0)
  }
}

pub trait Environment: Clone + Send + Sync + 'static {
  fn read_file(&self, file_path: impl AsRef<Path>) -> Result<String>;
  fn write_file(&self, file_path: impl AsRef<Path>, file_text: &str) -> Result<()>;
  fn path_exists(&self, file_path: impl AsRef<Path>) -> bool;
  fn dir_info(&self, dir_path: impl AsRef<Path>) -> std::io::Result<Vec<DirEntry>>;
  fn cwd(&self) -> Result<PathBuf>;
  fn run_command(&self, command: &ProcessCommand, stdio: CommandStdio) -> std::io::Result<CommandOutput>;
  fn log(&self, text: &str);
  fn log_stderr(&self, text: &str);
  fn is_verbose(&self) -> bool;
}

// use a macro here so the expression provided is only evaluated when in verbose mode
macro_rules! log_verbose {
  ($environment:expr, $($arg:tt)*) => {
    if $environment.is_verbose() {
      let mut text = String::from("[VERBOSE]: ");
      text.push_str(&format!($($arg)*));
      $environment.log_stderr(&text);
    }
  }
}
