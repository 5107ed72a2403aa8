use anyhow::Context;
use anyhow::Result;
use parking_lot::Mutex;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;
use std::sync::Arc;

use super::CommandOutput;
use super::CommandStdio;
use super::DirEntry;
use super::Environment;
use super::ProcessCommand;

#[derive(Clone)]
pub struct RealEnvironment {
  output_lock: Arc<Mutex<()>>,
  is_verbose: bool,
}

impl RealEnvironment {
  pub fn new(is_verbose: bool) -> RealEnvironment {
    RealEnvironment {
      output_lock: Default::default(),
      is_verbose,
    }
  }

  fn write_output(&self, output: &mut dyn Write, text: &str) {
    let _g = self.output_lock.lock();
    // errors writing to stdout/stderr are not actionable
    let _ = output.write_all(text.as_bytes());
    if !text.ends_with('\n') {
      let _ = output.write_all(b"\n");
    }
    let _ = output.flush();
  }
}

impl Environment for RealEnvironment {
  fn read_file(&self, file_path: impl AsRef<Path>) -> Result<String> {
    let file_path = file_path.as_ref();
    log_verbose!(self, "Reading file: {}", file_path.display());
    fs::read_to_string(file_path).with_context(|| format!("Error reading file {}", file_path.display()))
  }

  fn write_file(&self, file_path: impl AsRef<Path>, file_text: &str) -> Result<()> {
    let file_path = file_path.as_ref();
    log_verbose!(self, "Writing file: {}", file_path.display());
    fs::write(file_path, file_text).with_context(|| format!("Error writing file {}", file_path.display()))
  }

  fn path_exists(&self, file_path: impl AsRef<Path>) -> bool {
    let file_path = file_path.as_ref();
    log_verbose!(self, "Checking path exists: {}", file_path.display());
    file_path.exists()
  }

  fn dir_info(&self, dir_path: impl AsRef<Path>) -> std::io::Result<Vec<DirEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir_path)? {
      let entry = entry?;
      let file_type = entry.file_type()?;
      if file_type.is_dir() {
        entries.push(DirEntry::Directory(entry.file_name()));
      } else if file_type.is_file() {
        entries.push(DirEntry::File(entry.file_name()));
      }
    }
    Ok(entries)
  }

  fn cwd(&self) -> Result<PathBuf> {
    std::env::current_dir().context("Error getting current working directory")
  }

  fn run_command(&self, command: &ProcessCommand, stdio: CommandStdio) -> std::io::Result<CommandOutput> {
    log_verbose!(self, "Running command: {}", command);
    let mut process = Command::new(&command.executable);
    process.args(&command.args).stdin(Stdio::null());
    match stdio {
      CommandStdio::Inherit => {
        let status = {
          // keep our own output from interleaving with the child's
          let _g = self.output_lock.lock();
          process.stdout(Stdio::inherit()).stderr(Stdio::inherit()).status()?
        };
        Ok(CommandOutput {
          exit_code: status.code(),
          stdout: Vec::new(),
          stderr: Vec::new(),
        })
      }
      CommandStdio::Capture => {
        let output = process.output()?;
        Ok(CommandOutput {
          exit_code: output.status.code(),
          stdout: output.stdout,
          stderr: output.stderr,
        })
      }
    }
  }

  fn log(&self, text: &str) {
    self.write_output(&mut std::io::stdout(), text);
  }

  fn log_stderr(&self, text: &str) {
    self.write_output(&mut std::io::stderr(), text);
  }

  fn is_verbose(&self) -> bool {
    self.is_verbose
  }
}
