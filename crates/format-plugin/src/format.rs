use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use crate::environment::Environment;
use crate::formatters::FormatOutput;
use crate::formatters::Formatter;
use crate::paths::select_files;
use crate::patterns::ExcludeMatcher;

pub const GO_FILE_EXTENSIONS: &[&str] = &["go"];

/// The resolved formatters and exclusions of a run.
pub struct FormatParam {
  /// In registration order.
  pub formatters: Vec<Box<dyn Formatter>>,
  pub exclude: ExcludeMatcher,
}

#[derive(Debug, PartialEq, Eq)]
pub enum FormatOutcome {
  /// Nothing was selected so no formatter ran.
  NoFiles,
  Formatted,
  /// Every file is formatted.
  Verified,
  /// The files that aren't formatted, in selection order.
  Unformatted(Vec<PathBuf>),
}

/// Runs every formatter over the selected files.
///
/// When verifying, formatters only list the files they would change and their
/// reports are merged into a single list in the order the files were selected.
pub fn run_format(environment: &impl Environment, param: &FormatParam, project_dir: &Path, verify: bool, provided_files: &[String]) -> Result<FormatOutcome> {
  let file_paths = select_files(environment, provided_files, project_dir, &param.exclude, GO_FILE_EXTENSIONS)?;
  if file_paths.is_empty() {
    log_verbose!(environment, "No files to format.");
    return Ok(FormatOutcome::NoFiles);
  }
  log_verbose!(environment, "Formatting {} file(s).", file_paths.len());

  if !verify {
    for formatter in &param.formatters {
      log_verbose!(environment, "Running {}", formatter.type_name());
      formatter.format(&file_paths, false, FormatOutput::Stream)?;
    }
    return Ok(FormatOutcome::Formatted);
  }

  let mut buffer = Vec::new();
  for formatter in &param.formatters {
    log_verbose!(environment, "Verifying with {}", formatter.type_name());
    if let Err(err) = formatter.format(&file_paths, true, FormatOutput::Buffer(&mut buffer)) {
      if !buffer.is_empty() {
        environment.log(&String::from_utf8_lossy(&buffer));
      }
      return Err(err);
    }
  }

  let unformatted = reconcile_output(&String::from_utf8_lossy(&buffer), &file_paths);
  Ok(if unformatted.is_empty() {
    FormatOutcome::Verified
  } else {
    FormatOutcome::Unformatted(unformatted)
  })
}

/// Gets the selected files that were reported at least once, in selection order.
///
/// Reported lines are compared to the selected paths as exact strings. Lines
/// that aren't a selected path are ignored.
pub fn reconcile_output(output: &str, file_paths: &[PathBuf]) -> Vec<PathBuf> {
  let reported = output.lines().filter(|line| !line.is_empty()).collect::<HashSet<_>>();
  let mut seen = HashSet::new();
  file_paths
    .iter()
    .filter(|file_path| {
      let text = file_path.to_string_lossy();
      reported.contains(text.as_ref()) && seen.insert(text.to_string())
    })
    .cloned()
    .collect()
}
