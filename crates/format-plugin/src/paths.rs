use anyhow::Context;
use anyhow::Result;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

use crate::environment::DirEntry;
use crate::environment::Environment;
use crate::patterns::ExcludeMatcher;
use crate::utils::get_file_extension;
use crate::utils::get_relative_path;
use crate::utils::resolve_absolute_path;

#[derive(Debug, Error)]
#[error("Could not resolve {} relative to the project directory {}", .file_path.display(), .project_dir.display())]
pub struct PathResolutionError {
  pub file_path: PathBuf,
  pub project_dir: PathBuf,
}

/// Gets the files to format.
///
/// When files are provided they're filtered by the exclusions and returned as
/// provided. Otherwise the project directory is searched for files with one of
/// the provided extensions.
pub fn select_files(
  environment: &impl Environment,
  provided_files: &[String],
  project_dir: &Path,
  exclude: &ExcludeMatcher,
  file_extensions: &[&str],
) -> Result<Vec<PathBuf>> {
  if provided_files.is_empty() {
    get_project_files(environment, project_dir, exclude, file_extensions)
  } else {
    filter_provided_files(environment, provided_files, project_dir, exclude)
  }
}

fn filter_provided_files(environment: &impl Environment, provided_files: &[String], project_dir: &Path, exclude: &ExcludeMatcher) -> Result<Vec<PathBuf>> {
  if exclude.is_empty() {
    return Ok(provided_files.iter().map(PathBuf::from).collect());
  }

  let cwd = environment.cwd()?;
  let absolute_project_dir = resolve_absolute_path(&cwd, project_dir);
  let mut file_paths = Vec::with_capacity(provided_files.len());
  for provided_file in provided_files {
    let file_path = PathBuf::from(provided_file);
    let absolute_file_path = resolve_absolute_path(&cwd, &file_path);
    let Some(relative_path) = get_relative_path(&absolute_project_dir, &absolute_file_path) else {
      return Err(
        PathResolutionError {
          file_path,
          project_dir: project_dir.to_path_buf(),
        }
        .into(),
      );
    };
    if exclude.matches(&relative_path) {
      log_verbose!(environment, "Excluded {}", provided_file);
      continue;
    }
    file_paths.push(file_path);
  }
  Ok(file_paths)
}

fn get_project_files(environment: &impl Environment, project_dir: &Path, exclude: &ExcludeMatcher, file_extensions: &[&str]) -> Result<Vec<PathBuf>> {
  let mut file_paths = Vec::new();
  collect_dir_files(environment, project_dir, Path::new(""), exclude, file_extensions, &mut file_paths)?;
  Ok(file_paths)
}

fn collect_dir_files(
  environment: &impl Environment,
  dir_path: &Path,
  relative_dir: &Path,
  exclude: &ExcludeMatcher,
  file_extensions: &[&str],
  file_paths: &mut Vec<PathBuf>,
) -> Result<()> {
  let mut entries = environment
    .dir_info(dir_path)
    .with_context(|| format!("Error reading dir {}", dir_path.display()))?;
  entries.sort_by(|a, b| a.name().cmp(b.name()));

  for entry in entries {
    let name = entry.name();
    let relative_path = relative_dir.join(name);
    if exclude.matches(&relative_path) {
      log_verbose!(environment, "Excluded {}", relative_path.display());
      continue;
    }
    let entry_path = dir_path.join(name);
    match entry {
      DirEntry::Directory(_) => collect_dir_files(environment, &entry_path, &relative_path, exclude, file_extensions, file_paths)?,
      DirEntry::File { .. } => {
        let has_extension = get_file_extension(&relative_path).map(|ext| file_extensions.contains(&ext)).unwrap_or(false);
        if has_extension {
          file_paths.push(entry_path);
        }
      }
    }
  }

  Ok(())
}
