use anyhow::Context;
use anyhow::Result;
use globset::GlobBuilder;
use globset::GlobSet;
use globset::GlobSetBuilder;
use std::path::Component;
use std::path::Path;

use crate::configuration::ExcludeConfig;

/// Matches project relative paths against the configured exclusions.
pub struct ExcludeMatcher {
  names: GlobSet,
  paths: GlobSet,
  is_empty: bool,
}

impl ExcludeMatcher {
  pub fn new(config: &ExcludeConfig) -> Result<Self> {
    let paths = config.paths.iter().map(|pattern| process_path_pattern(pattern)).collect::<Vec<_>>();
    Ok(ExcludeMatcher {
      names: build_glob_set(&config.names)?,
      paths: build_glob_set(&paths)?,
      is_empty: config.is_empty(),
    })
  }

  /// Gets if nothing is excluded.
  pub fn is_empty(&self) -> bool {
    self.is_empty
  }

  /// Gets if the path relative to the project directory is excluded.
  ///
  /// A path is excluded when any of its components matches a name pattern
  /// or when it or any of its ancestors matches a path pattern.
  pub fn matches(&self, relative_path: &Path) -> bool {
    if self.is_empty {
      return false;
    }

    for component in relative_path.components() {
      if let Component::Normal(name) = component {
        if self.names.is_match(name) {
          return true;
        }
      }
    }

    let mut current = Some(relative_path);
    while let Some(path) = current {
      if path.as_os_str().is_empty() {
        break;
      }
      if self.paths.is_match(path) {
        return true;
      }
      current = path.parent();
    }

    false
  }
}

fn process_path_pattern(pattern: &str) -> String {
  let pattern = pattern.replace('\\', "/");
  let pattern = pattern.strip_prefix("./").unwrap_or(&pattern);
  pattern.trim_end_matches('/').to_string()
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
  let mut builder = GlobSetBuilder::new();
  for pattern in patterns {
    let glob = GlobBuilder::new(pattern)
      .literal_separator(true)
      .build()
      .with_context(|| format!("Error parsing exclude pattern {}", pattern))?;
    builder.add(glob);
  }
  builder.build().context("Error building exclude patterns")
}
