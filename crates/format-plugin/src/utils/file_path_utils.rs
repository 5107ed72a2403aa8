use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Resolves `path` against `base` when relative and lexically removes any
/// `.` and `..` components. Symlinks are not followed.
pub fn resolve_absolute_path(base: &Path, path: &Path) -> PathBuf {
  if path.is_absolute() {
    normalize_path(path)
  } else {
    normalize_path(&base.join(path))
  }
}

pub fn normalize_path(path: &Path) -> PathBuf {
  let mut result = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        // `..` of the root is the root
        if !result.pop() && !result.has_root() {
          result.push(component);
        }
      }
      _ => result.push(component),
    }
  }
  result
}

/// Gets `path` relative to `base_dir`, using leading `..` components when
/// `path` is outside of it. Both paths should be normalized.
///
/// Returns `None` when no relative path exists, such as when the paths are on
/// different roots or `base_dir` has `..` components that aren't shared.
pub fn get_relative_path(base_dir: &Path, path: &Path) -> Option<PathBuf> {
  let base_components = base_dir.components().collect::<Vec<_>>();
  let path_components = path.components().collect::<Vec<_>>();
  let common_count = base_components.iter().zip(&path_components).take_while(|(a, b)| a == b).count();
  let base_rest = &base_components[common_count..];
  let path_rest = &path_components[common_count..];
  let is_unrelatable = |component: &Component| matches!(component, Component::Prefix(_) | Component::RootDir);
  if base_rest.iter().chain(path_rest).any(is_unrelatable) || base_rest.iter().any(|c| matches!(c, Component::ParentDir)) {
    return None;
  }

  let mut result = PathBuf::new();
  for _ in base_rest {
    result.push("..");
  }
  for component in path_rest {
    result.push(component);
  }
  Some(result)
}

/// Gets the extension of the file path, without the period.
pub fn get_file_extension(file_path: &Path) -> Option<&str> {
  file_path.extension().and_then(|ext| ext.to_str())
}

#[cfg(test)]
mod test {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn should_normalize_path() {
    assert_eq!(normalize_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
    assert_eq!(normalize_path(Path::new("a/b/..")), PathBuf::from("a"));
    assert_eq!(normalize_path(Path::new("../a")), PathBuf::from("../a"));
    assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
  }

  #[test]
  fn should_resolve_absolute_path() {
    assert_eq!(resolve_absolute_path(Path::new("/project"), Path::new("foo.go")), PathBuf::from("/project/foo.go"));
    assert_eq!(resolve_absolute_path(Path::new("/project"), Path::new("./a/../foo.go")), PathBuf::from("/project/foo.go"));
    assert_eq!(resolve_absolute_path(Path::new("/project"), Path::new("/other/foo.go")), PathBuf::from("/other/foo.go"));
  }

  #[test]
  fn should_get_relative_path() {
    let relative = |base: &str, path: &str| get_relative_path(Path::new(base), Path::new(path));
    assert_eq!(relative("/project", "/project/a/foo.go"), Some(PathBuf::from("a/foo.go")));
    assert_eq!(relative("/project", "/other/foo.go"), Some(PathBuf::from("../other/foo.go")));
    assert_eq!(relative("/project/a/b", "/project/c.go"), Some(PathBuf::from("../../c.go")));
    assert_eq!(relative("/", "/foo.go"), Some(PathBuf::from("foo.go")));
    assert_eq!(relative("/project", "/project"), Some(PathBuf::new()));
  }

  #[test]
  fn should_not_get_relative_path_when_unrelatable() {
    let relative = |base: &str, path: &str| get_relative_path(Path::new(base), Path::new(path));
    assert_eq!(relative("/project", "foo.go"), None);
    assert_eq!(relative("project", "/foo.go"), None);
    assert_eq!(relative("../project", "foo.go"), None);
  }

  #[test]
  fn should_get_file_extension() {
    assert_eq!(get_file_extension(Path::new("/a/foo.go")), Some("go"));
    assert_eq!(get_file_extension(Path::new("/a/Makefile")), None);
  }
}
