//! Lexical path resolution.
//!
//! Paths handed to external tools are resolved against an explicit base
//! instead of the process working directory.

use std::path::{Component, Path, PathBuf};

/// Resolve `path` against `base` and normalize the result.
///
/// Absolute paths are returned normalized but otherwise untouched.
///
/// # Examples
///
/// ```
/// use dpabuild_lib::platform::paths::resolve_against;
/// use std::path::PathBuf;
///
/// # #[cfg(unix)]
/// # {
/// let dep = resolve_against("/work/clibdpa", "../cutils/build/Unix_Makefiles");
/// assert_eq!(dep, PathBuf::from("/work/cutils/build/Unix_Makefiles"));
/// # }
/// ```
pub fn resolve_against<B: AsRef<Path>, P: AsRef<Path>>(base: B, path: P) -> PathBuf {
  let path = path.as_ref();
  if path.is_absolute() {
    return normalize_path(path);
  }
  normalize_path(&base.as_ref().join(path))
}

/// Normalize a path by resolving `.` and `..` components without requiring the path to exist
///
/// A `..` never climbs above the root or a drive prefix.
pub fn normalize_path(path: &Path) -> PathBuf {
  let mut components: Vec<Component<'_>> = Vec::new();

  for component in path.components() {
    match component {
      Component::ParentDir => match components.last() {
        Some(Component::Normal(_)) => {
          components.pop();
        }
        Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
        _ => components.push(component),
      },
      Component::CurDir => {}
      other => components.push(other),
    }
  }

  components.iter().collect()
}
