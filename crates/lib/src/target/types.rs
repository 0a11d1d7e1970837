use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::consts::{BUILD_ROOT, DEBUG_BUILD_FLAG, DEP_PARENT, DEPENDENCY_NAMES};

/// Native build-file formats CMake is asked to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Generator {
  /// Visual Studio 2015 solution, 64-bit.
  Vs14,
  Make,
  Eclipse,
}

impl Generator {
  pub const ALL: [Generator; 3] = [Generator::Vs14, Generator::Make, Generator::Eclipse];

  /// Identifier accepted on the command line.
  pub fn id(&self) -> &'static str {
    match self {
      Generator::Vs14 => "vs14",
      Generator::Make => "make",
      Generator::Eclipse => "eclipse",
    }
  }

  /// Name passed to `cmake -G`.
  pub fn cmake_name(&self) -> &'static str {
    match self {
      Generator::Vs14 => "Visual Studio 14 2015 Win64",
      Generator::Make => "Unix Makefiles",
      Generator::Eclipse => "Eclipse CDT4 - Unix Makefiles",
    }
  }

  /// Output directory segments below `build/`.
  fn dir_segments(&self) -> &'static [&'static str] {
    match self {
      Generator::Vs14 => &["Visual_Studio_14_2015", "x64"],
      Generator::Make => &["Unix_Makefiles"],
      Generator::Eclipse => &["Eclipse_CDT4-Unix_Makefiles"],
    }
  }

  /// Build directory relative to the source root, e.g. `build/Unix_Makefiles`.
  ///
  /// Sibling dependencies are expected under the same suffix in their own trees.
  pub fn build_dir(&self) -> PathBuf {
    let mut dir = PathBuf::from(BUILD_ROOT);
    dir.extend(self.dir_segments());
    dir
  }

  /// Look up a generator by identifier, ignoring case.
  pub fn from_id(id: &str) -> Result<Self, TargetError> {
    let lowered = id.trim().to_lowercase();
    Self::ALL
      .into_iter()
      .find(|g| g.id() == lowered)
      .ok_or_else(|| TargetError::UnknownGenerator(id.to_string()))
  }

  /// Comma-separated list of accepted identifiers, for diagnostics.
  pub fn known_ids() -> String {
    Self::ALL.iter().map(|g| g.id()).collect::<Vec<_>>().join(", ")
  }
}

impl fmt::Display for Generator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.id())
  }
}

impl std::str::FromStr for Generator {
  type Err = TargetError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::from_id(s)
  }
}

/// Errors raised while resolving a build target.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
  #[error("unknown generator '{0}' (expected one of: {known})", known = Generator::known_ids())]
  UnknownGenerator(String),
}

/// A resolved generator plus the options that shape its invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildTarget {
  pub generator: Generator,
  pub generator_name: String,
  pub build_dir: PathBuf,
  pub debug: bool,
}

impl BuildTarget {
  pub fn new(generator: Generator, debug: bool) -> Self {
    Self {
      generator,
      generator_name: generator.cmake_name().to_string(),
      build_dir: generator.build_dir(),
      debug,
    }
  }

  /// Configure token for the requested build type, if any.
  pub fn debug_flag(&self) -> Option<&'static str> {
    self.debug.then_some(DEBUG_BUILD_FLAG)
  }

  /// Sibling dependency directories for this target's build suffix.
  pub fn dependencies(&self) -> DependencyPaths {
    DependencyPaths::for_build_dir(&self.build_dir)
  }
}

/// One sibling library's build directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
  /// Library name; also the prefix of its `<name>_DIR` CMake variable.
  pub name: &'static str,
  /// `../<name>/<build_dir>`, relative to the source root.
  pub path: PathBuf,
}

impl Dependency {
  /// CMake cache variable naming this dependency's package directory.
  pub fn cmake_var(&self) -> String {
    format!("{}_DIR", self.name)
  }
}

/// The three sibling dependency directories, in CMake argument order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyPaths([Dependency; 3]);

impl DependencyPaths {
  pub fn for_build_dir(build_dir: &Path) -> Self {
    Self(DEPENDENCY_NAMES.map(|name| Dependency {
      name,
      path: Path::new(DEP_PARENT).join(name).join(build_dir),
    }))
  }

  pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
    self.0.iter()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    false
  }
}

impl<'a> IntoIterator for &'a DependencyPaths {
  type Item = &'a Dependency;
  type IntoIter = std::slice::Iter<'a, Dependency>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.iter()
  }
}
