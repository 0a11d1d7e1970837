//! Generator resolution.
//!
//! Maps a generator identifier from the command line onto the CMake generator
//! name, the build directory, and the sibling dependency directories that share
//! the same build suffix.

mod types;

pub use types::*;

/// Resolve a generator identifier (case-insensitive) into a build target.
///
/// Unknown identifiers are an error; nothing is planned or executed for them.
pub fn resolve(identifier: &str, debug: bool) -> Result<BuildTarget, TargetError> {
  let generator = Generator::from_id(identifier)?;
  Ok(BuildTarget::new(generator, debug))
}

/// Interpret a `--debug` value: only `yes` (any case) enables a debug build.
pub fn parse_debug_flag(value: &str) -> bool {
  value.trim().eq_ignore_ascii_case("yes")
}

impl BuildTarget {
  /// See [`resolve`].
  pub fn resolve(identifier: &str, debug: bool) -> Result<Self, TargetError> {
    resolve(identifier, debug)
  }
}
