//! Naming conventions shared by the resolver and the orchestrator.

/// Parent-directory marker prefixed to every sibling dependency path.
pub const DEP_PARENT: &str = "..";

/// Root of every generator's output tree, relative to the source root.
pub const BUILD_ROOT: &str = "build";

/// Sibling libraries the project links against, in the order they are passed to CMake.
pub const DEPENDENCY_NAMES: [&str; 3] = ["clibcdc", "clibspi", "cutils"];

pub const DEFAULT_CMAKE: &str = "cmake";

/// Configure token appended when a debug build is requested.
pub const DEBUG_BUILD_FLAG: &str = "-DCMAKE_BUILD_TYPE=Debug";

pub const CMAKE_ENV: &str = "DPABUILD_CMAKE";
pub const SHELL_ENV: &str = "DPABUILD_SHELL";
