//! dpabuild-lib: generator resolution and build orchestration for clibdpa
//!
//! This crate provides:
//! - `target`: maps a generator identifier to the CMake generator, the build
//!   directory and the sibling dependency directories
//! - `process`: runs external commands through the platform shell
//! - `orchestrate`: the clean, create, configure, build pipeline

pub mod config;
pub mod consts;
pub mod orchestrate;
pub mod platform;
pub mod process;
pub mod target;

#[cfg(test)]
mod util;
