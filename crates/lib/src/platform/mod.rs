//! Host detection and path helpers.

pub mod os;
pub mod paths;

pub use os::Os;
