pub mod build_tasks;
pub mod compile;
pub mod config;
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod json;
pub mod manifest;
pub mod reflection;
pub mod spirv;
pub mod toolchain;
pub mod watcher;

#[cfg(test)]
mod testing;

pub use build_tasks::{BuildSummary, write_compiled_shaders};
pub use config::{Config, TargetConfig, TargetFormat};
pub use error::BuildError;
pub use manifest::Manifest;
