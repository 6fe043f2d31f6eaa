use serde::{Deserialize, Serialize};

mod entry_points;
pub use entry_points::*;

mod parameters;
pub use parameters::*;

/// bumped whenever a field changes meaning; readers should ignore unknown fields
pub const FORMAT_VERSION: u32 = 1;

/// reflection for a single compiled entry point
/// a module with three entry points produces three of these
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionRecord {
    pub shader_name: String,
    pub parameters: Vec<Parameter>,
    pub entry_points: Vec<EntryPointDescriptor>,
    #[serde(default = "current_format_version")]
    pub format_version: u32,
}

impl ReflectionRecord {
    pub fn new(
        shader_name: impl Into<String>,
        parameters: Vec<Parameter>,
        entry_points: Vec<EntryPointDescriptor>,
    ) -> Self {
        Self {
            shader_name: shader_name.into(),
            parameters,
            entry_points,
            format_version: FORMAT_VERSION,
        }
    }
}

fn current_format_version() -> u32 {
    FORMAT_VERSION
}
