use log::*;

use super::json::*;
use super::toolchain::{ProgramLayout, UsageMetadata};

mod entry_points;
pub use entry_points::*;

mod parameters;
pub use parameters::*;

/// reflection for one linked program; a missing layout yields empty lists
pub fn reflect_shader_program<L: ProgramLayout, M: UsageMetadata>(
    shader_name: &str,
    program_layout: Option<&L>,
    metadata: Option<&M>,
) -> ReflectionRecord {
    let Some(program_layout) = program_layout else {
        warn!("no program layout for {shader_name}; reflecting nothing");
        return ReflectionRecord::new(shader_name, vec![], vec![]);
    };

    let parameters = reflect_parameters(program_layout, metadata);
    let entry_points = reflect_entry_points(program_layout);
    debug!(
        "reflected {} parameters and {} entry points for {shader_name}",
        parameters.len(),
        entry_points.len()
    );

    ReflectionRecord::new(shader_name, parameters, entry_points)
}
