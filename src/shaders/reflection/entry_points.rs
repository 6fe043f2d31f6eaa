use crate::shaders::json::EntryPointDescriptor;
use crate::shaders::toolchain::ProgramLayout;

pub fn reflect_entry_points<L: ProgramLayout>(program_layout: &L) -> Vec<EntryPointDescriptor> {
    program_layout.entry_point_descriptors()
}
