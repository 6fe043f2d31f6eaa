pub mod shaders;

pub use shaders::build_tasks;
