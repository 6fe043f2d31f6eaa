use std::path::PathBuf;

use log::*;

use super::compile::compile_entry_point;
use super::config::Config;
use super::discovery::{discover_shader_sources, load_modules};
use super::error::BuildError;
use super::manifest::Manifest;
use super::reflection::reflect_shader_program;
use super::toolchain::{LinkedProgram, Toolchain};

#[derive(Debug)]
pub struct BuildSummary {
    /// one per compiled entry point, in compilation order
    pub artifacts: Vec<PathBuf>,
    pub manifest_path: PathBuf,
}

/// compiles every entry point of every shader module and writes the reflection manifest
///
/// the first error aborts the build; the manifest is only written once every
/// entry point has compiled, so a failed build leaves any previous one untouched
pub fn write_compiled_shaders<T: Toolchain>(
    toolchain: &T,
    config: &Config,
) -> Result<BuildSummary, BuildError> {
    let sources = discover_shader_sources(config)?;
    info!(
        "found {} shader sources in {:?}",
        sources.len(),
        config.shaders_source_dir
    );

    let session_config = config.session_config(sources.iter().map(|s| s.dir()));
    let session = toolchain
        .create_session(&session_config)
        .surface("creating compiler session")
        .map_err(BuildError::ToolchainInit)?;

    let modules = load_modules(&session, &sources)?;

    std::fs::create_dir_all(&config.compiled_shaders_dir)
        .map_err(BuildError::output_write(&config.compiled_shaders_dir))?;

    let mut manifest = Manifest::default();
    let mut artifacts = vec![];

    for module in &modules {
        let entry_point_count = module.entry_point_count();
        info!(
            "compiling shader: {} ({entry_point_count} entry points)",
            module.name
        );

        for index in 0..entry_point_count {
            let compiled = compile_entry_point(&session, module, index, config)?;

            let record = reflect_shader_program(
                &module.name,
                compiled.program.program_layout(),
                Some(&compiled.metadata),
            );

            manifest.push(record);
            artifacts.push(compiled.artifact_path);
        }
    }

    let manifest_path = config.manifest_path();
    manifest.write(&manifest_path)?;

    Ok(BuildSummary {
        artifacts,
        manifest_path,
    })
}
