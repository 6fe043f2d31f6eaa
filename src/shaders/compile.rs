use std::path::PathBuf;

use log::*;

use super::config::Config;
use super::discovery::LoadedModule;
use super::error::BuildError;
use super::toolchain::*;

/// one entry point, composed & linked on its own
pub struct CompiledEntryPoint<P: LinkedProgram> {
    pub artifact_path: PathBuf,
    pub program: P,
    pub metadata: P::Metadata,
}

/// runs the full compose, link, codegen cycle for a single entry point
/// and writes the generated code to disk
///
/// entry points are never batched into one program, so every artifact is
/// self-contained and no entry point can affect another's output
pub fn compile_entry_point<S: CompilerSession>(
    session: &S,
    module: &LoadedModule<S::Module>,
    index: u32,
    config: &Config,
) -> Result<CompiledEntryPoint<LinkedOf<S>>, BuildError> {
    let name = &module.name;
    info!("processing entry point {index} of {name}");

    let entry_point = module
        .module
        .defined_entry_point(index)
        .map_err(|source| BuildError::EntryPointResolution {
            module: name.clone(),
            index,
            source,
        })?;

    let composite = session
        .compose(&entry_point)
        .surface(format_args!("composing {name} entry point {index}"))
        .map_err(|source| BuildError::Composition {
            module: name.clone(),
            index,
            source,
        })?;

    let program = composite
        .link()
        .surface(format_args!("linking {name} entry point {index}"))
        .map_err(|source| BuildError::Link {
            module: name.clone(),
            index,
            source,
        })?;

    // the composite only holds one entry point and the session one target
    let code = program
        .entry_point_code(0, 0)
        .surface(format_args!("generating code for {name} entry point {index}"))
        .map_err(|source| BuildError::Codegen {
            module: name.clone(),
            index,
            source,
        })?;

    let artifact_path = config.artifact_path(name, index);
    std::fs::write(&artifact_path, &code).map_err(BuildError::output_write(&artifact_path))?;
    info!("wrote {} bytes to {artifact_path:?}", code.len());

    let metadata = program
        .entry_point_metadata(0, 0)
        .surface(format_args!("reading usage metadata for {name} entry point {index}"))
        .map_err(|source| BuildError::Metadata {
            module: name.clone(),
            index,
            source,
        })?;

    Ok(CompiledEntryPoint {
        artifact_path,
        program,
        metadata,
    })
}
