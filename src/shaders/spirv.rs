use std::path::{Path, PathBuf};
use std::process::Command;

use log::*;

use super::error::BuildError;

pub const DEFAULT_VALIDATOR: &str = "glslangValidator";

/// `blur_0.comp` -> `blur_0.spv`
pub fn spirv_output_path(glsl_path: &Path) -> PathBuf {
    glsl_path.with_extension("spv")
}

/// compiles each generated glsl file to a sibling spv file
/// requires glslangValidator on the path (ie, from the vulkan sdk)
pub fn compile_glsl_artifacts(
    validator: &Path,
    artifacts: &[PathBuf],
    glsl_extension: &str,
) -> Result<Vec<PathBuf>, BuildError> {
    let mut outputs = vec![];

    for glsl_path in artifacts {
        if glsl_path.extension().is_none_or(|ext| ext != glsl_extension) {
            continue;
        }

        let spv_path = spirv_output_path(glsl_path);
        info!("compiling {glsl_path:?} to spirv");

        let output = Command::new(validator)
            .arg("-V")
            .arg(glsl_path)
            .arg("-o")
            .arg(&spv_path)
            .output()
            .map_err(|e| BuildError::SpirvCompile {
                path: glsl_path.clone(),
                message: format!("failed to run {validator:?}: {e}"),
            })?;

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("{validator:?} output:\n{stdout}{stderr}");
            return Err(BuildError::SpirvCompile {
                path: glsl_path.clone(),
                message: format!("{validator:?} exited with {}", output.status),
            });
        }

        outputs.push(spv_path);
    }

    Ok(outputs)
}
