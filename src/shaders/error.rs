use std::path::PathBuf;

use super::toolchain::ToolchainFailure;

/// every variant aborts the whole build; nothing is retried
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to initialize the shader toolchain: {0}")]
    ToolchainInit(#[source] ToolchainFailure),

    #[error("failed to scan shader sources in {path:?}: {message}")]
    Discovery { path: PathBuf, message: String },

    #[error("failed to load shader module {module:?}: {source}")]
    ModuleLoad {
        module: String,
        #[source]
        source: ToolchainFailure,
    },

    #[error("failed to resolve entry point {index} of {module:?}: {source}")]
    EntryPointResolution {
        module: String,
        index: u32,
        #[source]
        source: ToolchainFailure,
    },

    #[error("failed to compose entry point {index} of {module:?}: {source}")]
    Composition {
        module: String,
        index: u32,
        #[source]
        source: ToolchainFailure,
    },

    #[error("failed to link entry point {index} of {module:?}: {source}")]
    Link {
        module: String,
        index: u32,
        #[source]
        source: ToolchainFailure,
    },

    #[error("failed to generate code for entry point {index} of {module:?}: {source}")]
    Codegen {
        module: String,
        index: u32,
        #[source]
        source: ToolchainFailure,
    },

    #[error("failed to read usage metadata for entry point {index} of {module:?}: {source}")]
    Metadata {
        module: String,
        index: u32,
        #[source]
        source: ToolchainFailure,
    },

    #[error("failed to write {path:?}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize the reflection manifest: {0}")]
    ManifestSerialize(#[from] serde_json::Error),

    #[error("failed to compile {path:?} to spirv: {message}")]
    SpirvCompile { path: PathBuf, message: String },
}

impl BuildError {
    pub(crate) fn output_write(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::OutputWrite { path, source }
    }
}
