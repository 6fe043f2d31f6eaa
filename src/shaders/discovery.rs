use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::*;

use super::config::Config;
use super::error::BuildError;
use super::toolchain::{CompilerSession, ShaderModule};

/// a shader source file found on disk
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ShaderSource {
    /// the file stem, used to load the module by name
    pub module_name: String,
    pub path: PathBuf,
}

impl ShaderSource {
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new(""))
    }
}

/// a module with at least one entry point
pub struct LoadedModule<M> {
    pub name: String,
    pub module: M,
}

impl<M: ShaderModule> LoadedModule<M> {
    pub fn entry_point_count(&self) -> u32 {
        self.module.defined_entry_point_count()
    }
}

/// recursively finds source files, sorted by module name then path
/// so the build order never depends on directory iteration order
pub fn discover_shader_sources(config: &Config) -> Result<Vec<ShaderSource>, BuildError> {
    let source_dir = &config.shaders_source_dir;
    let discovery_error = |message: String| BuildError::Discovery {
        path: source_dir.clone(),
        message,
    };

    let pattern = format!("*.{}", config.source_extension);
    let walker = globwalk::GlobWalkerBuilder::from_patterns(source_dir, &[pattern.as_str()])
        .follow_links(true)
        .build()
        .map_err(|e| discovery_error(e.to_string()))?;

    let mut sources = vec![];
    for entry in walker {
        let entry = entry.map_err(|e| discovery_error(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        let Some(module_name) = path.file_stem().and_then(|s| s.to_str()) else {
            warn!("skipping shader source with a non utf-8 name: {path:?}");
            continue;
        };

        sources.push(ShaderSource {
            module_name: module_name.to_string(),
            path,
        });
    }

    sources.sort();

    // two files with the same stem load as the same module
    let mut seen = BTreeSet::new();
    sources.retain(|source| {
        let first = seen.insert(source.module_name.clone());
        if !first {
            warn!(
                "skipping {:?}: module name '{}' is already taken",
                source.path, source.module_name
            );
        }
        first
    });

    Ok(sources)
}

/// loads every source as a module, keeping only those that define entry points
pub fn load_modules<S: CompilerSession>(
    session: &S,
    sources: &[ShaderSource],
) -> Result<Vec<LoadedModule<S::Module>>, BuildError> {
    let mut modules = vec![];

    for source in sources {
        let name = &source.module_name;
        info!("loading module: {name}");

        let module = session
            .load_module(name)
            .surface(format_args!("loading module '{name}'"))
            .map_err(|source| BuildError::ModuleLoad {
                module: name.clone(),
                source,
            })?;

        // modules without entry points are only ever imported by others
        if module.defined_entry_point_count() == 0 {
            debug!("skipping module without entry points: {name}");
            continue;
        }

        modules.push(LoadedModule {
            name: name.clone(),
            module,
        });
    }

    Ok(modules)
}
