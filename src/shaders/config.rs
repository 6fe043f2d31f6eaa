use std::path::{Path, PathBuf};

use super::toolchain::SessionConfig;

pub const MANIFEST_FILE_NAME: &str = "reflection.json";

#[derive(Debug, Clone)]
pub struct Config {
    /// the directory to read slang files from
    pub shaders_source_dir: PathBuf,
    /// extension (without the dot) marking a file as a shader module
    pub source_extension: String,
    /// extra module search paths, on top of the directories sources are found in
    pub search_paths: Vec<PathBuf>,
    /// the directory to write compiled entry points & reflection json to
    pub compiled_shaders_dir: PathBuf,
    pub target: TargetConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    pub format: TargetFormat,
    /// eg 'glsl_460' or 'sm_6_5'
    pub profile: String,
    /// extension (without the dot) for compiled entry point files
    pub extension: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Glsl,
    Spirv,
    Hlsl,
    Metal,
    Wgsl,
}

impl Default for Config {
    fn default() -> Self {
        let shaders_source_dir = PathBuf::from("assets/shaders");
        Self {
            search_paths: vec![shaders_source_dir.clone()],
            shaders_source_dir,
            source_extension: "slang".to_string(),
            compiled_shaders_dir: PathBuf::from("assets/compiled_shaders"),
            target: TargetConfig::default(),
        }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            format: TargetFormat::Glsl,
            profile: "glsl_460".to_string(),
            // the shaders are all compute kernels
            extension: "comp".to_string(),
        }
    }
}

impl Config {
    pub fn manifest_path(&self) -> PathBuf {
        self.compiled_shaders_dir.join(MANIFEST_FILE_NAME)
    }

    /// `<compiled_shaders_dir>/<module>_<index>.<extension>`
    pub fn artifact_path(&self, module_name: &str, entry_point_index: u32) -> PathBuf {
        let file_name = format!(
            "{module_name}_{entry_point_index}.{}",
            self.target.extension
        );
        self.compiled_shaders_dir.join(file_name)
    }

    /// the configured search paths followed by each source directory not already listed
    pub fn session_config<'a>(
        &self,
        source_dirs: impl IntoIterator<Item = &'a Path>,
    ) -> SessionConfig {
        let mut search_paths = self.search_paths.clone();
        for dir in source_dirs {
            if !search_paths.iter().any(|p| p == dir) {
                search_paths.push(dir.to_path_buf());
            }
        }

        SessionConfig {
            target: self.target.clone(),
            search_paths,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_names() {
        let config = Config::default();

        assert_eq!(
            config.artifact_path("blur", 1),
            PathBuf::from("assets/compiled_shaders/blur_1.comp")
        );
        assert_eq!(
            config.manifest_path(),
            PathBuf::from("assets/compiled_shaders/reflection.json")
        );
    }

    #[test]
    fn session_search_paths_skip_duplicates() {
        let config = Config::default();
        let nested = PathBuf::from("assets/shaders/post");

        let session_config = config.session_config([
            Path::new("assets/shaders"),
            nested.as_path(),
            nested.as_path(),
        ]);

        assert_eq!(
            session_config.search_paths,
            vec![PathBuf::from("assets/shaders"), nested]
        );
        assert_eq!(session_config.target.profile, "glsl_460");
    }
}
