use std::path::Path;

use log::*;

use slang_shader_manifest::shaders::toolchain::slang::SlangToolchain;
use slang_shader_manifest::shaders::{Config, TargetFormat, spirv, watcher};
use slang_shader_manifest::build_tasks;

/// compiles every slang shader under assets/shaders into assets/compiled_shaders,
/// along with a reflection.json describing each compiled entry point
///
/// COMPILE_SPIRV=true also runs glslangValidator over the generated glsl
/// WATCH_SHADERS=true keeps rebuilding whenever a shader source changes
pub fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let compile_spirv = env_flag("COMPILE_SPIRV");
    let watch_shaders = env_flag("WATCH_SHADERS");

    let config = Config::default();
    let toolchain = SlangToolchain::new()?;

    build(&toolchain, &config, compile_spirv)?;

    if !watch_shaders {
        return Ok(());
    }

    let mut changes = watcher::watch(&config.shaders_source_dir, &config.source_extension)?;
    info!("watching {:?} for changes", config.shaders_source_dir);
    loop {
        let events = changes.wait()?;
        debug!("rebuilding after {} shader source events", events.len());

        // the build that failed already logged its diagnostics
        if let Err(e) = build(&toolchain, &config, compile_spirv) {
            error!("shader build failed: {e}");
        }
    }
}

fn build(toolchain: &SlangToolchain, config: &Config, compile_spirv: bool) -> anyhow::Result<()> {
    let summary = build_tasks::write_compiled_shaders(toolchain, config)?;
    info!(
        "compiled {} entry points, manifest at {:?}",
        summary.artifacts.len(),
        summary.manifest_path
    );

    if compile_spirv && config.target.format == TargetFormat::Glsl {
        spirv::compile_glsl_artifacts(
            Path::new(spirv::DEFAULT_VALIDATOR),
            &summary.artifacts,
            &config.target.extension,
        )?;
    }

    Ok(())
}

fn env_flag(name: &str) -> bool {
    match std::env::var(name).ok() {
        None => false,
        Some(s) if s.is_empty() => false,
        Some(s) if s.to_lowercase() == "false" => false,
        _ => true,
    }
}
