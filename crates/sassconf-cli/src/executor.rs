use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use sassconf_core::engine::compass::CompassEngine;
use sassconf_core::{BuildSettings, CompileOverrides, EngineRegistry, OutputStyle};
use sassconf_grass::GrassEngine;

/// Registers every engine the binary ships with, rooted at the theme directory.
pub fn engines(root: &Path) -> EngineRegistry {
    let mut registry = EngineRegistry::default();
    registry.register(Box::new(CompassEngine::new(root)));
    registry.register(Box::new(GrassEngine::new(root)));
    registry
}

/// Runs `compile:<engine>` for the theme at `root`.
#[instrument(skip(settings))]
pub fn run(
    settings: &BuildSettings,
    root: &Path,
    engine: &str,
    output_style: Option<OutputStyle>,
) -> Result<()> {
    let overrides = CompileOverrides { output_style };
    info!(target: "sassconf",
        "compile {} with {} (environment={}, style={})",
        root.display(),
        engine,
        settings.environment(),
        overrides.effective_style(settings)
    );

    engines(root)
        .compile(engine, settings, &overrides)
        .with_context(|| format!("compile:{engine} failed for {}", root.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn ships_compass_and_grass() {
        assert_eq!(engines(Path::new(".")).names(), vec!["compass", "grass"]);
    }

    #[test]
    fn grass_compile_writes_css() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sass")).unwrap();
        fs::write(dir.path().join("sass/style.scss"), "p { margin: 0; }\n").unwrap();

        run(
            &BuildSettings::load(),
            dir.path(),
            "grass",
            Some(OutputStyle::Compressed),
        )
        .expect("grass compile should succeed");
        let css = fs::read_to_string(dir.path().join("css/style.css")).unwrap();
        assert_eq!(css.trim_end(), "p{margin:0}");
    }

    #[test]
    fn unknown_engine_is_reported() {
        let err = run(&BuildSettings::load(), Path::new("."), "libsass", None)
            .expect_err("must fail");
        assert!(format!("{err:#}").contains("unknown engine 'libsass'"));
    }
}
