use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::config::BuildSettings;
use crate::engine::{CompileOverrides, Engine, ExecutionAction};
use crate::style::Environment;

/// Runs the external `compass compile` command against a theme root.
#[derive(Debug)]
pub struct CompassEngine {
    program: String,
    project_root: PathBuf,
}

impl CompassEngine {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            program: "compass".to_string(),
            project_root: project_root.into(),
        }
    }

    /// Uses a different executable, e.g. `bundle exec compass` wrappers on PATH.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Maps the settings to the compass command line.
    pub fn build_action(
        &self,
        settings: &BuildSettings,
        overrides: &CompileOverrides,
    ) -> ExecutionAction {
        let mut args = vec![
            "compile".to_string(),
            self.project_root.display().to_string(),
            "--sass-dir".to_string(),
            settings.sass_source_dir().display().to_string(),
            "--css-dir".to_string(),
            settings.css_output_dir().display().to_string(),
            "--images-dir".to_string(),
            settings.images_dir().display().to_string(),
            "--javascripts-dir".to_string(),
            settings.javascripts_dir().display().to_string(),
            "-e".to_string(),
            settings.environment().as_str().to_string(),
            "-s".to_string(),
            overrides.effective_style(settings).as_str().to_string(),
        ];

        if settings.relative_assets() {
            args.push("--relative-assets".to_string());
        }
        if !settings.line_comments() {
            args.push("--no-line-comments".to_string());
        }
        if settings.sass_options().debug_info {
            args.push("--debug-info".to_string());
        }
        for plugin in settings.enabled_plugins() {
            args.push("-r".to_string());
            args.push(plugin);
        }
        // compass already searches the sass dir
        for path in settings.import_paths().iter().skip(1) {
            args.push("-I".to_string());
            args.push(path.display().to_string());
        }

        ExecutionAction {
            program: self.program.clone(),
            args,
        }
    }
}

impl Engine for CompassEngine {
    fn name(&self) -> &str {
        "compass"
    }

    fn compile(&self, settings: &BuildSettings, overrides: &CompileOverrides) -> Result<()> {
        if settings.firesass_debug() && settings.environment() == Environment::Production {
            warn!("firesass debug info is ignored in production");
        }

        let action = self.build_action(settings, overrides);
        info!(target: "sassconf", "run {} {}", action.program, action.args.join(" "));
        run_action(&action)
    }
}

fn run_action(action: &ExecutionAction) -> Result<()> {
    let status = Command::new(&action.program)
        .args(&action.args)
        .status()
        .with_context(|| {
            format!(
                "failed to start command '{} {}'",
                action.program,
                action.args.join(" ")
            )
        })?;

    if !status.success() {
        bail!(
            "command failed with status {}: {} {}",
            status,
            action.program,
            action.args.join(" ")
        );
    }

    Ok(())
}
