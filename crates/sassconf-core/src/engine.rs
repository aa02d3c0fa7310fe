use std::collections::HashMap;

use anyhow::{bail, Result};
use tracing::{debug, instrument};

use crate::config::BuildSettings;
use crate::style::OutputStyle;

pub mod compass;

/// A process the engine wishes to launch for a compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionAction {
    /// The executable program (e.g., "compass").
    pub program: String,
    /// The arguments to pass to the program.
    pub args: Vec<String>,
}

/// Engine-side overrides given on the command line.
///
/// These change how a single compile runs and never touch the settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOverrides {
    pub output_style: Option<OutputStyle>,
}

impl CompileOverrides {
    /// The style a compile should use: the override if given, else the derived one.
    pub fn effective_style(&self, settings: &BuildSettings) -> OutputStyle {
        self.output_style.unwrap_or_else(|| settings.output_style())
    }
}

/// A contract for the CSS compilers that consume the build settings.
pub trait Engine: std::fmt::Debug {
    /// Unique name of the engine, used as the `compile:<name>` selector.
    fn name(&self) -> &str;

    /// Compiles the theme described by `settings`.
    fn compile(&self, settings: &BuildSettings, overrides: &CompileOverrides) -> Result<()>;
}

/// Engines available to the `compile` command, keyed by name.
#[derive(Debug, Default)]
pub struct EngineRegistry {
    engines: HashMap<String, Box<dyn Engine>>,
}

impl EngineRegistry {
    /// Registers a new engine, replacing any engine with the same name.
    pub fn register(&mut self, engine: Box<dyn Engine>) {
        self.engines.insert(engine.name().to_string(), engine);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Engine> {
        self.engines.get(name).map(|engine| engine.as_ref())
    }

    /// Sorted engine names.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.engines.keys().cloned().collect();
        names.sort();
        names
    }

    /// Runs a compile with the named engine.
    ///
    /// # Errors
    /// Returns an error if no engine is registered under `name`, or if the engine fails.
    #[instrument(skip(self, settings))]
    pub fn compile(
        &self,
        name: &str,
        settings: &BuildSettings,
        overrides: &CompileOverrides,
    ) -> Result<()> {
        let Some(engine) = self.get(name) else {
            bail!(
                "unknown engine '{}' (available: {})",
                name,
                self.names().join(", ")
            );
        };
        debug!(
            "compiling with {} (style={})",
            engine.name(),
            overrides.effective_style(settings)
        );
        engine.compile(settings, overrides)
    }
}
