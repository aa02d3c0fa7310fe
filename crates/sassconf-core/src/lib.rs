//! Build settings for Compass/Sass theme pipelines.
//!
//! This crate defines the build descriptor, the settings derived from it,
//! command references for the CLI, and the engine contract that hands the
//! settings to a CSS compiler.

pub mod command;
pub mod config;
pub mod constants;
pub mod engine;
pub mod plugin;
pub mod style;

pub use command::{CommandRef, PrimaryCommand};
pub use config::{BuildDescriptor, BuildSettings, SassOptions};
pub use engine::{CompileOverrides, Engine, EngineRegistry, ExecutionAction};
pub use plugin::PluginToggles;
pub use style::{Environment, OutputStyle};
