//! Constants used across the sassconf workspace.

/// The filename of a theme's build descriptor.
pub const CONFIG_FILE: &str = "sassconf.toml";

/// File extensions the Sass compilers accept as entry points.
pub const SASS_EXTENSIONS: &[&str] = &["scss", "sass"];

/// Partials start with this prefix and are only compiled through imports.
pub const PARTIAL_PREFIX: char = '_';
