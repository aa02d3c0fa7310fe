use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::plugin::PluginToggles;
use crate::style::{Environment, OutputStyle};

/// The literal fields of a theme's build descriptor, as written by hand.
///
/// Every key is optional; missing keys take the theme defaults. Keys for
/// derived values (`output_style`, `sass_options`) are accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuildDescriptor {
    pub environment: Environment,
    #[serde(alias = "firesass")]
    pub firesass_debug: bool,
    #[serde(alias = "css_dir")]
    pub css_output_dir: PathBuf,
    #[serde(alias = "sass_dir")]
    pub sass_source_dir: PathBuf,
    pub images_dir: PathBuf,
    pub javascripts_dir: PathBuf,
    pub relative_assets: bool,
    pub line_comments: bool,
    pub import_paths: Vec<PathBuf>,
    pub plugins: PluginToggles,
}

impl Default for BuildDescriptor {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            firesass_debug: false,
            css_output_dir: PathBuf::from("css"),
            sass_source_dir: PathBuf::from("sass"),
            images_dir: PathBuf::from("images"),
            javascripts_dir: PathBuf::from("js"),
            relative_assets: true,
            line_comments: true,
            import_paths: Vec::new(),
            plugins: PluginToggles::default(),
        }
    }
}

/// Options passed through to the Sass compiler.
///
/// Serializes to an empty table unless debug info is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SassOptions {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub debug_info: bool,
}

impl SassOptions {
    pub fn is_empty(&self) -> bool {
        !self.debug_info
    }
}

/// Fully resolved build settings handed to the compiling engine.
///
/// `output_style` and `sass_options` are computed from `environment` and
/// `firesass_debug` on every construction, including deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BuildDescriptor")]
pub struct BuildSettings {
    environment: Environment,
    firesass_debug: bool,
    css_output_dir: PathBuf,
    sass_source_dir: PathBuf,
    images_dir: PathBuf,
    javascripts_dir: PathBuf,
    output_style: OutputStyle,
    relative_assets: bool,
    line_comments: bool,
    import_paths: Vec<PathBuf>,
    plugins: PluginToggles,
    sass_options: SassOptions,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self::load()
    }
}

impl From<BuildDescriptor> for BuildSettings {
    fn from(descriptor: BuildDescriptor) -> Self {
        Self::from_descriptor(descriptor)
    }
}

impl BuildSettings {
    /// Builds the settings from the theme's literal defaults.
    pub fn load() -> Self {
        Self::from_descriptor(BuildDescriptor::default())
    }

    pub fn from_descriptor(descriptor: BuildDescriptor) -> Self {
        let output_style = descriptor.environment.output_style();
        let sass_options = SassOptions {
            debug_info: descriptor.environment == Environment::Development
                && descriptor.firesass_debug,
        };

        // The sass root leads and appears once; later duplicates are dropped.
        let mut seen = vec![normalize(&descriptor.sass_source_dir)];
        let mut import_paths = vec![descriptor.sass_source_dir.clone()];
        for path in descriptor.import_paths {
            let key = normalize(&path);
            if !seen.contains(&key) {
                seen.push(key);
                import_paths.push(path);
            }
        }

        Self {
            environment: descriptor.environment,
            firesass_debug: descriptor.firesass_debug,
            css_output_dir: descriptor.css_output_dir,
            sass_source_dir: descriptor.sass_source_dir,
            images_dir: descriptor.images_dir,
            javascripts_dir: descriptor.javascripts_dir,
            output_style,
            relative_assets: descriptor.relative_assets,
            line_comments: descriptor.line_comments,
            import_paths,
            plugins: descriptor.plugins,
            sass_options,
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let (descriptor, ignored) = parse_descriptor(text)?;
        if !ignored.is_empty() {
            warn!("ignoring unknown descriptor keys: {}", ignored.join(", "));
        }
        Ok(Self::from_descriptor(descriptor))
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read descriptor file: {}", path.display()))?;
        let settings = Self::from_toml_str(&text)
            .with_context(|| format!("failed to load descriptor: {}", path.display()))?;
        debug!(
            "loaded {} (environment={}, output_style={})",
            path.display(),
            settings.environment,
            settings.output_style
        );
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize build settings")
    }

    /// Returns the literal fields these settings were resolved from.
    pub fn descriptor(&self) -> BuildDescriptor {
        BuildDescriptor {
            environment: self.environment,
            firesass_debug: self.firesass_debug,
            css_output_dir: self.css_output_dir.clone(),
            sass_source_dir: self.sass_source_dir.clone(),
            images_dir: self.images_dir.clone(),
            javascripts_dir: self.javascripts_dir.clone(),
            relative_assets: self.relative_assets,
            line_comments: self.line_comments,
            import_paths: self.import_paths[1..].to_vec(),
            plugins: self.plugins.clone(),
        }
    }

    /// Anchors every relative directory at `root`. Absolute paths are kept.
    pub fn resolve_paths(&self, root: &Path) -> Self {
        let mut descriptor = self.descriptor();
        descriptor.css_output_dir = root.join(&descriptor.css_output_dir);
        descriptor.sass_source_dir = root.join(&descriptor.sass_source_dir);
        descriptor.images_dir = root.join(&descriptor.images_dir);
        descriptor.javascripts_dir = root.join(&descriptor.javascripts_dir);
        descriptor.import_paths = descriptor
            .import_paths
            .iter()
            .map(|path| root.join(path))
            .collect();
        Self::from_descriptor(descriptor)
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn firesass_debug(&self) -> bool {
        self.firesass_debug
    }

    pub fn css_output_dir(&self) -> &Path {
        &self.css_output_dir
    }

    pub fn sass_source_dir(&self) -> &Path {
        &self.sass_source_dir
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn javascripts_dir(&self) -> &Path {
        &self.javascripts_dir
    }

    pub fn output_style(&self) -> OutputStyle {
        self.output_style
    }

    pub fn relative_assets(&self) -> bool {
        self.relative_assets
    }

    pub fn line_comments(&self) -> bool {
        self.line_comments
    }

    pub fn sass_options(&self) -> SassOptions {
        self.sass_options
    }

    pub fn import_paths(&self) -> &[PathBuf] {
        &self.import_paths
    }

    pub fn plugins(&self) -> &PluginToggles {
        &self.plugins
    }

    pub fn enabled_plugins(&self) -> BTreeSet<String> {
        self.plugins.enabled()
    }
}

/// Drops `.` components so `./sass`, `sass/` and `sass` compare equal.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Parses a descriptor, returning the keys it did not recognise.
///
/// Derived keys are expected in serialized settings and are not reported.
fn parse_descriptor(text: &str) -> Result<(BuildDescriptor, Vec<String>)> {
    let mut ignored = Vec::new();
    let descriptor = serde_ignored::deserialize(toml::Deserializer::new(text), |path| {
        let key = path.to_string();
        let top = key.split('.').next().unwrap_or_default();
        if top != "output_style" && top != "sass_options" {
            ignored.push(key);
        }
    })
    .context("failed to parse TOML descriptor")?;
    Ok((descriptor, ignored))
}
