//! In-process compile backend built on the `grass` Sass compiler.
//!
//! grass understands a subset of what Compass does: only the expanded and
//! compressed output styles, no debug info, and no Ruby plugins. Settings
//! outside that subset are downgraded with a warning instead of failing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use sassconf_core::constants::{PARTIAL_PREFIX, SASS_EXTENSIONS};
use sassconf_core::{BuildSettings, CompileOverrides, Engine, OutputStyle};

/// Outcome of compiling a theme directory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompileReport {
    /// Stylesheets written, in walk order.
    pub written: Vec<PathBuf>,
    /// Partials seen and left to their importers.
    pub partials: usize,
}

/// Engine that compiles the theme without leaving the process.
#[derive(Debug)]
pub struct GrassEngine {
    project_root: PathBuf,
}

impl GrassEngine {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }
}

impl Engine for GrassEngine {
    fn name(&self) -> &str {
        "grass"
    }

    fn compile(&self, settings: &BuildSettings, overrides: &CompileOverrides) -> Result<()> {
        let resolved = settings.resolve_paths(&self.project_root);
        let report = compile_theme(&resolved, overrides)?;
        info!(target: "sassconf",
            "grass wrote {} stylesheet(s) to {} ({} partials skipped)",
            report.written.len(),
            resolved.css_output_dir().display(),
            report.partials
        );
        Ok(())
    }
}

/// Maps the requested style onto the two styles grass can emit.
pub fn grass_style(style: OutputStyle) -> grass::OutputStyle {
    match style {
        OutputStyle::Compressed => grass::OutputStyle::Compressed,
        OutputStyle::Expanded => grass::OutputStyle::Expanded,
        OutputStyle::Nested | OutputStyle::Compact => {
            warn!("grass does not support '{}' output, using expanded", style);
            grass::OutputStyle::Expanded
        }
    }
}

fn warn_unsupported(settings: &BuildSettings) {
    if settings.sass_options().debug_info {
        warn!("grass cannot emit debug info; ignoring firesass");
    }
    let plugins = settings.enabled_plugins();
    if !plugins.is_empty() {
        warn!(
            "compass plugins are not available to grass: {}",
            plugins.into_iter().collect::<Vec<_>>().join(", ")
        );
    }
    if settings.line_comments() {
        debug!("grass does not emit line comments");
    }
}

/// Compiles a Sass string with the settings' import paths and style.
pub fn compile_scss(
    scss: &str,
    settings: &BuildSettings,
    overrides: &CompileOverrides,
) -> Result<String> {
    let options = grass::Options::default()
        .load_paths(settings.import_paths())
        .style(grass_style(overrides.effective_style(settings)));

    grass::from_string(scss.to_string(), &options).map_err(|e| anyhow!("sass error: {e}"))
}

/// Compiles every entry stylesheet under the sass source dir into the css dir.
///
/// Paths in `settings` are used as given; anchor them with
/// [`BuildSettings::resolve_paths`] first when they are relative to a theme root.
#[instrument(skip_all, fields(sass_dir = %settings.sass_source_dir().display()))]
pub fn compile_theme(settings: &BuildSettings, overrides: &CompileOverrides) -> Result<CompileReport> {
    let sass_dir = settings.sass_source_dir();
    if !sass_dir.is_dir() {
        bail!("sass source directory not found: {}", sass_dir.display());
    }

    warn_unsupported(settings);
    let options = grass::Options::default()
        .load_paths(settings.import_paths())
        .style(grass_style(overrides.effective_style(settings)));

    let mut report = CompileReport::default();
    for entry in WalkDir::new(sass_dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", sass_dir.display()))?;
        if !entry.file_type().is_file() || !is_sass_file(entry.path()) {
            continue;
        }
        if entry
            .file_name()
            .to_string_lossy()
            .starts_with(PARTIAL_PREFIX)
        {
            report.partials += 1;
            continue;
        }

        let source = entry.path();
        let target = output_path(sass_dir, settings.css_output_dir(), source)?;
        let css = grass::from_path(source, &options)
            .map_err(|e| anyhow!("sass error in {}: {e}", source.display()))?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory '{}'", parent.display()))?;
        }
        fs::write(&target, css)
            .with_context(|| format!("failed to write '{}'", target.display()))?;
        debug!("compiled {} -> {}", source.display(), target.display());
        report.written.push(target);
    }

    Ok(report)
}

fn is_sass_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SASS_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

fn output_path(sass_dir: &Path, css_dir: &Path, source: &Path) -> Result<PathBuf> {
    let relative = source
        .strip_prefix(sass_dir)
        .with_context(|| format!("'{}' is outside the sass directory", source.display()))?;
    Ok(css_dir.join(relative).with_extension("css"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sassconf_core::{BuildDescriptor, Environment, PluginToggles};
    use tempfile::tempdir;

    fn theme(environment: Environment) -> (tempfile::TempDir, BuildSettings) {
        let dir = tempdir().unwrap();
        let sass = dir.path().join("sass");
        fs::create_dir_all(sass.join("layouts")).unwrap();
        fs::write(sass.join("_base.scss"), "$accent: #336699;\n").unwrap();
        fs::write(
            sass.join("global.scss"),
            "@import 'base';\n.header {\n  a { color: $accent; }\n}\n",
        )
        .unwrap();
        fs::write(
            sass.join("layouts/responsive.scss"),
            "@import 'base';\n.page { border-color: $accent; }\n",
        )
        .unwrap();
        fs::write(sass.join("README.txt"), "not a stylesheet").unwrap();

        let settings = BuildSettings::from_descriptor(BuildDescriptor {
            environment,
            plugins: PluginToggles::none(),
            ..BuildDescriptor::default()
        })
        .resolve_paths(dir.path());
        (dir, settings)
    }

    #[test]
    fn compiles_entries_and_skips_partials() {
        let (dir, settings) = theme(Environment::Development);
        let report = compile_theme(&settings, &CompileOverrides::default()).unwrap();

        assert_eq!(report.partials, 1);
        assert_eq!(
            report.written,
            vec![
                dir.path().join("css/global.css"),
                dir.path().join("css/layouts/responsive.css"),
            ]
        );
        let css = fs::read_to_string(dir.path().join("css/global.css")).unwrap();
        assert!(css.contains(".header a"));
        assert!(css.contains("#336699"));
    }

    #[test]
    fn production_output_is_compressed() {
        let (dir, settings) = theme(Environment::Production);
        compile_theme(&settings, &CompileOverrides::default()).unwrap();
        let css = fs::read_to_string(dir.path().join("css/global.css")).unwrap();
        assert!(css.contains(".header a{color:"));
        assert!(!css.contains("\n  "));
    }

    #[test]
    fn missing_sass_dir_is_an_error() {
        let dir = tempdir().unwrap();
        let settings = BuildSettings::load().resolve_paths(dir.path());
        let err = compile_theme(&settings, &CompileOverrides::default()).expect_err("must fail");
        assert!(err.to_string().contains("sass source directory not found"));
    }

    #[test]
    fn compile_scss_honors_style_override() {
        let settings = BuildSettings::load();
        let overrides = CompileOverrides {
            output_style: Some(OutputStyle::Compressed),
        };
        let css = compile_scss("a { b { color: red; } }", &settings, &overrides).unwrap();
        assert_eq!(css.trim_end(), "a b{color:red}");
    }

    #[test]
    fn unsupported_styles_fall_back_to_expanded() {
        assert!(matches!(
            grass_style(OutputStyle::Nested),
            grass::OutputStyle::Expanded
        ));
        assert!(matches!(
            grass_style(OutputStyle::Compressed),
            grass::OutputStyle::Compressed
        ));
    }

    #[test]
    fn engine_resolves_paths_against_root() {
        let (dir, _) = theme(Environment::Development);
        let engine = GrassEngine::new(dir.path());
        let settings = BuildSettings::from_descriptor(BuildDescriptor {
            plugins: PluginToggles::none(),
            ..BuildDescriptor::default()
        });
        engine
            .compile(&settings, &CompileOverrides::default())
            .unwrap();
        assert!(dir.path().join("css/layouts/responsive.css").is_file());
    }
}
