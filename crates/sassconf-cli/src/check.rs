use std::path::Path;

use anyhow::{bail, Result};
use tracing::instrument;

use sassconf_core::{BuildSettings, Environment};

use crate::styles as s;

/// A single observation about a theme layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Finding {
    Ok(String),
    Warn(String),
    Error(String),
}

impl Finding {
    fn render(&self) -> String {
        match self {
            Self::Ok(msg) => format!("{} {msg}", s::paint(s::OK, "ok")),
            Self::Warn(msg) => format!("{} {msg}", s::paint(s::WARN, "warn")),
            Self::Error(msg) => format!("{} {msg}", s::paint(s::ERROR, "error")),
        }
    }
}

/// Runs `check:paths`, printing findings and failing on any error.
pub(crate) fn run(settings: &BuildSettings, root: &Path, selector: &str) -> Result<()> {
    if selector != "paths" {
        bail!("unknown check selector '{selector}' (supported: paths)");
    }

    let findings = inspect(&settings.resolve_paths(root));
    for finding in &findings {
        println!("{}", finding.render());
    }

    let errors = findings
        .iter()
        .filter(|f| matches!(f, Finding::Error(_)))
        .count();
    if errors > 0 {
        bail!("check:paths found {errors} error(s) in {}", root.display());
    }
    println!("check:paths passed");
    Ok(())
}

/// Inspects the directories a compile would touch. Paths must already be anchored.
#[instrument(skip_all)]
pub(crate) fn inspect(settings: &BuildSettings) -> Vec<Finding> {
    let mut findings = Vec::new();

    let sass_dir = settings.sass_source_dir();
    if sass_dir.is_dir() {
        findings.push(Finding::Ok(format!("sass dir {}", sass_dir.display())));
    } else {
        findings.push(Finding::Error(format!(
            "sass dir {} does not exist",
            sass_dir.display()
        )));
    }

    let css_dir = settings.css_output_dir();
    if css_dir.is_dir() {
        findings.push(Finding::Ok(format!("css dir {}", css_dir.display())));
    } else {
        findings.push(Finding::Warn(format!(
            "css dir {} does not exist yet; it is created on compile",
            css_dir.display()
        )));
    }

    for (label, dir) in [
        ("images dir", settings.images_dir()),
        ("javascripts dir", settings.javascripts_dir()),
    ] {
        if !dir.is_dir() {
            findings.push(Finding::Warn(format!(
                "{label} {} does not exist",
                dir.display()
            )));
        }
    }

    for path in settings.import_paths().iter().skip(1) {
        if !path.is_dir() {
            findings.push(Finding::Warn(format!(
                "import path {} does not exist",
                path.display()
            )));
        }
    }

    if settings.firesass_debug() && settings.environment() == Environment::Production {
        findings.push(Finding::Warn(
            "firesass is set but ignored in production".to_string(),
        ));
    }

    findings
}
