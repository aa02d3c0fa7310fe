use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};

use crate::Cli;
use sassconf_core::{BuildSettings, Environment};
use tracing::{info, instrument};

const TEMPLATE: &str = include_str!("../resources/sassconf.toml");

/// Runs the `init` command to write a new theme descriptor.
#[instrument(skip(cli))]
pub fn run(cli: &Cli, template_selector: &str) -> Result<()> {
    let environment = match template_selector {
        "default" | "development" => Environment::Development,
        "production" => Environment::Production,
        other => {
            return Err(anyhow!(
                "unknown init template '{}' (supported: default,production)",
                other
            ))
        }
    };

    let content = render_descriptor(environment);
    // The template must always load with the same loader the other commands use.
    BuildSettings::from_toml_str(&content).context("init template is not a valid descriptor")?;

    if cli.stdout {
        println!("{content}");
        return Ok(());
    }

    write_if_absent(&cli.config, &content, cli.force)
        .with_context(|| format!("failed to write '{}'", cli.config))?;

    info!(
        "init complete: environment={}, config={}",
        environment, cli.config
    );
    println!("next: run 'sassconf check'");

    Ok(())
}

fn render_descriptor(environment: Environment) -> String {
    TEMPLATE.replace("{{ENVIRONMENT}}", environment.as_str())
}

fn write_if_absent(path: &str, content: &str, force: bool) -> Result<()> {
    let output = Path::new(path);

    if output.exists() && !force {
        return Err(anyhow!(
            "'{}' already exists. Re-run with --force to overwrite",
            path
        ));
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory '{}'", parent.display()))?;
    }

    fs::write(output, content)
        .with_context(|| format!("failed to write file '{}'", output.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sassconf_core::OutputStyle;
    use tempfile::tempdir;

    #[test]
    fn template_matches_built_in_defaults() {
        let settings = BuildSettings::from_toml_str(&render_descriptor(Environment::Development))
            .expect("template should parse");
        assert_eq!(settings, BuildSettings::load());
    }

    #[test]
    fn production_template_compresses() {
        let settings = BuildSettings::from_toml_str(&render_descriptor(Environment::Production))
            .expect("template should parse");
        assert_eq!(settings.output_style(), OutputStyle::Compressed);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("theme/sassconf.toml");
        let path = path.to_str().unwrap();

        write_if_absent(path, "a = 1\n", false).expect("first write");
        let err = write_if_absent(path, "a = 2\n", false).expect_err("must fail");
        assert!(err.to_string().contains("--force"));

        write_if_absent(path, "a = 3\n", true).expect("forced write");
        assert_eq!(fs::read_to_string(path).unwrap(), "a = 3\n");
    }
}
