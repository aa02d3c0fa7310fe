use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;

use sassconf_core::{BuildSettings, CommandRef, OutputStyle, PrimaryCommand};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod check;
mod executor;
mod init;
mod styles;

use styles as s;

/// The command-line interface for sassconf.
#[derive(Debug, Parser)]
#[command(name = "sassconf")]
#[command(version)]
#[command(styles = s::get_clap_styles())]
#[command(about = "Typed build settings for Compass/Sass themes")]
#[command(
    long_about = "sassconf reads a theme's build descriptor (sassconf.toml), derives the
output style and Sass options from the environment, and hands the result to a
CSS compiler.

Common Commands:
  init              Write a new sassconf.toml (init:production for a deploy build)
  show              Print the resolved settings (show:toml, show:json)
  check             Verify the theme directories exist (check:paths)
  compile           Compile the theme (compile:compass, compile:grass)
"
)]
#[command(
    after_help = "\x1b[1;35mExamples:\x1b[0m\n  \x1b[36msassconf init\x1b[0m                         \x1b[2m# Write a development descriptor\x1b[0m\n  \x1b[36msassconf show json\x1b[0m                    \x1b[2m# Resolved settings as JSON\x1b[0m\n  \x1b[36msassconf compile grass\x1b[0m                \x1b[2m# Compile in-process with grass\x1b[0m\n  \x1b[36msassconf compile --output-style nested\x1b[0m \x1b[2m# Override the derived style once\x1b[0m"
)]
pub(crate) struct Cli {
    /// Command in canonical form, for example: `show:json`, `compile:grass`
    command: Option<String>,
    /// Optional selector (supports `sassconf compile grass` style)
    selector: Option<String>,
    /// Path to the theme descriptor.
    #[arg(long, default_value = sassconf_core::constants::CONFIG_FILE)]
    config: String,
    /// Theme root the descriptor's directories are relative to.
    /// Defaults to the directory holding the descriptor.
    #[arg(long)]
    root: Option<PathBuf>,
    /// Output style for this compile only (expanded, nested, compact, compressed).
    #[arg(long)]
    output_style: Option<OutputStyle>,
    /// Overwrite the descriptor on `init` if it already exists.
    #[arg(long, default_value_t = false)]
    force: bool,
    /// Print the `init` descriptor to stdout instead of writing it.
    #[arg(long, default_value_t = false)]
    stdout: bool,
}

impl Cli {
    fn theme_root(&self) -> PathBuf {
        if let Some(root) = &self.root {
            return root.clone();
        }
        match Path::new(&self.config).parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    debug!("parsed cli arguments: {:?}", cli);

    let command_name = match &cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            return Ok(());
        }
    };

    let command_text = match &cli.selector {
        Some(selector) => format!("{}:{}", command_name, selector),
        None => command_name.clone(),
    };

    let command = CommandRef::from_str(&command_text)
        .map_err(|e| anyhow!("failed to parse command '{}': {e}", command_text))?
        .with_default_selector();

    execute(&cli, &command)
}

/// Loads the descriptor, falling back to the built-in defaults when it is absent.
fn load_settings(cli: &Cli) -> Result<BuildSettings> {
    let path = Path::new(&cli.config);
    if !path.exists() {
        info!("no descriptor at '{}', using defaults", cli.config);
        return Ok(BuildSettings::load());
    }
    BuildSettings::load_from_file(path)
        .with_context(|| format!("unable to load config '{}'", cli.config))
}

fn execute(cli: &Cli, command: &CommandRef) -> Result<()> {
    let selector = command.selector.as_deref().unwrap_or_default();
    let root = cli.theme_root();

    match command.primary {
        PrimaryCommand::Init => init::run(cli, selector),
        PrimaryCommand::Show => {
            let settings = load_settings(cli)?;
            println!("{}", render_settings(&settings, selector)?);
            Ok(())
        }
        PrimaryCommand::Check => check::run(&load_settings(cli)?, &root, selector),
        PrimaryCommand::Compile => {
            executor::run(&load_settings(cli)?, &root, selector, cli.output_style)
        }
    }
}

fn render_settings(settings: &BuildSettings, format: &str) -> Result<String> {
    match format {
        "toml" => settings.to_toml_string(),
        "json" => serde_json::to_string_pretty(settings).context("failed to render JSON"),
        other => bail!("unknown show format '{other}' (supported: toml,json)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_cli(config: &str) -> Cli {
        Cli {
            command: Some("show".to_string()),
            selector: None,
            config: config.to_string(),
            root: None,
            output_style: None,
            force: false,
            stdout: false,
        }
    }

    #[test]
    fn missing_descriptor_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("sassconf.toml");
        let cli = test_cli(config.to_str().unwrap());
        assert_eq!(load_settings(&cli).unwrap(), BuildSettings::load());
    }

    #[test]
    fn theme_root_defaults_to_descriptor_dir() {
        assert_eq!(test_cli("sassconf.toml").theme_root(), PathBuf::from("."));
        assert_eq!(
            test_cli("themes/omega/sassconf.toml").theme_root(),
            PathBuf::from("themes/omega")
        );

        let mut cli = test_cli("themes/omega/sassconf.toml");
        cli.root = Some(PathBuf::from("/srv/theme"));
        assert_eq!(cli.theme_root(), PathBuf::from("/srv/theme"));
    }

    #[test]
    fn json_rendering_includes_derived_fields() {
        let settings = BuildSettings::from_toml_str("environment = \"production\"").unwrap();
        let json = render_settings(&settings, "json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["output_style"], "compressed");
        assert_eq!(value["sass_options"], serde_json::json!({}));
        assert_eq!(value["import_paths"], serde_json::json!(["sass"]));
    }

    #[test]
    fn rejects_unknown_show_format() {
        assert!(render_settings(&BuildSettings::load(), "yaml").is_err());
    }

    #[test]
    fn init_then_show_round_trips() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("sassconf.toml");
        let mut cli = test_cli(config.to_str().unwrap());

        let init = CommandRef::from_str("init:production")
            .unwrap()
            .with_default_selector();
        execute(&cli, &init).expect("init should write the descriptor");

        let settings = load_settings(&cli).unwrap();
        assert_eq!(settings.output_style(), OutputStyle::Compressed);

        cli.command = Some("show".to_string());
        let show = CommandRef::from_str("show").unwrap().with_default_selector();
        execute(&cli, &show).expect("show should render");
    }

    #[test]
    fn cli_parses_output_style_override() {
        let cli = Cli::try_parse_from(["sassconf", "compile", "grass", "--output-style", "nested"])
            .expect("arguments should parse");
        assert_eq!(cli.output_style, Some(OutputStyle::Nested));
        assert_eq!(cli.selector.as_deref(), Some("grass"));

        assert!(
            Cli::try_parse_from(["sassconf", "compile", "--output-style", "pretty"]).is_err()
        );
    }
}
