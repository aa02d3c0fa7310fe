use std::fmt::{Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimaryCommand {
    Init,
    Show,
    Check,
    Compile,
}

impl PrimaryCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Show => "show",
            Self::Check => "check",
            Self::Compile => "compile",
        }
    }

    /// Selector used when the command is given without one.
    pub fn default_selector(self) -> &'static str {
        match self {
            Self::Init => "default",
            Self::Show => "toml",
            Self::Check => "paths",
            Self::Compile => "compass",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandRef {
    pub primary: PrimaryCommand,
    pub selector: Option<String>,
}

impl CommandRef {
    pub fn canonical(&self) -> String {
        match &self.selector {
            Some(selector) => format!("{}:{}", self.primary.as_str(), selector),
            None => self.primary.as_str().to_string(),
        }
    }

    pub fn with_default_selector(&self) -> CommandRef {
        if self.selector.is_some() {
            return self.clone();
        }

        CommandRef {
            primary: self.primary,
            selector: Some(self.primary.default_selector().to_string()),
        }
    }
}

impl Display for CommandRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

#[derive(Debug, Error)]
pub enum CommandParseError {
    #[error("unknown primary command '{0}'")]
    UnknownPrimary(String),
}

impl FromStr for CommandRef {
    type Err = CommandParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.splitn(2, ':');
        let primary_text = parts.next().unwrap_or_default();
        let selector = parts.next().map(ToOwned::to_owned);

        let primary = match primary_text {
            "init" => PrimaryCommand::Init,
            "show" => PrimaryCommand::Show,
            "check" => PrimaryCommand::Check,
            "compile" => PrimaryCommand::Compile,
            _ => return Err(CommandParseError::UnknownPrimary(primary_text.to_string())),
        };

        Ok(Self { primary, selector })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_primary_only_command() {
        let cmd = CommandRef::from_str("show").expect("show should parse");
        assert_eq!(cmd.primary, PrimaryCommand::Show);
        assert_eq!(cmd.selector, None);
    }

    #[test]
    fn parses_selector_command() {
        let cmd = CommandRef::from_str("compile:grass").expect("compile:grass should parse");
        assert_eq!(cmd.primary, PrimaryCommand::Compile);
        assert_eq!(cmd.selector.as_deref(), Some("grass"));
    }

    #[test]
    fn rejects_unknown_primary() {
        let err = CommandRef::from_str("watch:css").expect_err("must fail");
        assert!(matches!(err, CommandParseError::UnknownPrimary(_)));
    }

    #[test]
    fn default_selector_is_applied() {
        let cmd = CommandRef::from_str("compile").unwrap().with_default_selector();
        assert_eq!(cmd.canonical(), "compile:compass");
    }

    #[test]
    fn explicit_selector_is_preserved() {
        let cmd = CommandRef::from_str("show:json").unwrap().with_default_selector();
        assert_eq!(cmd.canonical(), "show:json");
    }
}
