use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Build environment selecting how verbose or compressed the output is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[serde(alias = "dev")]
    Development,
    #[serde(alias = "prod")]
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    /// The output style a build in this environment produces.
    pub fn output_style(self) -> OutputStyle {
        match self {
            Self::Development => OutputStyle::Expanded,
            Self::Production => OutputStyle::Compressed,
        }
    }
}

/// Formatting mode of the generated CSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    Expanded,
    Nested,
    Compact,
    Compressed,
}

impl OutputStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expanded => "expanded",
            Self::Nested => "nested",
            Self::Compact => "compact",
            Self::Compressed => "compressed",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StyleParseError {
    #[error("unknown environment '{0}' (expected development or production)")]
    UnknownEnvironment(String),
    #[error("unknown output style '{0}' (expected expanded, nested, compact or compressed)")]
    UnknownOutputStyle(String),
}

impl FromStr for Environment {
    type Err = StyleParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(StyleParseError::UnknownEnvironment(other.to_string())),
        }
    }
}

impl FromStr for OutputStyle {
    type Err = StyleParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "expanded" => Ok(Self::Expanded),
            "nested" => Ok(Self::Nested),
            "compact" => Ok(Self::Compact),
            "compressed" => Ok(Self::Compressed),
            other => Err(StyleParseError::UnknownOutputStyle(other.to_string())),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for OutputStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
