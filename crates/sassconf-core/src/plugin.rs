use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Optional Compass extensions, one switch each.
///
/// Each flag maps to a `require` of the named plugin when the engine starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginToggles {
    /// RGBA fallback PNG generator.
    pub rgbapng: bool,
    /// Susy grid layout system.
    pub susy: bool,
    pub stitch: bool,
    #[serde(alias = "compass-normalize")]
    pub compass_normalize: bool,
}

impl Default for PluginToggles {
    fn default() -> Self {
        Self {
            rgbapng: true,
            susy: true,
            stitch: false,
            compass_normalize: false,
        }
    }
}

impl PluginToggles {
    /// Every plugin with no extensions enabled.
    pub fn none() -> Self {
        Self {
            rgbapng: false,
            susy: false,
            stitch: false,
            compass_normalize: false,
        }
    }

    /// Names of the enabled plugins, as the engine expects them in `require`.
    pub fn enabled(&self) -> BTreeSet<String> {
        [
            ("rgbapng", self.rgbapng),
            ("susy", self.susy),
            ("stitch", self.stitch),
            ("compass-normalize", self.compass_normalize),
        ]
        .into_iter()
        .filter(|(_, on)| *on)
        .map(|(name, _)| name.to_string())
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_rgbapng_and_susy() {
        let enabled = PluginToggles::default().enabled();
        assert_eq!(
            enabled.into_iter().collect::<Vec<_>>(),
            vec!["rgbapng", "susy"]
        );
    }

    #[test]
    fn each_flag_toggles_independently() {
        let toggles = PluginToggles {
            compass_normalize: true,
            ..PluginToggles::none()
        };
        let enabled = toggles.enabled();
        assert_eq!(enabled.len(), 1);
        assert!(enabled.contains("compass-normalize"));
    }

    #[test]
    fn partial_table_keeps_other_defaults() {
        let toggles: PluginToggles = toml::from_str("stitch = true").expect("should parse");
        assert!(toggles.rgbapng);
        assert!(toggles.susy);
        assert!(toggles.stitch);
        assert!(!toggles.compass_normalize);
    }
}
