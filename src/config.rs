//! Runtime configuration, optionally supplied from JS as a JSON string.

use serde::Deserialize;

use crate::error::StudioError;
use crate::logging::LogLevel;

/// Where and how the panel is injected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Marker id of the panel root; doubles as the existence check.
    pub panel_id: String,
    pub video_selector: String,
    /// Insertion anchors, highest priority first.
    pub anchor_selectors: Vec<String>,
    /// Pause before injecting so the host page can finish its own layout.
    pub settle_delay_ms: u32,
    pub log_level: LogLevel,
    pub start_collapsed: bool,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            panel_id: "yt-color-studio-container".to_string(),
            video_selector: "video".to_string(),
            anchor_selectors: vec![
                "ytd-watch-metadata".to_string(),
                "#secondary".to_string(),
                "#columns".to_string(),
            ],
            settle_delay_ms: 1000,
            log_level: LogLevel::Warn,
            start_collapsed: false,
        }
    }
}

impl StudioConfig {
    /// Parse and validate. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, StudioError> {
        let config: StudioConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), StudioError> {
        if self.panel_id.trim().is_empty() {
            return Err(StudioError::InvalidConfig("panel_id must not be empty"));
        }
        if self.video_selector.trim().is_empty() {
            return Err(StudioError::InvalidConfig("video_selector must not be empty"));
        }
        if self.anchor_selectors.iter().all(|s| s.trim().is_empty()) {
            return Err(StudioError::InvalidConfig(
                "anchor_selectors needs at least one selector",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        assert_eq!(StudioConfig::from_json("{}").unwrap(), StudioConfig::default());
    }

    #[test]
    fn partial_override() {
        let config =
            StudioConfig::from_json(r#"{"settle_delay_ms": 250, "log_level": "debug"}"#).unwrap();
        assert_eq!(config.settle_delay_ms, 250);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.panel_id, "yt-color-studio-container");
        assert_eq!(config.anchor_selectors[0], "ytd-watch-metadata");
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            StudioConfig::from_json("not json"),
            Err(StudioError::ConfigJson(_))
        ));
        assert!(matches!(
            StudioConfig::from_json(r#"{"panel_id": " "}"#),
            Err(StudioError::InvalidConfig(_))
        ));
        assert!(matches!(
            StudioConfig::from_json(r#"{"anchor_selectors": []}"#),
            Err(StudioError::InvalidConfig(_))
        ));
    }
}
