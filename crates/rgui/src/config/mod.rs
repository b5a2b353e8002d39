//! Configuration system
//!
//! A [`Config`] can be loaded from and saved to TOML or RON files, picked by
//! file extension. [`RguiConfig`] carries every knob the window context and
//! the markup parser read.

pub use serde::{Serialize, Deserialize};
use std::path::PathBuf;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// How the hit-test pass reports a jump between two unrelated elements
///
/// Moving into a descendant or back out to an ancestor always fires a single
/// enter or leave; this only decides the case where neither occupant
/// contains the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HoverTransitions {
    /// Fire `MouseEnter` on the new occupant, then `MouseLeave` on the old one
    #[default]
    Direct,
    /// Leave every element up to the common ancestor, then enter down from it
    CommonAncestor,
}

/// Runtime configuration for a UI window and the demo frame loop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RguiConfig {
    /// Markup file describing the element tree
    pub markup_path: PathBuf,
    /// Maximum number of live elements in one tree
    pub max_elements: usize,
    /// Maximum length of a single quoted markup property, in bytes
    pub max_property_len: usize,
    /// Policy for pointer jumps between unrelated elements
    pub hover_transitions: HoverTransitions,
    /// Delay between two frames, in milliseconds
    pub frame_interval_ms: u64,
    /// Upper bound on frames run by the demo loop
    pub max_frames: u32,
    /// Default `env_logger` filter when `RUST_LOG` is unset
    pub log_filter: String,
    /// Where the demo writes its last frame, if anywhere
    pub snapshot_path: Option<PathBuf>,
}

impl Default for RguiConfig {
    fn default() -> Self {
        Self {
            markup_path: PathBuf::from("ui.rgml"),
            max_elements: 4096,
            max_property_len: 255,
            hover_transitions: HoverTransitions::Direct,
            frame_interval_ms: 15,
            max_frames: 600,
            log_filter: "info".to_string(),
            snapshot_path: None,
        }
    }
}

impl Config for RguiConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(file_name: &str) -> String {
        let mut path = std::env::temp_dir();
        path.push(format!("rgui_config_{}_{}", std::process::id(), file_name));
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_toml_round_trip() {
        let path = temp_path("round_trip.toml");
        let config = RguiConfig {
            max_elements: 12,
            hover_transitions: HoverTransitions::CommonAncestor,
            snapshot_path: Some(PathBuf::from("out.png")),
            ..RguiConfig::default()
        };

        config.save_to_file(&path).unwrap();
        let loaded = RguiConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.max_elements, 12);
        assert_eq!(loaded.hover_transitions, HoverTransitions::CommonAncestor);
        assert_eq!(loaded.snapshot_path, Some(PathBuf::from("out.png")));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let path = temp_path("partial.toml");
        std::fs::write(&path, "markup_path = \"menu.rgml\"\n").unwrap();
        let loaded = RguiConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.markup_path, PathBuf::from("menu.rgml"));
        assert_eq!(loaded.max_property_len, 255);
        assert_eq!(loaded.frame_interval_ms, 15);
    }

    #[test]
    fn test_ron_round_trip() {
        let path = temp_path("round_trip.ron");
        let config = RguiConfig { max_frames: 3, ..RguiConfig::default() };

        config.save_to_file(&path).unwrap();
        let loaded = RguiConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.max_frames, 3);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = RguiConfig::default().save_to_file("config.ini");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
