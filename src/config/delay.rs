use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_FREQUENCY_ONE_FROM: i32 = 1;
pub const DEFAULT_DURATION_FROM_MS: i32 = 100;
pub const DEFAULT_DURATION_TO_MS: i32 = 1000;

/// Network delay simulation settings
///
/// A request is delayed with probability `1 / frequency_one_from`, for a
/// duration drawn from `[duration_from_ms, duration_to_ms)`. Any value that is
/// zero or negative disables the delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelaySettings {
    pub frequency_one_from: i32,
    pub duration_from_ms: i32,
    pub duration_to_ms: i32,
}

impl Default for DelaySettings {
    fn default() -> Self {
        Self {
            frequency_one_from: DEFAULT_FREQUENCY_ONE_FROM,
            duration_from_ms: DEFAULT_DURATION_FROM_MS,
            duration_to_ms: DEFAULT_DURATION_TO_MS,
        }
    }
}

impl DelaySettings {
    /// Settings that never delay a response
    pub fn disabled() -> Self {
        Self {
            frequency_one_from: 0,
            ..Self::default()
        }
    }

    /// Whether these settings can ever produce a delay
    pub fn is_enabled(&self) -> bool {
        self.frequency_one_from > 0 && self.duration_from_ms > 0 && self.duration_to_ms > 0
    }

    /// Parse a settings document such as
    ///
    /// ```xml
    /// <settings>
    ///   <frequency oneFrom="3"/>
    ///   <duration from="100" to="1000"/>
    /// </settings>
    /// ```
    ///
    /// A root without exactly two child elements yields the defaults. An
    /// attribute that is not an integer keeps its own default.
    pub fn from_xml(text: &str) -> Result<Self, ConfigError> {
        let document = roxmltree::Document::parse(text)
            .map_err(|e| ConfigError::LoadError(format!("Malformed delay settings: {}", e)))?;

        let mut settings = Self::default();
        let children = document
            .root_element()
            .children()
            .filter(|node| node.is_element())
            .collect::<Vec<_>>();

        if children.len() != 2 {
            tracing::debug!(
                "Delay settings root has {} child elements, using defaults",
                children.len()
            );
            return Ok(settings);
        }

        for child in children {
            match child.tag_name().name() {
                "frequency" => {
                    read_attribute(&child, "oneFrom", &mut settings.frequency_one_from);
                }
                "duration" => {
                    read_attribute(&child, "from", &mut settings.duration_from_ms);
                    read_attribute(&child, "to", &mut settings.duration_to_ms);
                }
                other => tracing::debug!("Ignoring unknown delay setting '{}'", other),
            }
        }

        Ok(settings)
    }
}

fn read_attribute(node: &roxmltree::Node<'_, '_>, name: &str, target: &mut i32) {
    if let Some(raw) = node.attribute(name) {
        match raw.trim().parse::<i32>() {
            Ok(value) => *target = value,
            Err(_) => tracing::warn!(
                "Invalid value '{}' for {}@{}, keeping {}",
                raw,
                node.tag_name().name(),
                name,
                target
            ),
        }
    }
}

/// Source of delay settings, consulted once per request
#[async_trait]
pub trait DelaySettingsSource: Send + Sync {
    /// Load the current settings, falling back to defaults on any failure
    async fn load(&self) -> DelaySettings;
}

/// Fixed settings that never change between requests
#[async_trait]
impl DelaySettingsSource for DelaySettings {
    async fn load(&self) -> DelaySettings {
        *self
    }
}

/// Delay settings re-read from an XML file on every request
#[derive(Debug, Clone)]
pub struct FileDelaySettings {
    path: PathBuf,
}

impl FileDelaySettings {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DelaySettingsSource for FileDelaySettings {
    async fn load(&self) -> DelaySettings {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(
                    "No delay settings at {}, using defaults",
                    self.path.display()
                );
                return DelaySettings::default();
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read delay settings {}: {}",
                    self.path.display(),
                    e
                );
                return DelaySettings::default();
            }
        };

        DelaySettings::from_xml(&text).unwrap_or_else(|e| {
            tracing::warn!("{}, using defaults", e);
            DelaySettings::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_settings() {
        let settings = DelaySettings::from_xml(
            r#"<settings><frequency oneFrom="3"/><duration from="50" to="250"/></settings>"#,
        )
        .unwrap();

        assert_eq!(
            settings,
            DelaySettings {
                frequency_one_from: 3,
                duration_from_ms: 50,
                duration_to_ms: 250,
            }
        );
        assert!(settings.is_enabled());
    }

    #[test]
    fn test_child_order_and_whitespace_do_not_matter() {
        let settings = DelaySettings::from_xml(
            r#"<?xml version="1.0" encoding="utf-8"?>
            <ListenerSettings>
                <duration from=" 10 " to="20"/>
                <frequency oneFrom="7"/>
            </ListenerSettings>"#,
        )
        .unwrap();

        assert_eq!(settings.frequency_one_from, 7);
        assert_eq!(settings.duration_from_ms, 10);
        assert_eq!(settings.duration_to_ms, 20);
    }

    #[test]
    fn test_wrong_child_count_uses_defaults() {
        let one_child =
            DelaySettings::from_xml(r#"<settings><frequency oneFrom="5"/></settings>"#).unwrap();
        assert_eq!(one_child, DelaySettings::default());

        let three_children = DelaySettings::from_xml(
            r#"<settings>
                <frequency oneFrom="5"/>
                <duration from="1" to="2"/>
                <extra/>
            </settings>"#,
        )
        .unwrap();
        assert_eq!(three_children, DelaySettings::default());
    }

    #[test]
    fn test_comments_are_not_counted_as_children() {
        let settings = DelaySettings::from_xml(
            r#"<settings><!-- one in five --><frequency oneFrom="5"/><duration from="1" to="2"/></settings>"#,
        )
        .unwrap();

        assert_eq!(
            settings,
            DelaySettings {
                frequency_one_from: 5,
                duration_from_ms: 1,
                duration_to_ms: 2,
            }
        );
    }

    #[test]
    fn test_invalid_attribute_keeps_only_that_default() {
        let settings = DelaySettings::from_xml(
            r#"<settings><frequency oneFrom="often"/><duration from="5" to="ten"/></settings>"#,
        )
        .unwrap();

        assert_eq!(settings.frequency_one_from, DEFAULT_FREQUENCY_ONE_FROM);
        assert_eq!(settings.duration_from_ms, 5);
        assert_eq!(settings.duration_to_ms, DEFAULT_DURATION_TO_MS);
    }

    #[test]
    fn test_missing_attributes_keep_defaults() {
        let settings =
            DelaySettings::from_xml(r#"<settings><frequency/><duration to="400"/></settings>"#)
                .unwrap();

        assert_eq!(settings.frequency_one_from, DEFAULT_FREQUENCY_ONE_FROM);
        assert_eq!(settings.duration_from_ms, DEFAULT_DURATION_FROM_MS);
        assert_eq!(settings.duration_to_ms, 400);
    }

    #[test]
    fn test_zero_frequency_disables_delay() {
        let settings = DelaySettings::from_xml(
            r#"<settings><frequency oneFrom="0"/><duration from="100" to="1000"/></settings>"#,
        )
        .unwrap();

        assert!(!settings.is_enabled());
        assert!(!DelaySettings::disabled().is_enabled());
    }

    #[test]
    fn test_malformed_document_is_error() {
        assert!(DelaySettings::from_xml("<settings><frequency").is_err());
    }

    #[tokio::test]
    async fn test_missing_file_uses_defaults() {
        let source = FileDelaySettings::new("/nonexistent/ListenerSettings.xml");
        assert_eq!(source.path(), Path::new("/nonexistent/ListenerSettings.xml"));

        assert_eq!(source.load().await, DelaySettings::default());
    }

    #[tokio::test]
    async fn test_file_is_reread_on_every_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ListenerSettings.xml");
        let source = FileDelaySettings::new(&path);

        std::fs::write(
            &path,
            r#"<settings><frequency oneFrom="2"/><duration from="1" to="2"/></settings>"#,
        )
        .unwrap();
        assert_eq!(source.load().await.frequency_one_from, 2);

        std::fs::write(
            &path,
            r#"<settings><frequency oneFrom="9"/><duration from="1" to="2"/></settings>"#,
        )
        .unwrap();
        assert_eq!(source.load().await.frequency_one_from, 9);
    }

    #[tokio::test]
    async fn test_fixed_settings_source() {
        let settings = DelaySettings::disabled();

        assert_eq!(settings.load().await, settings);
    }
}
