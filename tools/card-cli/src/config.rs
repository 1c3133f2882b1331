//! CLI configuration.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use card_carousel::{NavControls, VirtualContainer};
use card_core::{CardSet, ContainerName};
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Card containers on the page, in document order.
    #[serde(default)]
    pub containers: Vec<ContainerConfig>,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Check container names and card files.
    ///
    /// Card files are resolved relative to `base`.
    pub fn validate(&self, base: &Path) -> Result<()> {
        let mut names = HashSet::new();
        for container in &self.containers {
            if container.name.as_str().trim().is_empty() {
                bail!("Container with an empty name");
            }
            if !names.insert(container.name.as_str()) {
                bail!("Duplicate container name: {}", container.name);
            }
            container.card_count(base)?;
        }
        Ok(())
    }

    /// Look up a container by name.
    pub fn container(&self, name: &str) -> Option<&ContainerConfig> {
        self.containers.iter().find(|c| c.name.as_str() == name)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format (for development).
    #[default]
    Human,
    /// JSON format (for log aggregation).
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// One card container on the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Container name, used to address events.
    pub name: ContainerName,

    /// Number of cards in the track. Ignored when `cards_file` is set.
    #[serde(default)]
    pub cards: usize,

    /// JSON file holding the card records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards_file: Option<PathBuf>,

    /// Whether the container has a card track.
    #[serde(default = "default_true")]
    pub track: bool,

    /// Whether a "previous" control is present.
    #[serde(default = "default_true")]
    pub prev_button: bool,

    /// Whether a "next" control is present.
    #[serde(default = "default_true")]
    pub next_button: bool,

    /// Raw container attributes (`data-dsi-*`).
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

fn default_true() -> bool {
    true
}

impl ContainerConfig {
    /// Load and validate the card records, if a card file is configured.
    pub fn load_cards(&self, base: &Path) -> Result<Option<CardSet>> {
        let Some(ref file) = self.cards_file else {
            return Ok(None);
        };
        let path = base.join(file);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read card file: {}", path.display()))?;
        let cards = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse card file: {}", path.display()))?;
        let set = CardSet::try_new(cards)
            .with_context(|| format!("Invalid cards in {}", path.display()))?;
        Ok(Some(set))
    }

    /// Number of cards the container holds.
    pub fn card_count(&self, base: &Path) -> Result<usize> {
        Ok(match self.load_cards(base)? {
            Some(set) => set.len(),
            None => self.cards,
        })
    }

    /// Build the in-memory host for this container.
    pub fn to_host(&self, base: &Path) -> Result<VirtualContainer> {
        let host = if self.track {
            match self.load_cards(base)? {
                Some(set) => VirtualContainer::from_cards(&set),
                None => VirtualContainer::new(self.cards),
            }
        } else {
            VirtualContainer::without_track()
        };

        Ok(host
            .with_attributes(self.attributes.clone())
            .with_controls(NavControls {
                prev: self.track && self.prev_button,
                next: self.track && self.next_button,
            }))
    }
}

/// Generate a default cards.toml config file.
pub fn generate_default_config() -> String {
    r#"# Card grid configuration

[logging]
# Overridden by RUST_LOG
level = "warn"
format = "human"

[[containers]]
name = "featured-products"
cards = 10

[containers.attributes]
data-dsi-slider = "true"
data-dsi-items = "3"
data-dsi-interval = "5000"

[[containers]]
name = "latest-posts"
cards = 6
prev_button = false
next_button = false

[containers.attributes]
data-dsi-slider = "true"
data-dsi-items = "2"
data-dsi-interval = "4000"

[[containers]]
name = "static-grid"
cards = 4
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_carousel::HostContainer;
    use card_core::ContainerAttributes;

    #[test]
    fn test_default_config_parses() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.containers.len(), 3);
        assert_eq!(config.logging.format, LogFormat::Human);
        assert!(config.validate(Path::new(".")).is_ok());

        let posts = config.container("latest-posts").unwrap();
        assert!(!posts.prev_button);
        assert!(posts.track);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let config: CliConfig = toml::from_str(
            r#"
[[containers]]
name = "a"
[[containers]]
name = "a"
"#,
        )
        .unwrap();
        let err = config.validate(Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("Duplicate container name"));
    }

    #[test]
    fn test_to_host() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        let host = config
            .container("latest-posts")
            .unwrap()
            .to_host(Path::new("."))
            .unwrap();

        assert_eq!(host.card_count(), 6);
        assert_eq!(host.controls(), NavControls::NONE);
        let attrs = ContainerAttributes::read(&host);
        assert!(attrs.slider);
        assert_eq!(attrs.items_per_view, 2);
    }

    #[test]
    fn test_trackless_container() {
        let config: CliConfig = toml::from_str(
            r#"
[[containers]]
name = "broken"
cards = 3
track = false
"#,
        )
        .unwrap();
        let host = config.containers[0].to_host(Path::new(".")).unwrap();
        assert!(!host.has_track());
        assert_eq!(host.controls(), NavControls::NONE);
    }

    #[test]
    fn test_missing_card_file() {
        let config: CliConfig = toml::from_str(
            r#"
[[containers]]
name = "products"
cards_file = "does-not-exist.json"
"#,
        )
        .unwrap();
        let err = config.validate(Path::new("/nonexistent")).unwrap_err();
        assert!(err.to_string().contains("Failed to read card file"));
    }
}
