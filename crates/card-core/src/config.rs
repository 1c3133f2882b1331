//! Viewport configuration and container attribute parsing.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Attribute marking a container as a slider.
pub const SLIDER_ATTR: &str = "data-dsi-slider";
/// Attribute holding the number of cards per page.
pub const ITEMS_ATTR: &str = "data-dsi-items";
/// Attribute holding the autoplay interval in milliseconds.
pub const INTERVAL_ATTR: &str = "data-dsi-interval";

pub const DEFAULT_ITEMS_PER_VIEW: usize = 3;
pub const DEFAULT_AUTOPLAY_INTERVAL_MS: u64 = 5000;
/// Shortest interval autoplay will run at.
pub const MIN_AUTOPLAY_INTERVAL_MS: u64 = 1000;
/// Largest page size; page steps are signed index arithmetic.
pub const MAX_ITEMS_PER_VIEW: usize = isize::MAX as usize;

/// How many cards a carousel shows and how fast it advances.
///
/// Values are clamped on construction: at least one card per view, and an
/// enabled interval of at least [`MIN_AUTOPLAY_INTERVAL_MS`]. An interval of
/// zero disables autoplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawViewport", into = "RawViewport")]
pub struct ViewportConfig {
    items_per_view: usize,
    autoplay_interval: Option<Duration>,
}

impl ViewportConfig {
    /// Create a clamped viewport configuration.
    pub fn new(items_per_view: usize, autoplay_interval_ms: u64) -> Self {
        let autoplay_interval = (autoplay_interval_ms > 0)
            .then(|| Duration::from_millis(autoplay_interval_ms.max(MIN_AUTOPLAY_INTERVAL_MS)));
        Self {
            items_per_view: items_per_view.clamp(1, MAX_ITEMS_PER_VIEW),
            autoplay_interval,
        }
    }

    /// Same page size, autoplay off.
    pub fn without_autoplay(self) -> Self {
        Self {
            autoplay_interval: None,
            ..self
        }
    }

    pub fn items_per_view(&self) -> usize {
        self.items_per_view
    }

    /// Autoplay interval, `None` when autoplay is disabled.
    pub fn autoplay_interval(&self) -> Option<Duration> {
        self.autoplay_interval
    }

    /// Autoplay interval in milliseconds, `0` when disabled.
    pub fn autoplay_interval_ms(&self) -> u64 {
        self.autoplay_interval
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// Width of one card slot as a percentage of the viewport.
    pub fn slot_width_percent(&self) -> f64 {
        100.0 / self.items_per_view as f64
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_VIEW, DEFAULT_AUTOPLAY_INTERVAL_MS)
    }
}

#[derive(Serialize, Deserialize)]
struct RawViewport {
    #[serde(default = "default_items_per_view")]
    items_per_view: usize,
    #[serde(default = "default_autoplay_interval_ms")]
    autoplay_interval_ms: u64,
}

fn default_items_per_view() -> usize {
    DEFAULT_ITEMS_PER_VIEW
}

fn default_autoplay_interval_ms() -> u64 {
    DEFAULT_AUTOPLAY_INTERVAL_MS
}

impl From<RawViewport> for ViewportConfig {
    fn from(raw: RawViewport) -> Self {
        Self::new(raw.items_per_view, raw.autoplay_interval_ms)
    }
}

impl From<ViewportConfig> for RawViewport {
    fn from(config: ViewportConfig) -> Self {
        Self {
            items_per_view: config.items_per_view,
            autoplay_interval_ms: config.autoplay_interval_ms(),
        }
    }
}

/// Anything that can answer attribute lookups by name.
pub trait AttributeSource {
    fn attribute(&self, name: &str) -> Option<&str>;
}

impl AttributeSource for HashMap<String, String> {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl AttributeSource for BTreeMap<String, String> {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// Slider settings read from a container's attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContainerAttributes {
    /// Whether the container asked to be a slider.
    pub slider: bool,
    /// Cards per page, default 3.
    pub items_per_view: usize,
    /// Autoplay interval in milliseconds, default 5000.
    pub autoplay_interval_ms: u64,
}

impl ContainerAttributes {
    /// Read slider settings, falling back to defaults for anything missing,
    /// non-numeric or non-positive.
    pub fn read(source: &(impl AttributeSource + ?Sized)) -> Self {
        let slider = source
            .attribute(SLIDER_ATTR)
            .is_some_and(|v| v == "true");

        let items_per_view = positive_or(source.attribute(ITEMS_ATTR), DEFAULT_ITEMS_PER_VIEW as i64);
        let autoplay_interval_ms =
            positive_or(source.attribute(INTERVAL_ATTR), DEFAULT_AUTOPLAY_INTERVAL_MS as i64);

        Self {
            slider,
            items_per_view: usize::try_from(items_per_view).unwrap_or(DEFAULT_ITEMS_PER_VIEW),
            autoplay_interval_ms: u64::try_from(autoplay_interval_ms)
                .unwrap_or(DEFAULT_AUTOPLAY_INTERVAL_MS),
        }
    }

    /// Clamped viewport configuration for these attributes.
    pub fn viewport(&self) -> ViewportConfig {
        ViewportConfig::new(self.items_per_view, self.autoplay_interval_ms)
    }
}

fn positive_or(value: Option<&str>, default: i64) -> i64 {
    value
        .and_then(parse_leading_int)
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

/// Parse the integer prefix of `s`, ignoring leading whitespace and any
/// trailing characters. `"12px"` parses as 12, `"px"` does not parse.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let value = rest[..digits_end].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_viewport_clamping() {
        let config = ViewportConfig::new(0, 200);
        assert_eq!(config.items_per_view(), 1);
        assert_eq!(config.autoplay_interval(), Some(Duration::from_millis(1000)));

        let config = ViewportConfig::new(4, 0);
        assert_eq!(config.autoplay_interval(), None);
        assert_eq!(config.autoplay_interval_ms(), 0);

        let config = ViewportConfig::new(4, 2500);
        assert_eq!(config.autoplay_interval_ms(), 2500);
    }

    #[test]
    fn test_viewport_default() {
        let config = ViewportConfig::default();
        assert_eq!(config.items_per_view(), 3);
        assert_eq!(config.autoplay_interval_ms(), 5000);
        assert!(config.without_autoplay().autoplay_interval().is_none());
    }

    #[test]
    fn test_slot_width() {
        assert_eq!(ViewportConfig::new(4, 0).slot_width_percent(), 25.0);
        assert_eq!(ViewportConfig::new(1, 0).slot_width_percent(), 100.0);
    }

    #[test]
    fn test_viewport_deserialize_clamps() {
        let config: ViewportConfig =
            serde_json::from_str(r#"{"items_per_view": 0, "autoplay_interval_ms": 10}"#).unwrap();
        assert_eq!(config, ViewportConfig::new(1, 1000));

        let config: ViewportConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ViewportConfig::default());
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("42"), Some(42));
        assert_eq!(parse_leading_int("  7 cards"), Some(7));
        assert_eq!(parse_leading_int("2.5"), Some(2));
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(parse_leading_int("+8"), Some(8));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int(""), None);
    }

    #[test]
    fn test_attributes_defaults() {
        let parsed = ContainerAttributes::read(&attrs(&[]));
        assert!(!parsed.slider);
        assert_eq!(parsed.items_per_view, 3);
        assert_eq!(parsed.autoplay_interval_ms, 5000);
    }

    #[test]
    fn test_attributes_invalid_values_fall_back() {
        let parsed = ContainerAttributes::read(&attrs(&[
            (SLIDER_ATTR, "true"),
            (ITEMS_ATTR, "zero"),
            (INTERVAL_ATTR, "-100"),
        ]));
        assert!(parsed.slider);
        assert_eq!(parsed.items_per_view, 3);
        assert_eq!(parsed.autoplay_interval_ms, 5000);

        let parsed = ContainerAttributes::read(&attrs(&[(ITEMS_ATTR, "0"), (INTERVAL_ATTR, "0")]));
        assert_eq!(parsed.items_per_view, 3);
        assert_eq!(parsed.autoplay_interval_ms, 5000);
    }

    #[test]
    fn test_attributes_to_viewport() {
        let parsed = ContainerAttributes::read(&attrs(&[
            (SLIDER_ATTR, "true"),
            (ITEMS_ATTR, "4"),
            (INTERVAL_ATTR, "300"),
        ]));
        let viewport = parsed.viewport();
        assert_eq!(viewport.items_per_view(), 4);
        assert_eq!(viewport.autoplay_interval_ms(), 1000);
    }

    #[test]
    fn test_slider_flag_requires_true() {
        let parsed = ContainerAttributes::read(&attrs(&[(SLIDER_ATTR, "yes")]));
        assert!(!parsed.slider);

        for value in ["TRUE", "True", " true", "true "] {
            let parsed = ContainerAttributes::read(&attrs(&[(SLIDER_ATTR, value)]));
            assert!(!parsed.slider, "{value:?} should not mark a slider");
        }
    }

    #[test]
    fn test_viewport_caps_huge_page_size() {
        let config = ViewportConfig::new(usize::MAX, 5000);
        assert_eq!(config.items_per_view(), MAX_ITEMS_PER_VIEW);

        let parsed = ContainerAttributes::read(&attrs(&[
            (SLIDER_ATTR, "true"),
            (ITEMS_ATTR, "99999999999999999999"),
        ]));
        assert!(parsed.viewport().items_per_view() <= MAX_ITEMS_PER_VIEW);
    }
}
