use log::{warn, Level};
use serde::Deserialize;

use crate::dom::{DomNode, Page};

pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Verbose console output when running locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Tunables for the interaction layer.
///
/// Every field has a default, so pages only need to embed the values they
/// want to change in `<script type="application/json" id="site-config">`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub theme_storage_key: String,
    pub back_to_top_threshold: f64,
    pub counter_duration_ms: f64,
    pub counter_visibility_threshold: f64,
    pub story_settle_ms: u32,
    pub show_message_label: String,
    pub hide_message_label: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            theme_storage_key: "nayee-umang-theme".to_string(),
            back_to_top_threshold: 320.0,
            counter_duration_ms: 1500.0,
            counter_visibility_threshold: 0.5,
            story_settle_ms: 120,
            show_message_label: "Hear Noreen's Message".to_string(),
            hide_message_label: "Hide Message".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Reads the embedded overrides, falling back to defaults when the block is
    /// missing or unreadable.
    pub fn load<P: Page>(page: &P) -> Self {
        let Some(raw) = page.by_id(CONFIG_ELEMENT_ID).and_then(|node| node.text()) else {
            return Self::default();
        };
        if raw.trim().is_empty() {
            return Self::default();
        }
        match Self::from_json(&raw) {
            Ok(config) => config,
            Err(err) => {
                warn!("Ignoring malformed #{}: {}", CONFIG_ELEMENT_ID, err);
                Self::default()
            }
        }
    }
}
