//! Startup settings
//!
//! Read from the page URL query string on the web (`?variant=classic&level=hard`)
//! and from `key=value` arguments natively. Nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::sim::{Level, Variant};

/// Game settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Classic (fixed board) or leveled
    pub variant: Variant,
    /// Start straight into this level, skipping the selection screen
    pub level: Option<Level>,
    /// Fixed RNG seed (time based when unset)
    pub seed: Option<u64>,
    /// Start with the computer player enabled
    pub autoplay: bool,
}

impl Settings {
    /// Parse a URL query string (leading `?` optional)
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(query.split('&'))
    }

    /// Parse `key=value` items; unknown keys are ignored, bad values keep defaults
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut settings = Self::default();
        for pair in pairs {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, "true"));
            settings.apply(key.trim(), value.trim());
        }
        settings
    }

    /// Parse a JSON settings document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn apply(&mut self, key: &str, value: &str) {
        match key {
            "variant" | "mode" => match Variant::from_name(value) {
                Some(variant) => self.variant = variant,
                None => log::warn!("Unknown variant '{}', keeping {}", value, self.variant.as_str()),
            },
            "level" => match value.parse::<Level>() {
                Ok(level) => self.level = Some(level),
                Err(e) => log::warn!("{}", e),
            },
            "seed" => match value.parse::<u64>() {
                Ok(seed) => self.seed = Some(seed),
                Err(_) => log::warn!("Invalid seed '{}'", value),
            },
            "autoplay" | "idle" => self.autoplay = matches!(value, "1" | "true" | "yes" | "on"),
            _ => log::debug!("Ignoring setting '{}'", key),
        }
    }

    /// Load settings from the page URL (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let settings = Self::from_query(&search);
        log::info!("Settings: {:?}", settings);
        settings
    }

    /// Load settings from command-line arguments
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let settings = Self::from_pairs(args.iter().map(String::as_str));
        log::info!("Settings: {:?}", settings);
        settings
    }
}
