// Settings for the demo binary.
//
// Defaults first, then an optional JSON file named by `STARFIELD_CONFIG`,
// then single-value env overrides (`STARFIELD_SEED`, `STARFIELD_NEBULAE`,
// `STARFIELD_STARS`). Counts left unset are drawn from the seed.

use serde::Deserialize;

use crate::error::Error;

pub const CONFIG_PATH_VAR: &str = "STARFIELD_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed string; `None` picks a fresh one per run.
    pub seed: Option<String>,
    pub nebulae_count: Option<u32>,
    pub star_count: Option<u32>,
    pub window: WindowConfig,
    pub show_hud: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: usize,
    pub height: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { seed: None, nebulae_count: None, star_count: None, window: WindowConfig::default(), show_hud: true }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { title: "Starfield".to_string(), width: 960, height: 540 }
    }
}

fn parse_count(var: &str, value: &str) -> Result<u32, Error> {
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("{var}={value:?}: {e}")))
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Apply env-style overrides through `lookup` so tests don't touch the
    /// process environment.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), Error> {
        if let Some(seed) = lookup("STARFIELD_SEED") {
            self.seed = Some(seed);
        }
        if let Some(v) = lookup("STARFIELD_NEBULAE") {
            self.nebulae_count = Some(parse_count("STARFIELD_NEBULAE", &v)?);
        }
        if let Some(v) = lookup("STARFIELD_STARS") {
            self.star_count = Some(parse_count("STARFIELD_STARS", &v)?);
        }
        Ok(())
    }

    /// File (if `STARFIELD_CONFIG` is set) plus env overrides.
    pub fn load() -> Result<Self, Error> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| Error::Config(format!("reading {path}: {e}")))?;
                log::info!("config loaded from {path}");
                Self::from_json(&text)?
            }
            Err(_) => Self::default(),
        };
        config.apply_overrides(|k| std::env::var(k).ok())?;
        Ok(config)
    }
}
