use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::Profile;
use crate::counter::CounterConfig;
use crate::typewriter::TypewriterConfig;
use crate::{flog_debug, Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub typewriter: TypewriterConfig,
    #[serde(default = "default_counters")]
    pub counters: Vec<CounterConfig>,
    #[serde(default)]
    pub profile: Profile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            typewriter: TypewriterConfig::default(),
            counters: default_counters(),
            profile: Profile::default(),
        }
    }
}

fn default_counters() -> Vec<CounterConfig> {
    vec![
        CounterConfig::new(90, "Printed-text OCR accuracy"),
        CounterConfig::new(89, "Job-matching accuracy"),
        CounterConfig::new(35, "Placement efficiency gain"),
        CounterConfig::new(8, "Projects shipped").with_suffix("+"),
    ]
}

impl Config {
    pub fn folio_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".folio"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::folio_dir()?.join("folio.toml"))
    }

    /// The explicit `--config` path if given, else `~/.folio/folio.toml`.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(expand_tilde(&path.to_string_lossy())),
            None => Self::config_path(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.typewriter.validate()?;
        for counter in &self.counters {
            counter.validate()?;
        }
        Ok(())
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate. A missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        flog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            flog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config = Self::parse(&fs::read_to_string(path)?)?;
        flog_debug!(
            "Config loaded: words={} type_speed_ms={} pause_ms={} counters={}",
            config.typewriter.words.len(),
            config.typewriter.type_speed_ms,
            config.typewriter.pause_ms,
            config.counters.len()
        );
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                flog_debug!("Creating config directory: {}", dir.display());
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        flog_debug!("Config saved to {}", path.display());
        Ok(())
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
