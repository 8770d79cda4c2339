//! Chills configuration at ~/.config/chills/config.toml.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_IMPORT_WINDOW_DAYS, DEFAULT_TIMEZONE, MAX_IMPORT_WINDOW_DAYS};
use crate::error::{ChillsError, ChillsResult};
use crate::matcher::{Matcher, OverlapScope};
use crate::normalize::Normalizer;
use crate::ranking::SortOrder;
use crate::time::ReferenceZone;

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_import_window_days() -> i64 {
    DEFAULT_IMPORT_WINDOW_DAYS
}

/// Settings shared by every command. Any key can be overridden with a
/// `CHILLS_`-prefixed environment variable, e.g. `CHILLS_REFERENCE_TIMEZONE`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChillsConfig {
    /// IANA timezone used for weekdays, times of day and dates.
    #[serde(default = "default_timezone")]
    pub reference_timezone: String,

    #[serde(default)]
    pub overlap_scope: OverlapScope,

    #[serde(default)]
    pub default_sort: SortOrder,

    /// Roster used when `--roster` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster: Option<PathBuf>,

    #[serde(default = "default_import_window_days")]
    pub import_window_days: i64,
}

impl Default for ChillsConfig {
    fn default() -> Self {
        ChillsConfig {
            reference_timezone: default_timezone(),
            overlap_scope: OverlapScope::default(),
            default_sort: SortOrder::default(),
            roster: None,
            import_window_days: default_import_window_days(),
        }
    }
}

impl ChillsConfig {
    pub fn config_path() -> ChillsResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ChillsError::Config("Could not determine config directory".into()))?
            .join("chills");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user config, writing a commented default on first use.
    pub fn load() -> ChillsResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from a specific file (which may be missing) plus the environment.
    pub fn load_from(path: &Path) -> ChillsResult<Self> {
        let config: ChillsConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("CHILLS"))
            .build()
            .map_err(|e| ChillsError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ChillsError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ChillsResult<()> {
        self.zone()?;
        if !(1..=MAX_IMPORT_WINDOW_DAYS).contains(&self.import_window_days) {
            return Err(ChillsError::Config(format!(
                "import_window_days must be between 1 and {MAX_IMPORT_WINDOW_DAYS}, got {}",
                self.import_window_days
            )));
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> ChillsResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ChillsError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ChillsError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, content)
            .map_err(|e| ChillsError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> ChillsResult<()> {
        let contents = format!(
            "\
# chills configuration

# Timezone used to compare class times and dates:
# reference_timezone = \"{}\"

# Which classes count for time overlap (same-course or any-course):
# overlap_scope = \"same-course\"

# Default ordering for matches (common-courses, shared-tutorials or name):
# default_sort = \"common-courses\"

# Roster file used when --roster is not given:
# roster = \"~/chills/roster.json\"

# Days of recurring classes expanded on import:
# import_window_days = {}
",
            DEFAULT_TIMEZONE, DEFAULT_IMPORT_WINDOW_DAYS
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ChillsError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ChillsError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn zone(&self) -> ChillsResult<ReferenceZone> {
        self.reference_timezone.parse()
    }

    pub fn normalizer(&self) -> ChillsResult<Normalizer> {
        Ok(Normalizer::new(self.zone()?))
    }

    pub fn matcher(&self) -> Matcher {
        Matcher::new(self.overlap_scope)
    }

    /// Configured roster path with `~` expanded.
    pub fn roster_path(&self) -> Option<PathBuf> {
        self.roster.as_ref().map(|p| {
            PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).into_owned())
        })
    }
}
