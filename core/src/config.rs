use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::recurrence::DEFAULT_OCCURRENCE_LIMIT;
use crate::urgency::UrgencyLevel;

pub const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_DIR_NAME: &str = ".masthead";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Hard cap for occurrence listings.
    pub occurrence_limit: usize,
    /// Least pressing urgency that still triggers a reminder.
    pub reminder_horizon: UrgencyLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DIR_NAME),
            occurrence_limit: DEFAULT_OCCURRENCE_LIMIT,
            reminder_horizon: UrgencyLevel::Warning,
        }
    }
}

impl Config {
    /// `~/.masthead`, or `data_dir` when given, plus whatever `config.toml` there overrides.
    pub fn load(data_dir: Option<PathBuf>) -> Result<Self> {
        let dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        let mut config = Self::from_dir(&dir)?;
        // the directory that held the file wins over a data_dir written inside it
        config.data_dir = dir;
        Ok(config)
    }

    fn from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.occurrence_limit == 0 {
            return Err(anyhow!("occurrence_limit must be at least 1"));
        }
        Ok(config)
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(DEFAULT_DIR_NAME))
}
