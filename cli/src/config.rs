use anyhow::Context;
use pairmatch_core::Difficulty;
use pairmatch_protocol::Initials;
use pairmatch_runtime::SessionSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_STORE_PATH: &str = "pairmatch.json";

/// Optional settings, as found in the TOML file or collected from flags.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialConfig {
    pub difficulty: Option<String>,
    pub reversal_delay_ms: Option<u64>,
    pub store_path: Option<PathBuf>,
    pub initials: Option<String>,
    pub max_acquire_attempts: Option<u32>,
}

impl PartialConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config at {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config at {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Fields set in `self` win over the ones in `fallback`.
    pub fn or(self, fallback: Self) -> Self {
        Self {
            difficulty: self.difficulty.or(fallback.difficulty),
            reversal_delay_ms: self.reversal_delay_ms.or(fallback.reversal_delay_ms),
            store_path: self.store_path.or(fallback.store_path),
            initials: self.initials.or(fallback.initials),
            max_acquire_attempts: self.max_acquire_attempts.or(fallback.max_acquire_attempts),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub difficulty: Difficulty,
    pub session: SessionSettings,
    /// `None` keeps everything in memory for this run only.
    pub store_path: Option<PathBuf>,
    pub initials: Option<Initials>,
}

impl Config {
    pub fn resolve(partial: PartialConfig, persist: bool) -> anyhow::Result<Self> {
        let difficulty = partial
            .difficulty
            .as_deref()
            .map(Difficulty::from_name_or_default)
            .unwrap_or_default();

        let mut session = SessionSettings::default();
        if let Some(ms) = partial.reversal_delay_ms {
            session.reversal_delay = Duration::from_millis(ms);
        }
        if let Some(attempts) = partial.max_acquire_attempts {
            session.max_acquire_attempts = attempts;
        }

        let store_path = persist.then(|| {
            partial
                .store_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH))
        });

        let initials = partial
            .initials
            .as_deref()
            .map(Initials::new)
            .transpose()
            .context("Invalid initials")?;

        Ok(Self {
            difficulty,
            session,
            store_path,
            initials,
        })
    }
}
