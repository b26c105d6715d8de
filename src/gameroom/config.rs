use super::timer::TimerConfig;
use crate::Position;
use crate::TOKENS;
use serde::Deserialize;
use std::time::Duration;

/// Largest card universe the dealer will allocate mappings for.
const MAX_DECK: usize = 1 << 20;

/// Errors that make a configuration unplayable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NoSlots,
    TooFewSlots(usize),
    NoFeatures,
    DeckTooLarge(usize),
    NoPlayers,
    WarningExceedsTimeout,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSlots => write!(f, "board needs at least one row and one column"),
            Self::TooFewSlots(n) => write!(f, "board of {} slots cannot hold a triple", n),
            Self::NoFeatures => write!(f, "cards need at least one feature with one value"),
            Self::DeckTooLarge(n) => write!(f, "deck of {} cards is too large", n),
            Self::NoPlayers => write!(f, "game needs at least one player"),
            Self::WarningExceedsTimeout => write!(f, "warning window exceeds round timeout"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Game parameters. Every field has a default, so a config file
/// only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rows: usize,
    pub columns: usize,
    pub feature_size: usize,
    pub feature_count: usize,
    pub turn_timeout_ms: u64,
    pub warning_ms: u64,
    pub point_freeze_ms: u64,
    pub penalty_freeze_ms: u64,
    /// Pause after each card placed or removed.
    pub table_delay_ms: u64,
    pub humans: usize,
    pub robots: usize,
    pub names: Vec<String>,
    /// Log every legal triple after each deal.
    pub hints: bool,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: 3,
            columns: 4,
            feature_size: 3,
            feature_count: 4,
            turn_timeout_ms: 60_000,
            warning_ms: 5_000,
            point_freeze_ms: 1_000,
            penalty_freeze_ms: 3_000,
            table_delay_ms: 100,
            humans: 2,
            robots: 0,
            names: Vec::new(),
            hints: false,
            seed: None,
        }
    }
}

impl Config {
    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        use anyhow::Context;
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config = serde_json::from_str::<Self>(&text)
            .with_context(|| format!("parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slots() == 0 {
            return Err(ConfigError::NoSlots);
        }
        if self.slots() < TOKENS {
            return Err(ConfigError::TooFewSlots(self.slots()));
        }
        if self.feature_size == 0 || self.feature_count == 0 {
            return Err(ConfigError::NoFeatures);
        }
        match self.try_deck_size() {
            Some(n) if n <= MAX_DECK => {}
            Some(n) => return Err(ConfigError::DeckTooLarge(n)),
            None => return Err(ConfigError::DeckTooLarge(usize::MAX)),
        }
        if self.players() == 0 {
            return Err(ConfigError::NoPlayers);
        }
        if self.warning_ms > self.turn_timeout_ms {
            return Err(ConfigError::WarningExceedsTimeout);
        }
        Ok(())
    }

    pub fn slots(&self) -> usize {
        self.rows * self.columns
    }
    /// `feature_size ^ feature_count`; saturates on overflow.
    pub fn deck_size(&self) -> usize {
        self.try_deck_size().unwrap_or(usize::MAX)
    }
    pub fn players(&self) -> usize {
        self.humans + self.robots
    }
    /// Humans take the first seats, robots the rest.
    pub fn is_human(&self, player: Position) -> bool {
        player < self.humans
    }
    pub fn name(&self, player: Position) -> String {
        self.names
            .get(player)
            .cloned()
            .unwrap_or_else(|| format!("Player {}", player))
    }

    pub fn timer(&self) -> TimerConfig {
        TimerConfig {
            round: Duration::from_millis(self.turn_timeout_ms),
            warning: Duration::from_millis(self.warning_ms),
        }
    }
    pub fn point_freeze(&self) -> Duration {
        Duration::from_millis(self.point_freeze_ms)
    }
    pub fn penalty_freeze(&self) -> Duration {
        Duration::from_millis(self.penalty_freeze_ms)
    }
    pub fn table_delay(&self) -> Duration {
        Duration::from_millis(self.table_delay_ms)
    }

    fn try_deck_size(&self) -> Option<usize> {
        u32::try_from(self.feature_count)
            .ok()
            .and_then(|count| self.feature_size.checked_pow(count))
    }
}
