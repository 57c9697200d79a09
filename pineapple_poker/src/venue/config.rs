//! Venue configuration.
//!
//! Consolidates the environment variable reads for venue-wide settings.

use super::{cards::DECK_SIZE, settlement::Settlement};
use serde::{Deserialize, Serialize};

/// Smallest table that can run a round.
pub const MIN_TABLE_PLAYERS: usize = 2;

/// Largest table where every player still gets two cards.
pub const MAX_TABLE_PLAYERS: usize = DECK_SIZE / 2;

/// Venue-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueConfig {
    /// Lowest `maxPlayers` a table may be created with (inclusive)
    pub min_players: usize,

    /// Highest `maxPlayers` a table may be created with (inclusive)
    pub max_players: usize,

    /// Cards per player in the initial deal
    pub initial_deal: usize,

    /// Number of `newDeal` stages after the initial deal
    pub extra_stages: usize,

    /// How scores become chip deltas
    pub settlement: Settlement,

    /// Fixed shuffle seed. Only for tests and simulations.
    pub shuffle_seed: Option<u64>,
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 4,
            initial_deal: 5,
            extra_stages: 4,
            settlement: Settlement::default(),
            shuffle_seed: None,
        }
    }
}

impl VenueConfig {
    /// Load configuration from environment variables, falling back to defaults
    ///
    /// * `VENUE_MIN_PLAYERS`, `VENUE_MAX_PLAYERS` - seat capacity bounds
    /// * `VENUE_INITIAL_DEAL` - cards per player in the first stage
    /// * `VENUE_EXTRA_STAGES` - `newDeal` stages per round
    /// * `VENUE_SETTLEMENT` - `pairwise` or `pooled`
    /// * `VENUE_SHUFFLE_SEED` - deterministic shuffle seed
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let settlement = match std::env::var("VENUE_SETTLEMENT") {
            Ok(v) => v.parse().map_err(|reason| ConfigError::Invalid {
                var: "VENUE_SETTLEMENT".to_string(),
                reason,
            })?,
            Err(_) => defaults.settlement,
        };

        let config = Self {
            min_players: parse_env_or("VENUE_MIN_PLAYERS", defaults.min_players),
            max_players: parse_env_or("VENUE_MAX_PLAYERS", defaults.max_players),
            initial_deal: parse_env_or("VENUE_INITIAL_DEAL", defaults.initial_deal),
            extra_stages: parse_env_or("VENUE_EXTRA_STAGES", defaults.extra_stages),
            settlement,
            shuffle_seed: std::env::var("VENUE_SHUFFLE_SEED")
                .ok()
                .and_then(|v| v.parse().ok()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_players < MIN_TABLE_PLAYERS {
            return Err(ConfigError::Invalid {
                var: "VENUE_MIN_PLAYERS".to_string(),
                reason: format!("Must be at least {MIN_TABLE_PLAYERS}"),
            });
        }

        if self.max_players < self.min_players {
            return Err(ConfigError::Invalid {
                var: "VENUE_MAX_PLAYERS".to_string(),
                reason: format!("Must be at least min players ({})", self.min_players),
            });
        }

        if self.max_players > MAX_TABLE_PLAYERS {
            return Err(ConfigError::Invalid {
                var: "VENUE_MAX_PLAYERS".to_string(),
                reason: format!("Must be at most {MAX_TABLE_PLAYERS} (two cards per player)"),
            });
        }

        if self.initial_deal == 0 {
            return Err(ConfigError::Invalid {
                var: "VENUE_INITIAL_DEAL".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Whether a table may be created with this seat capacity.
    pub fn allows_players(&self, max_players: usize) -> bool {
        (self.min_players..=self.max_players).contains(&max_players)
    }
}

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
pub fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
