//! Simulation configuration management.
//!
//! Consolidates the environment variable reads for the simulator and layers
//! command-line overrides on top.

use pineapple_poker::{
    account::{Amount, TOKEN_DECIMALS, format_units, parse_units},
    venue::{
        VenueConfig,
        config::{ConfigError, parse_env_or},
    },
};

/// Complete simulator configuration
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Venue-wide settings
    pub venue: VenueConfig,
    /// Number of tables to open
    pub tables: usize,
    /// Seat capacity of every table
    pub max_players: usize,
    /// Players seated at every table
    pub players: usize,
    /// Rounds to play per table
    pub rounds: usize,
    /// Table buy-in in base units
    pub buy_in: Amount,
    /// Value of one scoring point in base units
    pub points_cost: Amount,
    /// Tokens funded to every player in base units
    pub wallet: Amount,
    /// Highest point total the scorer hands out in a round
    pub max_points: u64,
}

impl SimConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `tables_override` - Optional table count (from CLI args)
    /// * `players_override` - Optional players per table (from CLI args)
    /// * `rounds_override` - Optional rounds per table (from CLI args)
    /// * `seed_override` - Optional shuffle seed (from CLI args)
    ///
    /// # Returns
    ///
    /// * `Result<SimConfig, ConfigError>` - Loaded configuration or error
    ///
    /// # Errors
    ///
    /// Returns error if a token amount is malformed or the venue settings fail
    /// validation
    pub fn from_env(
        tables_override: Option<usize>,
        players_override: Option<usize>,
        rounds_override: Option<usize>,
        seed_override: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let mut venue = VenueConfig::from_env()?;
        if seed_override.is_some() {
            venue.shuffle_seed = seed_override;
        }

        let max_players = parse_env_or("SIM_MAX_PLAYERS", venue.max_players.min(3));
        let players = players_override.unwrap_or_else(|| parse_env_or("SIM_PLAYERS", 2));

        Ok(SimConfig {
            tables: tables_override.unwrap_or_else(|| parse_env_or("SIM_TABLES", 1)),
            max_players,
            players,
            rounds: rounds_override.unwrap_or_else(|| parse_env_or("SIM_ROUNDS", 10)),
            buy_in: token_env_or("SIM_BUY_IN", "10")?,
            points_cost: token_env_or("SIM_POINTS_COST", "0.1")?,
            wallet: token_env_or("SIM_WALLET", "1000")?,
            max_points: parse_env_or("SIM_MAX_POINTS", 20),
            venue,
        })
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.venue.validate()?;

        if self.tables == 0 {
            return Err(ConfigError::Invalid {
                var: "SIM_TABLES".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if !self.venue.allows_players(self.max_players) {
            return Err(ConfigError::Invalid {
                var: "SIM_MAX_PLAYERS".to_string(),
                reason: format!(
                    "Must be between {} and {}",
                    self.venue.min_players, self.venue.max_players
                ),
            });
        }

        if self.players < 2 || self.players > self.max_players {
            return Err(ConfigError::Invalid {
                var: "SIM_PLAYERS".to_string(),
                reason: format!("Must be between 2 and max players ({})", self.max_players),
            });
        }

        if self.buy_in == 0 {
            return Err(ConfigError::Invalid {
                var: "SIM_BUY_IN".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.wallet < self.buy_in {
            return Err(ConfigError::Invalid {
                var: "SIM_WALLET".to_string(),
                reason: format!(
                    "Must cover the buy-in ({})",
                    format_units(self.buy_in, TOKEN_DECIMALS)
                ),
            });
        }

        Ok(())
    }
}

/// Parse a decimal token amount such as `0.1` from the environment.
fn token_env_or(key: &str, default: &str) -> Result<Amount, ConfigError> {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    parse_token(key, &raw)
}

fn parse_token(key: &str, raw: &str) -> Result<Amount, ConfigError> {
    parse_units(raw, TOKEN_DECIMALS).ok_or_else(|| ConfigError::Invalid {
        var: key.to_string(),
        reason: format!("'{raw}' is not a token amount with at most {TOKEN_DECIMALS} decimals"),
    })
}
