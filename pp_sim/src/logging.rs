//! Structured logging configuration.
//!
//! Venue library records arrive through the `log` facade and are routed into
//! the same subscriber.

use pineapple_poker::{
    account::{Amount, TOKEN_DECIMALS, format_units},
    venue::{RoundIndex, TableId},
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var and default to
/// `info`.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a settled round with structured data
///
/// # Arguments
///
/// * `table_id` - Table the round was played at
/// * `round` - Index of the closed round
/// * `seated` - Players that took part
/// * `escrowed` - Tokens held for the table after settlement
pub fn log_round_summary(table_id: TableId, round: RoundIndex, seated: usize, escrowed: Amount) {
    tracing::info!(
        table_id = table_id,
        round = round,
        seated = seated,
        escrowed = %format_units(escrowed, TOKEN_DECIMALS),
        "Round settled"
    );
}

/// Log a player leaving the simulation
pub fn log_cash_out(table_id: TableId, player: &str, amount: Amount, forced: bool) {
    if forced {
        tracing::warn!(
            table_id = table_id,
            player = player,
            amount = %format_units(amount, TOKEN_DECIMALS),
            "Player removed: cannot cover the buy-in"
        );
    } else {
        tracing::debug!(
            table_id = table_id,
            player = player,
            amount = %format_units(amount, TOKEN_DECIMALS),
            "Player cashed out"
        );
    }
}
