//! Simulation driver: opens tables, seats funded players, and plays rounds
//! until every table has run its quota, then cashes everybody out.

use crate::{config::SimConfig, logging, scorer::RandomScorer};
use anyhow::{Context, ensure};
use pineapple_poker::{
    account::{Address, Amount},
    token::{StandardToken, TokenService},
    venue::{TableId, TableState, TableSummary, Venue, VenueError},
};

const TOKEN_ADDRESS: &str = "ppt";

/// Totals reported after a run
#[derive(Debug, Clone, Default)]
pub struct SimReport {
    pub rounds_played: usize,
    pub top_ups: usize,
    pub removals: usize,
    /// Tables that stopped early because too few players could cover the stake
    pub stalled_tables: Vec<TableId>,
    pub tables: Vec<TableSummary>,
}

#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    venue: Venue,
    token: Address,
    /// Seated players per table
    players: Vec<Vec<Address>>,
    scorer: RandomScorer,
}

impl Simulation {
    /// Deploy the token, open the tables, and buy every player in.
    ///
    /// # Errors
    ///
    /// Returns error if the venue rejects the configuration or a buy-in
    pub fn new(config: SimConfig) -> anyhow::Result<Self> {
        let owner = Address::new("operator");
        let venue_address = Address::new("venue");
        let token = Address::new(TOKEN_ADDRESS);

        let players: Vec<Vec<Address>> = (0..config.tables)
            .map(|t| {
                (0..config.players)
                    .map(|p| Address::new(&format!("t{t}-p{p}")))
                    .collect()
            })
            .collect();

        let player_count = (config.tables * config.players) as Amount;
        let supply = config
            .wallet
            .checked_mul(player_count)
            .context("Token supply overflows")?;
        let mut ppt = StandardToken::new(token.clone(), "Pineapple Poker Token", "PPT", &owner, supply);
        for player in players.iter().flatten() {
            ppt.transfer(&owner, player, config.wallet)?;
            ppt.approve(player, &venue_address, Amount::MAX)?;
        }

        let mut venue = Venue::initialize(config.venue.clone(), venue_address, owner.clone())?;
        venue.register_token(Box::new(ppt))?;

        for seated in &players {
            let table = venue.create_table(
                &owner,
                config.buy_in,
                config.points_cost,
                config.max_players,
                &token,
            )?;
            for player in seated {
                venue
                    .buy_in(player, table, config.buy_in)
                    .with_context(|| format!("{player} could not buy in at table {table}"))?;
            }
        }

        tracing::info!(
            tables = config.tables,
            players = config.players,
            settlement = %config.venue.settlement,
            "Simulation ready"
        );

        Ok(Self {
            scorer: RandomScorer::new(config.venue.shuffle_seed),
            config,
            venue,
            token,
            players,
        })
    }

    pub fn venue(&self) -> &Venue {
        &self.venue
    }

    /// Play every table's rounds, then cash out all players.
    pub fn run(&mut self) -> anyhow::Result<SimReport> {
        let mut report = SimReport::default();

        for table in 0..self.config.tables {
            for _ in 0..self.config.rounds {
                if !self.replenish(table, &mut report)? {
                    tracing::warn!(table_id = table, "Too few funded players, table stalled");
                    report.stalled_tables.push(table);
                    break;
                }
                self.play_round(table)?;
                report.rounds_played += 1;
                self.ensure_conserved()?;
            }
        }

        for table in 0..self.config.tables {
            self.cash_out(table)?;
            report.tables.push(self.venue.summary(table)?);
        }
        self.ensure_conserved()?;

        let escrowed = self.wallet(self.venue.address());
        ensure!(escrowed == 0, "venue still holds {escrowed} after cash-out");

        Ok(report)
    }

    fn play_round(&mut self, table: TableId) -> anyhow::Result<()> {
        let owner = self.venue.owner().clone();
        self.venue.deal_cards(&owner, table)?;
        loop {
            match self.venue.new_deal(&owner, table) {
                Ok(_) => {}
                Err(VenueError::DeckExhausted) => break,
                Err(e) => return Err(e.into()),
            }
        }

        let seated = self.venue.seats(table)?.to_vec();
        let points_cost = self.venue.table(table)?.points_cost;
        let smallest = seated
            .iter()
            .map(|p| self.venue.chips(p, table))
            .min()
            .unwrap_or(0);
        let max_points = match points_cost {
            0 => self.config.max_points,
            cost => u64::try_from(smallest / cost)
                .unwrap_or(u64::MAX)
                .min(self.config.max_points),
        };

        let (points, won) = self
            .scorer
            .score(self.config.venue.settlement, seated.len(), max_points);
        let round = self.venue.end_round(&owner, table, &points, &won)?;

        let events = self.venue.drain_events();
        tracing::debug!(table_id = table, events = events.len(), "Events drained");
        logging::log_round_summary(table, round, seated.len(), self.venue.table(table)?.escrowed);
        Ok(())
    }

    /// Top up seated players below the buy-in, removing those who cannot pay.
    /// Returns whether enough players remain to deal.
    fn replenish(&mut self, table: TableId, report: &mut SimReport) -> anyhow::Result<bool> {
        let buy_in = self.venue.table(table)?.buy_in_amount;
        let owner = self.venue.owner().clone();

        for player in self.players[table].clone() {
            if !self.venue.seats(table)?.contains(&player) {
                continue;
            }
            let balance = self.venue.chips(&player, table);
            if balance >= buy_in {
                continue;
            }

            let shortfall = buy_in - balance;
            if self.wallet(&player) >= shortfall {
                self.venue.add_chips(&player, table, shortfall)?;
                report.top_ups += 1;
            } else if balance > 0 {
                let paid = self.venue.exit_table(&owner, table, &player)?;
                logging::log_cash_out(table, player.as_str(), paid, true);
                report.removals += 1;
            }
        }

        let seated = self.venue.seats(table)?;
        Ok(seated.len() >= 2
            && seated
                .iter()
                .all(|p| self.venue.chips(p, table) >= buy_in))
    }

    fn cash_out(&mut self, table: TableId) -> anyhow::Result<()> {
        for player in self.venue.seats(table)?.to_vec() {
            match self.venue.exit_table(&player, table, &player) {
                Ok(paid) => logging::log_cash_out(table, player.as_str(), paid, false),
                // Busted players hold nothing to pay out.
                Err(VenueError::InvalidExit(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }

        if self.venue.seats(table)?.is_empty() {
            ensure!(
                self.venue.table(table)?.state == TableState::Empty,
                "table {table} not reset after last exit"
            );
        }
        Ok(())
    }

    fn wallet(&self, holder: &Address) -> Amount {
        self.venue
            .token(&self.token)
            .map(|t| t.balance_of(holder))
            .unwrap_or(0)
    }

    /// Escrow, ledger, and custody must agree.
    fn ensure_conserved(&self) -> anyhow::Result<()> {
        let mut escrowed: Amount = 0;
        for table in 0..self.venue.total_tables() {
            let t = self.venue.table(table)?;
            let ledger = self.venue.chips_total(table);
            ensure!(
                t.escrowed == ledger,
                "table {table}: escrow {} differs from ledger {ledger}",
                t.escrowed
            );
            escrowed += t.escrowed;
        }

        let custody = self.wallet(self.venue.address());
        ensure!(
            custody == escrowed,
            "venue holds {custody} but tables escrow {escrowed}"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pineapple_poker::{
        account::{TOKEN_DECIMALS, parse_units},
        venue::{Pooled, Settlement, VenueConfig},
    };

    fn test_config(settlement: Settlement) -> SimConfig {
        SimConfig {
            venue: VenueConfig {
                settlement,
                shuffle_seed: Some(17),
                ..Default::default()
            },
            tables: 2,
            max_players: 3,
            players: 3,
            rounds: 6,
            buy_in: parse_units("10", TOKEN_DECIMALS).unwrap(),
            points_cost: parse_units("0.1", TOKEN_DECIMALS).unwrap(),
            wallet: parse_units("15", TOKEN_DECIMALS).unwrap(),
            max_points: 40,
        }
    }

    fn total_wallets(sim: &Simulation) -> Amount {
        sim.players.iter().flatten().map(|p| sim.wallet(p)).sum()
    }

    #[test]
    fn test_pairwise_simulation_conserves_tokens() {
        let config = test_config(Settlement::default());
        let total = config.wallet * 6;
        let mut sim = Simulation::new(config).unwrap();

        let report = sim.run().unwrap();
        assert!(report.rounds_played > 0);
        assert_eq!(report.tables.len(), 2);
        assert_eq!(total_wallets(&sim), total);
        for summary in &report.tables {
            assert_eq!(summary.escrowed, 0);
            assert_eq!(summary.chips_total, 0);
        }
    }

    #[test]
    fn test_pooled_simulation_conserves_tokens() {
        let config = test_config(Settlement::Pooled(Pooled));
        let total = config.wallet * 6;
        let mut sim = Simulation::new(config).unwrap();

        sim.run().unwrap();
        assert_eq!(total_wallets(&sim), total);
        assert_eq!(sim.wallet(sim.venue().address()), 0);
    }

    #[test]
    fn test_rounds_advance_per_table() {
        let config = SimConfig {
            wallet: parse_units("1000", TOKEN_DECIMALS).unwrap(),
            ..test_config(Settlement::default())
        };
        let mut sim = Simulation::new(config).unwrap();

        let report = sim.run().unwrap();
        assert_eq!(report.rounds_played, 12);
        assert!(report.stalled_tables.is_empty());
        for summary in &report.tables {
            assert_eq!(summary.current_round, 6);
            assert_eq!(summary.state, TableState::Empty);
        }
    }
}
