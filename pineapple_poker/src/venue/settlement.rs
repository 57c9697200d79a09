//! Settlement strategies turning an external score into chip deltas.
//!
//! A strategy maps `(points, won, points_cost)` to one signed delta per seat.
//! The venue checks every result for zero-sum and for overdraft before writing
//! anything, so a faulty strategy can only cause a rejected `endRound`.

use super::errors::{VenueError, VenueResult};
use crate::account::{Amount, SignedAmount};
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[enum_dispatch]
pub trait SettlementStrategy {
    fn deltas(
        &self,
        points: &[u64],
        won: &[bool],
        points_cost: Amount,
    ) -> VenueResult<Vec<SignedAmount>>;
}

/// Each player gains or loses `points * points_cost`. Inputs must already
/// balance, e.g. two players with equal points and opposite flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairwise;

/// Losers pay `points * points_cost` into a pot, and winners split it in
/// proportion to their points. Integer remainders go one unit at a time to
/// winners in seat order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pooled;

fn stake(points: u64, points_cost: Amount) -> VenueResult<Amount> {
    Amount::from(points)
        .checked_mul(points_cost)
        .ok_or(VenueError::ArithmeticOverflow)
}

fn signed(amount: Amount) -> VenueResult<SignedAmount> {
    SignedAmount::try_from(amount).map_err(|_| VenueError::ArithmeticOverflow)
}

impl SettlementStrategy for Pairwise {
    fn deltas(
        &self,
        points: &[u64],
        won: &[bool],
        points_cost: Amount,
    ) -> VenueResult<Vec<SignedAmount>> {
        points
            .iter()
            .zip(won)
            .map(|(&p, &w)| {
                let amount = signed(stake(p, points_cost)?)?;
                Ok(if w { amount } else { -amount })
            })
            .collect()
    }
}

impl SettlementStrategy for Pooled {
    fn deltas(
        &self,
        points: &[u64],
        won: &[bool],
        points_cost: Amount,
    ) -> VenueResult<Vec<SignedAmount>> {
        let mut deltas = vec![0; points.len()];

        let winner_points: Amount = points
            .iter()
            .zip(won)
            .filter(|(_, w)| **w)
            .map(|(&p, _)| Amount::from(p))
            .sum();

        let mut pot: Amount = 0;
        for (&p, &w) in points.iter().zip(won) {
            if !w {
                pot = pot
                    .checked_add(stake(p, points_cost)?)
                    .ok_or(VenueError::ArithmeticOverflow)?;
            }
        }

        if pot == 0 || winner_points == 0 {
            return Ok(deltas);
        }

        let mut distributed: Amount = 0;
        for (i, (&p, &w)) in points.iter().zip(won).enumerate() {
            if w {
                let share = pot
                    .checked_mul(Amount::from(p))
                    .ok_or(VenueError::ArithmeticOverflow)?
                    / winner_points;
                distributed += share;
                deltas[i] = signed(share)?;
            } else {
                deltas[i] = -signed(stake(p, points_cost)?)?;
            }
        }

        // Fewer than one unit per paid winner is left over.
        let mut remainder = pot - distributed;
        for (i, (&p, &w)) in points.iter().zip(won).enumerate() {
            if remainder == 0 {
                break;
            }
            if w && p > 0 {
                deltas[i] += 1;
                remainder -= 1;
            }
        }

        Ok(deltas)
    }
}

/// Configured settlement strategy
#[enum_dispatch(SettlementStrategy)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Settlement {
    Pairwise(Pairwise),
    Pooled(Pooled),
}

impl Default for Settlement {
    fn default() -> Self {
        Settlement::Pairwise(Pairwise)
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Settlement::Pairwise(_) => write!(f, "pairwise"),
            Settlement::Pooled(_) => write!(f, "pooled"),
        }
    }
}

impl FromStr for Settlement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pairwise" => Ok(Settlement::Pairwise(Pairwise)),
            "pooled" => Ok(Settlement::Pooled(Pooled)),
            other => Err(format!("unknown settlement strategy: {other}")),
        }
    }
}

/// Checked sum of signed deltas.
pub fn net(deltas: &[SignedAmount]) -> Option<SignedAmount> {
    deltas
        .iter()
        .try_fold(0 as SignedAmount, |acc, d| acc.checked_add(*d))
}
