//! Random stand-in for the external scorer.
//!
//! Produces `(points, won)` sequences the configured settlement strategy
//! accepts: pairwise scores always pair one winner with one loser on equal
//! points, and pooled scores have at least one winner.

use pineapple_poker::venue::Settlement;
use rand::{Rng, SeedableRng, rngs::StdRng};

#[derive(Debug)]
pub struct RandomScorer {
    rng: StdRng,
}

impl RandomScorer {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }

    /// Score a round for `seats` players.
    ///
    /// `max_points` bounds each player's points; callers derive it from the
    /// smallest balance so a loss never exceeds what a player holds.
    pub fn score(&mut self, settlement: Settlement, seats: usize, max_points: u64) -> (Vec<u64>, Vec<bool>) {
        let mut points = vec![0; seats];
        let mut won = vec![false; seats];
        if seats < 2 {
            return (points, won);
        }

        match settlement {
            Settlement::Pairwise(_) => {
                let winner = self.rng.random_range(0..seats);
                let loser = (winner + self.rng.random_range(1..seats)) % seats;
                let p = self.rng.random_range(0..=max_points);
                points[winner] = p;
                points[loser] = p;
                won[winner] = true;
            }
            Settlement::Pooled(_) => {
                for (p, w) in points.iter_mut().zip(won.iter_mut()) {
                    *p = self.rng.random_range(0..=max_points);
                    *w = self.rng.random_bool(0.5);
                }
                let winner = self.rng.random_range(0..seats);
                won[winner] = true;
            }
        }

        (points, won)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pineapple_poker::venue::{Pairwise, Pooled, SettlementStrategy, settlement::net};

    #[test]
    fn test_pairwise_scores_balance() {
        let mut scorer = RandomScorer::new(Some(5));
        for seats in 2..=4 {
            for _ in 0..50 {
                let (points, won) = scorer.score(Settlement::Pairwise(Pairwise), seats, 30);
                assert_eq!(points.len(), seats);
                assert_eq!(won.iter().filter(|w| **w).count(), 1);
                let deltas = Pairwise.deltas(&points, &won, 7).unwrap();
                assert_eq!(net(&deltas), Some(0));
            }
        }
    }

    #[test]
    fn test_pooled_scores_have_a_winner() {
        let mut scorer = RandomScorer::new(Some(9));
        for _ in 0..50 {
            let (points, won) = scorer.score(Settlement::Pooled(Pooled), 3, 10);
            assert!(won.iter().any(|w| *w));
            assert!(points.iter().all(|p| *p <= 10));
        }
    }

    #[test]
    fn test_single_seat_scores_nothing() {
        let mut scorer = RandomScorer::new(Some(1));
        let (points, won) = scorer.score(Settlement::default(), 1, 10);
        assert_eq!(points, vec![0]);
        assert_eq!(won, vec![false]);
    }
}
