//! Cards, hands, and the per-round deck used by the dealing engine.

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cards in a standard deck.
pub const DECK_SIZE: usize = 52;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Diamond,
    Heart,
    Spade,
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Diamond => "♦",
            Self::Heart => "♥",
            Self::Spade => "♠",
        };
        write!(f, "{repr}")
    }
}

/// A card identifier in `0..52`. Rank is `id / 4 + 2` (ace high at 14),
/// suit is `id % 4`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Card(u8);

impl Card {
    pub fn new(id: u8) -> Option<Self> {
        (usize::from(id) < DECK_SIZE).then_some(Self(id))
    }

    pub fn id(self) -> u8 {
        self.0
    }

    pub fn rank(self) -> u8 {
        self.0 / 4 + 2
    }

    pub fn suit(self) -> Suit {
        match self.0 % 4 {
            0 => Suit::Club,
            1 => Suit::Diamond,
            2 => Suit::Heart,
            _ => Suit::Spade,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.rank() {
            14 => write!(f, "A")?,
            13 => write!(f, "K")?,
            12 => write!(f, "Q")?,
            11 => write!(f, "J")?,
            10 => write!(f, "T")?,
            v => write!(f, "{v}")?,
        }
        write!(f, "{}", self.suit())
    }
}

/// One round's deck. Cards are drawn in order after a single shuffle, so a card
/// can never be dealt twice within the round.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct Deck {
    cards: Vec<Card>,
    deck_idx: usize,
}

impl Deck {
    /// A fresh deck shuffled with `rng`.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::default();
        deck.cards.shuffle(rng);
        deck
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.deck_idx
    }

    /// A full deck with the draw position inside it. Only a deserialized deck
    /// can fail this.
    pub fn is_intact(&self) -> bool {
        self.cards.len() == DECK_SIZE && self.deck_idx <= DECK_SIZE
    }

    /// Draw the next `count` cards, or `None` if fewer remain.
    pub fn draw(&mut self, count: usize) -> Option<Vec<Card>> {
        if count > self.remaining() {
            return None;
        }
        let drawn = self.cards[self.deck_idx..self.deck_idx + count].to_vec();
        self.deck_idx += count;
        Some(drawn)
    }
}

impl Default for Deck {
    fn default() -> Self {
        let cards = (0..DECK_SIZE as u8).map(Card).collect();
        Self { cards, deck_idx: 0 }
    }
}

/// A player's hand for one round. It has a fixed number of slots and fills them
/// stage by stage. `None` marks a slot whose stage has not been dealt yet.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct Hand {
    slots: Vec<Option<Card>>,
}

impl Hand {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Option<Card>] {
        &self.slots
    }

    /// Cards dealt so far, in deal order.
    pub fn cards(&self) -> Vec<Card> {
        self.slots.iter().flatten().copied().collect()
    }

    pub fn dealt(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.dealt() == self.capacity()
    }

    /// Put `cards` into the next undealt slots. Returns `false` without changing
    /// anything if they do not fit.
    pub fn fill(&mut self, cards: &[Card]) -> bool {
        let start = self.dealt();
        if start + cards.len() > self.capacity() {
            return false;
        }
        for (slot, card) in self.slots[start..].iter_mut().zip(cards) {
            *slot = Some(*card);
        }
        true
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr: Vec<String> = self
            .slots
            .iter()
            .map(|slot| match slot {
                Some(card) => card.to_string(),
                None => "__".to_string(),
            })
            .collect();
        write!(f, "{}", repr.join(" "))
    }
}

/// Cards drawn per player at each dealing stage. Stage 0 is the initial deal of
/// `dealCards`; stages `1..=max_stages()` belong to `newDeal`.
///
/// The whole schedule adds up to the table's share of the deck,
/// `DECK_SIZE / max_players`. Cards left after the initial deal are spread over
/// the extra stages, and earlier stages take the remainder.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct StageSchedule {
    counts: Vec<usize>,
}

impl StageSchedule {
    pub fn new(max_players: usize, initial_deal: usize, extra_stages: usize) -> Self {
        let capacity = DECK_SIZE / max_players.max(1);
        if extra_stages == 0 {
            return Self {
                counts: vec![capacity],
            };
        }

        let initial = initial_deal.min(capacity);
        let rest = capacity - initial;
        let base = rest / extra_stages;
        let remainder = rest % extra_stages;

        let mut counts = Vec::with_capacity(extra_stages + 1);
        counts.push(initial);
        counts.extend((0..extra_stages).map(|i| base + usize::from(i < remainder)));
        Self { counts }
    }

    /// Per-player card count for `stage`, or 0 past the last stage.
    pub fn stage(&self, stage: usize) -> usize {
        self.counts.get(stage).copied().unwrap_or(0)
    }

    /// Number of `newDeal` stages after the initial deal.
    pub fn max_stages(&self) -> usize {
        self.counts.len() - 1
    }

    /// Full hand size.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}
