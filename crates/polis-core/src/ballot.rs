//! First-vote-wins ballot.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use polis_types::PlayerId;

/// Votes cast in the current round, keyed by player.
///
/// A player can appear at most once. The first vote recorded for a player
/// is final; later votes from the same player are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ballot {
    votes: BTreeMap<PlayerId, bool>,
}

impl Ballot {
    /// Create an empty ballot.
    pub const fn new() -> Self {
        Self {
            votes: BTreeMap::new(),
        }
    }

    /// Record `vote` for `player` unless they already voted.
    ///
    /// Returns `true` if the vote was recorded.
    pub fn record(&mut self, player: PlayerId, vote: bool) -> bool {
        match self.votes.entry(player) {
            Entry::Vacant(slot) => {
                slot.insert(vote);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// The vote recorded for `player`, if any.
    pub fn get(&self, player: &PlayerId) -> Option<bool> {
        self.votes.get(player).copied()
    }

    /// Number of distinct voters.
    pub fn len(&self) -> usize {
        self.votes.len()
    }

    /// Whether no votes have been cast.
    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Number of yes votes.
    pub fn yays(&self) -> usize {
        self.votes.values().filter(|v| **v).count()
    }

    /// Number of no votes.
    pub fn nays(&self) -> usize {
        self.votes.values().filter(|v| !**v).count()
    }

    /// Signed tally: each yes is `+1`, each no is `-1`.
    pub fn signed_sum(&self) -> i64 {
        self.votes.values().fold(0_i64, |sum, &yes| {
            if yes {
                sum.saturating_add(1)
            } else {
                sum.saturating_sub(1)
            }
        })
    }

    /// A proposal passes only on a strictly positive tally.
    pub fn passes(&self) -> bool {
        self.signed_sum() > 0
    }

    /// Discard every vote.
    pub fn clear(&mut self) {
        self.votes.clear();
    }
}
