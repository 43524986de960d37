//! Elimination bracket engine.
//!
//! A [`Bracket`] is a flat list of [`BracketMatch`]es. Every match may carry
//! two forward references: `winner_next` says which slot of which match its
//! winner moves into, `loser_next` does the same for its loser (double
//! elimination only). Fields are padded to the next power of two with byes;
//! a team facing a bye advances without playing (a walkover) and two byes
//! void the match. Byes are forwarded like teams, so walkovers can also
//! happen deeper in the losers bracket.
//!
//! The engine is generic over the entrant id and performs no IO: the
//! repository layer persists the matches and rebuilds a bracket with
//! [`Bracket::from_matches`] before applying a result.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Smallest field a bracket can be generated for.
pub const MIN_ENTRANTS: usize = 2;

/// Largest supported field.
pub const MAX_ENTRANTS: usize = 256;

/// Every bracket match is played between exactly two slots.
pub const TEAMS_PER_MATCH: i32 = 2;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    SingleElimination,
    DoubleElimination,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::SingleElimination => "single_elimination",
            Format::DoubleElimination => "double_elimination",
        }
    }
}

impl std::str::FromStr for Format {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single_elimination" => Ok(Format::SingleElimination),
            "double_elimination" => Ok(Format::DoubleElimination),
            other => Err(CoreError::Validation(format!(
                "Unknown format '{other}'. Expected single_elimination or double_elimination"
            ))),
        }
    }
}

/// Which part of the bracket a match belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Winners,
    Losers,
    GrandFinal,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Winners => "winners",
            Side::Losers => "losers",
            Side::GrandFinal => "grand_final",
        }
    }
}

/// One of the two positions in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotIndex {
    A,
    B,
}

impl SlotIndex {
    pub fn index(self) -> usize {
        match self {
            SlotIndex::A => 0,
            SlotIndex::B => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(SlotIndex::A),
            1 => Some(SlotIndex::B),
            _ => None,
        }
    }
}

/// Contents of a match slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<T> {
    /// Waiting for an earlier match to finish.
    Pending,
    /// Nobody will ever fill this slot.
    Bye,
    Team(T),
}

impl<T: Copy> Slot<T> {
    pub fn team(&self) -> Option<T> {
        match self {
            Slot::Team(t) => Some(*t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    /// At least one slot is still pending.
    Pending,
    /// Both teams are known; waiting for a result.
    Ready,
    /// A result was reported.
    Completed,
    /// One slot was a bye; the other team advanced without playing.
    Walkover,
    /// Both slots were byes.
    Void,
}

impl MatchState {
    pub fn is_decided(self) -> bool {
        matches!(
            self,
            MatchState::Completed | MatchState::Walkover | MatchState::Void
        )
    }
}

/// Forward reference to a slot in another match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub target: usize,
    pub slot: SlotIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketMatch<T> {
    pub side: Side,
    /// 1-based round within the side.
    pub round: i32,
    /// 0-based position within the round.
    pub position: i32,
    pub slots: [Slot<T>; 2],
    pub winner: Option<T>,
    pub state: MatchState,
    pub winner_next: Option<Link>,
    pub loser_next: Option<Link>,
}

impl<T: Copy + Eq> BracketMatch<T> {
    fn new(side: Side, round: i32, position: i32) -> Self {
        Self {
            side,
            round,
            position,
            slots: [Slot::Pending, Slot::Pending],
            winner: None,
            state: MatchState::Pending,
            winner_next: None,
            loser_next: None,
        }
    }

    /// The losing team of a completed match.
    pub fn loser(&self) -> Option<T> {
        if self.state != MatchState::Completed {
            return None;
        }
        let winner = self.winner?;
        self.slots
            .iter()
            .filter_map(Slot::team)
            .find(|t| *t != winner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BracketError {
    #[error("A bracket needs at least {MIN_ENTRANTS} entrants, got {0}")]
    TooFewEntrants(usize),

    #[error("A bracket supports at most {MAX_ENTRANTS} entrants, got {0}")]
    TooManyEntrants(usize),

    #[error("Entrant at seed {0} appears more than once")]
    DuplicateEntrant(usize),

    #[error("Match index {0} is out of range")]
    UnknownMatch(usize),

    #[error("Match {0} is waiting for its opponents")]
    NotReady(usize),

    #[error("Match {0} has already been decided")]
    AlreadyDecided(usize),

    #[error("The reported winner is not playing in match {0}")]
    NotAParticipant(usize),

    #[error("Slot {slot:?} of match {target} is already filled")]
    SlotOccupied { target: usize, slot: SlotIndex },

    #[error("Match {from} links to missing match {target}")]
    DanglingLink { from: usize, target: usize },
}

impl From<BracketError> for CoreError {
    fn from(err: BracketError) -> Self {
        match err {
            BracketError::TooFewEntrants(_)
            | BracketError::TooManyEntrants(_)
            | BracketError::DuplicateEntrant(_)
            | BracketError::NotAParticipant(_) => CoreError::Validation(err.to_string()),
            BracketError::NotReady(_) | BracketError::AlreadyDecided(_) => {
                CoreError::Conflict(err.to_string())
            }
            BracketError::UnknownMatch(_)
            | BracketError::SlotOccupied { .. }
            | BracketError::DanglingLink { .. } => CoreError::Internal(err.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Standard bracket order of 1-based seeds for a power-of-two `size`.
///
/// Adjacent pairs are first-round opponents and always sum to `size + 1`,
/// so padding byes (the seeds above the field size) only meet top seeds.
pub fn seed_order(size: usize) -> Vec<usize> {
    let mut order = vec![1usize];
    while order.len() < size {
        let next = order.len() * 2;
        order = order.iter().flat_map(|&s| [s, next + 1 - s]).collect();
    }
    order
}

// ---------------------------------------------------------------------------
// Bracket
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bracket<T> {
    matches: Vec<BracketMatch<T>>,
}

impl<T: Copy + Eq> Bracket<T> {
    /// Build a bracket for `entrants`, listed best seed first, and settle
    /// every first-round bye.
    pub fn generate(format: Format, entrants: &[T]) -> Result<Self, BracketError> {
        let n = entrants.len();
        if n < MIN_ENTRANTS {
            return Err(BracketError::TooFewEntrants(n));
        }
        if n > MAX_ENTRANTS {
            return Err(BracketError::TooManyEntrants(n));
        }
        for (i, entrant) in entrants.iter().enumerate() {
            if entrants[..i].contains(entrant) {
                return Err(BracketError::DuplicateEntrant(i + 1));
            }
        }

        let size = n.next_power_of_two();
        let rounds = size.trailing_zeros() as usize;
        let order = seed_order(size);
        let mut bracket = Bracket {
            matches: Vec::with_capacity(2 * size),
        };

        // Winners bracket.
        let mut winners_rounds: Vec<Vec<usize>> = Vec::with_capacity(rounds);
        let first_round: Vec<usize> = order
            .chunks(2)
            .enumerate()
            .map(|(position, pair)| {
                let idx = bracket.push(Side::Winners, 1, position);
                for (slot, &seed) in pair.iter().enumerate() {
                    bracket.matches[idx].slots[slot] = if seed <= n {
                        Slot::Team(entrants[seed - 1])
                    } else {
                        Slot::Bye
                    };
                }
                idx
            })
            .collect();
        winners_rounds.push(first_round);

        for round in 2..=rounds {
            let current = bracket.pair_winners(Side::Winners, round, &winners_rounds[round - 2]);
            winners_rounds.push(current);
        }
        let winners_final = winners_rounds[rounds - 1][0];

        if format == Format::DoubleElimination {
            // With two entrants there is no losers bracket; the grand final
            // replays the only winners match.
            let losers_final =
                (rounds > 1).then(|| bracket.build_losers_bracket(&winners_rounds));

            let gf = bracket.push(Side::GrandFinal, 1, 0);
            bracket.link_winner(winners_final, gf, SlotIndex::A);
            match losers_final {
                Some(from) => bracket.link_winner(from, gf, SlotIndex::B),
                None => bracket.link_loser(winners_final, gf, SlotIndex::B),
            }
        }

        let mut changed = BTreeSet::new();
        bracket.settle(winners_rounds[0].clone(), &mut changed)?;
        Ok(bracket)
    }

    /// Rebuild a bracket from stored matches, checking every forward
    /// reference points inside the list.
    pub fn from_matches(matches: Vec<BracketMatch<T>>) -> Result<Self, BracketError> {
        for (from, m) in matches.iter().enumerate() {
            for link in [m.winner_next, m.loser_next].into_iter().flatten() {
                if link.target >= matches.len() {
                    return Err(BracketError::DanglingLink {
                        from,
                        target: link.target,
                    });
                }
            }
        }
        Ok(Self { matches })
    }

    pub fn matches(&self) -> &[BracketMatch<T>] {
        &self.matches
    }

    pub fn into_matches(self) -> Vec<BracketMatch<T>> {
        self.matches
    }

    /// The winner of the match with no onward link, once it is decided.
    pub fn champion(&self) -> Option<T> {
        self.matches
            .iter()
            .find(|m| m.winner_next.is_none())
            .and_then(|m| m.winner)
    }

    pub fn is_finished(&self) -> bool {
        self.matches.iter().all(|m| m.state.is_decided())
    }

    /// Record `winner` for the match at `index` and advance both teams.
    ///
    /// Returns the sorted indices of every match that changed, including
    /// walkovers triggered further along the bracket.
    pub fn report_winner(&mut self, index: usize, winner: T) -> Result<Vec<usize>, BracketError> {
        let m = self
            .matches
            .get(index)
            .ok_or(BracketError::UnknownMatch(index))?;

        match m.state {
            MatchState::Ready => {}
            MatchState::Pending => return Err(BracketError::NotReady(index)),
            _ => return Err(BracketError::AlreadyDecided(index)),
        }

        let (a, b) = match m.slots {
            [Slot::Team(a), Slot::Team(b)] => (a, b),
            _ => return Err(BracketError::NotReady(index)),
        };
        let loser = if winner == a {
            b
        } else if winner == b {
            a
        } else {
            return Err(BracketError::NotAParticipant(index));
        };
        let (winner_next, loser_next) = (m.winner_next, m.loser_next);

        let m = &mut self.matches[index];
        m.winner = Some(winner);
        m.state = MatchState::Completed;

        let mut changed = BTreeSet::from([index]);
        let mut queue = Vec::new();
        self.deliver(index, winner_next, Slot::Team(winner), &mut queue, &mut changed)?;
        self.deliver(index, loser_next, Slot::Team(loser), &mut queue, &mut changed)?;
        self.settle(queue, &mut changed)?;

        Ok(changed.into_iter().collect())
    }

    // -----------------------------------------------------------------------
    // Construction helpers
    // -----------------------------------------------------------------------

    fn push(&mut self, side: Side, round: usize, position: usize) -> usize {
        self.matches
            .push(BracketMatch::new(side, round as i32, position as i32));
        self.matches.len() - 1
    }

    fn link_winner(&mut self, from: usize, target: usize, slot: SlotIndex) {
        self.matches[from].winner_next = Some(Link { target, slot });
    }

    fn link_loser(&mut self, from: usize, target: usize, slot: SlotIndex) {
        self.matches[from].loser_next = Some(Link { target, slot });
    }

    /// Create a round whose matches pair the winners of adjacent matches in
    /// `previous`.
    fn pair_winners(&mut self, side: Side, round: usize, previous: &[usize]) -> Vec<usize> {
        previous
            .chunks(2)
            .enumerate()
            .map(|(position, pair)| {
                let idx = self.push(side, round, position);
                self.link_winner(pair[0], idx, SlotIndex::A);
                self.link_winner(pair[1], idx, SlotIndex::B);
                idx
            })
            .collect()
    }

    /// Build the losers bracket and return the index of its final.
    ///
    /// Odd rounds halve the field; even rounds bring in the losers of the
    /// next winners round, alternating their order so early opponents are
    /// kept apart.
    fn build_losers_bracket(&mut self, winners_rounds: &[Vec<usize>]) -> usize {
        let mut round = 0;
        let mut survivors: Vec<usize> = Vec::new();

        for stage in 1..winners_rounds.len() {
            round += 1;
            let halved: Vec<usize> = if stage == 1 {
                winners_rounds[0]
                    .chunks(2)
                    .enumerate()
                    .map(|(position, pair)| {
                        let idx = self.push(Side::Losers, round, position);
                        self.link_loser(pair[0], idx, SlotIndex::A);
                        self.link_loser(pair[1], idx, SlotIndex::B);
                        idx
                    })
                    .collect()
            } else {
                self.pair_winners(Side::Losers, round, &survivors)
            };

            round += 1;
            let dropping = &winners_rounds[stage];
            let count = halved.len();
            survivors = halved
                .iter()
                .enumerate()
                .map(|(position, &from)| {
                    let idx = self.push(Side::Losers, round, position);
                    self.link_winner(from, idx, SlotIndex::A);
                    let drop = if stage % 2 == 1 {
                        dropping[count - 1 - position]
                    } else {
                        dropping[position]
                    };
                    self.link_loser(drop, idx, SlotIndex::B);
                    idx
                })
                .collect();
        }

        survivors[0]
    }

    // -----------------------------------------------------------------------
    // Propagation
    // -----------------------------------------------------------------------

    fn deliver(
        &mut self,
        from: usize,
        link: Option<Link>,
        value: Slot<T>,
        queue: &mut Vec<usize>,
        changed: &mut BTreeSet<usize>,
    ) -> Result<(), BracketError> {
        let Some(link) = link else {
            return Ok(());
        };
        let target = self
            .matches
            .get_mut(link.target)
            .ok_or(BracketError::DanglingLink {
                from,
                target: link.target,
            })?;
        let slot = &mut target.slots[link.slot.index()];
        if *slot != Slot::Pending {
            return Err(BracketError::SlotOccupied {
                target: link.target,
                slot: link.slot,
            });
        }
        *slot = value;
        changed.insert(link.target);
        queue.push(link.target);
        Ok(())
    }

    /// Re-evaluate queued matches until no further walkovers cascade.
    fn settle(
        &mut self,
        mut queue: Vec<usize>,
        changed: &mut BTreeSet<usize>,
    ) -> Result<(), BracketError> {
        while let Some(idx) = queue.pop() {
            let m = &self.matches[idx];
            if m.state.is_decided() {
                continue;
            }
            let (slots, state) = (m.slots, m.state);
            let (winner_next, loser_next) = (m.winner_next, m.loser_next);

            match slots {
                [Slot::Team(_), Slot::Team(_)] => {
                    if state != MatchState::Ready {
                        self.matches[idx].state = MatchState::Ready;
                        changed.insert(idx);
                    }
                }
                [Slot::Pending, _] | [_, Slot::Pending] => {}
                [Slot::Team(t), Slot::Bye] | [Slot::Bye, Slot::Team(t)] => {
                    let m = &mut self.matches[idx];
                    m.winner = Some(t);
                    m.state = MatchState::Walkover;
                    changed.insert(idx);
                    self.deliver(idx, winner_next, Slot::Team(t), &mut queue, changed)?;
                    self.deliver(idx, loser_next, Slot::Bye, &mut queue, changed)?;
                }
                [Slot::Bye, Slot::Bye] => {
                    self.matches[idx].state = MatchState::Void;
                    changed.insert(idx);
                    self.deliver(idx, winner_next, Slot::Bye, &mut queue, changed)?;
                    self.deliver(idx, loser_next, Slot::Bye, &mut queue, changed)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn field(n: i64) -> Vec<i64> {
        (1..=n).collect()
    }

    /// Play every ready match, letting the lower id win, until nothing is
    /// left to decide. Returns the number of losses per entrant.
    fn play_out(bracket: &mut Bracket<i64>) -> HashMap<i64, usize> {
        let mut losses = HashMap::new();
        while let Some(idx) = bracket
            .matches()
            .iter()
            .position(|m| m.state == MatchState::Ready)
        {
            let [a, b] = bracket.matches()[idx].slots.map(|s| s.team().unwrap());
            bracket.report_winner(idx, a.min(b)).unwrap();
            *losses.entry(a.max(b)).or_insert(0) += 1;
        }
        losses
    }

    #[test]
    fn seed_order_pairs_sum_to_size_plus_one() {
        assert_eq!(seed_order(2), vec![1, 2]);
        assert_eq!(seed_order(4), vec![1, 4, 2, 3]);
        assert_eq!(seed_order(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
        for size in [16, 32, 64] {
            let order = seed_order(size);
            assert!(order.chunks(2).all(|p| p[0] + p[1] == size + 1));
        }
    }

    #[test]
    fn match_counts() {
        for n in 2..=33 {
            let size = (n as usize).next_power_of_two();
            let single = Bracket::generate(Format::SingleElimination, &field(n)).unwrap();
            assert_eq!(single.matches().len(), size - 1, "single, n={n}");
            let double = Bracket::generate(Format::DoubleElimination, &field(n)).unwrap();
            assert_eq!(double.matches().len(), 2 * size - 2, "double, n={n}");
        }
    }

    #[test]
    fn links_only_point_forward() {
        for format in [Format::SingleElimination, Format::DoubleElimination] {
            let bracket = Bracket::generate(format, &field(13)).unwrap();
            for (idx, m) in bracket.matches().iter().enumerate() {
                for link in [m.winner_next, m.loser_next].into_iter().flatten() {
                    assert!(link.target > idx);
                }
            }
        }
    }

    #[test]
    fn every_slot_has_exactly_one_feeder() {
        let bracket = Bracket::generate(Format::DoubleElimination, &field(16)).unwrap();
        let mut feeders: HashMap<(usize, usize), usize> = HashMap::new();
        for m in bracket.matches() {
            for link in [m.winner_next, m.loser_next].into_iter().flatten() {
                *feeders.entry((link.target, link.slot.index())).or_insert(0) += 1;
            }
        }
        for (idx, m) in bracket.matches().iter().enumerate() {
            if m.side == Side::Winners && m.round == 1 {
                continue;
            }
            assert_eq!(feeders.get(&(idx, 0)), Some(&1));
            assert_eq!(feeders.get(&(idx, 1)), Some(&1));
        }
    }

    #[test]
    fn byes_give_top_seeds_walkovers() {
        let bracket = Bracket::generate(Format::SingleElimination, &field(5)).unwrap();
        let first: Vec<_> = bracket
            .matches()
            .iter()
            .filter(|m| m.side == Side::Winners && m.round == 1)
            .collect();
        assert_eq!(first.len(), 4);
        let walkovers: Vec<i64> = first
            .iter()
            .filter(|m| m.state == MatchState::Walkover)
            .filter_map(|m| m.winner)
            .collect();
        assert_eq!(walkovers, vec![1, 2, 3]);
        assert!(first.iter().all(|m| m.state != MatchState::Void));

        // Seed 4 vs seed 5 is the only first-round game.
        let ready: Vec<_> = first
            .iter()
            .filter(|m| m.state == MatchState::Ready)
            .collect();
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].slots, [Slot::Team(4), Slot::Team(5)]);
    }

    #[test]
    fn single_elimination_crowns_top_seed() {
        for n in 2..=20 {
            let mut bracket = Bracket::generate(Format::SingleElimination, &field(n)).unwrap();
            let losses = play_out(&mut bracket);
            assert!(bracket.is_finished());
            assert_eq!(bracket.champion(), Some(1));
            assert_eq!(losses.len(), n as usize - 1);
            assert!(losses.values().all(|&l| l == 1));
        }
    }

    #[test]
    fn double_elimination_eliminates_after_two_losses() {
        for n in 2..=20 {
            let mut bracket = Bracket::generate(Format::DoubleElimination, &field(n)).unwrap();
            let losses = play_out(&mut bracket);
            assert!(bracket.is_finished(), "n={n}");
            assert_eq!(bracket.champion(), Some(1), "n={n}");
            assert_eq!(losses.get(&1), None);
            for team in 2..=n {
                assert_eq!(losses.get(&team), Some(&2), "n={n} team={team}");
            }
        }
    }

    #[test]
    fn two_team_double_elimination_is_a_rematch() {
        let mut bracket = Bracket::generate(Format::DoubleElimination, &[10, 20]).unwrap();
        assert_eq!(bracket.matches().len(), 2);
        bracket.report_winner(0, 20).unwrap();
        let gf = &bracket.matches()[1];
        assert_eq!(gf.side, Side::GrandFinal);
        assert_eq!(gf.slots, [Slot::Team(20), Slot::Team(10)]);
        bracket.report_winner(1, 10).unwrap();
        assert_eq!(bracket.champion(), Some(10));
    }

    #[test]
    fn losers_bracket_walkover_cascades_on_report() {
        // Three teams: seed 1 has a bye, so the first losers match has a
        // bye in slot A until the 2 v 3 loser drops in.
        let mut bracket = Bracket::generate(Format::DoubleElimination, &[1, 2, 3]).unwrap();
        let ready = bracket
            .matches()
            .iter()
            .position(|m| m.state == MatchState::Ready)
            .unwrap();
        let changed = bracket.report_winner(ready, 2).unwrap();

        let losers_first = bracket
            .matches()
            .iter()
            .position(|m| m.side == Side::Losers && m.round == 1)
            .unwrap();
        assert!(changed.contains(&losers_first));
        let m = &bracket.matches()[losers_first];
        assert_eq!(m.state, MatchState::Walkover);
        assert_eq!(m.winner, Some(3));
    }

    #[test]
    fn report_rejects_invalid_requests() {
        let mut bracket = Bracket::generate(Format::SingleElimination, &field(4)).unwrap();
        let final_idx = bracket.matches().len() - 1;
        assert_matches!(
            bracket.report_winner(final_idx, 1),
            Err(BracketError::NotReady(_))
        );
        assert_matches!(
            bracket.report_winner(0, 99),
            Err(BracketError::NotAParticipant(0))
        );
        assert_matches!(
            bracket.report_winner(42, 1),
            Err(BracketError::UnknownMatch(42))
        );

        bracket.report_winner(0, 1).unwrap();
        assert_matches!(
            bracket.report_winner(0, 4),
            Err(BracketError::AlreadyDecided(0))
        );
        assert_eq!(bracket.matches()[0].loser(), Some(4));
    }

    #[test]
    fn generate_rejects_bad_fields() {
        assert_matches!(
            Bracket::generate(Format::SingleElimination, &[1]),
            Err(BracketError::TooFewEntrants(1))
        );
        assert_matches!(
            Bracket::generate(Format::SingleElimination, &[1, 2, 1]),
            Err(BracketError::DuplicateEntrant(3))
        );
        let too_many: Vec<i64> = (0..=MAX_ENTRANTS as i64).collect();
        assert_matches!(
            Bracket::generate(Format::SingleElimination, &too_many),
            Err(BracketError::TooManyEntrants(_))
        );
    }

    #[test]
    fn from_matches_round_trips_and_checks_links() {
        let bracket = Bracket::generate(Format::DoubleElimination, &field(6)).unwrap();
        let rebuilt = Bracket::from_matches(bracket.matches().to_vec()).unwrap();
        assert_eq!(rebuilt, bracket);

        let mut broken = bracket.into_matches();
        broken[0].winner_next = Some(Link {
            target: 500,
            slot: SlotIndex::A,
        });
        assert_matches!(
            Bracket::from_matches(broken),
            Err(BracketError::DanglingLink { from: 0, target: 500 })
        );
    }
}
