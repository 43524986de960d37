//! Random team formation for players who registered without a team.
//!
//! The pool is shuffled and split into as few teams as the size bounds
//! allow, with team sizes differing by at most one. When the pool cannot be
//! split exactly, the players left over stay in the pool for a later run.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::roster::TeamSizeBounds;

/// Prefix used when naming generated teams (`"Random Team 3"`).
pub const RANDOM_TEAM_PREFIX: &str = "Random Team";

/// Outcome of splitting a player pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<T> {
    pub teams: Vec<Vec<T>>,
    pub unassigned: Vec<T>,
}

/// Compute team sizes for the largest placeable share of `pool_size`
/// players, forming at most `team_cap` teams when a cap is given.
///
/// Returns an empty vec when not even one valid team can be formed.
pub fn plan_team_sizes(
    pool_size: usize,
    bounds: TeamSizeBounds,
    team_cap: Option<usize>,
) -> Vec<usize> {
    let min = bounds.min.max(1) as usize;
    let max = bounds.max.max(bounds.min).max(1) as usize;

    let mut upper = pool_size;
    if let Some(cap) = team_cap {
        upper = upper.min(cap.saturating_mul(max));
    }

    for placed in (min..=upper).rev() {
        let team_count = placed.div_ceil(max);
        let base = placed / team_count;
        if base < min {
            continue;
        }
        let larger = placed % team_count;
        return (0..team_count)
            .map(|i| if i < larger { base + 1 } else { base })
            .collect();
    }
    Vec::new()
}

/// Shuffle `players` and split them into teams.
pub fn partition<T, R>(
    mut players: Vec<T>,
    bounds: TeamSizeBounds,
    team_cap: Option<usize>,
    rng: &mut R,
) -> Partition<T>
where
    R: Rng + ?Sized,
{
    players.shuffle(rng);

    let sizes = plan_team_sizes(players.len(), bounds, team_cap);
    let mut rest = players.into_iter();
    let teams = sizes
        .iter()
        .map(|&size| rest.by_ref().take(size).collect::<Vec<_>>())
        .collect();

    Partition {
        teams,
        unassigned: rest.collect(),
    }
}

/// Display name for the `n`-th generated team (1-based) of a tournament.
///
/// Team names are globally unique, so the tournament id is part of it.
pub fn random_team_name(tournament_id: i64, n: usize) -> String {
    format!("{RANDOM_TEAM_PREFIX} {n} (#{tournament_id})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bounds(min: i32, max: i32) -> TeamSizeBounds {
        TeamSizeBounds::new(min, max).unwrap()
    }

    #[test]
    fn even_split_uses_fewest_teams() {
        assert_eq!(plan_team_sizes(8, bounds(2, 4), None), vec![4, 4]);
        assert_eq!(plan_team_sizes(9, bounds(2, 4), None), vec![3, 3, 3]);
        assert_eq!(plan_team_sizes(10, bounds(2, 4), None), vec![4, 3, 3]);
    }

    #[test]
    fn leftovers_stay_unassigned_when_min_cannot_be_met() {
        // 5 players with teams of exactly 3: one team, two left over.
        assert_eq!(plan_team_sizes(5, bounds(3, 3), None), vec![3]);
        assert_eq!(plan_team_sizes(2, bounds(3, 4), None), Vec::<usize>::new());
        assert_eq!(plan_team_sizes(0, bounds(1, 4), None), Vec::<usize>::new());
    }

    #[test]
    fn team_cap_limits_team_count() {
        assert_eq!(plan_team_sizes(10, bounds(1, 2), Some(3)), vec![2, 2, 2]);
        assert_eq!(plan_team_sizes(10, bounds(1, 2), Some(0)), Vec::<usize>::new());
    }

    #[test]
    fn sizes_stay_within_bounds() {
        for min in 1..=4 {
            for max in min..=6 {
                for n in 0..40 {
                    let b = bounds(min, max);
                    let sizes = plan_team_sizes(n, b, None);
                    assert!(sizes.iter().all(|&s| b.contains(s)), "n={n} {b:?} {sizes:?}");
                    assert!(sizes.iter().sum::<usize>() <= n);
                    if let (Some(lo), Some(hi)) = (sizes.iter().min(), sizes.iter().max()) {
                        assert!(hi - lo <= 1);
                    }
                }
            }
        }
    }

    #[test]
    fn partition_keeps_every_player_exactly_once() {
        let mut rng = StdRng::seed_from_u64(7);
        let players: Vec<i64> = (1..=11).collect();
        let result = partition(players.clone(), bounds(3, 4), None, &mut rng);

        let mut seen: Vec<i64> = result.teams.iter().flatten().copied().collect();
        seen.extend(result.unassigned.iter().copied());
        seen.sort_unstable();
        assert_eq!(seen, players);
        assert_eq!(result.teams.len(), 3);
        assert!(result.unassigned.is_empty());
    }

    #[test]
    fn generated_names_are_numbered() {
        assert_eq!(random_team_name(12, 2), "Random Team 2 (#12)");
    }
}
