use hues_types::{Guess, Player, Position, Score};
use std::collections::BTreeMap;

/// How many guesses a round needs before it counts at final scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinalQuorum {
    /// Same rule as the live average: one guess for a solo game, two otherwise
    #[default]
    MatchLive,
    /// Always at least two guesses, even in a solo game
    Strict,
}

pub struct ScoringEngine;

impl ScoringEngine {
    /// Manhattan distance between two cells
    pub fn distance(a: Position, b: Position) -> u32 {
        a.x.abs_diff(b.x) as u32 + a.y.abs_diff(b.y) as u32
    }

    /// Points awarded for a guess at `distance` from the round average
    pub fn points_for_distance(distance: u32) -> u32 {
        match distance {
            0 => 3, // Exact
            1 => 2, // Adjacent
            2 => 1, // Close
            _ => 0,
        }
    }

    /// Rounded centroid of the positions, rounding halves up.
    /// A single position is returned as-is.
    pub fn average_position(positions: &[Position]) -> Option<Position> {
        match positions {
            [] => None,
            [only] => Some(*only),
            _ => {
                let count = positions.len() as u32;
                let sum_x: u32 = positions.iter().map(|p| p.x as u32).sum();
                let sum_y: u32 = positions.iter().map(|p| p.y as u32).sum();

                Some(Position {
                    x: Self::round_half_up(sum_x, count) as u8,
                    y: Self::round_half_up(sum_y, count) as u8,
                })
            }
        }
    }

    fn round_half_up(sum: u32, count: u32) -> u32 {
        (2 * sum + count) / (2 * count)
    }

    /// Guesses needed before a round average can be displayed
    pub fn live_quorum(player_count: usize) -> usize {
        if player_count > 1 { 2 } else { 1 }
    }

    pub fn final_quorum(rule: FinalQuorum, player_count: usize) -> usize {
        match rule {
            FinalQuorum::MatchLive => Self::live_quorum(player_count),
            FinalQuorum::Strict => 2,
        }
    }

    /// Recompute every player's score from scratch over all recorded rounds.
    ///
    /// Rounds with fewer than `min_guesses` guesses award nothing. Guesses of
    /// players no longer on the roster still shape the round average but their
    /// points are dropped.
    pub fn final_scores(players: &[Player], guesses: &[Guess], min_guesses: usize) -> Vec<Score> {
        let mut scores: Vec<Score> = players
            .iter()
            .map(|p| Score {
                player_id: p.id,
                score: 0,
            })
            .collect();

        let mut rounds: BTreeMap<u32, Vec<&Guess>> = BTreeMap::new();
        for guess in guesses {
            rounds.entry(guess.round).or_default().push(guess);
        }

        for (round, round_guesses) in rounds {
            if round_guesses.len() < min_guesses.max(1) {
                continue;
            }

            let positions: Vec<Position> = round_guesses.iter().map(|g| g.position).collect();
            let Some(average) = Self::average_position(&positions) else {
                continue;
            };
            tracing::debug!("Round {} average for final scoring: {:?}", round, average);

            for guess in round_guesses {
                let points = Self::points_for_distance(Self::distance(average, guess.position));
                if let Some(entry) = scores.iter_mut().find(|s| s.player_id == guess.player_id) {
                    entry.score += points;
                }
            }
        }

        scores
    }
}
