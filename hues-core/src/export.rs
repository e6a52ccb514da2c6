use hues_types::{GameState, PlayerId, SelectionRow};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::coordinates::{format_coordinate, row_letter};

pub const CSV_HEADER: [&str; 6] = ["Ronda", "Palabra", "Jugador", "Coordenadas", "X", "Y"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionFilter {
    #[default]
    All,
    CurrentRound,
    Player(PlayerId),
}

impl FromStr for SelectionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(SelectionFilter::All),
            "current" => Ok(SelectionFilter::CurrentRound),
            other => other
                .parse::<PlayerId>()
                .map(SelectionFilter::Player)
                .map_err(|_| format!("Unknown selection filter: {}", other)),
        }
    }
}

fn word_for_round(state: &GameState, round: u32) -> String {
    if round == state.current_round {
        if state.current_word.is_empty() {
            return "(Sin palabra asignada)".to_string();
        }
        return state.current_word.clone();
    }

    state
        .history_word(round)
        .map(str::to_string)
        .unwrap_or_else(|| format!("(Palabra ronda {})", round))
}

/// Every guess of a current player, latest round first, then by player name
pub fn selection_history(state: &GameState, filter: SelectionFilter) -> Vec<SelectionRow> {
    let mut rows: Vec<SelectionRow> = state
        .guesses
        .iter()
        .filter_map(|guess| {
            let player = state.player(guess.player_id)?;
            Some(SelectionRow {
                round: guess.round,
                word: word_for_round(state, guess.round),
                player_id: player.id,
                player_name: player.name.clone(),
                player_color: player.color.clone(),
                coordinate: format_coordinate(guess.position),
                position: guess.position,
            })
        })
        .filter(|row| match filter {
            SelectionFilter::All => true,
            SelectionFilter::CurrentRound => row.round == state.current_round,
            SelectionFilter::Player(id) => row.player_id == id,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.round
            .cmp(&a.round)
            .then_with(|| a.player_name.cmp(&b.player_name))
    });
    rows
}

/// Rounds that have guesses but no word recorded in the history
pub fn rounds_missing_word(state: &GameState) -> usize {
    let rounds: BTreeSet<u32> = state.guesses.iter().map(|g| g.round).collect();
    rounds
        .into_iter()
        .filter(|round| state.history_word(*round).is_none())
        .count()
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Selection history as a CSV document with the `Ronda,Palabra,...` header
pub fn export_csv(state: &GameState, filter: SelectionFilter) -> String {
    let mut lines = vec![CSV_HEADER.join(",")];

    for row in selection_history(state, filter) {
        let fields = [
            row.round.to_string(),
            csv_field(&row.word),
            csv_field(&row.player_name),
            row.coordinate,
            (row.position.x as u32 + 1).to_string(),
            row_letter(row.position.y).to_string(),
        ];
        lines.push(fields.join(","));
    }

    lines.join("\n")
}
