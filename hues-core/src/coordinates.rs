use hues_types::{BOARD_COLUMNS, BOARD_ROWS, GameError, Position};
use regex::Regex;
use std::sync::LazyLock;

static COORDINATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z])\s*([0-9]{1,2})$").expect("valid coordinate pattern"));

/// Parse board notation: a row letter A-P (any case) followed by a column 1-30.
pub fn parse_coordinate(input: &str) -> Result<Position, GameError> {
    let invalid = || GameError::InvalidCoordinate {
        input: input.to_string(),
    };

    let captures = COORDINATE_PATTERN.captures(input.trim()).ok_or_else(invalid)?;

    let letter = captures[1].chars().next().ok_or_else(invalid)?.to_ascii_uppercase();
    let row = letter as u8 - b'A';
    if row >= BOARD_ROWS {
        return Err(invalid());
    }

    let column: u8 = captures[2].parse().map_err(|_| invalid())?;
    if column == 0 || column > BOARD_COLUMNS {
        return Err(invalid());
    }

    Ok(Position::new(column - 1, row))
}

pub fn row_letter(y: u8) -> char {
    (b'A' + y) as char
}

/// Human-facing notation for a cell, e.g. `B12` for `(11, 1)`
pub fn format_coordinate(position: Position) -> String {
    format!("{}{}", row_letter(position.y), position.x as u32 + 1)
}
