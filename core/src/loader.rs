use std::str::FromStr;

use thiserror::Error;

/// Parsed board file: a dimension header followed by one label per line,
/// row-major. Empty lines are ignored throughout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardSetup {
    pub rows: usize,
    pub cols: usize,
    pub labels: Vec<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseBoardError {
    #[error("board file is empty")]
    Empty,
    #[error("invalid dimension line: {0:?}")]
    InvalidDimensions(String),
    #[error("board dimensions must be non-zero")]
    ZeroDimension,
    #[error("expected {expected} cards, got {found}")]
    CardCount { expected: usize, found: usize },
}

impl BoardSetup {
    pub fn parse(input: &str) -> Result<Self, ParseBoardError> {
        let mut lines = input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty());

        let header = lines.next().ok_or(ParseBoardError::Empty)?;
        let bad_header = || ParseBoardError::InvalidDimensions(header.to_string());
        let (rows_raw, cols_raw) = header.split_once('x').ok_or_else(bad_header)?;
        let rows = rows_raw.parse::<usize>().map_err(|_| bad_header())?;
        let cols = cols_raw.parse::<usize>().map_err(|_| bad_header())?;
        if rows == 0 || cols == 0 {
            return Err(ParseBoardError::ZeroDimension);
        }

        let labels: Vec<String> = lines.map(str::to_string).collect();
        let expected = rows * cols;
        if labels.len() != expected {
            return Err(ParseBoardError::CardCount {
                expected,
                found: labels.len(),
            });
        }

        Ok(Self { rows, cols, labels })
    }
}

impl FromStr for BoardSetup {
    type Err = ParseBoardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_square_board() {
        let setup = BoardSetup::parse("2x2\nA\nB\nB\nA\n").unwrap();
        assert_eq!(setup.rows, 2);
        assert_eq!(setup.cols, 2);
        assert_eq!(setup.labels, vec!["A", "B", "B", "A"]);
    }

    #[test]
    fn ignores_blank_lines() {
        let setup = BoardSetup::parse("\n1x2\n\n🚚\n\n🍕\n\n").unwrap();
        assert_eq!((setup.rows, setup.cols), (1, 2));
        assert_eq!(setup.labels, vec!["🚚", "🍕"]);
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(BoardSetup::parse("  \n \n"), Err(ParseBoardError::Empty));
    }

    #[test]
    fn rejects_malformed_header() {
        assert!(matches!(
            BoardSetup::parse("2by2\nA\nB\nB\nA"),
            Err(ParseBoardError::InvalidDimensions(_))
        ));
        assert!(matches!(
            BoardSetup::parse("ax2\nA\nB"),
            Err(ParseBoardError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn rejects_zero_dimension() {
        assert_eq!(
            BoardSetup::parse("0x3"),
            Err(ParseBoardError::ZeroDimension)
        );
    }

    #[test]
    fn rejects_wrong_card_count() {
        assert_eq!(
            BoardSetup::parse("2x2\nA\nB\nB"),
            Err(ParseBoardError::CardCount {
                expected: 4,
                found: 3
            })
        );
    }
}
