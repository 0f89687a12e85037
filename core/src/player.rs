use crate::grid::Coord;

/// A player's attempt at a pair. Replaced, never mutated in place, when a
/// new move begins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CurrentMove {
    pub first: Option<Coord>,
    pub second: Option<Coord>,
    pub was_match: bool,
    pub completed: bool,
}

impl CurrentMove {
    pub fn begun(first: Coord) -> Self {
        Self {
            first: Some(first),
            ..Self::default()
        }
    }

    pub fn failed(first: Coord) -> Self {
        Self {
            first: Some(first),
            second: None,
            was_match: false,
            completed: true,
        }
    }

    pub fn in_progress(&self) -> Option<Coord> {
        if self.completed {
            None
        } else {
            self.first
        }
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.first.into_iter().chain(self.second)
    }
}

#[derive(Clone, Debug, Default)]
pub struct PlayerState {
    pub controlled: Vec<Coord>,
    pub current_move: CurrentMove,
}

impl PlayerState {
    pub fn drop_control(&mut self, coord: Coord) {
        self.controlled.retain(|held| *held != coord);
    }
}
