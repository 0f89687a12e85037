use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex, Notify};
use tokio::time::{self, Instant};

use crate::error::FlipError;
use crate::grid::{Coord, Grid};
use crate::loader::BoardSetup;
use crate::player::{CurrentMove, PlayerState};
use crate::render::render_board;
use crate::waiters::Waiters;

pub const FLIP_WAIT_DEFAULT: Duration = Duration::from_secs(30);
pub const WATCH_WAIT_DEFAULT: Duration = Duration::from_secs(60);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardRules {
    /// How long a flip may stay parked on a card held by another player.
    pub flip_wait: Duration,
    /// How long a watch blocks before returning the unchanged board.
    pub watch_wait: Duration,
}

impl Default for BoardRules {
    fn default() -> Self {
        Self {
            flip_wait: FLIP_WAIT_DEFAULT,
            watch_wait: WATCH_WAIT_DEFAULT,
        }
    }
}

struct BoardState {
    grid: Grid,
    players: HashMap<String, PlayerState>,
    waiters: Waiters,
}

enum FirstFlip {
    Taken,
    Busy(Arc<Notify>),
}

/// The shared game board. All rule transitions run under one mutex, so every
/// operation is observed as atomic; the only waits are parking on a held
/// card (lock released) and the bulk-map transform (lock held).
pub struct Board {
    rows: usize,
    cols: usize,
    initial_labels: Vec<String>,
    rules: BoardRules,
    state: Mutex<BoardState>,
    version: watch::Sender<u64>,
}

impl Board {
    pub fn new(setup: BoardSetup) -> Self {
        Self::with_rules(setup, BoardRules::default())
    }

    pub fn with_rules(setup: BoardSetup, rules: BoardRules) -> Self {
        let BoardSetup { rows, cols, labels } = setup;
        let grid = Grid::new(rows, cols, &labels);
        let (version, _) = watch::channel(0);
        Self {
            rows,
            cols,
            initial_labels: labels,
            rules,
            state: Mutex::new(BoardState {
                grid,
                players: HashMap::new(),
                waiters: Waiters::default(),
            }),
            version,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Current change counter. Monotonic; bumps exactly once per externally
    /// visible mutation.
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    fn bump(&self) {
        self.version.send_modify(|version| *version += 1);
    }

    pub async fn look(&self, player: &str) -> String {
        let state = self.state.lock().await;
        render_board(&state.grid, player)
    }

    /// Block until the board changes or `watch_wait` elapses, then return
    /// the current board either way.
    pub async fn watch(&self, player: &str) -> String {
        self.watch_for(player, self.rules.watch_wait).await
    }

    pub async fn watch_for(&self, player: &str, wait: Duration) -> String {
        let mut rx = self.version.subscribe();
        let baseline = *rx.borrow_and_update();
        let advanced = async {
            while rx.changed().await.is_ok() {
                if *rx.borrow_and_update() > baseline {
                    break;
                }
            }
        };
        let _ = time::timeout(wait, advanced).await;
        self.look(player).await
    }

    /// Flip the card at (row, col) as `player`: the first or second card of
    /// a move depending on the player's state. Success returns the board as
    /// the player now sees it.
    pub async fn flip(&self, player: &str, row: usize, col: usize) -> Result<String, FlipError> {
        let coord = Coord::new(row, col);
        if row >= self.rows || col >= self.cols {
            return Err(FlipError::BadCoord { row, col });
        }

        let mut wake_by: Option<Instant> = None;
        loop {
            let mut state = self.state.lock().await;
            self.renew_if_exhausted(&mut state);

            let in_progress = state
                .players
                .get(player)
                .and_then(|entry| entry.current_move.in_progress());
            if let Some(first) = in_progress {
                self.second_flip(&mut state, player, first, coord)?;
                return Ok(render_board(&state.grid, player));
            }

            self.cleanup_previous(&mut state, player);
            match self.first_flip(&mut state, player, coord)? {
                FirstFlip::Taken => return Ok(render_board(&state.grid, player)),
                FirstFlip::Busy(notify) => {
                    let deadline =
                        *wake_by.get_or_insert_with(|| Instant::now() + self.rules.flip_wait);
                    let released = notify.notified();
                    tokio::pin!(released);
                    // Register before unlocking so a release issued between
                    // unlock and await is not lost.
                    released.as_mut().enable();
                    drop(state);
                    if time::timeout_at(deadline, released).await.is_err() {
                        return Err(FlipError::Timeout);
                    }
                }
            }
        }
    }

    /// Replace every live card's label with `transform(label)`, atomically
    /// with respect to flips: the board lock is held across the whole
    /// traversal, including any suspension inside the transform.
    pub async fn map_cards<F, Fut>(&self, player: &str, mut transform: F) -> String
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = String>,
    {
        let mut state = self.state.lock().await;
        let mut changed = false;
        for card in state.grid.cards_mut() {
            if card.removed {
                continue;
            }
            let next = transform(card.label.clone()).await;
            if next != card.label {
                card.label = next;
                changed = true;
            }
        }
        if changed {
            self.bump();
        }
        render_board(&state.grid, player)
    }

    fn first_flip(
        &self,
        state: &mut BoardState,
        player: &str,
        coord: Coord,
    ) -> Result<FirstFlip, FlipError> {
        let card = match state.grid.get_mut(coord) {
            Some(card) => card,
            None => {
                return Err(FlipError::BadCoord {
                    row: coord.row,
                    col: coord.col,
                })
            }
        };
        if card.removed {
            return Err(FlipError::Gone);
        }
        if card.controlled_by(player) {
            return Err(FlipError::SelfControlled);
        }
        if card.controller.is_some() {
            return Ok(FirstFlip::Busy(state.waiters.handle(coord)));
        }

        card.face_up = true;
        card.controller = Some(player.to_string());
        let entry = state.players.entry(player.to_string()).or_default();
        entry.controlled.push(coord);
        entry.current_move = CurrentMove::begun(coord);
        self.bump();
        Ok(FirstFlip::Taken)
    }

    fn second_flip(
        &self,
        state: &mut BoardState,
        player: &str,
        first: Coord,
        second: Coord,
    ) -> Result<(), FlipError> {
        if second == first {
            self.relinquish_first(state, player, first);
            self.bump();
            return Err(FlipError::SameCard);
        }

        let (target_removed, target_taken) = match state.grid.get(second) {
            Some(card) => (
                card.removed,
                matches!(card.controller.as_deref(), Some(owner) if owner != player),
            ),
            None => {
                return Err(FlipError::BadCoord {
                    row: second.row,
                    col: second.col,
                })
            }
        };
        if target_removed {
            self.relinquish_first(state, player, first);
            self.bump();
            return Err(FlipError::Gone);
        }
        if target_taken {
            self.relinquish_first(state, player, first);
            self.bump();
            return Err(FlipError::Controlled);
        }

        let first_label = match state.grid.get(first) {
            Some(card) => card.label.clone(),
            None => {
                return Err(FlipError::BadCoord {
                    row: first.row,
                    col: first.col,
                })
            }
        };

        let is_match = {
            let card = match state.grid.get_mut(second) {
                Some(card) => card,
                None => {
                    return Err(FlipError::BadCoord {
                        row: second.row,
                        col: second.col,
                    })
                }
            };
            card.face_up = true;
            let is_match = card.label == first_label;
            if is_match {
                card.controller = Some(player.to_string());
            }
            is_match
        };

        if is_match {
            let entry = state.players.entry(player.to_string()).or_default();
            entry.controlled.push(second);
            entry.current_move = CurrentMove {
                first: Some(first),
                second: Some(second),
                was_match: true,
                completed: true,
            };
        } else {
            if let Some(card) = state.grid.get_mut(first) {
                card.controller = None;
            }
            let entry = state.players.entry(player.to_string()).or_default();
            entry.drop_control(first);
            entry.current_move = CurrentMove {
                first: Some(first),
                second: Some(second),
                was_match: false,
                completed: true,
            };
            state.waiters.release(first);
            state.waiters.release(second);
        }
        self.bump();
        Ok(())
    }

    /// Give up the first card of an in-progress move after a failed second
    /// flip. The move completes as a mismatch; waiters parked on the card
    /// get a chance at it.
    fn relinquish_first(&self, state: &mut BoardState, player: &str, first: Coord) {
        if let Some(card) = state.grid.get_mut(first) {
            if card.controlled_by(player) {
                card.controller = None;
            }
        }
        if let Some(entry) = state.players.get_mut(player) {
            entry.drop_control(first);
            entry.current_move = CurrentMove::failed(first);
        }
        state.waiters.release(first);
    }

    /// Deferred resolution of the player's previous move, run before a new
    /// move begins: a matched pair is removed from the board, a mismatched
    /// pair is turned face-down again where still untouched.
    fn cleanup_previous(&self, state: &mut BoardState, player: &str) {
        let finished = match state.players.get_mut(player) {
            Some(entry) if entry.current_move.completed => {
                std::mem::take(&mut entry.current_move)
            }
            _ => return,
        };
        let coords: Vec<Coord> = finished.coords().collect();

        let still_held = coords.len() == 2
            && coords.iter().all(|&coord| {
                state
                    .grid
                    .get(coord)
                    .map_or(false, |card| card.controlled_by(player))
            });
        if finished.was_match && still_held {
            for &coord in &coords {
                if let Some(card) = state.grid.get_mut(coord) {
                    card.removed = true;
                    card.face_up = false;
                    card.controller = None;
                }
                state.waiters.release(coord);
            }
            if let Some(entry) = state.players.get_mut(player) {
                entry.controlled.retain(|held| !coords.contains(held));
            }
            self.bump();
        } else {
            let mut changed = false;
            for &coord in &coords {
                if let Some(card) = state.grid.get_mut(coord) {
                    if !card.removed && card.face_up && card.controller.is_none() {
                        card.face_up = false;
                        changed = true;
                    }
                }
            }
            if changed {
                self.bump();
            }
        }
    }

    /// Once at most one live card remains the board cannot be played out,
    /// so it is rebuilt from the initial labels and everyone starts over.
    fn renew_if_exhausted(&self, state: &mut BoardState) {
        let live = state.grid.live_count();
        if live > 1 || live == self.rows * self.cols {
            return;
        }
        state.grid = Grid::new(self.rows, self.cols, &self.initial_labels);
        state.players.clear();
        state.waiters.release_all();
        self.bump();
    }
}
