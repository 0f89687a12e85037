use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Notify;

use crate::grid::Coord;

/// Per-card wait/notify registry. A release wakes every waiter currently
/// parked on the coord as a group; whoever reacquires the board lock first
/// wins, the rest re-evaluate and park again.
#[derive(Debug, Default)]
pub struct Waiters {
    parked: HashMap<Coord, Arc<Notify>>,
}

impl Waiters {
    /// Handle a caller registers on before releasing the board lock.
    pub fn handle(&mut self, coord: Coord) -> Arc<Notify> {
        Arc::clone(self.parked.entry(coord).or_default())
    }

    pub fn release(&self, coord: Coord) {
        if let Some(notify) = self.parked.get(&coord) {
            notify.notify_waiters();
        }
    }

    pub fn release_all(&self) {
        for notify in self.parked.values() {
            notify.notify_waiters();
        }
    }
}
