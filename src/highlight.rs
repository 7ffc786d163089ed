use crate::models::CellRef;
use std::{
    collections::HashMap,
    sync::{Arc, Weak},
    time::Duration,
};
use tokio::{sync::Mutex, task::AbortHandle};

pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(300);

struct Flash {
    generation: u64,
    timer: AbortHandle,
}

#[derive(Default)]
struct Board {
    next_generation: u64,
    cells: HashMap<CellRef, Flash>,
}

impl Board {
    fn expire(&mut self, cell: CellRef, generation: u64) {
        if self
            .cells
            .get(&cell)
            .is_some_and(|flash| flash.generation == generation)
        {
            self.cells.remove(&cell);
        }
    }
}

// Pending timers die with the board.
impl Drop for Board {
    fn drop(&mut self) {
        for flash in self.cells.values() {
            flash.timer.abort();
        }
    }
}

/// Transient per-cell highlight shown after a portion change.
///
/// Each flash schedules its own clear. Flashing a lit cell again cancels the
/// pending clear and restarts the window. Timers hold only a weak reference,
/// so nothing outlives the board.
#[derive(Clone)]
pub struct Highlights {
    board: Arc<Mutex<Board>>,
    duration: Duration,
}

impl Default for Highlights {
    fn default() -> Self {
        Self::new(HIGHLIGHT_DURATION)
    }
}

impl Highlights {
    pub fn new(duration: Duration) -> Self {
        Self {
            board: Arc::new(Mutex::new(Board::default())),
            duration,
        }
    }

    pub async fn flash(&self, cell: CellRef) {
        let mut board = self.board.lock().await;
        board.next_generation += 1;
        let generation = board.next_generation;

        let weak: Weak<Mutex<Board>> = Arc::downgrade(&self.board);
        let duration = self.duration;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if let Some(board) = weak.upgrade() {
                board.lock().await.expire(cell, generation);
            }
        })
        .abort_handle();

        if let Some(previous) = board.cells.insert(cell, Flash { generation, timer }) {
            previous.timer.abort();
        }
    }

    pub async fn cancel(&self, cell: CellRef) {
        if let Some(flash) = self.board.lock().await.cells.remove(&cell) {
            flash.timer.abort();
        }
    }

    pub async fn is_lit(&self, cell: CellRef) -> bool {
        self.board.lock().await.cells.contains_key(&cell)
    }

    pub async fn lit_cells(&self) -> Vec<CellRef> {
        let board = self.board.lock().await;
        let mut cells: Vec<CellRef> = board.cells.keys().copied().collect();
        cells.sort_by_key(|cell| (cell.category, cell.day));
        cells
    }
}
