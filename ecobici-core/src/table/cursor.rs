//! Batch cursor over a materialized row buffer.
//!
//! The cursor does no I/O and no parsing: it slices an already-built buffer
//! in bounded batches. The offset moves forward only; there is no reset.

use super::value::Row;
use std::sync::Arc;

/// Default number of rows per pull, matching the usual host vector size.
pub const STANDARD_BATCH_SIZE: usize = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Nothing pulled yet. An empty buffer is never in this state.
    Unstarted,
    Draining,
    Exhausted,
}

/// Single-consumer cursor. Pulls need `&mut self`, so two consumers cannot
/// drain the same cursor concurrently.
#[derive(Debug, Clone)]
pub struct BatchCursor {
    rows: Arc<[Row]>,
    offset: usize,
}

impl BatchCursor {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: rows.into(),
            offset: 0,
        }
    }

    /// Return up to `max_batch_size` rows from the current offset and advance
    /// past them. Returns an empty slice once exhausted.
    ///
    /// A `max_batch_size` of zero returns an empty slice without advancing.
    pub fn pull(&mut self, max_batch_size: usize) -> &[Row] {
        let start = self.offset;
        let end = start.saturating_add(max_batch_size).min(self.rows.len());
        self.offset = end;
        &self.rows[start..end]
    }

    pub fn state(&self) -> CursorState {
        if self.offset >= self.rows.len() {
            CursorState::Exhausted
        } else if self.offset == 0 {
            CursorState::Unstarted
        } else {
            CursorState::Draining
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.state() == CursorState::Exhausted
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.rows.len() - self.offset
    }

    /// Total rows in the buffer, pulled or not.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
