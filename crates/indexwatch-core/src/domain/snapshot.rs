use serde::Serialize;

use crate::{Instrument, Quote, QuoteStatus, UtcDateTime};

/// One instrument paired with the quote its adapter produced this cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotRow {
    pub instrument: Instrument,
    pub quote: Quote,
}

/// Immutable result of one refresh cycle; rows follow registry order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    cycle: u64,
    taken_at: UtcDateTime,
    rows: Vec<SnapshotRow>,
}

impl Snapshot {
    pub fn new(cycle: u64, taken_at: UtcDateTime, rows: Vec<SnapshotRow>) -> Self {
        Self {
            cycle,
            taken_at,
            rows,
        }
    }

    /// Monotonic cycle number, starting at 1.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    pub const fn taken_at(&self) -> UtcDateTime {
        self.taken_at
    }

    pub fn rows(&self) -> &[SnapshotRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn count_status(&self, status: QuoteStatus) -> usize {
        self.rows
            .iter()
            .filter(|row| row.quote.status() == status)
            .count()
    }
}
