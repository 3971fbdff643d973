//! Listing order for ledger records.

use core::cmp::Ordering;

use crate::movement::MovementRecord;

/// Newest first: `timestamp` descending, then `id` descending.
///
/// Timestamps compare as text. A missing timestamp compares as the empty
/// string, so undated records sort after every dated one.
pub fn newest_first(a: &MovementRecord, b: &MovementRecord) -> Ordering {
    let ta = a.timestamp.as_deref().unwrap_or("");
    let tb = b.timestamp.as_deref().unwrap_or("");
    tb.cmp(ta).then_with(|| b.id.cmp(&a.id))
}

pub fn sort_newest_first(records: &mut [MovementRecord]) {
    records.sort_by(newest_first);
}
