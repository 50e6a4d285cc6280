// audit/src/lib.rs
//
// Audit trail recorder and query surface. Writes are fire-and-forget
// relative to the primary request: a failed audit write is logged and
// swallowed, never surfaced to the caller and never rolled back into
// the primary mutation.

mod recorder;
mod query;

pub use crate::query::{
    query, stats, ActorCount, AuditFilter, AuditPage, AuditStats, DEFAULT_PAGE_SIZE,
    DEFAULT_STATS_WINDOW_DAYS, MAX_PAGE_SIZE,
};
pub use crate::recorder::{AuditContext, AuditRecorder, RecordDetails};
