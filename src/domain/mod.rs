//! Pure domain models. No I/O, no storage.

pub mod entry;

pub use entry::{Entry, EntryId, EntryKind};
pub(crate) use entry::{id_after_max, lowest_unused_id};
