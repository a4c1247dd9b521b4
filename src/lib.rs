#![doc(test(attr(deny(warnings))))]

//! Budget Ledger records income and expense entries, keeps them in a durable
//! key-value slot, and derives income, expense and balance totals on demand.

pub mod api;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::core::services::{compute_totals, TotalsSnapshot};
pub use currency::format_money;
pub use domain::{Entry, EntryId, EntryKind};
pub use errors::{LedgerError, PersistenceError, ValidationError};
pub use ledger::LedgerStore;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Ledger tracing initialized.");
    });
}
