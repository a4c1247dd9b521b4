//! Stable, public-facing helpers for presentation glue.
//!
//! Frontends hand over raw form values and get plain success flags or value
//! snapshots back, without depending on the store's full surface.

use tracing::debug;

use crate::{
    core::services::TotalsSnapshot,
    domain::{Entry, EntryId, EntryKind},
    errors::ValidationError,
    ledger::{parse_amount, LedgerStore},
};

/// Parses raw form input and adds the entry, reporting why it was rejected.
pub fn api_try_add(
    store: &mut LedgerStore,
    kind: &str,
    description: &str,
    amount: &str,
) -> Result<Entry, ValidationError> {
    let kind: EntryKind = kind.parse()?;
    let amount = parse_amount(amount)?;
    store.add(kind, description, amount)
}

/// Adds an entry from raw form input. Returns `false` when the input is invalid.
pub fn api_add(store: &mut LedgerStore, kind: &str, description: &str, amount: &str) -> bool {
    match api_try_add(store, kind, description, amount) {
        Ok(_) => true,
        Err(err) => {
            debug!("rejected entry input: {}", err);
            false
        }
    }
}

/// Removes the entry with `id`; unknown ids are ignored.
pub fn api_remove(store: &mut LedgerStore, id: u64) {
    store.remove(EntryId(id));
}

pub fn api_totals(store: &LedgerStore) -> TotalsSnapshot {
    store.totals()
}
