//! Serializes the whole ledger into a single key-value slot and restores it.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{info, warn};

use crate::{
    domain::{id_after_max, lowest_unused_id, Entry, EntryId},
    errors::PersistenceError,
};

use super::{KeyValueStore, Result};

pub const DEFAULT_SLOT_KEY: &str = "transactions";
const QUARANTINE_SUFFIX: &str = "corrupt";
const MAX_QUARANTINE_SLOTS: u32 = 64;

/// Entries restored from the slot plus anything odd noticed on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub entries: Vec<Entry>,
    pub warnings: Vec<String>,
    /// Set when stored data was not fully restored and could not be copied
    /// aside. Saving over the slot would lose it.
    pub read_only: bool,
}

/// Adapter between a [`KeyValueStore`] and the ledger's entry collection.
pub struct Persistence {
    backend: Box<dyn KeyValueStore>,
    key: String,
}

impl Persistence {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self::with_key(backend, DEFAULT_SLOT_KEY)
    }

    pub fn with_key(backend: impl KeyValueStore + 'static, key: impl Into<String>) -> Self {
        Self {
            backend: Box::new(backend),
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// First quarantine slot. Later copies go to `<key>.corrupt-2`, `-3`, ...
    pub fn quarantine_key(&self) -> String {
        format!("{}.{}", self.key, QUARANTINE_SUFFIX)
    }

    pub fn backend(&self) -> &dyn KeyValueStore {
        self.backend.as_ref()
    }

    /// Overwrites the slot with the full ordered collection.
    pub fn save(&self, entries: &[Entry]) -> Result<()> {
        let json = serde_json::to_string(entries).map_err(PersistenceError::Serialize)?;
        self.backend.set(&self.key, &json)
    }

    /// Reads the slot. An absent slot is an empty ledger, not an error.
    ///
    /// Elements that fail to decode are skipped; the raw slot is then copied
    /// to a quarantine slot first so that the next save cannot drop them.
    pub fn load(&self) -> Result<LoadReport> {
        let Some(raw) = self.backend.get(&self.key)? else {
            return Ok(LoadReport::default());
        };
        let (mut report, skipped) = self.decode(&raw)?;
        if skipped > 0 {
            self.preserve_slot(&mut report);
        }
        self.log_report(&report);
        Ok(report)
    }

    /// Like [`Persistence::load`], but a slot that cannot be read or decoded
    /// is copied aside and an empty report is returned in its place.
    pub fn load_or_empty(&self) -> LoadReport {
        let failure = match self.backend.get(&self.key) {
            Ok(None) => return LoadReport::default(),
            Ok(Some(raw)) => match self.decode(&raw) {
                Ok((mut report, skipped)) => {
                    if skipped > 0 {
                        self.preserve_slot(&mut report);
                    }
                    self.log_report(&report);
                    return report;
                }
                Err(err) => err.to_string(),
            },
            Err(err) => format!("could not read stored ledger `{}`: {err}", self.key),
        };

        warn!("{}; starting with an empty ledger", failure);
        let mut report = LoadReport {
            warnings: vec![failure],
            ..LoadReport::default()
        };
        self.preserve_slot(&mut report);
        report
    }

    /// Copies the slot, byte for byte, into the first free quarantine slot and
    /// returns that key. A quarantine slot already holding the same payload is
    /// reused.
    pub fn quarantine(&self) -> Result<String> {
        let current = self.backend.get(&self.key).ok().flatten();
        let base = self.quarantine_key();
        for attempt in 1..=MAX_QUARANTINE_SLOTS {
            let candidate = if attempt == 1 {
                base.clone()
            } else {
                format!("{base}-{attempt}")
            };
            if !self.backend.contains(&candidate)? {
                self.backend.copy(&self.key, &candidate)?;
                return Ok(candidate);
            }
            if current.is_some() && self.backend.get(&candidate).ok().flatten() == current {
                return Ok(candidate);
            }
        }
        Err(PersistenceError::Backend(format!(
            "no free quarantine slot for `{}`",
            self.key
        )))
    }

    fn preserve_slot(&self, report: &mut LoadReport) {
        match self.quarantine() {
            Ok(key) => report
                .warnings
                .push(format!("original data preserved under `{key}`")),
            Err(err) => {
                warn!(
                    "failed to preserve ledger slot `{}`: {}; writes are disabled",
                    self.key, err
                );
                report.warnings.push(format!(
                    "original data could not be preserved ({err}); it will not be overwritten"
                ));
                report.read_only = true;
            }
        }
    }

    /// Returns the decoded report and how many stored elements were skipped.
    fn decode(&self, raw: &str) -> Result<(LoadReport, usize)> {
        let values: Vec<Value> =
            serde_json::from_str(raw).map_err(|source| PersistenceError::Corrupt {
                key: self.key.clone(),
                source,
            })?;

        let mut warnings = Vec::new();
        let mut entries = Vec::with_capacity(values.len());
        let mut skipped = 0;
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<Entry>(value) {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    skipped += 1;
                    warnings.push(format!("skipped stored entry #{index}: {err}"));
                }
            }
        }

        warnings.extend(rekey_duplicates(&mut entries));
        warnings.extend(entry_warnings(&entries));
        let report = LoadReport {
            entries,
            warnings,
            read_only: false,
        };
        Ok((report, skipped))
    }

    fn log_report(&self, report: &LoadReport) {
        for warning in &report.warnings {
            warn!("{}", warning);
        }
        info!(
            "loaded {} entr{} from slot `{}`",
            report.entries.len(),
            if report.entries.len() == 1 { "y" } else { "ies" },
            self.key
        );
    }
}

/// Flags stored entries that would not pass validation if added today.
pub fn entry_warnings(entries: &[Entry]) -> Vec<String> {
    let mut warnings = Vec::new();
    for entry in entries {
        if entry.description.trim().is_empty() {
            warnings.push(format!("entry {} has a blank description", entry.id));
        }
        if !entry.amount.is_finite() || entry.amount <= 0.0 {
            warnings.push(format!(
                "entry {} has a non-positive amount {}",
                entry.id, entry.amount
            ));
        }
    }
    warnings
}

/// Later holders of an already-seen id receive fresh ids above the maximum,
/// or the lowest unused id once the top of the range is taken.
fn rekey_duplicates(entries: &mut [Entry]) -> Vec<String> {
    let mut taken: HashSet<EntryId> = entries.iter().map(|entry| entry.id).collect();
    let mut next = id_after_max(taken.iter().copied());
    let mut seen = HashSet::new();
    let mut warnings = Vec::new();
    for entry in entries.iter_mut() {
        if seen.insert(entry.id) {
            continue;
        }
        let fresh = match next {
            Some(id) => {
                next = id.value().checked_add(1).map(EntryId);
                id
            }
            None => lowest_unused_id(&taken),
        };
        warnings.push(format!(
            "duplicate entry id {} reassigned to {}",
            entry.id, fresh
        ));
        entry.id = fresh;
        taken.insert(fresh);
        seen.insert(fresh);
    }
    warnings
}
