use std::{collections::HashSet, fmt::Write as _};

use chrono::Local;
use tracing::{debug, info, warn};

use crate::{
    core::services::{SummaryService, TotalsSnapshot},
    domain::{id_after_max, lowest_unused_id, Entry, EntryId, EntryKind},
    errors::{PersistenceError, ValidationError},
    storage::{LoadReport, MemoryStore, Persistence},
};

use super::validation::{validate_amount, validate_description};

pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Authoritative, insertion-ordered collection of entries for one session.
///
/// Every successful mutation is written through to the attached
/// [`Persistence`] before the call returns. A failed write is kept as a
/// warning; the in-memory state is not rolled back.
///
/// When stored data could not be restored in full nor copied aside, the store
/// stays read-only until [`LedgerStore::allow_writes`] is called.
pub struct LedgerStore {
    entries: Vec<Entry>,
    // `None` once ids above the loaded maximum are exhausted.
    next_id: Option<EntryId>,
    persistence: Persistence,
    date_format: String,
    load_warnings: Vec<String>,
    last_write_error: Option<PersistenceError>,
    read_only: bool,
}

impl LedgerStore {
    /// Restores persisted state, starting empty if the slot is unreadable.
    pub fn open(persistence: Persistence) -> Self {
        let report = persistence.load_or_empty();
        Self::from_report(persistence, report)
    }

    /// Restores persisted state, failing on unreadable data.
    pub fn try_open(persistence: Persistence) -> Result<Self, PersistenceError> {
        let report = persistence.load()?;
        Ok(Self::from_report(persistence, report))
    }

    /// A ledger backed by a private [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::open(Persistence::new(MemoryStore::new()))
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    fn from_report(persistence: Persistence, report: LoadReport) -> Self {
        let next_id = id_after_max(report.entries.iter().map(|entry| entry.id));
        Self {
            entries: report.entries,
            next_id,
            persistence,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            load_warnings: report.warnings,
            last_write_error: None,
            read_only: report.read_only,
        }
    }

    /// Validates and appends a new entry, then persists the full ledger.
    pub fn add(
        &mut self,
        kind: EntryKind,
        description: &str,
        amount: f64,
    ) -> Result<Entry, ValidationError> {
        validate_description(description)?;
        validate_amount(amount)?;

        let entry = Entry::new(
            self.issue_id(),
            kind,
            description,
            amount,
            self.today(),
        );
        self.entries.push(entry.clone());
        debug!(id = %entry.id, kind = %entry.kind, amount, "entry added");
        self.persist();
        Ok(entry)
    }

    /// Removes the entry with `id`. Returns `false` (and writes nothing) when
    /// no such entry exists.
    pub fn remove(&mut self, id: EntryId) -> bool {
        let Some(index) = self.entries.iter().position(|entry| entry.id == id) else {
            debug!(%id, "remove ignored, no such entry");
            return false;
        };
        self.entries.remove(index);
        debug!(%id, "entry removed");
        self.persist();
        true
    }

    pub fn list(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fresh totals over the current entries.
    pub fn totals(&self) -> TotalsSnapshot {
        SummaryService::compute_totals(&self.entries)
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    /// The error from the most recent write, if that write failed.
    pub fn last_write_error(&self) -> Option<&PersistenceError> {
        self.last_write_error.as_ref()
    }

    pub fn take_write_error(&mut self) -> Option<PersistenceError> {
        self.last_write_error.take()
    }

    /// True while mutations stay in memory because the stored slot could not
    /// be preserved at load time.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Lifts the write guard. The next mutation overwrites the stored slot.
    pub fn allow_writes(&mut self) {
        if self.read_only {
            info!("writes re-enabled for slot `{}`", self.persistence.key());
        }
        self.read_only = false;
    }

    fn issue_id(&mut self) -> EntryId {
        match self.next_id {
            Some(id) => {
                self.next_id = id.value().checked_add(1).map(EntryId);
                id
            }
            None => {
                let taken: HashSet<EntryId> = self.entries.iter().map(|entry| entry.id).collect();
                lowest_unused_id(&taken)
            }
        }
    }

    fn today(&self) -> String {
        let now = Local::now();
        let mut rendered = String::new();
        if write!(rendered, "{}", now.format(&self.date_format)).is_err() {
            warn!(
                "invalid date format `{}`, using `{}`",
                self.date_format, DEFAULT_DATE_FORMAT
            );
            rendered.clear();
            let _ = write!(rendered, "{}", now.format(DEFAULT_DATE_FORMAT));
        }
        rendered
    }

    fn persist(&mut self) {
        if self.read_only {
            warn!(
                "ledger slot `{}` is protected; change kept in memory only",
                self.persistence.key()
            );
            self.last_write_error = Some(PersistenceError::SlotProtected {
                key: self.persistence.key().to_string(),
            });
            return;
        }
        match self.persistence.save(&self.entries) {
            Ok(()) => self.last_write_error = None,
            Err(err) => {
                warn!(
                    "failed to persist ledger to `{}`: {}; keeping in-memory state",
                    self.persistence.key(),
                    err
                );
                self.last_write_error = Some(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, Result as StorageResult, DEFAULT_SLOT_KEY};

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(PersistenceError::Backend("quota exceeded".into()))
        }

        fn remove(&self, _key: &str) -> StorageResult<()> {
            Ok(())
        }
    }

    #[test]
    fn ids_are_unique_for_rapid_adds() {
        let mut store = LedgerStore::in_memory();
        let first = store.add(EntryKind::Income, "A", 1.0).unwrap();
        let second = store.add(EntryKind::Income, "B", 1.0).unwrap();
        assert_ne!(first.id, second.id);
        assert!(second.id > first.id);
    }

    #[test]
    fn description_is_stored_as_supplied() {
        let mut store = LedgerStore::in_memory();
        let entry = store.add(EntryKind::Expense, "  Coffee ", 3.5).unwrap();
        assert_eq!(entry.description, "  Coffee ");
    }

    #[test]
    fn ids_continue_after_loaded_entries() {
        let backend = MemoryStore::new();
        let persistence = Persistence::new(backend.clone());
        persistence
            .save(&[Entry::new(
                EntryId(1_736_000_000_000),
                EntryKind::Income,
                "Legacy",
                5.0,
                "1/4/2025",
            )])
            .unwrap();

        let mut store = LedgerStore::open(Persistence::new(backend));
        let entry = store.add(EntryKind::Expense, "New", 1.0).unwrap();
        assert_eq!(entry.id, EntryId(1_736_000_000_001));
    }

    #[test]
    fn ids_after_the_largest_possible_id_stay_unique() {
        let backend = MemoryStore::new();
        Persistence::new(backend.clone())
            .save(&[Entry::new(
                EntryId(u64::MAX),
                EntryKind::Income,
                "Imported",
                5.0,
                "1/4/2025",
            )])
            .unwrap();

        let mut store = LedgerStore::open(Persistence::new(backend));
        let first = store.add(EntryKind::Expense, "A", 1.0).unwrap();
        let second = store.add(EntryKind::Expense, "B", 1.0).unwrap();
        assert_eq!(first.id, EntryId(1));
        assert_eq!(second.id, EntryId(2));

        assert!(store.remove(second.id));
        assert!(store.get(first.id).is_some());
        assert!(store.get(EntryId(u64::MAX)).is_some());
    }

    #[test]
    fn counter_stops_before_wrapping() {
        let backend = MemoryStore::new();
        Persistence::new(backend.clone())
            .save(&[Entry::new(
                EntryId(u64::MAX - 1),
                EntryKind::Income,
                "Imported",
                5.0,
                "1/4/2025",
            )])
            .unwrap();

        let mut store = LedgerStore::open(Persistence::new(backend));
        let top = store.add(EntryKind::Income, "Top", 1.0).unwrap();
        let wrapped = store.add(EntryKind::Income, "Next", 1.0).unwrap();
        assert_eq!(top.id, EntryId(u64::MAX));
        assert_eq!(wrapped.id, EntryId(1));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn protected_slot_is_never_overwritten() {
        let backend = MemoryStore::new();
        let persistence = Persistence::new(backend.clone());
        let report = LoadReport {
            read_only: true,
            ..LoadReport::default()
        };
        backend.set(DEFAULT_SLOT_KEY, "keep me").unwrap();

        let mut store = LedgerStore::from_report(persistence, report);
        assert!(store.is_read_only());
        let entry = store.add(EntryKind::Income, "Salary", 10.0).unwrap();
        assert_eq!(store.list(), &[entry]);
        assert!(matches!(
            store.last_write_error(),
            Some(PersistenceError::SlotProtected { .. })
        ));
        assert_eq!(backend.get(DEFAULT_SLOT_KEY).unwrap().as_deref(), Some("keep me"));

        store.allow_writes();
        store.add(EntryKind::Expense, "Rent", 4.0).unwrap();
        assert!(store.last_write_error().is_none());
        assert_ne!(backend.get(DEFAULT_SLOT_KEY).unwrap().as_deref(), Some("keep me"));
    }

    #[test]
    fn write_failure_keeps_in_memory_state() {
        let mut store = LedgerStore::open(Persistence::new(FailingStore));
        let entry = store.add(EntryKind::Income, "Salary", 10.0).unwrap();
        assert_eq!(store.list(), &[entry.clone()]);
        assert!(matches!(
            store.last_write_error(),
            Some(PersistenceError::Backend(_))
        ));

        assert!(store.take_write_error().is_some());
        assert!(store.last_write_error().is_none());

        assert!(store.remove(entry.id));
        assert!(store.is_empty());
        assert!(store.last_write_error().is_some());
    }

    #[test]
    fn invalid_date_format_falls_back_to_default() {
        let mut store = LedgerStore::in_memory().with_date_format("%Q");
        let entry = store.add(EntryKind::Income, "Salary", 10.0).unwrap();
        assert!(entry.recorded_at.contains('/'));
    }

    #[test]
    fn custom_date_format_is_used() {
        let mut store = LedgerStore::in_memory().with_date_format("%Y-%m-%d");
        let entry = store.add(EntryKind::Income, "Salary", 10.0).unwrap();
        assert_eq!(entry.recorded_at.len(), 10);
        assert_eq!(entry.recorded_at.matches('-').count(), 2);
    }
}
