//! Domain model for recorded income and expense entries.

use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Identifier of an entry within one ledger. Serialized as a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl EntryId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntryId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// One above the largest id, or 1 for no ids. `None` when the largest id is
/// `u64::MAX`.
pub(crate) fn id_after_max(ids: impl IntoIterator<Item = EntryId>) -> Option<EntryId> {
    match ids.into_iter().max() {
        Some(max) => max.0.checked_add(1).map(EntryId),
        None => Some(EntryId(1)),
    }
}

/// Smallest id from 1 upward that is not in `taken`.
pub(crate) fn lowest_unused_id(taken: &HashSet<EntryId>) -> EntryId {
    let mut candidate = 1;
    while taken.contains(&EntryId(candidate)) {
        candidate += 1;
    }
    EntryId(candidate)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Direction of money for an entry.
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(EntryKind::Income),
            "expense" => Ok(EntryKind::Expense),
            other => Err(ValidationError::UnknownKind(other.to_string())),
        }
    }
}

/// One recorded financial event. Immutable once created.
///
/// The serialized field names (`type`, `date`) match the layout already held
/// in existing persistence slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "date")]
    pub recorded_at: String,
}

impl Entry {
    pub fn new(
        id: EntryId,
        kind: EntryKind,
        description: impl Into<String>,
        amount: f64,
        recorded_at: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind,
            description: description.into(),
            amount,
            recorded_at: recorded_at.into(),
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == EntryKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == EntryKind::Expense
    }
}
