use crate::domain::{Entry, EntryKind};

/// Derived income/expense view of a ledger at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalsSnapshot {
    pub income: Vec<Entry>,
    pub expenses: Vec<Entry>,
    pub income_total: f64,
    pub expense_total: f64,
    pub balance: f64,
}

impl TotalsSnapshot {
    pub fn entry_count(&self) -> usize {
        self.income.len() + self.expenses.len()
    }

    pub fn is_deficit(&self) -> bool {
        self.balance < 0.0
    }
}

pub struct SummaryService;

impl SummaryService {
    /// Partitions `entries` by kind (keeping relative order) and sums each side.
    pub fn compute_totals(entries: &[Entry]) -> TotalsSnapshot {
        let (income, expenses): (Vec<Entry>, Vec<Entry>) = entries
            .iter()
            .cloned()
            .partition(|entry| entry.kind == EntryKind::Income);

        let income_total = sum_amounts(&income);
        let expense_total = sum_amounts(&expenses);

        TotalsSnapshot {
            income,
            expenses,
            income_total,
            expense_total,
            balance: income_total - expense_total,
        }
    }
}

/// Shorthand for [`SummaryService::compute_totals`].
pub fn compute_totals(entries: &[Entry]) -> TotalsSnapshot {
    SummaryService::compute_totals(entries)
}

fn sum_amounts(entries: &[Entry]) -> f64 {
    entries.iter().fold(0.0, |sum, entry| sum + entry.amount)
}
