pub mod summary_service;

pub use summary_service::{compute_totals, SummaryService, TotalsSnapshot};
