//! The ledger store and the validation rules guarding its mutations.

pub mod store;
pub mod validation;

pub use store::{LedgerStore, DEFAULT_DATE_FORMAT};
pub use validation::{parse_amount, validate_amount, validate_description};
