//! Stateless business logic derived from ledger contents.

pub mod services;
