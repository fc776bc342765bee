//! Domain types and cart policy logic shared by the db and api crates.
//!
//! This crate is free of I/O: it defines the error taxonomy, the common id
//! and timestamp aliases, and the pure decision logic for cart reservations
//! (variant keys, staleness, set-quantity reconciliation).

pub mod cart;
pub mod error;
pub mod types;
