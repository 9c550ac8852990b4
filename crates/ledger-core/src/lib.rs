//! Core types and trait definitions for the expense ledger.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends and the server depend on it; it depends on neither.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod expense;
pub mod photo;
pub mod reference;
pub mod store;

pub use error::{ErrorKind, StoreError, ValidationError};
pub use expense::{Expense, ExpenseBuilder, ExpenseField, MAX_YEAR, MIN_YEAR};
