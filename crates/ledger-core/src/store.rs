//! The `LedgerStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `ledger-store-sqlite`).
//! The server depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{error::StoreError, expense::Expense};

/// Abstraction over the expense repository and its reference data.
///
/// Every call is a direct round-trip to the backend: no caching, batching or
/// retries happen behind it. Retry policy belongs to the caller.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait LedgerStore: Send + Sync {
  type Error: StoreError;

  // ── Expenses ──────────────────────────────────────────────────────────

  /// Persist `expense`, resolving its payer and category names.
  ///
  /// Fails with a not-found error if either name is unregistered (no
  /// reference rows are created implicitly) and with a conflict if an
  /// expense with the same id exists. The write is atomic.
  fn insert<'a>(
    &'a self,
    expense: &'a Expense,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete the expense with `expense.id()`.
  ///
  /// Fails with a not-found error if no such expense exists. Photos are not
  /// touched.
  fn remove_expense<'a>(
    &'a self,
    expense: &'a Expense,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// All expenses, newest `created_at` first. Empty when there are none.
  fn select_expenses(
    &self,
  ) -> impl Future<Output = Result<Vec<Expense>, Self::Error>> + Send + '_;

  // ── Reference data ────────────────────────────────────────────────────

  /// Register a payer. Fails with a conflict if the name is taken.
  fn create_payer<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Register a category. Fails with a conflict if the name is taken.
  fn create_category<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// All payer names. Order is not significant.
  fn list_payers(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// All category names. Order is not significant.
  fn list_categories(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;
}
