//! Error types for `ledger-core`.

use thiserror::Error;

use crate::expense::{ExpenseField, MAX_YEAR, MIN_YEAR};

/// Why an [`ExpenseBuilder`](crate::ExpenseBuilder) refused to build.
///
/// Messages are meant to be shown to the end user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("could not parse UUID from '{input}': {reason}")]
  InvalidId { input: String, reason: String },

  #[error("{0} cannot be empty")]
  Empty(ExpenseField),

  #[error("created_at cannot be zero value")]
  ZeroTimestamp,

  /// The year falls outside [`MIN_YEAR`]..=[`MAX_YEAR`].
  #[error("created_at year {0} is outside {min:04}..={max}", min = MIN_YEAR, max = MAX_YEAR)]
  YearOutOfRange(i32),
}

impl ValidationError {
  /// The field that failed validation.
  pub fn field(&self) -> ExpenseField {
    match self {
      ValidationError::InvalidId { .. } => ExpenseField::Id,
      ValidationError::Empty(field) => *field,
      ValidationError::ZeroTimestamp | ValidationError::YearOutOfRange(_) => {
        ExpenseField::CreatedAt
      }
    }
  }
}

/// Coarse classification shared by every backend error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Bad input; the caller's fault. Never retried.
  Validation,
  /// A payer, category, expense or photo does not exist.
  NotFound,
  /// A uniqueness constraint was violated.
  Conflict,
  /// A lower-level I/O or storage engine fault.
  Storage,
}

/// Implemented by backend error types so callers can classify failures
/// without depending on a concrete backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> ErrorKind;
}

impl StoreError for ValidationError {
  fn kind(&self) -> ErrorKind { ErrorKind::Validation }
}
