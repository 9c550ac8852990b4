//! Error type for `ledger-store-sqlite`.

use ledger_core::{ErrorKind, StoreError, ValidationError, reference::ReferenceKind};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// A storage engine fault, tagged with the operation and the key involved.
  #[error("could not {op} ({key}): {source}")]
  Database {
    op:     &'static str,
    key:    String,
    #[source]
    source: tokio_rusqlite::Error,
  },

  #[error("no such payer: '{0}'")]
  NoSuchPayer(String),

  #[error("no such category: '{0}'")]
  NoSuchCategory(String),

  #[error("expense not found: {0}")]
  ExpenseNotFound(Uuid),

  #[error("{0} name cannot be empty")]
  EmptyName(ReferenceKind),

  #[error("{kind} '{name}' already exists")]
  DuplicateName { kind: ReferenceKind, name: String },

  #[error("expense {0} already exists")]
  Conflict(Uuid),

  /// A stored row no longer satisfies the expense invariants.
  #[error("stored expense {id} is invalid: {source}")]
  Corrupt {
    id:     String,
    #[source]
    source: ValidationError,
  },

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl StoreError for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::EmptyName(_) => ErrorKind::Validation,
      Error::NoSuchPayer(_)
      | Error::NoSuchCategory(_)
      | Error::ExpenseNotFound(_) => ErrorKind::NotFound,
      Error::DuplicateName { .. } | Error::Conflict(_) => ErrorKind::Conflict,
      Error::Database { .. } | Error::Corrupt { .. } | Error::DateParse(_) => {
        ErrorKind::Storage
      }
    }
  }
}

/// Attach operation context to a raw `tokio_rusqlite` result.
pub(crate) trait DbContext<T> {
  fn context(self, op: &'static str, key: impl ToString) -> Result<T>;
}

impl<T> DbContext<T> for std::result::Result<T, tokio_rusqlite::Error> {
  fn context(self, op: &'static str, key: impl ToString) -> Result<T> {
    self.map_err(|source| Error::Database { op, key: key.to_string(), source })
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
