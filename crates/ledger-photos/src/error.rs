//! Error type for `ledger-photos`.

use std::{io, path::PathBuf};

use ledger_core::{ErrorKind, StoreError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// The photos directory could not be created or listed at startup.
  #[error("could not prepare photo directory {path:?}: {source}")]
  Init {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("invalid photo extension: {0:?}")]
  InvalidExtension(String),

  #[error("no photo stored for expense {0}")]
  NotFound(Uuid),

  #[error("could not {op} {path:?}: {source}")]
  Io {
    op:     &'static str,
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
}

impl StoreError for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::InvalidExtension(_) => ErrorKind::Validation,
      Error::NotFound(_) => ErrorKind::NotFound,
      Error::Init { .. } | Error::Io { .. } => ErrorKind::Storage,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
