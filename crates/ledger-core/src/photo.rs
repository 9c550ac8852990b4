//! Photo attachments: the `PhotoStore` trait and the filename key.
//!
//! An expense has at most one photo. Photos are located by a [`PhotoKey`]
//! derived from the expense's creation time and id, so no mapping needs to be
//! persisted alongside the bytes.

use std::{fmt, future::Future};

use chrono::NaiveDateTime;
use tokio::io::AsyncRead;
use uuid::Uuid;

use crate::{error::StoreError, expense::Expense};

// ─── Key ─────────────────────────────────────────────────────────────────────

/// Version of the on-disk filename format produced by [`PhotoKey::file_name`].
///
/// Version 1: `<DDMMYY_HHMM>_<hyphenated uuid>[.<extension>]`, timestamp in
/// UTC. Any change to the layout breaks lookup of existing photos.
pub const PHOTO_FILENAME_VERSION: u32 = 1;

/// `chrono` layout of the timestamp part of a photo filename.
pub const PHOTO_TIME_LAYOUT: &str = "%d%m%y_%H%M";

const STAMP_LEN: usize = "DDMMYY_HHMM".len();

/// The two-part key `{created_at (to the minute), id}` that names a photo.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhotoKey {
  stamp: String,
  id:    Uuid,
}

impl PhotoKey {
  pub fn for_expense(expense: &Expense) -> Self {
    Self {
      stamp: expense.created_at().format(PHOTO_TIME_LAYOUT).to_string(),
      id:    expense.id(),
    }
  }

  /// The filename without extension, e.g.
  /// `100424_1340_57f8ea23-4387-491b-bbb0-7195a0e15127`.
  pub fn stem(&self) -> String { format!("{}_{}", self.stamp, self.id.hyphenated()) }

  /// The full filename for `extension`. An empty extension yields the bare
  /// stem.
  pub fn file_name(&self, extension: &str) -> String {
    if extension.is_empty() {
      self.stem()
    } else {
      format!("{}.{extension}", self.stem())
    }
  }

  /// Split a directory entry name into its key and extension.
  ///
  /// Returns `None` for names that were not produced by
  /// [`file_name`](Self::file_name).
  pub fn parse_file_name(name: &str) -> Option<(Self, &str)> {
    let (stem, extension) = name.split_once('.').unwrap_or((name, ""));

    let stamp = stem.get(..STAMP_LEN)?;
    NaiveDateTime::parse_from_str(stamp, PHOTO_TIME_LAYOUT).ok()?;

    let id_str = stem.get(STAMP_LEN..)?.strip_prefix('_')?;
    let id = Uuid::try_parse(id_str).ok()?;
    if id.hyphenated().to_string() != id_str {
      return None;
    }

    Some((Self { stamp: stamp.to_owned(), id }, extension))
  }
}

impl fmt::Display for PhotoKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.stem())
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Stores at most one binary attachment per expense.
pub trait PhotoStore: Send + Sync {
  type Error: StoreError;
  type Reader: AsyncRead + Unpin + Send + 'static;

  /// Stream `reader` into the photo for `expense`, replacing any previous
  /// photo for the same expense.
  ///
  /// `extension` may be empty and may carry a leading dot.
  fn save_expense_photo<'a, R>(
    &'a self,
    expense: &'a Expense,
    extension: &'a str,
    reader: R,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a
  where
    R: AsyncRead + Unpin + Send + 'a;

  /// Open the photo for `expense`. Fails with a not-found error if none was
  /// saved.
  fn load_expense_photo<'a>(
    &'a self,
    expense: &'a Expense,
  ) -> impl Future<Output = Result<Self::Reader, Self::Error>> + Send + 'a;

  /// The extension the photo for `expense` was saved with, if there is one.
  fn photo_extension(&self, expense: &Expense) -> Option<String>;
}

// ─── Tests ───────────────────────────────────────────────────────────────────
