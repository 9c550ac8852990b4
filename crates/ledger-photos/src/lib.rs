//! Filesystem photo store for the expense ledger.
//!
//! Photos live under `<base>/photos/`, one file per expense, named by
//! [`ledger_core::photo::PhotoKey`]. The directory is scanned once at open
//! time to build an in-memory index; afterwards lookups never touch the
//! directory listing.

pub mod error;
pub mod extension;
mod store;

pub use error::{Error, Result};
pub use store::{FsPhotoStore, PHOTOS_DIR};
