//! [`FsPhotoStore`]: the filesystem implementation of [`PhotoStore`].

use std::{
  collections::{HashMap, hash_map::Entry},
  io,
  path::{Path, PathBuf},
  sync::{Mutex, MutexGuard, PoisonError},
};

use ledger_core::{
  Expense,
  photo::{PhotoKey, PhotoStore},
};
use tokio::{
  fs::File,
  io::{AsyncRead, AsyncWriteExt as _},
};

use crate::{Error, Result, extension::normalize_extension};

/// Name of the subdirectory of the base path that holds photos.
pub const PHOTOS_DIR: &str = "photos";

// ─── Store ───────────────────────────────────────────────────────────────────

/// Photo store rooted at `<base>/photos`.
///
/// The index maps each key to the single file stored for it. It is built by
/// one directory scan in [`open`](Self::open) and kept current by
/// [`save_expense_photo`](PhotoStore::save_expense_photo). Files added to the
/// directory by other processes are not picked up until the next open.
#[derive(Debug)]
pub struct FsPhotoStore {
  dir:   PathBuf,
  index: Mutex<HashMap<PhotoKey, String>>,
}

impl FsPhotoStore {
  /// Open the store under `base`, creating `base/photos` if needed.
  ///
  /// Fails if the directory cannot be created or listed, so a broken photo
  /// location stops startup instead of surfacing on the first upload.
  pub async fn open(base: impl AsRef<Path>) -> Result<Self> {
    let dir = base.as_ref().join(PHOTOS_DIR);
    tokio::fs::create_dir_all(&dir)
      .await
      .map_err(|source| Error::Init { path: dir.clone(), source })?;

    let index = scan(&dir).await?;
    tracing::info!(dir = %dir.display(), photos = index.len(), "photo store opened");

    Ok(Self { dir, index: Mutex::new(index) })
  }

  /// The `photos` directory itself.
  pub fn dir(&self) -> &Path { &self.dir }

  // The lock is only held for map operations, never across an `.await`.
  fn index(&self) -> MutexGuard<'_, HashMap<PhotoKey, String>> {
    self.index.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn lookup(&self, key: &PhotoKey) -> Option<String> { self.index().get(key).cloned() }

  fn record(&self, key: PhotoKey, file_name: String) -> Option<String> {
    self.index().insert(key, file_name)
  }

  /// Drop the entry for `key` if it still points at `file_name`.
  fn forget(&self, key: &PhotoKey, file_name: &str) {
    let mut index = self.index();
    if index.get(key).is_some_and(|n| n == file_name) {
      index.remove(key);
    }
  }
}

/// Build the key → file name index from one listing of `dir`.
///
/// Names that are not photo filenames are skipped. When several files share a
/// key, the lexicographically smallest name is kept.
async fn scan(dir: &Path) -> Result<HashMap<PhotoKey, String>> {
  let init = |source: io::Error| Error::Init { path: dir.to_path_buf(), source };

  let mut entries = tokio::fs::read_dir(dir).await.map_err(init)?;
  let mut names = Vec::new();
  while let Some(entry) = entries.next_entry().await.map_err(init)? {
    if !entry.file_type().await.map_err(init)?.is_file() {
      continue;
    }
    match entry.file_name().into_string() {
      Ok(name) => names.push(name),
      Err(raw) => tracing::debug!(name = ?raw, "skipping non-UTF-8 file name"),
    }
  }
  names.sort();

  let mut index = HashMap::with_capacity(names.len());
  for name in names {
    let Some((key, _)) = PhotoKey::parse_file_name(&name) else {
      tracing::debug!(%name, "skipping file that is not a photo");
      continue;
    };
    match index.entry(key) {
      Entry::Occupied(kept) => {
        tracing::warn!(kept = %kept.get(), ignored = %name, "several photos share one key");
      }
      Entry::Vacant(slot) => {
        slot.insert(name);
      }
    }
  }
  Ok(index)
}

fn io_error<'a>(op: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> Error + 'a {
  move |source| Error::Io { op, path: path.to_path_buf(), source }
}

// ─── PhotoStore impl ─────────────────────────────────────────────────────────

impl PhotoStore for FsPhotoStore {
  type Error = Error;
  type Reader = File;

  async fn save_expense_photo<'a, R>(
    &'a self,
    expense: &'a Expense,
    extension: &'a str,
    mut reader: R,
  ) -> Result<()>
  where
    R: AsyncRead + Unpin + Send + 'a,
  {
    let extension = normalize_extension(extension)
      .ok_or_else(|| Error::InvalidExtension(extension.to_owned()))?;
    let key = PhotoKey::for_expense(expense);
    let file_name = key.file_name(&extension);
    let path = self.dir.join(&file_name);

    // Stream into a hidden sibling and rename it into place, so a failed
    // upload never touches the photo already stored under this name.
    let partial = self.dir.join(format!(".{file_name}.partial"));
    let mut file = File::create(&partial).await.map_err(io_error("create", &partial))?;
    let written = async {
      let n = tokio::io::copy(&mut reader, &mut file).await?;
      file.flush().await?;
      Ok::<_, io::Error>(n)
    }
    .await;
    drop(file);

    let renamed = match written {
      Ok(n) => tokio::fs::rename(&partial, &path)
        .await
        .map(|()| n)
        .map_err(io_error("rename", &partial)),
      Err(source) => Err(Error::Io { op: "write", path: partial.clone(), source }),
    };
    let bytes = match renamed {
      Ok(n) => n,
      Err(e) => {
        if let Err(cleanup) = tokio::fs::remove_file(&partial).await
          && cleanup.kind() != io::ErrorKind::NotFound
        {
          tracing::warn!(path = %partial.display(), error = %cleanup, "could not remove partial photo");
        }
        return Err(e);
      }
    };

    // Keep one file per key: a different extension replaces the old file.
    if let Some(previous) = self.record(key, file_name.clone())
      && previous != file_name
    {
      let old = self.dir.join(&previous);
      if let Err(e) = tokio::fs::remove_file(&old).await
        && e.kind() != io::ErrorKind::NotFound
      {
        tracing::warn!(path = %old.display(), error = %e, "could not remove replaced photo");
      }
    }

    tracing::debug!(expense = %expense.id(), file = %file_name, bytes, "photo saved");
    Ok(())
  }

  async fn load_expense_photo<'a>(&'a self, expense: &'a Expense) -> Result<File> {
    let key = PhotoKey::for_expense(expense);
    let file_name = self.lookup(&key).ok_or(Error::NotFound(expense.id()))?;
    let path = self.dir.join(&file_name);

    match File::open(&path).await {
      Ok(file) => Ok(file),
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        tracing::warn!(path = %path.display(), "indexed photo has disappeared");
        self.forget(&key, &file_name);
        Err(Error::NotFound(expense.id()))
      }
      Err(source) => Err(Error::Io { op: "open", path, source }),
    }
  }

  fn photo_extension(&self, expense: &Expense) -> Option<String> {
    let file_name = self.lookup(&PhotoKey::for_expense(expense))?;
    let (_, extension) = PhotoKey::parse_file_name(&file_name)?;
    Some(extension.to_owned())
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
