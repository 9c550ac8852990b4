//! [`SqliteStore`]: the SQLite implementation of [`LedgerStore`].

use std::path::Path;

use ledger_core::{
  Expense,
  reference::{ReferenceKind, SeedData},
  store::LedgerStore,
};
use rusqlite::{OptionalExtension as _, TransactionBehavior};

use crate::{
  Error, Result,
  encode::{RawExpense, encode_dt, encode_uuid},
  error::DbContext as _,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An expense ledger backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// What an insert transaction found, decided inside the connection thread.
enum InsertOutcome {
  Inserted,
  NoSuchPayer,
  NoSuchCategory,
  Conflict,
}

fn table(kind: ReferenceKind) -> &'static str {
  match kind {
    ReferenceKind::Payer => "payer",
    ReferenceKind::Category => "category",
  }
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
  e.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation)
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .context("open database", path.display())?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .context("open database", ":memory:")?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .context("initialise schema", "user_version 1")
  }

  /// Register the configured payers and categories.
  ///
  /// Names that already exist are skipped, so this is safe to run on every
  /// startup. Returns how many rows were added.
  pub async fn seed(&self, seed: &SeedData) -> Result<usize> {
    if let Some(kind) = empty_name_in(seed) {
      return Err(Error::EmptyName(kind));
    }

    let payers = seed.payers.clone();
    let categories = seed.categories.clone();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut added = 0;
        for (kind, names) in [
          (ReferenceKind::Payer, &payers),
          (ReferenceKind::Category, &categories),
        ] {
          let sql = format!("INSERT OR IGNORE INTO {} (name) VALUES (?1)", table(kind));
          let mut stmt = tx.prepare(&sql)?;
          for name in names {
            added += stmt.execute(rusqlite::params![name])?;
          }
        }
        tx.commit()?;
        Ok(added)
      })
      .await
      .context(
        "seed reference data",
        format!("{} payers, {} categories", seed.payers.len(), seed.categories.len()),
      )
  }

  async fn create_reference(&self, kind: ReferenceKind, name: &str) -> Result<()> {
    if name.is_empty() {
      return Err(Error::EmptyName(kind));
    }

    let owned = name.to_owned();
    let inserted = self
      .conn
      .call(move |conn| {
        let sql = format!("INSERT INTO {} (name) VALUES (?1)", table(kind));
        match conn.execute(&sql, rusqlite::params![owned]) {
          Ok(_) => Ok(true),
          Err(e) if is_constraint_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await
      .context("create reference row", format!("{kind} '{name}'"))?;

    if inserted {
      Ok(())
    } else {
      Err(Error::DuplicateName { kind, name: name.to_owned() })
    }
  }

  async fn list_reference(&self, kind: ReferenceKind) -> Result<Vec<String>> {
    self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT name FROM {} ORDER BY id", table(kind));
        let mut stmt = conn.prepare(&sql)?;
        let names = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
      })
      .await
      .context("list reference rows", kind)
  }
}

fn empty_name_in(seed: &SeedData) -> Option<ReferenceKind> {
  if seed.payers.iter().any(String::is_empty) {
    Some(ReferenceKind::Payer)
  } else if seed.categories.iter().any(String::is_empty) {
    Some(ReferenceKind::Category)
  } else {
    None
  }
}

// ─── LedgerStore impl ────────────────────────────────────────────────────────

impl LedgerStore for SqliteStore {
  type Error = Error;

  // ── Expenses ──────────────────────────────────────────────────────────────

  async fn insert<'a>(&'a self, expense: &'a Expense) -> Result<()> {
    let id_str         = encode_uuid(expense.id());
    let description    = expense.description().to_owned();
    let payer          = expense.payer().to_owned();
    let category       = expense.category().to_owned();
    let amount         = expense.amount().to_owned();
    let currency       = expense.currency().to_owned();
    let created_at_str = encode_dt(expense.created_at());

    // Lookups and the write share one immediate transaction: either the row
    // lands with valid references or nothing changes.
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let payer_id: Option<i64> = tx
          .query_row(
            "SELECT id FROM payer WHERE name = ?1",
            rusqlite::params![payer],
            |r| r.get(0),
          )
          .optional()?;
        let Some(payer_id) = payer_id else {
          return Ok(InsertOutcome::NoSuchPayer);
        };

        let category_id: Option<i64> = tx
          .query_row(
            "SELECT id FROM category WHERE name = ?1",
            rusqlite::params![category],
            |r| r.get(0),
          )
          .optional()?;
        let Some(category_id) = category_id else {
          return Ok(InsertOutcome::NoSuchCategory);
        };

        let taken = tx
          .query_row(
            "SELECT 1 FROM expense WHERE id = ?1",
            rusqlite::params![id_str],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(InsertOutcome::Conflict);
        }

        tx.execute(
          "INSERT INTO expense (
             id, description, payer_id, category_id, amount, currency, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            description,
            payer_id,
            category_id,
            amount,
            currency,
            created_at_str,
          ],
        )?;
        tx.commit()?;
        Ok(InsertOutcome::Inserted)
      })
      .await
      .context("insert expense", expense.id())?;

    match outcome {
      InsertOutcome::Inserted => Ok(()),
      InsertOutcome::NoSuchPayer => Err(Error::NoSuchPayer(expense.payer().to_owned())),
      InsertOutcome::NoSuchCategory => {
        Err(Error::NoSuchCategory(expense.category().to_owned()))
      }
      InsertOutcome::Conflict => Err(Error::Conflict(expense.id())),
    }
  }

  async fn remove_expense<'a>(&'a self, expense: &'a Expense) -> Result<()> {
    let id_str = encode_uuid(expense.id());

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM expense WHERE id = ?1", rusqlite::params![id_str])?)
      })
      .await
      .context("remove expense", expense.id())?;

    if deleted == 0 {
      return Err(Error::ExpenseNotFound(expense.id()));
    }
    Ok(())
  }

  async fn select_expenses(&self) -> Result<Vec<Expense>> {
    let raws: Vec<RawExpense> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT
             e.id, e.description, p.name, c.name,
             e.amount, e.currency, e.created_at
           FROM expense e
           JOIN payer    p ON p.id = e.payer_id
           JOIN category c ON c.id = e.category_id
           ORDER BY e.created_at DESC, e.rowid ASC",
        )?;

        let rows = stmt
          .query_map([], |row| {
            Ok(RawExpense {
              id:          row.get(0)?,
              description: row.get(1)?,
              payer:       row.get(2)?,
              category:    row.get(3)?,
              amount:      row.get(4)?,
              currency:    row.get(5)?,
              created_at:  row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await
      .context("select expenses", "*")?;

    raws.into_iter().map(RawExpense::into_expense).collect()
  }

  // ── Reference data ────────────────────────────────────────────────────────

  async fn create_payer<'a>(&'a self, name: &'a str) -> Result<()> {
    self.create_reference(ReferenceKind::Payer, name).await
  }

  async fn create_category<'a>(&'a self, name: &'a str) -> Result<()> {
    self.create_reference(ReferenceKind::Category, name).await
  }

  async fn list_payers(&self) -> Result<Vec<String>> {
    self.list_reference(ReferenceKind::Payer).await
  }

  async fn list_categories(&self) -> Result<Vec<String>> {
    self.list_reference(ReferenceKind::Category).await
  }
}
