//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings with nanosecond
//! precision, so lexical order in SQL equals chronological order. That holds
//! for four-digit years only, which `ExpenseBuilder` guarantees. UUIDs are
//! stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use ledger_core::{Expense, ExpenseBuilder};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read from an `expense` row joined with `payer` and `category`.
#[derive(Debug)]
pub struct RawExpense {
  pub id:          String,
  pub description: String,
  pub payer:       String,
  pub category:    String,
  pub amount:      String,
  pub currency:    String,
  pub created_at:  String,
}

impl RawExpense {
  /// Rebuild the expense through the validating builder, so a row that was
  /// tampered with outside the store surfaces as [`Error::Corrupt`].
  pub fn into_expense(self) -> Result<Expense> {
    let created_at = decode_dt(&self.created_at)?;
    let id = self.id.clone();

    ExpenseBuilder {
      id:          self.id,
      description: self.description,
      payer:       self.payer,
      category:    self.category,
      amount:      self.amount,
      currency:    self.currency,
      created_at:  Some(created_at),
    }
    .build()
    .map_err(|source| Error::Corrupt { id, source })
  }
}
