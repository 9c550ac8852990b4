//! Expense: the validated record of a single spend event.
//!
//! An [`Expense`] can only be obtained through [`ExpenseBuilder::build`], so
//! every value in circulation satisfies the field invariants. Expenses are
//! immutable; there are no setters.

use std::fmt;

use chrono::{DateTime, Datelike as _, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Earliest accepted `created_at` year.
pub const MIN_YEAR: i32 = 1;

/// Latest accepted `created_at` year. Past it RFC 3339 needs a sign and more
/// than four digits, which no longer sorts or parses as stored text.
pub const MAX_YEAR: i32 = 9999;

// ─── Fields ──────────────────────────────────────────────────────────────────

/// Names the fields of an expense, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseField {
  Id,
  Description,
  Payer,
  Category,
  Amount,
  Currency,
  CreatedAt,
}

impl ExpenseField {
  pub fn as_str(self) -> &'static str {
    match self {
      ExpenseField::Id => "id",
      ExpenseField::Description => "description",
      ExpenseField::Payer => "payer",
      ExpenseField::Category => "category",
      ExpenseField::Amount => "amount",
      ExpenseField::Currency => "currency",
      ExpenseField::CreatedAt => "created_at",
    }
  }
}

impl fmt::Display for ExpenseField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Expense ─────────────────────────────────────────────────────────────────

/// A validated expense.
///
/// `amount` is kept exactly as entered; the ledger never does arithmetic on
/// it. Equality compares all seven fields, the timestamp by instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expense {
  id:          Uuid,
  description: String,
  payer:       String,
  category:    String,
  amount:      String,
  currency:    String,
  created_at:  DateTime<Utc>,
}

impl Expense {
  pub fn id(&self) -> Uuid { self.id }

  pub fn description(&self) -> &str { &self.description }

  pub fn payer(&self) -> &str { &self.payer }

  pub fn category(&self) -> &str { &self.category }

  pub fn amount(&self) -> &str { &self.amount }

  pub fn currency(&self) -> &str { &self.currency }

  pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
}

// ─── Builder ─────────────────────────────────────────────────────────────────

/// Unvalidated expense input.
///
/// An empty `id` asks for a freshly generated one. A missing `created_at`
/// counts as the zero timestamp.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExpenseBuilder {
  pub id:          String,
  pub description: String,
  pub payer:       String,
  pub category:    String,
  pub amount:      String,
  pub currency:    String,
  pub created_at:  Option<DateTime<Utc>>,
}

impl ExpenseBuilder {
  /// Validate the input and produce an [`Expense`].
  ///
  /// Fields are checked in a fixed order (id, description, payer, category,
  /// amount, currency, created_at) and the first failure is returned.
  pub fn build(self) -> Result<Expense, ValidationError> {
    let id = parse_id(&self.id)?;

    let text_fields = [
      (ExpenseField::Description, &self.description),
      (ExpenseField::Payer, &self.payer),
      (ExpenseField::Category, &self.category),
      (ExpenseField::Amount, &self.amount),
      (ExpenseField::Currency, &self.currency),
    ];
    if let Some((field, _)) = text_fields.iter().find(|(_, v)| v.is_empty()) {
      return Err(ValidationError::Empty(*field));
    }

    let created_at = match self.created_at {
      Some(at) if at != DateTime::<Utc>::UNIX_EPOCH => at,
      _ => return Err(ValidationError::ZeroTimestamp),
    };
    if !(MIN_YEAR..=MAX_YEAR).contains(&created_at.year()) {
      return Err(ValidationError::YearOutOfRange(created_at.year()));
    }

    Ok(Expense {
      id,
      description: self.description,
      payer: self.payer,
      category: self.category,
      amount: self.amount,
      currency: self.currency,
      created_at,
    })
  }
}

fn parse_id(id: &str) -> Result<Uuid, ValidationError> {
  if id.is_empty() {
    return Ok(Uuid::new_v4());
  }
  Uuid::parse_str(id).map_err(|e| ValidationError::InvalidId {
    input:  id.to_owned(),
    reason: e.to_string(),
  })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
