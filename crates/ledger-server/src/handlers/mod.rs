//! Route handlers, one module per resource.

pub mod expenses;
pub mod photos;
pub mod reference;

use ledger_core::{Expense, store::LedgerStore};
use uuid::Uuid;

use crate::ApiError;

/// Look an expense up by id among the stored ones.
pub(crate) async fn find_expense<S: LedgerStore>(store: &S, id: Uuid) -> Result<Expense, ApiError> {
  store
    .select_expenses()
    .await
    .map_err(ApiError::from_store)?
    .into_iter()
    .find(|e| e.id() == id)
    .ok_or_else(|| ApiError::NotFound(format!("expense '{id}' not found")))
}
