//! Handlers for `/expenses` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/expenses` | Newest first |
//! | `POST`   | `/expenses` | `multipart/form-data`, optional `photo` part |
//! | `DELETE` | `/expenses/:id` | 404 if not found |

use axum::{
  Json,
  body::Bytes,
  extract::{Multipart, Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use ledger_core::{Expense, ExpenseBuilder, photo::PhotoStore, store::LedgerStore};
use ledger_photos::extension::resolve_extension;
use uuid::Uuid;

use crate::{AppState, error::ApiError, handlers::find_expense};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /expenses`
pub async fn list<S, P>(
  State(state): State<AppState<S, P>>,
) -> Result<Json<Vec<Expense>>, ApiError>
where
  S: LedgerStore,
  P: PhotoStore,
{
  let expenses = state.store.select_expenses().await.map_err(ApiError::from_store)?;
  Ok(Json(expenses))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// A photo part, buffered until the expense row exists.
struct Upload {
  extension: String,
  bytes:     Bytes,
}

#[derive(Default)]
struct ExpenseForm {
  builder: ExpenseBuilder,
  photo:   Option<Upload>,
}

impl ExpenseForm {
  async fn read(multipart: &mut Multipart) -> Result<Self, ApiError> {
    let mut form = Self::default();
    while let Some(field) = multipart.next_field().await? {
      let Some(name) = field.name().map(str::to_owned) else {
        continue;
      };
      match name.as_str() {
        "photo" => {
          // A file input left empty arrives as a part without a filename.
          if field.file_name().is_none_or(str::is_empty) {
            continue;
          }
          let extension = resolve_extension(field.content_type(), field.file_name());
          let bytes = field.bytes().await?;
          form.photo = Some(Upload { extension, bytes });
        }
        "description" => form.builder.description = field.text().await?,
        "payer" | "author" => form.builder.payer = field.text().await?,
        "category" => form.builder.category = field.text().await?,
        "amount" => form.builder.amount = field.text().await?,
        "currency" => form.builder.currency = field.text().await?,
        _ => tracing::debug!(field = %name, "ignoring unknown form field"),
      }
    }
    Ok(form)
  }
}

/// `POST /expenses`
///
/// The expense is stamped with the current time. When a photo is attached and
/// cannot be saved, the freshly inserted expense is removed again.
pub async fn create<S, P>(
  State(state): State<AppState<S, P>>,
  mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError>
where
  S: LedgerStore,
  P: PhotoStore,
{
  let ExpenseForm { mut builder, photo } = ExpenseForm::read(&mut multipart).await?;
  builder.created_at = Some(Utc::now());
  let expense = builder.build().map_err(ApiError::from_store)?;

  state.store.insert(&expense).await.map_err(ApiError::from_store)?;

  if let Some(Upload { extension, bytes }) = photo {
    let saved = state
      .photos
      .save_expense_photo(&expense, &extension, &bytes[..])
      .await;
    if let Err(e) = saved {
      if let Err(rollback) = state.store.remove_expense(&expense).await {
        tracing::error!(
          expense = %expense.id(),
          error = %rollback,
          "could not remove expense after failed photo upload",
        );
      }
      return Err(ApiError::from_store(e));
    }
  }

  tracing::info!(expense = %expense.id(), payer = expense.payer(), "expense added");
  Ok((StatusCode::CREATED, Json(expense)))
}

// ─── Remove ───────────────────────────────────────────────────────────────────

/// `DELETE /expenses/:id`
///
/// The photo, if any, stays on disk.
pub async fn remove<S, P>(
  State(state): State<AppState<S, P>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: LedgerStore,
  P: PhotoStore,
{
  let expense = find_expense(state.store.as_ref(), id).await?;
  state.store.remove_expense(&expense).await.map_err(ApiError::from_store)?;
  tracing::info!(expense = %id, "expense removed");
  Ok(StatusCode::NO_CONTENT)
}
