//! `GET /expenses/:id/photo`: stream an expense's photo.

use axum::{
  body::Body,
  extract::{Path, State},
  http::header,
  response::{IntoResponse, Response},
};
use ledger_core::{photo::PhotoStore, store::LedgerStore};
use ledger_photos::extension::media_type_for_extension;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::{AppState, error::ApiError, handlers::find_expense};

/// 404 if the expense is unknown or has no photo.
pub async fn download<S, P>(
  State(state): State<AppState<S, P>>,
  Path(id): Path<Uuid>,
) -> Result<Response, ApiError>
where
  S: LedgerStore,
  P: PhotoStore,
{
  let expense = find_expense(state.store.as_ref(), id).await?;
  let reader = state
    .photos
    .load_expense_photo(&expense)
    .await
    .map_err(ApiError::from_store)?;

  let extension = state.photos.photo_extension(&expense).unwrap_or_default();
  let content_type = media_type_for_extension(&extension);

  Ok(
    (
      [(header::CONTENT_TYPE, content_type)],
      Body::from_stream(ReaderStream::new(reader)),
    )
      .into_response(),
  )
}
