//! Handlers for `/payers` and `/categories`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/payers`, `/categories` | Names in registration order |
//! | `POST` | `/payers`, `/categories` | Body: `{"name":"mat"}`; 409 on duplicate |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use ledger_core::{photo::PhotoStore, store::LedgerStore};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize, Serialize)]
pub struct NameBody {
  pub name: String,
}

/// `GET /payers`
pub async fn list_payers<S, P>(
  State(state): State<AppState<S, P>>,
) -> Result<Json<Vec<String>>, ApiError>
where
  S: LedgerStore,
  P: PhotoStore,
{
  let payers = state.store.list_payers().await.map_err(ApiError::from_store)?;
  Ok(Json(payers))
}

/// `POST /payers`
pub async fn create_payer<S, P>(
  State(state): State<AppState<S, P>>,
  Json(body): Json<NameBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LedgerStore,
  P: PhotoStore,
{
  state.store.create_payer(&body.name).await.map_err(ApiError::from_store)?;
  tracing::info!(name = %body.name, "payer created");
  Ok((StatusCode::CREATED, Json(body)))
}

/// `GET /categories`
pub async fn list_categories<S, P>(
  State(state): State<AppState<S, P>>,
) -> Result<Json<Vec<String>>, ApiError>
where
  S: LedgerStore,
  P: PhotoStore,
{
  let categories = state.store.list_categories().await.map_err(ApiError::from_store)?;
  Ok(Json(categories))
}

/// `POST /categories`
pub async fn create_category<S, P>(
  State(state): State<AppState<S, P>>,
  Json(body): Json<NameBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LedgerStore,
  P: PhotoStore,
{
  state.store.create_category(&body.name).await.map_err(ApiError::from_store)?;
  tracing::info!(name = %body.name, "category created");
  Ok((StatusCode::CREATED, Json(body)))
}
