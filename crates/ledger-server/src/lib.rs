//! JSON HTTP surface for the expense ledger.
//!
//! Exposes an axum [`Router`] backed by any [`LedgerStore`] for expenses and
//! reference data, and any [`PhotoStore`] for attachments. Auth and TLS are
//! the deployment's responsibility.

pub mod error;
pub mod handlers;
pub mod settings;

pub use error::ApiError;
pub use settings::{Overrides, ServerConfig};

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{delete, get},
};
use ledger_core::{photo::PhotoStore, store::LedgerStore};

use handlers::{expenses, photos, reference};

/// Largest accepted request body, photo included.
pub const MAX_BODY_BYTES: usize = 10 << 20;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, P> {
  pub store:  Arc<S>,
  pub photos: Arc<P>,
}

impl<S, P> AppState<S, P> {
  pub fn new(store: S, photos: P) -> Self {
    Self { store: Arc::new(store), photos: Arc::new(photos) }
  }
}

// Manual impl: the backends themselves need not be `Clone`.
impl<S, P> Clone for AppState<S, P> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), photos: Arc::clone(&self.photos) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the ledger [`Router`].
///
/// Request tracing is left to the caller so tests stay quiet; the binary adds
/// a `TraceLayer` on top.
pub fn router<S, P>(state: AppState<S, P>) -> Router
where
  S: LedgerStore + 'static,
  P: PhotoStore + 'static,
{
  Router::new()
    // Expenses
    .route("/expenses", get(expenses::list::<S, P>).post(expenses::create::<S, P>))
    .route("/expenses/{id}", delete(expenses::remove::<S, P>))
    .route("/expenses/{id}/photo", get(photos::download::<S, P>))
    // Reference data
    .route(
      "/payers",
      get(reference::list_payers::<S, P>).post(reference::create_payer::<S, P>),
    )
    .route(
      "/categories",
      get(reference::list_categories::<S, P>).post(reference::create_category::<S, P>),
    )
    .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
    .with_state(state)
}

#[cfg(test)]
mod tests;
