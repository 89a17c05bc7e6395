use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::main_lib::AppState;

/// The static override table in use, keyed by uppercased symbol.
async fn list_overrides(State(state): State<Arc<AppState>>) -> Json<BTreeMap<String, String>> {
    let table = state
        .resolver
        .static_overrides()
        .iter()
        .map(|(symbol, id)| (symbol.to_string(), id.to_string()))
        .collect();
    Json(table)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/overrides", get(list_overrides))
}
