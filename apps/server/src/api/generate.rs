use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};
use coinlink_market_data::ManualOverrides;
use tracing::info;

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{GenerateRequest, TickerLink},
};

/// Resolve a comma-separated ticker list to coin ids and links.
async fn generate(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<TickerLink>>> {
    let Json(request) = body?;
    let tickers = request.tickers();
    let manual = ManualOverrides::parse(&request.manual_overrides);

    let results = state.resolver.resolve(&tickers, &manual).await;
    let found = results.iter().filter(|r| r.is_found()).count();
    info!("Resolved {}/{} tickers", found, results.len());

    Ok(Json(results.into_iter().map(TickerLink::from).collect()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/generate", post(generate))
}
