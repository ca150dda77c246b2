use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::{ChartParams, ChartResponse};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:coin", get(get_chart))
}

pub async fn get_chart(
    Path(coin): Path<String>,
    Query(params): Query<ChartParams>,
    State(state): State<AppState>,
) -> Result<Json<ChartResponse>, AppError> {
    info!(
        "GET /api/charts/{} - days={} window={} limit={}",
        coin, params.days, params.window, params.limit
    );
    let chart = services::chart_service::get_chart(state.provider.as_ref(), &coin, &params)
        .await
        .map_err(|e| {
            match &e {
                AppError::RateLimited => warn!("Rate limited while charting {}", coin),
                _ => error!("Failed to build chart for {}: {}", coin, e),
            }
            e
        })?;
    Ok(Json(chart))
}
