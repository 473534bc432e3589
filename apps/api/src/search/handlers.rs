use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::job::JobPosting;
use crate::search::criteria::{SearchCriteria, SearchParams};
use crate::search::filter::search_jobs;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub criteria: SearchCriteria,
    pub total: usize,
    pub jobs: Vec<JobPosting>,
}

/// GET /api/v1/jobs
///
/// Filters the catalogue. Unset or `All` parameters are unconstrained;
/// negative windows or thresholds are rejected with 400.
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let criteria = SearchCriteria::try_from(params)?;
    let jobs = search_jobs(state.store.as_ref(), &criteria).await?;

    Ok(Json(SearchResponse {
        total: jobs.len(),
        criteria,
        jobs,
    }))
}
