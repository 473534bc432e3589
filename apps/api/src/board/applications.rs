use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::user::UserRole;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ApplicationQuery {
    pub job_id: Option<String>,
    pub status: Option<String>,
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(query): Query<ApplicationQuery>,
) -> Result<Json<Vec<Application>>, AppError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<ApplicationStatus>)
        .transpose()?;

    let applications = state
        .store
        .list_applications()
        .await?
        .into_iter()
        .filter(|a| query.job_id.as_deref().map_or(true, |j| a.job_id == j))
        .filter(|a| status.map_or(true, |s| a.status == s))
        .collect();

    Ok(Json(applications))
}

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub job_id: String,
    pub student_id: String,
}

/// POST /api/v1/applications
///
/// A student applies to a job. The AI match score is best effort: when the
/// service is unavailable the application is stored without one.
pub async fn handle_apply(
    State(state): State<AppState>,
    Json(request): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let job = state
        .store
        .get_job(&request.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", request.job_id)))?;

    let student = state
        .store
        .get_user(&request.student_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", request.student_id)))?;

    if student.role != UserRole::Student {
        return Err(AppError::Forbidden("Only students can apply to jobs".to_string()));
    }

    let already_applied = state
        .store
        .list_applications()
        .await?
        .iter()
        .any(|a| a.job_id == job.id && a.student_id == student.id);
    if already_applied {
        return Err(AppError::Validation(format!(
            "{} has already applied to {}",
            student.id, job.id
        )));
    }

    let ai_match_score = match state
        .ai
        .match_score(&student.profile_text(), &job.match_text())
        .await
    {
        Ok(score) => Some(score),
        Err(e) => {
            warn!("Match score unavailable for {} on {}: {e}", student.id, job.id);
            None
        }
    };

    let application = Application {
        id: Uuid::new_v4().to_string(),
        job_id: job.id,
        student_id: student.id,
        student_name: Some(student.name),
        status: ApplicationStatus::Applied,
        applied_at: Utc::now().date_naive(),
        ai_match_score,
    };
    state.store.add_application(application.clone()).await?;

    info!(
        "Application {} submitted for job {}",
        application.id, application.job_id
    );
    Ok((StatusCode::CREATED, Json(application)))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}

/// PATCH /api/v1/applications/:id/status
///
/// Moves a candidate between columns of the tracking board.
pub async fn handle_set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Application>, AppError> {
    let application = state
        .store
        .set_application_status(&id, update.status)
        .await?;
    info!("Application {id} moved to {}", update.status.as_str());
    Ok(Json(application))
}
