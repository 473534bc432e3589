use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::{ExperienceLevel, JobPosting, JobType};
use crate::state::AppState;

/// Skills arrive either as a list or as the raw comma-separated form field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Csv(String),
}

impl SkillsInput {
    fn into_skills(self) -> Vec<String> {
        let raw = match self {
            SkillsInput::List(items) => items,
            SkillsInput::Csv(line) => line.split(',').map(String::from).collect(),
        };
        raw.into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub poster_id: String,
    pub title: String,
    pub company: String,
    pub department: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub experience_level: String,
    #[serde(default)]
    pub description: String,
    pub required_skills: Option<SkillsInput>,
    #[serde(default)]
    pub salary_range: String,
    pub deadline: NaiveDate,
}

fn require_text(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(value.to_string())
}

/// Validates a posting form into a `JobPosting` dated `today`.
pub fn build_job(request: CreateJobRequest, today: NaiveDate) -> Result<JobPosting, AppError> {
    let job_type: JobType = request.job_type.parse()?;
    let experience_level: ExperienceLevel = request.experience_level.parse()?;

    if request.deadline < today {
        return Err(AppError::Validation(
            "deadline cannot be in the past".to_string(),
        ));
    }

    Ok(JobPosting {
        id: Uuid::new_v4().to_string(),
        title: require_text("title", &request.title)?,
        company: require_text("company", &request.company)?,
        department: require_text("department", &request.department)?,
        poster_id: request.poster_id,
        job_type,
        experience_level,
        description: request.description.trim().to_string(),
        required_skills: request
            .required_skills
            .map(SkillsInput::into_skills)
            .unwrap_or_default(),
        salary_range: request.salary_range.trim().to_string(),
        posted_at: today,
        deadline: request.deadline,
        applicants: vec![],
    })
}

/// POST /api/v1/jobs
///
/// Only verified alumni may post.
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobPosting>), AppError> {
    let poster = state
        .store
        .get_user(&request.poster_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", request.poster_id)))?;

    if !poster.can_post_jobs() {
        return Err(AppError::Forbidden(
            "Only verified alumni can post jobs".to_string(),
        ));
    }

    let job = build_job(request, Utc::now().date_naive())?;
    state.store.add_job(job.clone()).await?;

    info!("User {} posted job {} ({})", poster.id, job.id, job.title);
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobPosting>, AppError> {
    state
        .store
        .get_job(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}
