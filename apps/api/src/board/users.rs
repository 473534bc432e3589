use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use tracing::{info, warn};

use crate::ai::ParsedResume;
use crate::errors::AppError;
use crate::models::application::Application;
use crate::models::job::JobPosting;
use crate::models::user::{User, UserRole};
use crate::state::AppState;

/// GET /api/v1/users
pub async fn handle_list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.store.list_users().await?))
}

fn validate_user(user: &User) -> Result<(), AppError> {
    if user.id.trim().is_empty() {
        return Err(AppError::Validation("id cannot be empty".to_string()));
    }
    if user.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    if !user.email.contains('@') {
        return Err(AppError::Validation(format!(
            "'{}' is not a valid email",
            user.email
        )));
    }
    Ok(())
}

/// PUT /api/v1/users
///
/// Registers a new user or replaces an existing profile.
pub async fn handle_upsert_user(
    State(state): State<AppState>,
    Json(user): Json<User>,
) -> Result<Json<User>, AppError> {
    validate_user(&user)?;
    state.store.upsert_user(user.clone()).await?;
    Ok(Json(user))
}

/// POST /api/v1/users/:id/verify
///
/// Admin approval for an alumni account, unlocking job posting.
pub async fn handle_verify_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let mut user = state
        .store
        .get_user(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;

    if user.role != UserRole::Alumni {
        return Err(AppError::Validation(format!(
            "Only alumni accounts can be verified ({id} is {})",
            user.role.as_str()
        )));
    }

    user.is_verified = true;
    state.store.upsert_user(user.clone()).await?;
    info!("Verified alumni {id}");
    Ok(Json(user))
}

/// Overwrites profile fields with whatever the parser actually found.
pub fn merge_resume(user: &mut User, parsed: ParsedResume, file_name: Option<String>) {
    if !parsed.skills.is_empty() {
        user.skills = parsed.skills;
    }
    if !parsed.experience.trim().is_empty() {
        user.experience = Some(parsed.experience);
    }
    if !parsed.education.is_empty() {
        user.education = parsed.education;
    }
    if file_name.is_some() {
        user.resume_file = file_name;
    }
}

/// POST /api/v1/users/:id/resume  (multipart, field `file`)
///
/// Parses the uploaded resume with the AI service and persists the extracted
/// skills, experience and education on the profile.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<User>, AppError> {
    let mut user = state
        .store
        .get_user(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(String::from);
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
        upload = Some((file_name, mime_type, bytes));
        break;
    }

    let (file_name, mime_type, bytes) =
        upload.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;

    let parsed = state
        .ai
        .parse_resume(&bytes, &mime_type)
        .await
        .map_err(|e| {
            warn!("Resume parsing failed for {id}: {e}");
            AppError::from(e)
        })?;

    merge_resume(&mut user, parsed, file_name);
    state.store.upsert_user(user.clone()).await?;

    info!("Updated profile of {id} from resume");
    Ok(Json(user))
}

const RECOMMENDATION_LIMIT: usize = 3;

/// Jobs sharing at least one required skill with `user` (exact match) that
/// the user has not applied to yet, in catalogue order.
pub fn recommend_jobs(
    user: &User,
    jobs: Vec<JobPosting>,
    applications: &[Application],
    limit: usize,
) -> Vec<JobPosting> {
    jobs.into_iter()
        .filter(|job| job.required_skills.iter().any(|s| user.skills.contains(s)))
        .filter(|job| {
            !applications
                .iter()
                .any(|a| a.student_id == user.id && a.job_id == job.id)
        })
        .take(limit)
        .collect()
}

/// GET /api/v1/users/:id/recommendations
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<JobPosting>>, AppError> {
    let user = state
        .store
        .get_user(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;

    let jobs = state.store.list_jobs().await?;
    let applications = state.store.list_applications().await?;
    Ok(Json(recommend_jobs(
        &user,
        jobs,
        &applications,
        RECOMMENDATION_LIMIT,
    )))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::application::ApplicationStatus;
    use crate::models::job::{ExperienceLevel, JobType};

    fn job(id: &str, skills: &[&str]) -> JobPosting {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        JobPosting {
            id: id.to_string(),
            title: format!("Role {id}"),
            company: "Acme".to_string(),
            department: "CSE".to_string(),
            poster_id: "u2".to_string(),
            job_type: JobType::Remote,
            experience_level: ExperienceLevel::Entry,
            description: String::new(),
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
            salary_range: String::new(),
            posted_at: day,
            deadline: day,
            applicants: vec![],
        }
    }

    fn applied(job_id: &str, student_id: &str) -> Application {
        Application {
            id: format!("a-{job_id}"),
            job_id: job_id.to_string(),
            student_id: student_id.to_string(),
            student_name: None,
            status: ApplicationStatus::Applied,
            applied_at: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            ai_match_score: None,
        }
    }

    fn student() -> User {
        User {
            id: "u1".to_string(),
            name: "Alice Student".to_string(),
            email: "alice@ruet.ac.bd".to_string(),
            role: UserRole::Student,
            department: Some("CSE".to_string()),
            is_verified: false,
            graduation_year: Some(2024),
            skills: vec!["JavaScript".to_string()],
            education: vec!["B.Sc. in CSE - RUET (2024)".to_string()],
            experience: Some("Fresher".to_string()),
            resume_file: None,
        }
    }

    #[test]
    fn test_merge_keeps_fields_parser_missed() {
        let mut user = student();
        let parsed = ParsedResume {
            skills: vec!["Rust".to_string(), "SQL".to_string()],
            experience: "  ".to_string(),
            education: vec![],
        };
        merge_resume(&mut user, parsed, Some("cv.pdf".to_string()));

        assert_eq!(user.skills, vec!["Rust", "SQL"]);
        assert_eq!(user.experience.as_deref(), Some("Fresher"));
        assert_eq!(user.education, vec!["B.Sc. in CSE - RUET (2024)"]);
        assert_eq!(user.resume_file.as_deref(), Some("cv.pdf"));
    }

    #[test]
    fn test_validate_user_rejects_bad_email() {
        let mut user = student();
        user.email = "alice".to_string();
        assert!(matches!(validate_user(&user), Err(AppError::Validation(_))));
        assert!(validate_user(&student()).is_ok());
    }

    #[test]
    fn test_recommend_skips_applied_and_caps() {
        let mut user = student();
        user.skills = vec!["Rust".to_string(), "SQL".to_string()];
        let jobs = vec![
            job("j1", &["Rust"]),
            job("j2", &["Go"]),
            job("j3", &["SQL", "Excel"]),
            job("j4", &["Rust"]),
            job("j5", &["SQL"]),
            job("j6", &["Rust"]),
        ];
        let applications = vec![applied("j3", "u1"), applied("j4", "u9")];

        let ids: Vec<String> = recommend_jobs(&user, jobs, &applications, 3)
            .into_iter()
            .map(|j| j.id)
            .collect();
        assert_eq!(ids, vec!["j1", "j4", "j5"]);
    }

    #[test]
    fn test_recommend_skill_match_is_exact() {
        let mut user = student();
        user.skills = vec!["rust".to_string()];
        assert!(recommend_jobs(&user, vec![job("j1", &["Rust"])], &[], 3).is_empty());

        user.skills.clear();
        assert!(recommend_jobs(&user, vec![job("j1", &["Rust"])], &[], 3).is_empty());
    }
}
