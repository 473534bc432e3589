use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use tracing::info;

use std::str::FromStr;

use crate::errors::AppError;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::job::JobPosting;
use crate::models::user::User;
use crate::store::JobStore;

const JOB_COLUMNS: &str = "id, title, company, department, poster_id, job_type, experience_level, \
    description, required_skills, salary_range, posted_at, deadline, applicants";

const USER_COLUMNS: &str = "id, name, email, role, department, is_verified, graduation_year, \
    skills, education, experience, resume_file";

const APPLICATION_COLUMNS: &str =
    "id, job_id, student_id, student_name, status, applied_at, ai_match_score";

/// Decodes an enum column. A value the schema should have rejected means
/// the stored data is corrupt, which is a server fault rather than bad input.
fn decode<T>(column: &str, value: &str) -> Result<T, AppError>
where
    T: FromStr<Err = AppError>,
{
    value.parse().map_err(|e| {
        AppError::Internal(anyhow::anyhow!("Corrupt {column} value in database: {e}"))
    })
}

#[derive(Debug, FromRow)]
struct JobRow {
    id: String,
    title: String,
    company: String,
    department: String,
    poster_id: String,
    job_type: String,
    experience_level: String,
    description: String,
    required_skills: Vec<String>,
    salary_range: String,
    posted_at: NaiveDate,
    deadline: NaiveDate,
    applicants: Vec<String>,
}

impl TryFrom<JobRow> for JobPosting {
    type Error = AppError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        Ok(JobPosting {
            job_type: decode("jobs.job_type", &row.job_type)?,
            experience_level: decode("jobs.experience_level", &row.experience_level)?,
            id: row.id,
            title: row.title,
            company: row.company,
            department: row.department,
            poster_id: row.poster_id,
            description: row.description,
            required_skills: row.required_skills,
            salary_range: row.salary_range,
            posted_at: row.posted_at,
            deadline: row.deadline,
            applicants: row.applicants,
        })
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    role: String,
    department: Option<String>,
    is_verified: bool,
    graduation_year: Option<i32>,
    skills: Vec<String>,
    education: Vec<String>,
    experience: Option<String>,
    resume_file: Option<String>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            role: decode("users.role", &row.role)?,
            id: row.id,
            name: row.name,
            email: row.email,
            department: row.department,
            is_verified: row.is_verified,
            graduation_year: row.graduation_year,
            skills: row.skills,
            education: row.education,
            experience: row.experience,
            resume_file: row.resume_file,
        })
    }
}

#[derive(Debug, FromRow)]
struct ApplicationRow {
    id: String,
    job_id: String,
    student_id: String,
    student_name: Option<String>,
    status: String,
    applied_at: NaiveDate,
    ai_match_score: Option<i16>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = AppError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(Application {
            status: decode("applications.status", &row.status)?,
            ai_match_score: row.ai_match_score.and_then(|s| u8::try_from(s).ok()),
            id: row.id,
            job_id: row.job_id,
            student_id: row.student_id,
            student_name: row.student_name,
            applied_at: row.applied_at,
        })
    }
}

/// Maps the `(job_id, student_id)` unique violation to a validation error.
fn duplicate_application(e: sqlx::Error, application: &Application) -> AppError {
    match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Validation(format!(
            "{} has already applied to {}",
            application.student_id, application.job_id
        )),
        other => AppError::Database(other),
    }
}

fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, AppError>
where
    T: TryFrom<R, Error = AppError>,
{
    rows.into_iter().map(T::try_from).collect()
}

/// PostgreSQL-backed store. Closed enums are stored as their display strings
/// and re-validated when read back.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Opens a connection pool and applies pending migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        sqlx::migrate!().run(&pool).await?;

        info!("PostgreSQL pool established, migrations applied");
        Ok(Self { pool })
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn list_jobs(&self) -> Result<Vec<JobPosting>, AppError> {
        let rows: Vec<JobRow> =
            sqlx::query_as(&format!("SELECT {JOB_COLUMNS} FROM jobs ORDER BY seq"))
                .fetch_all(&self.pool)
                .await?;
        convert_all(rows)
    }

    async fn get_job(&self, id: &str) -> Result<Option<JobPosting>, AppError> {
        let row: Option<JobRow> =
            sqlx::query_as(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(JobPosting::try_from).transpose()
    }

    async fn add_job(&self, job: JobPosting) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO jobs
                (id, title, company, department, poster_id, job_type, experience_level,
                 description, required_skills, salary_range, posted_at, deadline, applicants)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(&job.id)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.department)
        .bind(&job.poster_id)
        .bind(job.job_type.as_str())
        .bind(job.experience_level.as_str())
        .bind(&job.description)
        .bind(&job.required_skills)
        .bind(&job.salary_range)
        .bind(job.posted_at)
        .bind(job.deadline)
        .bind(&job.applicants)
        .execute(&self.pool)
        .await?;

        info!("Inserted job {}", job.id);
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY seq"))
                .fetch_all(&self.pool)
                .await?;
        convert_all(rows)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(User::try_from).transpose()
    }

    async fn upsert_user(&self, user: User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users
                (id, name, email, role, department, is_verified, graduation_year,
                 skills, education, experience, resume_file)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                role = EXCLUDED.role,
                department = EXCLUDED.department,
                is_verified = EXCLUDED.is_verified,
                graduation_year = EXCLUDED.graduation_year,
                skills = EXCLUDED.skills,
                education = EXCLUDED.education,
                experience = EXCLUDED.experience,
                resume_file = EXCLUDED.resume_file
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(&user.department)
        .bind(user.is_verified)
        .bind(user.graduation_year)
        .bind(&user.skills)
        .bind(&user.education)
        .bind(&user.experience)
        .bind(&user.resume_file)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_applications(&self) -> Result<Vec<Application>, AppError> {
        let rows: Vec<ApplicationRow> = sqlx::query_as(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications ORDER BY seq"
        ))
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn add_application(&self, application: Application) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO applications
                (id, job_id, student_id, student_name, status, applied_at, ai_match_score)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&application.id)
        .bind(&application.job_id)
        .bind(&application.student_id)
        .bind(&application.student_name)
        .bind(application.status.as_str())
        .bind(application.applied_at)
        .bind(application.ai_match_score.map(i16::from))
        .execute(&mut *tx)
        .await
        .map_err(|e| duplicate_application(e, &application))?;

        sqlx::query(
            r#"
            UPDATE jobs
            SET applicants = array_append(applicants, $1)
            WHERE id = $2 AND NOT ($1 = ANY(applicants))
            "#,
        )
        .bind(&application.student_id)
        .bind(&application.job_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn set_application_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<Application, AppError> {
        let row: Option<ApplicationRow> = sqlx::query_as(&format!(
            "UPDATE applications SET status = $1 WHERE id = $2 RETURNING {APPLICATION_COLUMNS}"
        ))
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?
            .try_into()
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }
}
