//! Persistence port. Handlers and the search pipeline only ever see
//! `Arc<dyn JobStore>`; the adapter is chosen once at startup.
//!
//! Lifecycle: an adapter is opened by its constructor (`InMemoryStore::seeded`,
//! `PgStore::connect`) and released with `close()` on shutdown.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::job::JobPosting;
use crate::models::user::User;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait JobStore: Send + Sync {
    /// All postings in insertion order.
    async fn list_jobs(&self) -> Result<Vec<JobPosting>, AppError>;

    async fn get_job(&self, id: &str) -> Result<Option<JobPosting>, AppError>;

    async fn add_job(&self, job: JobPosting) -> Result<(), AppError>;

    async fn list_users(&self) -> Result<Vec<User>, AppError>;

    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError>;

    /// Replaces the user with the same id, or appends a new one.
    async fn upsert_user(&self, user: User) -> Result<(), AppError>;

    async fn list_applications(&self) -> Result<Vec<Application>, AppError>;

    /// Appends the application and records the student on the job's
    /// applicant list. `Validation` when the student already applied to the
    /// job; the check is atomic with the insert.
    async fn add_application(&self, application: Application) -> Result<(), AppError>;

    /// `NotFound` when no application has this id.
    async fn set_application_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<Application, AppError>;

    async fn close(&self);
}
