use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::info;

use crate::errors::AppError;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::job::{ExperienceLevel, JobPosting, JobType};
use crate::models::user::{User, UserRole};
use crate::store::JobStore;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    jobs: Vec<JobPosting>,
    applications: Vec<Application>,
}

/// Process-local store. Used when no database is configured, and in tests.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new(users: Vec<User>, jobs: Vec<JobPosting>, applications: Vec<Application>) -> Self {
        Self {
            tables: RwLock::new(Tables {
                users,
                jobs,
                applications,
            }),
        }
    }

    /// Store pre-populated with the demo catalogue.
    pub fn seeded() -> Self {
        info!("Seeding in-memory store with demo catalogue");
        Self::new(seed_users(), seed_jobs(), seed_applications())
    }
}

#[async_trait]
impl JobStore for InMemoryStore {
    async fn list_jobs(&self) -> Result<Vec<JobPosting>, AppError> {
        Ok(self.tables.read().await.jobs.clone())
    }

    async fn get_job(&self, id: &str) -> Result<Option<JobPosting>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .jobs
            .iter()
            .find(|j| j.id == id)
            .cloned())
    }

    async fn add_job(&self, job: JobPosting) -> Result<(), AppError> {
        self.tables.write().await.jobs.push(job);
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn upsert_user(&self, user: User) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        match tables.users.iter().position(|u| u.id == user.id) {
            Some(index) => tables.users[index] = user,
            None => tables.users.push(user),
        }
        Ok(())
    }

    async fn list_applications(&self) -> Result<Vec<Application>, AppError> {
        Ok(self.tables.read().await.applications.clone())
    }

    async fn add_application(&self, application: Application) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let duplicate = tables
            .applications
            .iter()
            .any(|a| a.job_id == application.job_id && a.student_id == application.student_id);
        if duplicate {
            return Err(AppError::Validation(format!(
                "{} has already applied to {}",
                application.student_id, application.job_id
            )));
        }
        if let Some(job) = tables.jobs.iter_mut().find(|j| j.id == application.job_id) {
            if !job.applicants.contains(&application.student_id) {
                job.applicants.push(application.student_id.clone());
            }
        }
        tables.applications.push(application);
        Ok(())
    }

    async fn set_application_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<Application, AppError> {
        let mut tables = self.tables.write().await;
        let application = tables
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
        application.status = status;
        Ok(application.clone())
    }

    async fn close(&self) {
        info!("In-memory store closed");
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn seed_jobs() -> Vec<JobPosting> {
    vec![
        JobPosting {
            id: "j1".to_string(),
            title: "Junior React Developer".to_string(),
            company: "TechSolutions Ltd".to_string(),
            department: "CSE".to_string(),
            poster_id: "u2".to_string(),
            job_type: JobType::Remote,
            experience_level: ExperienceLevel::Entry,
            description: "We are looking for a passionate React developer to join our frontend team. \
                Experience with TypeScript and Tailwind is a plus."
                .to_string(),
            required_skills: strings(&["React", "TypeScript", "CSS"]),
            salary_range: "$60k - $80k".to_string(),
            posted_at: date(2023, 11, 1),
            deadline: date(2023, 12, 31),
            applicants: strings(&["u5", "u6"]),
        },
        JobPosting {
            id: "j2".to_string(),
            title: "Embedded Systems Engineer".to_string(),
            company: "IoTCore".to_string(),
            department: "EEE".to_string(),
            poster_id: "u2".to_string(),
            job_type: JobType::OnSite,
            experience_level: ExperienceLevel::Mid,
            description: "Design and implement firmware for our new line of smart home devices."
                .to_string(),
            required_skills: strings(&["C++", "Microcontrollers", "PCB Design"]),
            salary_range: "$70k - $90k".to_string(),
            posted_at: date(2023, 11, 5),
            deadline: date(2023, 12, 15),
            applicants: vec![],
        },
        JobPosting {
            id: "j3".to_string(),
            title: "Data Analyst Intern".to_string(),
            company: "DataFlow".to_string(),
            department: "CSE".to_string(),
            poster_id: "u4".to_string(),
            job_type: JobType::Hybrid,
            experience_level: ExperienceLevel::Entry,
            description: "Great opportunity for students to learn big data technologies."
                .to_string(),
            required_skills: strings(&["Python", "SQL", "Excel"]),
            salary_range: "$30k - $40k".to_string(),
            posted_at: date(2023, 11, 10),
            deadline: date(2024, 1, 20),
            applicants: vec![],
        },
    ]
}

fn seed_users() -> Vec<User> {
    vec![
        User {
            id: "u1".to_string(),
            name: "Alice Student".to_string(),
            email: "alice@ruet.ac.bd".to_string(),
            role: UserRole::Student,
            department: Some("CSE".to_string()),
            is_verified: false,
            graduation_year: Some(2024),
            skills: strings(&["JavaScript", "HTML"]),
            education: strings(&["B.Sc. in CSE - RUET (2024)"]),
            experience: Some("Fresher".to_string()),
            resume_file: None,
        },
        User {
            id: "u2".to_string(),
            name: "Bob Alumni".to_string(),
            email: "bob@tech.com".to_string(),
            role: UserRole::Alumni,
            department: Some("CSE".to_string()),
            is_verified: true,
            graduation_year: Some(2018),
            skills: vec![],
            education: strings(&["B.Sc. in CSE - RUET (2018)"]),
            experience: None,
            resume_file: None,
        },
        User {
            id: "u3".to_string(),
            name: "Dr. Admin".to_string(),
            email: "dsw@ruet.ac.bd".to_string(),
            role: UserRole::Admin,
            department: Some("Admin".to_string()),
            is_verified: false,
            graduation_year: None,
            skills: vec![],
            education: vec![],
            experience: None,
            resume_file: None,
        },
    ]
}

fn seed_applications() -> Vec<Application> {
    vec![
        Application {
            id: "a1".to_string(),
            job_id: "j1".to_string(),
            student_id: "u5".to_string(),
            student_name: Some("Charlie Student".to_string()),
            status: ApplicationStatus::Applied,
            applied_at: date(2023, 11, 12),
            ai_match_score: Some(85),
        },
        Application {
            id: "a2".to_string(),
            job_id: "j1".to_string(),
            student_id: "u6".to_string(),
            student_name: Some("Dave Student".to_string()),
            status: ApplicationStatus::Interview,
            applied_at: date(2023, 11, 10),
            ai_match_score: Some(92),
        },
    ]
}
