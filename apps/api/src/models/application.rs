use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Columns of the applicant tracking board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Applied,
    Screening,
    Interview,
    Offered,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "APPLIED",
            ApplicationStatus::Screening => "SCREENING",
            ApplicationStatus::Interview => "INTERVIEW",
            ApplicationStatus::Offered => "OFFERED",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::Hired => "HIRED",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APPLIED" => Ok(ApplicationStatus::Applied),
            "SCREENING" => Ok(ApplicationStatus::Screening),
            "INTERVIEW" => Ok(ApplicationStatus::Interview),
            "OFFERED" => Ok(ApplicationStatus::Offered),
            "REJECTED" => Ok(ApplicationStatus::Rejected),
            "HIRED" => Ok(ApplicationStatus::Hired),
            other => Err(AppError::Validation(format!(
                "Unknown application status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub job_id: String,
    pub student_id: String,
    pub student_name: Option<String>,
    pub status: ApplicationStatus,
    pub applied_at: NaiveDate,
    /// 0 – 100. `None` when the AI service was unavailable at apply time.
    pub ai_match_score: Option<u8>,
}
