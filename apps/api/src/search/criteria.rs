//! Search criteria: one immutable value describing every active constraint.
//!
//! `SearchParams` is the loosely typed shape the UI sends (with `"All"` meaning
//! "no constraint"); `SearchCriteria::try_from` validates it at the boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::job::{ExperienceLevel, JobType};

/// Sentinel the UI uses for an unset dropdown.
const ALL: &str = "All";

#[derive(Debug, Error, PartialEq)]
pub enum CriteriaError {
    #[error("posted_within_days must not be negative (got {0})")]
    NegativeDayWindow(i64),

    #[error("min_salary must not be negative (got {0})")]
    NegativeMinSalary(i64),

    #[error("{field} must be a whole number (got '{value}')")]
    NotANumber { field: &'static str, value: String },

    #[error("Unknown job type '{0}'")]
    UnknownJobType(String),

    #[error("Unknown experience level '{0}'")]
    UnknownExperienceLevel(String),
}

/// Validated filter constraints. Every optional field defaults to unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchCriteria {
    pub query: String,
    pub job_type: Option<JobType>,
    pub department: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub posted_within_days: Option<u32>,
    pub min_salary: Option<u64>,
}

impl SearchCriteria {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_job_type(self, job_type: JobType) -> Self {
        Self {
            job_type: Some(job_type),
            ..self
        }
    }

    pub fn with_department(self, department: impl Into<String>) -> Self {
        Self {
            department: Some(department.into()),
            ..self
        }
    }

    pub fn with_experience_level(self, level: ExperienceLevel) -> Self {
        Self {
            experience_level: Some(level),
            ..self
        }
    }

    pub fn with_posted_within_days(self, days: u32) -> Self {
        Self {
            posted_within_days: Some(days),
            ..self
        }
    }

    pub fn with_min_salary(self, min_salary: u64) -> Self {
        Self {
            min_salary: Some(min_salary),
            ..self
        }
    }

    /// True when no constraint is active and the query is blank.
    pub fn is_unconstrained(&self) -> bool {
        self.query.trim().is_empty()
            && self.job_type.is_none()
            && self.department.is_none()
            && self.experience_level.is_none()
            && self.posted_within_days.is_none()
            && self.min_salary.is_none()
    }
}

/// Raw search parameters as they arrive from the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub department: Option<String>,
    pub experience: Option<String>,
    pub posted_within_days: Option<String>,
    pub min_salary: Option<String>,
}

/// `None` for a missing, blank or `"All"` value.
fn constrained(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != ALL)
}

fn parse_whole(field: &'static str, value: &str) -> Result<i64, CriteriaError> {
    value.parse::<i64>().map_err(|_| CriteriaError::NotANumber {
        field,
        value: value.to_string(),
    })
}

impl TryFrom<SearchParams> for SearchCriteria {
    type Error = CriteriaError;

    fn try_from(params: SearchParams) -> Result<Self, Self::Error> {
        let job_type = constrained(params.job_type)
            .map(|t| t.parse::<JobType>().map_err(|_| CriteriaError::UnknownJobType(t)))
            .transpose()?;

        let experience_level = constrained(params.experience)
            .map(|l| {
                l.parse::<ExperienceLevel>()
                    .map_err(|_| CriteriaError::UnknownExperienceLevel(l))
            })
            .transpose()?;

        let posted_within_days = constrained(params.posted_within_days)
            .map(|raw| {
                let days = parse_whole("posted_within_days", &raw)?;
                if days < 0 {
                    return Err(CriteriaError::NegativeDayWindow(days));
                }
                u32::try_from(days).map_err(|_| CriteriaError::NotANumber {
                    field: "posted_within_days",
                    value: raw,
                })
            })
            .transpose()?;

        let min_salary = constrained(params.min_salary)
            .map(|raw| {
                let salary = parse_whole("min_salary", &raw)?;
                if salary < 0 {
                    return Err(CriteriaError::NegativeMinSalary(salary));
                }
                Ok(salary.unsigned_abs())
            })
            .transpose()?;

        Ok(SearchCriteria {
            query: params.q,
            job_type,
            department: constrained(params.department),
            experience_level,
            posted_within_days,
            min_salary,
        })
    }
}
