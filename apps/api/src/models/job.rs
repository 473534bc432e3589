use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Work arrangement of a posting. Closed set; anything else is rejected at entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    Remote,
    #[serde(rename = "On-site")]
    OnSite,
    Hybrid,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Remote => "Remote",
            JobType::OnSite => "On-site",
            JobType::Hybrid => "Hybrid",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Remote" => Ok(JobType::Remote),
            "On-site" => Ok(JobType::OnSite),
            "Hybrid" => Ok(JobType::Hybrid),
            other => Err(AppError::Validation(format!("Unknown job type '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry",
            ExperienceLevel::Mid => "Mid",
            ExperienceLevel::Senior => "Senior",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperienceLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Entry" => Ok(ExperienceLevel::Entry),
            "Mid" => Ok(ExperienceLevel::Mid),
            "Senior" => Ok(ExperienceLevel::Senior),
            other => Err(AppError::Validation(format!(
                "Unknown experience level '{other}'"
            ))),
        }
    }
}

/// A job posting as stored in the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub company: String,
    pub department: String,
    pub poster_id: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub description: String,
    /// May be empty; such a job is simply never matched on skills.
    pub required_skills: Vec<String>,
    /// Free text, e.g. "$60k - $80k" or "50000 BDT".
    pub salary_range: String,
    pub posted_at: NaiveDate,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub applicants: Vec<String>,
}

impl JobPosting {
    /// Concatenated text the search pipeline matches query terms against.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.title,
            self.company,
            self.description,
            self.required_skills.join(" "),
            self.department
        )
    }

    /// Job summary sent to the AI service for match scoring.
    pub fn match_text(&self) -> String {
        format!(
            "Title: {}. Desc: {}. Required: {}",
            self.title,
            self.description,
            self.required_skills.join(", ")
        )
    }
}
