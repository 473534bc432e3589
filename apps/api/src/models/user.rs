use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Student,
    Alumni,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "STUDENT",
            UserRole::Alumni => "ALUMNI",
            UserRole::Admin => "ADMIN",
        }
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STUDENT" => Ok(UserRole::Student),
            "ALUMNI" => Ok(UserRole::Alumni),
            "ADMIN" => Ok(UserRole::Admin),
            other => Err(AppError::Validation(format!("Unknown user role '{other}'"))),
        }
    }
}

/// A platform account. Student profile fields are empty for other roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub department: Option<String>,
    /// Alumni must be verified by an admin before posting jobs.
    #[serde(default)]
    pub is_verified: bool,
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
    pub experience: Option<String>,
    pub resume_file: Option<String>,
}

impl User {
    /// Profile summary sent to the AI service for match scoring.
    pub fn profile_text(&self) -> String {
        format!(
            "Skills: {}. Experience: {}",
            self.skills.join(", "),
            self.experience.as_deref().unwrap_or("")
        )
    }

    pub fn can_post_jobs(&self) -> bool {
        self.role == UserRole::Alumni && self.is_verified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alumni(verified: bool) -> User {
        User {
            id: "u2".to_string(),
            name: "Bob Alumni".to_string(),
            email: "bob@tech.com".to_string(),
            role: UserRole::Alumni,
            department: Some("CSE".to_string()),
            is_verified: verified,
            graduation_year: Some(2018),
            skills: vec![],
            education: vec![],
            experience: None,
            resume_file: None,
        }
    }

    #[test]
    fn test_role_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&UserRole::Alumni).unwrap(),
            r#""ALUMNI""#
        );
        assert_eq!("ADMIN".parse::<UserRole>().unwrap(), UserRole::Admin);
    }

    #[test]
    fn test_only_verified_alumni_can_post() {
        assert!(alumni(true).can_post_jobs());
        assert!(!alumni(false).can_post_jobs());

        let mut admin = alumni(true);
        admin.role = UserRole::Admin;
        assert!(!admin.can_post_jobs());
    }

    #[test]
    fn test_profile_text_format() {
        let mut user = alumni(true);
        user.skills = vec!["JavaScript".to_string(), "HTML".to_string()];
        user.experience = Some("Fresher".to_string());
        assert_eq!(user.profile_text(), "Skills: JavaScript, HTML. Experience: Fresher");
    }
}
