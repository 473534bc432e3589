pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::ai::handlers as ai;
use crate::board::{applications, jobs, users};
use crate::search::handlers as search;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route(
            "/api/v1/jobs",
            get(search::handle_search_jobs).post(jobs::handle_create_job),
        )
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        // Users
        .route(
            "/api/v1/users",
            get(users::handle_list_users).put(users::handle_upsert_user),
        )
        .route("/api/v1/users/:id/verify", post(users::handle_verify_user))
        .route("/api/v1/users/:id/resume", post(users::handle_upload_resume))
        .route(
            "/api/v1/users/:id/recommendations",
            get(users::handle_recommendations),
        )
        // Applicant tracking
        .route(
            "/api/v1/applications",
            get(applications::handle_list_applications).post(applications::handle_apply),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(applications::handle_set_status),
        )
        // AI helpers
        .route("/api/v1/ai/match-score", post(ai::handle_match_score))
        .route("/api/v1/ai/chat", post(ai::handle_chat))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::ai::{AiError, AiService, ChatMode, ChatReply, ChatTurn, ParsedResume};
    use crate::store::{InMemoryStore, JobStore};

    /// Deterministic AI: scores 77, echoes chat, or fails everything.
    struct StubAi {
        healthy: bool,
    }

    #[async_trait]
    impl AiService for StubAi {
        async fn match_score(&self, _profile: &str, _job: &str) -> Result<u8, AiError> {
            if self.healthy {
                Ok(77)
            } else {
                Err(AiError::MissingApiKey)
            }
        }

        async fn parse_resume(
            &self,
            _document: &[u8],
            _mime_type: &str,
        ) -> Result<ParsedResume, AiError> {
            if !self.healthy {
                return Err(AiError::MissingApiKey);
            }
            Ok(ParsedResume {
                skills: vec!["Rust".to_string()],
                experience: "Two internships".to_string(),
                education: vec![],
            })
        }

        async fn chat(
            &self,
            history: &[ChatTurn],
            message: &str,
            _mode: ChatMode,
        ) -> Result<ChatReply, AiError> {
            if !self.healthy {
                return Err(AiError::EmptyContent);
            }
            Ok(ChatReply {
                text: format!("{} turns, last: {message}", history.len()),
                sources: vec![],
            })
        }
    }

    fn app(healthy: bool) -> (Router, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::seeded());
        let state = AppState {
            store: store.clone(),
            ai: Arc::new(StubAi { healthy }),
        };
        (build_router(state), store)
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn json_req(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn job_ids(body: &Value) -> Vec<&str> {
        body["jobs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|j| j["id"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = app(true);
        let (status, body) = send(router, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_search_react_with_all_filters() {
        let (router, _) = app(true);
        let (status, body) = send(
            router,
            get_req("/api/v1/jobs?q=react&type=All&department=All"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(job_ids(&body), vec!["j1"]);
        assert_eq!(body["total"], 1);
    }

    #[tokio::test]
    async fn test_search_min_salary() {
        let (router, _) = app(true);
        let (status, body) = send(router, get_req("/api/v1/jobs?q=&min_salary=50000")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(job_ids(&body), vec!["j1", "j2"]);
    }

    #[tokio::test]
    async fn test_search_without_params_returns_catalogue() {
        let (router, _) = app(true);
        let (_, body) = send(router, get_req("/api/v1/jobs")).await;
        assert_eq!(job_ids(&body), vec!["j1", "j2", "j3"]);
    }

    #[tokio::test]
    async fn test_search_rejects_negative_window() {
        let (router, _) = app(true);
        let (status, body) = send(router, get_req("/api/v1/jobs?posted_within_days=-7")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_search_rejects_unknown_type() {
        let (router, _) = app(true);
        let (status, _) = send(router, get_req("/api/v1/jobs?type=Anywhere")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_verified_alumni_posts_job_searchable_afterwards() {
        let (router, _) = app(true);
        let (status, body) = send(
            router.clone(),
            json_req(
                "POST",
                "/api/v1/jobs",
                json!({
                    "poster_id": "u2",
                    "title": "Rust Backend Engineer",
                    "company": "Ferrous",
                    "department": "CSE",
                    "type": "Remote",
                    "experience_level": "Mid",
                    "description": "Async services.",
                    "required_skills": "Rust, Tokio",
                    "salary_range": "$90k - $110k",
                    "deadline": "2999-01-01"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_str().unwrap().to_string();

        let (_, body) = send(router, get_req("/api/v1/jobs?q=tokio")).await;
        assert_eq!(job_ids(&body), vec![id.as_str()]);
    }

    #[tokio::test]
    async fn test_student_cannot_post_job() {
        let (router, _) = app(true);
        let (status, _) = send(
            router,
            json_req(
                "POST",
                "/api/v1/jobs",
                json!({
                    "poster_id": "u1",
                    "title": "X",
                    "company": "Y",
                    "department": "CSE",
                    "type": "Remote",
                    "experience_level": "Entry",
                    "deadline": "2999-01-01"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_get_missing_job_is_404() {
        let (router, _) = app(true);
        let (status, body) = send(router, get_req("/api/v1/jobs/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_apply_records_score_and_applicant() {
        let (router, store) = app(true);
        let (status, body) = send(
            router.clone(),
            json_req(
                "POST",
                "/api/v1/applications",
                json!({"job_id": "j2", "student_id": "u1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["ai_match_score"], 77);
        assert_eq!(body["status"], "APPLIED");

        let job = store.get_job("j2").await.unwrap().unwrap();
        assert_eq!(job.applicants, vec!["u1"]);

        let (status, _) = send(
            router,
            json_req(
                "POST",
                "/api/v1/applications",
                json!({"job_id": "j2", "student_id": "u1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_apply_without_ai_stores_absent_score() {
        let (router, _) = app(false);
        let (status, body) = send(
            router,
            json_req(
                "POST",
                "/api/v1/applications",
                json!({"job_id": "j3", "student_id": "u1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["ai_match_score"].is_null());
    }

    #[tokio::test]
    async fn test_alumni_cannot_apply() {
        let (router, _) = app(true);
        let (status, _) = send(
            router,
            json_req(
                "POST",
                "/api/v1/applications",
                json!({"job_id": "j3", "student_id": "u2"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_status_update_and_filtered_listing() {
        let (router, _) = app(true);
        let (status, body) = send(
            router.clone(),
            json_req(
                "PATCH",
                "/api/v1/applications/a1/status",
                json!({"status": "SCREENING"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "SCREENING");

        let (_, body) = send(
            router.clone(),
            get_req("/api/v1/applications?job_id=j1&status=SCREENING"),
        )
        .await;
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["a1"]);

        let (status, _) = send(
            router,
            json_req(
                "PATCH",
                "/api/v1/applications/zzz/status",
                json!({"status": "HIRED"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_verify_alumni_only() {
        let (router, store) = app(true);

        let mut bob = store.get_user("u2").await.unwrap().unwrap();
        bob.is_verified = false;
        store.upsert_user(bob).await.unwrap();

        let (status, body) = send(
            router.clone(),
            json_req("POST", "/api/v1/users/u2/verify", json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_verified"], true);

        let (status, _) = send(
            router,
            json_req("POST", "/api/v1/users/u1/verify", json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_resume_upload_updates_profile() {
        let (router, store) = app(true);
        let boundary = "XBOUNDARY";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"cv.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             Alice. Rust developer.\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::post("/api/v1/users/u1/resume")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["skills"], json!(["Rust"]));
        assert_eq!(body["resume_file"], "cv.txt");

        let alice = store.get_user("u1").await.unwrap().unwrap();
        assert_eq!(alice.experience.as_deref(), Some("Two internships"));
    }

    fn ids(body: &Value) -> Vec<&str> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|j| j["id"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_recommendations_follow_skills_and_skip_applied() {
        let (router, store) = app(true);

        // u1 knows JavaScript and HTML; no seeded job asks for either.
        let (status, body) = send(
            router.clone(),
            get_req("/api/v1/users/u1/recommendations"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(ids(&body).is_empty());

        let mut u1 = store.get_user("u1").await.unwrap().unwrap();
        u1.skills = vec!["Python".to_string(), "React".to_string()];
        store.upsert_user(u1).await.unwrap();

        let (_, body) = send(
            router.clone(),
            get_req("/api/v1/users/u1/recommendations"),
        )
        .await;
        assert_eq!(ids(&body), vec!["j1", "j3"]);

        let (status, _) = send(
            router.clone(),
            json_req(
                "POST",
                "/api/v1/applications",
                json!({"job_id": "j1", "student_id": "u1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, body) = send(router, get_req("/api/v1/users/u1/recommendations")).await;
        assert_eq!(ids(&body), vec!["j3"]);
    }

    #[tokio::test]
    async fn test_recommendations_for_unknown_user_is_404() {
        let (router, _) = app(true);
        let (status, _) = send(router, get_req("/api/v1/users/nobody/recommendations")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_match_score_degrades_to_null() {
        let (router, _) = app(false);
        let (status, body) = send(
            router,
            json_req(
                "POST",
                "/api/v1/ai/match-score",
                json!({"user_id": "u1", "job_id": "j1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["score"].is_null());
    }

    #[tokio::test]
    async fn test_chat_reply_and_fallback() {
        let (router, _) = app(true);
        let (status, body) = send(
            router,
            json_req(
                "POST",
                "/api/v1/ai/chat",
                json!({
                    "history": [{"role": "model", "text": "Hi"}],
                    "message": "CV tips?",
                    "mode": "advice"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "1 turns, last: CV tips?");

        let (router, _) = app(false);
        let (status, body) = send(
            router,
            json_req("POST", "/api/v1/ai/chat", json!({"message": "hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], ChatReply::unavailable().text);
    }
}
