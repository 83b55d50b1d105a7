use std::time::Duration;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    context::USER_ID_HEADER,
    handlers::{
        applications::{
            application_resume, change_application_status, get_application,
            list_applications, list_job_applications, submit_application,
        },
        health::health,
        jobs::{create_job, delete_job, get_job, list_jobs, update_job},
        resumes::{delete_resume, list_resumes, set_default_resume, upload_resume},
        reveal_error_details,
        users::{
            create_account, current_user, get_user, list_users, send_sign_in_link, update_user,
        },
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)]);

    let api_routes = Router::new()
        // Job routes
        .route("/jobs", get(list_jobs).post(create_job))
        .route(
            "/jobs/{id}",
            get(get_job).patch(update_job).delete(delete_job),
        )
        .route("/jobs/{id}/applications", get(list_job_applications))
        // Application routes
        .route(
            "/applications",
            get(list_applications).post(submit_application),
        )
        .route("/applications/{id}", get(get_application))
        .route("/applications/{id}/status", patch(change_application_status))
        .route("/applications/{id}/resume", get(application_resume))
        // User routes
        .route("/users", get(list_users).post(create_account))
        .route("/users/me", get(current_user))
        .route("/users/sign-in-link", post(send_sign_in_link))
        .route("/users/{id}", get(get_user).patch(update_user))
        // Resume routes
        .route("/users/{id}/resumes", get(list_resumes).post(upload_resume))
        .route("/users/{id}/resumes/{resume_id}", delete(delete_resume))
        .route(
            "/users/{id}/resumes/{resume_id}/default",
            put(set_default_resume),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            reveal_error_details,
        ))
        .layer(cors);

    // Main application router
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::Utc;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use talentdesk_core::storage::UserRepository;
    use talentdesk_core::users::{new_user, CreateUserRequest, Role, User};

    use crate::collaborators::MockIdentityProvider;
    use crate::config::Config;
    use crate::services::fixtures::UnreachableUsers;
    use crate::services::ResumeService;
    use crate::state::Collaborators;
    use crate::storage::inmemory::InMemoryRepository;

    struct TestApp {
        app: Router,
        admin: User,
    }

    async fn seed_admin(repo: &InMemoryRepository) -> User {
        let admin = new_user(
            Uuid::new_v4(),
            CreateUserRequest::new("admin@talentdesk.test", "Ada", "Admin").with_role(Role::Admin),
            Utc::now(),
        )
        .unwrap();
        repo.create_user(&admin).await.unwrap();
        admin
    }

    async fn test_app_with(collaborators: Collaborators, config: Config) -> TestApp {
        let repo = Arc::new(InMemoryRepository::new());
        let admin = seed_admin(&repo).await;

        let state = AppState::build(repo, collaborators, &config);
        TestApp {
            app: create_app(state),
            admin,
        }
    }

    async fn test_app() -> TestApp {
        test_app_with(Collaborators::mock(), Config::default()).await
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        user: Option<&User>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(USER_ID_HEADER, user.user_id.to_string());
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn application_form(job_id: &str, email: &str) -> Value {
        json!({
            "jobId": job_id,
            "firstName": "Jane",
            "lastName": "Doe",
            "email": email,
            "phone": "555-0100",
            "coverLetter": "I would love to join.",
            "resumeKey": "applications/jane/cv.pdf",
        })
    }

    #[tokio::test]
    async fn test_health() {
        let test = test_app().await;

        let (status, json) = send(&test.app, "GET", "/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_submit_application_anonymously() {
        let test = test_app().await;

        let (status, json) = send(
            &test.app,
            "POST",
            "/api/applications",
            None,
            Some(application_form("cloud-1", "Jane@Example.COM")),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["email"], "jane@example.com");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["version"], 1);
    }

    #[tokio::test]
    async fn test_submit_application_missing_fields() {
        let test = test_app().await;

        let (status, json) = send(
            &test.app,
            "POST",
            "/api/applications",
            None,
            Some(json!({ "jobId": "cloud-1", "email": "jane@example.com" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["kind"], "validation_error");
        assert!(json["message"].as_str().unwrap().contains("coverLetter"));
    }

    #[tokio::test]
    async fn test_role_gated_route_requires_identity() {
        let test = test_app().await;
        let job = json!({
            "title": "Cloud Engineer",
            "company": "Acme",
            "category": "Cloud",
            "location": "Remote",
            "employmentType": "Full-time",
        });

        let (status, json) = send(&test.app, "POST", "/api/jobs", None, Some(job.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["kind"], "unauthenticated");

        let (status, _) = send(
            &test.app,
            "POST",
            "/api/jobs",
            Some(&test.admin),
            Some(job),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_job_publish_and_optimistic_update() {
        let test = test_app().await;
        let admin = Some(&test.admin);

        let (status, job) = send(
            &test.app,
            "POST",
            "/api/jobs",
            admin,
            Some(json!({
                "jobId": "cloud-1",
                "title": "Senior Cloud Engineer!!",
                "company": "Acme",
                "category": "Cloud",
                "location": "Remote",
                "employmentType": "Full-time",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(job["slug"], "senior-cloud-engineer");
        assert_eq!(job["status"], "draft");

        let (_, board) = send(&test.app, "GET", "/api/jobs", None, None).await;
        assert!(board["items"].as_array().unwrap().is_empty());

        let (status, updated) = send(
            &test.app,
            "PATCH",
            "/api/jobs/cloud-1",
            admin,
            Some(json!({ "expectedVersion": 1, "status": "open" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "active");
        assert_eq!(updated["version"], 2);

        let (status, conflict) = send(
            &test.app,
            "PATCH",
            "/api/jobs/cloud-1",
            admin,
            Some(json!({ "expectedVersion": 1, "salary": "100k" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(conflict["kind"], "version_conflict");
        assert_eq!(conflict["actualVersion"], 2);

        let (_, board) = send(&test.app, "GET", "/api/jobs?status=open", None, None).await;
        assert_eq!(board["items"][0]["jobId"], "cloud-1");
    }

    #[tokio::test]
    async fn test_delete_job_reports_dependents() {
        let test = test_app().await;
        let admin = Some(&test.admin);
        send(
            &test.app,
            "POST",
            "/api/jobs",
            admin,
            Some(json!({
                "jobId": "J1",
                "title": "Cloud Engineer",
                "company": "Acme",
                "category": "Cloud",
                "location": "Remote",
                "employmentType": "Full-time",
            })),
        )
        .await;

        let mut ids = Vec::new();
        for n in 0..3 {
            let (_, application) = send(
                &test.app,
                "POST",
                "/api/applications",
                None,
                Some(application_form("J1", &format!("applicant{}@example.com", n))),
            )
            .await;
            ids.push(application["applicationId"].as_str().unwrap().to_string());
        }

        let (status, deleted) = send(&test.app, "DELETE", "/api/jobs/J1", admin, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["dependentApplicationCount"], 3);
        assert_eq!(deleted["job"]["jobId"], "J1");

        for id in ids {
            let (status, _) = send(
                &test.app,
                "GET",
                &format!("/api/applications/{}", id),
                admin,
                None,
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_sign_up_then_duplicate() {
        let test = test_app().await;
        let form = json!({ "email": "jane@example.com", "firstName": "Jane", "lastName": "Doe" });

        let (status, outcome) =
            send(&test.app, "POST", "/api/users", None, Some(form.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(outcome["profileCreated"], true);
        assert_eq!(outcome["user"]["role"], "consultant");

        let (status, err) = send(&test.app, "POST", "/api/users", None, Some(form)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(err["message"].as_str().unwrap().contains("sign in"));
    }

    #[tokio::test]
    async fn test_sign_in_link_does_not_reveal_accounts() {
        let test = test_app().await;
        let form = json!({ "email": "jane@example.com", "firstName": "Jane", "lastName": "Doe" });
        send(&test.app, "POST", "/api/users", None, Some(form)).await;

        let (known, known_body) = send(
            &test.app,
            "POST",
            "/api/users/sign-in-link",
            None,
            Some(json!({ "email": "jane@example.com" })),
        )
        .await;
        let (unknown, unknown_body) = send(
            &test.app,
            "POST",
            "/api/users/sign-in-link",
            None,
            Some(json!({ "email": "nobody@example.com" })),
        )
        .await;

        assert_eq!(known, StatusCode::ACCEPTED);
        assert_eq!(unknown, StatusCode::ACCEPTED);
        assert_eq!(known_body, unknown_body);
    }

    #[tokio::test]
    async fn test_application_resume_falls_back_to_form() {
        let test = test_app().await;
        let (_, application) = send(
            &test.app,
            "POST",
            "/api/applications",
            None,
            Some(application_form("cloud-1", "a@b.com")),
        )
        .await;
        let id = application["applicationId"].as_str().unwrap();

        let (status, download) = send(
            &test.app,
            "GET",
            &format!("/api/applications/{}/resume", id),
            Some(&test.admin),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(download["status"], "available");
        assert_eq!(download["source"], "application");
        assert!(download["url"]
            .as_str()
            .unwrap()
            .contains("applications/jane/cv.pdf"));
    }

    #[tokio::test]
    async fn test_store_failure_is_service_unavailable() {
        let repo = Arc::new(InMemoryRepository::new());
        let admin = seed_admin(&repo).await;
        let collaborators = Collaborators::mock();
        let mut state = AppState::build(repo.clone(), collaborators.clone(), &Config::default());
        state.resumes = ResumeService::new(
            Arc::new(UnreachableUsers),
            repo.clone(),
            repo,
            collaborators.storage,
        );
        let app = create_app(state);

        let (_, application) = send(
            &app,
            "POST",
            "/api/applications",
            None,
            Some(application_form("cloud-1", "a@b.com")),
        )
        .await;
        let id = application["applicationId"].as_str().unwrap();

        let (status, err) = send(
            &app,
            "GET",
            &format!("/api/applications/{}/resume", id),
            Some(&admin),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err["kind"], "store_failure");
        assert!(!err["message"].as_str().unwrap().contains("unreachable"));
    }

    #[tokio::test]
    async fn test_error_details_are_environment_gated() {
        let failing_identity = MockIdentityProvider::new();
        failing_identity.fail_registration(true).await;
        let collaborators = || Collaborators {
            identity: Arc::new(failing_identity.clone()),
            ..Collaborators::mock()
        };
        let form = json!({ "email": "jane@example.com", "firstName": "Jane", "lastName": "Doe" });

        let hidden = test_app_with(collaborators(), Config::default()).await;
        let (status, err) = send(&hidden.app, "POST", "/api/users", None, Some(form.clone())).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(err["kind"], "dependency_failure");
        assert!(!err["message"].as_str().unwrap().contains("injected failure"));

        let config = Config {
            expose_error_details: true,
            ..Config::default()
        };
        let exposed = test_app_with(collaborators(), config).await;
        let (status, err) = send(&exposed.app, "POST", "/api/users", None, Some(form)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(err["message"].as_str().unwrap().contains("injected failure"));
    }
}
