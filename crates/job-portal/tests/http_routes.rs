//! End-to-end HTTP flows through the assembled portal router.

mod common {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use job_portal::api::Portal;
    use job_portal::applications::StatusPolicy;
    use job_portal::auth::TokenService;
    use job_portal::storage::SqliteStore;
    use job_portal::uploads::CvStorage;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    pub(super) const BOUNDARY: &str = "portal-test-boundary";

    pub(super) struct Harness {
        pub(super) router: Router,
        pub(super) tokens: Arc<TokenService>,
        pub(super) uploads: TempDir,
    }

    pub(super) async fn harness() -> Harness {
        let uploads = tempfile::tempdir().expect("tempdir");
        let store = Arc::new(SqliteStore::in_memory().await.expect("store"));
        let tokens = Arc::new(TokenService::new("integration-secret"));
        let portal = Portal::new(
            store,
            tokens.clone(),
            Arc::new(CvStorage::new(uploads.path(), 64 * 1024)),
            StatusPolicy::standard(),
        );

        Harness {
            router: portal.router(),
            tokens,
            uploads,
        }
    }

    impl Harness {
        pub(super) async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
            let response = self
                .router
                .clone()
                .oneshot(request)
                .await
                .expect("router executes");
            let status = response.status();
            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("read body");
            (status, body.to_vec())
        }

        pub(super) async fn call(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string())),
                None => builder.body(Body::empty()),
            }
            .expect("request");

            let (status, body) = self.send(request).await;
            let value = if body.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&body).expect("json body")
            };
            (status, value)
        }

        pub(super) async fn signup(&self, email: &str, role: &str, display: &str) -> Value {
            let name_field = if role == "recruiter" { "company_name" } else { "name" };
            let mut body = json!({
                "email": email,
                "password": "s3cret-pass",
                "role": role,
            });
            body[name_field] = json!(display);

            let (status, session) = self
                .call(Method::POST, "/auth/signup", None, Some(body))
                .await;
            assert_eq!(status, StatusCode::CREATED, "signup failed: {session}");
            session
        }

        pub(super) async fn token_for(&self, email: &str, role: &str, display: &str) -> String {
            let session = self.signup(email, role, display).await;
            session["token"].as_str().expect("token").to_string()
        }

        pub(super) async fn upload_cv(
            &self,
            token: &str,
            filename: &str,
            contents: &str,
        ) -> (StatusCode, Value) {
            let body = format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"cv\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n\
                 {contents}\r\n\
                 --{BOUNDARY}--\r\n"
            );
            let request = Request::post("/student/upload-cv")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .expect("request");

            let (status, body) = self.send(request).await;
            (status, serde_json::from_slice(&body).expect("json body"))
        }
    }
}

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::harness;
use job_portal::auth::{Role, UserId};
use serde_json::json;

#[tokio::test]
async fn signup_issues_a_token_for_the_new_account() {
    let harness = harness().await;
    let session = harness.signup("ada@uni.test", "student", "Ada").await;

    assert_eq!(session["message"], "User created successfully");
    assert_eq!(session["user"]["email"], "ada@uni.test");
    assert_eq!(session["user"]["role"], "student");
    assert!(session["user"].get("password_hash").is_none());

    let identity = harness
        .tokens
        .validate(session["token"].as_str().expect("token"))
        .expect("valid token");
    assert_eq!(identity.role, Role::Student);
    assert_eq!(
        identity.user_id,
        UserId(session["user"]["id"].as_i64().expect("id"))
    );
}

#[tokio::test]
async fn signup_rejects_duplicates_and_bad_input() {
    let harness = harness().await;
    harness.signup("ada@uni.test", "student", "Ada").await;

    let (status, body) = harness
        .call(
            Method::POST,
            "/auth/signup",
            None,
            Some(json!({
                "email": "ADA@uni.test",
                "password": "another-pass",
                "role": "student",
                "name": "Ada Again",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User already exists");

    let (status, _) = harness
        .call(
            Method::POST,
            "/auth/signup",
            None,
            Some(json!({
                "email": "not-an-email",
                "password": "s3cret-pass",
                "role": "student",
                "name": "Bob",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_checks_the_password() {
    let harness = harness().await;
    harness.signup("hr@acme.test", "recruiter", "Acme").await;

    let (status, body) = harness
        .call(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "hr@acme.test", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, body) = harness
        .call(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "hr@acme.test", "password": "s3cret-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "recruiter");
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn guarded_routes_need_a_matching_role() {
    let harness = harness().await;
    let student = harness.token_for("ada@uni.test", "student", "Ada").await;

    let (status, _) = harness.call(Method::GET, "/recruiter/jobs", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = harness
        .call(Method::GET, "/recruiter/jobs", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = harness
        .call(Method::GET, "/recruiter/jobs", Some(&student), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn recruiter_hires_an_applicant() {
    let harness = harness().await;
    let recruiter = harness.token_for("hr@acme.test", "recruiter", "Acme").await;
    let student = harness.token_for("ada@uni.test", "student", "Ada").await;

    let (status, posted) = harness
        .call(
            Method::POST,
            "/recruiter/jobs",
            Some(&recruiter),
            Some(json!({
                "title": "Engineer",
                "description": "Build the portal",
                "location": "Remote",
                "salary": 90000,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let job_id = posted["job_id"].as_i64().expect("job id");

    let (status, page) = harness
        .call(Method::GET, "/jobs/search?keyword=engineer", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["jobs"][0]["id"], job_id);
    assert_eq!(page["jobs"][0]["company_name"], "Acme");
    assert_eq!(page["pagination"]["total"], 1);

    let (status, applied) = harness
        .call(
            Method::POST,
            &format!("/student/jobs/apply/{job_id}"),
            Some(&student),
            Some(json!({ "cover_letter": "hello" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let application_id = applied["application_id"].as_i64().expect("application id");

    let (status, again) = harness
        .call(
            Method::POST,
            &format!("/student/jobs/apply/{job_id}"),
            Some(&student),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(again["error"], "You have already applied to this job");

    let (status, listed) = harness
        .call(
            Method::GET,
            &format!("/recruiter/jobs/{job_id}/applications"),
            Some(&recruiter),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["applications"][0]["name"], "Ada");
    assert_eq!(listed["applications"][0]["email"], "ada@uni.test");
    assert_eq!(listed["applications"][0]["status"], "pending");

    let (status, _) = harness
        .call(
            Method::PUT,
            &format!("/recruiter/applications/{application_id}/status"),
            Some(&recruiter),
            Some(json!({ "status": "approved" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, updated) = harness
        .call(
            Method::PUT,
            &format!("/recruiter/applications/{application_id}/status"),
            Some(&recruiter),
            Some(json!({ "status": "hired" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "hired");

    let (status, mine) = harness
        .call(Method::GET, "/student/applications", Some(&student), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["applications"][0]["status"], "hired");
    assert_eq!(mine["applications"][0]["title"], "Engineer");
    assert_eq!(mine["applications"][0]["cover_letter"], "hello");
}

#[tokio::test]
async fn deleted_jobs_disappear_from_the_public_surface() {
    let harness = harness().await;
    let recruiter = harness.token_for("hr@acme.test", "recruiter", "Acme").await;
    let student = harness.token_for("ada@uni.test", "student", "Ada").await;

    let (_, posted) = harness
        .call(
            Method::POST,
            "/recruiter/jobs",
            Some(&recruiter),
            Some(json!({ "title": "Analyst", "description": "Numbers" })),
        )
        .await;
    let job_id = posted["job_id"].as_i64().expect("job id");

    let (status, _) = harness
        .call(
            Method::DELETE,
            &format!("/recruiter/jobs/{job_id}"),
            Some(&recruiter),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = harness
        .call(Method::GET, &format!("/jobs/{job_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = harness
        .call(
            Method::POST,
            &format!("/student/jobs/apply/{job_id}"),
            Some(&student),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, own) = harness
        .call(Method::GET, "/recruiter/jobs", Some(&recruiter), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(own["jobs"][0]["is_active"], false);
}

#[tokio::test]
async fn profiles_accept_partial_updates() {
    let harness = harness().await;
    let student = harness.token_for("ada@uni.test", "student", "Ada").await;

    let (status, body) = harness
        .call(Method::GET, "/student/profile", Some(&student), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["name"], "Ada");

    let (status, body) = harness
        .call(
            Method::PUT,
            "/student/profile",
            Some(&student),
            Some(json!({ "skills": "rust, sql" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["skills"], "rust, sql");
    assert_eq!(body["profile"]["name"], "Ada");

    let (status, _) = harness
        .call(Method::PUT, "/student/profile", Some(&student), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn uploaded_cvs_are_served_and_replaced() {
    let harness = harness().await;
    let student = harness.token_for("ada@uni.test", "student", "Ada").await;

    let (status, first) = harness.upload_cv(&student, "My CV.pdf", "first").await;
    assert_eq!(status, StatusCode::OK, "upload failed: {first}");
    let first = first["filename"].as_str().expect("filename").to_string();
    assert!(first.ends_with("_My_CV.pdf"));

    let (status, body) = harness
        .send(
            Request::get(format!("/uploads/{first}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"first");

    let (status, second) = harness.upload_cv(&student, "cv.docx", "second").await;
    assert_eq!(status, StatusCode::OK);
    let second = second["filename"].as_str().expect("filename").to_string();

    assert!(!harness.uploads.path().join(&first).exists());
    assert!(harness.uploads.path().join(&second).exists());

    let (status, profile) = harness
        .call(Method::GET, "/student/profile", Some(&student), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["profile"]["cv_filename"], second.as_str());

    let (status, rejected) = harness.upload_cv(&student, "script.exe", "nope").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(rejected["error"], "Invalid file type or failed to save file");
}
