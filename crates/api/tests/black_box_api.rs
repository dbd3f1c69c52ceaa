use chrono::{Duration as ChronoDuration, Utc};
use dashgate_api::config::{JWT_SECRET_ENV, ServerConfig};
use dashgate_auth::{RoleId, SessionClaims, UserId};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let secret = jwt_secret.to_string();
        let config = ServerConfig::from_lookup(|key| (key == JWT_SECRET_ENV).then(|| secret.clone()))
            .expect("default config must be valid");
        let app = dashgate_api::app::build_app(&config).expect("failed to build app");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn mint_token(jwt_secret: &str, role: &str) -> String {
    let now = Utc::now();
    let claims = SessionClaims {
        sub: UserId::new(),
        role: RoleId::parse(role),
        iat: now.timestamp(),
        exp: (now + ChronoDuration::minutes(10)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn session_cookie(token: &str) -> String {
    format!("theme=dark; access_token={token}")
}

async fn get_json(srv: &TestServer, path: &str, cookie: Option<&str>) -> (StatusCode, serde_json::Value) {
    let mut req = client().get(format!("{}{}", srv.base_url, path));
    if let Some(cookie) = cookie {
        req = req.header(reqwest::header::COOKIE, cookie);
    }
    let res = req.send().await.unwrap();
    let status = res.status();
    let body = res.json().await.unwrap_or(serde_json::Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn("test-secret").await;
    let res = client().get(format!("{}/health", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_path_without_session_redirects_to_login() {
    let srv = TestServer::spawn("test-secret").await;

    let res = client()
        .get(format!("{}/dashboard/settings", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        res.headers()[reqwest::header::LOCATION],
        "/login?redirect=%2Fdashboard%2Fsettings"
    );
}

#[tokio::test]
async fn empty_session_cookie_is_treated_as_absent() {
    let srv = TestServer::spawn("test-secret").await;

    let res = client()
        .get(format!("{}/dashboard", srv.base_url))
        .header(reqwest::header::COOKIE, "access_token=")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()[reqwest::header::LOCATION], "/login?redirect=%2Fdashboard");
}

#[tokio::test]
async fn lexical_neighbour_of_protected_prefix_is_public() {
    let srv = TestServer::spawn("test-secret").await;

    let res = client()
        .get(format!("{}/dashboard-preview", srv.base_url))
        .send()
        .await
        .unwrap();

    // No route exists, but the guard let it through rather than redirecting.
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().get(reqwest::header::LOCATION).is_none());
}

#[tokio::test]
async fn admin_session_sees_full_capability_matrix() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let cookie = session_cookie(&mint_token(jwt_secret, "ADMIN"));

    let (status, body) = get_json(&srv, "/dashboard", Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["role"], "admin");
    assert_eq!(body["permissions"]["users.manage"], true);
    assert_eq!(body["permissions"]["dashboard.view"], true);
}

#[tokio::test]
async fn rejected_credential_is_allowed_through_as_anonymous() {
    let srv = TestServer::spawn("test-secret").await;
    let forged = session_cookie(&mint_token("some-other-secret", "admin"));

    let (status, body) = get_json(&srv, "/dashboard", Some(&forged)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], false);
    assert_eq!(body["permissions"]["dashboard.view"], true);
    assert_eq!(body["permissions"]["users.manage"], false);
}

#[tokio::test]
async fn unknown_role_gets_least_privilege() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let cookie = session_cookie(&mint_token(jwt_secret, "intern"));

    let (status, body) = get_json(&srv, "/dashboard/permissions", Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["permissions"]["reports.view"], true);
    assert_eq!(body["permissions"]["content.edit"], false);
}

#[tokio::test]
async fn unknown_capability_is_denied() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let cookie = session_cookie(&mint_token(jwt_secret, "admin"));

    let (status, body) = get_json(&srv, "/dashboard/permissions/reactor.launch", Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["granted"], false);

    let (_, body) = get_json(&srv, "/dashboard/permissions/content.publish", Some(&cookie)).await;
    assert_eq!(body["granted"], true);
}

#[tokio::test]
async fn rbac_registry_requires_user_management() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;

    let editor = session_cookie(&mint_token(jwt_secret, "editor"));
    let (status, body) = get_json(&srv, "/dashboard/rbac/roles", Some(&editor)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let admin = session_cookie(&mint_token(jwt_secret, "admin"));
    let (status, body) = get_json(&srv, "/dashboard/rbac/roles", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roles"]["viewer"]["permissions"]["content.edit"], false);
    assert_eq!(body["roles"]["editor"]["permissions"]["content.edit"], true);

    let (status, body) = get_json(&srv, "/dashboard/rbac/capabilities/users.manage", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["granted_by"], serde_json::json!(["admin"]));
}

#[tokio::test]
async fn whoami_is_public_and_reports_anonymous() {
    let srv = TestServer::spawn("test-secret").await;

    let (status, body) = get_json(&srv, "/whoami", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], false);
    assert!(body["user_id"].is_null());
}
