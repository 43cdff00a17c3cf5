//! REST API test harness.
//!
//! Provides a test server over a fresh backend with the root container
//! created, plus request helpers for the LDP interactions.

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{HeaderName, HeaderValue, Method};
use axum_test::{TestRequest, TestResponse, TestServer};
use base64::{Engine, engine::general_purpose::STANDARD};
use ldp_persistence::backends::memory::MemoryBackend;
use ldp_persistence::core::ResourceStorage;
use ldp_rest::{AppState, ServerConfig, create_app_with_state};

#[cfg(feature = "sqlite")]
use ldp_persistence::backends::sqlite::SqliteBackend;

pub const CONTENT_TYPE: HeaderName = HeaderName::from_static("content-type");
pub const LINK: HeaderName = HeaderName::from_static("link");
pub const SLUG: HeaderName = HeaderName::from_static("slug");
pub const ACCEPT: HeaderName = HeaderName::from_static("accept");
pub const PREFER: HeaderName = HeaderName::from_static("prefer");
pub const IF_MATCH: HeaderName = HeaderName::from_static("if-match");
pub const IF_NONE_MATCH: HeaderName = HeaderName::from_static("if-none-match");
pub const IF_MODIFIED_SINCE: HeaderName = HeaderName::from_static("if-modified-since");
pub const AUTHORIZATION: HeaderName = HeaderName::from_static("authorization");

/// Origin of the test configuration's base URL.
pub const ORIGIN: &str = "http://localhost";

/// Root container IRI of the test configuration.
pub const BASE: &str = "http://localhost/rest";

/// Test harness for REST API testing.
///
/// # Example
///
/// ```rust,ignore
/// let harness = RestTestHarness::memory().await;
/// let response = harness.get("/rest/").await;
/// response.assert_status_ok();
/// ```
pub struct RestTestHarness<S> {
    /// The test server instance.
    pub server: TestServer,

    /// The application state the server runs on.
    pub state: AppState<S>,

    /// Credentials sent with every request, if any.
    credentials: Option<(String, String)>,
}

impl RestTestHarness<MemoryBackend> {
    /// Creates a harness over the in-memory backend.
    pub async fn memory() -> Self {
        Self::new(MemoryBackend::new(), ServerConfig::for_testing()).await
    }

    /// Creates a harness over the in-memory backend with `config`.
    pub async fn memory_with_config(config: ServerConfig) -> Self {
        Self::new(MemoryBackend::new(), config).await
    }
}

#[cfg(feature = "sqlite")]
impl RestTestHarness<SqliteBackend> {
    /// Creates a harness over an in-memory SQLite database.
    pub async fn sqlite() -> Self {
        let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
        backend.init_schema().expect("Failed to initialize schema");
        Self::new(backend, ServerConfig::for_testing()).await
    }
}

impl<S> RestTestHarness<S>
where
    S: ResourceStorage + 'static,
{
    /// Creates a new test harness with the given backend.
    pub async fn new(backend: S, config: ServerConfig) -> Self {
        let state = AppState::new(Arc::new(backend), config);
        state
            .repository()
            .init_root()
            .await
            .expect("Failed to create root container");

        let server =
            TestServer::new(create_app_with_state(state.clone())).expect("Failed to create test server");

        Self {
            server,
            state,
            credentials: None,
        }
    }

    /// Sends HTTP Basic credentials with every following request.
    pub fn login(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some((username.to_string(), password.to_string()));
        self
    }

    /// Starts a request, adding the harness credentials.
    pub fn request(&self, method: Method, path: &str) -> TestRequest {
        let request = self.server.method(method, path);
        match &self.credentials {
            Some((username, password)) => {
                let token = STANDARD.encode(format!("{}:{}", username, password));
                request.add_header(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Basic {}", token)).unwrap(),
                )
            }
            None => request,
        }
    }

    /// Makes a GET request.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path).await
    }

    /// Makes a GET request with an `Accept` header.
    pub async fn get_as(&self, path: &str, accept: &'static str) -> TestResponse {
        self.request(Method::GET, path)
            .add_header(ACCEPT, HeaderValue::from_static(accept))
            .await
    }

    /// Makes a POST request with a Turtle body and optional Link type.
    pub async fn post_turtle(
        &self,
        container: &str,
        body: &str,
        link_type: Option<&str>,
    ) -> TestResponse {
        self.post_turtle_request(container, body, link_type).await
    }

    /// Builds a POST request with a Turtle body and optional Link type,
    /// without sending it.
    pub fn post_turtle_request(
        &self,
        container: &str,
        body: &str,
        link_type: Option<&str>,
    ) -> TestRequest {
        with_link_type(
            self.request(Method::POST, container)
                .add_header(CONTENT_TYPE, HeaderValue::from_static("text/turtle"))
                .bytes(Bytes::from(body.to_string())),
            link_type,
        )
    }

    /// Makes a PUT request with a Turtle body and optional Link type.
    pub async fn put_turtle(&self, path: &str, body: &str, link_type: Option<&str>) -> TestResponse {
        with_link_type(
            self.request(Method::PUT, path)
                .add_header(CONTENT_TYPE, HeaderValue::from_static("text/turtle"))
                .bytes(Bytes::from(body.to_string())),
            link_type,
        )
        .await
    }

    /// Makes a PATCH request with a SPARQL Update body.
    pub async fn patch_sparql(&self, path: &str, update: &str) -> TestResponse {
        self.request(Method::PATCH, path)
            .add_header(
                CONTENT_TYPE,
                HeaderValue::from_static("application/sparql-update"),
            )
            .bytes(Bytes::from(update.to_string()))
            .await
    }

    /// Makes a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request(Method::DELETE, path).await
    }

    /// Creates a Turtle resource with a slug and returns its request path.
    pub async fn create(
        &self,
        container: &str,
        slug: &'static str,
        body: &str,
        link_type: Option<&str>,
    ) -> String {
        let response = with_link_type(
            self.request(Method::POST, container)
                .add_header(CONTENT_TYPE, HeaderValue::from_static("text/turtle"))
                .add_header(SLUG, HeaderValue::from_static(slug))
                .bytes(Bytes::from(body.to_string())),
            link_type,
        )
        .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        request_path(&response)
    }
}

fn with_link_type(request: TestRequest, link_type: Option<&str>) -> TestRequest {
    match link_type {
        Some(iri) => request.add_header(
            LINK,
            HeaderValue::from_str(&format!("<{}>; rel=\"type\"", iri)).unwrap(),
        ),
        None => request,
    }
}

/// Returns the request path of a response's `Location`.
pub fn request_path(response: &TestResponse) -> String {
    let location = response
        .headers()
        .get("location")
        .expect("Expected Location header")
        .to_str()
        .unwrap();
    location
        .strip_prefix(ORIGIN)
        .expect("Location outside the test origin")
        .to_string()
}
