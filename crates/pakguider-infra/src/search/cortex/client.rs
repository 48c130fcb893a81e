//! CortexSearchProvider -- concrete [`SearchProvider`] for Snowflake Cortex Search.
//!
//! Queries a search service through the REST endpoint
//! `POST /api/v2/databases/{db}/schemas/{schema}/cortex-search-services/{service}:query`.
//!
//! Two authentication modes:
//! - a pre-issued token, sent as a bearer token;
//! - account / user / password, exchanged once for a session token via
//!   `POST /session/v1/login-request` and sent as `Snowflake Token="..."`.
//!
//! Credentials are held in [`SecretString`] and never logged.

use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;

use pakguider_core::search::provider::SearchProvider;
use pakguider_observe::genai_attrs::PROVIDER_CORTEX_SEARCH;
use pakguider_types::config::{DEFAULT_ROLE, DEFAULT_WAREHOUSE};
use pakguider_types::search::{
    PASSAGE_COLUMNS, SearchError, SearchRequest, SearchResponse, SearchServiceRef,
};

use super::types::{
    CortexQueryRequest, CortexQueryResponse, LoginRequest, LoginRequestData, LoginResponse,
};

const CLIENT_APP_ID: &str = "PakGuider";

/// How the provider authenticates.
pub enum CortexAuth {
    /// Pre-issued token (programmatic access token, OAuth or key-pair JWT).
    Token(SecretString),
    /// Password login exchanged for a session token on first use.
    Password {
        account: String,
        user: String,
        password: SecretString,
    },
}

/// Snowflake Cortex Search provider bound to one search service.
pub struct CortexSearchProvider {
    client: reqwest::Client,
    base_url: String,
    service: SearchServiceRef,
    role: String,
    warehouse: String,
    auth: CortexAuth,
    session_token: Mutex<Option<SecretString>>,
}

impl CortexSearchProvider {
    pub fn new(base_url: impl Into<String>, service: SearchServiceRef, auth: CortexAuth) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service,
            role: DEFAULT_ROLE.to_string(),
            warehouse: DEFAULT_WAREHOUSE.to_string(),
            auth,
            session_token: Mutex::new(None),
        }
    }

    /// Role and warehouse used when opening a password session.
    pub fn with_session_context(mut self, role: impl Into<String>, warehouse: impl Into<String>) -> Self {
        self.role = role.into();
        self.warehouse = warehouse.into();
        self
    }

    pub fn service(&self) -> &SearchServiceRef {
        &self.service
    }

    fn query_url(&self) -> String {
        format!(
            "{}/api/v2/databases/{}/schemas/{}/cortex-search-services/{}:query",
            self.base_url, self.service.database, self.service.schema, self.service.service
        )
    }

    fn login_url(&self) -> String {
        format!("{}/session/v1/login-request", self.base_url)
    }

    /// The `Authorization` header value for the next request.
    async fn authorization(&self) -> Result<String, SearchError> {
        match &self.auth {
            CortexAuth::Token(token) => Ok(format!("Bearer {}", token.expose_secret())),
            CortexAuth::Password {
                account,
                user,
                password,
            } => {
                let mut cached = self.session_token.lock().await;
                if cached.is_none() {
                    *cached = Some(self.login(account, user, password).await?);
                }
                match cached.as_ref() {
                    Some(token) => Ok(format!("Snowflake Token=\"{}\"", token.expose_secret())),
                    None => Err(SearchError::AuthenticationFailed(
                        "no session token".to_string(),
                    )),
                }
            }
        }
    }

    async fn login(
        &self,
        account: &str,
        user: &str,
        password: &SecretString,
    ) -> Result<SecretString, SearchError> {
        tracing::debug!(account, user, "Opening search session");

        let body = LoginRequest {
            data: LoginRequestData {
                account_name: account.to_string(),
                login_name: user.to_string(),
                password: password.expose_secret().to_string(),
                client_app_id: CLIENT_APP_ID.to_string(),
                client_app_version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        let response = self
            .client
            .post(self.login_url())
            .query(&[
                ("roleName", self.role.as_str()),
                ("warehouse", self.warehouse.as_str()),
                ("databaseName", self.service.database.as_str()),
                ("schemaName", self.service.schema.as_str()),
            ])
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(map_status(status, error_body, &self.service));
        }

        let login: LoginResponse = response.json().await.map_err(|e| {
            SearchError::Deserialization(format!("failed to parse login response: {e}"))
        })?;

        if !login.success {
            return Err(SearchError::AuthenticationFailed(
                login.message.unwrap_or_else(|| "login rejected".to_string()),
            ));
        }

        login
            .data
            .and_then(|d| d.token)
            .map(SecretString::from)
            .ok_or_else(|| SearchError::AuthenticationFailed("login returned no token".to_string()))
    }

    async fn forget_session(&self) {
        if matches!(self.auth, CortexAuth::Password { .. }) {
            *self.session_token.lock().await = None;
        }
    }

    /// Check that the service answers a minimal query.
    pub async fn probe(&self) -> Result<(), SearchError> {
        let request = SearchRequest {
            query: "Pakistan".to_string(),
            columns: PASSAGE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            limit: 1,
        };
        self.search(&request).await.map(|_| ())
    }
}

fn map_send_error(err: reqwest::Error) -> SearchError {
    if err.is_connect() {
        SearchError::Connection(err.to_string())
    } else {
        SearchError::Provider {
            message: format!("HTTP request failed: {err}"),
        }
    }
}

/// A 404 names the service path; the body adds nothing to it.
fn map_status(status: reqwest::StatusCode, body: String, service: &SearchServiceRef) -> SearchError {
    match status.as_u16() {
        401 | 403 => SearchError::AuthenticationFailed(format!("HTTP {status}: {body}")),
        404 => SearchError::NotConfigured(format!("{service} was not found")),
        _ => SearchError::Provider {
            message: format!("HTTP {status}: {body}"),
        },
    }
}

impl SearchProvider for CortexSearchProvider {
    fn name(&self) -> &str {
        PROVIDER_CORTEX_SEARCH
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let authorization = self.authorization().await?;
        let body = CortexQueryRequest {
            query: request.query.clone(),
            columns: request.columns.clone(),
            limit: request.limit,
        };

        let response = self
            .client
            .post(self.query_url())
            .header(AUTHORIZATION, authorization)
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                self.forget_session().await;
            }
            let error_body = response.text().await.unwrap_or_default();
            return Err(map_status(status, error_body, &self.service));
        }

        let cortex_resp: CortexQueryResponse = response.json().await.map_err(|e| {
            SearchError::Deserialization(format!("failed to parse search response: {e}"))
        })?;

        tracing::debug!(
            service = %self.service,
            results = cortex_resp.results.len(),
            "Search completed"
        );

        Ok(SearchResponse {
            results: cortex_resp.results,
            request_id: cortex_resp.request_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const QUERY_PATH: &str = "/api/v2/databases/MEDICALCHATBOT/schemas/PUBLIC/cortex-search-services/CC_SEARCH_SERVICE_CS:query";

    fn service() -> SearchServiceRef {
        SearchServiceRef {
            database: "MEDICALCHATBOT".into(),
            schema: "PUBLIC".into(),
            service: "CC_SEARCH_SERVICE_CS".into(),
        }
    }

    fn token_provider(base_url: &str) -> CortexSearchProvider {
        CortexSearchProvider::new(
            base_url,
            service(),
            CortexAuth::Token(SecretString::from("pat-123")),
        )
    }

    fn password_provider(base_url: &str) -> CortexSearchProvider {
        CortexSearchProvider::new(
            base_url,
            service(),
            CortexAuth::Password {
                account: "xy12345".into(),
                user: "guide".into(),
                password: SecretString::from("hunter2"),
            },
        )
    }

    fn rows_body() -> serde_json::Value {
        json!({
            "results": [
                {"CHUNK": "K2 base camp treks start in Skardu.", "FILE_URL": "s3://k2.pdf", "CATEGORY": "Trekking"}
            ],
            "request_id": "req-1"
        })
    }

    #[test]
    fn test_query_url() {
        let provider = token_provider("https://xy12345.snowflakecomputing.com/");
        assert_eq!(
            provider.query_url(),
            format!("https://xy12345.snowflakecomputing.com{QUERY_PATH}")
        );
        assert_eq!(provider.name(), "cortex_search");
    }

    #[tokio::test]
    async fn test_search_with_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(QUERY_PATH))
            .and(header("authorization", "Bearer pat-123"))
            .and(body_partial_json(json!({
                "query": "trekking",
                "columns": ["CHUNK", "FILE_URL", "CATEGORY"],
                "limit": 20
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows_body()))
            .expect(1)
            .mount(&server)
            .await;

        let provider = token_provider(&server.uri());
        let resp = provider
            .search(&SearchRequest::passages("trekking"))
            .await
            .unwrap();
        assert_eq!(resp.results.len(), 1);
        assert_eq!(resp.results[0]["CATEGORY"], "Trekking");
        assert_eq!(resp.request_id.as_deref(), Some("req-1"));
    }

    #[tokio::test]
    async fn test_password_login_once_then_reuse_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/session/v1/login-request"))
            .and(query_param("roleName", "ACCOUNTADMIN"))
            .and(query_param("warehouse", "COMPUTE_WH"))
            .and(query_param("databaseName", "MEDICALCHATBOT"))
            .and(body_partial_json(json!({
                "data": {"ACCOUNT_NAME": "xy12345", "LOGIN_NAME": "guide", "PASSWORD": "hunter2"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"token": "sess-1"}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(QUERY_PATH))
            .and(header("authorization", "Snowflake Token=\"sess-1\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows_body()))
            .expect(2)
            .mount(&server)
            .await;

        let provider = password_provider(&server.uri());
        provider.search(&SearchRequest::passages("a")).await.unwrap();
        provider.search(&SearchRequest::passages("b")).await.unwrap();
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/session/v1/login-request"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "Incorrect username or password was specified.",
                "data": null
            })))
            .mount(&server)
            .await;

        let err = password_provider(&server.uri())
            .search(&SearchRequest::passages("a"))
            .await
            .unwrap_err();
        match err {
            SearchError::AuthenticationFailed(msg) => assert!(msg.contains("Incorrect")),
            other => panic!("Expected AuthenticationFailed, got: {other}"),
        }
    }

    #[tokio::test]
    async fn test_expired_session_is_forgotten() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/session/v1/login-request"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"token": "sess-1"}
            })))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(QUERY_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("session expired"))
            .mount(&server)
            .await;

        let provider = password_provider(&server.uri());
        let first = provider.search(&SearchRequest::passages("a")).await;
        assert!(matches!(first, Err(SearchError::AuthenticationFailed(_))));
        let second = provider.search(&SearchRequest::passages("a")).await;
        assert!(second.is_err());
    }

    #[tokio::test]
    async fn test_server_error_maps_to_provider() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(QUERY_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("warehouse suspended"))
            .mount(&server)
            .await;

        let err = token_provider(&server.uri())
            .search(&SearchRequest::passages("a"))
            .await
            .unwrap_err();
        match err {
            SearchError::Provider { message } => {
                assert!(message.contains("500"));
                assert!(message.contains("warehouse suspended"));
            }
            other => panic!("Expected Provider error, got: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_service_maps_to_not_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(QUERY_PATH))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = token_provider(&server.uri())
            .search(&SearchRequest::passages("a"))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::NotConfigured(_)));
        assert_eq!(
            err.to_string(),
            "search service not configured: MEDICALCHATBOT.PUBLIC.CC_SEARCH_SERVICE_CS was not found"
        );
    }

    #[tokio::test]
    async fn test_unreachable_is_connection_error() {
        let err = token_provider("http://127.0.0.1:1")
            .search(&SearchRequest::passages("a"))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Connection(_)), "got: {err}");
    }

    #[tokio::test]
    async fn test_probe_uses_limit_one() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(QUERY_PATH))
            .and(body_partial_json(json!({"limit": 1})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .expect(1)
            .mount(&server)
            .await;

        token_provider(&server.uri()).probe().await.unwrap();
    }
}
