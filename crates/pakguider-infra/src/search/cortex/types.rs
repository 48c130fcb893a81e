//! Cortex Search REST API types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST .../cortex-search-services/{service}:query`.
#[derive(Debug, Clone, Serialize)]
pub struct CortexQueryRequest {
    pub query: String,
    pub columns: Vec<String>,
    pub limit: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CortexQueryResponse {
    #[serde(default)]
    pub results: Vec<Map<String, Value>>,
    #[serde(default)]
    pub request_id: Option<String>,
}

/// Body of `POST /session/v1/login-request`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub data: LoginRequestData,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct LoginRequestData {
    pub account_name: String,
    pub login_name: String,
    pub password: String,
    pub client_app_id: String,
    pub client_app_version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<LoginResponseData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponseData {
    #[serde(default)]
    pub token: Option<String>,
}
