//! Async HTTP client for the finance API.
//!
//! Every endpoint wraps its payload in `{success, data, error}`; unwrapping
//! happens here so callers only ever see typed results. Transport failures,
//! server-side rejections and malformed bodies all surface as [`ApiError`],
//! which controllers store as state; nothing propagates into rendering.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::core::filter::{
    FilterCriteria, TransactionMode, TransactionStatus, TransactionType,
};
use crate::core::models::{ResultEnvelope, TransactionPage, UserList, UserProfile};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level or HTTP-status failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered but flagged the request as unsuccessful.
    #[error("server rejected request: {0}")]
    Rejected(String),

    /// The response decoded but did not carry the expected shape.
    #[error("malformed server response: {0}")]
    Shape(String),
}

/// Standard wrapper around every API payload.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    error: Option<Value>,
}

impl<T> ApiEnvelope<T> {
    fn into_data(self) -> Result<T, ApiError> {
        if !self.success {
            let reason = match self.error {
                Some(Value::String(s)) => s,
                Some(other) => other.to_string(),
                None => "unspecified error".to_string(),
            };
            return Err(ApiError::Rejected(reason));
        }
        self.data
            .ok_or_else(|| ApiError::Shape("missing data field".to_string()))
    }
}

/// Request body for `/transactions/get`. Field names are the server's.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionsRequest {
    #[serde(rename = "pageNumber")]
    pub page_number: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "fromDate", skip_serializing_if = "Option::is_none")]
    pub from_date: Option<String>,
    #[serde(rename = "toDate", skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    #[serde(rename = "transactionMode", skip_serializing_if = "Option::is_none")]
    pub transaction_mode: Option<TransactionMode>,
    #[serde(rename = "transactionType", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
}

impl TransactionsRequest {
    pub fn new(
        page_number: u32,
        page_size: u32,
        user_id: impl Into<String>,
        filters: &FilterCriteria,
    ) -> Self {
        Self {
            page_number,
            page_size,
            user_id: user_id.into(),
            from_date: filters.from_instant(),
            to_date: filters.to_instant(),
            status: filters.status,
            transaction_mode: filters.transaction_mode,
            transaction_type: filters.transaction_type,
        }
    }
}

/// Request body for `/query`.
#[derive(Debug, Clone, Serialize)]
struct QueryRequest<'a> {
    session_id: &'a str,
    query: &'a str,
}

/// Thin typed facade over the HTTP endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(concat!("fintui/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { http, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch one page slice of transactions for a user. The server performs
    /// all filtering and pagination; the client sends criteria verbatim.
    pub async fn fetch_transactions(
        &self,
        request: &TransactionsRequest,
    ) -> Result<TransactionPage, ApiError> {
        debug!(
            page = request.page_number,
            size = request.page_size,
            "fetching transactions"
        );
        let envelope: ApiEnvelope<TransactionPage> = self
            .http
            .post(self.url("/transactions/get"))
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        envelope.into_data()
    }

    /// Submit a natural-language query and get back a result envelope.
    pub async fn fetch_insights(
        &self,
        session_id: &str,
        query: &str,
    ) -> Result<ResultEnvelope, ApiError> {
        debug!(%session_id, "submitting insight query");
        let envelope: ApiEnvelope<ResultEnvelope> = self
            .http
            .post(self.url("/query"))
            .json(&QueryRequest { session_id, query })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        envelope.into_data()
    }

    /// Fetch the selectable user identities.
    pub async fn fetch_users(&self) -> Result<Vec<UserProfile>, ApiError> {
        let envelope: ApiEnvelope<UserList> = self
            .http
            .get(self.url("/users/all"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(envelope.into_data()?.items)
    }
}
