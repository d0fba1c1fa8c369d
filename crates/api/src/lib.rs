//! Suggestion store HTTP client.
//!
//! This module provides a lightweight client for the back-office suggestion
//! endpoints. It focuses on:
//!
//! - Constructing an HTTP client with sensible defaults (timeout, Accept,
//!   User-Agent, optional bearer token)
//! - Validating the configured base URL for safety
//! - Issuing the two calls the input widgets need: search and save
//!
//! The primary entry point is [`SuggestionClient`].
//!
//! # Example
//!
//! ```ignore
//! use fieldhint_api::SuggestionClient;
//! use fieldhint_util::ApiSettings;
//!
//! async fn demo() -> anyhow::Result<()> {
//!     let client = SuggestionClient::new(&ApiSettings::default())?;
//!     let rows = client.search(&"client_notes".into(), "Vil").await?;
//!     println!("{} suggestions", rows.len());
//!     Ok(())
//! }
//! ```

use std::env;

use anyhow::{Context, Result, anyhow};
use fieldhint_types::{FieldType, SaveSuggestion, Suggestion};
use fieldhint_util::{ApiSettings, redact_sensitive, truncate_for_summary};
use reqwest::{Client, RequestBuilder, Url, header};
use serde::Deserialize;
use tracing::debug;

/// Hostnames allowed for local development regardless of scheme.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1", "[::1]"];

/// Search responses come either as a bare array or wrapped in `results`.
#[derive(Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    Bare(Vec<Suggestion>),
    Envelope { results: Vec<Suggestion> },
}

impl SearchResponse {
    fn into_suggestions(self) -> Vec<Suggestion> {
        match self {
            Self::Bare(rows) | Self::Envelope { results: rows } => rows,
        }
    }
}

/// Thin wrapper around a configured `reqwest::Client` for the suggestion store.
#[derive(Debug, Clone)]
pub struct SuggestionClient {
    pub base_url: String,
    pub http: Client,
    pub user_agent: String,
    search_path: String,
    save_path: String,
}

impl SuggestionClient {
    /// Construct a client from API settings.
    ///
    /// Non-localhost hosts must use HTTPS. When a token is configured it is sent
    /// as `Authorization: Bearer <token>` with every request.
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(token) = settings.token.as_deref().map(str::trim).filter(|token| !token.is_empty()) {
            let mut value =
                header::HeaderValue::from_str(&format!("Bearer {token}")).context("API token contains invalid header characters")?;
            value.set_sensitive(true);
            default_headers.insert(header::AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(settings.timeout())
            .build()
            .context("build http client")?;

        let base_url = settings.base_url.trim_end_matches('/').to_string();
        validate_base_url(&base_url)?;
        Ok(Self {
            base_url,
            http,
            user_agent: format!("fieldhint/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
            search_path: settings.search_path.clone(),
            save_path: settings.save_path.clone(),
        })
    }

    /// Build a `reqwest::RequestBuilder` for a method and API-relative path.
    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %redact_sensitive(&url), %method, "building request");

        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }

    /// Query previously stored values of `field_type` matching `query`.
    pub async fn search(&self, field_type: &FieldType, query: &str) -> Result<Vec<Suggestion>> {
        let response = self
            .request(reqwest::Method::GET, &self.search_path)
            .query(&[("field_type", field_type.as_str()), ("q", query)])
            .send()
            .await
            .context("suggestion search request failed")?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(anyhow!("suggestion search returned HTTP {}: {}", status.as_u16(), truncate_for_summary(&text, 160)));
        }

        let parsed: SearchResponse = serde_json::from_str(&text).context("decode suggestion search response")?;
        let suggestions = parsed.into_suggestions();
        debug!(field_type = %field_type, result_count = suggestions.len(), "suggestion search completed");
        Ok(suggestions)
    }

    /// Store (or re-count) a finalised value. The response body is ignored.
    pub async fn save(&self, field_type: &FieldType, value: &str) -> Result<()> {
        let body = SaveSuggestion {
            field_type: field_type.clone(),
            value: value.to_string(),
        };
        let response = self
            .request(reqwest::Method::POST, &self.save_path)
            .json(&body)
            .send()
            .await
            .context("suggestion save request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("suggestion save returned HTTP {}", status.as_u16()));
        }
        debug!(field_type = %field_type, "suggestion saved");
        Ok(())
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost`, `127.0.0.1` or `[::1]`: any scheme is allowed
/// - otherwise: scheme must be HTTPS
fn validate_base_url(base: &str) -> Result<()> {
    let parsed_base_url = Url::parse(base).map_err(|e| anyhow!("Invalid API base URL '{}': {}", base, e))?;

    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| anyhow!("API base URL must include a host"))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if parsed_base_url.scheme() != "https" {
        return Err(anyhow!(
            "API base URL must use https for non-localhost hosts; got '{}://'",
            parsed_base_url.scheme()
        ));
    }

    Ok(())
}
