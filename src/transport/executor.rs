//! Upstream call execution.
//!
//! # Responsibilities
//! - Issue exactly one outbound HTTP call per inbound request
//! - Encode the classified body (empty / raw / multipart form)
//! - Buffer the upstream response (status, content type, bytes)
//!
//! # Design Decisions
//! - A single shared reqwest client; connection pooling and TLS are
//!   transport concerns, not part of the relay contract
//! - Upstream non-2xx statuses are data to relay, never errors here;
//!   TransportError covers only network-level failure
//! - No retries and no extra timeout policy: one best-effort attempt

use axum::body::Bytes;
use axum::http::{Method, StatusCode};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart;
use thiserror::Error;

use crate::http::request::{FormPart, OutboundBody, DEFAULT_CONTENT_TYPE};

/// Network-level failure reaching upstream (DNS, connect, TLS, timeout).
#[derive(Debug, Error)]
#[error("upstream request failed: {0}")]
pub struct TransportError(#[from] reqwest::Error);

/// Fully buffered upstream response.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Bytes,
}

/// Executes upstream calls over a shared HTTP client.
#[derive(Clone)]
pub struct TransportExecutor {
    client: reqwest::Client,
}

impl TransportExecutor {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Send one request upstream and buffer the full response.
    ///
    /// Body-bearing requests always go upstream as POST regardless of
    /// the inbound verb; only body-less requests keep their original
    /// method.
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        body: OutboundBody,
    ) -> Result<UpstreamResponse, TransportError> {
        let method = match body {
            OutboundBody::Empty => method,
            OutboundBody::Raw { .. } | OutboundBody::Form { .. } => Method::POST,
        };
        let builder = self.client.request(method, url);

        let builder = match body {
            OutboundBody::Empty => builder,
            OutboundBody::Raw { bytes, content_type } => {
                builder.header(CONTENT_TYPE, content_type).body(bytes)
            }
            // reqwest computes the multipart boundary and Content-Type;
            // setting the header manually would break the encoding.
            OutboundBody::Form { parts } => builder.multipart(build_form(parts)),
        };

        let response = builder.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let body = response.bytes().await?;

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}

impl Default for TransportExecutor {
    fn default() -> Self {
        Self::new()
    }
}

fn build_form(parts: Vec<FormPart>) -> multipart::Form {
    let mut form = multipart::Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File {
                name,
                filename,
                content_type,
                bytes,
            } => {
                let file_part = multipart::Part::bytes(bytes.to_vec()).file_name(filename.clone());
                let file_part = match file_part.mime_str(&content_type) {
                    Ok(p) => p,
                    // An unparseable declared type falls back to the
                    // part without one rather than failing the request.
                    Err(_) => multipart::Part::bytes(bytes.to_vec()).file_name(filename),
                };
                form.part(name, file_part)
            }
        };
    }
    form
}
