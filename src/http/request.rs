//! Inbound request translation.
//!
//! # Responsibilities
//! - Map the inbound path+query onto the fixed upstream base URL,
//!   stripping the mount prefix the relay is deployed under
//! - Classify the inbound body into an explicit outbound shape:
//!   empty, raw bytes, or a multipart form with file parts
//!
//! # Design Decisions
//! - Translation is infallible: any inbound URI yields a well-formed
//!   upstream URL; no path canonicalization or traversal filtering
//! - Body shape is decided once per request as a tagged union, and the
//!   transport layer dispatches on it
//! - Inbound multipart bodies are parsed with multer (the same parser
//!   axum's extractor uses); a body that fails to parse degrades to a
//!   raw byte passthrough so nothing is dropped

use std::convert::Infallible;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, Method};
use futures_util::stream;

/// Content type assumed when the inbound request declares none, and
/// reported when upstream omits one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Outbound body shape, decided once per request.
#[derive(Debug, Clone)]
pub enum OutboundBody {
    /// No body; the original method is still forwarded verbatim.
    Empty,
    /// Raw byte passthrough with a single Content-Type header.
    Raw { bytes: Bytes, content_type: String },
    /// Re-encoded multipart form. The transport layer lets the HTTP
    /// client compute the boundary; Content-Type is never hand-set.
    Form { parts: Vec<FormPart> },
}

impl OutboundBody {
    /// Approximate payload size, for diagnostics only.
    pub fn payload_len(&self) -> usize {
        match self {
            OutboundBody::Empty => 0,
            OutboundBody::Raw { bytes, .. } => bytes.len(),
            OutboundBody::Form { parts } => parts
                .iter()
                .map(|p| match p {
                    FormPart::Text { value, .. } => value.len(),
                    FormPart::File { bytes, .. } => bytes.len(),
                })
                .sum(),
        }
    }
}

/// One named field of a multipart form.
#[derive(Debug, Clone)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        filename: String,
        content_type: String,
        bytes: Bytes,
    },
}

/// Build the upstream URL for an inbound path+query.
///
/// The mount prefix is stripped when present, the remainder is forced
/// to start with `/`, and the result is plain concatenation onto the
/// base URL. A request for exactly the mount prefix maps to `/`.
pub fn upstream_url(base_url: &str, mount_prefix: &str, path_and_query: &str) -> String {
    let rest = if !mount_prefix.is_empty() && path_and_query.starts_with(mount_prefix) {
        &path_and_query[mount_prefix.len()..]
    } else {
        path_and_query
    };

    if rest.starts_with('/') {
        format!("{base_url}{rest}")
    } else {
        format!("{base_url}/{rest}")
    }
}

/// Classify an inbound request body into its outbound shape.
///
/// Evaluation order matches the relay contract:
/// 1. the request is body-bearing iff the method is POST, the raw body
///    is non-empty, or parseable form fields are present;
/// 2. body-bearing with at least one file field → multipart form;
/// 3. body-bearing otherwise → raw passthrough with the declared
///    content type (default `application/json`);
/// 4. anything else → no body, original method forwarded as-is.
pub async fn classify(method: &Method, headers: &HeaderMap, body: Bytes) -> OutboundBody {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let parts = match content_type.as_deref().map(multer::parse_boundary) {
        Some(Ok(boundary)) if !body.is_empty() => parse_form(body.clone(), boundary).await,
        _ => None,
    };
    let has_form_fields = parts.as_ref().is_some_and(|p| !p.is_empty());

    if *method != Method::POST && body.is_empty() && !has_form_fields {
        return OutboundBody::Empty;
    }

    match parts {
        Some(parts) if parts.iter().any(|p| matches!(p, FormPart::File { .. })) => {
            OutboundBody::Form { parts }
        }
        // Form fields without files go through as the original bytes;
        // the inbound content type still carries its own boundary.
        _ => OutboundBody::Raw {
            content_type: content_type.unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            bytes: body,
        },
    }
}

/// Parse a buffered multipart body into named parts.
///
/// Returns `None` on any parse error; the caller falls back to raw
/// passthrough. Fields without a name are skipped, matching how form
/// decoding treats them everywhere else.
async fn parse_form(body: Bytes, boundary: String) -> Option<Vec<FormPart>> {
    let body_stream = stream::once(async move { Ok::<_, Infallible>(body) });
    let mut multipart = multer::Multipart::new(body_stream, boundary);

    let mut parts = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(_) => return None,
        };

        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let filename = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(|m| m.to_string());
        let bytes = field.bytes().await.ok()?;

        parts.push(match filename {
            Some(filename) => FormPart::File {
                name,
                filename,
                content_type: content_type
                    .unwrap_or_else(|| "application/octet-stream".to_string()),
                bytes,
            },
            None => FormPart::Text {
                name,
                value: String::from_utf8_lossy(&bytes).into_owned(),
            },
        });
    }

    Some(parts)
}
