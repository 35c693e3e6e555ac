//! Append-only diagnostic log.
//!
//! # Responsibilities
//! - Record one block of lines per relayed transaction: target URL,
//!   inbound method and body, outbound body, upstream response
//!   metadata and body, then a separator
//! - Never interfere with the relay: a write failure is swallowed
//!
//! # Design Decisions
//! - Plain line-oriented file, opened in append mode per write; the
//!   format is advisory, not a stability contract
//! - Disabled sinks skip string rendering entirely

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use serde_json::json;

use crate::config::DiagnosticsConfig;
use crate::http::request::{FormPart, OutboundBody};

const SEPARATOR_WIDTH: usize = 50;

/// Sink for per-transaction diagnostic lines.
///
/// Cheap to clone; all clones append to the same file.
#[derive(Debug, Clone)]
pub struct DiagnosticSink {
    path: Option<Arc<PathBuf>>,
}

impl DiagnosticSink {
    pub fn from_config(config: &DiagnosticsConfig) -> Self {
        if config.enabled {
            Self {
                path: Some(Arc::new(PathBuf::from(&config.log_path))),
            }
        } else {
            Self::disabled()
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    /// Start of a transaction: the upstream URL about to be called.
    pub fn query_init(&self, url: &str) {
        if !self.is_enabled() {
            return;
        }
        let ts = Local::now().format("%Y-%m-%d %H:%M:%S");
        self.write_line(&format!("[{ts}] Query init. URL: {url}"));
    }

    pub fn inbound_method(&self, method: &str) {
        self.write_line_if_enabled(|| format!("HTTP Request: {method}"));
    }

    pub fn inbound_body(&self, body: &[u8]) {
        self.write_line_if_enabled(|| format!("HTTP Raw Input: {}", String::from_utf8_lossy(body)));
    }

    /// Outbound body about to be sent upstream. Raw bodies are logged
    /// verbatim; form bodies as a JSON summary with file contents
    /// reduced to filename/type/size.
    pub fn outbound_body(&self, body: &OutboundBody) {
        if !self.is_enabled() {
            return;
        }
        let rendered = match body {
            OutboundBody::Empty => return,
            OutboundBody::Raw { bytes, .. } => String::from_utf8_lossy(bytes).into_owned(),
            OutboundBody::Form { parts } => {
                let fields: serde_json::Map<String, serde_json::Value> = parts
                    .iter()
                    .map(|part| match part {
                        FormPart::Text { name, value } => (name.clone(), json!(value)),
                        FormPart::File {
                            name,
                            filename,
                            content_type,
                            bytes,
                        } => (
                            name.clone(),
                            json!({
                                "filename": filename,
                                "content_type": content_type,
                                "size": bytes.len(),
                            }),
                        ),
                    })
                    .collect();
                serde_json::Value::Object(fields).to_string()
            }
        };
        self.write_line(&format!("Upstream request body: {rendered}"));
    }

    pub fn response_meta(&self, status: u16, content_type: &str, size_upload: usize, size_download: usize) {
        self.write_line_if_enabled(|| {
            format!(
                "Response headers: code={status}; content_type={content_type}; \
                 size_upload={size_upload}; size_download={size_download};"
            )
        });
    }

    pub fn response_body(&self, body: &[u8]) {
        self.write_line_if_enabled(|| format!("Response body: {}", String::from_utf8_lossy(body)));
    }

    /// Transaction separator.
    pub fn separator(&self) {
        self.write_line_if_enabled(|| "-".repeat(SEPARATOR_WIDTH));
    }

    fn write_line_if_enabled(&self, render: impl FnOnce() -> String) {
        if self.is_enabled() {
            self.write_line(&render());
        }
    }

    fn write_line(&self, line: &str) {
        let Some(path) = &self.path else {
            return;
        };
        let result = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())
            .and_then(|mut file| writeln!(file, "{line}"));
        if let Err(e) = result {
            // Diagnostics must never abort the relay.
            tracing::debug!(path = %path.display(), error = %e, "diagnostic write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    fn temp_log_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tg-relay-sink-{tag}-{}.log", uuid::Uuid::new_v4()))
    }

    fn sink_for(path: &std::path::Path) -> DiagnosticSink {
        DiagnosticSink::from_config(&DiagnosticsConfig {
            enabled: true,
            log_path: path.display().to_string(),
        })
    }

    #[test]
    fn writes_transaction_lines() {
        let path = temp_log_path("lines");
        let sink = sink_for(&path);

        sink.query_init("https://api.telegram.org/bot1/getMe");
        sink.inbound_method("GET");
        sink.response_meta(200, "application/json", 0, 18);
        sink.response_body(b"{\"ok\":true}");
        sink.separator();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Query init. URL: https://api.telegram.org/bot1/getMe"));
        assert!(contents.contains("HTTP Request: GET"));
        assert!(contents.contains("code=200; content_type=application/json"));
        assert!(contents.contains("Response body: {\"ok\":true}"));
        assert!(contents.contains(&"-".repeat(SEPARATOR_WIDTH)));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn form_body_logged_as_summary() {
        let path = temp_log_path("form");
        let sink = sink_for(&path);

        sink.outbound_body(&OutboundBody::Form {
            parts: vec![
                FormPart::Text {
                    name: "chat_id".to_string(),
                    value: "42".to_string(),
                },
                FormPart::File {
                    name: "document".to_string(),
                    filename: "notes.txt".to_string(),
                    content_type: "text/plain".to_string(),
                    bytes: Bytes::from_static(b"hello"),
                },
            ],
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"chat_id\":\"42\""));
        assert!(contents.contains("\"filename\":\"notes.txt\""));
        assert!(contents.contains("\"size\":5"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn disabled_sink_writes_nothing() {
        let sink = DiagnosticSink::disabled();
        assert!(!sink.is_enabled());
        // No file to check; the point is that nothing panics.
        sink.query_init("https://api.telegram.org/");
        sink.separator();
    }

    #[test]
    fn unwritable_path_is_swallowed() {
        let sink = sink_for(std::path::Path::new("/nonexistent-dir/sub/relay.log"));
        sink.query_init("https://api.telegram.org/");
        sink.inbound_body(b"body");
        sink.separator();
    }
}
