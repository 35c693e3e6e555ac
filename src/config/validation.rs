//! Configuration validation.
//!
//! Serde handles syntactic errors; this module covers semantic checks:
//! the upstream base URL must be a well-formed absolute http(s) URL and
//! the mount prefix, when set, must be a rooted path. All errors are
//! collected and reported together rather than failing on the first.

use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `listener.bind_address` is empty.
    EmptyBindAddress,

    /// `upstream.base_url` does not parse as an absolute URL.
    InvalidBaseUrl { url: String, reason: String },

    /// `upstream.base_url` uses a scheme other than http/https.
    UnsupportedScheme { url: String, scheme: String },

    /// `upstream.base_url` ends with a slash; upstream URLs are built by
    /// plain concatenation with a rooted path, so this would double up.
    BaseUrlTrailingSlash { url: String },

    /// `upstream.mount_prefix` is non-empty but does not start with `/`.
    MountPrefixNotRooted { prefix: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyBindAddress => {
                write!(f, "listener.bind_address must not be empty")
            }
            ValidationError::InvalidBaseUrl { url, reason } => {
                write!(f, "upstream.base_url {:?} is not a valid URL: {}", url, reason)
            }
            ValidationError::UnsupportedScheme { url, scheme } => {
                write!(f, "upstream.base_url {:?} has unsupported scheme {:?}", url, scheme)
            }
            ValidationError::BaseUrlTrailingSlash { url } => {
                write!(f, "upstream.base_url {:?} must not end with a slash", url)
            }
            ValidationError::MountPrefixNotRooted { prefix } => {
                write!(f, "upstream.mount_prefix {:?} must start with a slash", prefix)
            }
        }
    }
}

/// Validate a parsed configuration, returning every error found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }

    let base_url = &config.upstream.base_url;
    match Url::parse(base_url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                errors.push(ValidationError::UnsupportedScheme {
                    url: base_url.clone(),
                    scheme: scheme.to_string(),
                });
            }
        }
        Err(e) => {
            errors.push(ValidationError::InvalidBaseUrl {
                url: base_url.clone(),
                reason: e.to_string(),
            });
        }
    }
    if base_url.ends_with('/') {
        errors.push(ValidationError::BaseUrlTrailingSlash {
            url: base_url.clone(),
        });
    }

    let prefix = &config.upstream.mount_prefix;
    if !prefix.is_empty() && !prefix.starts_with('/') {
        errors.push(ValidationError::MountPrefixNotRooted {
            prefix: prefix.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
