// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Skylark assistant service.

use thiserror::Error;

/// The primary error type used across Skylark crates.
#[derive(Debug, Error)]
pub enum SkylarkError {
    /// No or invalid session identity. Terminal for the turn.
    #[error("unauthorized")]
    Unauthorized,

    /// Malformed caller input (bad JSON, missing required field, unsupported
    /// content type, oversize payload).
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// An attachment that cannot be expressed in the active provider's shape.
    /// Surfaced to callers the same way as [`SkylarkError::MalformedInput`].
    #[error("unsupported attachment shape: {0}")]
    UnsupportedAttachmentShape(String),

    /// Requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Model provider errors (API failure, quota, malformed request).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Classification of a model provider failure, derived from its message text.
///
/// Upstream SDK errors arrive as opaque strings, so the only portable signal
/// is message content. The classification decides the HTTP status the caller
/// sees; the raw message is logged, never forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Rate limit or quota exhaustion. Caller should retry later.
    QuotaExceeded,
    /// Invalid or unauthorized API credentials.
    PermissionDenied,
    /// The request shape was rejected by the provider (bad content type, etc.).
    UnsupportedFormat,
    /// Anything else.
    Unknown,
}

impl ProviderErrorKind {
    /// Classifies a provider error message into a [`ProviderErrorKind`].
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("quota")
            || lower.contains("rate limit")
            || lower.contains("resource exhausted")
        {
            ProviderErrorKind::QuotaExceeded
        } else if lower.contains("permission")
            || lower.contains("forbidden")
            || lower.contains("api key")
        {
            ProviderErrorKind::PermissionDenied
        } else if lower.contains("unsupported") || lower.contains("invalid format") {
            ProviderErrorKind::UnsupportedFormat
        } else {
            ProviderErrorKind::Unknown
        }
    }

    /// HTTP status code for this classification.
    pub fn status_code(&self) -> u16 {
        match self {
            ProviderErrorKind::QuotaExceeded => 429,
            ProviderErrorKind::PermissionDenied => 403,
            ProviderErrorKind::UnsupportedFormat => 400,
            ProviderErrorKind::Unknown => 500,
        }
    }

    /// Short caller-facing message for this classification. Never includes
    /// the upstream error text.
    pub fn user_message(&self) -> &'static str {
        match self {
            ProviderErrorKind::QuotaExceeded => {
                "the assistant is over capacity, please try again later"
            }
            ProviderErrorKind::PermissionDenied => "the assistant is not available",
            ProviderErrorKind::UnsupportedFormat => "the request could not be processed",
            ProviderErrorKind::Unknown => "something went wrong, please try again",
        }
    }
}

impl SkylarkError {
    /// HTTP status code this error surfaces as at the gateway.
    pub fn http_status(&self) -> u16 {
        match self {
            SkylarkError::Unauthorized => 401,
            SkylarkError::MalformedInput(_) | SkylarkError::UnsupportedAttachmentShape(_) => 400,
            SkylarkError::NotFound(_) => 404,
            SkylarkError::Provider { message, .. } => {
                ProviderErrorKind::classify(message).status_code()
            }
            SkylarkError::Storage { .. }
            | SkylarkError::Config(_)
            | SkylarkError::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_quota_messages() {
        assert_eq!(
            ProviderErrorKind::classify("Quota exceeded for model"),
            ProviderErrorKind::QuotaExceeded
        );
        assert_eq!(
            ProviderErrorKind::classify("429: rate limit reached"),
            ProviderErrorKind::QuotaExceeded
        );
        assert_eq!(
            ProviderErrorKind::classify("RESOURCE EXHAUSTED"),
            ProviderErrorKind::QuotaExceeded
        );
    }

    #[test]
    fn classify_permission_messages() {
        assert_eq!(
            ProviderErrorKind::classify("Permission denied on project"),
            ProviderErrorKind::PermissionDenied
        );
        assert_eq!(
            ProviderErrorKind::classify("invalid API key provided"),
            ProviderErrorKind::PermissionDenied
        );
    }

    #[test]
    fn classify_unknown_falls_through() {
        assert_eq!(
            ProviderErrorKind::classify("connection reset by peer"),
            ProviderErrorKind::Unknown
        );
    }

    #[test]
    fn status_codes_match_classification() {
        assert_eq!(ProviderErrorKind::QuotaExceeded.status_code(), 429);
        assert_eq!(ProviderErrorKind::PermissionDenied.status_code(), 403);
        assert_eq!(ProviderErrorKind::UnsupportedFormat.status_code(), 400);
        assert_eq!(ProviderErrorKind::Unknown.status_code(), 500);
    }

    #[test]
    fn error_http_status_mapping() {
        assert_eq!(SkylarkError::Unauthorized.http_status(), 401);
        assert_eq!(SkylarkError::MalformedInput("bad".into()).http_status(), 400);
        assert_eq!(
            SkylarkError::UnsupportedAttachmentShape("inline".into()).http_status(),
            400
        );
        assert_eq!(SkylarkError::NotFound("chat".into()).http_status(), 404);
        assert_eq!(
            SkylarkError::Provider {
                message: "quota exceeded".into(),
                source: None,
            }
            .http_status(),
            429
        );
        assert_eq!(
            SkylarkError::Provider {
                message: "socket closed".into(),
                source: None,
            }
            .http_status(),
            500
        );
    }
}
