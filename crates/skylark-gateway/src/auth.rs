// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-token authentication middleware.
//!
//! The session provider is external to this core; all the gateway consumes
//! is a yes/no plus a user identifier, here derived from a configured
//! token-to-user map. When no tokens are configured, all requests are
//! rejected (fail-closed).

use std::collections::HashMap;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

/// Authentication configuration for the gateway.
#[derive(Clone, Default)]
pub struct AuthConfig {
    /// Accepted bearer tokens mapped to the user id they authenticate.
    pub tokens: HashMap<String, String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("tokens", &format!("[{} redacted]", self.tokens.len()))
            .finish()
    }
}

/// The authenticated caller, inserted as a request extension on success.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub String);

/// Middleware that validates the `Authorization: Bearer` header against the
/// configured token map and threads the resolved user id to handlers.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth.tokens.is_empty() {
        tracing::error!("gateway has no auth tokens configured -- rejecting request");
        return Err(StatusCode::UNAUTHORIZED);
    }

    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if let Some(user_id) = token.and_then(|t| auth.tokens.get(t)) {
        request
            .extensions_mut()
            .insert(AuthenticatedUser(user_id.clone()));
        return Ok(next.run(request).await);
    }

    Err(StatusCode::UNAUTHORIZED)
}
