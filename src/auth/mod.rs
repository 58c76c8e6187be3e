//! Caller identity verification.
//!
//! The actual identity provider (token issuance, key rotation, signature
//! checking) is an external collaborator; this module is the seam. A
//! [`TokenVerifier`] resolves a bearer token to a stable user identity, and
//! the [`require_auth`] middleware guards the user-facing routes with it.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// A verified caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    /// Stable user identifier
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Token verification backend.
pub trait TokenVerifier: Send + Sync {
    /// Resolve a bearer token. `None` means unauthenticated.
    fn verify(&self, token: &str) -> Option<UserIdentity>;
}

/// One configured bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenEntry {
    pub token: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
}

/// In-memory token store fed from the config file.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, UserIdentity>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configured entries.
    pub fn from_entries(entries: &[TokenEntry]) -> Self {
        let mut verifier = Self::new();
        for entry in entries {
            verifier.add(entry.clone());
        }
        verifier
    }

    /// Add a token.
    pub fn add(&mut self, entry: TokenEntry) {
        self.tokens.insert(
            entry.token,
            UserIdentity {
                id: entry.user_id,
                name: entry.name,
                email: entry.email,
            },
        );
    }
}

impl TokenVerifier for StaticTokenVerifier {
    fn verify(&self, token: &str) -> Option<UserIdentity> {
        self.tokens.get(token).cloned()
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "error": "unauthorized" })),
    )
        .into_response()
}

/// Middleware guarding the user-facing routes.
///
/// Extracts the `Authorization: Bearer` header, verifies it, and injects
/// the [`UserIdentity`] into request extensions for the handlers.
pub async fn require_auth(
    State(verifier): State<Arc<dyn TokenVerifier>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = token else {
        return unauthorized();
    };

    match verifier.verify(token) {
        Some(user) => {
            debug!(user = %user.id, "authenticated request");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => unauthorized(),
    }
}
