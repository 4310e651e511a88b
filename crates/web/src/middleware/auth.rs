use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use ledger::models::Identity;
use uuid::Uuid;

use crate::error::WebError;

/// Resolves the bearer token, then hands the caller's [`Identity`] to the
/// handler through request extensions.
pub async fn require_auth(
    State(api_keys): State<ApiKeys>,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    let Some(identity) = token.and_then(|token| api_keys.resolve(token)) else {
        tracing::warn!("Invalid API key attempt");
        return Err(WebError::MissingToken);
    };

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Token registry loaded from `API_KEYS`.
///
/// Entries are comma separated, each `token=user_uuid` with an optional
/// `:admin` suffix.
#[derive(Clone, Default)]
pub struct ApiKeys {
    keys: Arc<HashMap<String, Identity>>,
}

impl ApiKeys {
    pub fn from_comma_separated(keys_str: &str) -> Result<Self> {
        let mut keys = HashMap::new();

        for entry in keys_str.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (token, subject) = entry
                .split_once('=')
                .with_context(|| format!("API key entry '{entry}' is missing '='"))?;
            let token = token.trim();
            if token.is_empty() {
                bail!("API key entry '{entry}' has an empty token");
            }

            let (user_id, is_admin) = match subject.trim().split_once(':') {
                Some((user_id, "admin")) => (user_id, true),
                Some((_, role)) => bail!("Unknown role '{role}' for API key '{token}'"),
                None => (subject.trim(), false),
            };
            let user_id: Uuid = user_id
                .parse()
                .with_context(|| format!("API key '{token}' has an invalid user id"))?;

            keys.insert(token.to_string(), Identity { user_id, is_admin });
        }

        Ok(Self {
            keys: Arc::new(keys),
        })
    }

    pub fn resolve(&self, token: &str) -> Option<Identity> {
        self.keys.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
