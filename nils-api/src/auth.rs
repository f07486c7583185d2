//! Login, password hashing and in-memory session state.
//!
//! Endpoint: `POST /moonshot/as/auth/login` with `{email, password}` JSON.
//! NILS expects the password as a lowercase SHA-1 hex digest (a legacy of
//! the upstream system; the transport is TLS). A successful login answers
//! with the [`User`] record and one or more `set-cookie` headers; the
//! joined cookies authenticate every subsequent call.
//!
//! The session lives in memory only. It is dropped on any 401/403 response
//! and on a failed login, so the next operation transparently re-logins.

use crate::client::NilsClient;
use crate::error::{NilsError, Result};
use crate::types::User;
use reqwest::header;
use serde_json::{json, Value};
use sha1::{Digest, Sha1};

/// Login password, raw or already digested.
#[derive(Clone)]
pub enum Password {
    /// Plain password; hashed on first login and the digest cached.
    Raw(String),
    /// Pre-computed lowercase SHA-1 hex digest.
    Hashed(String),
}

/// Mutable per-client session state, guarded by the client's mutex.
#[derive(Default)]
pub(crate) struct SessionState {
    pub(crate) user: Option<User>,
    pub(crate) cookie: Option<String>,
    pub(crate) hashed_password: Option<String>,
}

/// Lowercase SHA-1 hex digest of a raw password.
pub fn hash_password(raw: &str) -> String {
    let digest = Sha1::digest(raw.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

impl NilsClient {
    /// Log in and cache the session.
    ///
    /// With `force == false` a cached session short-circuits without a
    /// request. On 401/403/500 the cached user is dropped and the body is
    /// normalized ([`NilsError::Api`] or [`NilsError::Unknown`]).
    pub fn login(&self, force: bool) -> Result<User> {
        {
            let state = self.session();
            if !force && state.cookie.is_some() {
                if let Some(user) = &state.user {
                    return Ok(user.clone());
                }
            }
        }

        let password = self.hashed_password();
        let resp = self
            .http
            .post(self.url("/moonshot/as/auth/login"))
            .json(&json!({
                "email": self.options.email,
                "password": password,
            }))
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        let cookies: Vec<&str> = resp
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        {
            let mut state = self.session();
            state.cookie = if cookies.is_empty() {
                None
            } else {
                Some(cookies.join(";"))
            };
        }

        if matches!(status.as_u16(), 401 | 403 | 500) {
            self.session().user = None;
            let text = resp.text().unwrap_or_default();
            let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
            return Err(self.api_error(status, &body));
        }

        let text = resp.text().map_err(|e| self.transport_error(e))?;
        let user: User = match serde_json::from_str(&text) {
            Ok(user) => user,
            Err(e) => {
                let err = NilsError::Json(e);
                self.report(&err);
                return Err(err);
            }
        };
        self.session().user = Some(user.clone());
        Ok(user)
    }

    /// Drop the cached session; the next operation logs in again.
    pub fn logout(&self) {
        let mut state = self.session();
        state.user = None;
        state.cookie = None;
    }

    /// The digest sent as the login password, computed once per client.
    pub(crate) fn hashed_password(&self) -> String {
        match &self.options.password {
            Password::Hashed(digest) => digest.clone(),
            Password::Raw(raw) => {
                let mut state = self.session();
                if let Some(digest) = &state.hashed_password {
                    return digest.clone();
                }
                let digest = hash_password(raw);
                state.hashed_password = Some(digest.clone());
                digest
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::NilsOptions;

    #[test]
    fn sha1_digest_matches_known_vector() {
        assert_eq!(
            hash_password("password"),
            "5baa61e4c9b93f3f0682250b6cf8331b7ee68fd8"
        );
    }

    #[test]
    fn hashing_is_deterministic() {
        assert_eq!(hash_password("s3cret"), hash_password("s3cret"));
    }

    #[test]
    fn raw_password_digest_is_cached() {
        let client = NilsClient::new(NilsOptions::new(
            "https://nils.invalid",
            "sa@example.com",
            Password::Raw("s3cret".into()),
        ))
        .unwrap();

        assert!(client.session().hashed_password.is_none());
        let first = client.hashed_password();
        assert_eq!(
            client.session().hashed_password.as_deref(),
            Some(first.as_str())
        );
        assert_eq!(client.hashed_password(), first);
        assert_eq!(first, hash_password("s3cret"));
    }

    #[test]
    fn pre_hashed_password_is_used_verbatim() {
        let client = NilsClient::new(NilsOptions::new(
            "https://nils.invalid",
            "sa@example.com",
            Password::Hashed("abc123".into()),
        ))
        .unwrap();
        assert_eq!(client.hashed_password(), "abc123");
        assert!(client.session().hashed_password.is_none());
    }
}
