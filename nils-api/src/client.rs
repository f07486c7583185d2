//! HTTP client core for the NILS back-office API.
//!
//! Every operation funnels through the same path:
//!
//! 1. [`NilsClient::ensure_login`] establishes a session if needed
//! 2. the cached session cookie is attached as a `cookie` header
//! 3. [`NilsClient::send`] classifies the response:
//!    - 401/403 clears the cached session (the next call re-logins)
//!    - 401/403/500 becomes a normalized [`NilsError::Api`] built from the
//!      body, or [`NilsError::Unknown`] when the body carries no message
//!    - anything else parses as JSON (`None` for an empty body)
//!
//! Endpoint methods live in separate modules (`cost_line`, `job`, `lookup`,
//! `tpt`, `tat`) as `impl NilsClient` blocks.
//!
//! NILS installations commonly run self-signed test certificates, so the
//! underlying client is built with certificate verification disabled.

use crate::auth::{Password, SessionState};
use crate::error::{ErrorBody, ErrorSink, NilsError, Result};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{header, Method, StatusCode};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Connection settings for one NILS installation.
#[derive(Clone)]
pub struct NilsOptions {
    /// Base URL, e.g. `https://nils-tst.gentco.com`. No trailing slash.
    pub host: String,
    /// Login email of the (service) account.
    pub email: String,
    /// Login password, raw or pre-hashed.
    pub password: Password,
    /// Optional observer notified of every produced error.
    pub error_sink: Option<Arc<dyn ErrorSink>>,
}

impl NilsOptions {
    /// Options without an error sink.
    pub fn new(host: impl Into<String>, email: impl Into<String>, password: Password) -> Self {
        Self {
            host: host.into(),
            email: email.into(),
            password,
            error_sink: None,
        }
    }

    /// Attach an error observer.
    #[must_use]
    pub fn with_error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.error_sink = Some(sink);
        self
    }
}

/// Blocking HTTP client for the NILS API.
///
/// Holds one logical session (user + cookie) behind a mutex; concurrent
/// calls sharing a client are safe, with last-write-wins on the session.
pub struct NilsClient {
    pub(crate) http: Client,
    pub(crate) options: NilsOptions,
    pub(crate) state: Mutex<SessionState>,
}

impl NilsClient {
    /// Create a client. No request is issued until the first operation.
    pub fn new(options: NilsOptions) -> Result<Self> {
        let http = Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            options,
            state: Mutex::new(SessionState::default()),
        })
    }

    /// Lock the session state, recovering from a poisoned lock (the state
    /// is plain data, a panicked writer cannot leave it inconsistent).
    pub(crate) fn session(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True while a user and cookie are cached.
    pub fn is_logged_in(&self) -> bool {
        let state = self.session();
        state.user.is_some() && state.cookie.is_some()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.options.host)
    }

    /// Log in if needed; operations never surface the raw login failure.
    pub(crate) fn ensure_login(&self) -> Result<()> {
        match self.login(false) {
            Ok(_) => Ok(()),
            Err(_) => Err(NilsError::NotLoggedIn),
        }
    }

    /// Attach the session cookie, send, and classify the response.
    ///
    /// Returns the parsed JSON body, `None` when the body is empty.
    pub(crate) fn send(&self, req: RequestBuilder) -> Result<Option<Value>> {
        let req = match self.session().cookie.clone() {
            Some(cookie) => req.header(header::COOKIE, cookie),
            None => req,
        };

        let resp = req.send().map_err(|e| self.transport_error(e))?;
        let status = resp.status();

        if matches!(status.as_u16(), 401 | 403) {
            let mut state = self.session();
            state.user = None;
            state.cookie = None;
        }

        if matches!(status.as_u16(), 401 | 403 | 500) {
            let text = resp.text().unwrap_or_default();
            let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
            return Err(self.api_error(status, &body));
        }

        let text = resp.text().map_err(|e| self.transport_error(e))?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str(&text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                let err = NilsError::Json(e);
                self.report(&err);
                Err(err)
            }
        }
    }

    /// Fire-and-acknowledge call used by all sync/allocate triggers.
    pub(crate) fn trigger(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<bool> {
        self.ensure_login()?;
        let mut req = self.http.request(method, self.url(path));
        if !query.is_empty() {
            req = req.query(query);
        }
        self.send(req)?;
        Ok(true)
    }

    /// Deserialize an already-parsed body, reporting decode failures.
    pub(crate) fn parse<T: serde::de::DeserializeOwned>(&self, value: Value) -> Result<T> {
        serde_json::from_value(value).map_err(|e| {
            let err = NilsError::Json(e);
            self.report(&err);
            err
        })
    }

    /// Classify a 401/403/500 body: normalized error when it carries a
    /// message, `Unknown` otherwise.
    pub(crate) fn api_error(&self, status: StatusCode, body: &Value) -> NilsError {
        let has_message = match body.get("message") {
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Null) | None => false,
            Some(_) => true,
        };
        let err = if has_message {
            NilsError::Api(ErrorBody::normalize(status.as_u16(), body))
        } else {
            NilsError::Unknown
        };
        self.report(&err);
        err
    }

    pub(crate) fn transport_error(&self, err: reqwest::Error) -> NilsError {
        let err = if err.is_connect() || err.is_timeout() {
            NilsError::Connect {
                host: self.options.host.clone(),
            }
        } else {
            NilsError::Http(err)
        };
        self.report(&err);
        err
    }

    pub(crate) fn report(&self, err: &NilsError) {
        if let Some(sink) = &self.options.error_sink {
            sink.report(err);
        }
    }
}
