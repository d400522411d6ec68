//! Authenticated HTTP client.
//!
//! Every API wrapper goes through [`ApiClient`], which owns the base URL, attaches the
//! `Authorization` header when an access token is stored and handles expiry: a 401 triggers one
//! token refresh over a separate, non-intercepted transport followed by one replay of the
//! original request. A failed refresh, or a second 401 after the replay, clears all stored
//! credentials and runs the registered logout handler.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use crate::api::pagination::QueryParams;
use crate::api::token::TokenStore;
use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};
use crate::storage::SharedStore;

pub type LogoutHandler = Arc<dyn Fn() + Send + Sync>;

pub struct ApiClient {
    http: reqwest::Client,
    // Side channel for token refresh; never goes through the 401 handling below
    refresh_http: reqwest::Client,
    config: Arc<ApiConfig>,
    tokens: TokenStore,
    logout_handler: RwLock<Option<LogoutHandler>>,
    refresh_lock: Mutex<()>,
    // Bumped each time the session ends, so requests that failed together log out once
    session_epoch: AtomicU64,
}

/// Multipart body kept as plain data so the request can be rebuilt for a replay.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    fields: Vec<(String, String)>,
    files: Vec<FilePart>,
}

#[derive(Debug, Clone)]
struct FilePart {
    field: String,
    file_name: String,
    mime: Option<String>,
    bytes: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: Option<&str>,
        bytes: Vec<u8>,
    ) -> Self {
        self.files.push(FilePart {
            field: name.into(),
            file_name: file_name.into(),
            mime: mime.map(str::to_string),
            bytes,
        });
        self
    }

    fn to_form(&self) -> ClientResult<Form> {
        let mut form = Form::new();
        for (name, value) in &self.fields {
            form = form.text(name.clone(), value.clone());
        }
        for file in &self.files {
            let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
            if let Some(mime) = &file.mime {
                part = part.mime_str(mime)?;
            }
            form = form.part(file.field.clone(), part);
        }
        Ok(form)
    }
}

enum RequestBody<'a> {
    Empty,
    Json(Value),
    Multipart(&'a MultipartForm),
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: Option<String>,
    refresh: Option<String>,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

impl ApiClient {
    pub fn new(config: ApiConfig, store: SharedStore) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;
        let refresh_http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            refresh_http,
            config: Arc::new(config),
            tokens: TokenStore::new(store),
            logout_handler: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            session_epoch: AtomicU64::new(0),
        })
    }

    /// Client configured from the process environment (see [`crate::config::config`]).
    pub fn from_env(store: SharedStore) -> ClientResult<Self> {
        Self::new(crate::config::config().clone(), store)
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.has_access_token()
    }

    /// Register the callback run after credentials are wiped by a failed refresh.
    pub fn set_logout_handler<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut slot = self.logout_handler.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(Arc::new(handler));
    }

    // --- URL helpers ---

    /// Full API URL for `path` (leading slash optional) with optional query parameters.
    pub fn api_url(&self, path: &str, params: Option<&QueryParams>) -> ClientResult<Url> {
        let base = &self.config.base_url;
        if base.is_empty() {
            return Err(ClientError::ConfigMissing("API_BASE_URL"));
        }

        let full = format!("{}/{}", base, strip_leading_slash(path));
        let mut url = Url::parse(&full).map_err(|source| ClientError::InvalidUrl { url: full, source })?;

        if let Some(params) = params.filter(|p| !p.is_empty()) {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        Ok(url)
    }

    /// URL for a static asset served under the API base. Absolute URLs pass through.
    pub fn asset_url(&self, path: &str) -> String {
        join_external(&self.config.base_url, path)
    }

    /// URL for an uploaded media path, resolved against the origin of the API host.
    pub fn media_url(&self, path: &str) -> String {
        join_external(&self.media_base_url(), path)
    }

    fn media_base_url(&self) -> String {
        let base = &self.config.base_url;
        if base.is_empty() {
            return String::new();
        }
        match Url::parse(base) {
            Ok(url) => url.origin().ascii_serialization(),
            Err(_) => base.clone(),
        }
    }

    /// `{prefix}/{suffix}` for the resource wrappers.
    pub(crate) fn path(prefix: &str, suffix: &str) -> String {
        format!("{}/{}", prefix, suffix)
    }

    // --- HTTP verbs ---

    pub async fn get<T: DeserializeOwned>(&self, path: &str, params: Option<QueryParams>) -> ClientResult<T> {
        let response = self.send(Method::GET, path, params, RequestBody::Empty).await?;
        decode(response).await
    }

    /// GET that fails fast with `NotAuthenticated` when no access token is stored.
    pub async fn get_with_auth<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<QueryParams>,
    ) -> ClientResult<T> {
        if !self.tokens.has_access_token() {
            return Err(ClientError::NotAuthenticated);
        }
        self.get(path, params).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        let response = self.send(Method::POST, path, None, body).await?;
        decode(response).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        let response = self.send(Method::PUT, path, None, body).await?;
        decode(response).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        let response = self.send(Method::PATCH, path, None, body).await?;
        decode(response).await
    }

    /// PATCH with a multipart body (file uploads); the boundary header is set by reqwest.
    pub async fn patch_multipart<T: DeserializeOwned>(&self, path: &str, form: &MultipartForm) -> ClientResult<T> {
        let response = self
            .send(Method::PATCH, path, None, RequestBody::Multipart(form))
            .await?;
        decode(response).await
    }

    /// DELETE; any response body is discarded.
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.send(Method::DELETE, path, None, RequestBody::Empty).await?;
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        params: Option<QueryParams>,
        body: RequestBody<'_>,
    ) -> ClientResult<Response> {
        let url = self.api_url(path, params.as_ref())?;
        let epoch = self.session_epoch.load(Ordering::SeqCst);
        let mut retried = false;

        loop {
            let token = self.tokens.access_token();

            let mut request = self.http.request(method.clone(), url.clone());
            if let Some(token) = &token {
                request = request.header(AUTHORIZATION, self.authorization(token));
            }
            request = match &body {
                RequestBody::Empty => request,
                RequestBody::Json(value) => request.json(value),
                RequestBody::Multipart(form) => request.multipart(form.to_form()?),
            };

            debug!("{} {} (authorized: {}, retry: {})", method, url.path(), token.is_some(), retried);
            let response = request.send().await?;

            if response.status() != StatusCode::UNAUTHORIZED {
                return error_for_status(response).await;
            }

            if retried {
                warn!("{} {} still unauthorized after token refresh", method, url.path());
                self.end_session(epoch);
                return Err(error_from_response(response).await);
            }
            retried = true;

            if !self.refresh_after_unauthorized(token.as_deref(), epoch).await {
                return Err(error_from_response(response).await);
            }
        }
    }

    fn authorization(&self, token: &str) -> String {
        format!("{} {}", self.config.auth_scheme, token)
    }

    /// Single-flight refresh: requests that failed with the same stale token share one refresh.
    ///
    /// A failed refresh ends the session before the lock is released, so waiters behind it see
    /// the cleared credentials and give up without refreshing or logging out again.
    async fn refresh_after_unauthorized(&self, stale: Option<&str>, epoch: u64) -> bool {
        let _guard = self.refresh_lock.lock().await;

        if self.session_epoch.load(Ordering::SeqCst) != epoch {
            debug!("Session ended by a concurrent request; not refreshing");
            return false;
        }

        let current = self.tokens.access_token();
        if current.is_some() && current.as_deref() != stale {
            debug!("Access token was refreshed by a concurrent request; replaying");
            return true;
        }

        if self.refresh_access_token().await {
            return true;
        }
        self.end_session(epoch);
        false
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Uses the side-channel client so a 401 here can never recurse into another refresh.
    /// Returns `false` when no refresh token is stored or the backend rejects it.
    pub async fn refresh_access_token(&self) -> bool {
        let Some(refresh) = self.tokens.refresh_token() else {
            debug!("No refresh token stored; cannot refresh");
            return false;
        };

        let url = match self.refresh_url() {
            Ok(url) => url,
            Err(e) => {
                warn!("Cannot build token refresh URL: {}", e);
                return false;
            }
        };

        let result = self
            .refresh_http
            .post(url)
            .header(ACCEPT, "application/json")
            .json(&RefreshRequest { refresh: &refresh })
            .send()
            .await;

        let response = match result {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!("Token refresh rejected with status {}", response.status());
                return false;
            }
            Err(e) => {
                warn!("Token refresh request failed: {}", e);
                return false;
            }
        };

        match response.json::<RefreshResponse>().await {
            Ok(body) => {
                if let Some(access) = body.access.as_deref() {
                    self.tokens.set_access_token(access);
                }
                if let Some(refresh) = body.refresh.as_deref() {
                    self.tokens.set_refresh_token(refresh);
                }
                debug!("Access token refreshed");
                true
            }
            Err(e) => {
                warn!("Token refresh returned an unreadable body: {}", e);
                false
            }
        }
    }

    fn refresh_url(&self) -> ClientResult<Url> {
        if self.config.base_url.is_empty() {
            return Err(ClientError::ConfigMissing("API_BASE_URL"));
        }
        let raw = format!("{}/{}/token/refresh/", self.config.base_url, self.config.prefixes.auth);
        let collapsed = collapse_slashes(&raw);
        Url::parse(&collapsed).map_err(|source| ClientError::InvalidUrl { url: collapsed, source })
    }

    /// Clear credentials and run the logout handler, once per session.
    fn end_session(&self, epoch: u64) {
        if self
            .session_epoch
            .compare_exchange(epoch, epoch + 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Session already ended by a concurrent request");
            return;
        }

        self.tokens.clear_all();
        let handler = self
            .logout_handler
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some(handler) = handler {
            handler();
        }
        info!("Credentials cleared after failed authentication; login required");
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .field("tokens", &self.tokens)
            .finish()
    }
}

async fn error_for_status(response: Response) -> ClientResult<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(error_from_response(response).await)
    }
}

async fn error_from_response(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(text) if text.trim().is_empty() => Value::Null,
        Ok(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        Err(_) => Value::Null,
    };
    ClientError::http(status, body)
}

/// Decode a JSON body; an empty body (204) decodes as `null`.
async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let bytes = response.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

fn strip_leading_slash(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

fn is_absolute_http(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

fn join_external(base: &str, path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    if is_absolute_http(path) || base.is_empty() {
        return path.to_string();
    }
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Collapse runs of `/` to one, except the `//` that follows a scheme's `:`.
fn collapse_slashes(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let mut run = 0usize;
    let mut before_run: Option<char> = None;

    for c in url.chars() {
        if c == '/' {
            if run == 0 {
                before_run = out.chars().last();
            }
            run += 1;
            let keep = run == 1 || before_run.is_none() || (before_run == Some(':') && run == 2);
            if keep {
                out.push('/');
            }
        } else {
            run = 0;
            out.push(c);
        }
    }
    out
}
