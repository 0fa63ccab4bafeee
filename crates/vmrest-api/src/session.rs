// Hand-crafted async HTTP session for the Unity Connection CUPI API.
//
// Base path: /vmrest/
// Auth: HTTP basic, attached per request

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

// ── Error response shape from the CUPI API ───────────────────────────

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Option<ErrorBody>,
}

// ── Session ──────────────────────────────────────────────────────────

/// Bound connection to one Unity Connection server.
///
/// Holds the normalized `/vmrest/` base URL and basic-auth credentials.
/// Read-only once constructed; every entity operation takes a `&Session`
/// explicitly -- there is no process-wide session state. A `Session` is
/// `Send + Sync` and can be shared across tasks by reference.
pub struct Session {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: SecretString,
}

impl Session {
    // ── Constructors ─────────────────────────────────────────────────

    /// Connect parameters + transport config. Does not contact the server.
    pub fn new(
        server_url: &str,
        username: impl Into<String>,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let username = username.into();
        if username.is_empty() {
            return Err(Error::invalid_argument("username must not be empty"));
        }

        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(server_url)?;

        Ok(Self {
            http,
            base_url,
            username,
            password,
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages transport).
    pub fn with_client(
        http: reqwest::Client,
        server_url: &str,
        username: impl Into<String>,
        password: SecretString,
    ) -> Result<Self, Error> {
        let username = username.into();
        if username.is_empty() {
            return Err(Error::invalid_argument("username must not be empty"));
        }

        Ok(Self {
            http,
            base_url: Self::normalize_base_url(server_url)?,
            username,
            password,
        })
    }

    /// Ensure the base URL ends in `/vmrest/` so joining relative
    /// collection paths works uniformly.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/vmrest") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/vmrest/"));
        }

        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"users/abc123"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.basic_auth(&self.username, Some(self.password.expose_secret()))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.authed(self.http.get(url)).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn get_value_with_params(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self
            .authed(self.http.get(url))
            .query(params)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// PUT a flat string-valued field map to a resource URL.
    pub(crate) async fn put_fields(
        &self,
        path: &str,
        fields: &indexmap::IndexMap<&'static str, String>,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PUT {url} fields={:?}", fields.keys().collect::<Vec<_>>());

        let resp = self
            .authed(self.http.put(url))
            .json(fields)
            .send()
            .await?;
        self.handle_empty(resp).await
    }

    /// POST a flat string-valued field map to a collection URL and return
    /// the new resource's object id.
    ///
    /// The server answers `201 Created` with the new resource URI as the
    /// body (e.g. `/vmrest/users/ab12-cd34`); some releases wrap it in a
    /// JSON string. Both forms reduce to the trailing path segment.
    pub(crate) async fn post_fields(
        &self,
        path: &str,
        fields: &indexmap::IndexMap<&'static str, String>,
    ) -> Result<String, Error> {
        let url = self.url(path)?;
        debug!("POST {url} fields={:?}", fields.keys().collect::<Vec<_>>());

        let resp = self
            .authed(self.http.post(url))
            .json(fields)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(self.parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        Ok(extract_object_id(&body))
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.authed(self.http.delete(url)).send().await?;
        self.handle_empty(resp).await
    }

    // ── WAV transfer ─────────────────────────────────────────────────

    /// Upload a local WAV file to a media endpoint. Whole-file, blocking
    /// per call -- no chunking or resumption.
    pub async fn upload_wav(&self, path: &str, local: &Path) -> Result<(), Error> {
        let url = self.url(path)?;
        let bytes = tokio::fs::read(local).await?;
        debug!("PUT {url} ({} bytes of audio)", bytes.len());

        let resp = self
            .authed(self.http.put(url))
            .header(reqwest::header::CONTENT_TYPE, "audio/wav")
            .body(bytes)
            .send()
            .await?;
        self.handle_empty(resp).await
    }

    /// Download a media endpoint's WAV content to a local file.
    pub async fn download_wav(&self, path: &str, local: &Path) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("GET {url} (audio download)");

        let resp = self
            .authed(self.http.get(url))
            .header(reqwest::header::ACCEPT, "audio/wav")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(self.parse_error(status, resp).await);
        }

        let bytes = resp.bytes().await?;
        tokio::fs::write(local, &bytes).await?;
        Ok(())
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = body_preview(&body);
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&raw) {
            if let Some(err) = envelope.errors {
                return Error::Remote {
                    status: status.as_u16(),
                    message: err.message.unwrap_or_else(|| status.to_string()),
                    code: err.code,
                };
            }
        }

        Error::Remote {
            status: status.as_u16(),
            message: if raw.is_empty() {
                status.to_string()
            } else {
                raw
            },
            code: None,
        }
    }
}

/// First ~200 bytes of a response body for error messages, cut back to
/// a char boundary so multibyte text never splits mid-character.
fn body_preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

/// Trailing path segment of a created-resource URI, stripped of JSON
/// string quoting if present.
fn extract_object_id(body: &str) -> String {
    let trimmed = body.trim().trim_matches('"');
    trimmed
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(trimmed)
        .to_owned()
}
