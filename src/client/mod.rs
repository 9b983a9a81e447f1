//! HTTP client for the content API and the state behind the site's views
//!
//! [`ApiClient::fetch`] is the single request primitive; the typed helpers
//! and the view modules are built on top of it.

pub mod admin;
pub mod devotion;
pub mod gallery;
pub mod sermons;
pub mod state;

pub use admin::AdminCollection;
pub use devotion::DevotionView;
pub use gallery::GalleryAdmin;
pub use sermons::SermonAdmin;
pub use state::LoadState;

use crate::config::ClientConfig;
use crate::core::entity::{Content, Document};
use crate::core::error::ErrorBody;
use crate::core::query::{ListResponse, Page};
use crate::server::upload::{BulkUploadResponse, UploadResponse};
use chrono::NaiveDate;
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

/// Every client-side failure. `Display` is the user-visible notification.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Non-success HTTP status; `message` is the raw body or `Request failed: <status>`
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    /// The server's JSON error body, when the failure carried one
    pub fn error_body(&self) -> Option<ErrorBody> {
        match self {
            ClientError::Status { message, .. } => serde_json::from_str(message).ok(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// A successful response body
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Json(Value),
    Text(String),
}

impl ApiResponse {
    /// Deserialize a JSON body into `T`
    pub fn decode<T: DeserializeOwned>(self) -> ClientResult<T> {
        match self {
            ApiResponse::Json(value) => {
                serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
            }
            ApiResponse::Text(text) => Err(ClientError::Decode(format!(
                "expected JSON, got text: {}",
                text.chars().take(80).collect::<String>()
            ))),
        }
    }
}

/// Method, extra headers and JSON body of one request
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            ..Self::default()
        }
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn put(body: Value) -> Self {
        Self {
            method: Method::PUT,
            body: Some(body),
            ..Self::default()
        }
    }

    /// Add or override a header
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Query for a list request; unset fields are left out of the URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl ListQuery {
    pub fn range(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Self::default()
        }
    }

    pub fn paged(page: u64, limit: u64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// `?from=2024-03-04&page=2`, or an empty string when nothing is set
    pub fn to_query_string(&self) -> String {
        let mut pairs = Vec::new();
        if let Some(from) = self.from {
            pairs.push(format!("from={}", from.format("%Y-%m-%d")));
        }
        if let Some(to) = self.to {
            pairs.push(format!("to={}", to.format("%Y-%m-%d")));
        }
        if let Some(page) = self.page {
            pairs.push(format!("page={page}"));
        }
        if let Some(limit) = self.limit {
            pairs.push(format!("limit={limit}"));
        }

        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        }
    }
}

/// Client for the content API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the configured base URL (API prefix included).
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Scheme, host and port of the base URL; relative upload paths resolve against it
    pub fn origin(&self) -> String {
        reqwest::Url::parse(&self.base_url)
            .map(|url| url.origin().ascii_serialization())
            .unwrap_or_else(|_| self.base_url.clone())
    }

    /// Issue one request against `base_url + path`.
    ///
    /// `Content-Type: application/json` is sent unless the caller overrides it.
    pub async fn fetch(&self, path: &str, options: RequestOptions) -> ClientResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        let mut request = self
            .http
            .request(options.method.clone(), &url)
            .headers(headers);
        if let Some(body) = &options.body {
            request = request.body(body.to_string());
        }

        tracing::debug!(method = %options.method, url = %url, "API request");

        let response = request.send().await?;
        read_response(response).await
    }

    /// List documents; the response is an array or a page depending on the query
    pub async fn list<T: Content>(&self, query: &ListQuery) -> ClientResult<ListResponse<Document<T>>> {
        let path = format!("/{}{}", T::resource_name(), query.to_query_string());
        self.fetch(&path, RequestOptions::get()).await?.decode()
    }

    /// Every document matching the query, whatever shape the server answered with
    pub async fn list_all<T: Content>(&self, query: &ListQuery) -> ClientResult<Vec<Document<T>>> {
        Ok(self.list::<T>(query).await?.into_items())
    }

    /// One page; a bare array answer counts as page 1 of 1
    pub async fn list_page<T: Content>(&self, query: &ListQuery) -> ClientResult<Page<Document<T>>> {
        Ok(self.list::<T>(query).await?.into_page())
    }

    pub async fn get<T: Content>(&self, id: &Uuid) -> ClientResult<Document<T>> {
        let path = format!("/{}/{}", T::resource_name(), id);
        self.fetch(&path, RequestOptions::get()).await?.decode()
    }

    pub async fn create<T: Content>(&self, content: &T) -> ClientResult<Document<T>> {
        let body = to_json(content)?;
        let path = format!("/{}", T::resource_name());
        self.fetch(&path, RequestOptions::post(body)).await?.decode()
    }

    /// Send the given fields; the server keeps the ones left out
    pub async fn update<T: Content>(&self, id: &Uuid, patch: &impl Serialize) -> ClientResult<Document<T>> {
        let body = to_json(patch)?;
        let path = format!("/{}/{}", T::resource_name(), id);
        self.fetch(&path, RequestOptions::put(body)).await?.decode()
    }

    /// Send every field of `content`, clearing optional fields it leaves unset
    pub async fn replace<T: Content>(&self, id: &Uuid, content: &T) -> ClientResult<Document<T>> {
        let mut body = to_json(content)?;
        if let Value::Object(map) = &mut body {
            for field in T::field_names() {
                map.entry(*field).or_insert(Value::Null);
            }
        }
        let path = format!("/{}/{}", T::resource_name(), id);
        self.fetch(&path, RequestOptions::put(body)).await?.decode()
    }

    pub async fn delete<T: Content>(&self, id: &Uuid) -> ClientResult<()> {
        let path = format!("/{}/{}", T::resource_name(), id);
        self.fetch(&path, RequestOptions::delete()).await?;
        Ok(())
    }

    /// Upload one file; returns its public URL (usually `/uploads/...`)
    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<String> {
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        let response: UploadResponse = self.send_multipart("/upload", form).await?.decode()?;
        Ok(response.url)
    }

    /// Upload several files at once; returns their URLs in order
    pub async fn upload_bulk(&self, files: Vec<(String, Vec<u8>)>) -> ClientResult<Vec<String>> {
        let form = files.into_iter().fold(Form::new(), |form, (name, bytes)| {
            form.part("files", Part::bytes(bytes).file_name(name))
        });
        let response: BulkUploadResponse = self.send_multipart("/upload/bulk", form).await?.decode()?;
        Ok(response.urls)
    }

    async fn send_multipart(&self, path: &str, form: Form) -> ClientResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "API upload");

        let response = self.http.post(&url).multipart(form).send().await?;
        read_response(response).await
    }
}

fn to_json(value: &impl Serialize) -> ClientResult<Value> {
    serde_json::to_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Normalize a response into a body or a [`ClientError`]
async fn read_response(response: reqwest::Response) -> ClientResult<ApiResponse> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));
    let body = response.text().await?;

    if !status.is_success() {
        let message = if body.trim().is_empty() {
            format!("Request failed: {}", status.as_u16())
        } else {
            body
        };
        tracing::warn!(status = status.as_u16(), "API request failed");
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }

    if is_json {
        serde_json::from_str(&body)
            .map(ApiResponse::Json)
            .map_err(|e| ClientError::Decode(e.to_string()))
    } else {
        Ok(ApiResponse::Text(body))
    }
}
