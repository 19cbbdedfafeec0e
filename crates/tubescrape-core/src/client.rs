//! HTTP client for the innertube API
//!
//! Every call is a single JSON POST to `/youtubei/v1/<endpoint>`, with the
//! body merged into one of three client contexts. There are no retries:
//! callers decide what a failed request means.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, USER_AGENT};
use serde_json::{json, Map, Value};

use crate::error::{Result, TubeError};
use crate::parser::ExtractionPolicy;

const BASE_URL: &str = "https://www.youtube.com";
const MUSIC_BASE_URL: &str = "https://music.youtube.com";
const WEB_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";
const ANDROID_USER_AGENT: &str = "com.google.android.youtube/19.29.37 (Linux; U; Android 11) gzip";
const VISITOR_HEADER: &str = "x-goog-visitor-id";
const CLIENT_NAME_HEADER: &str = "x-youtube-client-name";
const CLIENT_VERSION_HEADER: &str = "x-youtube-client-version";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// User agent for web clients
    pub user_agent: String,
    /// Interface language sent as `hl` (default: "en")
    pub language: String,
    /// Content region sent as `gl` (default: "US")
    pub region: String,
    /// Origin of the main site; override to point at a mock server
    pub base_url: String,
    /// Origin of the music site
    pub music_base_url: String,
    /// Heuristics used when reading responses
    pub policy: ExtractionPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: WEB_USER_AGENT.to_string(),
            language: "en".to_string(),
            region: "US".to_string(),
            base_url: BASE_URL.to_string(),
            music_base_url: MUSIC_BASE_URL.to_string(),
            policy: ExtractionPolicy::default(),
        }
    }
}

/// Which client identity a request claims
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    /// Desktop website
    Web,
    /// YouTube Music website
    Music,
    /// Android app; its player responses carry plain stream URLs
    Android,
}

impl ClientKind {
    pub fn name(self) -> &'static str {
        match self {
            ClientKind::Web => "WEB",
            ClientKind::Music => "WEB_REMIX",
            ClientKind::Android => "ANDROID",
        }
    }

    pub fn version(self) -> &'static str {
        match self {
            ClientKind::Web => "2.20240726.00.00",
            ClientKind::Music => "1.20240724.00.00",
            ClientKind::Android => "19.29.37",
        }
    }

    /// Numeric id used in the `X-YouTube-Client-Name` header
    fn header_id(self) -> &'static str {
        match self {
            ClientKind::Web => "1",
            ClientKind::Music => "67",
            ClientKind::Android => "3",
        }
    }

    /// The `context` object merged into every request body
    pub fn context(self, language: &str, region: &str) -> Value {
        let mut client = json!({
            "clientName": self.name(),
            "clientVersion": self.version(),
            "hl": language,
            "gl": region,
        });
        if self == ClientKind::Android {
            client["androidSdkVersion"] = json!(30);
            client["osName"] = json!("Android");
            client["osVersion"] = json!("11");
        }
        json!({ "client": client })
    }

    /// Music endpoints take cursors as query parameters, the others in the body
    fn continuation_in_query(self) -> bool {
        self == ClientKind::Music
    }
}

/// Innertube endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Search,
    Next,
    Browse,
    Player,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Search => "/youtubei/v1/search",
            Endpoint::Next => "/youtubei/v1/next",
            Endpoint::Browse => "/youtubei/v1/browse",
            Endpoint::Player => "/youtubei/v1/player",
        }
    }
}

/// A request template: endpoint, client identity and fixed body fields
///
/// The same template is replayed for every page of a session, with the
/// cursor added per call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    pub client: ClientKind,
    pub params: Map<String, Value>,
}

impl ApiRequest {
    pub fn new(endpoint: Endpoint, client: ClientKind) -> Self {
        Self {
            endpoint,
            client,
            params: Map::new(),
        }
    }

    /// Adds a fixed body field
    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }
}

/// HTTP client wrapper for innertube requests
///
/// Handles the per-client context, fixed headers and the visitor header.
/// Cheap to share behind an `Arc`; reqwest pools connections internally.
pub struct TubeClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl TubeClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .gzip(true)
            .build()
            .map_err(TubeError::HttpError)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Site origin a client identity talks to
    fn origin(&self, kind: ClientKind) -> &str {
        match kind {
            ClientKind::Music => &self.config.music_base_url,
            ClientKind::Web | ClientKind::Android => &self.config.base_url,
        }
    }

    /// Full endpoint URL for a request
    pub fn endpoint_url(&self, request: &ApiRequest) -> String {
        format!("{}{}", self.origin(request.client), request.endpoint.path())
    }

    /// Request body: context, fixed fields, and the cursor for web clients
    pub fn build_body(&self, request: &ApiRequest, continuation: Option<&str>) -> Value {
        let mut body = Map::new();
        body.insert(
            "context".to_string(),
            request
                .client
                .context(&self.config.language, &self.config.region),
        );
        body.extend(request.params.clone());
        if let Some(token) = continuation
            && !request.client.continuation_in_query()
        {
            body.insert("continuation".to_string(), json!(token));
        }
        Value::Object(body)
    }

    /// Query string: always `prettyPrint=false`, plus the cursor for music
    pub fn build_query(
        &self,
        request: &ApiRequest,
        continuation: Option<&str>,
    ) -> Vec<(&'static str, String)> {
        let mut query = vec![("prettyPrint", "false".to_string())];
        if let Some(token) = continuation
            && request.client.continuation_in_query()
        {
            query.push(("ctoken", token.to_string()));
            query.push(("continuation", token.to_string()));
            query.push(("type", "next".to_string()));
        }
        query
    }

    fn headers(&self, kind: ClientKind, visitor_data: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(origin) = HeaderValue::from_str(self.origin(kind)) {
            headers.insert(ORIGIN, origin);
        }
        headers.insert(CLIENT_NAME_HEADER, HeaderValue::from_static(kind.header_id()));
        headers.insert(CLIENT_VERSION_HEADER, HeaderValue::from_static(kind.version()));
        if kind == ClientKind::Android {
            headers.insert(USER_AGENT, HeaderValue::from_static(ANDROID_USER_AGENT));
        }
        if let Some(visitor) = visitor_data
            && let Ok(value) = HeaderValue::from_str(visitor)
        {
            headers.insert(VISITOR_HEADER, value);
        }
        headers
    }

    /// Send one request and return the parsed response document
    ///
    /// # Errors
    /// - `HttpError` - Network errors or unexpected status codes
    /// - `RateLimited` - Server returned 429
    /// - `NotFound` - Server returned 404
    /// - `ParseError` - Body was not JSON
    pub async fn post(
        &self,
        request: &ApiRequest,
        continuation: Option<&str>,
        visitor_data: Option<&str>,
    ) -> Result<Value> {
        let url = self.endpoint_url(request);
        tracing::trace!(
            %url,
            client = request.client.name(),
            continuation = continuation.is_some(),
            "innertube request"
        );

        let response = self
            .client
            .post(&url)
            .query(&self.build_query(request, continuation))
            .headers(self.headers(request.client, visitor_data))
            .json(&self.build_body(request, continuation))
            .send()
            .await
            .map_err(TubeError::HttpError)?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TubeError::RateLimited);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(TubeError::NotFound(url));
        }

        let response = response.error_for_status().map_err(TubeError::HttpError)?;
        let body = response.text().await.map_err(TubeError::HttpError)?;
        serde_json::from_str(&body).map_err(|e| TubeError::ParseError(e.to_string()))
    }
}
