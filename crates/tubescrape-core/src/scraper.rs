//! Main scraper API
//!
//! Every operation validates its input, describes one innertube request and
//! hands it to a fresh [`PaginatedResults`] session, which fetches page 1
//! before the operation returns.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{ApiRequest, ClientConfig, ClientKind, Endpoint, TubeClient};
use crate::error::{Result, TubeError};
use crate::paginator::{PageFetcher, PageParser, PageStrategy, PaginatedResults};
use crate::parser::{
    parse_home_page, parse_music_search_page, parse_playlist_page, parse_queue_page,
    parse_related_page, parse_search_page, parse_stream_page, ContinuationPolicy,
};
use crate::types::{ContentItem, HomePageSection, StreamInfo};
use crate::url::{playlist_id_from_url, video_id_from_url};

const MUSIC_HOME: &str = "FEmusic_home";

/// Result category of a music search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicFilter {
    Songs,
    Videos,
    Albums,
    Playlists,
}

impl MusicFilter {
    /// Opaque `params` value selecting the category
    pub fn params(self) -> &'static str {
        match self {
            MusicFilter::Songs => "EgWKAQIIAWoKEAkQBRAKEAMQBA==",
            MusicFilter::Videos => "EgWKAQIQAWoKEAkQChAFEAMQBA==",
            MusicFilter::Albums => "EgWKAQIYAWoKEAkQChAFEAMQBA==",
            MusicFilter::Playlists => "EgeKAQQoAEABagoQAxAEEAoQCRAF",
        }
    }
}

/// Replays one request template, adding cursor and visitor token per call
///
/// Transport errors are logged and reported as a missing document.
struct EndpointFetcher {
    client: Arc<TubeClient>,
    request: ApiRequest,
}

#[async_trait]
impl PageFetcher for EndpointFetcher {
    async fn fetch(&self, continuation: Option<&str>, visitor_data: Option<&str>) -> Option<Value> {
        match self.client.post(&self.request, continuation, visitor_data).await {
            Ok(document) => Some(document),
            Err(e) => {
                tracing::warn!(
                    endpoint = ?self.request.endpoint,
                    client = self.request.client.name(),
                    error = %e,
                    "page fetch failed"
                );
                None
            }
        }
    }
}

fn non_empty_query(query: &str) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(TubeError::InvalidQuery(
            "Search query cannot be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

/// Accepts a bare identifier or a URL carrying it
fn normalize_id(input: &str, from_url: fn(&str) -> String, what: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TubeError::InvalidId(format!("{} cannot be empty", what)));
    }
    let id = from_url(trimmed);
    Ok(if id.is_empty() { trimmed.to_string() } else { id })
}

fn video_id(input: &str) -> Result<String> {
    normalize_id(input, video_id_from_url, "Video ID")
}

fn playlist_id(input: &str) -> Result<String> {
    normalize_id(input, playlist_id_from_url, "Playlist ID")
}

/// Main scraper API
///
/// Cheap to clone; clones share one HTTP connection pool. Each returned
/// session is independent of the others.
#[derive(Clone)]
pub struct TubeScraper {
    client: Arc<TubeClient>,
}

impl TubeScraper {
    /// Create a new scraper with default configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new scraper with custom client configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = TubeClient::with_config(config)?;
        Ok(Self {
            client: Arc::new(client),
        })
    }

    fn continuation_policy(&self) -> ContinuationPolicy {
        self.client.config().policy.continuation
    }

    async fn session<T>(
        &self,
        request: ApiRequest,
        parser: impl PageParser<T> + 'static,
        continuation: ContinuationPolicy,
    ) -> PaginatedResults<T> {
        tracing::debug!(
            endpoint = ?request.endpoint,
            client = request.client.name(),
            "starting session"
        );
        let fetcher = Arc::new(EndpointFetcher {
            client: Arc::clone(&self.client),
            request,
        });
        PaginatedResults::start(PageStrategy::new(fetcher, parser, continuation)).await
    }

    /// Search videos and playlists
    ///
    /// # Errors
    /// - `InvalidQuery` if query is empty or whitespace only
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> tubescrape_core::Result<()> {
    /// use tubescrape_core::TubeScraper;
    /// let scraper = TubeScraper::new()?;
    /// let mut results = scraper.search("rust async").await?;
    /// let second = results.fetch_page(2).await?;
    /// for item in second.items() {
    ///     println!("{}: {}", item.id(), item.title());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(&self, query: &str) -> Result<PaginatedResults<ContentItem>> {
        let query = non_empty_query(query)?;
        let sections = self.client.config().policy.sections;
        let request = ApiRequest::new(Endpoint::Search, ClientKind::Web).param("query", query);
        let parser = move |document: &Value| parse_search_page(document, sections);
        Ok(self
            .session(request, parser, self.continuation_policy())
            .await)
    }

    /// Search the music catalog, restricted to one category
    ///
    /// # Errors
    /// - `InvalidQuery` if query is empty or whitespace only
    pub async fn search_music(
        &self,
        query: &str,
        filter: MusicFilter,
    ) -> Result<PaginatedResults<ContentItem>> {
        let query = non_empty_query(query)?;
        let sections = self.client.config().policy.sections;
        let request = ApiRequest::new(Endpoint::Search, ClientKind::Music)
            .param("query", query)
            .param("params", filter.params());
        let parser = move |document: &Value| parse_music_search_page(document, sections);
        Ok(self
            .session(request, parser, self.continuation_policy())
            .await)
    }

    /// Videos related to a video (watch page sidebar)
    ///
    /// `video` is a video ID or a watch URL.
    ///
    /// # Errors
    /// - `InvalidId` if video is empty
    pub async fn related_videos(&self, video: &str) -> Result<PaginatedResults<ContentItem>> {
        let id = video_id(video)?;
        let request = ApiRequest::new(Endpoint::Next, ClientKind::Web).param("videoId", id);
        Ok(self
            .session(request, parse_related_page, self.continuation_policy())
            .await)
    }

    /// Entries of a playlist
    ///
    /// `playlist` is a playlist ID or a URL with a `list` parameter.
    ///
    /// # Errors
    /// - `InvalidId` if playlist is empty
    pub async fn playlist_videos(&self, playlist: &str) -> Result<PaginatedResults<ContentItem>> {
        let id = playlist_id(playlist)?;
        let request = ApiRequest::new(Endpoint::Browse, ClientKind::Web)
            .param("browseId", format!("VL{}", id));
        Ok(self
            .session(request, parse_playlist_page, self.continuation_policy())
            .await)
    }

    /// Generated radio queue seeded by a video
    ///
    /// # Errors
    /// - `InvalidId` if video is empty
    pub async fn watch_queue(&self, video: &str) -> Result<PaginatedResults<ContentItem>> {
        let id = video_id(video)?;
        let request = ApiRequest::new(Endpoint::Next, ClientKind::Music)
            .param("playlistId", format!("RDAMVM{}", id))
            .param("videoId", id);
        Ok(self
            .session(request, parse_queue_page, self.continuation_policy())
            .await)
    }

    /// Curated shelves of the music home page
    pub async fn home_sections(&self) -> Result<PaginatedResults<HomePageSection>> {
        let request =
            ApiRequest::new(Endpoint::Browse, ClientKind::Music).param("browseId", MUSIC_HOME);
        Ok(self
            .session(request, parse_home_page, self.continuation_policy())
            .await)
    }

    /// Directly playable formats of a video
    ///
    /// The player endpoint answers with a single document, so the returned
    /// session is exhausted after its first page.
    ///
    /// # Errors
    /// - `InvalidId` if video is empty
    pub async fn stream_info(&self, video: &str) -> Result<PaginatedResults<StreamInfo>> {
        let id = video_id(video)?;
        let request = ApiRequest::new(Endpoint::Player, ClientKind::Android)
            .param("videoId", id)
            .param("contentCheckOk", true)
            .param("racyCheckOk", true);
        Ok(self
            .session(request, parse_stream_page, ContinuationPolicy::none())
            .await)
    }
}
