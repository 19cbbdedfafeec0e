//! YouTube innertube scraper core library
//!
//! Async, paginated access to YouTube and YouTube Music search results,
//! playlists, related videos, generated queues, home shelves and stream
//! formats, read from the site's internal JSON API.
//!
//! # Overview
//!
//! - HTTP client that speaks the innertube protocol for three client identities
//! - Tolerant parsers that skip malformed entries instead of failing
//! - Paginated sessions that cache pages and stop on their own when results end
//!
//! # Example
//!
//! ```no_run
//! use tubescrape_core::{MusicFilter, Result, TubeScraper};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let scraper = TubeScraper::new()?;
//!
//!     // Page 1 is fetched before `search` returns
//!     let mut results = scraper.search("rust conference talk").await?;
//!     let page = results.fetch_page(3).await?;
//!     for item in page.items() {
//!         println!("{}: {}", item.id(), item.title());
//!     }
//!
//!     let songs = scraper.search_music("daft punk", MusicFilter::Songs).await?;
//!     for item in songs.items() {
//!         println!("{}", item.title());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Failed requests
//!
//! Network failures never surface from a session. A failed fetch yields an
//! empty page that is not cached, and the next call retries from the same
//! position. Errors are reserved for invalid input and client construction.
//!
//! **Important:** stream URLs returned by [`TubeScraper::stream_info`] expire
//! after a few hours. Do not cache them long-term.

mod client;
mod error;
mod paginator;
pub mod parser;
mod scraper;
mod types;
pub mod url;

// Re-export client types
pub use client::{ApiRequest, ClientConfig, ClientKind, Endpoint, TubeClient};

// Re-export error types
pub use error::{Result, TubeError};

// Re-export pagination
pub use paginator::{PageFetcher, PageParser, PageStrategy, PaginatedResults};

// Re-export extraction policies
pub use parser::{ContinuationPolicy, ExtractionPolicy, SectionChoice, TokenChoice};

// Re-export main scraper API
pub use scraper::{MusicFilter, TubeScraper};

// Re-export data types
pub use types::{ContentItem, HomePageSection, Page, Playlist, StreamInfo, Thumbnails, Video};

// Re-export URL helper functions for convenience
pub use url::{build_playlist_url, build_watch_url, playlist_id_from_url, video_id_from_url};
