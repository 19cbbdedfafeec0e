//! Response parsers for innertube documents
//!
//! `document` walks raw JSON, `extract` finds cursors and containers,
//! `entities` builds domain values from renderer shapes, and `pages` /
//! `streams` turn whole responses into page items.

pub mod document;
pub mod entities;
pub mod extract;
pub mod pages;
pub mod streams;

pub use extract::{
    continuation_token, visitor_data, ContinuationPolicy, ExtractionPolicy, SectionChoice,
    TokenChoice,
};
pub use pages::{
    parse_home_page, parse_music_search_page, parse_playlist_page, parse_queue_page,
    parse_related_page, parse_search_page,
};
pub use streams::parse_stream_page;
