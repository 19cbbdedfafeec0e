//! URL helper functions
//!
//! Builds watch, playlist and thumbnail URLs and pulls identifiers back
//! out of pasted links.

use std::sync::LazyLock;

use regex::Regex;

const BASE_URL: &str = "https://www.youtube.com";
const THUMBNAIL_BASE_URL: &str = "https://i.ytimg.com/vi";

/// Thumbnail file names, smallest first
pub const THUMBNAIL_VARIANTS: [&str; 4] = ["default", "mqdefault", "hqdefault", "maxresdefault"];

static VIDEO_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]v=([^&#]*)").expect("video id pattern is valid"));
static LIST_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]list=([^&#]*)").expect("playlist id pattern is valid"));

/// Builds the watch page URL for a video
///
/// # Example
/// ```
/// use tubescrape_core::url::build_watch_url;
/// let url = build_watch_url("dQw4w9WgXcQ");
/// assert_eq!(url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
/// ```
pub fn build_watch_url(video_id: &str) -> String {
    format!("{}/watch?v={}", BASE_URL, video_id)
}

/// Builds the playlist page URL
///
/// # Example
/// ```
/// use tubescrape_core::url::build_playlist_url;
/// let url = build_playlist_url("PL123");
/// assert_eq!(url, "https://www.youtube.com/playlist?list=PL123");
/// ```
pub fn build_playlist_url(playlist_id: &str) -> String {
    format!("{}/playlist?list={}", BASE_URL, playlist_id)
}

/// Builds one thumbnail URL for a video, e.g. `variant = "hqdefault"`
pub fn build_thumbnail_url(video_id: &str, variant: &str) -> String {
    format!("{}/{}/{}.jpg", THUMBNAIL_BASE_URL, video_id, variant)
}

/// Extracts the `v` query parameter from a watch URL
///
/// Returns an empty string when the parameter is missing.
///
/// # Example
/// ```
/// use tubescrape_core::url::video_id_from_url;
/// assert_eq!(video_id_from_url("https://x/watch?v=abc123&t=5"), "abc123");
/// assert_eq!(video_id_from_url("https://x/"), "");
/// ```
pub fn video_id_from_url(url: &str) -> String {
    first_param(&VIDEO_PARAM, url)
}

/// Extracts the `list` query parameter from a playlist URL
///
/// Returns an empty string when the parameter is missing.
///
/// # Example
/// ```
/// use tubescrape_core::url::playlist_id_from_url;
/// assert_eq!(playlist_id_from_url("https://x/playlist?list=PL1"), "PL1");
/// ```
pub fn playlist_id_from_url(url: &str) -> String {
    first_param(&LIST_PARAM, url)
}

fn first_param(pattern: &Regex, url: &str) -> String {
    pattern
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| {
            urlencoding::decode(m.as_str())
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| m.as_str().to_string())
        })
        .unwrap_or_default()
}
