//! Core data types for the innertube scraper
//!
//! Entities are validated on construction: a constructor returns `None`
//! when required fields are missing or degenerate, so every value a caller
//! sees satisfies its invariants.

use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::url::{build_playlist_url, build_thumbnail_url, build_watch_url, THUMBNAIL_VARIANTS};

fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

fn serialize_secs<S>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(duration.as_secs())
}

/// Up to four resolution tiers of preview images
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thumbnails {
    /// 120x90
    pub default: Option<String>,
    /// 320x180
    pub medium: Option<String>,
    /// 480x360
    pub high: Option<String>,
    /// Up to 1280x720, not generated for every video
    pub max: Option<String>,
}

impl Thumbnails {
    /// Derives all four tiers from a video identifier
    pub fn from_video_id(video_id: &str) -> Self {
        let [default, medium, high, max] =
            THUMBNAIL_VARIANTS.map(|variant| Some(build_thumbnail_url(video_id, variant)));
        Self {
            default,
            medium,
            high,
            max,
        }
    }

    /// Assigns explicit URLs to tiers, smallest first
    ///
    /// Upstream lists thumbnails in ascending size. Protocol-relative URLs
    /// get an `https:` scheme. Returns `None` when no URL is usable.
    pub fn from_urls<I, S>(urls: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tiers = urls
            .into_iter()
            .filter_map(|url| non_empty(url.as_ref()))
            .map(|url| match url.strip_prefix("//") {
                Some(rest) => format!("https://{}", rest),
                None => url,
            })
            .take(4);

        let thumbnails = Self {
            default: tiers.next(),
            medium: tiers.next(),
            high: tiers.next(),
            max: tiers.next(),
        };
        thumbnails.best().is_some().then_some(thumbnails)
    }

    /// Picks the construction mode: a video identifier wins over explicit URLs
    pub fn resolve<S: AsRef<str>>(video_id: Option<&str>, explicit: &[S]) -> Option<Self> {
        match video_id.and_then(non_empty) {
            Some(id) => Some(Self::from_video_id(&id)),
            None => Self::from_urls(explicit),
        }
    }

    /// Largest available tier
    pub fn best(&self) -> Option<&str> {
        self.max
            .as_deref()
            .or(self.high.as_deref())
            .or(self.medium.as_deref())
            .or(self.default.as_deref())
    }
}

/// A single video
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Video {
    id: String,
    title: String,
    author: String,
    #[serde(rename = "duration_secs", serialize_with = "serialize_secs")]
    duration: Duration,
    url: String,
    thumbnails: Thumbnails,
}

impl Video {
    /// Builds a video, or `None` if any required field is empty or the
    /// duration is zero
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        duration: Duration,
        thumbnails: Thumbnails,
    ) -> Option<Self> {
        let id = non_empty(id)?;
        let title = non_empty(title)?;
        let author = non_empty(author)?;
        if duration.is_zero() || thumbnails.best().is_none() {
            return None;
        }
        Some(Self {
            url: build_watch_url(&id),
            id,
            title,
            author,
            duration,
            thumbnails,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Watch page URL
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn thumbnails(&self) -> &Thumbnails {
        &self.thumbnails
    }
}

/// A playlist, album or generated station
///
/// Several upstream shapes carry only part of the metadata, so author,
/// description and video count are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Playlist {
    id: String,
    title: String,
    author: Option<String>,
    description: Option<String>,
    video_count: Option<u32>,
    url: String,
    thumbnails: Thumbnails,
}

impl Playlist {
    /// Builds a playlist, or `None` if identifier or title is empty
    ///
    /// Empty optional strings and a zero count are stored as `None`.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: Option<String>,
        description: Option<String>,
        video_count: Option<u32>,
        thumbnails: Thumbnails,
    ) -> Option<Self> {
        let id = non_empty(id)?;
        let title = non_empty(title)?;
        thumbnails.best()?;
        Some(Self {
            url: build_playlist_url(&id),
            id,
            title,
            author: author.and_then(non_empty),
            description: description.and_then(non_empty),
            video_count: video_count.filter(|count| *count > 0),
            thumbnails,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn video_count(&self) -> Option<u32> {
        self.video_count
    }

    /// Playlist page URL
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn thumbnails(&self) -> &Thumbnails {
        &self.thumbnails
    }
}

/// One entry of a result page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentItem {
    Video(Video),
    Playlist(Playlist),
}

impl ContentItem {
    pub fn as_video(&self) -> Option<&Video> {
        match self {
            ContentItem::Video(video) => Some(video),
            ContentItem::Playlist(_) => None,
        }
    }

    pub fn as_playlist(&self) -> Option<&Playlist> {
        match self {
            ContentItem::Playlist(playlist) => Some(playlist),
            ContentItem::Video(_) => None,
        }
    }

    /// Identifier of whichever entity this is
    pub fn id(&self) -> &str {
        match self {
            ContentItem::Video(video) => video.id(),
            ContentItem::Playlist(playlist) => playlist.id(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ContentItem::Video(video) => video.title(),
            ContentItem::Playlist(playlist) => playlist.title(),
        }
    }
}

impl From<Video> for ContentItem {
    fn from(video: Video) -> Self {
        ContentItem::Video(video)
    }
}

impl From<Playlist> for ContentItem {
    fn from(playlist: Playlist) -> Self {
        ContentItem::Playlist(playlist)
    }
}

/// One playable rendition of a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamInfo {
    url: String,
    mime_type: String,
    bitrate: u64,
    itag: Option<u32>,
    quality_label: Option<String>,
}

impl StreamInfo {
    /// Builds a stream entry, or `None` for an empty URL/MIME type or a
    /// zero bit rate
    pub fn new(
        url: impl Into<String>,
        mime_type: impl Into<String>,
        bitrate: u64,
        itag: Option<u32>,
        quality_label: Option<String>,
    ) -> Option<Self> {
        if bitrate == 0 {
            return None;
        }
        Some(Self {
            url: non_empty(url)?,
            mime_type: non_empty(mime_type)?,
            bitrate,
            itag,
            quality_label: quality_label.and_then(non_empty),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Full MIME type including codecs, e.g. `video/mp4; codecs="avc1.4d401e"`
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Bits per second
    pub fn bitrate(&self) -> u64 {
        self.bitrate
    }

    pub fn itag(&self) -> Option<u32> {
        self.itag
    }

    /// e.g. "720p", absent for audio
    pub fn quality_label(&self) -> Option<&str> {
        self.quality_label.as_deref()
    }

    pub fn is_audio(&self) -> bool {
        self.mime_type.starts_with("audio/")
    }

    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }
}

/// One shelf of curated content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomePageSection {
    title: String,
    items: Vec<ContentItem>,
}

impl HomePageSection {
    /// Builds a section, or `None` for an empty label
    pub fn new(title: impl Into<String>, items: Vec<ContentItem>) -> Option<Self> {
        Some(Self {
            title: non_empty(title)?,
            items,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }
}

/// One fetched page of a paginated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    number: usize,
    items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(number: usize, items: Vec<T>) -> Self {
        Self { number, items }
    }

    /// Placeholder returned when a fetch produced no document
    pub fn empty(number: usize) -> Self {
        Self::new(number, Vec::new())
    }

    /// 1-based page number
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thumbs() -> Thumbnails {
        Thumbnails::from_video_id("abc123")
    }

    #[test]
    fn test_thumbnails_from_video_id() {
        let t = Thumbnails::from_video_id("abc123");
        assert_eq!(
            t.default.as_deref(),
            Some("https://i.ytimg.com/vi/abc123/default.jpg")
        );
        assert_eq!(
            t.max.as_deref(),
            Some("https://i.ytimg.com/vi/abc123/maxresdefault.jpg")
        );
        assert_eq!(t.best(), t.max.as_deref());
    }

    #[test]
    fn test_thumbnails_from_urls_ascending() {
        let t = Thumbnails::from_urls(["//a/small.jpg", "https://a/large.jpg"]).unwrap();
        assert_eq!(t.default.as_deref(), Some("https://a/small.jpg"));
        assert_eq!(t.medium.as_deref(), Some("https://a/large.jpg"));
        assert_eq!(t.high, None);
        assert_eq!(t.best(), Some("https://a/large.jpg"));
    }

    #[test]
    fn test_thumbnails_from_urls_empty() {
        assert!(Thumbnails::from_urls(Vec::<String>::new()).is_none());
        assert!(Thumbnails::from_urls(["", "  "]).is_none());
    }

    #[test]
    fn test_thumbnails_resolve_prefers_video_id() {
        let t = Thumbnails::resolve(Some("vid"), &["https://a/x.jpg"]).unwrap();
        assert_eq!(t, Thumbnails::from_video_id("vid"));

        let t = Thumbnails::resolve(None, &["https://a/x.jpg"]).unwrap();
        assert_eq!(t.default.as_deref(), Some("https://a/x.jpg"));

        let t = Thumbnails::resolve(Some(""), &["https://a/x.jpg"]).unwrap();
        assert_eq!(t.default.as_deref(), Some("https://a/x.jpg"));
    }

    #[test]
    fn test_video_valid() {
        let video = Video::new("abc123", "Title", "Author", Duration::from_secs(225), thumbs())
            .unwrap();
        assert_eq!(video.url(), "https://www.youtube.com/watch?v=abc123");
        assert_eq!(video.duration(), Duration::from_secs(225));
    }

    #[test]
    fn test_video_rejects_degenerate_fields() {
        let d = Duration::from_secs(10);
        assert!(Video::new("", "Title", "Author", d, thumbs()).is_none());
        assert!(Video::new("id", "  ", "Author", d, thumbs()).is_none());
        assert!(Video::new("id", "Title", "", d, thumbs()).is_none());
        assert!(Video::new("id", "Title", "Author", Duration::ZERO, thumbs()).is_none());
    }

    #[test]
    fn test_video_trims_text() {
        let video =
            Video::new("id", "  Title ", "Author", Duration::from_secs(1), thumbs()).unwrap();
        assert_eq!(video.title(), "Title");
    }

    #[test]
    fn test_playlist_normalizes_optionals() {
        let playlist = Playlist::new(
            "PL1",
            "Mix",
            Some("".to_string()),
            Some("About".to_string()),
            Some(0),
            thumbs(),
        )
        .unwrap();
        assert_eq!(playlist.author(), None);
        assert_eq!(playlist.description(), Some("About"));
        assert_eq!(playlist.video_count(), None);
        assert_eq!(playlist.url(), "https://www.youtube.com/playlist?list=PL1");
    }

    #[test]
    fn test_playlist_requires_title() {
        assert!(Playlist::new("PL1", "", None, None, Some(3), thumbs()).is_none());
    }

    #[test]
    fn test_stream_info_validation() {
        assert!(StreamInfo::new("https://r/1", "audio/webm", 0, None, None).is_none());
        assert!(StreamInfo::new("", "audio/webm", 128_000, None, None).is_none());
        let stream =
            StreamInfo::new("https://r/1", "audio/webm; codecs=\"opus\"", 128_000, Some(251), None)
                .unwrap();
        assert!(stream.is_audio());
        assert!(!stream.is_video());
    }

    #[test]
    fn test_content_item_serialization() {
        let video =
            Video::new("abc123", "Title", "Author", Duration::from_secs(90), thumbs()).unwrap();
        let json = serde_json::to_value(ContentItem::from(video)).unwrap();
        assert_eq!(json["kind"], "video");
        assert_eq!(json["id"], "abc123");
        assert_eq!(json["duration_secs"], 90);
    }

    #[test]
    fn test_home_section_requires_title() {
        assert!(HomePageSection::new(" ", Vec::new()).is_none());
        assert_eq!(HomePageSection::new("Mixes", Vec::new()).unwrap().title(), "Mixes");
    }
}
