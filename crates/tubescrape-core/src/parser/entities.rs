//! Entity builders, one per upstream renderer shape
//!
//! Each builder receives the renderer body (the value under e.g.
//! `"videoRenderer"`) and reads it through hard-coded paths for that shape.
//! Shapes are unrelated upstream, so there is no generic fallback between
//! them. A builder returns `None` when a required field is missing or fails
//! validation; the item is then dropped from its page.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde_json::Value;

use super::document::{
    find_first, first_run_at, parse_count, parse_duration, run_segments, str_at, text, text_at,
    thumbnail_urls,
};
use crate::types::{ContentItem, Playlist, Thumbnails, Video};

/// Joins artist and album in music author strings
pub const AUTHOR_SEPARATOR: &str = " • ";

static SONG_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d[\d,.]*)\s+songs?\s*$").expect("song count pattern is valid")
});

static VIEW_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(views?|plays?|watching)\s*$").expect("view count pattern is valid")
});

/// Leading labels YouTube Music puts in front of the detail column
const TYPE_LABELS: &[&str] = &[
    "Song", "Video", "Album", "Single", "EP", "Playlist", "Episode", "Podcast", "Station",
];

const OVERLAY_DURATION: &str = "thumbnailOverlayTimeStatusRenderer";
const PLAY_BUTTON: &str = concat!(
    "/overlay/musicItemThumbnailOverlayRenderer/content",
    "/musicPlayButtonRenderer/playNavigationEndpoint",
);
const MUSIC_THUMBNAILS: &[&str] = &[
    "/thumbnail/musicThumbnailRenderer/thumbnail/thumbnails",
    "/thumbnailRenderer/musicThumbnailRenderer/thumbnail/thumbnails",
];

fn video(
    id: Option<&str>,
    title: Option<String>,
    author: Option<String>,
    duration: Option<Duration>,
) -> Option<ContentItem> {
    let id = id?;
    Video::new(
        id,
        title?,
        author?,
        duration?,
        Thumbnails::from_video_id(id),
    )
    .map(ContentItem::Video)
}

fn overlay_duration(renderer: &Value) -> Option<Duration> {
    let overlay = find_first(renderer.get("thumbnailOverlays")?, OVERLAY_DURATION)?;
    overlay.get("text").and_then(text).as_deref().and_then(parse_duration)
}

fn duration_at(renderer: &Value, paths: &[&str]) -> Option<Duration> {
    text_at(renderer, paths).as_deref().and_then(parse_duration)
}

/// `gridVideoRenderer`: channel and home grids
pub fn grid_video(renderer: &Value) -> Option<ContentItem> {
    video(
        str_at(renderer, &["/videoId"]),
        text_at(renderer, &["/title"]),
        first_run_at(renderer, &["/longBylineText", "/shortBylineText"]),
        overlay_duration(renderer).or_else(|| duration_at(renderer, &["/lengthText"])),
    )
}

/// `videoRenderer`: web search results
pub fn search_video(renderer: &Value) -> Option<ContentItem> {
    video(
        str_at(renderer, &["/videoId"]),
        text_at(renderer, &["/title"]),
        first_run_at(
            renderer,
            &["/longBylineText", "/ownerText", "/shortBylineText"],
        ),
        duration_at(renderer, &["/lengthText"]).or_else(|| overlay_duration(renderer)),
    )
}

/// `compactVideoRenderer`: related videos beside the player
pub fn compact_video(renderer: &Value) -> Option<ContentItem> {
    video(
        str_at(renderer, &["/videoId"]),
        text_at(renderer, &["/title"]),
        first_run_at(renderer, &["/longBylineText", "/shortBylineText"]),
        duration_at(renderer, &["/lengthText"]).or_else(|| overlay_duration(renderer)),
    )
}

/// `playlistVideoRenderer`: entries of a playlist page
pub fn playlist_video(renderer: &Value) -> Option<ContentItem> {
    let duration = duration_at(renderer, &["/lengthText"]).or_else(|| {
        str_at(renderer, &["/lengthSeconds"])
            .and_then(|secs| secs.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    });
    video(
        str_at(renderer, &["/videoId"]),
        text_at(renderer, &["/title"]),
        first_run_at(renderer, &["/shortBylineText", "/longBylineText"]),
        duration,
    )
}

/// `playlistPanelVideoRenderer`: entries of a generated music queue
pub fn queue_video(renderer: &Value) -> Option<ContentItem> {
    video(
        str_at(
            renderer,
            &["/videoId", "/navigationEndpoint/watchEndpoint/videoId"],
        ),
        text_at(renderer, &["/title"]),
        first_run_at(renderer, &["/longBylineText", "/shortBylineText"]),
        duration_at(renderer, &["/lengthText"]),
    )
}

/// `musicTwoRowItemRenderer`: station, album and playlist cards
///
/// Cards pointing at a single song have no playlist endpoint and are dropped.
pub fn station(renderer: &Value) -> Option<ContentItem> {
    let id = str_at(
        renderer,
        &[
            "/navigationEndpoint/watchPlaylistEndpoint/playlistId",
            "/navigationEndpoint/browseEndpoint/browseId",
        ],
    )?;
    let thumbnails = Thumbnails::from_urls(thumbnail_urls(renderer, MUSIC_THUMBNAILS))?;
    Playlist::new(
        strip_browse_prefix(id),
        text_at(renderer, &["/title"])?,
        None,
        text_at(renderer, &["/subtitle"]),
        None,
        thumbnails,
    )
    .map(ContentItem::Playlist)
}

fn strip_browse_prefix(id: &str) -> &str {
    id.strip_prefix("VL").unwrap_or(id)
}

/// `playlistRenderer`: playlists in web search results
///
/// Upstream always sends a count for this shape, so a missing or zero count
/// rejects the entry.
pub fn playlist(renderer: &Value) -> Option<ContentItem> {
    let video_count = text_at(renderer, &["/videoCount", "/videoCountText"])
        .as_deref()
        .and_then(parse_count)?;
    playlist_entity(renderer, Some(video_count))
}

/// `gridPlaylistRenderer`: playlists in grids and shelves, count optional
pub fn grid_playlist(renderer: &Value) -> Option<ContentItem> {
    let video_count = text_at(
        renderer,
        &["/videoCountText", "/videoCountShortText", "/videoCount"],
    )
    .as_deref()
    .and_then(parse_count);
    playlist_entity(renderer, video_count)
}

fn playlist_entity(renderer: &Value, video_count: Option<u32>) -> Option<ContentItem> {
    let first_video = str_at(
        renderer,
        &[
            "/navigationEndpoint/watchEndpoint/videoId",
            "/videos/0/childVideoRenderer/videoId",
        ],
    );
    let explicit = thumbnail_urls(
        renderer,
        &[
            "/thumbnails/0/thumbnails",
            "/thumbnail/thumbnails",
            "/thumbnailRenderer/playlistVideoThumbnailRenderer/thumbnail/thumbnails",
        ],
    );
    Playlist::new(
        str_at(renderer, &["/playlistId"])?,
        text_at(renderer, &["/title"])?,
        first_run_at(renderer, &["/longBylineText", "/shortBylineText"]),
        None,
        video_count,
        Thumbnails::resolve(first_video, explicit.as_slice())?,
    )
    .map(ContentItem::Playlist)
}

/// `musicResponsiveListItemRenderer`: songs, videos, albums and playlists in
/// YouTube Music lists
///
/// Items with a video identifier become videos; items pointing at a browse
/// page or a playlist become playlists.
pub fn music_list_item(renderer: &Value) -> Option<ContentItem> {
    let title = text_at(
        renderer,
        &["/flexColumns/0/musicResponsiveListItemFlexColumnRenderer/text"],
    )?;
    let details = renderer
        .pointer("/flexColumns/1/musicResponsiveListItemFlexColumnRenderer/text")
        .map(run_segments)
        .map(strip_type_label)
        .unwrap_or_default();

    let play_video = format!("{}/watchEndpoint/videoId", PLAY_BUTTON);
    let video_id = str_at(renderer, &["/playlistItemData/videoId", play_video.as_str()]);
    match video_id {
        Some(id) => music_video(id, title, &details, renderer),
        None => music_playlist(title, &details, renderer),
    }
}

fn strip_type_label(mut parts: Vec<String>) -> Vec<String> {
    if parts.len() > 1 && TYPE_LABELS.contains(&parts[0].as_str()) {
        parts.remove(0);
    }
    parts
}

fn compose_author(artist: Option<&str>, album: Option<&str>) -> Option<String> {
    match (artist, album) {
        (Some(artist), Some(album)) => Some(format!("{}{}{}", artist, AUTHOR_SEPARATOR, album)),
        (Some(artist), None) => Some(artist.to_string()),
        (None, _) => None,
    }
}

fn music_video(
    id: &str,
    title: String,
    details: &[String],
    renderer: &Value,
) -> Option<ContentItem> {
    let duration_index = details
        .iter()
        .rposition(|part| parse_duration(part).is_some());
    let duration = duration_index
        .map(|index| details[index].as_str())
        .and_then(parse_duration)
        .or_else(|| {
            duration_at(
                renderer,
                &["/fixedColumns/0/musicResponsiveListItemFixedColumnRenderer/text"],
            )
        });

    let mut names = details
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != duration_index)
        .map(|(_, part)| part.as_str());
    let artist = names.next();
    let album = names.find(|part| !VIEW_COUNT.is_match(part));

    let thumbnails = Thumbnails::from_video_id(id);
    Video::new(
        id,
        title,
        compose_author(artist, album)?,
        duration?,
        thumbnails,
    )
    .map(ContentItem::Video)
}

fn music_playlist(title: String, details: &[String], renderer: &Value) -> Option<ContentItem> {
    let play_playlist = format!("{}/watchPlaylistEndpoint/playlistId", PLAY_BUTTON);
    let id = str_at(
        renderer,
        &["/navigationEndpoint/browseEndpoint/browseId", play_playlist.as_str()],
    )?;

    let artist = details.first().map(String::as_str);
    let mut video_count = None;
    let mut release = None;
    for part in details.iter().skip(1) {
        if let Some(caps) = SONG_COUNT.captures(part) {
            video_count = caps.get(1).and_then(|m| parse_count(m.as_str()));
        } else if release.is_none() && !VIEW_COUNT.is_match(part) {
            release = Some(part.as_str());
        }
    }

    Playlist::new(
        strip_browse_prefix(id),
        title,
        Some(compose_author(artist, release)?),
        None,
        video_count,
        Thumbnails::from_urls(thumbnail_urls(renderer, MUSIC_THUMBNAILS))?,
    )
    .map(ContentItem::Playlist)
}
