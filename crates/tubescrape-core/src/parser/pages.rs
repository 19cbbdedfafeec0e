//! Page parsers: one whole response in, the items of one page out
//!
//! Each endpoint nests its results differently. These functions know where
//! to look and which entity builders apply.

use serde_json::Value;

use super::document::{find_all, find_all_any, text_at};
use super::entities::{
    compact_video, grid_playlist, grid_video, music_list_item, playlist, playlist_video,
    queue_video, search_video, station,
};
use super::extract::{build_any, probe_shelf, select_section, ItemBuilder, SectionChoice};
use crate::types::{ContentItem, HomePageSection};

/// Item shapes mixed inside web search sections
const SEARCH_SHAPES: &[(&str, ItemBuilder)] = &[
    ("videoRenderer", search_video),
    ("playlistRenderer", playlist),
];

/// Item shapes a home shelf may hold, in probing order
const SHELF_SHAPES: &[(&str, ItemBuilder)] = &[
    ("gridVideoRenderer", grid_video),
    ("videoRenderer", search_video),
    ("musicTwoRowItemRenderer", station),
    ("musicResponsiveListItemRenderer", music_list_item),
    ("gridPlaylistRenderer", grid_playlist),
    ("playlistRenderer", playlist),
];

const SEARCH_SECTIONS: &[&str] = &["itemSectionRenderer"];
const MUSIC_SECTIONS: &[&str] = &["musicShelfRenderer", "musicShelfContinuation"];
const HOME_SHELVES: &[&str] = &["musicCarouselShelfRenderer", "shelfRenderer", "richShelfRenderer"];

const SHELF_TITLES: &[&str] = &[
    "/header/musicCarouselShelfBasicHeaderRenderer/title",
    "/title",
];
const SHELF_ITEMS: &[&str] = &[
    "/contents",
    "/content/horizontalListRenderer/items",
    "/content/gridRenderer/items",
    "/content/verticalListRenderer/items",
    "/content/expandedShelfContentsRenderer/items",
];

fn build_each(renderers: Vec<&Value>, build: ItemBuilder, shape: &str) -> Vec<ContentItem> {
    let total = renderers.len();
    let items: Vec<ContentItem> = renderers.into_iter().filter_map(build).collect();
    if items.len() < total {
        tracing::trace!(shape, dropped = total - items.len(), "dropped malformed items");
    }
    items
}

/// Web search: the richest item section, videos and playlists
pub fn parse_search_page(document: &Value, sections: SectionChoice) -> Vec<ContentItem> {
    select_section(document, SEARCH_SECTIONS, sections)
        .iter()
        .filter_map(|item| build_any(item, SEARCH_SHAPES))
        .collect()
}

/// Filtered music search: the richest music shelf
pub fn parse_music_search_page(document: &Value, sections: SectionChoice) -> Vec<ContentItem> {
    let renderers = select_section(document, MUSIC_SECTIONS, sections)
        .iter()
        .filter_map(|item| item.get("musicResponsiveListItemRenderer"))
        .collect();
    build_each(renderers, music_list_item, "musicResponsiveListItemRenderer")
}

/// Related videos of a watch page
pub fn parse_related_page(document: &Value) -> Vec<ContentItem> {
    build_each(
        find_all(document, "compactVideoRenderer"),
        compact_video,
        "compactVideoRenderer",
    )
}

/// Entries of a playlist page
pub fn parse_playlist_page(document: &Value) -> Vec<ContentItem> {
    build_each(
        find_all(document, "playlistVideoRenderer"),
        playlist_video,
        "playlistVideoRenderer",
    )
}

/// Entries of a generated music queue
pub fn parse_queue_page(document: &Value) -> Vec<ContentItem> {
    build_each(
        find_all(document, "playlistPanelVideoRenderer"),
        queue_video,
        "playlistPanelVideoRenderer",
    )
}

/// Home page shelves, in document order
///
/// Shelves without a title or without any usable item are skipped.
pub fn parse_home_page(document: &Value) -> Vec<HomePageSection> {
    find_all_any(document, HOME_SHELVES)
        .into_iter()
        .filter_map(|shelf| {
            let title = text_at(shelf, SHELF_TITLES)?;
            let items = SHELF_ITEMS
                .iter()
                .find_map(|path| shelf.pointer(path).and_then(Value::as_array))?;
            let items = probe_shelf(items, SHELF_SHAPES);
            if items.is_empty() {
                tracing::trace!(title = %title, "skipped shelf without usable items");
                return None;
            }
            HomePageSection::new(title, items)
        })
        .collect()
}
