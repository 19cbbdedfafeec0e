//! Locating cursors, session tokens and item containers
//!
//! Responses are not normalized: the same cursor may appear under several
//! field names and unrelated containers repeat. The heuristics used to pick
//! one are policies so callers can swap them when upstream shapes drift.

use serde_json::Value;

use super::document::{find_all, find_all_any, str_at};
use crate::types::ContentItem;

/// Builds one entity from a renderer body
pub type ItemBuilder = fn(&Value) -> Option<ContentItem>;

/// Which of several matching continuation cursors to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenChoice {
    /// Longest value, first seen on ties
    Longest,
    /// First value in document order
    First,
}

/// Where continuation cursors live and how to pick between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinuationPolicy {
    /// Field names tried in priority order
    pub field_names: &'static [&'static str],
    pub choice: TokenChoice,
}

impl ContinuationPolicy {
    /// Never finds a cursor; for endpoints that answer with one document
    pub const fn none() -> Self {
        Self {
            field_names: &[],
            choice: TokenChoice::First,
        }
    }
}

impl Default for ContinuationPolicy {
    fn default() -> Self {
        Self {
            field_names: &["token", "continuation"],
            choice: TokenChoice::Longest,
        }
    }
}

/// Which of several result-bearing containers to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionChoice {
    /// The one with the most items, first seen on ties
    #[default]
    MostItems,
    /// The first one in document order
    First,
}

/// Heuristics applied while reading responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractionPolicy {
    pub continuation: ContinuationPolicy,
    pub sections: SectionChoice,
}

/// Finds the pagination cursor of a response
///
/// Each field name is tried in order; the first one with at least one
/// non-empty string value wins and `policy.choice` picks among its values.
/// `None` means no cursor was found, which callers treat as the end of the
/// result set.
pub fn continuation_token(document: &Value, policy: &ContinuationPolicy) -> Option<String> {
    policy.field_names.iter().find_map(|name| {
        let candidates = find_all(document, name)
            .into_iter()
            .filter_map(Value::as_str)
            .filter(|token| !token.is_empty());

        let chosen = match policy.choice {
            TokenChoice::First => candidates.into_iter().next(),
            TokenChoice::Longest => {
                candidates.reduce(|best, next| if next.len() > best.len() { next } else { best })
            }
        };
        chosen.map(str::to_string)
    })
}

/// Reads the visitor (session) token issued with a response
pub fn visitor_data(document: &Value) -> Option<String> {
    str_at(document, &["/responseContext/visitorData"]).map(str::to_string)
}

/// Picks the items of one result-bearing container
///
/// Looks at every occurrence of the given container keys and applies
/// `choice`. Containers without a `contents` array count as empty.
pub fn select_section<'a>(
    document: &'a Value,
    container_keys: &[&str],
    choice: SectionChoice,
) -> &'a [Value] {
    let sections = find_all_any(document, container_keys)
        .into_iter()
        .map(section_contents);

    let chosen = match choice {
        SectionChoice::First => sections.into_iter().next(),
        SectionChoice::MostItems => {
            sections.reduce(|best, next| if next.len() > best.len() { next } else { best })
        }
    };
    chosen.unwrap_or(&[])
}

fn section_contents(container: &Value) -> &[Value] {
    container
        .get("contents")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Strips wrappers that some grids put around the actual renderer
pub fn unwrap_item(item: &Value) -> &Value {
    item.pointer("/richItemRenderer/content").unwrap_or(item)
}

/// Builds an entity from an item holding any of the given renderer shapes
///
/// Shapes are tried in order; used where one container mixes item types.
pub fn build_any(item: &Value, shapes: &[(&str, ItemBuilder)]) -> Option<ContentItem> {
    let item = unwrap_item(item);
    shapes
        .iter()
        .find_map(|(key, build)| item.get(*key).map(|renderer| (renderer, build)))
        .and_then(|(renderer, build)| build(renderer))
}

/// Reads a type-homogeneous shelf
///
/// The first shape present in at least one item decides how the whole shelf
/// is read; items of any other shape are ignored.
pub fn probe_shelf(items: &[Value], shapes: &[(&str, ItemBuilder)]) -> Vec<ContentItem> {
    let Some((key, build)) = shapes
        .iter()
        .find(|(key, _)| items.iter().any(|item| unwrap_item(item).get(*key).is_some()))
    else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| unwrap_item(item).get(*key))
        .filter_map(|renderer| {
            let built = build(renderer);
            if built.is_none() {
                tracing::trace!(shape = *key, "dropped malformed shelf item");
            }
            built
        })
        .collect()
}
