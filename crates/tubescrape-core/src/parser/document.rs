//! Helpers for reading weakly-typed innertube documents
//!
//! Everything here answers with `Option`/empty collections; a missing field
//! is an ordinary outcome, not an error.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde_json::Value;

static LEADING_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d[\d,.\u{a0} ]*)").expect("count pattern is valid"));

/// "1.2K", "3M": abbreviated figures are not exact counts
static ABBREVIATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[KkMmBb]\b").expect("abbreviation pattern is valid"));

const SEGMENT_SEPARATORS: &[char] = &['•', '·', '|'];

/// Collects every value stored under `key`, anywhere in the tree
///
/// Pre-order walk: a match is reported before anything nested inside it,
/// siblings keep document order.
pub fn find_all<'a>(root: &'a Value, key: &str) -> Vec<&'a Value> {
    find_all_any(root, &[key])
}

/// Like [`find_all`], matching any of several keys in one pass
pub fn find_all_any<'a>(root: &'a Value, keys: &[&str]) -> Vec<&'a Value> {
    let mut found = Vec::new();
    walk(root, keys, &mut found);
    found
}

fn walk<'a>(node: &'a Value, keys: &[&str], found: &mut Vec<&'a Value>) {
    match node {
        Value::Object(map) => {
            for (key, value) in map {
                if keys.contains(&key.as_str()) {
                    found.push(value);
                }
                walk(value, keys, found);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, keys, found);
            }
        }
        _ => {}
    }
}

/// First match of `key` anywhere below `root`
pub fn find_first<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    match root {
        Value::Object(map) => map.iter().find_map(|(k, v)| {
            if k == key {
                Some(v)
            } else {
                find_first(v, key)
            }
        }),
        Value::Array(items) => items.iter().find_map(|item| find_first(item, key)),
        _ => None,
    }
}

/// Reads a text node: `simpleText`, the concatenated `runs`, or a bare string
pub fn text(node: &Value) -> Option<String> {
    let text = if let Some(simple) = node.get("simpleText").and_then(Value::as_str) {
        simple.to_string()
    } else if let Some(runs) = node.get("runs").and_then(Value::as_array) {
        runs.iter()
            .filter_map(|run| run.get("text").and_then(Value::as_str))
            .collect::<String>()
    } else {
        node.as_str()?.to_string()
    };
    non_blank(text)
}

/// Text of the first run only, falling back to `simpleText`
///
/// Bylines carry the channel name in the first run and decorations after it.
pub fn first_run(node: &Value) -> Option<String> {
    node.pointer("/runs/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .and_then(non_blank)
        .or_else(|| text(node))
}

/// Splits a runs node into the segments between dot separators
///
/// Runs inside one segment are joined, so "A", ", ", "B", " & ", "C",
/// " • ", "Album" gives `["A, B & C", "Album"]`.
pub fn run_segments(node: &Value) -> Vec<String> {
    let joined: String = node
        .get("runs")
        .and_then(Value::as_array)
        .map(|runs| {
            runs.iter()
                .filter_map(|run| run.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    joined
        .split(SEGMENT_SEPARATORS)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads the first path (JSON pointer) that resolves to a string
pub fn str_at<'a>(node: &'a Value, paths: &[&str]) -> Option<&'a str> {
    paths.iter().find_map(|path| {
        node.pointer(path)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    })
}

/// Reads the first path that resolves to a non-empty text node
pub fn text_at(node: &Value, paths: &[&str]) -> Option<String> {
    paths
        .iter()
        .find_map(|path| node.pointer(path).and_then(text))
}

/// Reads the first path whose text node has a non-empty first run
pub fn first_run_at(node: &Value, paths: &[&str]) -> Option<String> {
    paths
        .iter()
        .find_map(|path| node.pointer(path).and_then(first_run))
}

/// Collects the `url` of every entry in a `thumbnails` array
pub fn thumbnail_urls(node: &Value, paths: &[&str]) -> Vec<String> {
    paths
        .iter()
        .find_map(|path| node.pointer(path).and_then(Value::as_array))
        .map(|thumbnails| {
            thumbnails
                .iter()
                .filter_map(|t| t.get("url").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Parses colon-delimited time text into a positive duration
///
/// `MM:SS` is read as `0:MM:SS`. Minutes and seconds must be below 60 once
/// an hours component is present. Returns `None` for anything else,
/// including a zero total.
pub fn parse_duration(text: &str) -> Option<Duration> {
    let text = text.trim();
    let parts: Vec<&str> = text.split(':').collect();
    let parts = match parts.len() {
        2 => vec!["0", parts[0], parts[1]],
        3 => parts,
        _ => return None,
    };

    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }

    let [hours, minutes, seconds] = numbers;
    if minutes >= 60 || seconds >= 60 {
        return None;
    }
    let total = hours
        .checked_mul(3600)?
        .checked_add(minutes * 60 + seconds)?;
    (total > 0).then(|| Duration::from_secs(total))
}

/// Parses the leading number of count text such as "1,234 videos"
///
/// Group separators (`,` `.` and spaces) are ignored. Returns `None` when
/// the text does not start with a digit, the value is zero, or the figure
/// is abbreviated ("1.2K videos").
pub fn parse_count(text: &str) -> Option<u32> {
    let figure = LEADING_COUNT.captures(text)?.get(1)?;
    if ABBREVIATED.is_match(text[figure.end()..].trim_start()) {
        return None;
    }
    let digits: String = figure
        .as_str()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse::<u32>().ok().filter(|count| *count > 0)
}

fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_find_all_document_order() {
        let doc = json!({
            "a": {"token": "first", "nested": {"token": "second"}},
            "list": [{"token": "third"}, {"other": 1}],
            "token": "fourth"
        });
        let found: Vec<&str> = find_all(&doc, "token")
            .into_iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(found, vec!["first", "second", "third", "fourth"]);
    }

    #[test]
    fn test_find_all_reports_outer_before_inner() {
        let doc = json!({"shelf": {"id": 1, "inner": {"shelf": {"id": 2}}}});
        let found = find_all(&doc, "shelf");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0]["id"], 1);
        assert_eq!(found[1]["id"], 2);
    }

    #[test]
    fn test_find_all_any() {
        let doc = json!([{"b": 2}, {"a": 1}]);
        let found = find_all_any(&doc, &["a", "b"]);
        assert_eq!(found, vec![&json!(2), &json!(1)]);
    }

    #[test]
    fn test_find_first() {
        let doc = json!({"x": [{"y": {"videoId": "deep"}}], "videoId": "late"});
        assert_eq!(find_first(&doc, "videoId"), Some(&json!("deep")));
        assert_eq!(find_first(&doc, "missing"), None);
    }

    #[test]
    fn test_text_shapes() {
        assert_eq!(text(&json!({"simpleText": " Hi "})), Some("Hi".to_string()));
        assert_eq!(
            text(&json!({"runs": [{"text": "a"}, {"text": "b"}]})),
            Some("ab".to_string())
        );
        assert_eq!(text(&json!("plain")), Some("plain".to_string()));
        assert_eq!(text(&json!({"runs": []})), None);
        assert_eq!(text(&json!(42)), None);
    }

    #[test]
    fn test_first_run() {
        let byline = json!({"runs": [
            {"text": "Channel"}, {"text": " • "}, {"text": "1M views"}
        ]});
        assert_eq!(first_run(&byline), Some("Channel".to_string()));
        assert_eq!(first_run(&json!({"simpleText": "Solo"})), Some("Solo".to_string()));
    }

    #[test]
    fn test_run_segments_split_on_dots() {
        let node = json!({"runs": [
            {"text": "Artist"}, {"text": " • "}, {"text": "Album"},
            {"text": " · "}, {"text": "3:10"}
        ]});
        assert_eq!(run_segments(&node), vec!["Artist", "Album", "3:10"]);
    }

    #[test]
    fn test_run_segments_keep_joined_artists() {
        let node = json!({"runs": [
            {"text": "Artist A"}, {"text": ", "}, {"text": "Artist B"}, {"text": " & "},
            {"text": "Artist C"}, {"text": " • "}, {"text": "The Album"}
        ]});
        assert_eq!(
            run_segments(&node),
            vec!["Artist A, Artist B & Artist C", "The Album"]
        );
        assert!(run_segments(&json!({"simpleText": "x"})).is_empty());
    }

    #[test]
    fn test_text_at_fallback_order() {
        let node = json!({"shortBylineText": {"simpleText": "Short"}});
        assert_eq!(
            first_run_at(&node, &["/longBylineText", "/shortBylineText"]),
            Some("Short".to_string())
        );
        let node = json!({
            "longBylineText": {"runs": [{"text": "Long"}]},
            "shortBylineText": {"simpleText": "Short"}
        });
        assert_eq!(
            first_run_at(&node, &["/longBylineText", "/shortBylineText"]),
            Some("Long".to_string())
        );
    }

    #[test]
    fn test_str_at_skips_blank() {
        let node = json!({"a": "", "b": "value"});
        assert_eq!(str_at(&node, &["/a", "/b"]), Some("value"));
        assert_eq!(str_at(&node, &["/c"]), None);
    }

    #[test]
    fn test_thumbnail_urls() {
        let node = json!({"thumbnail": {"thumbnails": [{"url": "a"}, {"width": 1}, {"url": "b"}]}});
        assert_eq!(
            thumbnail_urls(&node, &["/missing", "/thumbnail/thumbnails"]),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_parse_duration_examples() {
        assert_eq!(parse_duration("3:45"), Some(Duration::from_secs(225)));
        assert_eq!(parse_duration("1:02:03"), Some(Duration::from_secs(3723)));
        assert_eq!(parse_duration("0:07"), Some(Duration::from_secs(7)));
        assert_eq!(parse_duration("abc"), None);
        assert_eq!(parse_duration(""), None);
    }

    #[test]
    fn test_parse_duration_rejects_degenerate() {
        assert_eq!(parse_duration("0:00"), None);
        assert_eq!(parse_duration("1:75"), None);
        assert_eq!(parse_duration("1::3"), None);
        assert_eq!(parse_duration("1:2:3:4"), None);
        assert_eq!(parse_duration("-1:30"), None);
        assert_eq!(parse_duration("45"), None);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("25"), Some(25));
        assert_eq!(parse_count("1,234 videos"), Some(1234));
        assert_eq!(parse_count("12 songs"), Some(12));
        assert_eq!(parse_count("0"), None);
        assert_eq!(parse_count("No videos"), None);
        assert_eq!(parse_count(""), None);
    }

    #[test]
    fn test_parse_count_rejects_abbreviated() {
        assert_eq!(parse_count("1.2K videos"), None);
        assert_eq!(parse_count("3M"), None);
        assert_eq!(parse_count("1.234 videos"), Some(1234));
        assert_eq!(parse_count("12 Mixes"), Some(12));
    }

    proptest! {
        #[test]
        fn prop_mm_ss_roundtrip(minutes in 0u64..60, seconds in 0u64..60) {
            let parsed = parse_duration(&format!("{}:{:02}", minutes, seconds));
            let total = minutes * 60 + seconds;
            if total == 0 {
                prop_assert_eq!(parsed, None);
            } else {
                prop_assert_eq!(parsed, Some(Duration::from_secs(total)));
            }
        }

        #[test]
        fn prop_h_mm_ss_roundtrip(
            hours in 0u64..100,
            minutes in 0u64..60,
            seconds in 1u64..60,
        ) {
            let parsed = parse_duration(&format!("{}:{:02}:{:02}", hours, minutes, seconds));
            let total = hours * 3600 + minutes * 60 + seconds;
            prop_assert_eq!(parsed, Some(Duration::from_secs(total)));
        }

        #[test]
        fn prop_parse_duration_never_zero(text in "\\PC*") {
            if let Some(duration) = parse_duration(&text) {
                prop_assert!(duration > Duration::ZERO);
            }
        }
    }
}
