//! Stream format parser for player responses
//!
//! Muxed formats come first, then adaptive (audio-only / video-only)
//! formats, each in upstream order. Formats whose URL is hidden behind a
//! signature cipher are skipped.

use serde_json::Value;

use crate::types::StreamInfo;

const FORMAT_LISTS: &[&str] = &["/streamingData/formats", "/streamingData/adaptiveFormats"];

/// Parses every directly playable format of a player response
///
/// Returns an empty vec when the video is not playable (private, removed,
/// age-gated for this client).
pub fn parse_stream_page(document: &Value) -> Vec<StreamInfo> {
    if let Some(status) = document
        .pointer("/playabilityStatus/status")
        .and_then(Value::as_str)
        && status != "OK"
    {
        let reason = document
            .pointer("/playabilityStatus/reason")
            .and_then(Value::as_str)
            .unwrap_or_default();
        tracing::debug!(status, reason, "video is not playable");
        return Vec::new();
    }

    FORMAT_LISTS
        .iter()
        .filter_map(|path| document.pointer(path).and_then(Value::as_array))
        .flatten()
        .filter_map(parse_format)
        .collect()
}

fn parse_format(format: &Value) -> Option<StreamInfo> {
    let itag = format
        .get("itag")
        .and_then(Value::as_u64)
        .and_then(|itag| u32::try_from(itag).ok());

    let Some(url) = format.get("url").and_then(Value::as_str) else {
        tracing::trace!(?itag, "skipped ciphered format");
        return None;
    };

    StreamInfo::new(
        url,
        format.get("mimeType").and_then(Value::as_str)?,
        bitrate(format)?,
        itag,
        format
            .get("qualityLabel")
            .and_then(Value::as_str)
            .map(str::to_string),
    )
}

/// Bit rate as a number, or as a decimal string as some clients send it
fn bitrate(format: &Value) -> Option<u64> {
    match format.get("bitrate").or_else(|| format.get("averageBitrate"))? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_streams_order_and_fields() {
        let doc = json!({
            "playabilityStatus": {"status": "OK"},
            "streamingData": {
                "adaptiveFormats": [
                    {"itag": 251, "url": "https://rr1.googlevideo.com/a",
                     "mimeType": "audio/webm; codecs=\"opus\"", "bitrate": 135000},
                    {"itag": 137, "signatureCipher": "s=abc&url=https%3A%2F%2F",
                     "mimeType": "video/mp4", "bitrate": 4000000}
                ],
                "formats": [
                    {"itag": 18, "url": "https://rr1.googlevideo.com/m",
                     "mimeType": "video/mp4; codecs=\"avc1.42001E, mp4a.40.2\"",
                     "bitrate": 500000, "qualityLabel": "360p"}
                ]
            }
        });

        let streams = parse_stream_page(&doc);
        assert_eq!(streams.len(), 2);
        assert_eq!(streams[0].itag(), Some(18));
        assert_eq!(streams[0].quality_label(), Some("360p"));
        assert!(streams[0].is_video());
        assert_eq!(streams[1].itag(), Some(251));
        assert!(streams[1].is_audio());
        assert_eq!(streams[1].bitrate(), 135000);
    }

    #[test]
    fn test_parse_streams_string_bitrate_and_zero() {
        let doc = json!({"streamingData": {"formats": [
            {"url": "https://r/1", "mimeType": "video/mp4", "bitrate": "800000"},
            {"url": "https://r/2", "mimeType": "video/mp4", "bitrate": 0},
            {"url": "https://r/3", "bitrate": 1}
        ]}});
        let streams = parse_stream_page(&doc);
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].bitrate(), 800000);
        assert_eq!(streams[0].itag(), None);
    }

    #[test]
    fn test_parse_streams_unplayable() {
        let doc = json!({
            "playabilityStatus": {
                "status": "LOGIN_REQUIRED",
                "reason": "Sign in to confirm your age"
            },
            "streamingData": {"formats": [
                {"url": "https://r/1", "mimeType": "video/mp4", "bitrate": 1}
            ]}
        });
        assert!(parse_stream_page(&doc).is_empty());
    }

    #[test]
    fn test_parse_streams_missing_data() {
        assert!(parse_stream_page(&json!({})).is_empty());
    }
}
