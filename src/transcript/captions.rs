//! Parser for the timed-text caption XML served for a caption track.
//!
//! The payload is a flat list of `<text start=".." dur="..">..</text>`
//! elements. Text content is XML-escaped and frequently carries a second
//! layer of HTML escaping plus inline formatting tags, all of which is
//! removed here.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::core::models::TranscriptFragment;
use crate::errors::TranscriptError;

static TEXT_ELEMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<text\b([^>]*?)(?:/>|>(.*?)</text>)").expect("static regex compile")
});
static ATTRIBUTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([\w:-]+)\s*=\s*"([^"]*)""#).expect("static regex compile"));
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("static regex compile")
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("static regex compile"));

/// Parse caption XML into ordered fragments. Elements without text are skipped.
///
/// # Errors
///
/// Returns [`TranscriptError::UnexpectedResponse`] when the document is not a
/// timed-text transcript at all.
pub fn parse_caption_xml(xml: &str) -> Result<Vec<TranscriptFragment>, TranscriptError> {
    if !xml.contains("<transcript") && !xml.contains("<text") {
        return Err(TranscriptError::UnexpectedResponse(
            "caption payload is not a timed-text document".to_string(),
        ));
    }

    let mut fragments = Vec::new();
    for cap in TEXT_ELEMENT_RE.captures_iter(xml) {
        let Some(raw) = cap.get(2).map(|m| m.as_str()).filter(|s| !s.is_empty()) else {
            continue;
        };

        let attributes = cap.get(1).map_or("", |m| m.as_str());
        let start = attribute_f64(attributes, "start");
        let duration = attribute_f64(attributes, "dur");

        // XML escaping first, then the embedded HTML escaping, then markup.
        let text = decode_entities(&decode_entities(raw));
        let text = TAG_RE.replace_all(&text, "").into_owned();

        fragments.push(TranscriptFragment {
            text,
            start,
            duration,
        });
    }

    Ok(fragments)
}

fn attribute_f64(attributes: &str, name: &str) -> f64 {
    ATTRIBUTE_RE
        .captures_iter(attributes)
        .find(|c| &c[1] == name)
        .and_then(|c| c[2].trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Decode one layer of named and numeric character references.
/// Unknown references are left untouched.
#[must_use]
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    ENTITY_RE
        .replace_all(input, |caps: &Captures| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body
                .strip_prefix("#x")
                .or_else(|| body.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(body)
            };
            decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "hellip" => Some('…'),
        "mdash" => Some('—'),
        "ndash" => Some('–'),
        "lsquo" => Some('‘'),
        "rsquo" => Some('’'),
        "ldquo" => Some('“'),
        "rdquo" => Some('”'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_caption_xml_in_order() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript>
            <text start="0.5" dur="1.25">Hey there</text>
            <text start="1.75" dur="2">how are you</text>
        </transcript>"#;

        let fragments = parse_caption_xml(xml).unwrap();
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].text, "Hey there");
        assert!((fragments[0].start - 0.5).abs() < f64::EPSILON);
        assert!((fragments[0].duration - 1.25).abs() < f64::EPSILON);
        assert_eq!(fragments[1].text, "how are you");
    }

    #[test]
    fn test_parse_caption_xml_double_escaped_and_tagged() {
        let xml = r#"<transcript><text start="0" dur="1">it&amp;#39;s &lt;i&gt;fine&lt;/i&gt; &amp;amp; ok</text></transcript>"#;
        let fragments = parse_caption_xml(xml).unwrap();
        assert_eq!(fragments[0].text, "it's fine & ok");
    }

    #[test]
    fn test_parse_caption_xml_skips_empty_elements() {
        let xml = r#"<transcript><text start="0" dur="1"/><text start="1" dur="1"></text><text start="2" dur="1">kept</text></transcript>"#;
        let fragments = parse_caption_xml(xml).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "kept");
    }

    #[test]
    fn test_parse_caption_xml_missing_timing_defaults_to_zero() {
        let xml = r#"<transcript><text>no timing</text></transcript>"#;
        let fragments = parse_caption_xml(xml).unwrap();
        assert!(fragments[0].start.abs() < f64::EPSILON);
        assert!(fragments[0].duration.abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_caption_xml_rejects_other_documents() {
        let err = parse_caption_xml("<html><body>captcha</body></html>").unwrap_err();
        assert!(matches!(err, TranscriptError::UnexpectedResponse(_)));
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&#39;&#x41;&#X42;"), "'AB");
        assert_eq!(decode_entities("&bogus; stays"), "&bogus; stays");
        assert_eq!(decode_entities("plain"), "plain");
    }
}
