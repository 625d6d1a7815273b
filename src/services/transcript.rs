use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("malformed transcript line {line}: {source}")]
pub struct TranscriptDecodeError {
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// One utterance as delivered by the call provider, one JSON object per line.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranscriptItem {
    pub speaker_id: String,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// An utterance with the speaker's display name attached.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EnrichedTranscriptItem {
    pub speaker_id: String,
    pub speaker_name: String,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

pub const UNKNOWN_SPEAKER: &str = "Unknown";

/// Decode a line-delimited JSON payload. Blank lines are skipped; any
/// malformed line fails the whole payload.
pub fn parse(payload: &str) -> Result<Vec<TranscriptItem>, TranscriptDecodeError> {
    let mut items = Vec::new();

    for (index, line) in payload.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let item = serde_json::from_str(line).map_err(|source| TranscriptDecodeError {
            line: index + 1,
            source,
        })?;
        items.push(item);
    }

    Ok(items)
}

/// Distinct speaker identifiers in first-seen order.
pub fn speaker_ids(items: &[TranscriptItem]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();

    for item in items {
        if !ids.contains(&item.speaker_id) {
            ids.push(item.speaker_id.clone());
        }
    }

    ids
}

/// Attach display names. An identifier missing from the map resolves to
/// "Unknown" rather than failing the run.
pub fn enrich(
    items: Vec<TranscriptItem>,
    names: &HashMap<String, String>,
) -> Vec<EnrichedTranscriptItem> {
    items
        .into_iter()
        .map(|item| {
            let speaker_name = names
                .get(&item.speaker_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_SPEAKER.to_string());

            EnrichedTranscriptItem {
                speaker_id: item.speaker_id,
                speaker_name,
                start: item.start,
                end: item.end,
                text: item.text,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(speaker_id: &str, text: &str) -> TranscriptItem {
        TranscriptItem {
            speaker_id: speaker_id.to_string(),
            start: 0.0,
            end: 1.0,
            text: text.to_string(),
        }
    }

    #[test]
    fn parses_line_delimited_payload() {
        let payload = concat!(
            r#"{"speaker_id":"u1","start":0.0,"end":2.5,"text":"Hello everyone"}"#,
            "\n",
            r#"{"speaker_id":"a1","start":2.5,"end":4.0,"text":"Hi, I'm the sales assistant"}"#,
            "\n",
        );

        let items = parse(payload).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].speaker_id, "u1");
        assert_eq!(items[0].text, "Hello everyone");
        assert_eq!(items[1].start, 2.5);
        assert_eq!(items[1].end, 4.0);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let payload = "\n{\"speaker_id\":\"u1\",\"start\":0,\"end\":1,\"text\":\"hey\"}\n\n";
        let items = parse(payload).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn malformed_line_fails_with_line_number() {
        let payload = concat!(
            r#"{"speaker_id":"u1","start":0,"end":1,"text":"fine"}"#,
            "\n",
            "not json at all",
            "\n",
        );

        let err = parse(payload).unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn missing_fields_fail() {
        assert!(parse(r#"{"speaker_id":"u1"}"#).is_err());
    }

    #[test]
    fn speaker_ids_are_distinct_and_ordered() {
        let items = vec![item("u1", "a"), item("a1", "b"), item("u1", "c")];
        assert_eq!(speaker_ids(&items), vec!["u1", "a1"]);
    }

    #[test]
    fn enrich_resolves_every_distinct_speaker() {
        let mut names = HashMap::new();
        names.insert("u1".to_string(), "Alice".to_string());
        names.insert("a1".to_string(), "Sales-Bot".to_string());

        let items = vec![item("u1", "Hello"), item("a1", "Hi there")];
        let enriched = enrich(items, &names);

        assert_eq!(enriched[0].speaker_name, "Alice");
        assert_eq!(enriched[1].speaker_name, "Sales-Bot");
        assert!(enriched.iter().all(|e| e.speaker_name != UNKNOWN_SPEAKER));
    }

    #[test]
    fn unmatched_speaker_resolves_to_unknown() {
        let names = HashMap::new();
        let enriched = enrich(vec![item("ghost", "boo")], &names);

        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].speaker_name, UNKNOWN_SPEAKER);
        assert_eq!(enriched[0].text, "boo");
    }

    #[test]
    fn one_resolution_per_distinct_speaker() {
        let mut names = HashMap::new();
        names.insert("u1".to_string(), "Alice".to_string());

        let items = vec![
            item("u1", "a"),
            item("ghost", "b"),
            item("u1", "c"),
            item("other", "d"),
        ];
        let distinct = speaker_ids(&items);
        let enriched = enrich(items, &names);

        assert_eq!(distinct.len(), 3);
        for id in &distinct {
            let resolved: Vec<&str> = enriched
                .iter()
                .filter(|e| &e.speaker_id == id)
                .map(|e| e.speaker_name.as_str())
                .collect();
            assert!(!resolved.is_empty());
            assert!(resolved.windows(2).all(|w| w[0] == w[1]));
        }
    }
}
