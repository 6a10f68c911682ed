// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Best-effort transcript lookup by scraping an episode's web page.
//!
//! No speech-to-text happens here. When a page has no transcript-shaped
//! markup the response points at transcription services instead.

use scraper::{Html, Selector};
use serde::Serialize;

/// Candidate selectors, tried in order
pub const TRANSCRIPT_SELECTORS: &[&str] = &[
    ".transcript",
    "#transcript",
    "[class*=\"transcript\"]",
    ".episode-transcript",
    ".show-notes",
];

/// Transcription services suggested when nothing could be scraped
pub const INTEGRATION_SUGGESTIONS: &[(&str, &str)] = &[
    ("assemblyai", "https://www.assemblyai.com/"),
    ("deepgram", "https://www.deepgram.com/"),
    ("openai_whisper", "https://openai.com/research/whisper"),
    ("google_speech", "https://cloud.google.com/speech-to-text"),
];

const UNAVAILABLE_MESSAGE: &str = "Transcript not available. Consider integrating with a transcription service like AssemblyAI or Deepgram.";

/// Simple counts over a transcript's text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptStats {
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_words_per_sentence: usize,
    pub character_count: usize,
}

impl TranscriptStats {
    pub fn from_text(text: &str) -> Self {
        let word_count = text.split_whitespace().count();
        let sentence_count = text
            .split(['.', '!', '?'])
            .filter(|sentence| !sentence.trim().is_empty())
            .count()
            .max(1);

        Self {
            word_count,
            sentence_count,
            avg_words_per_sentence: (word_count as f64 / sentence_count as f64).round() as usize,
            character_count: text.chars().count(),
        }
    }
}

/// Result of a transcript lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TranscriptResponse {
    Available {
        episode_id: Option<String>,
        transcript: String,
        available: bool,
        method: &'static str,
        stats: TranscriptStats,
    },
    Unavailable {
        episode_id: Option<String>,
        transcript: Option<String>,
        available: bool,
        message: &'static str,
        integration_suggestions: serde_json::Map<String, serde_json::Value>,
    },
}

impl TranscriptResponse {
    pub fn available(episode_id: Option<String>, transcript: String) -> Self {
        let stats = TranscriptStats::from_text(&transcript);
        TranscriptResponse::Available {
            episode_id,
            transcript,
            available: true,
            method: "html_extraction",
            stats,
        }
    }

    pub fn unavailable(episode_id: Option<String>) -> Self {
        let integration_suggestions = INTEGRATION_SUGGESTIONS
            .iter()
            .map(|(name, url)| (name.to_string(), serde_json::Value::from(*url)))
            .collect();

        TranscriptResponse::Unavailable {
            episode_id,
            transcript: None,
            available: false,
            message: UNAVAILABLE_MESSAGE,
            integration_suggestions,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, TranscriptResponse::Available { .. })
    }
}

/// Find transcript text in an HTML page.
///
/// Selectors are tried in order; the first element with non-blank text wins.
pub fn extract_transcript(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    TRANSCRIPT_SELECTORS
        .iter()
        .filter_map(|selector| Selector::parse(selector).ok())
        .find_map(|selector| {
            document.select(&selector).find_map(|element| {
                let text = element.text().collect::<String>();
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            })
        })
}
