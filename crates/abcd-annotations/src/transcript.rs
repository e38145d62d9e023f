//! Speech transcript matching.
//!
//! Terms are matched as case-insensitive substrings of the transcript of
//! every alternative that clears the confidence threshold. The opening
//! window is matched against a transcript rebuilt from timed words, since
//! only words carry offsets.

use abcd_models::{SpeechAlternative, SpeechTranscription, Thresholds};

use crate::time::{time_seconds, TimeField};

/// Elements this short or shorter are skipped by the strict filter.
pub const STRICT_MIN_ELEMENT_CHARS: usize = 3;

/// Which term matched, over the whole video and within the opening window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptMatch {
    pub anywhere: Option<String>,
    pub first_n: Option<String>,
}

impl TranscriptMatch {
    pub fn found(&self) -> bool {
        self.anywhere.is_some()
    }

    pub fn found_first_n(&self) -> bool {
        self.first_n.is_some()
    }
}

/// Alternatives whose confidence clears the threshold.
pub fn admitted_alternatives<'a>(
    transcriptions: &'a [SpeechTranscription],
    thresholds: &'a Thresholds,
) -> impl Iterator<Item = &'a SpeechAlternative> + 'a {
    transcriptions
        .iter()
        .flat_map(|t| t.alternatives.iter())
        .filter(move |alt| thresholds.admits(alt.confidence))
}

/// Transcripts of admitted alternatives, joined by spaces.
pub fn speech_transcript(transcriptions: &[SpeechTranscription], thresholds: &Thresholds) -> String {
    admitted_alternatives(transcriptions, thresholds)
        .map(|alt| alt.transcript.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Words spoken within the opening window, in time order per alternative.
pub fn first_n_transcript(
    transcriptions: &[SpeechTranscription],
    thresholds: &Thresholds,
) -> String {
    let mut words: Vec<&str> = Vec::new();

    for alternative in admitted_alternatives(transcriptions, thresholds) {
        let mut timed: Vec<(f64, &str)> = alternative
            .words
            .iter()
            .map(|w| (time_seconds(w, TimeField::StartTime), w.word.as_str()))
            .collect();
        timed.sort_by(|a, b| a.0.total_cmp(&b.0));

        words.extend(
            timed
                .into_iter()
                .filter(|(start, _)| *start <= thresholds.early_time_seconds)
                .map(|(_, word)| word),
        );
    }

    words.join(" ")
}

/// Find elements or categories in the speech of a video.
///
/// With `strict_len_filter`, elements of three characters or fewer are
/// ignored; categories are never filtered.
pub fn find_elements(
    transcriptions: &[SpeechTranscription],
    elements: &[String],
    categories: &[String],
    strict_len_filter: bool,
    thresholds: &Thresholds,
) -> TranscriptMatch {
    let anywhere = admitted_alternatives(transcriptions, thresholds)
        .find_map(|alt| first_match(&alt.transcript, elements, categories, strict_len_filter));

    let opening = first_n_transcript(transcriptions, thresholds);
    let first_n = first_match(&opening, elements, categories, strict_len_filter);

    TranscriptMatch { anywhere, first_n }
}

/// First term contained in `haystack`, case-insensitively.
pub fn first_match(
    haystack: &str,
    elements: &[String],
    categories: &[String],
    strict_len_filter: bool,
) -> Option<String> {
    if haystack.trim().is_empty() {
        return None;
    }
    let haystack = haystack.to_lowercase();

    let element_hit = elements
        .iter()
        .filter(|e| !strict_len_filter || e.chars().count() > STRICT_MIN_ELEMENT_CHARS)
        .find(|e| contains_term(&haystack, e));

    element_hit
        .or_else(|| categories.iter().find(|c| contains_term(&haystack, c)))
        .cloned()
}

/// `lowered_haystack` must already be lowercase.
fn contains_term(lowered_haystack: &str, term: &str) -> bool {
    let term = term.trim();
    !term.is_empty() && lowered_haystack.contains(&term.to_lowercase())
}
