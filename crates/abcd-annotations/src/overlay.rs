//! On-screen text ("supers") helpers.

use abcd_models::{TextAnnotation, TextFrame, Thresholds};

use crate::time::{time_seconds, TimeField};

/// True if any segment of the text clears the confidence threshold.
pub fn is_admitted(text: &TextAnnotation, thresholds: &Thresholds) -> bool {
    text.segments.iter().any(|s| thresholds.admits(s.confidence))
}

/// Text annotations that clear the confidence threshold.
pub fn admitted_texts<'a>(
    texts: &'a [TextAnnotation],
    thresholds: &'a Thresholds,
) -> impl Iterator<Item = &'a TextAnnotation> + 'a {
    texts.iter().filter(move |t| is_admitted(t, thresholds))
}

/// First frame showing the text within the opening window.
///
/// Only segments that clear the confidence threshold and start within the
/// window count; within a segment the first frame at or before the window
/// end is returned.
pub fn first_n_frame<'a>(text: &'a TextAnnotation, thresholds: &Thresholds) -> Option<&'a TextFrame> {
    let early = thresholds.early_time_seconds;
    text.segments
        .iter()
        .filter(|segment| thresholds.admits(segment.confidence))
        .filter(|segment| time_seconds(*segment, TimeField::StartTimeOffset) <= early)
        .flat_map(|segment| segment.frames.iter())
        .find(|frame| time_seconds(*frame, TimeField::TimeOffset) <= early)
}

/// First term contained in the text, case-insensitively.
pub fn matching_term<'a>(text: &str, terms: impl IntoIterator<Item = &'a String>) -> Option<&'a String> {
    let lowered = text.to_lowercase();
    terms.into_iter().find(|term| {
        let term = term.trim();
        !term.is_empty() && lowered.contains(&term.to_lowercase())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use abcd_models::{TextSegment, TimeOffset, TimeSpan};

    fn text(value: &str, confidence: f64, start: f64, frame_at: f64) -> TextAnnotation {
        TextAnnotation {
            text: value.to_string(),
            segments: vec![TextSegment {
                segment: Some(TimeSpan::new(start, start + 2.0)),
                confidence,
                frames: vec![TextFrame {
                    rotated_bounding_box: None,
                    time_offset: Some(TimeOffset::from_secs(frame_at)),
                }],
            }],
        }
    }

    #[test]
    fn test_admission() {
        let thresholds = Thresholds::default();
        assert!(is_admitted(&text("SALE", 0.9, 0.0, 0.0), &thresholds));
        assert!(!is_admitted(&text("SALE", 0.2, 0.0, 0.0), &thresholds));
    }

    #[test]
    fn test_first_n_frame_window() {
        let thresholds = Thresholds::default();
        assert!(first_n_frame(&text("SALE", 0.9, 1.0, 1.5), &thresholds).is_some());
        assert!(first_n_frame(&text("SALE", 0.9, 5.0, 5.0), &thresholds).is_some());
        assert!(first_n_frame(&text("SALE", 0.9, 6.0, 6.0), &thresholds).is_none());
        assert!(first_n_frame(&text("SALE", 0.9, 4.0, 5.5), &thresholds).is_none());
    }

    #[test]
    fn test_first_n_frame_skips_low_confidence_segments() {
        let thresholds = Thresholds::default();
        let mut mixed = text("SALE", 0.1, 1.0, 1.0);
        mixed.segments.extend(text("SALE", 0.9, 20.0, 20.0).segments);

        assert!(is_admitted(&mixed, &thresholds));
        assert!(first_n_frame(&mixed, &thresholds).is_none());

        mixed.segments[1] = text("SALE", 0.9, 3.0, 3.0).segments.remove(0);
        let frame = first_n_frame(&mixed, &thresholds).unwrap();
        assert_eq!(time_seconds(frame, TimeField::TimeOffset), 3.0);
    }

    #[test]
    fn test_matching_term() {
        let terms = vec!["Pixel".to_string(), "phone".to_string()];
        assert_eq!(matching_term("NEW PIXEL 8", &terms).map(String::as_str), Some("Pixel"));
        assert!(matching_term("laptop", &terms).is_none());
    }
}
