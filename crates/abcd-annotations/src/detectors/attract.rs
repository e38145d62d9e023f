//! Attract: dynamic start, quick pacing, supers.

use abcd_models::AnnotationKind;

use super::{Detection, DetectionInput, PairedDetection};
use crate::overlay::admitted_texts;
use crate::time::{span_duration, time_millis, time_seconds, TimeField};
use crate::transcript::find_elements;

/// Shots per five-second window needed for quick pacing.
const QUICK_PACING_SHOTS: usize = 5;
/// Length of the quick pacing window.
const QUICK_PACING_WINDOW_SECS: f64 = 5.0;

/// The first shot ends before the dynamic-start cutoff.
pub fn dynamic_start(input: &DetectionInput<'_>) -> Detection {
    let Some(shots) = input.shots() else {
        return Detection::absent(AnnotationKind::Shot);
    };
    let Some(first) = shots.first() else {
        return Detection::miss("no shots detected");
    };

    let end_ms = time_millis(first, TimeField::EndTimeOffset);
    Detection::from_flag(
        end_ms < input.thresholds.dynamic_cutoff_ms,
        format!("first shot ends at {:.0} ms", end_ms),
        format!(
            "first shot ends at {:.0} ms, cutoff is {:.0} ms",
            end_ms, input.thresholds.dynamic_cutoff_ms
        ),
    )
}

/// Five or more shots within five seconds, over the video and its opening.
///
/// Shot durations accumulate until they reach five seconds, at which point
/// the window is judged and the counters reset.
pub fn quick_pacing(input: &DetectionInput<'_>) -> PairedDetection {
    let Some(shots) = input.shots() else {
        return PairedDetection::absent(AnnotationKind::Shot);
    };

    let mut ordered: Vec<_> = shots
        .iter()
        .map(|shot| (time_seconds(shot, TimeField::StartTimeOffset), span_duration(shot)))
        .collect();
    ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

    let early = input.thresholds.early_time_seconds;
    let mut accumulated = 0.0;
    let mut count = 0usize;
    let mut first_n_count = 0usize;
    let mut full = false;
    let mut first_n = false;

    for (start, duration) in ordered {
        accumulated += duration;
        count += 1;
        if start < early {
            first_n_count += 1;
        }

        if accumulated >= QUICK_PACING_WINDOW_SECS {
            full |= count >= QUICK_PACING_SHOTS;
            first_n |= first_n_count >= QUICK_PACING_SHOTS;
            accumulated = 0.0;
            count = 0;
            first_n_count = 0;
        }
    }

    PairedDetection {
        full: Detection::from_flag(
            full,
            "5 or more shots within 5 seconds",
            "no 5-second window with 5 or more shots",
        ),
        first_n: Detection::from_flag(
            first_n,
            "5 or more shots in the opening seconds",
            "fewer than 5 shots in the opening seconds",
        ),
    }
}

/// Any overlay text clears the confidence threshold.
pub fn supers(input: &DetectionInput<'_>) -> Detection {
    let Some(texts) = input.texts() else {
        return Detection::absent(AnnotationKind::Text);
    };

    match admitted_texts(texts, input.thresholds).next() {
        Some(text) => Detection::hit(format!("overlay text \"{}\"", text.text.trim())),
        None => Detection::miss("no overlay text above confidence threshold"),
    }
}

/// Overlay text is also spoken in the audio.
pub fn supers_with_audio(input: &DetectionInput<'_>) -> Detection {
    let Some(texts) = input.texts() else {
        return Detection::absent(AnnotationKind::Text);
    };
    let Some(speech) = input.speech() else {
        return Detection::absent(AnnotationKind::Speech);
    };

    let overlays: Vec<String> = admitted_texts(texts, input.thresholds)
        .map(|t| t.text.trim().to_string())
        .collect();
    let matched = find_elements(speech, &overlays, &[], true, input.thresholds);

    match matched.anywhere {
        Some(term) => Detection::hit(format!("overlay \"{}\" heard in speech", term)),
        None => Detection::miss("no overlay text heard in speech"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::fixtures::{shots, speech, text, Fixture};
    use abcd_models::{AnnotationBundle, TimeSpan};

    fn with_shots(durations: &[f64]) -> Fixture {
        Fixture::new(AnnotationBundle {
            shot_annotations: Some(shots(durations)),
            ..Default::default()
        })
    }

    #[test]
    fn test_dynamic_start_cutoff() {
        assert!(dynamic_start(&with_shots(&[2.5, 4.0]).input()).detected);
        assert!(!dynamic_start(&with_shots(&[3.5, 1.0]).input()).detected);
    }

    #[test]
    fn test_dynamic_start_without_shots() {
        assert!(!dynamic_start(&with_shots(&[]).input()).detected);
        assert!(!dynamic_start(&Fixture::new(AnnotationBundle::default()).input()).detected);
    }

    #[test]
    fn test_quick_pacing_six_one_second_shots() {
        let result = quick_pacing(&with_shots(&[1.0; 6]).input());
        assert!(result.full.detected);
        assert!(result.first_n.detected);
    }

    #[test]
    fn test_quick_pacing_three_two_second_shots() {
        let result = quick_pacing(&with_shots(&[2.0; 3]).input());
        assert!(!result.full.detected);
        assert!(!result.first_n.detected);
    }

    #[test]
    fn test_quick_pacing_late_burst_is_full_only() {
        let mut durations = vec![5.0];
        durations.extend([1.0; 5]);
        let result = quick_pacing(&with_shots(&durations).input());
        assert!(result.full.detected);
        assert!(!result.first_n.detected);
    }

    #[test]
    fn test_quick_pacing_sorts_by_start() {
        let mut fixture = with_shots(&[1.0; 5]);
        fixture.bundle.shot_annotations.as_mut().unwrap().reverse();
        assert!(quick_pacing(&fixture.input()).full.detected);
    }

    #[test]
    fn test_supers_respects_confidence() {
        let fixture = Fixture::new(AnnotationBundle {
            text_annotations: Some(vec![text("50% OFF", 0.2, 1.0)]),
            ..Default::default()
        });
        assert!(!supers(&fixture.input()).detected);

        let fixture = Fixture::new(AnnotationBundle {
            text_annotations: Some(vec![text("50% OFF", 0.2, 1.0), text("Pixel 8", 0.9, 2.0)]),
            ..Default::default()
        });
        assert!(supers(&fixture.input()).detected);
    }

    #[test]
    fn test_supers_with_audio() {
        let fixture = Fixture::new(AnnotationBundle {
            text_annotations: Some(vec![text("Pixel 8", 0.9, 1.0), text("is", 0.9, 2.0)]),
            speech_transcriptions: Some(vec![speech("meet the new pixel 8 today", 0.9, 0.0)]),
            ..Default::default()
        });
        assert!(supers_with_audio(&fixture.input()).detected);

        let fixture = Fixture::new(AnnotationBundle {
            text_annotations: Some(vec![text("is", 0.9, 2.0)]),
            speech_transcriptions: Some(vec![speech("this is it", 0.9, 0.0)]),
            ..Default::default()
        });
        assert!(!supers_with_audio(&fixture.input()).detected);
    }

    #[test]
    fn test_supers_with_audio_below_threshold() {
        let fixture = Fixture::new(AnnotationBundle {
            text_annotations: Some(vec![text("Pixel 8", 0.2, 1.0)]),
            speech_transcriptions: Some(vec![speech("meet the new pixel 8 today", 0.9, 0.0)]),
            ..Default::default()
        });
        assert!(!supers_with_audio(&fixture.input()).detected);

        let fixture = Fixture::new(AnnotationBundle {
            text_annotations: Some(vec![text("Pixel 8", 0.9, 1.0)]),
            speech_transcriptions: Some(vec![speech("meet the new pixel 8 today", 0.2, 0.0)]),
            ..Default::default()
        });
        assert!(!supers_with_audio(&fixture.input()).detected);
    }

    #[test]
    fn test_detectors_are_idempotent() {
        let fixture = with_shots(&[0.8, 0.9, 1.0, 1.1, 1.2, 3.0]);
        let input = fixture.input();
        assert_eq!(quick_pacing(&input), quick_pacing(&input));
        assert_eq!(dynamic_start(&input), dynamic_start(&input));
    }

    #[test]
    fn test_zero_length_shot_list_entry() {
        let fixture = Fixture::new(AnnotationBundle {
            shot_annotations: Some(vec![TimeSpan::default()]),
            ..Default::default()
        });
        assert!(dynamic_start(&fixture.input()).detected);
        assert!(!quick_pacing(&fixture.input()).full.detected);
    }
}
