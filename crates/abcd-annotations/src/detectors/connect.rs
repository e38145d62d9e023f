//! Connect: overall pacing, presence of people, visible faces.

use abcd_models::{AnnotationKind, Track};

use super::{Detection, DetectionInput, PairedDetection};
use crate::geometry::{box_area, EdgeDefault};
use crate::time::{span_duration, time_seconds, TimeField};

/// Average shot length is at most the pacing threshold.
pub fn overall_pacing(input: &DetectionInput<'_>) -> Detection {
    let Some(shots) = input.shots() else {
        return Detection::absent(AnnotationKind::Shot);
    };
    if shots.is_empty() {
        return Detection::miss("no shots detected");
    }

    let total: f64 = shots.iter().map(span_duration).sum();
    let average = total / shots.len() as f64;
    let limit = input.thresholds.avg_shot_duration_seconds;

    Detection::from_flag(
        average <= limit,
        format!("average shot length {:.2}s over {} shots", average, shots.len()),
        format!("average shot length {:.2}s exceeds {:.2}s", average, limit),
    )
}

/// Any person track clears the threshold; early when it starts in the opening window.
pub fn presence_of_people(input: &DetectionInput<'_>) -> PairedDetection {
    let Some(people) = input.people() else {
        return PairedDetection::absent(AnnotationKind::People);
    };

    let tracks: Vec<&Track> = people
        .iter()
        .flat_map(|p| p.tracks.iter())
        .filter(|t| input.thresholds.admits(t.confidence))
        .collect();
    let early = tracks
        .iter()
        .find(|t| time_seconds(**t, TimeField::StartTimeOffset) < input.thresholds.early_time_seconds);

    PairedDetection {
        full: Detection::from_flag(
            !tracks.is_empty(),
            format!("{} person tracks detected", tracks.len()),
            "no person tracks above confidence threshold",
        ),
        first_n: match early {
            Some(track) => Detection::hit(format!(
                "person appears at {:.2}s",
                time_seconds(*track, TimeField::StartTimeOffset)
            )),
            None => Detection::miss("no person in the opening seconds"),
        },
    }
}

/// Face scan over admitted face tracks.
///
/// `first_n` is a face starting in the opening window. `full` is a close-up
/// anywhere in the video: a face box covering at least the face surface
/// threshold of the frame.
pub fn visible_face(input: &DetectionInput<'_>) -> PairedDetection {
    let Some(faces) = input.faces() else {
        return PairedDetection::absent(AnnotationKind::Face);
    };

    let thresholds = input.thresholds;
    let min_area = thresholds.face_surface_threshold * 100.0;
    let mut early_face: Option<f64> = None;
    let mut close_up: Option<f64> = None;

    let tracks = faces
        .iter()
        .flat_map(|f| f.tracks.iter())
        .filter(|t| thresholds.admits(t.confidence));

    for track in tracks {
        let start = time_seconds(track, TimeField::StartTimeOffset);
        if start < thresholds.early_time_seconds && early_face.is_none() {
            early_face = Some(start);
        }

        let largest = track
            .timestamped_objects
            .iter()
            .filter_map(|obj| obj.normalized_bounding_box.as_ref())
            .map(|b| box_area(b, EdgeDefault::FrameEdges))
            .fold(None, |acc: Option<f64>, area| Some(acc.map_or(area, |a| a.max(area))));
        if let Some(area) = largest {
            if area >= min_area && close_up.map_or(true, |a| area > a) {
                close_up = Some(area);
            }
        }
    }

    PairedDetection {
        full: match close_up {
            Some(area) => Detection::hit(format!("face covers {:.1}% of the frame", area)),
            None => Detection::miss("no close-up face detected"),
        },
        first_n: match early_face {
            Some(start) => Detection::hit(format!("face appears at {:.2}s", start)),
            None => Detection::miss("no face in the opening seconds"),
        },
    }
}
