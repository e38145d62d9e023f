//! Brand: brand and product mentions, brand and product visuals.

use abcd_models::{AnnotationKind, Entity, LogoRecognitionAnnotation};

use super::{Detection, DetectionInput, PairedDetection};
use crate::geometry::{box_area, polygon_area, EdgeDefault};
use crate::overlay::{admitted_texts, first_n_frame, matching_term};
use crate::time::{time_seconds, TimeField};
use crate::transcript::{find_elements, TranscriptMatch};

/// Brand name or a variation is spoken.
pub fn brand_mention_speech(input: &DetectionInput<'_>) -> PairedDetection {
    let Some(speech) = input.speech() else {
        return PairedDetection::absent(AnnotationKind::Speech);
    };

    let matched = find_elements(speech, &input.brand.brand_terms(), &[], false, input.thresholds);
    speech_pair(matched, "brand")
}

/// A branded product or product category is spoken.
pub fn product_mention_speech(input: &DetectionInput<'_>) -> PairedDetection {
    let Some(speech) = input.speech() else {
        return PairedDetection::absent(AnnotationKind::Speech);
    };

    let matched = find_elements(
        speech,
        &input.brand.branded_products,
        &input.brand.product_categories,
        false,
        input.thresholds,
    );
    speech_pair(matched, "product")
}

fn speech_pair(matched: TranscriptMatch, what: &str) -> PairedDetection {
    PairedDetection {
        full: match matched.anywhere {
            Some(term) => Detection::hit(format!("\"{}\" heard in speech", term)),
            None => Detection::miss(format!("no {} terms heard in speech", what)),
        },
        first_n: match matched.first_n {
            Some(term) => Detection::hit(format!("\"{}\" heard in the opening seconds", term)),
            None => Detection::miss(format!("no {} terms heard in the opening seconds", what)),
        },
    }
}

/// A branded product or product category appears in overlay text.
pub fn product_mention_text(input: &DetectionInput<'_>) -> PairedDetection {
    let Some(texts) = input.texts() else {
        return PairedDetection::absent(AnnotationKind::Text);
    };

    let terms: Vec<&String> = input
        .brand
        .branded_products
        .iter()
        .chain(input.brand.product_categories.iter())
        .collect();

    let mut full: Option<String> = None;
    let mut first_n: Option<String> = None;

    for text in admitted_texts(texts, input.thresholds) {
        let Some(term) = matching_term(&text.text, terms.iter().copied()) else {
            continue;
        };
        full.get_or_insert_with(|| term.clone());
        if first_n.is_none() && first_n_frame(text, input.thresholds).is_some() {
            first_n = Some(term.clone());
        }
        if first_n.is_some() {
            break;
        }
    }

    PairedDetection {
        full: match full {
            Some(term) => Detection::hit(format!("\"{}\" shown in overlay text", term)),
            None => Detection::miss("no product terms in overlay text"),
        },
        first_n: match first_n {
            Some(term) => Detection::hit(format!("\"{}\" shown in the opening seconds", term)),
            None => Detection::miss("no product terms in overlay text in the opening seconds"),
        },
    }
}

/// Brand name in overlay text, or a recognised brand logo.
///
/// A brand shown early whose box exceeds the logo size threshold is noted
/// as a large logo in the evidence.
pub fn brand_visuals(input: &DetectionInput<'_>) -> PairedDetection {
    let texts = input.texts();
    let logos = input.logos();
    if texts.is_none() && logos.is_none() {
        return PairedDetection::absent(AnnotationKind::Logo);
    }

    let thresholds = input.thresholds;
    let early = thresholds.early_time_seconds;
    let brand_terms = input.brand.brand_terms();

    let mut full: Vec<String> = Vec::new();
    let mut first_n: Vec<String> = Vec::new();
    let mut large_logo = false;

    for text in admitted_texts(texts.unwrap_or_default(), thresholds) {
        let Some(term) = matching_term(&text.text, &brand_terms) else {
            continue;
        };
        full.push(format!("\"{}\" in overlay text", term));

        if let Some(frame) = first_n_frame(text, thresholds) {
            first_n.push(format!("\"{}\" in overlay text", term));
            let area = frame
                .rotated_bounding_box
                .as_ref()
                .map(|poly| polygon_area(&poly.vertices))
                .unwrap_or(0.0);
            large_logo |= area > thresholds.logo_size_threshold;
        }
    }

    for logo in logos.unwrap_or_default() {
        if !is_brand_logo(&logo.entity, &brand_terms, input) {
            continue;
        }

        let mut admitted = false;
        for track in logo.tracks.iter().filter(|t| thresholds.admits(t.confidence)) {
            admitted = true;
            if time_seconds(track, TimeField::StartTimeOffset) <= early {
                first_n.push(logo_label(logo));
                large_logo |= track
                    .timestamped_objects
                    .iter()
                    .filter_map(|obj| obj.normalized_bounding_box.as_ref())
                    .any(|b| box_area(b, EdgeDefault::Zero) > thresholds.logo_size_threshold);
            }
        }
        if !admitted {
            continue;
        }
        full.push(logo_label(logo));

        if logo
            .segments
            .iter()
            .any(|s| time_seconds(s, TimeField::StartTimeOffset) <= early)
        {
            first_n.push(logo_label(logo));
        }
    }

    let size_note = if large_logo { ", large logo" } else { "" };
    PairedDetection {
        full: match full.first() {
            Some(found) => Detection::hit(format!("brand shown: {}", found)),
            None => Detection::miss("no brand text or logo detected"),
        },
        first_n: match first_n.first() {
            Some(found) => Detection::hit(format!("brand shown early: {}{}", found, size_note)),
            None => Detection::miss("no brand text or logo in the opening seconds"),
        },
    }
}

fn logo_label(logo: &LogoRecognitionAnnotation) -> String {
    format!("logo \"{}\"", logo.entity.description)
}

fn is_brand_logo(entity: &Entity, brand_terms: &[String], input: &DetectionInput<'_>) -> bool {
    let description = entity.description.trim();
    if input.entities.brand_has_id(&entity.entity_id) {
        return true;
    }
    if description.is_empty() {
        return false;
    }

    let kg_match = input.entities.brand.iter().any(|e| {
        e.description
            .as_deref()
            .is_some_and(|d| d.eq_ignore_ascii_case(description))
            || e.name.eq_ignore_ascii_case(description)
    });
    kg_match || brand_terms.iter().any(|t| t.eq_ignore_ascii_case(description))
}

/// A product or product category recognised in label annotations.
pub fn product_visuals(input: &DetectionInput<'_>) -> PairedDetection {
    let Some(labels) = input.labels() else {
        return PairedDetection::absent(AnnotationKind::Label);
    };

    let thresholds = input.thresholds;
    let early = thresholds.early_time_seconds;
    let mut full: Option<String> = None;
    let mut first_n: Option<String> = None;

    for label in labels.into_iter().filter(|l| is_product_entity(&l.entity, input)) {
        let starts = label
            .segments
            .iter()
            .filter(|s| thresholds.admits(s.confidence))
            .map(|s| time_seconds(s, TimeField::StartTimeOffset))
            .chain(
                label
                    .frames
                    .iter()
                    .filter(|f| thresholds.admits(f.confidence))
                    .map(|f| time_seconds(f, TimeField::TimeOffset)),
            );

        for start in starts {
            full.get_or_insert_with(|| label.entity.description.clone());
            if start <= early {
                first_n.get_or_insert_with(|| label.entity.description.clone());
            }
        }
    }

    PairedDetection {
        full: match full {
            Some(name) => Detection::hit(format!("product label \"{}\"", name)),
            None => Detection::miss("no product labels detected"),
        },
        first_n: match first_n {
            Some(name) => Detection::hit(format!("product label \"{}\" in the opening seconds", name)),
            None => Detection::miss("no product labels in the opening seconds"),
        },
    }
}

fn is_product_entity(entity: &Entity, input: &DetectionInput<'_>) -> bool {
    if input.entities.product_has_id(&entity.entity_id) {
        return true;
    }
    let description = entity.description.trim();
    !description.is_empty()
        && input
            .brand
            .branded_products
            .iter()
            .chain(input.brand.product_categories.iter())
            .any(|term| term.trim().eq_ignore_ascii_case(description))
}
