//! Direct: early audio, calls to action.

use abcd_models::{AnnotationKind, BrandContext};

use super::{Detection, DetectionInput};
use crate::overlay::{admitted_texts, matching_term};
use crate::time::{time_seconds, TimeField};
use crate::transcript::{admitted_alternatives, find_elements};

/// Generic call-to-action phrases recognised for every brand.
pub const BASE_CALL_TO_ACTIONS: &[&str] = &[
    "LEARN MORE",
    "GET QUOTE",
    "APPLY NOW",
    "SIGN UP",
    "CONTACT US",
    "SUBSCRIBE",
    "DOWNLOAD",
    "BOOK NOW",
    "SHOP NOW",
    "BUY NOW",
    "DONATE NOW",
    "ORDER NOW",
    "PLAY NOW",
    "SEE MORE",
    "START NOW",
    "VISIT SITE",
    "WATCH NOW",
];

/// Base phrases followed by the brand's own, as a fresh list.
pub fn call_to_actions(brand: &BrandContext) -> Vec<String> {
    let mut phrases: Vec<String> = BASE_CALL_TO_ACTIONS.iter().map(|s| s.to_string()).collect();
    for cta in &brand.branded_call_to_actions {
        let cta = cta.trim();
        if !cta.is_empty() && !phrases.iter().any(|p| p.eq_ignore_ascii_case(cta)) {
            phrases.push(cta.to_string());
        }
    }
    phrases
}

/// Any word of an admitted alternative starts within the opening window.
pub fn audio_speech_early(input: &DetectionInput<'_>) -> Detection {
    let Some(speech) = input.speech() else {
        return Detection::absent(AnnotationKind::Speech);
    };

    let early = input.thresholds.early_time_seconds;
    let first_word = admitted_alternatives(speech, input.thresholds)
        .flat_map(|alt| alt.words.iter())
        .find(|w| time_seconds(*w, TimeField::StartTime) <= early);

    match first_word {
        Some(word) => Detection::hit(format!(
            "\"{}\" spoken at {:.2}s",
            word.word,
            time_seconds(word, TimeField::StartTime)
        )),
        None => Detection::miss("no speech in the opening seconds"),
    }
}

/// A call-to-action phrase is spoken.
pub fn call_to_action_speech(input: &DetectionInput<'_>) -> Detection {
    let Some(speech) = input.speech() else {
        return Detection::absent(AnnotationKind::Speech);
    };

    let phrases = call_to_actions(input.brand);
    match find_elements(speech, &phrases, &[], false, input.thresholds).anywhere {
        Some(phrase) => Detection::hit(format!("\"{}\" heard in speech", phrase)),
        None => Detection::miss("no call to action heard in speech"),
    }
}

/// A call-to-action phrase appears in overlay text.
pub fn call_to_action_text(input: &DetectionInput<'_>) -> Detection {
    let Some(texts) = input.texts() else {
        return Detection::absent(AnnotationKind::Text);
    };

    let phrases = call_to_actions(input.brand);
    let found = admitted_texts(texts, input.thresholds)
        .find_map(|text| matching_term(&text.text, &phrases));

    match found {
        Some(phrase) => Detection::hit(format!("\"{}\" shown in overlay text", phrase)),
        None => Detection::miss("no call to action in overlay text"),
    }
}
