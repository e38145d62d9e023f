//! Prompt and response schema for feature evaluation.

use std::fmt::Write;

use serde_json::{json, Value};

use abcd_models::VideoSegment;

use crate::evaluator::EvaluationRequest;

/// Build the evaluation prompt for a feature group.
pub fn build_prompt(request: &EvaluationRequest) -> String {
    let brand = &request.brand;
    let mut prompt = String::new();

    let _ = writeln!(
        prompt,
        "You are a creative effectiveness analyst reviewing a video advertisement for the brand \"{}\".",
        brand.brand_name
    );
    if !brand.brand_variations.is_empty() {
        let _ = writeln!(prompt, "The brand may also appear as: {}.", brand.brand_variations.join(", "));
    }
    if !brand.branded_products.is_empty() {
        let _ = writeln!(prompt, "Branded products: {}.", brand.branded_products.join(", "));
    }
    if !brand.product_categories.is_empty() {
        let _ = writeln!(prompt, "Product categories: {}.", brand.product_categories.join(", "));
    }
    if !brand.branded_call_to_actions.is_empty() {
        let _ = writeln!(
            prompt,
            "Brand-specific calls to action: {}.",
            brand.branded_call_to_actions.join(", ")
        );
    }

    prompt.push('\n');
    match request.video.segment {
        VideoSegment::FullVideo => prompt.push_str("Watch the full video."),
        VideoSegment::First5SecsVideo => {
            prompt.push_str("Consider only the first 5 seconds of the video.")
        }
    }
    prompt.push_str(" For each feature below, decide whether the video meets its criteria.\n\n");

    for feature in &request.features {
        let _ = writeln!(prompt, "Feature id: {}", feature.id);
        let _ = writeln!(prompt, "Feature name: {}", feature.name);
        let _ = writeln!(prompt, "Criteria: {}\n", feature.criteria);
    }

    prompt.push_str(
        "Return ONLY a JSON array with one object per feature. Each object has \
the fields: id (the feature id above), detected (true or false), \
confidence_score (0 to 1), rationale, evidence, strengths, weaknesses.\n\
Base every answer on what is seen or heard in the video. Do not guess.",
    );

    prompt
}

/// Response schema for `generationConfig.responseSchema`.
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "STRING" },
                "detected": { "type": "BOOLEAN" },
                "confidence_score": { "type": "NUMBER" },
                "rationale": { "type": "STRING" },
                "evidence": { "type": "STRING" },
                "strengths": { "type": "STRING" },
                "weaknesses": { "type": "STRING" }
            },
            "required": ["id", "detected"]
        }
    })
}

/// Strip a markdown code fence around a JSON payload.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}
