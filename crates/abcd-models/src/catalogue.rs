//! The ABCD feature catalogue.
//!
//! Shot-structure features are judged from annotations only; every other
//! feature is judged by both the annotation detectors and the model.

use crate::feature::{
    EvaluationMethod, FeatureCategory, FeatureDefinition, FeatureId, VideoSegment,
};

const fn def(
    id: FeatureId,
    name: &'static str,
    category: FeatureCategory,
    criteria: &'static str,
    video_segment: VideoSegment,
    method: EvaluationMethod,
) -> FeatureDefinition {
    FeatureDefinition {
        id,
        name,
        category,
        criteria,
        video_segment,
        method,
    }
}

use EvaluationMethod::{Annotations, Both};
use FeatureCategory::{Attract, Brand, Connect, Direct};
use VideoSegment::{First5SecsVideo, FullVideo};

/// Every rubric item, ordered by id.
pub static FEATURE_CATALOGUE: [FeatureDefinition; 23] = [
    def(
        FeatureId::DynamicStart,
        "Dynamic Start",
        Attract,
        "The first shot in the video changes in less than 3 seconds.",
        FullVideo,
        Annotations,
    ),
    def(
        FeatureId::QuickPacing,
        "Quick Pacing",
        Attract,
        "Within ANY 5 consecutive seconds there are 5 or more shots in the video. These include hard cuts, \
         soft transitions and camera changes such as camera pans, swipes, zooms, depth of field changes, \
         tracking shots and movement of the camera.",
        FullVideo,
        Annotations,
    ),
    def(
        FeatureId::QuickPacingFirst5Secs,
        "Quick Pacing (First 5 seconds)",
        Attract,
        "There are at least 5 shot changes or visual cuts detected in the first 5 seconds of the video. \
         These include hard cuts, soft transitions and camera changes such as camera pans, swipes, zooms, \
         depth of field changes, tracking shots and movement of the camera.",
        FullVideo,
        Annotations,
    ),
    def(
        FeatureId::Supers,
        "Supers",
        Attract,
        "Any supers (text overlays) have been incorporated at any time in the video.",
        FullVideo,
        Both,
    ),
    def(
        FeatureId::SupersWithAudio,
        "Supers with Audio",
        Attract,
        "The speech heard in the audio of the video matches OR is contextually supportive of the overlaid \
         text shown on screen.",
        FullVideo,
        Both,
    ),
    def(
        FeatureId::BrandMentionSpeech,
        "Brand Mention (Speech)",
        Brand,
        "The brand name is heard in the audio or speech at any time in the video.",
        FullVideo,
        Both,
    ),
    def(
        FeatureId::BrandMentionSpeechFirst5Secs,
        "Brand Mention (Speech) (First 5 seconds)",
        Brand,
        "The brand name is heard in the audio or speech in the video.",
        First5SecsVideo,
        Both,
    ),
    def(
        FeatureId::BrandVisuals,
        "Brand Visuals",
        Brand,
        "Branding, defined as the brand name or brand logo are shown in-situation or overlaid at any time \
         in the video.",
        FullVideo,
        Both,
    ),
    def(
        FeatureId::BrandVisualsFirst5Secs,
        "Brand Visuals (First 5 seconds)",
        Brand,
        "Branding, defined as the brand name or brand logo are shown in-situation or overlaid in the video.",
        First5SecsVideo,
        Both,
    ),
    def(
        FeatureId::ProductMentionSpeech,
        "Product Mention (Speech)",
        Brand,
        "The branded product names or generic product categories are heard or mentioned in the audio or \
         speech at any time in the video.",
        FullVideo,
        Both,
    ),
    def(
        FeatureId::ProductMentionSpeechFirst5Secs,
        "Product Mention (Speech) (First 5 seconds)",
        Brand,
        "The branded product names or generic product categories are heard or mentioned in the audio or \
         speech in the video.",
        First5SecsVideo,
        Both,
    ),
    def(
        FeatureId::ProductMentionText,
        "Product Mention (Text)",
        Brand,
        "The branded product names or generic product categories are present in any text or overlay at \
         any time in the video.",
        FullVideo,
        Both,
    ),
    def(
        FeatureId::ProductMentionTextFirst5Secs,
        "Product Mention (Text) (First 5 seconds)",
        Brand,
        "The branded product names or generic product categories are present in any text or overlay in \
         the video.",
        First5SecsVideo,
        Both,
    ),
    def(
        FeatureId::ProductVisuals,
        "Product Visuals",
        Brand,
        "A product or branded packaging is visually present at any time in the video. Where the product \
         is a service a relevant substitute should be shown such as via a branded app or branded service \
         personnel.",
        FullVideo,
        Both,
    ),
    def(
        FeatureId::ProductVisualsFirst5Secs,
        "Product Visuals (First 5 seconds)",
        Brand,
        "A product or branded packaging is visually present in the video. Where the product is a service \
         a relevant substitute should be shown such as via a branded app or branded service personnel.",
        First5SecsVideo,
        Both,
    ),
    def(
        FeatureId::OverallPacing,
        "Overall Pacing",
        Connect,
        "The pace of the video is greater than 2 seconds per shot/frame.",
        FullVideo,
        Annotations,
    ),
    def(
        FeatureId::PresenceOfPeople,
        "Presence of People",
        Connect,
        "People are shown in any capacity at any time in the video. Any human body parts are acceptable \
         to pass this guideline. Alternate representations of people such as Animations or Cartoons ARE \
         acceptable.",
        FullVideo,
        Both,
    ),
    def(
        FeatureId::PresenceOfPeopleFirst5Secs,
        "Presence of People (First 5 seconds)",
        Connect,
        "People are shown in any capacity in the video. Any human body parts are acceptable to pass this \
         guideline. Alternate representations of people such as Animations or Cartoons ARE acceptable.",
        First5SecsVideo,
        Both,
    ),
    def(
        FeatureId::VisibleFace,
        "Visible Face (First 5 seconds)",
        Connect,
        "At least one human face is present in the video. Alternate representations of people such as \
         Animations or Cartoons ARE acceptable.",
        First5SecsVideo,
        Both,
    ),
    def(
        FeatureId::VisibleFaceCloseUp,
        "Visible Face (Close Up)",
        Connect,
        "There is a close up of a human face at any time in the video.",
        FullVideo,
        Both,
    ),
    def(
        FeatureId::AudioSpeechEarly,
        "Audio Early (First 5 seconds)",
        Direct,
        "Speech is detected in the audio of the video.",
        First5SecsVideo,
        Both,
    ),
    def(
        FeatureId::CallToActionSpeech,
        "Call To Action (Speech)",
        Direct,
        "A 'Call To Action' phrase is heard or mentioned in the audio or speech at any time in the video.",
        FullVideo,
        Both,
    ),
    def(
        FeatureId::CallToActionText,
        "Call To Action (Text)",
        Direct,
        "A 'Call To Action' phrase is detected in the video supers (overlaid text) at any time in the video.",
        FullVideo,
        Both,
    ),
];

/// Look up a feature definition by id.
pub fn feature_definition(id: FeatureId) -> Option<&'static FeatureDefinition> {
    FEATURE_CATALOGUE.iter().find(|def| def.id == id)
}
