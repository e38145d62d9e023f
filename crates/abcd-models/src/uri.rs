//! Video URI helpers.

const GCS_SCHEME: &str = "gs://";

/// File name of the trimmed opening clip stored next to a video's annotations.
pub const REDUCED_VIDEO_FILE: &str = "reduced_1st_5_secs.mp4";

/// Folder key for a video's annotations: scheme stripped, dots replaced.
///
/// `gs://bucket/ads/spot.mp4` becomes `bucket/ads/spot_mp4`.
pub fn annotation_key(video_uri: &str) -> String {
    let trimmed = video_uri.trim();
    let without_scheme = trimmed.strip_prefix(GCS_SCHEME).unwrap_or(trimmed);
    without_scheme.trim_matches('/').replace('.', "_")
}

/// URI of the trimmed opening clip under an annotation location.
pub fn reduced_video_uri(annotation_root: &str, video_uri: &str) -> String {
    format!(
        "{}/{}/{}",
        annotation_root.trim_end_matches('/'),
        annotation_key(video_uri),
        REDUCED_VIDEO_FILE
    )
}
