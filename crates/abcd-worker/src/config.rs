//! Worker configuration.

use std::path::PathBuf;

use abcd_models::{parse_list, BrandContext, ResultOrder, Thresholds};

use crate::error::{WorkerError, WorkerResult};

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Maximum evaluation tasks in flight across all videos
    pub max_parallel_tasks: usize,
    /// Maximum videos assessed at once
    pub max_concurrent_videos: usize,
    /// Root directory of the per-video annotation exports
    pub annotation_root: PathBuf,
    /// Location of the trimmed opening clips sent to the model,
    /// e.g. `gs://bucket/annotations`. Unset sends the full video.
    pub reduced_video_root: Option<String>,
    /// Evaluate features from annotations
    pub use_annotations: bool,
    /// Evaluate features with the multimodal model
    pub use_llms: bool,
    /// Ordering of each video's results
    pub result_order: ResultOrder,
    /// Videos to assess
    pub video_uris: Vec<String>,
    /// Write assessments here instead of stdout
    pub assessment_file: Option<PathBuf>,
    pub thresholds: Thresholds,
    pub brand: BrandContext,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_parallel_tasks: 4,
            max_concurrent_videos: 2,
            annotation_root: PathBuf::from("annotations"),
            reduced_video_root: None,
            use_annotations: true,
            use_llms: true,
            result_order: ResultOrder::Id,
            video_uris: Vec::new(),
            assessment_file: None,
            thresholds: Thresholds::default(),
            brand: BrandContext::default(),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> WorkerResult<Self> {
        let result_order = match std::env::var("ABCD_RESULT_ORDER") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| WorkerError::config_error(format!("ABCD_RESULT_ORDER: {}", e)))?,
            Err(_) => ResultOrder::Id,
        };

        let thresholds = Thresholds::from_env().map_err(|e| WorkerError::config_error(e.to_string()))?;

        let config = Self {
            max_parallel_tasks: std::env::var("ABCD_MAX_PARALLEL_TASKS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(4),
            max_concurrent_videos: std::env::var("ABCD_MAX_CONCURRENT_VIDEOS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            annotation_root: std::env::var("ABCD_ANNOTATION_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("annotations")),
            reduced_video_root: std::env::var("ABCD_REDUCED_VIDEO_ROOT")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            use_annotations: env_flag("ABCD_USE_ANNOTATIONS", true),
            use_llms: env_flag("ABCD_USE_LLMS", true),
            result_order,
            video_uris: std::env::var("ABCD_VIDEO_URIS")
                .map(|raw| parse_list(&raw))
                .unwrap_or_default(),
            assessment_file: std::env::var("ABCD_ASSESSMENT_FILE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            thresholds,
            brand: BrandContext::from_env(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings no assessment could run with.
    pub fn validate(&self) -> WorkerResult<()> {
        if self.max_parallel_tasks == 0 {
            return Err(WorkerError::config_error("ABCD_MAX_PARALLEL_TASKS must be at least 1"));
        }
        if self.max_concurrent_videos == 0 {
            return Err(WorkerError::config_error("ABCD_MAX_CONCURRENT_VIDEOS must be at least 1"));
        }
        self.thresholds
            .validate()
            .map_err(|e| WorkerError::config_error(e.to_string()))?;
        if !self.use_annotations && !self.use_llms {
            return Err(WorkerError::config_error(
                "ABCD_USE_ANNOTATIONS and ABCD_USE_LLMS are both disabled",
            ));
        }
        Ok(())
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|s| parse_flag(&s))
        .unwrap_or(default)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
