//! Annotation providers.
//!
//! A provider returns the annotations of one kind for a video. Bundles are
//! assembled by fetching every kind concurrently and merging the slices.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::RwLock;
use tracing::{debug, info};

use abcd_models::{annotation_key, AnnotationBundle, AnnotationExport, AnnotationKind};

use crate::error::{AnnotationError, AnnotationResult};

/// Source of video annotations.
#[async_trait]
pub trait AnnotationProvider: Send + Sync {
    /// Annotations of `kind` for `video_uri`.
    ///
    /// The returned bundle carries only `kind`; it is left absent when the
    /// provider has no such annotations for the video.
    async fn get_annotations(
        &self,
        video_uri: &str,
        kind: AnnotationKind,
    ) -> AnnotationResult<AnnotationBundle>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

/// Fetch every annotation kind concurrently and merge them.
///
/// The first failing kind fails the whole bundle.
pub async fn load_bundle(
    provider: &dyn AnnotationProvider,
    video_uri: &str,
) -> AnnotationResult<AnnotationBundle> {
    let fetches = AnnotationKind::ALL
        .iter()
        .map(|kind| provider.get_annotations(video_uri, *kind));
    let results = join_all(fetches).await;

    let mut bundle = AnnotationBundle::default();
    for result in results {
        bundle.merge(result?);
    }

    info!(
        video_uri = %video_uri,
        provider = %provider.name(),
        kinds = ?bundle.kinds(),
        "Annotation bundle loaded"
    );
    Ok(bundle)
}

/// Reads video-intelligence exports from a local directory tree.
///
/// Layout: `{root}/{annotation key}/{kind}-detection.json`.
#[derive(Debug, Clone)]
pub struct LocalAnnotationProvider {
    root: PathBuf,
}

impl LocalAnnotationProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the export for one kind of one video.
    pub fn export_path(&self, video_uri: &str, kind: AnnotationKind) -> PathBuf {
        self.root.join(annotation_key(video_uri)).join(kind.file_name())
    }
}

#[async_trait]
impl AnnotationProvider for LocalAnnotationProvider {
    async fn get_annotations(
        &self,
        video_uri: &str,
        kind: AnnotationKind,
    ) -> AnnotationResult<AnnotationBundle> {
        let path = self.export_path(video_uri, kind);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), kind = %kind, "No annotation export found");
                return Ok(AnnotationBundle::default());
            }
            Err(e) => {
                return Err(AnnotationError::fetch_failed(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let export: AnnotationExport = serde_json::from_slice(&bytes).map_err(|e| {
            AnnotationError::invalid_export(format!("{}: {}", path.display(), e))
        })?;

        Ok(export
            .into_first()
            .map(|bundle| bundle.retain_kind(kind))
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "local"
    }
}

/// Holds bundles in memory, keyed by video URI.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAnnotationProvider {
    bundles: Arc<RwLock<HashMap<String, AnnotationBundle>>>,
}

impl InMemoryAnnotationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, video_uri: impl Into<String>, bundle: AnnotationBundle) {
        self.bundles.write().await.insert(video_uri.into(), bundle);
    }
}

#[async_trait]
impl AnnotationProvider for InMemoryAnnotationProvider {
    async fn get_annotations(
        &self,
        video_uri: &str,
        kind: AnnotationKind,
    ) -> AnnotationResult<AnnotationBundle> {
        let bundles = self.bundles.read().await;
        let bundle = bundles
            .get(video_uri)
            .ok_or_else(|| AnnotationError::fetch_failed(format!("no annotations for {}", video_uri)))?;
        Ok(bundle.clone().retain_kind(kind))
    }

    fn name(&self) -> &str {
        "in_memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const VIDEO: &str = "gs://ads-bucket/spots/pixel.mp4";

    async fn write_export(root: &Path, kind: AnnotationKind, body: &str) {
        let dir = root.join(annotation_key(VIDEO));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join(kind.file_name()), body).await.unwrap();
    }

    #[tokio::test]
    async fn test_local_provider_reads_kind() {
        let tmp = TempDir::new().unwrap();
        write_export(
            tmp.path(),
            AnnotationKind::Shot,
            r#"{"annotation_results": [{"shot_annotations": [{"end_time_offset": {"seconds": 2}}]}]}"#,
        )
        .await;

        let provider = LocalAnnotationProvider::new(tmp.path());
        let bundle = provider.get_annotations(VIDEO, AnnotationKind::Shot).await.unwrap();
        assert_eq!(bundle.shot_annotations.map(|s| s.len()), Some(1));

        let missing = provider.get_annotations(VIDEO, AnnotationKind::Face).await.unwrap();
        assert!(!missing.has(AnnotationKind::Face));
    }

    #[tokio::test]
    async fn test_local_provider_rejects_malformed_export() {
        let tmp = TempDir::new().unwrap();
        write_export(tmp.path(), AnnotationKind::Text, "{ not json").await;

        let provider = LocalAnnotationProvider::new(tmp.path());
        let err = provider.get_annotations(VIDEO, AnnotationKind::Text).await.unwrap_err();
        assert!(matches!(err, AnnotationError::InvalidExport(_)));
    }

    #[tokio::test]
    async fn test_load_bundle_merges_kinds() {
        let tmp = TempDir::new().unwrap();
        write_export(
            tmp.path(),
            AnnotationKind::Speech,
            r#"{"annotation_results": [{"speech_transcriptions": [{"alternatives": []}]}]}"#,
        )
        .await;
        write_export(
            tmp.path(),
            AnnotationKind::Label,
            r#"{"annotation_results": [{"segment_label_annotations": [], "shot_annotations": [{}]}]}"#,
        )
        .await;

        let provider = LocalAnnotationProvider::new(tmp.path());
        let bundle = load_bundle(&provider, VIDEO).await.unwrap();
        assert_eq!(bundle.kinds(), vec![AnnotationKind::Speech, AnnotationKind::Label]);
    }

    #[tokio::test]
    async fn test_in_memory_provider_unknown_video() {
        let provider = InMemoryAnnotationProvider::new();
        provider
            .insert(VIDEO, AnnotationBundle {
                text_annotations: Some(vec![]),
                ..Default::default()
            })
            .await;

        let bundle = load_bundle(&provider, VIDEO).await.unwrap();
        assert_eq!(bundle.kinds(), vec![AnnotationKind::Text]);
        assert!(load_bundle(&provider, "gs://other/video.mp4").await.is_err());
    }
}
