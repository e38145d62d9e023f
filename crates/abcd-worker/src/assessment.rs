//! Video assessment service.
//!
//! Loads a video's annotations, resolves brand entities, plans the evaluation
//! tasks and hands them to the [`Scheduler`]. Several videos are assessed at
//! once, bounded by `max_concurrent_videos`.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::Instrument;

use abcd_annotations::{load_bundle, resolve_entities, AnnotationProvider, DetectorRegistry, EntityLookup};
use abcd_llm::{GenerationSettings, ModelEvaluator};
use abcd_models::{
    AnnotationBundle, AssessmentId, ResolvedEntities, VideoAssessment, FEATURE_CATALOGUE,
};

use crate::config::WorkerConfig;
use crate::error::WorkerResult;
use crate::logging::AssessmentLogger;
use crate::merge::MergePolicy;
use crate::metrics::record_assessment;
use crate::scheduler::Scheduler;
use crate::task::{plan_tasks, PlanOptions, TaskContext};

/// Assesses videos against the feature catalogue.
pub struct AssessmentService {
    config: Arc<WorkerConfig>,
    provider: Arc<dyn AnnotationProvider>,
    evaluator: Option<Arc<dyn ModelEvaluator>>,
    entity_lookup: Option<Arc<dyn EntityLookup>>,
    registry: Arc<DetectorRegistry>,
    scheduler: Scheduler,
    generation: GenerationSettings,
    policy: MergePolicy,
}

impl AssessmentService {
    /// Create a service, validating the configuration and the detector registry.
    pub fn new(config: WorkerConfig, provider: Arc<dyn AnnotationProvider>) -> WorkerResult<Self> {
        config.validate()?;

        let registry = DetectorRegistry::new();
        registry.validate(&FEATURE_CATALOGUE)?;

        Ok(Self {
            scheduler: Scheduler::new(config.max_parallel_tasks),
            config: Arc::new(config),
            provider,
            evaluator: None,
            entity_lookup: None,
            registry: Arc::new(registry),
            generation: GenerationSettings::default(),
            policy: MergePolicy::MonotonicOr,
        })
    }

    pub fn with_evaluator(mut self, evaluator: Arc<dyn ModelEvaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn with_entity_lookup(mut self, lookup: Arc<dyn EntityLookup>) -> Self {
        self.entity_lookup = Some(lookup);
        self
    }

    pub fn with_generation(mut self, generation: GenerationSettings) -> Self {
        self.generation = generation;
        self
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Assess every video, at most `max_concurrent_videos` at a time.
    ///
    /// Assessments come back in input order.
    pub async fn assess_videos(&self, video_uris: &[String]) -> Vec<VideoAssessment> {
        let permits = Arc::new(Semaphore::new(self.config.max_concurrent_videos));

        let futures = video_uris.iter().map(|uri| {
            let permits = Arc::clone(&permits);
            async move {
                let _permit = permits.acquire().await.ok();
                self.assess_video(uri).await
            }
        });

        join_all(futures).await
    }

    /// Assess one video.
    ///
    /// An annotation load failure fails this video only.
    pub async fn assess_video(&self, video_uri: &str) -> VideoAssessment {
        let id = AssessmentId::new();
        let logger = AssessmentLogger::new(&id, video_uri);
        let span = logger.create_span();

        let mut assessment = self.assess(video_uri, &logger).instrument(span).await;
        assessment.id = id;
        assessment
    }

    async fn assess(&self, video_uri: &str, logger: &AssessmentLogger) -> VideoAssessment {
        let started_at = Utc::now();
        let timer = Instant::now();
        let brand_name = self.config.brand.brand_name.clone();

        logger.log_start(&format!("brand \"{}\"", brand_name));

        let bundle = if self.config.use_annotations {
            match load_bundle(self.provider.as_ref(), video_uri).await {
                Ok(bundle) => bundle,
                Err(e) => {
                    logger.log_error(&format!("Failed to load annotations: {}", e));
                    record_assessment("failed", timer.elapsed().as_secs_f64() * 1000.0);
                    return VideoAssessment::failed(video_uri, brand_name, e.to_string(), started_at);
                }
            }
        } else {
            AnnotationBundle::default()
        };

        let entities = match (&self.entity_lookup, self.config.use_annotations) {
            (Some(lookup), true) => resolve_entities(lookup.as_ref(), &self.config.brand).await,
            _ => ResolvedEntities::default(),
        };

        let tasks = plan_tasks(
            &FEATURE_CATALOGUE,
            PlanOptions {
                video_uri,
                reduced_video_root: self.config.reduced_video_root.as_deref(),
                use_annotations: self.config.use_annotations,
                use_llms: self.config.use_llms,
            },
        );
        logger.log_progress(&format!("{} evaluation tasks planned", tasks.len()));

        let ctx = Arc::new(TaskContext {
            bundle,
            thresholds: self.config.thresholds,
            brand: self.config.brand.clone(),
            entities,
            generation: self.generation.clone(),
            registry: Arc::clone(&self.registry),
            evaluator: self.evaluator.clone(),
            policy: self.policy,
        });

        let results = self.scheduler.run(tasks, ctx, self.config.result_order).await;

        let errors = results.iter().filter(|r| r.is_error()).count();
        if errors > 0 {
            logger.log_warning(&format!("{} features could not be evaluated", errors));
        }

        let assessment = VideoAssessment::completed(video_uri, brand_name, results, started_at);
        record_assessment("completed", timer.elapsed().as_secs_f64() * 1000.0);
        logger.log_completion(&format!(
            "{} of {} features detected",
            assessment.detected().count(),
            assessment.results.len()
        ));
        assessment
    }
}
