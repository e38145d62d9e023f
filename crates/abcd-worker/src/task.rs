//! Evaluation tasks: planning and execution.
//!
//! A task owns a disjoint set of features for one video. Features sent to the
//! model are grouped by video segment so each segment costs one model call;
//! annotation-only features each get a task of their own.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use abcd_annotations::{DetectionInput, DetectorRegistry};
use abcd_llm::{EvaluationRequest, GenerationSettings, ModelEvaluator, VideoReference};
use abcd_models::{
    reduced_video_uri, AnnotationBundle, BrandContext, FeatureDefinition, FeatureEvaluationResult,
    FeatureId, ModelVerdict, ResolvedEntities, Thresholds, VideoSegment,
};

use crate::error::{WorkerError, WorkerResult};
use crate::merge::MergePolicy;
use crate::metrics::record_detection;
use crate::pipeline::{evaluate_feature, EvaluationStrategy};

/// Unit of scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskGroup {
    /// Every model-evaluated feature judged on this segment.
    Segment(VideoSegment),
    /// A single annotation-only feature.
    Feature(FeatureId),
}

impl fmt::Display for TaskGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskGroup::Segment(segment) => write!(f, "{}", segment),
            TaskGroup::Feature(id) => write!(f, "feature:{}", id),
        }
    }
}

/// A feature and the sources that judge it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedFeature {
    pub definition: FeatureDefinition,
    pub strategy: EvaluationStrategy,
}

/// Value object handed to a worker: what to evaluate and on which video.
#[derive(Debug, Clone)]
pub struct EvaluationTask {
    pub group: TaskGroup,
    pub video: VideoReference,
    pub features: Vec<PlannedFeature>,
}

impl EvaluationTask {
    pub fn feature_ids(&self) -> Vec<FeatureId> {
        self.features.iter().map(|f| f.definition.id).collect()
    }

    /// One error result per feature of this task.
    pub fn error_results(&self, message: &str) -> Vec<FeatureEvaluationResult> {
        self.features
            .iter()
            .map(|f| FeatureEvaluationResult::error(&f.definition, message))
            .collect()
    }
}

/// Read-only snapshot shared by every task of one video.
pub struct TaskContext {
    pub bundle: AnnotationBundle,
    pub thresholds: Thresholds,
    pub brand: BrandContext,
    pub entities: ResolvedEntities,
    pub generation: GenerationSettings,
    pub registry: Arc<DetectorRegistry>,
    pub evaluator: Option<Arc<dyn ModelEvaluator>>,
    pub policy: MergePolicy,
}

/// Inputs to task planning for one video.
#[derive(Debug, Clone, Copy)]
pub struct PlanOptions<'a> {
    pub video_uri: &'a str,
    pub reduced_video_root: Option<&'a str>,
    pub use_annotations: bool,
    pub use_llms: bool,
}

/// Split `catalogue` into evaluation tasks for one video.
///
/// Features with no enabled source are skipped with a warning.
pub fn plan_tasks(catalogue: &[FeatureDefinition], options: PlanOptions<'_>) -> Vec<EvaluationTask> {
    let mut tasks = Vec::new();
    let mut segments: BTreeMap<VideoSegment, Vec<PlannedFeature>> = BTreeMap::new();

    for definition in catalogue {
        let Some(strategy) =
            EvaluationStrategy::resolve(definition, options.use_annotations, options.use_llms)
        else {
            warn!(feature_id = %definition.id, "No enabled evaluation source, skipping feature");
            continue;
        };

        let planned = PlannedFeature {
            definition: *definition,
            strategy,
        };

        if strategy.uses_llm() {
            segments.entry(definition.video_segment).or_default().push(planned);
        } else {
            tasks.push(EvaluationTask {
                group: TaskGroup::Feature(definition.id),
                video: VideoReference {
                    uri: options.video_uri.to_string(),
                    segment: definition.video_segment,
                },
                features: vec![planned],
            });
        }
    }

    for (segment, features) in segments {
        let uri = match (segment, options.reduced_video_root) {
            (VideoSegment::First5SecsVideo, Some(root)) => reduced_video_uri(root, options.video_uri),
            _ => options.video_uri.to_string(),
        };
        tasks.push(EvaluationTask {
            group: TaskGroup::Segment(segment),
            video: VideoReference { uri, segment },
            features,
        });
    }

    tasks
}

/// Evaluate every feature of `task`.
///
/// A model failure fails the whole task; the caller turns that into error
/// results for the task's features.
pub async fn run_task(task: &EvaluationTask, ctx: &TaskContext) -> WorkerResult<Vec<FeatureEvaluationResult>> {
    let annotation_ids: Vec<FeatureId> = task
        .features
        .iter()
        .filter(|f| f.strategy.uses_annotations())
        .map(|f| f.definition.id)
        .collect();

    let detections = if annotation_ids.is_empty() {
        HashMap::new()
    } else {
        let input = DetectionInput::new(&ctx.bundle, &ctx.thresholds, &ctx.brand, &ctx.entities);
        ctx.registry.detect(&annotation_ids, &input)
    };

    let model_features: Vec<FeatureDefinition> = task
        .features
        .iter()
        .filter(|f| f.strategy.uses_llm())
        .map(|f| f.definition)
        .collect();

    let verdicts = if model_features.is_empty() {
        HashMap::new()
    } else {
        let evaluator = ctx
            .evaluator
            .as_ref()
            .ok_or_else(|| WorkerError::config_error("no model evaluator configured"))?;

        let request = EvaluationRequest::new(model_features, task.video.clone(), ctx.brand.clone())
            .with_generation(ctx.generation.clone());
        let requested = request.feature_ids();
        index_verdicts(evaluator.evaluate(&request).await?, &requested)
    };

    let results: Vec<FeatureEvaluationResult> = task
        .features
        .iter()
        .map(|f| {
            let id = f.definition.id;
            evaluate_feature(
                &f.definition,
                f.strategy,
                detections.get(&id),
                verdicts.get(&id),
                ctx.policy,
            )
        })
        .collect();

    for result in &results {
        record_detection(result);
    }

    debug!(
        group = %task.group,
        features = results.len(),
        detected = results.iter().filter(|r| r.detected).count(),
        "Task complete"
    );
    Ok(results)
}

/// Key verdicts by feature id, keeping the first verdict per requested id.
fn index_verdicts(verdicts: Vec<ModelVerdict>, requested: &[FeatureId]) -> HashMap<FeatureId, ModelVerdict> {
    let mut indexed = HashMap::with_capacity(verdicts.len());

    for verdict in verdicts {
        match verdict.id.trim().parse::<FeatureId>() {
            Ok(id) if requested.contains(&id) => {
                indexed.entry(id).or_insert(verdict);
            }
            Ok(id) => warn!(feature_id = %id, "Model answered a feature it was not asked about"),
            Err(_) => warn!(verdict_id = %verdict.id, "Model returned an unknown feature id"),
        }
    }

    indexed
}
