//! Bounded parallel task scheduler.
//!
//! Every task of a video is spawned at once and awaited together; a shared
//! semaphore caps how many run at the same time across all videos. A task
//! that fails or panics turns into error results for its own features only.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{error, info_span, warn, Instrument};

use abcd_models::{sort_results, FeatureEvaluationResult, ResultOrder};

use crate::error::WorkerError;
use crate::metrics::record_task;
use crate::task::{run_task, EvaluationTask, TaskContext};

/// Runs evaluation tasks with bounded parallelism.
#[derive(Debug, Clone)]
pub struct Scheduler {
    permits: Arc<Semaphore>,
}

impl Scheduler {
    pub fn new(max_parallel_tasks: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_parallel_tasks.max(1))),
        }
    }

    /// Run `tasks` against `ctx` and return every result, sorted by `order`.
    pub async fn run(
        &self,
        tasks: Vec<EvaluationTask>,
        ctx: Arc<TaskContext>,
        order: ResultOrder,
    ) -> Vec<FeatureEvaluationResult> {
        let mut submitted = Vec::with_capacity(tasks.len());

        for task in tasks {
            let permits = Arc::clone(&self.permits);
            let ctx = Arc::clone(&ctx);
            let span = info_span!("evaluation_task", group = %task.group, video_uri = %task.video.uri);
            let owned = task.clone();

            let handle = tokio::spawn(
                async move {
                    let _permit = permits
                        .acquire_owned()
                        .await
                        .map_err(|e| WorkerError::task_failed(format!("scheduler closed: {}", e)))?;
                    run_task(&owned, &ctx).await
                }
                .instrument(span),
            );
            submitted.push((task, handle));
        }

        let (tasks, handles): (Vec<_>, Vec<_>) = submitted.into_iter().unzip();
        let outcomes = join_all(handles).await;

        let mut results = Vec::new();
        for (task, outcome) in tasks.iter().zip(outcomes) {
            let group = task.group.to_string();
            match outcome {
                Ok(Ok(task_results)) => {
                    record_task(&group, true);
                    results.extend(task_results);
                }
                Ok(Err(e)) => {
                    warn!(
                        group = %group,
                        video_uri = %task.video.uri,
                        transient = e.is_transient(),
                        "Evaluation task failed: {}",
                        e
                    );
                    record_task(&group, false);
                    results.extend(task.error_results(&e.to_string()));
                }
                Err(join_error) => {
                    error!(
                        group = %group,
                        video_uri = %task.video.uri,
                        "Evaluation task panicked: {}",
                        join_error
                    );
                    record_task(&group, false);
                    results.extend(task.error_results(&format!("task panicked: {}", join_error)));
                }
            }
        }

        sort_results(&mut results, order);
        results
    }
}
