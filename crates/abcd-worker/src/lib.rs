//! ABCD assessment worker.
//!
//! This crate provides:
//! - Environment-driven configuration
//! - The dual-source merge and single-feature evaluation pipeline
//! - Task planning and a bounded parallel scheduler
//! - The video assessment service

pub mod assessment;
pub mod config;
pub mod error;
pub mod logging;
pub mod merge;
pub mod metrics;
pub mod pipeline;
pub mod scheduler;
pub mod task;

pub use assessment::AssessmentService;
pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use logging::AssessmentLogger;
pub use merge::MergePolicy;
pub use pipeline::{evaluate_feature, EvaluationStrategy};
pub use scheduler::Scheduler;
pub use task::{plan_tasks, EvaluationTask, PlanOptions, TaskContext, TaskGroup};
