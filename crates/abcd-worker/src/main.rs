//! ABCD assessment worker binary.

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use abcd_annotations::{KnowledgeGraphClient, LocalAnnotationProvider};
use abcd_llm::GeminiEvaluator;
use abcd_worker::{AssessmentService, WorkerConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting abcd-worker");

    if let Err(e) = run().await {
        error!("Assessment run failed: {:#}", e);
        std::process::exit(1);
    }

    info!("Assessment run complete");
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let mut env_filter = EnvFilter::from_default_env();
    for directive in ["abcd=info", "hyper=warn", "reqwest=warn"] {
        if let Ok(directive) = directive.parse() {
            env_filter = env_filter.add_directive(directive);
        }
    }

    // Logs go to stderr; stdout carries the assessment JSON.
    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

async fn run() -> anyhow::Result<()> {
    let config = WorkerConfig::from_env().context("invalid configuration")?;
    info!("Worker config: {:?}", config);

    if config.video_uris.is_empty() {
        anyhow::bail!("ABCD_VIDEO_URIS is empty");
    }

    let provider = Arc::new(LocalAnnotationProvider::new(config.annotation_root.clone()));
    let mut service = AssessmentService::new(config, provider).context("failed to start assessment service")?;

    if service.config().use_llms {
        let evaluator = GeminiEvaluator::from_env().await.context("model evaluation is enabled")?;
        let generation = evaluator.config().generation.clone();
        service = service
            .with_evaluator(Arc::new(evaluator))
            .with_generation(generation);
    }

    if service.config().use_annotations {
        match KnowledgeGraphClient::from_env() {
            Some(client) => service = service.with_entity_lookup(Arc::new(client)),
            None => warn!("KG_API_KEY not set, brand matching uses plain terms only"),
        }
    }

    let assessments = service.assess_videos(&service.config().video_uris).await;
    let failed = assessments.iter().filter(|a| a.is_failed()).count();

    let json = serde_json::to_string_pretty(&assessments)?;
    match &service.config().assessment_file {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "Assessments written");
        }
        None => println!("{}", json),
    }

    if failed > 0 {
        warn!(failed, total = assessments.len(), "Some videos could not be assessed");
    }
    Ok(())
}
