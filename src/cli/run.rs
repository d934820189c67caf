use crate::cli::RunArgs;
use crate::config::{Config, PersonaSet};
use crate::error::ConfigError;
use crate::document::{DocumentSurface, TextDocument};
use crate::output::write_session_report;
use crate::provider::create_provider;
use crate::runner::{
    build_review_prompt, Orchestrator, ReviewOptions, RunMode, RunSession, RunStatus,
    TracingObserver,
};
use chrono::Local;
use std::sync::Arc;
use tracing::{error, info, warn};

pub async fn execute(args: RunArgs) -> anyhow::Result<()> {
    info!("Loading config from {:?}", args.config);
    let mut config = Config::load_or_default(&args.config)?;

    // Apply CLI overrides
    if let Some(set) = args.set.clone() {
        config.persona_set = set;
    }
    if let Some(kind) = args.provider {
        config.provider.kind = kind;
    }
    if let Some(model) = args.model.clone() {
        config.provider.model = Some(model);
    }
    if let Some(timeout_sec) = args.timeout_sec {
        config.timeout_sec = timeout_sec;
    }
    if let Some(report_dir) = args.report_dir.clone() {
        config.report_dir = report_dir;
    }

    config.validate()?;

    let mut set = config.active_set()?;
    if let Some(filter) = &args.personas {
        for id in filter {
            if !set.personas.iter().any(|p| &p.id == id) {
                warn!("Persona '{}' is not in set '{}'", id, set.id);
            }
        }
        for persona in &mut set.personas {
            persona.enabled = filter.contains(&persona.id);
        }
        if set.enabled().next().is_none() {
            return Err(ConfigError::NoPersonasEnabled(set.id).into());
        }
    }

    let document = Arc::new(TextDocument::from_path(&args.document)?);
    let document_name = args
        .document
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string();

    if args.dry_run {
        info!("DRY RUN - no provider calls will be made");
        print_execution_plan(&config, &set, &document_name, document.text());
        return Ok(());
    }

    let provider = create_provider(&config.provider)?;
    let text = document.full_text().await?;
    let orchestrator = Orchestrator::new(
        provider,
        document.clone(),
        ReviewOptions::from_config(&config),
    );
    let observer = TracingObserver;

    let mut session = orchestrator
        .run(&set.personas, &text, RunMode::All, &observer)
        .await?;

    for pass in 1..=args.retry_failed {
        let failed = session.count(RunStatus::Error);
        if failed == 0 {
            break;
        }
        info!("Retry pass {}: rerunning {} failed personas", pass, failed);
        session = orchestrator
            .run(&set.personas, &text, RunMode::RetryFailed, &observer)
            .await?;
    }

    // Dated report directory (reports/YYYY-MM-DD/)
    let date_str = Local::now().format("%Y-%m-%d").to_string();
    let report_dir = config.report_dir.join(&date_str);
    let report_path =
        write_session_report(&report_dir, &document_name, &session, &document.comments())?;
    info!("Wrote report: {}", report_path.display());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        print_summary(&session);
    }

    let failed = session.count(RunStatus::Error);
    if failed > 0 {
        error!(
            "{} of {} personas failed; rerun with --retry-failed",
            failed,
            session.total_enabled()
        );
        std::process::exit(1);
    }

    Ok(())
}

fn print_summary(session: &RunSession) {
    println!();
    for result in session.results() {
        match (&result.feedback, &result.error_message) {
            (Some(feedback), _) => println!(
                "  {:<24} clarity {:>3}  tone {:>3}  alignment {:>3}  ({} anchored, {} unanchored)",
                result.persona_name,
                feedback.scores.clarity,
                feedback.scores.tone,
                feedback.scores.alignment,
                result.matched.as_ref().map_or(0, Vec::len),
                result.unmatched.as_ref().map_or(0, Vec::len),
            ),
            (None, Some(err)) => println!("  {:<24} error: {}", result.persona_name, err),
            (None, None) => println!("  {:<24} {}", result.persona_name, result.status()),
        }
    }
    println!();
}

fn print_execution_plan(config: &Config, set: &PersonaSet, document_name: &str, text: &str) {
    println!("\n=== Execution Plan ===\n");
    println!("Document: {} ({} chars)", document_name, text.chars().count());
    println!(
        "Provider: {} ({})",
        config.provider.kind,
        config.provider.model_or_default()
    );
    println!("Timeout: {}s", config.timeout_sec);
    println!("Persona set: {} ({})", set.name, set.id);

    if text.chars().count() > config.max_document_chars {
        println!(
            "Note: only the first {} chars are sent to the model",
            config.max_document_chars
        );
    }

    println!("\nPersonas to run:");
    for persona in set.enabled() {
        let prompt = build_review_prompt(persona, text, config.max_document_chars);
        println!(
            "  - {} [{}] -> prompt {} chars",
            persona.name,
            persona.id,
            prompt.chars().count()
        );
    }
    println!();
}
