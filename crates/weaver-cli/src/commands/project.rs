//! Project lifecycle commands: create, list, chat, export, import.

use anyhow::{Context, Result, anyhow};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use weaver_application::{EditSession, GenerationOrchestrator, SubmitOutcome};
use weaver_core::config::WeaverConfig;
use weaver_core::session::{Session, SessionRepository};
use weaver_core::user::UserService;
use weaver_infrastructure::{
    TomlSessionRepository, TomlUserStore, all_templates, export_document, import_document,
};
use weaver_interaction::GeminiGenerator;

fn repository(config: &WeaverConfig) -> Result<Arc<TomlSessionRepository>> {
    Ok(Arc::new(TomlSessionRepository::new(&config.storage_dir)?))
}

fn orchestrator(
    config: &WeaverConfig,
    repository: Arc<TomlSessionRepository>,
    session: Session,
) -> GenerationOrchestrator {
    GenerationOrchestrator::new(
        Arc::new(RwLock::new(EditSession::new(session))),
        Arc::new(GeminiGenerator::new(config)),
        repository,
    )
}

async fn load_session(
    repository: &TomlSessionRepository,
    project_id: &str,
) -> Result<Session> {
    repository
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| anyhow!("project not found: {project_id}"))
}

pub async fn new_project(config: &WeaverConfig, prompt: &str) -> Result<()> {
    if prompt.trim().is_empty() {
        return Err(anyhow!("prompt must not be empty"));
    }

    let users = TomlUserStore::new(&config.storage_dir)?;
    if users.current_user().await?.is_none() {
        println!("Sign in first: weaver login <email>");
        return Ok(());
    }

    let repository = repository(config)?;
    let session = Session::new(prompt);
    repository.save(&session).await?;
    repository.set_active_session_id(&session.id).await?;
    println!("Created project '{}' ({})", session.name, session.id);

    let orchestrator = orchestrator(config, repository.clone(), session);
    match orchestrator.materialize_initial().await {
        SubmitOutcome::Completed => println!("Initial design generated."),
        SubmitOutcome::Failed => println!("Generation failed; the project keeps its placeholder."),
        SubmitOutcome::Rejected => {}
    }

    Ok(())
}

pub async fn list(config: &WeaverConfig) -> Result<()> {
    let repository = repository(config)?;
    let sessions = repository.list_all().await?;

    if sessions.is_empty() {
        println!("No projects yet. Create one: weaver new \"<prompt>\"");
    } else {
        println!("Projects:");
        for session in &sessions {
            let status = if session.synced { "saved" } else { "unsynced" };
            println!("  {}  {}  [{}]", session.id, session.name, status);
        }
    }

    println!("Templates:");
    for template in all_templates() {
        println!("  {}  {}", template.id, template.name);
    }

    Ok(())
}

pub async fn chat(config: &WeaverConfig, project_id: &str, instruction: &str) -> Result<()> {
    let repository = repository(config)?;
    let session = load_session(&repository, project_id).await?;
    let orchestrator = orchestrator(config, repository.clone(), session);

    // A freshly created project may still be waiting on its first
    // design.
    if orchestrator.materialize_initial().await == SubmitOutcome::Completed {
        println!("Initial design generated.");
    }

    let state = orchestrator.state();
    match orchestrator.submit(instruction).await {
        SubmitOutcome::Rejected => println!("Nothing to do."),
        _ => {
            let guard = state.read().await;
            if let Some(turn) = guard.session().history.last() {
                println!("{}", turn.text);
            }
        }
    }

    Ok(())
}

pub async fn export(config: &WeaverConfig, project_id: &str, out: &Path) -> Result<()> {
    let repository = repository(config)?;
    let session = load_session(&repository, project_id).await?;

    let path = export_document(&session, out).context("failed to export document")?;
    println!("Exported to {}", path.display());
    Ok(())
}

pub async fn import(config: &WeaverConfig, project_id: &str, file: &Path) -> Result<()> {
    let repository = repository(config)?;
    let session = load_session(&repository, project_id).await?;

    let markup = import_document(file).context("failed to read import file")?;
    let orchestrator = orchestrator(config, repository.clone(), session);
    if orchestrator.import_document(markup).await {
        println!("Imported {} into '{}'", file.display(), project_id);
    } else {
        println!("Imported, but saving failed; the project is unsynced.");
    }
    Ok(())
}
