//! Live preview editing: select an element, apply a text/class edit, and
//! absorb the updated document — the full round trip over the preview
//! message boundary, headless.

use anyhow::{Result, anyhow};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, mpsc};
use weaver_application::{EditSession, MessageBridge};
use weaver_core::config::WeaverConfig;
use weaver_core::instrument::instrument;
use weaver_core::protocol::PressTarget;
use weaver_core::selection::EditPatch;
use weaver_core::session::SessionRepository;
use weaver_infrastructure::TomlSessionRepository;

const POLL_INTERVAL: Duration = Duration::from_millis(20);
const POLL_ATTEMPTS: usize = 100;

pub async fn edit(
    config: &WeaverConfig,
    project_id: &str,
    select: &str,
    nth: usize,
    text: Option<String>,
    classes: Option<String>,
) -> Result<()> {
    let repository = Arc::new(TomlSessionRepository::new(&config.storage_dir)?);
    let session = repository
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| anyhow!("project not found: {project_id}"))?;

    let state = Arc::new(RwLock::new(EditSession::new(session)));

    // Wire the isolated preview to the host bridge.
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let sandbox = weaver_sandbox::spawn(events_tx);
    let bridge = MessageBridge::spawn(
        state.clone(),
        repository.clone(),
        sandbox.sender(),
        events_rx,
    );

    sandbox.render(instrument(state.read().await.document()))?;
    sandbox.press(PressTarget {
        tag: select.to_string(),
        nth,
    })?;

    let selection = poll(|| {
        let state = state.clone();
        async move { state.read().await.selection().cloned() }
    })
    .await
    .map_err(|_| anyhow!("no <{select}> element at index {nth}"))?;

    println!(
        "Selected <{}> id={} text={:?} classes={:?}",
        selection.tag_name, selection.identity, selection.text, selection.classes
    );

    if text.is_none() && classes.is_none() {
        bridge.shutdown();
        return Ok(());
    }

    let before = state.read().await.document().to_string();
    bridge
        .send_update(&selection.identity, EditPatch { text, classes })
        .await?;

    // Wait for the document-changed confirmation to come back around.
    poll(|| {
        let state = state.clone();
        let before = before.clone();
        async move {
            let guard = state.read().await;
            (guard.document() != before).then_some(())
        }
    })
    .await
    .map_err(|_| anyhow!("preview never confirmed the edit"))?;

    let guard = state.read().await;
    let status = if guard.session().synced {
        "saved"
    } else {
        "unsynced"
    };
    println!("Edit applied [{status}]");

    bridge.shutdown();
    Ok(())
}

/// Polls a condition until it yields a value or the attempts run out.
async fn poll<F, Fut, T>(mut condition: F) -> Result<T, ()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    for _ in 0..POLL_ATTEMPTS {
        if let Some(value) = condition().await {
            return Ok(value);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
    Err(())
}
