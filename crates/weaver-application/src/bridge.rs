//! Host side of the preview message boundary.
//!
//! The bridge is the only path by which the host and the isolated preview
//! document exchange state: inbound selection and document-changed events
//! become `EditSession` mutations, outbound edits become update commands.
//! It subscribes for the lifetime of the editing session and is torn down
//! with it — no leaked listeners across sessions.

use crate::edit_session::EditSession;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use weaver_core::error::{Result, WeaverError};
use weaver_core::protocol::{PreviewCommand, PreviewEvent, SandboxInput};
use weaver_core::selection::EditPatch;
use weaver_core::session::SessionRepository;

/// Dispatches preview events into the edit session and carries edit
/// commands back out.
///
/// Messages carry no sequence numbers; the bridge relies on
/// last-write-wins semantics. Selections replace the previous selection
/// wholesale, and every document-changed event is an unconditional
/// whole-document replace, so a confirmation arriving after further
/// local edits is still safe.
pub struct MessageBridge {
    state: Arc<RwLock<EditSession>>,
    commands: mpsc::UnboundedSender<SandboxInput>,
    listener: JoinHandle<()>,
}

impl MessageBridge {
    /// Subscribes to the preview's outbound events and returns the
    /// bridge. The listener runs until the event stream closes or the
    /// bridge is shut down.
    pub fn spawn(
        state: Arc<RwLock<EditSession>>,
        repository: Arc<dyn SessionRepository>,
        commands: mpsc::UnboundedSender<SandboxInput>,
        mut events: mpsc::UnboundedReceiver<PreviewEvent>,
    ) -> Self {
        let listener = tokio::spawn({
            let state = state.clone();
            async move {
                while let Some(event) = events.recv().await {
                    Self::handle_event(&state, repository.as_ref(), event).await;
                }
                tracing::debug!("preview event stream ended");
            }
        });

        Self {
            state,
            commands,
            listener,
        }
    }

    async fn handle_event(
        state: &Arc<RwLock<EditSession>>,
        repository: &dyn SessionRepository,
        event: PreviewEvent,
    ) {
        match event {
            PreviewEvent::ElementSelected(selection) => {
                // Wholesale replace: a rapid second click simply
                // supersedes the first.
                state.write().await.select(selection);
            }
            PreviewEvent::HtmlUpdated(document) => {
                let snapshot = {
                    let mut guard = state.write().await;
                    if !guard.absorb_preview_update(document) {
                        return;
                    }
                    guard.session().clone()
                };

                // Best-effort persistence; a failure just leaves the
                // session unsynced.
                match repository.save(&snapshot).await {
                    Ok(()) => state.write().await.mark_synced(),
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to persist preview edit");
                    }
                }
            }
        }
    }

    /// Sends an edit for the node with the given identity.
    ///
    /// Fire-and-forget: no acknowledgement, no retry. The patch is
    /// optimistically applied to the local selection copy first, so the
    /// properties surface reflects the edit immediately even though the
    /// authoritative document update arrives asynchronously.
    pub async fn send_update(&self, identity: &str, patch: EditPatch) -> Result<()> {
        self.state.write().await.apply_selection_patch(&patch);

        self.commands
            .send(SandboxInput::Command(PreviewCommand::UpdateElement {
                identity: identity.to_string(),
                text: patch.text,
                classes: patch.classes,
            }))
            .map_err(|_| WeaverError::bridge("preview sandbox is gone"))
    }

    /// Tears the bridge down, unsubscribing the event listener.
    pub fn shutdown(&self) {
        self.listener.abort();
    }
}

impl Drop for MessageBridge {
    fn drop(&mut self) {
        self.listener.abort();
    }
}
