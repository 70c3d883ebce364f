//! Generation orchestrator.
//!
//! Turns a user instruction into a new document via the external model,
//! keeping chat history and document mutation atomic from the caller's
//! point of view. Failures from the generation collaborator never
//! propagate past this boundary; they become a fixed user-facing chat
//! turn and the document stays as it was.

use crate::edit_session::EditSession;
use std::sync::Arc;
use tokio::sync::RwLock;
use weaver_core::generate::DocumentGenerator;
use weaver_core::session::{ChatTurn, Session, SessionRepository};

/// Assistant turn appended after the automatic first generation.
pub const INITIAL_SUCCESS_MESSAGE: &str = "Here is your initial design!";

/// Assistant turn appended after a successful regeneration.
pub const UPDATE_SUCCESS_MESSAGE: &str = "Design updated successfully.";

/// Assistant turn appended when the generation collaborator fails.
pub const GENERATION_FAILURE_MESSAGE: &str =
    "Sorry, I encountered an error generating the design. Please try again.";

/// Assistant turn appended after a raw document import.
pub const IMPORT_SUCCESS_MESSAGE: &str =
    "Successfully imported your design code. You can now edit it with AI.";

/// What became of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Document replaced, history extended, session persisted.
    Completed,
    /// Generation failed; a failure turn was appended, document unchanged.
    Failed,
    /// Nothing happened: empty instruction, nothing pending, or a
    /// generation already in flight. Rejected submissions are not queued.
    Rejected,
}

/// Sequences prompt submission against the generation collaborator and
/// merges results into the edit session.
pub struct GenerationOrchestrator {
    state: Arc<RwLock<EditSession>>,
    generator: Arc<dyn DocumentGenerator>,
    repository: Arc<dyn SessionRepository>,
}

impl GenerationOrchestrator {
    pub fn new(
        state: Arc<RwLock<EditSession>>,
        generator: Arc<dyn DocumentGenerator>,
        repository: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            state,
            generator,
            repository,
        }
    }

    pub fn state(&self) -> Arc<RwLock<EditSession>> {
        self.state.clone()
    }

    /// Submits a user instruction for regeneration.
    ///
    /// An instruction that is empty after trimming is refused before any
    /// call is made, and at most one generation may be outstanding: a
    /// second submission while one is in flight is refused, never queued.
    pub async fn submit(&self, instruction: &str) -> SubmitOutcome {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return SubmitOutcome::Rejected;
        }

        // Claim the generation slot and snapshot the inputs in one
        // critical section.
        let (current_document, history) = {
            let mut guard = self.state.write().await;
            if !guard.begin_generation() {
                tracing::debug!("generation already in flight, submission refused");
                return SubmitOutcome::Rejected;
            }

            let history = guard.session().history.clone();
            let current_document = if guard.session().has_generated_document() {
                guard.session().document.clone()
            } else {
                String::new()
            };
            guard.push_turn(ChatTurn::user(instruction));

            (current_document, history)
        };

        let result = self
            .generator
            .generate(instruction, &current_document, &history)
            .await;

        match result {
            Ok(document) => {
                let snapshot = {
                    let mut guard = self.state.write().await;
                    guard.replace_document(document);
                    guard.push_turn(ChatTurn::assistant(UPDATE_SUCCESS_MESSAGE));
                    guard.finish_generation();
                    guard.session().clone()
                };
                self.persist(snapshot).await;
                SubmitOutcome::Completed
            }
            Err(e) => {
                tracing::warn!(error = %e, "generation failed");
                let mut guard = self.state.write().await;
                guard.push_turn(ChatTurn::assistant(GENERATION_FAILURE_MESSAGE));
                guard.finish_generation();
                SubmitOutcome::Failed
            }
        }
    }

    /// Runs the automatic first generation for a freshly created session.
    ///
    /// Fires exactly when the session still shows the placeholder
    /// document with its single pending prompt; any other state is
    /// refused without side effects.
    pub async fn materialize_initial(&self) -> SubmitOutcome {
        let prompt = {
            let mut guard = self.state.write().await;
            if !guard.session().needs_initial_generation() {
                return SubmitOutcome::Rejected;
            }
            if !guard.begin_generation() {
                return SubmitOutcome::Rejected;
            }
            guard.session().initial_prompt().map(str::to_string)
        };

        let Some(prompt) = prompt else {
            self.state.write().await.finish_generation();
            return SubmitOutcome::Rejected;
        };

        let result = self.generator.generate(&prompt, "", &[]).await;

        match result {
            Ok(document) => {
                let snapshot = {
                    let mut guard = self.state.write().await;
                    guard.replace_document(document);
                    guard.push_turn(ChatTurn::assistant(INITIAL_SUCCESS_MESSAGE));
                    guard.finish_generation();
                    guard.session().clone()
                };
                self.persist(snapshot).await;
                SubmitOutcome::Completed
            }
            Err(e) => {
                tracing::warn!(error = %e, "initial generation failed");
                let mut guard = self.state.write().await;
                guard.push_turn(ChatTurn::assistant(GENERATION_FAILURE_MESSAGE));
                guard.finish_generation();
                SubmitOutcome::Failed
            }
        }
    }

    /// Replaces the document with user-supplied markup, accepted as-is.
    pub async fn import_document(&self, markup: String) -> bool {
        let snapshot = {
            let mut guard = self.state.write().await;
            guard.replace_document(markup);
            guard.push_turn(ChatTurn::assistant(IMPORT_SUCCESS_MESSAGE));
            guard.session().clone()
        };
        self.persist(snapshot).await
    }

    /// Persists the current state on demand.
    pub async fn save(&self) -> bool {
        let snapshot = self.state.read().await.session().clone();
        self.persist(snapshot).await
    }

    /// Best-effort save. Returns whether the session is now synced; a
    /// failed write leaves `synced=false` with no automatic retry and no
    /// escaping error.
    async fn persist(&self, snapshot: Session) -> bool {
        match self.repository.save(&snapshot).await {
            Ok(()) => {
                self.state.write().await.mark_synced();
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to persist session");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::Notify;
    use weaver_core::generate::GenerationError;
    use weaver_core::session::MessageRole;

    struct MockGenerator {
        output: Mutex<Result<String, String>>,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl MockGenerator {
        fn returning(document: &str) -> Self {
            Self {
                output: Mutex::new(Ok(document.to_string())),
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                output: Mutex::new(Err(message.to_string())),
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }

        fn gated(document: &str, gate: Arc<Notify>) -> Self {
            Self {
                output: Mutex::new(Ok(document.to_string())),
                calls: AtomicUsize::new(0),
                gate: Some(gate),
            }
        }
    }

    #[async_trait]
    impl DocumentGenerator for MockGenerator {
        async fn generate(
            &self,
            _instruction: &str,
            _current_document: &str,
            _history: &[ChatTurn],
        ) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match &*self.output.lock().unwrap() {
                Ok(document) => Ok(document.clone()),
                Err(message) => Err(GenerationError::Upstream(message.clone())),
            }
        }
    }

    struct MockRepository {
        saves: AtomicUsize,
        fail_saves: AtomicBool,
    }

    impl MockRepository {
        fn new() -> Self {
            Self {
                saves: AtomicUsize::new(0),
                fail_saves: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl SessionRepository for MockRepository {
        async fn find_by_id(&self, _session_id: &str) -> weaver_core::Result<Option<Session>> {
            Ok(None)
        }

        async fn save(&self, _session: &Session) -> weaver_core::Result<()> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(weaver_core::WeaverError::io("disk full"));
            }
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn delete(&self, _session_id: &str) -> weaver_core::Result<()> {
            Ok(())
        }

        async fn list_all(&self) -> weaver_core::Result<Vec<Session>> {
            Ok(Vec::new())
        }

        async fn get_active_session_id(&self) -> weaver_core::Result<Option<String>> {
            Ok(None)
        }

        async fn set_active_session_id(&self, _session_id: &str) -> weaver_core::Result<()> {
            Ok(())
        }
    }

    const GENERATED: &str = "<!DOCTYPE html><html><head></head><body><h1>Bakery</h1></body></html>";

    fn orchestrator(
        session: Session,
        generator: MockGenerator,
    ) -> (GenerationOrchestrator, Arc<MockRepository>) {
        let (orchestrator, repository, _generator) = orchestrator_with(session, generator);
        (orchestrator, repository)
    }

    fn orchestrator_with(
        session: Session,
        generator: MockGenerator,
    ) -> (GenerationOrchestrator, Arc<MockRepository>, Arc<MockGenerator>) {
        let repository = Arc::new(MockRepository::new());
        let generator = Arc::new(generator);
        let orchestrator = GenerationOrchestrator::new(
            Arc::new(RwLock::new(EditSession::new(session))),
            generator.clone(),
            repository.clone(),
        );
        (orchestrator, repository, generator)
    }

    #[tokio::test]
    async fn test_initial_generation_materializes_fresh_session() {
        let (orchestrator, repository) = orchestrator(
            Session::new("landing page for a bakery"),
            MockGenerator::returning(GENERATED),
        );

        let outcome = orchestrator.materialize_initial().await;
        assert_eq!(outcome, SubmitOutcome::Completed);

        let state = orchestrator.state();
        let guard = state.read().await;
        assert_eq!(guard.document(), GENERATED);
        assert_eq!(guard.session().history.len(), 2);
        assert_eq!(guard.session().history[1].role, MessageRole::Assistant);
        assert_eq!(guard.session().history[1].text, INITIAL_SUCCESS_MESSAGE);
        assert!(guard.session().synced);
        assert!(!guard.is_generating());
        assert_eq!(repository.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_initial_generation_fires_only_once() {
        let (orchestrator, _repository) = orchestrator(
            Session::new("bakery"),
            MockGenerator::returning(GENERATED),
        );

        assert_eq!(
            orchestrator.materialize_initial().await,
            SubmitOutcome::Completed
        );
        // Second attempt finds a materialized session and refuses.
        assert_eq!(
            orchestrator.materialize_initial().await,
            SubmitOutcome::Rejected
        );
    }

    #[tokio::test]
    async fn test_submit_appends_turns_and_persists() {
        let mut session = Session::new("bakery");
        session.document = GENERATED.to_string();
        session.history.push(ChatTurn::assistant(INITIAL_SUCCESS_MESSAGE));

        let (orchestrator, repository) = orchestrator(
            session,
            MockGenerator::returning("<!DOCTYPE html><html><body><h1>Warmer</h1></body></html>"),
        );

        let outcome = orchestrator.submit("make it warmer").await;
        assert_eq!(outcome, SubmitOutcome::Completed);

        let state = orchestrator.state();
        let guard = state.read().await;
        assert!(guard.document().contains("Warmer"));
        assert_eq!(guard.session().history.len(), 4);
        assert_eq!(guard.session().history[2].role, MessageRole::User);
        assert_eq!(guard.session().history[2].text, "make it warmer");
        assert_eq!(guard.session().history[3].text, UPDATE_SUCCESS_MESSAGE);
        assert!(guard.session().synced);
        assert_eq!(repository.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_submit_failure_appends_fixed_turn_and_keeps_document() {
        let mut session = Session::new("bakery");
        session.document = GENERATED.to_string();
        session.history.push(ChatTurn::assistant(INITIAL_SUCCESS_MESSAGE));

        let (orchestrator, repository) =
            orchestrator(session, MockGenerator::failing("upstream exploded"));

        let outcome = orchestrator.submit("make it warmer").await;
        assert_eq!(outcome, SubmitOutcome::Failed);

        let state = orchestrator.state();
        let guard = state.read().await;
        // Exactly one additional assistant turn, with the fixed text.
        assert_eq!(guard.session().history.len(), 4);
        assert_eq!(guard.session().history[3].role, MessageRole::Assistant);
        assert_eq!(guard.session().history[3].text, GENERATION_FAILURE_MESSAGE);
        // Document unchanged, nothing persisted, slot released.
        assert_eq!(guard.document(), GENERATED);
        assert_eq!(repository.saves.load(Ordering::SeqCst), 0);
        assert!(!guard.is_generating());
    }

    #[tokio::test]
    async fn test_empty_instruction_is_refused_before_any_call() {
        let (orchestrator, _repository) = orchestrator(
            Session::new("bakery"),
            MockGenerator::returning(GENERATED),
        );

        assert_eq!(orchestrator.submit("").await, SubmitOutcome::Rejected);
        assert_eq!(orchestrator.submit("   \n").await, SubmitOutcome::Rejected);

        let state = orchestrator.state();
        let guard = state.read().await;
        assert_eq!(guard.session().history.len(), 1);
    }

    #[tokio::test]
    async fn test_second_submission_in_flight_is_refused_not_queued() {
        let gate = Arc::new(Notify::new());

        let mut session = Session::new("bakery");
        session.document = GENERATED.to_string();
        session.history.push(ChatTurn::assistant(INITIAL_SUCCESS_MESSAGE));

        let (orchestrator, _repository, generator) =
            orchestrator_with(session, MockGenerator::gated(GENERATED, gate.clone()));
        let orchestrator = Arc::new(orchestrator);

        let first = tokio::spawn({
            let orchestrator = orchestrator.clone();
            async move { orchestrator.submit("first change").await }
        });

        // Let the first submission reach the generator.
        tokio::time::sleep(std::time::Duration::from_millis(30)).await;

        // A second request while the first is in flight is refused.
        assert_eq!(
            orchestrator.submit("second change").await,
            SubmitOutcome::Rejected
        );

        gate.notify_one();
        assert_eq!(first.await.unwrap(), SubmitOutcome::Completed);

        // Only the first submission ever reached the collaborator.
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);

        // With the slot released, a new submission may start.
        gate.notify_one();
        assert_eq!(
            orchestrator.submit("third change").await,
            SubmitOutcome::Completed
        );
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_save_failure_leaves_unsynced_without_error() {
        let mut session = Session::new("bakery");
        session.document = GENERATED.to_string();
        session.history.push(ChatTurn::assistant(INITIAL_SUCCESS_MESSAGE));

        let (orchestrator, repository) = orchestrator(
            session,
            MockGenerator::returning("<!DOCTYPE html><html><body>new</body></html>"),
        );
        repository.fail_saves.store(true, Ordering::SeqCst);

        let outcome = orchestrator.submit("change it").await;
        assert_eq!(outcome, SubmitOutcome::Completed);

        let state = orchestrator.state();
        let guard = state.read().await;
        assert!(!guard.session().synced);

        // Manual save succeeds once the repository recovers.
        drop(guard);
        repository.fail_saves.store(false, Ordering::SeqCst);
        assert!(orchestrator.save().await);
        assert!(state.read().await.session().synced);
    }

    #[tokio::test]
    async fn test_import_replaces_document_and_notes_it() {
        let (orchestrator, repository) = orchestrator(
            Session::new("bakery"),
            MockGenerator::returning(GENERATED),
        );

        assert!(
            orchestrator
                .import_document("<div>hand-written</div>".to_string())
                .await
        );

        let state = orchestrator.state();
        let guard = state.read().await;
        assert_eq!(guard.document(), "<div>hand-written</div>");
        assert_eq!(
            guard.session().history.last().unwrap().text,
            IMPORT_SUCCESS_MESSAGE
        );
        assert!(guard.session().synced);
        assert_eq!(repository.saves.load(Ordering::SeqCst), 1);
    }
}
