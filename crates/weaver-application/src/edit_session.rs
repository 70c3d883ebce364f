//! Authoritative in-memory editing state.
//!
//! One `EditSession` per open project: the current document, the
//! currently selected element, and the generation-in-flight flag. Three
//! writers may replace the document (generation, preview edits, import);
//! all of them replace it wholesale and mark the session unsynced — the
//! last writer's document is authoritative, nothing merges.

use weaver_core::selection::{EditPatch, ElementSelection};
use weaver_core::session::{ChatTurn, Session};

/// The single authoritative holder of document + selection + sync state.
pub struct EditSession {
    session: Session,
    selection: Option<ElementSelection>,
    generating: bool,
}

impl EditSession {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            selection: None,
            generating: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn document(&self) -> &str {
        &self.session.document
    }

    pub fn selection(&self) -> Option<&ElementSelection> {
        self.selection.as_ref()
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Replaces the document wholesale (generation result or raw import)
    /// and marks the session unsynced.
    ///
    /// The current selection is cleared: its identity belonged to the
    /// replaced document and does not survive.
    pub fn replace_document(&mut self, document: String) {
        self.session.document = document;
        self.session.synced = false;
        self.selection = None;
    }

    /// Absorbs a document-changed event from the preview.
    ///
    /// Returns `true` when the document differed and was replaced (the
    /// session is then unsynced); an identical document is a no-op, which
    /// avoids redundant persistence writes. The selection survives: the
    /// changed document came from an edit to the selected node.
    pub fn absorb_preview_update(&mut self, document: String) -> bool {
        if self.session.document == document {
            return false;
        }
        self.session.document = document;
        self.session.synced = false;
        true
    }

    /// Replaces the current selection wholesale.
    pub fn select(&mut self, selection: ElementSelection) {
        self.selection = Some(selection);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Optimistically applies a partial edit to the local selection copy,
    /// so the properties surface reflects the edit before the
    /// authoritative document update arrives.
    pub fn apply_selection_patch(&mut self, patch: &EditPatch) {
        if let Some(selection) = self.selection.as_mut() {
            selection.apply(patch);
        }
    }

    /// Appends a chat turn. History is append-only.
    pub fn push_turn(&mut self, turn: ChatTurn) {
        self.session.history.push(turn);
    }

    /// Records that the stored copy now matches this state.
    pub fn mark_synced(&mut self) {
        self.session.synced = true;
    }

    /// Claims the single generation slot. Returns `false` when a
    /// generation is already outstanding; the caller must then refuse the
    /// submission rather than queue it.
    pub fn begin_generation(&mut self) -> bool {
        if self.generating {
            return false;
        }
        self.generating = true;
        true
    }

    /// Releases the generation slot, success or failure.
    pub fn finish_generation(&mut self) {
        self.generating = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(identity: &str) -> ElementSelection {
        ElementSelection {
            identity: identity.to_string(),
            tag_name: "h1".to_string(),
            text: "Hello".to_string(),
            classes: String::new(),
        }
    }

    #[test]
    fn test_replace_document_clears_selection_and_sync() {
        let mut state = EditSession::new(Session::new("bakery"));
        state.mark_synced();
        state.select(selection("sw-abcdefghi"));

        state.replace_document("<html><body>new</body></html>".to_string());

        assert!(!state.session().synced);
        assert!(state.selection().is_none());
        assert_eq!(state.document(), "<html><body>new</body></html>");
    }

    #[test]
    fn test_absorb_identical_document_is_noop() {
        let mut state = EditSession::new(Session::new("bakery"));
        state.replace_document("<html></html>".to_string());
        state.mark_synced();

        assert!(!state.absorb_preview_update("<html></html>".to_string()));
        assert!(state.session().synced);
    }

    #[test]
    fn test_absorb_differing_document_replaces_and_unsyncs() {
        let mut state = EditSession::new(Session::new("bakery"));
        state.replace_document("<html>a</html>".to_string());
        state.mark_synced();
        state.select(selection("sw-abcdefghi"));

        assert!(state.absorb_preview_update("<html>b</html>".to_string()));
        assert!(!state.session().synced);
        assert_eq!(state.document(), "<html>b</html>");
        // The edited node stays selected.
        assert!(state.selection().is_some());
    }

    #[test]
    fn test_selection_is_last_write_wins() {
        let mut state = EditSession::new(Session::new("bakery"));
        state.select(selection("sw-first0000"));
        state.select(selection("sw-second000"));

        assert_eq!(state.selection().unwrap().identity, "sw-second000");
    }

    #[test]
    fn test_generation_slot_is_exclusive() {
        let mut state = EditSession::new(Session::new("bakery"));

        assert!(state.begin_generation());
        assert!(!state.begin_generation());

        state.finish_generation();
        assert!(state.begin_generation());
    }

    #[test]
    fn test_apply_selection_patch_without_selection_is_noop() {
        let mut state = EditSession::new(Session::new("bakery"));
        state.apply_selection_patch(&EditPatch::text("X"));
        assert!(state.selection().is_none());
    }
}
