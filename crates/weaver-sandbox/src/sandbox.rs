//! The preview state machine.
//!
//! Implements the editing behavior of the instrumented document: press
//! to select (minting an identity when the node lacks one), apply update
//! commands addressed by identity, and report every self-mutation as a
//! full marker-stripped document.

use crate::dom::PreviewDom;
use weaver_core::instrument::{classes_with_marker, mint_identity, strip_marker};
use weaver_core::protocol::{PressTarget, PreviewCommand, PreviewEvent, SandboxInput};
use weaver_core::selection::{ElementSelection, MAX_SELECTION_TEXT, truncate_text};

/// The isolated preview document and its interaction behavior.
///
/// One instance per editing session. All methods are synchronous; the
/// actor wrapper in [`crate::actor`] feeds it inputs strictly in arrival
/// order.
#[derive(Default)]
pub struct PreviewSandbox {
    dom: Option<PreviewDom>,
}

impl PreviewSandbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatches one mailbox input, returning the event it produced, if
    /// any.
    pub fn handle(&mut self, input: SandboxInput) -> Option<PreviewEvent> {
        match input {
            SandboxInput::Render(document) => {
                self.render(&document);
                None
            }
            SandboxInput::Press(target) => self.primary_press(&target),
            SandboxInput::Command(command) => self.apply(command),
        }
    }

    /// Replaces the preview content with a freshly rendered document.
    ///
    /// Any previous selection marker state dies with the old tree; stale
    /// identities do not survive a full document replacement.
    pub fn render(&mut self, document: &str) {
        self.dom = Some(PreviewDom::parse(document));
    }

    /// Handles a primary-button press on the targeted node.
    ///
    /// Clears any previous selection marker, marks the new node, assigns
    /// it a stable identity iff it lacks one, and emits exactly one
    /// selection event. Presses that resolve no node emit nothing, and
    /// navigation never happens: the preview is for editing.
    pub fn primary_press(&mut self, target: &PressTarget) -> Option<PreviewEvent> {
        let dom = self.dom.as_mut()?;

        let node = match dom.find_by_tag(&target.tag, target.nth) {
            Some(node) => node,
            None => {
                tracing::debug!(tag = %target.tag, nth = target.nth, "press resolved no node");
                return None;
            }
        };

        for marked in dom.marked_nodes() {
            let classes = dom.attribute(marked, "class").unwrap_or_default();
            let stripped = strip_marker(&classes);
            if stripped.is_empty() {
                dom.remove_attribute(marked, "class");
            } else {
                dom.set_attribute(marked, "class", &stripped);
            }
        }

        let raw_classes = dom.attribute(node, "class").unwrap_or_default();
        dom.set_attribute(node, "class", &classes_with_marker(&raw_classes));

        // Never overwrite an existing identity.
        let identity = match dom.attribute(node, "id") {
            Some(id) if !id.is_empty() => id,
            _ => {
                let minted = mint_identity();
                dom.set_attribute(node, "id", &minted);
                minted
            }
        };

        let selection = ElementSelection {
            identity,
            tag_name: dom.tag_name(node).unwrap_or_default(),
            text: truncate_text(&dom.inner_text(node), MAX_SELECTION_TEXT),
            classes: strip_marker(&raw_classes),
        };

        Some(PreviewEvent::ElementSelected(selection))
    }

    /// Applies an update command from the host.
    ///
    /// An unknown identity performs no mutation and emits nothing; the
    /// host is responsible for not sending stale identities. A known
    /// identity applies the provided text and/or classes (the marker is
    /// re-appended so the edited node stays visibly selected) and emits
    /// one document-changed event.
    pub fn apply(&mut self, command: PreviewCommand) -> Option<PreviewEvent> {
        let dom = self.dom.as_mut()?;

        let PreviewCommand::UpdateElement {
            identity,
            text,
            classes,
        } = command;

        let node = match dom.find_by_identity(&identity) {
            Some(node) => node,
            None => {
                tracing::debug!(%identity, "update addressed unknown identity, dropped");
                return None;
            }
        };

        if let Some(text) = text {
            dom.set_text(node, &text);
        }
        if let Some(classes) = classes {
            dom.set_attribute(node, "class", &classes_with_marker(&classes));
        }

        Some(PreviewEvent::HtmlUpdated(dom.serialize_clean()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weaver_core::instrument::instrument;

    const DOC: &str = "<!DOCTYPE html><html><head><title>Bakery</title></head><body>\
        <h1 class=\"text-4xl\">Fresh Bread Daily</h1>\
        <p id=\"tagline\" class=\"muted\">Baked every morning</p>\
        <a href=\"/shop\">Shop</a>\
        </body></html>";

    fn rendered_sandbox() -> PreviewSandbox {
        let mut sandbox = PreviewSandbox::new();
        sandbox.render(&instrument(DOC));
        sandbox
    }

    fn selection(event: PreviewEvent) -> ElementSelection {
        match event {
            PreviewEvent::ElementSelected(selection) => selection,
            other => panic!("expected selection event, got {other:?}"),
        }
    }

    fn updated_html(event: PreviewEvent) -> String {
        match event {
            PreviewEvent::HtmlUpdated(html) => html,
            other => panic!("expected document-changed event, got {other:?}"),
        }
    }

    #[test]
    fn test_press_emits_one_selection_with_minted_identity() {
        let mut sandbox = rendered_sandbox();

        let event = sandbox.primary_press(&PressTarget::first("h1")).unwrap();
        let sel = selection(event);

        assert!(sel.identity.starts_with("sw-"));
        assert_eq!(sel.identity.len(), 12);
        assert!(
            sel.identity[3..]
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
        assert_eq!(sel.tag_name, "h1");
        assert_eq!(sel.text, "Fresh Bread Daily");
        assert_eq!(sel.classes, "text-4xl");
    }

    #[test]
    fn test_repeat_press_reuses_identity() {
        let mut sandbox = rendered_sandbox();

        let first = selection(sandbox.primary_press(&PressTarget::first("h1")).unwrap());
        let second = selection(sandbox.primary_press(&PressTarget::first("h1")).unwrap());

        assert_eq!(first.identity, second.identity);
    }

    #[test]
    fn test_press_preserves_existing_identity() {
        let mut sandbox = rendered_sandbox();

        let sel = selection(sandbox.primary_press(&PressTarget::first("p")).unwrap());
        assert_eq!(sel.identity, "tagline");
        assert_eq!(sel.classes, "muted");
    }

    #[test]
    fn test_press_moves_marker_between_nodes() {
        let mut sandbox = rendered_sandbox();

        sandbox.primary_press(&PressTarget::first("h1")).unwrap();
        sandbox.primary_press(&PressTarget::first("p")).unwrap();

        // Only the latest target carries the marker in the live tree.
        let live = sandbox.dom.as_ref().unwrap();
        let h1 = live.find_by_tag("h1", 0).unwrap();
        let p = live.find_by_tag("p", 0).unwrap();
        assert_eq!(live.attribute(h1, "class").as_deref(), Some("text-4xl"));
        assert_eq!(
            live.attribute(p, "class").as_deref(),
            Some("muted sw-highlight")
        );
    }

    #[test]
    fn test_update_round_trip_applies_text() {
        let mut sandbox = rendered_sandbox();

        let sel = selection(sandbox.primary_press(&PressTarget::first("h1")).unwrap());
        let event = sandbox
            .apply(PreviewCommand::UpdateElement {
                identity: sel.identity.clone(),
                text: Some("X".to_string()),
                classes: None,
            })
            .unwrap();

        let html = updated_html(event);
        // The returned document's node at that identity contains "X".
        let dom = PreviewDom::parse(&html);
        let node = dom.find_by_identity(&sel.identity).unwrap();
        assert_eq!(dom.inner_text(node), "X");
    }

    #[test]
    fn test_update_classes_keeps_node_marked_live() {
        let mut sandbox = rendered_sandbox();

        let sel = selection(sandbox.primary_press(&PressTarget::first("h1")).unwrap());
        let event = sandbox
            .apply(PreviewCommand::UpdateElement {
                identity: sel.identity.clone(),
                text: None,
                classes: Some("text-5xl font-bold".to_string()),
            })
            .unwrap();

        // Outbound document carries the new classes without the marker.
        let html = updated_html(event);
        assert!(html.contains("text-5xl font-bold"));
        assert!(!html.contains("sw-highlight"));

        // The live document keeps the node visibly selected.
        let live = sandbox.dom.as_ref().unwrap();
        let node = live.find_by_identity(&sel.identity).unwrap();
        assert_eq!(
            live.attribute(node, "class").as_deref(),
            Some("text-5xl font-bold sw-highlight")
        );
    }

    #[test]
    fn test_unknown_identity_is_silent_noop() {
        let mut sandbox = rendered_sandbox();
        sandbox.primary_press(&PressTarget::first("h1")).unwrap();

        let result = sandbox.apply(PreviewCommand::UpdateElement {
            identity: "sw-zzzzzzzzz".to_string(),
            text: Some("never applied".to_string()),
            classes: None,
        });

        assert!(result.is_none());
        // Nothing mutated.
        let live = sandbox.dom.as_ref().unwrap();
        assert!(!live.serialize_clean().contains("never applied"));
    }

    #[test]
    fn test_updated_document_excludes_agent_block() {
        let mut sandbox = rendered_sandbox();

        let sel = selection(sandbox.primary_press(&PressTarget::first("h1")).unwrap());
        let html = updated_html(
            sandbox
                .apply(PreviewCommand::UpdateElement {
                    identity: sel.identity,
                    text: Some("Hi".to_string()),
                    classes: None,
                })
                .unwrap(),
        );

        assert!(!html.contains("data-sw-agent"));
        // Re-instrumenting the returned document yields exactly one block.
        let reinstrumented = instrument(&html);
        assert_eq!(reinstrumented.matches("<script data-sw-agent").count(), 1);
    }

    #[test]
    fn test_render_replacement_drops_stale_identities() {
        let mut sandbox = rendered_sandbox();

        let sel = selection(sandbox.primary_press(&PressTarget::first("h1")).unwrap());

        // Host regenerates and re-renders a different document.
        sandbox.render(&instrument(
            "<html><head></head><body><h2>New design</h2></body></html>",
        ));

        let result = sandbox.apply(PreviewCommand::UpdateElement {
            identity: sel.identity,
            text: Some("stale".to_string()),
            classes: None,
        });
        assert!(result.is_none());
    }

    #[test]
    fn test_press_before_render_emits_nothing() {
        let mut sandbox = PreviewSandbox::new();
        assert!(sandbox.primary_press(&PressTarget::first("h1")).is_none());
    }

    #[test]
    fn test_handle_dispatches_inputs_in_order() {
        let mut sandbox = PreviewSandbox::new();

        assert!(
            sandbox
                .handle(SandboxInput::Render(instrument(DOC)))
                .is_none()
        );
        let event = sandbox
            .handle(SandboxInput::Press(PressTarget::first("h1")))
            .unwrap();
        let sel = selection(event);
        let event = sandbox
            .handle(SandboxInput::Command(PreviewCommand::UpdateElement {
                identity: sel.identity,
                text: Some("Hello".to_string()),
                classes: None,
            }))
            .unwrap();
        assert!(updated_html(event).contains("Hello"));
    }
}
