//! Element selection state.
//!
//! An [`ElementSelection`] is the host's view of the node currently
//! targeted inside the preview sandbox. It is created from a selection
//! event, cleared on deselect or whenever a new document replaces the
//! sandbox content (stale identities do not survive a full replacement).

use serde::{Deserialize, Serialize};

/// Longest element text carried in a selection event. Bounds message size
/// for text-heavy nodes.
pub const MAX_SELECTION_TEXT: usize = 50;

/// The currently targeted node inside the preview document.
///
/// `identity` is a stable handle: either the node's pre-existing
/// identifier or one freshly minted and written back into the document at
/// the moment of selection, so re-selecting later resolves the same node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSelection {
    /// Stable per-node handle (`id` attribute in the document).
    pub identity: String,
    /// Lowercase tag name of the node.
    pub tag_name: String,
    /// Node text, truncated to [`MAX_SELECTION_TEXT`] characters.
    #[serde(default)]
    pub text: String,
    /// The node's class attribute with the selection marker stripped out.
    #[serde(default)]
    pub classes: String,
}

impl ElementSelection {
    /// Applies a partial edit to this local copy.
    ///
    /// Used for the optimistic host-side update: the properties surface
    /// reflects the edit immediately, while the authoritative document
    /// update arrives asynchronously from the sandbox.
    pub fn apply(&mut self, patch: &EditPatch) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(classes) = &patch.classes {
            self.classes = classes.clone();
        }
    }
}

/// A partial edit to the selected element: either field may be absent,
/// meaning "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<String>,
}

impl EditPatch {
    /// A patch changing only the element text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            classes: None,
        }
    }

    /// A patch changing only the element classes.
    pub fn classes(classes: impl Into<String>) -> Self {
        Self {
            text: None,
            classes: Some(classes.into()),
        }
    }
}

/// Truncates text to at most `max` characters on a char boundary.
pub fn truncate_text(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
