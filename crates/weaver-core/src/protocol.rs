//! Cross-context preview protocol.
//!
//! The host and the isolated preview document exchange state exclusively
//! through these JSON-shaped envelopes (`{type, payload}`). Messages
//! carry no sequence numbers; each one fully replaces the relevant state,
//! so last-write-wins is the only ordering rule.

use crate::selection::ElementSelection;
use serde::{Deserialize, Serialize};

/// Events emitted by the isolated preview document toward the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum PreviewEvent {
    /// A node was selected by a primary-button press inside the preview.
    #[serde(rename = "ELEMENT_SELECTED")]
    ElementSelected(ElementSelection),
    /// The preview document mutated itself; the payload is the full,
    /// marker-stripped serialization of the document root.
    #[serde(rename = "HTML_UPDATED")]
    HtmlUpdated(String),
}

/// Commands sent by the host into the isolated preview document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum PreviewCommand {
    /// Apply text and/or class changes to the node with the given
    /// identity. Unknown identities are dropped silently by the preview.
    #[serde(rename = "UPDATE_ELEMENT")]
    UpdateElement {
        identity: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        classes: Option<String>,
    },
}

/// A node locator used to model a pointer press inside the headless
/// sandbox: the `nth` element (in document order) with the given tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PressTarget {
    /// Tag name, matched case-insensitively.
    pub tag: String,
    /// Zero-based index among elements with that tag, in document order.
    #[serde(default)]
    pub nth: usize,
}

impl PressTarget {
    /// Targets the first element with the given tag.
    pub fn first(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            nth: 0,
        }
    }
}

/// Everything the sandbox actor can receive on its single mailbox.
///
/// `Render` models the host replacing the sandbox content with a freshly
/// instrumented document; `Press` models the user's primary-button press
/// inside the preview; `Command` is the host side of the wire protocol.
/// The mailbox is drained strictly in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum SandboxInput {
    Render(String),
    Press(PressTarget),
    Command(PreviewCommand),
}
