//! Element-level operations on the preview document.
//!
//! A thin mutation layer over `scraper`'s document tree. Attribute reads
//! go through the raw attribute map rather than the cached id/class
//! accessors, because the tree is mutated in place after parsing.

use ego_tree::NodeId;
use html5ever::tendril::StrTendril;
use html5ever::{LocalName, QualName, namespace_url, ns};
use scraper::{Html, Node};
use weaver_core::instrument::{AGENT_ATTR, MARKER_CLASS, strip_marker};

/// The parsed preview document.
pub struct PreviewDom {
    html: Html,
}

impl PreviewDom {
    /// Parses a full document.
    pub fn parse(document: &str) -> Self {
        Self {
            html: Html::parse_document(document),
        }
    }

    /// Finds the node whose `id` attribute equals `identity`.
    pub fn find_by_identity(&self, identity: &str) -> Option<NodeId> {
        self.html
            .tree
            .root()
            .descendants()
            .find(|node| {
                node.value()
                    .as_element()
                    .and_then(|el| el.attr("id"))
                    .is_some_and(|id| id == identity)
            })
            .map(|node| node.id())
    }

    /// Finds the `nth` element (document order) with the given tag.
    pub fn find_by_tag(&self, tag: &str, nth: usize) -> Option<NodeId> {
        self.html
            .tree
            .root()
            .descendants()
            .filter(|node| {
                node.value()
                    .as_element()
                    .is_some_and(|el| el.name().eq_ignore_ascii_case(tag))
            })
            .nth(nth)
            .map(|node| node.id())
    }

    /// Node ids of every element carrying the selection marker.
    pub fn marked_nodes(&self) -> Vec<NodeId> {
        self.html
            .tree
            .root()
            .descendants()
            .filter(|node| {
                node.value()
                    .as_element()
                    .and_then(|el| el.attr("class"))
                    .is_some_and(|classes| {
                        classes.split_whitespace().any(|token| token == MARKER_CLASS)
                    })
            })
            .map(|node| node.id())
            .collect()
    }

    /// Lowercase tag name of an element node.
    pub fn tag_name(&self, id: NodeId) -> Option<String> {
        self.html
            .tree
            .get(id)?
            .value()
            .as_element()
            .map(|el| el.name().to_ascii_lowercase())
    }

    /// Attribute value of an element node.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<String> {
        self.html
            .tree
            .get(id)?
            .value()
            .as_element()?
            .attr(name)
            .map(str::to_string)
    }

    /// Concatenated descendant text with whitespace collapsed. Script and
    /// style contents are skipped, matching rendered-text semantics.
    pub fn inner_text(&self, id: NodeId) -> String {
        let Some(node) = self.html.tree.get(id) else {
            return String::new();
        };
        let mut chunks: Vec<String> = Vec::new();
        for descendant in node.descendants() {
            if let Node::Text(text) = descendant.value() {
                let parent_tag = descendant
                    .parent()
                    .and_then(|p| p.value().as_element().map(|el| el.name().to_string()));
                if matches!(parent_tag.as_deref(), Some("script") | Some("style")) {
                    continue;
                }
                chunks.push(String::from(&*text.text));
            }
        }
        chunks
            .join(" ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Sets an attribute on an element node, replacing any previous
    /// value.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(mut node) = self.html.tree.get_mut(id)
            && let Node::Element(el) = node.value()
        {
            let key = QualName::new(None, ns!(), LocalName::from(name));
            el.attrs.insert(key, StrTendril::from(value));
        }
    }

    /// Removes an attribute from an element node.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(mut node) = self.html.tree.get_mut(id)
            && let Node::Element(el) = node.value()
        {
            let key = QualName::new(None, ns!(), LocalName::from(name));
            el.attrs.shift_remove(&key);
        }
    }

    /// Replaces an element's children with a single text node.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(mut node) = self.html.tree.get_mut(id) {
            while let Some(mut child) = node.first_child() {
                child.detach();
            }
            node.append(Node::Text(scraper::node::Text {
                text: StrTendril::from(text),
            }));
        }
    }

    /// Serializes the document root (outer HTML of the `<html>` element),
    /// with the selection marker stripped from every class attribute and
    /// the injected agent block removed.
    pub fn serialize_clean(&self) -> String {
        let mut clone = Self {
            html: self.html.clone(),
        };

        let ids: Vec<NodeId> = clone
            .html
            .tree
            .root()
            .descendants()
            .map(|node| node.id())
            .collect();

        for id in ids {
            let Some(node) = clone.html.tree.get(id) else {
                continue;
            };
            let Some(el) = node.value().as_element() else {
                continue;
            };

            if el.name().eq_ignore_ascii_case("script") && el.attr(AGENT_ATTR).is_some() {
                if let Some(mut agent) = clone.html.tree.get_mut(id) {
                    agent.detach();
                }
                continue;
            }

            if let Some(classes) = el.attr("class") {
                if classes.split_whitespace().any(|token| token == MARKER_CLASS) {
                    let stripped = strip_marker(classes);
                    if stripped.is_empty() {
                        clone.remove_attribute(id, "class");
                    } else {
                        clone.set_attribute(id, "class", &stripped);
                    }
                }
            }
        }

        clone.html.root_element().html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "<!DOCTYPE html><html><head><title>T</title></head><body>\
        <h1 class=\"hero\">Fresh   Bread</h1>\
        <p id=\"tagline\">Baked daily</p>\
        <p>Second paragraph</p>\
        </body></html>";

    #[test]
    fn test_find_by_tag_in_document_order() {
        let dom = PreviewDom::parse(DOC);
        let first = dom.find_by_tag("p", 0).unwrap();
        let second = dom.find_by_tag("p", 1).unwrap();

        assert_eq!(dom.attribute(first, "id").as_deref(), Some("tagline"));
        assert_eq!(dom.inner_text(second), "Second paragraph");
        assert!(dom.find_by_tag("p", 2).is_none());
        assert!(dom.find_by_tag("nav", 0).is_none());
    }

    #[test]
    fn test_find_by_identity() {
        let dom = PreviewDom::parse(DOC);
        let node = dom.find_by_identity("tagline").unwrap();
        assert_eq!(dom.tag_name(node).as_deref(), Some("p"));
        assert!(dom.find_by_identity("missing").is_none());
    }

    #[test]
    fn test_inner_text_collapses_whitespace() {
        let dom = PreviewDom::parse(DOC);
        let h1 = dom.find_by_tag("h1", 0).unwrap();
        assert_eq!(dom.inner_text(h1), "Fresh Bread");
    }

    #[test]
    fn test_set_text_replaces_children() {
        let mut dom = PreviewDom::parse(DOC);
        let h1 = dom.find_by_tag("h1", 0).unwrap();
        dom.set_text(h1, "Warm Rolls");

        assert_eq!(dom.inner_text(h1), "Warm Rolls");
        assert!(dom.serialize_clean().contains("Warm Rolls"));
        assert!(!dom.serialize_clean().contains("Fresh"));
    }

    #[test]
    fn test_set_attribute_overwrites() {
        let mut dom = PreviewDom::parse(DOC);
        let h1 = dom.find_by_tag("h1", 0).unwrap();
        dom.set_attribute(h1, "class", "hero large");
        assert_eq!(dom.attribute(h1, "class").as_deref(), Some("hero large"));

        dom.set_attribute(h1, "id", "sw-abcdefghi");
        assert_eq!(dom.attribute(h1, "id").as_deref(), Some("sw-abcdefghi"));
    }

    #[test]
    fn test_serialize_clean_strips_marker_and_agent() {
        let instrumented = weaver_core::instrument::instrument(DOC);
        let mut dom = PreviewDom::parse(&instrumented);
        let h1 = dom.find_by_tag("h1", 0).unwrap();
        dom.set_attribute(h1, "class", "hero sw-highlight");

        let clean = dom.serialize_clean();
        assert!(!clean.contains("sw-highlight"));
        assert!(!clean.contains("data-sw-agent"));
        assert!(clean.contains("class=\"hero\""));
        // The live tree still carries the marker.
        assert_eq!(
            dom.attribute(h1, "class").as_deref(),
            Some("hero sw-highlight")
        );
    }

    #[test]
    fn test_serialize_clean_drops_class_left_empty() {
        let mut dom = PreviewDom::parse(DOC);
        let p = dom.find_by_tag("p", 0).unwrap();
        dom.set_attribute(p, "class", "sw-highlight");

        let clean = dom.serialize_clean();
        assert!(!clean.contains("sw-highlight"));
        assert!(!clean.contains("class=\"\""));
    }
}
