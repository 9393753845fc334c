//! Ordered node-sets over one parsed document.
//!
//! A [`Selection`] is the working set the decode engine narrows step by
//! step: it starts as the document root and each selector hop produces a new
//! Selection. It never owns nodes: every handle points into the arena of
//! the `Package` that parsed the document, and the lifetime parameter keeps
//! Selections from outliving it or mixing across documents.

use sxd_document::dom::{ChildOfElement, ChildOfRoot, Element};
use sxd_xpath::nodeset::Node;

use crate::error::{DecodeError, Reason, Result};
use crate::selector;

/// An immutable, ordered set of node handles from a single document.
#[derive(Debug, Clone)]
pub struct Selection<'d> {
    nodes: Vec<Node<'d>>,
}

impl<'d> Selection<'d> {
    /// Open-end sentinel for [`slice`](Selection::slice).
    pub const END: isize = isize::MAX;

    /// A one-element Selection.
    pub fn new(node: impl Into<Node<'d>>) -> Self {
        Selection {
            nodes: vec![node.into()],
        }
    }

    /// A Selection over `nodes`, kept in the order given.
    pub fn from_nodes(nodes: Vec<Node<'d>>) -> Self {
        Selection { nodes }
    }

    pub(crate) fn empty() -> Self {
        Selection { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The raw node handles, in order. Custom decode hooks receive this.
    pub fn nodes(&self) -> &[Node<'d>] {
        &self.nodes
    }

    /// Concatenated character data of every node in the set, in document
    /// order, recursing depth-first through descendants. Interior whitespace
    /// is preserved exactly; trimming is the caller's concern.
    pub fn text(&self) -> String {
        let mut buf = String::new();
        for node in &self.nodes {
            node_text(node, &mut buf);
        }
        buf
    }

    /// Serialized inner content of the first node, re-rendered from the
    /// tree. Empty when the set is empty or the first node has no children.
    pub fn markup(&self) -> String {
        let mut buf = String::new();
        match self.nodes.first() {
            Some(Node::Element(element)) => {
                for child in element.children() {
                    write_child(child, &mut buf);
                }
            }
            Some(Node::Root(root)) => {
                for child in root.children() {
                    if let ChildOfRoot::Element(element) = child {
                        write_element(element, &mut buf);
                    }
                }
            }
            _ => {}
        }
        buf
    }

    /// The named attribute of the first node, when that node is an element
    /// carrying it.
    pub fn attr(&self, name: &str) -> Option<&'d str> {
        match self.nodes.first()? {
            Node::Element(element) => element.attribute_value(name),
            _ => None,
        }
    }

    /// Evaluate a selector expression against the first node of this set.
    /// No match yields an empty Selection, not an error, so required/optional
    /// policy can be applied uniformly by the caller. Narrowing an empty
    /// Selection stays empty.
    pub fn narrow(&self, expr: &str) -> Result<Selection<'d>> {
        let Some(first) = self.nodes.first() else {
            return Ok(Selection::empty());
        };
        Ok(Selection::from_nodes(selector::apply(*first, expr)?))
    }

    /// As [`narrow`](Selection::narrow), but fails with
    /// [`Reason::MultipleNodesDetected`] when more than one node matches.
    pub fn narrow_one(&self, expr: &str) -> Result<Selection<'d>> {
        let matched = self.narrow(expr)?;
        if matched.len() > 1 {
            return Err(DecodeError::new::<Self>(Reason::MultipleNodesDetected)
                .with_selector(expr)
                .into());
        }
        Ok(matched)
    }

    /// A one-element Selection holding the node at `index`. Negative indices
    /// count from the end; out of range yields an empty Selection.
    pub fn at(&self, index: isize) -> Selection<'d> {
        let len = self.nodes.len() as isize;
        let index = if index < 0 { index + len } else { index };
        if index < 0 || index >= len {
            return Selection::empty();
        }
        self.slice(index, index + 1)
    }

    /// The half-open subrange `[start, end)`. Negative indices count from
    /// the end; [`Selection::END`] leaves the range open. Out-of-range
    /// bounds clamp.
    pub fn slice(&self, start: isize, end: isize) -> Selection<'d> {
        let len = self.nodes.len() as isize;
        let start = if start < 0 { start + len } else { start };
        let end = if end == Self::END {
            len
        } else if end < 0 {
            end + len
        } else {
            end
        };
        let start = start.clamp(0, len) as usize;
        let end = end.clamp(start as isize, len) as usize;
        Selection::from_nodes(self.nodes[start..end].to_vec())
    }
}

fn node_text(node: &Node<'_>, buf: &mut String) {
    match node {
        Node::Text(text) => buf.push_str(text.text()),
        Node::Attribute(attribute) => buf.push_str(attribute.value()),
        Node::Element(element) => element_text(*element, buf),
        Node::Root(root) => {
            for child in root.children() {
                if let ChildOfRoot::Element(element) = child {
                    element_text(element, buf);
                }
            }
        }
        _ => {}
    }
}

fn element_text(element: Element<'_>, buf: &mut String) {
    for child in element.children() {
        match child {
            ChildOfElement::Text(text) => buf.push_str(text.text()),
            ChildOfElement::Element(child) => element_text(child, buf),
            _ => {}
        }
    }
}

fn write_child(child: ChildOfElement<'_>, buf: &mut String) {
    match child {
        ChildOfElement::Element(element) => write_element(element, buf),
        ChildOfElement::Text(text) => buf.push_str(&xml_escape(text.text())),
        ChildOfElement::Comment(comment) => {
            buf.push_str("<!--");
            buf.push_str(comment.text());
            buf.push_str("-->");
        }
        ChildOfElement::ProcessingInstruction(pi) => {
            buf.push_str("<?");
            buf.push_str(pi.target());
            if let Some(value) = pi.value() {
                buf.push(' ');
                buf.push_str(value);
            }
            buf.push_str("?>");
        }
    }
}

fn write_element(element: Element<'_>, buf: &mut String) {
    let name = element.name().local_part().to_owned();
    buf.push('<');
    buf.push_str(&name);
    for attribute in element.attributes() {
        buf.push(' ');
        buf.push_str(attribute.name().local_part());
        buf.push_str("=\"");
        buf.push_str(&xml_escape(attribute.value()));
        buf.push('"');
    }
    let children = element.children();
    if children.is_empty() {
        buf.push_str("/>");
        return;
    }
    buf.push('>');
    for child in children {
        write_child(child, buf);
    }
    buf.push_str("</");
    buf.push_str(&name);
    buf.push('>');
}

/// Escape special XML characters.
fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sxd_document::{parser, Package};

    fn parse(xml: &str) -> Package {
        parser::parse(xml).expect("test document parses")
    }

    #[test]
    fn text_preserves_interior_whitespace() {
        let package = parse("<div>\n  1\n  <span>\n    2\n  </span>\n  3\n</div>");
        let root = Selection::new(package.as_document().root());
        assert_eq!(root.text(), "\n  1\n  \n    2\n  \n  3\n");
    }

    #[test]
    fn text_over_sibling_text_nodes_skips_nested_elements() {
        let package = parse("<div>1<span>2</span>3</div>");
        let root = Selection::new(package.as_document().root());
        let texts = root.narrow(".//div/text()").unwrap();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts.at(0).text(), "1");
        assert_eq!(texts.at(1).text(), "3");
        assert_eq!(texts.text(), "13");
    }

    #[test]
    fn narrow_misses_are_empty_not_errors() {
        let package = parse("<div/>");
        let root = Selection::new(package.as_document().root());
        let missing = root.narrow(".//nope").unwrap();
        assert!(missing.is_empty());
        assert!(missing.narrow(".//deeper").unwrap().is_empty());
    }

    #[test]
    fn narrow_one_rejects_multiple_matches() {
        let package = parse("<ul><li>a</li><li>b</li></ul>");
        let root = Selection::new(package.as_document().root());
        let err = root.narrow_one(".//li").unwrap_err();
        let frame = err.frame().expect("frame");
        assert_eq!(frame.reason, Reason::MultipleNodesDetected);
        assert_eq!(frame.selector.as_deref(), Some(".//li"));
    }

    #[test]
    fn at_and_slice_support_negative_indices() {
        let package = parse("<ul><li>a</li><li>b</li><li>c</li></ul>");
        let root = Selection::new(package.as_document().root());
        let items = root.narrow(".//li").unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items.at(-1).text(), "c");
        assert_eq!(items.at(1).text(), "b");
        assert!(items.at(3).is_empty());
        assert!(items.at(-4).is_empty());
        assert_eq!(items.slice(1, Selection::END).len(), 2);
        assert_eq!(items.slice(0, -1).len(), 2);
        assert_eq!(items.slice(-2, Selection::END).text(), "bc");
    }

    #[test]
    fn attr_reads_the_first_node() {
        let package = parse("<ul><li kind=\"x\">a</li><li kind=\"y\">b</li></ul>");
        let root = Selection::new(package.as_document().root());
        let items = root.narrow(".//li").unwrap();
        assert_eq!(items.attr("kind"), Some("x"));
        assert_eq!(items.attr("missing"), None);
        assert_eq!(Selection::empty().attr("kind"), None);
    }

    #[test]
    fn markup_renders_inner_content() {
        let package = parse("<div><b one=\"1\">x</b>tail<br/></div>");
        let root = Selection::new(package.as_document().root());
        let div = root.narrow(".//div").unwrap();
        assert_eq!(div.markup(), "<b one=\"1\">x</b>tail<br/>");
    }
}
