use crate::ast::{Segment, SpanNode};

/// Serializes a tree to HTML.
///
/// Text runs are emitted verbatim. A node whose opener was never closed is
/// prefixed with its literal delimiter (`_` or `__`); its children, if it has
/// any, are still wrapped in the node's element.
pub fn render(tree: &SpanNode) -> String {
    let mut out = String::new();
    push_node(&mut out, tree);
    out
}

fn push_node(out: &mut String, node: &SpanNode) {
    let element = node.tag.element();
    out.push('<');
    out.push_str(element);
    out.push('>');
    out.push_str(&render_children(&node.children));
    out.push_str("</");
    out.push_str(element);
    out.push('>');
}

fn render_children(children: &[Segment]) -> String {
    let mut out = String::new();
    for child in children {
        match child {
            Segment::Text(text) => out.push_str(text),
            Segment::Node(node) if node.complete => push_node(&mut out, node),
            Segment::Node(node) => {
                out.push_str(node.tag.marker());
                if !node.children.is_empty() {
                    push_node(&mut out, node);
                }
            }
        }
    }
    out
}
