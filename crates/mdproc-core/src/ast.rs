use std::fmt;

use crate::error::TreeError;

/// Markdown construct a [`SpanNode`] stands for.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Tag {
    /// Root of a paragraph tree. Never nested.
    Paragraph,
    Code,
    Em,
    Strong,
}

impl Tag {
    /// Name of the HTML element the tag renders as.
    pub fn element(self) -> &'static str {
        match self {
            Tag::Paragraph => "p",
            Tag::Code => "code",
            Tag::Em => "em",
            Tag::Strong => "strong",
        }
    }

    /// Delimiter re-emitted in front of a node whose opener was never closed.
    pub fn marker(self) -> &'static str {
        match self {
            Tag::Em => "_",
            Tag::Strong => "__",
            Tag::Code | Tag::Paragraph => "",
        }
    }

    fn can_be_incomplete(self) -> bool {
        matches!(self, Tag::Em | Tag::Strong)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::Paragraph => "paragraph",
            Tag::Code => "code",
            Tag::Em => "em",
            Tag::Strong => "strong",
        };
        f.write_str(name)
    }
}

/// One tagged region of a paragraph.
///
/// A node owns its children outright; trees have no sharing and no parent
/// links. `complete` is false only for an `Em`/`Strong` opener that was never
/// matched by a closer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SpanNode {
    pub tag: Tag,
    pub children: Vec<Segment>,
    pub complete: bool,
}

/// A rendering unit inside a node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Segment {
    Text(String),
    Node(SpanNode),
}

impl SpanNode {
    /// Creates a complete node with no children.
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            children: Vec::new(),
            complete: true,
        }
    }

    /// Creates a complete node from `children`, validating each of them.
    pub fn with_children(tag: Tag, children: Vec<Segment>) -> Result<Self, TreeError> {
        let mut node = Self::new(tag);
        for child in children {
            node.push_child(child)?;
        }
        Ok(node)
    }

    /// Creates an incomplete node, as left behind by an unmatched opener.
    pub fn opener(tag: Tag) -> Result<Self, TreeError> {
        if !tag.can_be_incomplete() {
            return Err(TreeError::CannotBeIncomplete(tag));
        }
        Ok(Self::pending(tag))
    }

    pub(crate) fn pending(tag: Tag) -> Self {
        Self {
            tag,
            children: Vec::new(),
            complete: false,
        }
    }

    /// Appends a child. A paragraph can only ever be a root.
    pub fn push_child(&mut self, child: impl Into<Segment>) -> Result<(), TreeError> {
        let child = child.into();
        if let Segment::Node(node) = &child
            && node.tag == Tag::Paragraph
        {
            return Err(TreeError::NestedParagraph);
        }
        self.children.push(child);
        Ok(())
    }

    /// True for an unmatched opener of the given tag.
    pub fn is_opener_of(&self, tag: Tag) -> bool {
        !self.complete && self.tag == tag
    }
}

impl From<&str> for Segment {
    fn from(text: &str) -> Self {
        Segment::Text(text.to_string())
    }
}

impl From<String> for Segment {
    fn from(text: String) -> Self {
        Segment::Text(text)
    }
}

impl From<SpanNode> for Segment {
    fn from(node: SpanNode) -> Self {
        Segment::Node(node)
    }
}
