use crate::ast::{Segment, SpanNode, Tag};
use crate::code_span::{code_span_openers, find_closing_backtick};

/// Parses one paragraph into a tree rooted at a complete `Paragraph` node.
///
/// Never fails: unmatched delimiters degrade to literal text or to incomplete
/// `Em`/`Strong` nodes.
pub fn build_tree(paragraph: &str) -> SpanNode {
    let chars: Vec<char> = paragraph.chars().collect();
    let openers = code_span_openers(&chars);
    tracing::trace!(
        chars = chars.len(),
        code_spans = openers.len(),
        "Building paragraph tree"
    );
    TreeBuilder::new(&chars, openers).build()
}

/// Pending item on the parsing stack.
#[derive(Debug)]
enum StackItem {
    Text(String),
    Node(SpanNode),
}

impl From<StackItem> for Segment {
    fn from(item: StackItem) -> Self {
        match item {
            StackItem::Text(text) => Segment::Text(text),
            StackItem::Node(node) => Segment::Node(node),
        }
    }
}

struct TreeBuilder<'a> {
    chars: &'a [char],
    code_openers: Vec<usize>,
    stack: Vec<StackItem>,
    buffer: String,
    escaping: bool,
    // Only one pending opener per tag is tracked; a second `_` while one is
    // open is never treated as a new opener.
    active_em: Option<usize>,
    active_strong: Option<usize>,
}

impl<'a> TreeBuilder<'a> {
    fn new(chars: &'a [char], code_openers: Vec<usize>) -> Self {
        Self {
            chars,
            code_openers,
            stack: Vec::new(),
            buffer: String::new(),
            escaping: false,
            active_em: None,
            active_strong: None,
        }
    }

    fn build(mut self) -> SpanNode {
        let mut i = 0;
        while i < self.chars.len() {
            i = self.step(i);
        }
        if self.escaping {
            tracing::trace!("Dropping trailing backslash");
        }
        if self.active_em.is_some() || self.active_strong.is_some() {
            tracing::trace!(
                em = ?self.active_em,
                strong = ?self.active_strong,
                "Paragraph ended with unmatched openers"
            );
        }
        self.flush_buffer();
        SpanNode {
            tag: Tag::Paragraph,
            children: self.stack.into_iter().map(Segment::from).collect(),
            complete: true,
        }
    }

    /// Consumes the character at `i` and returns the next cursor position.
    fn step(&mut self, i: usize) -> usize {
        let ch = self.chars[i];
        if self.escaping {
            self.escaping = false;
            self.push_escaped(ch);
            return i + 1;
        }
        match ch {
            '\\' => {
                self.escaping = true;
                i + 1
            }
            '`' => self.scan_backtick(i),
            '_' => self.scan_underscore(i),
            _ => {
                self.buffer.push(ch);
                i + 1
            }
        }
    }

    fn push_escaped(&mut self, ch: char) {
        match ch {
            '<' => self.buffer.push_str("&lt;"),
            '>' => self.buffer.push_str("&gt;"),
            '\\' | '_' | '`' => self.buffer.push(ch),
            _ => {
                self.buffer.push('\\');
                self.buffer.push(ch);
            }
        }
    }

    fn scan_backtick(&mut self, i: usize) -> usize {
        if self.code_openers.binary_search(&i).is_err() {
            self.buffer.push('`');
            return i + 1;
        }
        let close = find_closing_backtick(self.chars, i).unwrap_or(self.chars.len());
        let content: String = self.chars[i + 1..close].iter().collect();
        self.flush_buffer();
        self.stack.push(StackItem::Node(SpanNode {
            tag: Tag::Code,
            children: vec![Segment::Text(content)],
            complete: true,
        }));
        close + 1
    }

    fn scan_underscore(&mut self, i: usize) -> usize {
        let chars = self.chars;
        if can_open(chars, i) {
            if opens_strong(chars, i) && self.active_strong.is_none() {
                self.open(Tag::Strong);
                self.active_strong = Some(i);
                return i + 2;
            }
            if opens_em(chars, i) && self.active_em.is_none() {
                self.open(Tag::Em);
                self.active_em = Some(i);
                return i + 1;
            }
        }
        if can_close(chars, i) {
            if closes_strong(chars, i) && self.active_strong.is_some() {
                // The first `_` of the closer was buffered as text.
                if self.buffer.ends_with('_') {
                    self.buffer.pop();
                }
                self.flush_buffer();
                self.reduce(Tag::Strong);
                self.active_strong = None;
                return i + 1;
            }
            if closes_em(chars, i) && self.active_em.is_some() {
                self.flush_buffer();
                self.reduce(Tag::Em);
                self.active_em = None;
                return i + 1;
            }
        }
        self.buffer.push('_');
        i + 1
    }

    fn open(&mut self, tag: Tag) {
        self.flush_buffer();
        self.stack.push(StackItem::Node(SpanNode::pending(tag)));
    }

    fn flush_buffer(&mut self) {
        let text = std::mem::take(&mut self.buffer);
        self.stack.push(StackItem::Text(text));
    }

    /// Pops everything back to the pending opener of `tag` and replaces it with
    /// one complete node.
    fn reduce(&mut self, tag: Tag) {
        let mut children = Vec::new();
        while let Some(item) = self.stack.pop() {
            match item {
                StackItem::Text(text) => children.push(Segment::Text(text)),
                StackItem::Node(node) => {
                    if node.is_opener_of(tag) {
                        break;
                    }
                    // An enclosed opener can no longer be closed.
                    if !node.complete {
                        match node.tag {
                            Tag::Em => self.active_em = None,
                            Tag::Strong => self.active_strong = None,
                            Tag::Code | Tag::Paragraph => {}
                        }
                    }
                    children.push(Segment::Node(node));
                }
            }
        }
        children.reverse();
        self.stack.push(StackItem::Node(SpanNode {
            tag,
            children,
            complete: true,
        }));
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn can_open(chars: &[char], i: usize) -> bool {
    i == 0 || !is_word_char(chars[i - 1])
}

fn can_close(chars: &[char], i: usize) -> bool {
    chars.get(i + 1).is_none_or(|&next| !is_word_char(next))
}

fn opens_strong(chars: &[char], i: usize) -> bool {
    chars.get(i + 1) == Some(&'_') && chars.get(i + 2).is_some_and(|&ch| ch != '_')
}

fn opens_em(chars: &[char], i: usize) -> bool {
    chars.get(i + 1).is_some_and(|&ch| ch != '_')
}

fn closes_strong(chars: &[char], i: usize) -> bool {
    i >= 2 && chars[i - 1] == '_' && chars[i - 2] != '_'
}

fn closes_em(chars: &[char], i: usize) -> bool {
    i >= 1 && chars[i - 1] != '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(value: &str) -> Segment {
        Segment::Text(value.to_string())
    }

    fn node(tag: Tag, children: Vec<Segment>) -> Segment {
        Segment::Node(SpanNode {
            tag,
            children,
            complete: true,
        })
    }

    fn opener(tag: Tag) -> Segment {
        Segment::Node(SpanNode::pending(tag))
    }

    fn children(source: &str) -> Vec<Segment> {
        let tree = build_tree(source);
        assert_eq!(tree.tag, Tag::Paragraph);
        assert!(tree.complete);
        tree.children
    }

    #[test]
    fn simple_text_is_single_run() {
        assert_eq!(children("abc"), vec![text("abc")]);
    }

    #[test]
    fn empty_paragraph_has_one_empty_run() {
        assert_eq!(children(""), vec![text("")]);
    }

    #[test]
    fn escape_sequences_are_resolved() {
        assert_eq!(children(r"a\\b\c"), vec![text(r"a\b\c")]);
    }

    #[test]
    fn escaped_angle_brackets_become_entities() {
        assert_eq!(children(r"\<b\>"), vec![text("&lt;b&gt;")]);
        assert_eq!(children("<b>"), vec![text("<b>")]);
    }

    #[test]
    fn trailing_backslash_is_dropped() {
        assert_eq!(children("abc\\"), vec![text("abc")]);
    }

    #[test]
    fn escapes_before_tags_suppress_them() {
        assert_eq!(
            children(r"\_a b_ _\_c__ d"),
            vec![text("_a b_ "), opener(Tag::Em), text("_c__ d")]
        );
    }

    #[test]
    fn code_span_is_atomic() {
        assert_eq!(
            children("a`b`"),
            vec![text("a"), node(Tag::Code, vec![text("b")]), text("")]
        );
    }

    #[test]
    fn escapes_inside_code_are_literal() {
        assert_eq!(
            children(r"a`b\`"),
            vec![text("a"), node(Tag::Code, vec![text(r"b\")]), text("")]
        );
        assert_eq!(
            children("`_x_`"),
            vec![text(""), node(Tag::Code, vec![text("_x_")]), text("")]
        );
    }

    #[test]
    fn unpaired_backtick_is_literal() {
        assert_eq!(children("a ` b"), vec![text("a ` b")]);
        assert_eq!(children(r"\`a`"), vec![text("`a`")]);
    }

    #[test]
    fn tags_nest() {
        let code = node(Tag::Code, vec![text("a")]);
        let em = node(Tag::Em, vec![text(""), code, text("")]);
        let strong = node(Tag::Strong, vec![text("b "), em, text(" c")]);
        assert_eq!(
            children("__b _`a`_ c__"),
            vec![text(""), strong, text("")]
        );
    }

    #[test]
    fn intersecting_tags_keep_the_first_opened() {
        let em = node(
            Tag::Em,
            vec![text("a "), opener(Tag::Strong), text("b")],
        );
        assert_eq!(
            children("a _a __b_ c__"),
            vec![text("a "), em, text(" c__")]
        );
    }

    #[test]
    fn strong_closer_drops_its_first_underscore() {
        assert_eq!(
            children("__b__"),
            vec![text(""), node(Tag::Strong, vec![text("b")]), text("")]
        );
    }

    #[test]
    fn enclosed_opener_is_no_longer_active() {
        // `_b` is swallowed by the strong span, so the final `_` cannot close it.
        let strong = node(
            Tag::Strong,
            vec![text("a "), opener(Tag::Em), text("b")],
        );
        assert_eq!(
            children("__a _b__ c_"),
            vec![text(""), strong, text(" c_")]
        );
    }

    #[test]
    fn second_em_opener_is_literal_while_one_is_active() {
        assert_eq!(
            children("_a _b_"),
            vec![
                text(""),
                node(Tag::Em, vec![text("a _b")]),
                text(""),
            ]
        );
    }

    #[test]
    fn underscores_inside_words_are_literal() {
        assert_eq!(children("snake_case_name"), vec![text("snake_case_name")]);
        assert_eq!(children("x__y__z"), vec![text("x__y__z")]);
    }

    #[test]
    fn underscore_at_end_cannot_open() {
        assert_eq!(children("abc _"), vec![text("abc _")]);
        assert_eq!(children("__"), vec![text("__")]);
    }

    #[test]
    fn triple_underscore_is_literal() {
        assert_eq!(children("___a"), vec![text("___a")]);
    }

    #[test]
    fn unmatched_opener_stays_incomplete() {
        assert_eq!(
            children("a _b"),
            vec![text("a "), opener(Tag::Em), text("b")]
        );
    }

    #[test]
    fn underscores_around_unicode_letters_are_word_bound() {
        assert_eq!(children("привет_мир_"), vec![text("привет_мир_")]);
        assert_eq!(
            children("_жук_"),
            vec![text(""), node(Tag::Em, vec![text("жук")]), text("")]
        );
    }

    #[test]
    fn delimiter_predicates() {
        let chars: Vec<char> = "a _b__ c".chars().collect();
        assert!(can_open(&chars, 0));
        assert!(can_open(&chars, 2));
        assert!(!can_open(&chars, 4));
        assert!(!can_close(&chars, 4));
        assert!(can_close(&chars, 5));
        assert!(closes_strong(&chars, 5));
        assert!(!closes_em(&chars, 5));
        assert!(opens_em(&chars, 2));
        assert!(!opens_strong(&chars, 2));
    }
}
