//! Inline markdown to HTML conversion.
//!
//! A paragraph is scanned once into a [`SpanNode`] tree by [`build_tree`] and
//! serialized by [`render`]. [`markdown_to_html`] runs the whole pipeline over
//! a document split into paragraphs on blank lines.
//!
//! Supported inline constructs: `` `code` ``, `_em_`, `__strong__`, backslash
//! escapes, and `\<`/`\>` entity escapes. Malformed markup is never an error;
//! it degrades to literal text.

mod ast;
mod code_span;
mod document;
mod emit;
mod error;
mod paragraph;
mod parser;

pub use ast::{Segment, SpanNode, Tag};
pub use code_span::find_code_span_openers;
pub use document::{HtmlOptions, markdown_to_html, markdown_to_html_with_options};
pub use emit::render;
pub use error::TreeError;
pub use paragraph::split_paragraphs;
pub use parser::build_tree;
