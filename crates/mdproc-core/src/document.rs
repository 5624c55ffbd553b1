use rayon::prelude::*;

use crate::emit::render;
use crate::paragraph::split_paragraphs;
use crate::parser::build_tree;

/// Options for converting a whole document.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HtmlOptions {
    /// Parse and render paragraphs on the rayon thread pool.
    ///
    /// Output is identical to the sequential path; fragments are joined in
    /// input order.
    pub parallel: bool,
}

/// Converts a document to HTML with default options.
pub fn markdown_to_html(text: &str) -> String {
    markdown_to_html_with_options(text, &HtmlOptions::default())
}

/// Converts a document to HTML, one `<p>` fragment per paragraph.
pub fn markdown_to_html_with_options(text: &str, options: &HtmlOptions) -> String {
    let paragraphs = split_paragraphs(text);
    tracing::debug!(
        paragraphs = paragraphs.len(),
        parallel = options.parallel,
        "Converting document"
    );
    let fragments: Vec<String> = if options.parallel {
        paragraphs
            .par_iter()
            .map(|paragraph| render(&build_tree(paragraph)))
            .collect()
    } else {
        paragraphs
            .iter()
            .map(|paragraph| render(&build_tree(paragraph)))
            .collect()
    };
    fragments.concat()
}
