use crate::ast::Tag;

/// Misuse of the tree construction API.
///
/// Parsing never fails; these only come from building trees by hand.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TreeError {
    #[error("a paragraph node can only be the root of a tree")]
    NestedParagraph,
    #[error("{0} nodes are never left incomplete")]
    CannotBeIncomplete(Tag),
}
