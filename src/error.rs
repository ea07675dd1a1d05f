//! Error types.
//!
//! Misusing a [`BloomishSet`](crate::BloomishSet) is a programming error and
//! panics. The types here cover what can go wrong with the input being
//! checked.

/// A name was declared while a declaration of it was still in scope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{name}' redeclared (first declared on line {first_line})")]
pub struct Redeclaration {
    /// The redeclared name.
    pub name: String,

    /// Line of the rejected declaration.
    pub line: usize,

    /// Line of the declaration still in scope.
    pub first_line: usize,
}

/// Scope nesting errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("no open scope to close")]
    NoOpenScope,
}

/// Errors which stop a source from being checked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    #[error("line {line}: invalid character {found:?}")]
    InvalidCharacter { line: usize, found: char },

    #[error("line {line}: unexpected '{found}'")]
    UnexpectedToken { line: usize, found: String },

    #[error("line {line}: expected a name after '{keyword}'")]
    MissingName { line: usize, keyword: &'static str },

    #[error("line {line}: '}}' without a matching '{{'")]
    UnmatchedClose { line: usize },

    #[error("line {line}: '{{' is never closed")]
    UnclosedScope { line: usize },
}
