//! Duplicate declaration checker for a small block structured language.
//!
//! ```txt
//! # comment
//! let a
//! {
//!     let b
//!     use a
//! }
//! let b
//! ```
//!
//! `let <name>` declares a name in the innermost block, `use <name>` refers to
//! one and `{` / `}` open and close blocks. A name may not be declared again
//! while a declaration of it is still in scope. Redeclarations and uses of
//! undeclared names are collected as [`Diagnostic`]s and checking continues.
//! Malformed input stops checking with a [`CheckError`].

use crate::{
    error::{CheckError, Redeclaration},
    identity::BucketHasher,
    intern::{Atom, Interner},
    scope::{DeclaredNames, LookupStats},
};

/// Source tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'s> {
    Let,
    Use,
    Open,
    Close,
    Name(&'s str),
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Let => f.write_str("let"),
            Token::Use => f.write_str("use"),
            Token::Open => f.write_str("{"),
            Token::Close => f.write_str("}"),
            Token::Name(name) => f.write_str(name),
        }
    }
}

/// Splits source text into tokens paired with their line numbers.
pub struct Lexer<'s> {
    data: &'s str,
    line: usize,
}

impl<'s> Lexer<'s> {
    pub fn new(data: &'s str) -> Lexer<'s> {
        Self { data, line: 1 }
    }

    pub fn parse_next(&mut self) -> Option<Result<(usize, Token<'s>), CheckError>> {
        self.skip_trivia();

        let mut chars = self.data.chars();
        let first = chars.next()?;

        let token = match first {
            '{' => Token::Open,
            '}' => Token::Close,
            c if c == '_' || c.is_ascii_alphabetic() => {
                let len = self
                    .data
                    .find(|c: char| c != '_' && !c.is_ascii_alphanumeric())
                    .unwrap_or(self.data.len());

                let (word, rest) = self.data.split_at(len);
                self.data = rest;

                return Some(Ok((
                    self.line,
                    match word {
                        "let" => Token::Let,
                        "use" => Token::Use,
                        name => Token::Name(name),
                    },
                )));
            }
            found => {
                // Stop at the first invalid character.
                self.data = "";
                return Some(Err(CheckError::InvalidCharacter {
                    line: self.line,
                    found,
                }));
            }
        };

        self.data = chars.as_str();
        Some(Ok((self.line, token)))
    }

    /// Skips whitespace and comments.
    fn skip_trivia(&mut self) {
        loop {
            let trimmed = self.data.trim_start();
            self.line += self.data[..self.data.len() - trimmed.len()]
                .bytes()
                .filter(|b| *b == b'\n')
                .count();
            self.data = trimmed;

            if !self.data.starts_with('#') {
                return;
            }

            let data = self.data;
            self.data = data.find('\n').map(|end| &data[end..]).unwrap_or_default();
        }
    }
}

impl<'s> Iterator for Lexer<'s> {
    type Item = Result<(usize, Token<'s>), CheckError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.parse_next()
    }
}

/// A problem found in an otherwise well formed source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    #[error(transparent)]
    Redeclared(#[from] Redeclaration),

    #[error("'{name}' is not declared")]
    Undeclared { name: String, line: usize },
}

impl Diagnostic {
    /// Returns the line the diagnostic points at.
    pub fn line(&self) -> usize {
        match self {
            Diagnostic::Redeclared(redeclaration) => redeclaration.line,
            Diagnostic::Undeclared { line, .. } => *line,
        }
    }
}

/// Results of checking a source.
#[derive(Debug, Default)]
pub struct Report {
    /// Number of `let` statements.
    pub declarations: usize,

    /// Number of `use` statements.
    pub references: usize,

    pub diagnostics: Vec<Diagnostic>,

    pub stats: LookupStats,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Checks `source` for redeclared and undeclared names.
///
/// Names are interned into `interner` and tracked with the hasher `H`.
pub fn check_source<'a, H>(
    source: &str,
    interner: &mut Interner<'a>,
) -> Result<Report, CheckError>
where
    H: BucketHasher<&'a Atom<'a>>,
{
    let mut names: DeclaredNames<'a, H> = DeclaredNames::new();
    let mut report = Report::default();

    // Lines of the open braces
    let mut open = Vec::new();

    let mut tokens = Lexer::new(source);
    while let Some(token) = tokens.next() {
        let (line, token) = token?;
        match token {
            Token::Open => {
                names.enter_scope();
                open.push(line);
            }
            Token::Close => {
                names
                    .exit_scope()
                    .map_err(|_| CheckError::UnmatchedClose { line })?;
                open.pop();
            }
            Token::Let | Token::Use => {
                let atom = match tokens.next().transpose()? {
                    Some((_, Token::Name(name))) => interner.intern(name),
                    Some((line, found)) => {
                        return Err(CheckError::UnexpectedToken {
                            line,
                            found: found.to_string(),
                        });
                    }
                    None => {
                        return Err(CheckError::MissingName {
                            line,
                            keyword: if token == Token::Let { "let" } else { "use" },
                        });
                    }
                };

                if token == Token::Let {
                    report.declarations += 1;
                    if let Err(e) = names.declare(atom, line) {
                        report.diagnostics.push(e.into());
                    }
                } else {
                    report.references += 1;
                    if !names.is_declared(atom) {
                        report.diagnostics.push(Diagnostic::Undeclared {
                            name: atom.name().to_owned(),
                            line,
                        });
                    }
                }
            }
            Token::Name(name) => {
                return Err(CheckError::UnexpectedToken {
                    line,
                    found: name.to_owned(),
                });
            }
        }
    }

    if let Some(line) = open.pop() {
        return Err(CheckError::UnclosedScope { line });
    }

    report.stats = names.stats();
    log::debug!(
        "checked {} declarations and {} references ({} fast hits, {} exact lookups)",
        report.declarations,
        report.references,
        report.stats.fast_hits,
        report.stats.exact_lookups
    );

    Ok(report)
}
