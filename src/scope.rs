//! Declared name tracking for single-pass traversals.
//!
//! [`DeclaredNames`] records the names declared in the lexical scopes a
//! traversal is currently inside of. Declarations go into an exact
//! [`IndexMap`] and into a [`BloomishSet`]. Lookups ask the set first and only
//! fall back to the map when the set cannot confirm the name. Most scopes only
//! hold a handful of names so the fast path answers the common "is this name
//! declared" queries without hashing into the map.
//!
//! Declarations live until the scope they were made in is closed. A name may
//! not be declared again while an earlier declaration of it is still live,
//! including declarations from enclosing scopes.

use indexmap::IndexMap;

use crate::{
    error::{Redeclaration, ScopeError},
    identity::{AddressHash, BucketHasher},
    intern::{Atom, AtomId},
    set::BloomishSet,
};

/// Counters for how lookups were answered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LookupStats {
    /// Lookups confirmed by the bloomish set.
    pub fast_hits: usize,

    /// Lookups answered by the exact map.
    pub exact_lookups: usize,
}

#[derive(Debug)]
struct Declaration<'a> {
    atom: &'a Atom<'a>,
    line: usize,
}

/// Names declared in the currently open scopes.
pub struct DeclaredNames<'a, H = AddressHash> {
    fast: BloomishSet<&'a Atom<'a>, H>,

    /// Live declarations in declaration order.
    declared: IndexMap<AtomId, Declaration<'a>>,

    /// Number of declarations made before each open scope.
    scopes: Vec<usize>,

    stats: LookupStats,
}

impl<'a, H: BucketHasher<&'a Atom<'a>>> DeclaredNames<'a, H> {
    /// Creates an empty tracker positioned in the outermost scope.
    pub fn new() -> Self {
        Self {
            fast: BloomishSet::new(),
            declared: IndexMap::new(),
            scopes: Vec::new(),
            stats: LookupStats::default(),
        }
    }

    /// Returns the number of open scopes nested inside the outermost one.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Returns the number of live declarations.
    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }

    pub fn stats(&self) -> LookupStats {
        self.stats
    }

    /// Opens a nested scope.
    pub fn enter_scope(&mut self) {
        self.scopes.push(self.declared.len());
    }

    /// Closes the innermost scope and drops its declarations.
    pub fn exit_scope(&mut self) -> Result<(), ScopeError> {
        let start = self.scopes.pop().ok_or(ScopeError::NoOpenScope)?;

        for (_, declaration) in self.declared.drain(start..).rev() {
            log::trace!(
                "'{}' (line {}) went out of scope",
                declaration.atom,
                declaration.line
            );
            self.fast.remove(declaration.atom);
        }

        Ok(())
    }

    /// Returns `true` if `atom` has a live declaration.
    pub fn is_declared(&mut self, atom: &'a Atom<'a>) -> bool {
        self.fast_lookup(atom) || self.declared.contains_key(&atom.id())
    }

    /// Asks the fast set about `atom` and counts how the lookup is answered.
    ///
    /// A `false` result means the exact map has to decide.
    fn fast_lookup(&mut self, atom: &'a Atom<'a>) -> bool {
        if self.fast.is_definitely_included(atom) {
            self.stats.fast_hits += 1;
            true
        } else {
            self.stats.exact_lookups += 1;
            false
        }
    }

    /// Declares `atom` on `line` in the innermost scope.
    ///
    /// Fails if `atom` already has a live declaration. The earlier declaration
    /// is kept in that case. A conflict confirmed by the fast set only reads
    /// the map for the line of the earlier declaration.
    pub fn declare(&mut self, atom: &'a Atom<'a>, line: usize) -> Result<(), Redeclaration> {
        let confirmed = self.fast_lookup(atom);
        if let Some(previous) = self.declared.get(&atom.id()) {
            return Err(Redeclaration {
                name: atom.name().to_owned(),
                line,
                first_line: previous.line,
            });
        }
        debug_assert!(!confirmed, "'{atom}' confirmed but not declared");

        log::trace!("'{atom}' declared on line {line} at depth {}", self.depth());
        self.declared.insert(atom.id(), Declaration { atom, line });
        self.fast.add(atom);
        Ok(())
    }
}

impl<'a, H: BucketHasher<&'a Atom<'a>>> std::default::Default for DeclaredNames<'a, H> {
    fn default() -> Self {
        Self::new()
    }
}
