//! Name interning.
//!
//! Every distinct name is interned once and referred to afterwards through an
//! [`Atom`] reference. Atoms are allocated in a caller owned [`Arena`] and
//! their text in a caller owned [`Bump`]. Neither allocator moves or frees
//! anything until it is dropped so the address of an atom is a stable identity
//! for its name. That identity is what gets tracked by a
//! [`BloomishSet`](crate::BloomishSet).
//!
//! ```
//! use bloomish::intern::Interner;
//!
//! let strings = bumpalo::Bump::new();
//! let atoms = typed_arena::Arena::new();
//! let mut interner = Interner::new(&atoms, &strings);
//!
//! let a = interner.intern("value");
//! let b = interner.intern("value");
//! assert!(std::ptr::eq(a, b));
//! ```

use std::{hash::Hash, num::NonZeroU32};

use bumpalo::Bump;
use indexmap::IndexMap;
use typed_arena::Arena;

use crate::identity::Identity;

/// Dense 1-based id of an interned name.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct AtomId(NonZeroU32);

impl AtomId {
    fn from_index(index: usize) -> AtomId {
        let id = u32::try_from(index + 1)
            .ok()
            .and_then(NonZeroU32::new)
            .unwrap_or_else(|| panic!("too many interned names"));
        AtomId(id)
    }

    /// Returns the 0-based index of this id.
    pub fn index(self) -> usize {
        self.0.get() as usize - 1
    }
}

impl std::fmt::Debug for AtomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AtomId").field(&self.0).finish()
    }
}

impl Identity for AtomId {
    #[inline]
    fn identity_word(&self) -> u64 {
        u64::from(self.0.get())
    }
}

/// An interned name.
///
/// Equality and hashing go through the name text. Interning guarantees one
/// atom per name so this agrees with comparing addresses.
#[derive(Debug)]
pub struct Atom<'a> {
    name: &'a str,
    id: AtomId,
}

impl<'a> Atom<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn id(&self) -> AtomId {
        self.id
    }
}

impl PartialEq for Atom<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Atom<'_> {}

impl Hash for Atom<'_> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl std::fmt::Display for Atom<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// Interns names into [`Atom`]s.
pub struct Interner<'a> {
    atoms: &'a Arena<Atom<'a>>,
    strings: &'a Bump,
    table: IndexMap<&'a str, &'a Atom<'a>>,
}

impl<'a> Interner<'a> {
    /// Creates an interner which allocates atoms in `atoms` and copies name
    /// text into `strings`.
    pub fn new(atoms: &'a Arena<Atom<'a>>, strings: &'a Bump) -> Interner<'a> {
        Self {
            atoms,
            strings,
            table: IndexMap::new(),
        }
    }

    /// Returns the atom for `name`, interning it if needed.
    pub fn intern(&mut self, name: &str) -> &'a Atom<'a> {
        if let Some(&atom) = self.table.get(name) {
            return atom;
        }

        let strings = self.strings;
        let atoms = self.atoms;

        let name: &'a str = strings.alloc_str(name);
        let atom: &'a Atom<'a> = atoms.alloc(Atom {
            name,
            id: AtomId::from_index(self.table.len()),
        });

        self.table.insert(name, atom);
        atom
    }

    /// Returns the atom for `name` if it was interned.
    pub fn get(&self, name: &str) -> Option<&'a Atom<'a>> {
        self.table.get(name).copied()
    }

    /// Returns the atom with the specified id.
    pub fn resolve(&self, id: AtomId) -> Option<&'a Atom<'a>> {
        self.table.get_index(id.index()).map(|(_, atom)| *atom)
    }

    /// Returns the number of interned names.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns an iterator over the interned atoms in interning order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Atom<'a>> {
        self.table.values().copied()
    }
}
