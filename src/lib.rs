//! Constant-time "definitely already declared" checks for interned names.
//!
//! The core of the crate is [`BloomishSet`], a fixed 16 bucket table which can
//! answer "is this item definitely in the set" exactly while the set holds only
//! a few items. It is meant to sit in front of an exact lookup during a single
//! pass over a program: the common case of small scopes gets answered without
//! touching the exact table and everything else falls through to it.
//!
//! The rest of the crate is the machinery around it. [`intern`] hands out
//! stable-address [`Atom`](intern::Atom)s to track, [`scope`] pairs the set
//! with an exact map for lexical scopes and [`checker`] uses both to find
//! duplicate declarations in a small block structured language.

pub mod checker;
pub mod error;
pub mod identity;
pub mod intern;
pub mod scope;
pub mod set;

pub use error::*;
pub use identity::{AddressHash, BucketHasher, ContentHash, Identity};
pub use set::BloomishSet;
