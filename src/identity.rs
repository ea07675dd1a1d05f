//! Item identities and bucket hashing.
//!
//! A [`BloomishSet`](crate::BloomishSet) never looks inside the items it
//! tracks. It only needs an opaque word per item ([`Identity`]) and a way to
//! turn an item into a 32-bit hash code ([`BucketHasher`]). The hash code is
//! scrambled and its top [`TABLE_BITS`] bits select the bucket.
//!
//! The default [`AddressHash`] uses the identity word itself, which for
//! references is the address of the referenced item. Addresses change between
//! runs so bucket placement (and therefore which queries get a fast positive
//! answer) is not reproducible. [`ContentHash`] hashes the item's contents
//! instead when reproducible behavior matters.

use std::{
    hash::{DefaultHasher, Hash, Hasher},
    num::{NonZeroU32, NonZeroU64},
};

use crate::set::TABLE_BITS;

/// 2^32 divided by the golden ratio.
const GOLDEN_RATIO_U32: u32 = 0x9E37_79B9;

/// Opaque, stable identity of a tracked item.
///
/// The returned word must be non-zero, must not have any of its top
/// [`COUNTER_BITS`](crate::set::COUNTER_BITS) bits set, and must stay the same
/// for as long as the item is tracked. Two distinct live items must never
/// share a word.
pub trait Identity {
    fn identity_word(&self) -> u64;
}

/// References are identified by address.
///
/// The referenced value must not move or be freed while it is tracked. Values
/// handed out by an arena satisfy this. Zero-sized values do not have unique
/// addresses and should not be tracked this way.
impl<T> Identity for &T {
    #[inline]
    fn identity_word(&self) -> u64 {
        std::ptr::from_ref::<T>(*self).addr() as u64
    }
}

impl Identity for NonZeroU32 {
    #[inline]
    fn identity_word(&self) -> u64 {
        u64::from(self.get())
    }
}

impl Identity for NonZeroU64 {
    #[inline]
    fn identity_word(&self) -> u64 {
        self.get()
    }
}

/// Trait used for deriving a 32-bit hash code from a tracked item.
pub trait BucketHasher<I> {
    /// Returns the hash code for `item`.
    fn hash_code(item: &I) -> u32;
}

/// Hashes the low 32 bits of the identity word.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressHash;

impl<I: Identity> BucketHasher<I> for AddressHash {
    #[inline]
    fn hash_code(item: &I) -> u32 {
        item.identity_word() as u32
    }
}

/// Hashes the contents of the item with a fixed-key hasher.
///
/// Bucket placement only depends on what the item hashes to so it is
/// reproducible across runs of the same build.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash;

impl<I: Hash> BucketHasher<I> for ContentHash {
    fn hash_code(item: &I) -> u32 {
        let mut hasher = DefaultHasher::new();
        item.hash(&mut hasher);
        let hash = hasher.finish();
        (hash ^ (hash >> 32)) as u32
    }
}

/// Multiplicative avalanche mix of a hash code.
#[inline]
pub const fn scramble(code: u32) -> u32 {
    code.wrapping_mul(GOLDEN_RATIO_U32)
}

/// Returns the bucket index `item` maps to using the hasher `H`.
#[inline]
pub fn bucket_index<I, H: BucketHasher<I>>(item: &I) -> usize {
    (scramble(H::hash_code(item)) >> (u32::BITS - TABLE_BITS)) as usize
}
