//! Fixed-size approximate identity set.
//!
//! The set is a table of [`BUCKETS`] `u64` accumulators and a running count of
//! the items currently in it. Adding an item adds its tag into the bucket the
//! item hashes to and removing it subtracts the same tag again.
//!
//! A tag packs a per-bucket insertion counter and the identity word into one
//! word:
//!
//! ```txt
//!  63                         COUNTER_BITS       0
//! +----------------------------+-----------------+
//! |       identity word        |   counter (1)   |
//! +----------------------------+-----------------+
//! ```
//!
//! A bucket holding exactly one item is equal to that item's tag. Any other
//! population leaves a counter different from 1 in the low bits, so comparing
//! a bucket against a tag is an exact membership test for that bucket. This is
//! the reverse of a regular bloom filter: a match means "definitely present"
//! and a mismatch means "unknown".
//!
//! The counter is only [`COUNTER_BITS`] wide. Once 2^[`COUNTER_BITS`] items pile
//! up in one bucket the counter wraps into the identity bits and the bucket may
//! end up equal to the tag of an item that was never added. The query is only
//! answered while the set holds at most [`TEST_LIMIT`] items which keeps every
//! bucket far below that point. The limit also bounds the chance of a present
//! item sharing its bucket (and getting a negative answer) to roughly
//! `exp(-BUCKETS / size)`.

use std::marker::PhantomData;

use crate::identity::{AddressHash, BucketHasher, Identity, bucket_index};

/// Number of bits used for selecting a bucket.
pub const TABLE_BITS: u32 = 4;

/// Number of low tag bits used for counting insertions into a bucket.
pub const COUNTER_BITS: u32 = 4;

/// Largest set size at which the membership query is answered.
pub const TEST_LIMIT: u32 = 8;

/// Number of buckets in the table.
pub const BUCKETS: usize = 1 << TABLE_BITS;

/// Mask for the counter bits of a bucket.
pub const COUNTER_MASK: u64 = (1 << COUNTER_BITS) - 1;

/// Additional contract checks on identity words and removals.
const VALIDATE: bool = cfg!(debug_assertions);

const _: () = assert!(TEST_LIMIT < 1 << COUNTER_BITS);

/// Approximate set of item identities with an exact "definitely included" test.
///
/// `I` is the tracked item handle and `H` selects how items are hashed into
/// buckets. The set does not own or inspect the items, see
/// [`Identity`] for the requirements on the handles.
pub struct BloomishSet<I, H = AddressHash> {
    /// Number of items currently added.
    size: u32,

    /// Bucket accumulators.
    table: [u64; BUCKETS],

    _marker: PhantomData<fn(I) -> H>,
}

impl<I: Identity, H: BucketHasher<I>> BloomishSet<I, H> {
    /// Creates an empty set.
    pub const fn new() -> Self {
        Self {
            size: 0,
            table: [0; BUCKETS],
            _marker: PhantomData,
        }
    }

    /// Returns the number of items currently in the set.
    pub fn len(&self) -> usize {
        self.size as usize
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns `true` if the set is small enough for
    /// [`BloomishSet::is_definitely_included`] to give positive answers.
    pub fn is_testable(&self) -> bool {
        0 < self.size && self.size <= TEST_LIMIT
    }

    /// Returns the raw bucket accumulators.
    pub fn buckets(&self) -> &[u64; BUCKETS] {
        &self.table
    }

    /// Adds `item` to the set.
    ///
    /// # Panics
    /// Panics if the set already holds `u32::MAX` items.
    pub fn add(&mut self, item: I) {
        assert!(self.size != u32::MAX, "bloomish set size overflow");
        self.size += 1;

        let bucket = &mut self.table[bucket_index::<I, H>(&item)];
        *bucket = bucket.wrapping_add(tag(item.identity_word()));
    }

    /// Removes `item` from the set.
    ///
    /// `item` must have been added before and not removed since. Removing
    /// anything else corrupts the set.
    ///
    /// # Panics
    /// Panics if the set is empty. With debug assertions enabled, also panics
    /// if the bucket for `item` has no insertions recorded while the counters
    /// cannot have wrapped yet.
    pub fn remove(&mut self, item: I) {
        assert!(self.size != 0, "removed an item from an empty bloomish set");

        let index = bucket_index::<I, H>(&item);
        if VALIDATE {
            assert!(
                self.size >= 1 << COUNTER_BITS || self.table[index] & COUNTER_MASK != 0,
                "removed an item which is not in the bloomish set"
            );
        }

        self.size -= 1;
        let bucket = &mut self.table[index];
        *bucket = bucket.wrapping_sub(tag(item.identity_word()));
    }

    /// Returns `true` if `item` is definitely in the set.
    ///
    /// A `false` result does not mean the item is absent. Callers need to do
    /// an exact lookup elsewhere whenever this returns `false`.
    pub fn is_definitely_included(&self, item: I) -> bool {
        self.is_testable() && self.bucket_matches(&item)
    }

    /// Removes every item from the set.
    pub fn clear(&mut self) {
        self.size = 0;
        self.table = [0; BUCKETS];
    }

    /// Compares the bucket for `item` against its tag without checking the
    /// set size.
    fn bucket_matches(&self, item: &I) -> bool {
        self.table[bucket_index::<I, H>(item)] == tag(item.identity_word())
    }
}

impl<I: Identity, H: BucketHasher<I>> std::default::Default for BloomishSet<I, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, H> std::fmt::Debug for BloomishSet<I, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        struct Buckets<'a>(&'a [u64; BUCKETS]);

        impl std::fmt::Debug for Buckets<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_list()
                    .entries(self.0.iter().map(|bucket| format!("{bucket:#x}")))
                    .finish()
            }
        }

        f.debug_struct("BloomishSet")
            .field("size", &self.size)
            .field("table", &Buckets(&self.table))
            .finish()
    }
}

/// Packs an identity word into a tag with a counter value of 1.
#[inline]
fn tag(word: u64) -> u64 {
    if VALIDATE {
        assert!(word != 0, "null identity");
        assert!(
            word << COUNTER_BITS >> COUNTER_BITS == word,
            "identity {word:#x} does not fit in a tag"
        );
    }

    (word << COUNTER_BITS) | 1
}
