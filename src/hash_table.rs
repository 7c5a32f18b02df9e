//! The resizable chained hash table and its builder.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;

use crate::Key;
use crate::Value;
use crate::bucket;
use crate::bucket::Bucket;
use crate::hasher::BucketHasher;
use crate::hasher::Fibonacci;
use crate::policy::Mutation;
use crate::policy::ResizePolicy;

/// Bucket count used by [`ChainedHashTable::new`].
pub const DEFAULT_CAPACITY: usize = 8;

/// Chain statistics for a [`ChainedHashTable`].
///
/// Available in tests and with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq)]
pub struct DebugStats {
    /// Number of entries in the table
    pub populated: usize,
    /// Number of buckets
    pub capacity: usize,
    /// Number of buckets holding at least one entry
    pub occupied_buckets: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Mean chain length over occupied buckets
    pub mean_occupied_chain: f64,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Chained Hash Table Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Buckets: {}/{} occupied ({:.2}%)",
            self.occupied_buckets,
            self.capacity,
            if self.capacity == 0 {
                0.0
            } else {
                self.occupied_buckets as f64 / self.capacity as f64 * 100.0
            }
        );
        println!(
            "Chains: longest {}, mean {:.2} over occupied buckets",
            self.longest_chain, self.mean_occupied_chain
        );
    }
}

/// A resizable hash table with separate chaining for integer keys and values.
///
/// Each bucket is a doubly linked chain (see [`Bucket`]). The bucket for a
/// key is chosen by a [`BucketHasher`], [`Fibonacci`] multiplicative hashing by
/// default, always evaluated against the current bucket count.
///
/// After every insertion or removal the [`ResizePolicy`] is consulted: once
/// the load factor rises above its upper bound (0.75 by default) the bucket
/// count doubles, and once it falls below its lower bound (0.25) the bucket
/// count halves, never dropping under one bucket. A resize rehashes every
/// entry into a freshly allocated bucket array.
///
/// Inserting a key that is already present does not replace it: both entries
/// are kept, [`get`] returns the most recent one, and [`remove`] removes the
/// most recent one, uncovering the older value.
///
/// [`get`]: ChainedHashTable::get
/// [`remove`]: ChainedHashTable::remove
///
/// # Examples
///
/// ```rust
/// use chained_hash::ChainedHashTable;
///
/// let mut table = ChainedHashTable::new();
/// table.insert(10, 100);
/// table.insert(20, 200);
/// table.insert(30, 300);
/// assert_eq!(table.len(), 3);
/// assert_eq!(table.capacity(), 8);
///
/// assert_eq!(table.get(20), Some(200));
/// assert_eq!(table.remove(20), Some(200));
/// assert_eq!(table.get(20), None);
/// assert_eq!(table.len(), 2);
/// ```
#[derive(Clone)]
pub struct ChainedHashTable<H = Fibonacci> {
    buckets: Vec<Bucket>,
    populated: usize,
    policy: ResizePolicy,
    hasher: H,
}

impl<H> Debug for ChainedHashTable<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChainedHashTable")
            .field("populated", &self.populated)
            .field("capacity", &self.buckets.len())
            .field("buckets", &self.buckets)
            .finish()
    }
}

impl Default for ChainedHashTable<Fibonacci> {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainedHashTable<Fibonacci> {
    /// Creates an empty table with [`DEFAULT_CAPACITY`] buckets.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty table with `capacity` buckets.
    ///
    /// A capacity of zero is raised to one; a table always has at least one
    /// bucket.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chained_hash::ChainedHashTable;
    ///
    /// assert_eq!(ChainedHashTable::with_capacity(5).capacity(), 5);
    /// assert_eq!(ChainedHashTable::with_capacity(0).capacity(), 1);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, Fibonacci)
    }

    /// Returns a builder for configuring the capacity, resize policy and
    /// hasher of a new table.
    pub fn builder() -> TableBuilder<Fibonacci> {
        TableBuilder::default()
    }
}

impl<H: BucketHasher> ChainedHashTable<H> {
    /// Creates an empty table with [`DEFAULT_CAPACITY`] buckets using
    /// `hasher` to pick buckets.
    pub fn with_hasher(hasher: H) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, hasher)
    }

    /// Creates an empty table with `capacity` buckets (at least one) using
    /// `hasher` to pick buckets.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: H) -> Self {
        Self::from_parts(capacity, ResizePolicy::default(), hasher)
    }

    fn from_parts(capacity: usize, policy: ResizePolicy, hasher: H) -> Self {
        Self {
            buckets: alloc_buckets(capacity.max(1)),
            populated: 0,
            policy,
            hasher,
        }
    }

    /// Returns the number of entries in the table, counting every duplicate.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the current number of buckets. Always at least one.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        crate::policy::load_factor(self.populated, self.buckets.len())
    }

    /// Returns the resize policy in effect.
    pub fn policy(&self) -> &ResizePolicy {
        &self.policy
    }

    /// Returns the bucket hasher.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Inserts an entry for `key`.
    ///
    /// The entry is prepended to its chain. An existing entry with the same key
    /// is not replaced; it stays in the table behind the new one. May double
    /// the bucket count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chained_hash::ChainedHashTable;
    ///
    /// let mut table = ChainedHashTable::new();
    /// for key in 0..7 {
    ///     table.insert(key, key * 10);
    /// }
    /// // 7 / 8 exceeds the 0.75 upper bound.
    /// assert_eq!(table.capacity(), 16);
    /// assert!((0..7).all(|key| table.get(key) == Some(key * 10)));
    /// ```
    pub fn insert(&mut self, key: Key, value: Value) {
        let index = self.bucket_index(key);
        self.buckets[index].insert(key, value);
        self.populated += 1;
        self.check_load_factor(Mutation::Insert);
    }

    /// Removes the most recently inserted entry for `key` and returns its
    /// value.
    ///
    /// If `key` is absent nothing changes: the size is not decremented and no
    /// resize happens. May halve the bucket count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chained_hash::ChainedHashTable;
    ///
    /// let mut table = ChainedHashTable::new();
    /// table.insert(1, 10);
    /// table.insert(1, 11);
    /// assert_eq!(table.remove(1), Some(11));
    /// assert_eq!(table.remove(1), Some(10));
    /// assert_eq!(table.remove(1), None);
    /// assert!(table.is_empty());
    /// ```
    pub fn remove(&mut self, key: Key) -> Option<Value> {
        let index = self.bucket_index(key);
        let removed = self.buckets[index].remove(key)?;
        self.populated -= 1;
        self.check_load_factor(Mutation::Remove);
        Some(removed)
    }

    /// Returns the value of the most recently inserted entry for `key`.
    pub fn get(&self, key: Key) -> Option<Value> {
        self.buckets[self.bucket_index(key)].get(key)
    }

    /// Returns `true` if the table holds at least one entry for `key`.
    pub fn contains_key(&self, key: Key) -> bool {
        self.buckets[self.bucket_index(key)].contains_key(key)
    }

    /// Removes every entry. The bucket count is left unchanged.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.populated = 0;
    }

    /// Returns an iterator over all `(key, value)` entries.
    ///
    /// The order is unspecified but does not change until the table is next
    /// mutated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chained_hash::ChainedHashTable;
    ///
    /// let table: ChainedHashTable = [(1, 10), (2, 20)].into_iter().collect();
    /// let mut entries: Vec<_> = table.iter().collect();
    /// entries.sort();
    /// assert_eq!(entries, vec![(1, 10), (2, 20)]);
    /// ```
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            buckets: self.buckets.iter(),
            chain: None,
            remaining: self.populated,
        }
    }

    #[inline(always)]
    fn bucket_index(&self, key: Key) -> usize {
        self.hasher.bucket_index(key, self.buckets.len())
    }

    fn check_load_factor(&mut self, mutation: Mutation) {
        if let Some(new_capacity) =
            self.policy
                .evaluate(mutation, self.populated, self.buckets.len())
        {
            self.resize(new_capacity);
        }
    }

    /// Rehashes every entry into `new_capacity` fresh buckets.
    ///
    /// Each old chain is walked from tail to head and prepended into its new
    /// chain, so entries sharing a key keep their relative order and the most
    /// recent one still shadows the rest.
    fn resize(&mut self, new_capacity: usize) {
        let new_capacity = new_capacity.max(1);
        debug_log!(
            "resizing chained hash table from {} to {} buckets ({} entries)",
            self.buckets.len(),
            new_capacity,
            self.populated
        );

        let mut buckets = alloc_buckets(new_capacity);
        for bucket in &self.buckets {
            for (key, value) in bucket.iter().rev() {
                let index = self.hasher.bucket_index(key, new_capacity);
                buckets[index].insert(key, value);
            }
        }

        debug_assert_eq!(
            buckets.iter().map(Bucket::len).sum::<usize>(),
            self.populated
        );
        self.buckets = buckets;
    }

    /// Returns, for every chain length `n`, the number of buckets whose chain
    /// has exactly `n` entries.
    ///
    /// Available in tests and with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_length_histogram(&self) -> Vec<usize> {
        let longest = self.buckets.iter().map(Bucket::len).max().unwrap_or(0);
        let mut hist = alloc::vec![0usize; longest + 1];
        for bucket in &self.buckets {
            hist[bucket.len()] += 1;
        }
        hist
    }

    /// Returns chain statistics for debugging.
    ///
    /// Available in tests and with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let occupied_buckets = self.buckets.iter().filter(|b| !b.is_empty()).count();
        let longest_chain = self.buckets.iter().map(Bucket::len).max().unwrap_or(0);

        DebugStats {
            populated: self.populated,
            capacity: self.buckets.len(),
            occupied_buckets,
            longest_chain,
            load_factor: self.load_factor(),
            mean_occupied_chain: if occupied_buckets == 0 {
                0.0
            } else {
                self.populated as f64 / occupied_buckets as f64
            },
        }
    }

    /// Panics unless every entry sits in the bucket its key hashes to, the
    /// chains are well linked, and `len` matches the live entries.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        assert!(!self.buckets.is_empty());
        let mut total = 0;
        for (index, bucket) in self.buckets.iter().enumerate() {
            bucket.assert_links();
            for (key, _) in bucket.iter() {
                assert_eq!(
                    self.bucket_index(key),
                    index,
                    "key {key} is in the wrong bucket"
                );
            }
            total += bucket.len();
        }
        assert_eq!(total, self.populated);
    }
}

impl<H: BucketHasher> Extend<(Key, Value)> for ChainedHashTable<H> {
    fn extend<T: IntoIterator<Item = (Key, Value)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl FromIterator<(Key, Value)> for ChainedHashTable<Fibonacci> {
    fn from_iter<T: IntoIterator<Item = (Key, Value)>>(iter: T) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<'a, H: BucketHasher> IntoIterator for &'a ChainedHashTable<H> {
    type Item = (Key, Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn alloc_buckets(capacity: usize) -> Vec<Bucket> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, Bucket::new);
    buckets
}

/// Configures and creates a [`ChainedHashTable`].
///
/// # Examples
///
/// ```rust
/// use chained_hash::ChainedHashTable;
/// use chained_hash::policy::ResizePolicy;
///
/// let table = ChainedHashTable::builder()
///     .initial_capacity(32)
///     .resize_policy(ResizePolicy::new(0.1, 2.0)?)
///     .build();
/// assert_eq!(table.capacity(), 32);
/// assert_eq!(table.policy().max_load_factor(), 2.0);
/// # Ok::<(), chained_hash::policy::PolicyError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TableBuilder<H> {
    initial_capacity: usize,
    policy: ResizePolicy,
    hasher: H,
}

impl Default for TableBuilder<Fibonacci> {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            policy: ResizePolicy::default(),
            hasher: Fibonacci,
        }
    }
}

impl<H: BucketHasher> TableBuilder<H> {
    /// Sets the initial bucket count. Zero is raised to one.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity.max(1);
        self
    }

    /// Sets the load-factor bounds that drive resizing.
    pub fn resize_policy(mut self, policy: ResizePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the bucket hasher.
    pub fn hasher<T: BucketHasher>(self, hasher: T) -> TableBuilder<T> {
        TableBuilder {
            initial_capacity: self.initial_capacity,
            policy: self.policy,
            hasher,
        }
    }

    /// Creates the table.
    pub fn build(self) -> ChainedHashTable<H> {
        ChainedHashTable::from_parts(self.initial_capacity, self.policy, self.hasher)
    }
}

/// An iterator over the entries of a [`ChainedHashTable`].
///
/// This struct is created by [`ChainedHashTable::iter`]. Entries are yielded
/// bucket by bucket, each chain from head to tail.
#[derive(Clone)]
pub struct Iter<'a> {
    buckets: core::slice::Iter<'a, Bucket>,
    chain: Option<bucket::Iter<'a>>,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = (Key, Value);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(entry);
            }
            self.chain = Some(self.buckets.next()?.iter());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
