use crate::Key;

/// The fractional part of the golden ratio, `0.6180339887498949`, as a 64-bit
/// fixed-point fraction.
pub const GOLDEN_RATIO_FRACTION: u64 = 0x9E37_79B9_7F4A_7C15;

/// Maps a key to one of `capacity` buckets.
///
/// Implementations must be pure: the same hasher value, key and capacity always
/// produce the same index, and for `capacity >= 1` the index is in
/// `0..capacity`. The table recomputes the index with its current capacity on
/// every operation, so an implementation must not cache anything derived from a
/// previous capacity.
pub trait BucketHasher {
    /// Returns the bucket index for `key` in a table with `capacity` buckets.
    fn bucket_index(&self, key: Key, capacity: usize) -> usize;
}

/// Scales a 64-bit fraction `f / 2^64` into `0..capacity`.
///
/// This is `floor(capacity * f / 2^64)` computed with a widening multiply, so
/// the result is strictly below `capacity` for any `capacity >= 1`.
#[inline(always)]
fn scale(fraction: u64, capacity: usize) -> usize {
    ((fraction as u128 * capacity as u128) >> 64) as usize
}

/// Multiplicative (Fibonacci) hashing.
///
/// Computes `floor(capacity * frac(key * A))` where `A` is the fractional part
/// of the golden ratio. The product `key * A` is evaluated in 64-bit fixed
/// point: the wrapping multiply keeps exactly the fractional bits, and the
/// two's complement representation of negative keys makes the fraction the
/// floor-based one (`x - floor(x)`), so every key, negative or not, lands in
/// `0..capacity`.
///
/// # Examples
///
/// ```rust
/// use chained_hash::hasher::BucketHasher;
/// use chained_hash::hasher::Fibonacci;
///
/// let hasher = Fibonacci;
/// for key in [-3, 0, 10, i64::MAX, i64::MIN] {
///     assert!(hasher.bucket_index(key, 13) < 13);
/// }
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Fibonacci;

impl BucketHasher for Fibonacci {
    #[inline(always)]
    fn bucket_index(&self, key: Key, capacity: usize) -> usize {
        scale((key as u64).wrapping_mul(GOLDEN_RATIO_FRACTION), capacity)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        use core::hash::BuildHasher;

        /// Hashes keys with foldhash before reducing them into the bucket range.
        ///
        /// Useful when keys are adversarial or strongly patterned in their low
        /// bits. The seed is fixed per hasher value, so the mapping stays stable
        /// for the lifetime of a table.
        #[derive(Debug, Clone)]
        pub struct FoldHashIndex {
            state: foldhash::fast::FixedState,
        }

        impl FoldHashIndex {
            /// Creates a hasher with the given seed.
            pub fn with_seed(seed: u64) -> Self {
                Self {
                    state: foldhash::fast::FixedState::with_seed(seed),
                }
            }
        }

        impl Default for FoldHashIndex {
            fn default() -> Self {
                Self::with_seed(GOLDEN_RATIO_FRACTION)
            }
        }

        impl BucketHasher for FoldHashIndex {
            #[inline(always)]
            fn bucket_index(&self, key: Key, capacity: usize) -> usize {
                scale(self.state.hash_one(key), capacity)
            }
        }
    }
}
