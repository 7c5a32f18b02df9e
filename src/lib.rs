#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

cfg_if::cfg_if! {
    if #[cfg(feature = "logging")] {
        macro_rules! debug_log {
            ($($arg:tt)*) => { log::debug!($($arg)*) };
        }
    } else {
        macro_rules! debug_log {
            ($($arg:tt)*) => {
                if false {
                    let _ = format_args!($($arg)*);
                }
            };
        }
    }
}

/// Key type stored in the table.
pub type Key = i64;

/// Value type stored in the table.
pub type Value = i64;

/// Doubly linked chains used as hash buckets.
///
/// Each bucket keeps its nodes in a small arena and links them by index, so
/// unlinking a node is O(1) once it has been found and freed slots are reused
/// by later insertions. New entries go to the front of the chain.
pub mod bucket;

/// Key-to-bucket mapping strategies.
pub mod hasher;

pub mod hash_table;

/// Load-factor driven grow/shrink decisions.
///
/// A [`ResizePolicy`] is a pure function from the last mutation, the table
/// size and the bucket count to an optional new bucket count. Insertions are
/// checked against the upper bound only and removals against the lower bound
/// only.
pub mod policy;

pub use hash_table::ChainedHashTable;
pub use hash_table::TableBuilder;
pub use hasher::BucketHasher;
pub use hasher::Fibonacci;
pub use policy::PolicyError;
pub use policy::ResizePolicy;
