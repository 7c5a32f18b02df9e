/// Load factor below which a removal halves the bucket count.
pub const MIN_LOAD_FACTOR: f64 = 0.25;

/// Load factor above which an insertion doubles the bucket count.
pub const MAX_LOAD_FACTOR: f64 = 0.75;

/// The kind of mutation that just changed a table's size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// An entry was added.
    Insert,
    /// An entry was removed.
    Remove,
}

/// Error returned by [`ResizePolicy::new`] for unusable load-factor bounds.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum PolicyError {
    /// One of the bounds is NaN or infinite.
    #[error("load factors must be finite (got min {min}, max {max})")]
    NotFinite {
        /// The requested lower bound.
        min: f64,
        /// The requested upper bound.
        max: f64,
    },
    /// The lower bound is negative.
    #[error("minimum load factor must not be negative (got {0})")]
    NegativeMin(f64),
    /// The upper bound is zero or negative.
    #[error("maximum load factor must be positive (got {0})")]
    NonPositiveMax(f64),
    /// The lower bound is not strictly below the upper bound.
    #[error("minimum load factor {min} must be below maximum load factor {max}")]
    InvertedBounds {
        /// The requested lower bound.
        min: f64,
        /// The requested upper bound.
        max: f64,
    },
    /// The upper bound is less than twice the lower bound, so halving the
    /// bucket count could leave the table above the upper bound.
    #[error("maximum load factor {max} must be at least twice the minimum load factor {min}")]
    BandTooNarrow {
        /// The requested lower bound.
        min: f64,
        /// The requested upper bound.
        max: f64,
    },
}

/// Decides when a table grows or shrinks.
///
/// The decision is a pure function of the mutation that just happened, the
/// table's size and its bucket count. An insertion can only push the load
/// factor up, so it is only checked against the upper bound; a removal is only
/// checked against the lower bound. One mutation therefore never both grows
/// and shrinks the table.
///
/// # Examples
///
/// ```rust
/// use chained_hash::policy::Mutation;
/// use chained_hash::policy::ResizePolicy;
///
/// let policy = ResizePolicy::default();
/// assert_eq!(policy.evaluate(Mutation::Insert, 7, 8), Some(16));
/// assert_eq!(policy.evaluate(Mutation::Insert, 6, 8), None);
/// assert_eq!(policy.evaluate(Mutation::Remove, 3, 16), Some(8));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizePolicy {
    min_load_factor: f64,
    max_load_factor: f64,
}

impl Default for ResizePolicy {
    fn default() -> Self {
        Self {
            min_load_factor: MIN_LOAD_FACTOR,
            max_load_factor: MAX_LOAD_FACTOR,
        }
    }
}

impl ResizePolicy {
    /// Creates a policy with custom bounds.
    ///
    /// Both bounds must be finite, `min` must be non-negative, `max` must be
    /// positive, and `max` must be at least `2 * min` (which also puts `min`
    /// strictly below `max`). A `min` of zero disables shrinking.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chained_hash::policy::PolicyError;
    /// use chained_hash::policy::ResizePolicy;
    ///
    /// assert!(ResizePolicy::new(0.1, 0.9).is_ok());
    /// assert_eq!(
    ///     ResizePolicy::new(0.8, 0.5),
    ///     Err(PolicyError::InvertedBounds { min: 0.8, max: 0.5 })
    /// );
    /// ```
    pub fn new(min: f64, max: f64) -> Result<Self, PolicyError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(PolicyError::NotFinite { min, max });
        }
        if min < 0.0 {
            return Err(PolicyError::NegativeMin(min));
        }
        if max <= 0.0 {
            return Err(PolicyError::NonPositiveMax(max));
        }
        if min >= max {
            return Err(PolicyError::InvertedBounds { min, max });
        }
        if max < 2.0 * min {
            return Err(PolicyError::BandTooNarrow { min, max });
        }
        Ok(Self {
            min_load_factor: min,
            max_load_factor: max,
        })
    }

    /// The lower load-factor bound.
    pub fn min_load_factor(&self) -> f64 {
        self.min_load_factor
    }

    /// The upper load-factor bound.
    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    /// Returns the bucket count the table should move to after `mutation`, or
    /// `None` to keep `capacity`.
    ///
    /// Growth doubles the bucket count; shrinking halves it with integer
    /// division and never goes below one bucket. A shrink that would leave the
    /// load factor above the upper bound is skipped, which can only happen when
    /// an odd bucket count is halved.
    pub fn evaluate(&self, mutation: Mutation, size: usize, capacity: usize) -> Option<usize> {
        let load = load_factor(size, capacity);
        match mutation {
            Mutation::Insert if load > self.max_load_factor => {
                let grown = capacity.saturating_mul(2);
                (grown != capacity).then_some(grown)
            }
            Mutation::Remove if load < self.min_load_factor && capacity > 1 => {
                let shrunk = (capacity / 2).max(1);
                (load_factor(size, shrunk) <= self.max_load_factor).then_some(shrunk)
            }
            _ => None,
        }
    }
}

/// Returns `size / capacity`.
///
/// A zero capacity never occurs in a table; it is reported as an infinitely
/// loaded table rather than dividing by zero.
#[inline]
pub fn load_factor(size: usize, capacity: usize) -> f64 {
    if capacity == 0 {
        return f64::INFINITY;
    }
    size as f64 / capacity as f64
}
