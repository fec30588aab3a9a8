use crate::error::AllocError;

/// Controls how much a [`DynamicArray`](crate::DynamicArray) grows when a push finds it full.
///
/// The factor is the rational `numerator / denominator` and must be greater than one.
/// The default is `3 / 2`, which keeps appends amortized O(1) while wasting at most
/// half of the buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Growth {
    numerator: usize,
    denominator: usize,
}

impl Growth {
    /// Growth by 1.5x.
    pub const DEFAULT: Self = Self {
        numerator: 3,
        denominator: 2,
    };

    /// Growth by 2x.
    pub const DOUBLE: Self = Self {
        numerator: 2,
        denominator: 1,
    };

    /// Constructs a growth factor of `numerator / denominator`.
    ///
    /// Returns `None` if the factor is not greater than one.
    pub const fn new(numerator: usize, denominator: usize) -> Option<Self> {
        if denominator == 0 || numerator <= denominator {
            None
        } else {
            Some(Self {
                numerator,
                denominator,
            })
        }
    }

    /// Returns the numerator of the factor, `3` for the default.
    pub const fn numerator(&self) -> usize {
        self.numerator
    }

    /// Returns the denominator of the factor, `2` for the default.
    pub const fn denominator(&self) -> usize {
        self.denominator
    }

    /// Returns the capacity that follows `capacity` when the buffer is full.
    ///
    /// An empty buffer grows to exactly one slot. Otherwise the result is
    /// `floor(capacity * factor)`, bumped to `capacity + 1` when rounding would stall.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the next capacity does not fit in a `usize`.
    pub fn next_capacity(&self, capacity: usize) -> Result<usize, AllocError> {
        if capacity == 0 {
            return Ok(1);
        }

        // capacity * n / d, split so the intermediate product only overflows when the result would
        let whole = (capacity / self.denominator).checked_mul(self.numerator);
        let part = (capacity % self.denominator).checked_mul(self.numerator);
        let grown = match (whole, part) {
            (Some(whole), Some(part)) => whole.checked_add(part / self.denominator),
            _ => None,
        }
        .ok_or(AllocError::CapacityOverflow)?;

        let min = capacity
            .checked_add(1)
            .ok_or(AllocError::CapacityOverflow)?;
        Ok(grown.max(min))
    }
}

impl Default for Growth {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sequence_from_empty() {
        let growth = Growth::default();
        let mut capacity = 0;
        let mut seen = vec![];
        for _ in 0..10 {
            capacity = growth.next_capacity(capacity).unwrap();
            seen.push(capacity);
        }
        assert_eq!(seen, [1, 2, 3, 4, 6, 9, 13, 19, 28, 42]);
    }

    #[test]
    fn doubling() {
        let growth = Growth::DOUBLE;
        assert_eq!(growth.next_capacity(0), Ok(1));
        assert_eq!(growth.next_capacity(1), Ok(2));
        assert_eq!(growth.next_capacity(64), Ok(128));
    }

    #[test]
    fn rejects_factors_not_above_one() {
        assert_eq!(Growth::new(1, 1), None);
        assert_eq!(Growth::new(2, 3), None);
        assert_eq!(Growth::new(5, 0), None);
        assert_eq!(Growth::new(5, 4).map(|g| g.next_capacity(4)), Some(Ok(5)));
    }

    #[test]
    fn factor_parts() {
        let growth = Growth::default();
        assert_eq!((growth.numerator(), growth.denominator()), (3, 2));
        let growth = Growth::new(7, 4).unwrap();
        assert_eq!((growth.numerator(), growth.denominator()), (7, 4));
    }

    #[test]
    fn large_capacities_do_not_overflow_early() {
        let growth = Growth::default();
        let capacity = usize::MAX / 2;
        assert_eq!(
            growth.next_capacity(capacity),
            Ok(capacity / 2 * 3 + (capacity % 2) * 3 / 2)
        );
        assert_eq!(
            growth.next_capacity(usize::MAX),
            Err(AllocError::CapacityOverflow)
        );
    }
}
