use num_traits::{PrimInt, ToPrimitive};

/// An integer that can name a position in a [`DynamicArray`](crate::DynamicArray).
///
/// Checked access accepts any primitive integer. Negative values never name a position.
pub trait Position: PrimInt {
    /// Returns the position as a `usize`, or `None` if it is negative or too large.
    fn to_index(self) -> Option<usize>;

    /// Returns the position widened for error reports.
    fn to_report(self) -> i128;
}

macro_rules! impl_position {
    ($($ty:ty),*) => {
        $(
            impl Position for $ty {
                #[inline]
                fn to_index(self) -> Option<usize> {
                    self.to_usize()
                }

                fn to_report(self) -> i128 {
                    self.to_i128().unwrap_or(i128::MAX)
                }
            }
        )*
    };
}

impl_position!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);
