//! Sentinel-based index trait for node links.
//!
//! Every node in the skip list carries four links (left, right, up, down).
//! Using a reserved sentinel value (e.g. `usize::MAX`) instead of
//! `Option<Idx>` keeps those links a single machine word each.

/// A copyable storage index with a sentinel "none" value.
///
/// # Example
///
/// ```
/// use nexus_skiplist::Index;
///
/// let idx: usize = 5;
/// let none: usize = usize::NONE;
///
/// assert!(idx.is_some());
/// assert!(none.is_none());
/// ```
pub trait Index: Copy + Eq {
    /// Sentinel value representing an absent link.
    const NONE: Self;

    /// Returns `true` if this is the sentinel value.
    #[inline]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Returns `true` if this is not the sentinel value.
    #[inline]
    fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Returns the index as a `usize`, for diagnostics and logging.
    fn as_usize(self) -> usize;
}

macro_rules! impl_index_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Index for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn as_usize(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_index_for_unsigned!(u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_index_sentinel {
        ($($ty:ty => $name:ident),*) => {
            $(
                #[test]
                fn $name() {
                    assert!(<$ty>::NONE.is_none());
                    assert!(!<$ty>::NONE.is_some());
                    assert!((0 as $ty).is_some());
                    assert!((<$ty>::MAX - 1).is_some());
                }
            )*
        };
    }

    test_index_sentinel!(
        u16 => u16_sentinel,
        u32 => u32_sentinel,
        u64 => u64_sentinel,
        usize => usize_sentinel
    );

    #[test]
    fn as_usize_widens() {
        assert_eq!(7u16.as_usize(), 7);
        assert_eq!(65_535u32.as_usize(), 65_535);
        assert_eq!(usize::NONE.as_usize(), usize::MAX);
    }
}
