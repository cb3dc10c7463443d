use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Index of a slot in an arena.
///
/// Stored as `index + 1` in a `NonZero` so `Option<Handle>` pays no extra
/// space. Index 0 is permanently reserved for the tree's shared sentinel
/// node, exposed as [`Handle::NIL`]; every "no child" / "no parent" link in
/// the tree is that handle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    /// The reserved sentinel slot.
    pub(crate) const NIL: Self = Self::from_index(0);

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        // SAFETY: `index + 1` cannot be zero and cannot overflow.
        #[allow(clippy::cast_possible_truncation)]
        Self(NonZero::new((index + 1) as RawHandle).unwrap())
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }

    /// Returns true for the sentinel handle.
    #[inline]
    pub(crate) const fn is_nil(self) -> bool {
        self.0.get() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // Verify our assumptions about `Handle` and the niche optimization.
    assert_eq_size!(Handle, Option<Handle>);
    assert_eq_size!(Handle, RawHandle);

    #[test]
    fn nil_is_slot_zero() {
        assert_eq!(Handle::NIL.to_index(), 0);
        assert!(Handle::NIL.is_nil());
        assert!(!Handle::from_index(1).is_nil());
    }

    #[test]
    #[should_panic(expected = "`Handle::from_index()` - `index` > `Handle::MAX`!")]
    fn invalid_handle() {
        let _ = Handle::from_index(Handle::MAX + 1);
    }

    proptest! {
        #[test]
        fn handle_round_trip(index in 0..=Handle::MAX) {
            let handle = Handle::from_index(index);
            assert_eq!(handle.to_index(), index);
            assert_eq!(handle.is_nil(), index == 0);
        }
    }
}
