use super::RBTreeMap;
use crate::raw::RawRBTreeMap;

impl<K, V> RBTreeMap<K, V> {
    /// Creates an empty map with capacity for at least `capacity` elements.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, i32> = RBTreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RBTreeMap {
            raw: RawRBTreeMap::with_capacity(capacity),
        }
    }

    /// Returns the current capacity for the map.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, i32> = RBTreeMap::with_capacity(32);
    /// assert_eq!(map.capacity(), 32);
    /// ```
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
