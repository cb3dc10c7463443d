use core::fmt;

use crate::raw::{Handle, InsertResult, RawRBTreeMap};

/// A view into a single entry in a map, which may either be vacant or
/// occupied.
///
/// This `enum` is constructed from the [`entry`] method on
/// [`crate::RBTreeMap`].
///
/// # Examples
///
/// ```
/// use crimson_tree::RBTreeMap;
/// use crimson_tree::rbtree_map::Entry;
///
/// let mut map = RBTreeMap::new();
///
/// match map.entry("ash") {
///     Entry::Vacant(v) => {
///         v.insert(1);
///     }
///     Entry::Occupied(mut o) => {
///         *o.get_mut() += 1;
///     }
/// }
/// assert_eq!(map["ash"], 1);
/// ```
///
/// [`entry`]: crate::RBTreeMap::entry
pub enum Entry<'a, K: 'a, V: 'a> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),

    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<K: fmt::Debug + Ord, V: fmt::Debug> fmt::Debug for Entry<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Vacant(v) => f.debug_tuple("Entry").field(v).finish(),
            Entry::Occupied(o) => f.debug_tuple("Entry").field(o).finish(),
        }
    }
}

/// A view into a vacant entry in a `RBTreeMap`.
/// It is part of the [`Entry`] enum.
///
/// # Examples
///
/// ```
/// use crimson_tree::RBTreeMap;
/// use crimson_tree::rbtree_map::Entry;
///
/// let mut map = RBTreeMap::new();
///
/// if let Entry::Vacant(v) = map.entry("ash") {
///     v.insert(5);
/// }
/// assert_eq!(map["ash"], 5);
/// ```
pub struct VacantEntry<'a, K, V> {
    pub(crate) key: K,
    pub(crate) tree: &'a mut RawRBTreeMap<K, V>,
}

impl<K: fmt::Debug + Ord, V> fmt::Debug for VacantEntry<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VacantEntry").field("key", &self.key).finish()
    }
}

/// A view into an occupied entry in a `RBTreeMap`.
/// It is part of the [`Entry`] enum.
///
/// # Examples
///
/// ```
/// use crimson_tree::RBTreeMap;
/// use crimson_tree::rbtree_map::Entry;
///
/// let mut map = RBTreeMap::new();
/// map.insert("ash", 1);
///
/// if let Entry::Occupied(mut o) = map.entry("ash") {
///     *o.get_mut() += 1;
/// }
/// assert_eq!(map["ash"], 2);
/// ```
pub struct OccupiedEntry<'a, K, V> {
    /// Handle to the live node holding the entry.
    pub(crate) node: Handle,
    pub(crate) tree: &'a mut RawRBTreeMap<K, V>,
}

impl<K: fmt::Debug + Ord, V: fmt::Debug> fmt::Debug for OccupiedEntry<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OccupiedEntry").field("key", self.key()).field("value", self.get()).finish()
    }
}

impl<'a, K: Ord, V> Entry<'a, K, V> {
    /// Ensures a value is in the entry by inserting the default if empty,
    /// and returns a mutable reference to the value in the entry.
    ///
    /// # Complexity
    ///
    /// O(log n) if vacant (insertion), O(1) if occupied.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<&str, usize> = RBTreeMap::new();
    /// map.entry("meadow").or_insert(12);
    ///
    /// assert_eq!(map["meadow"], 12);
    /// ```
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(default),
        }
    }

    /// Ensures a value is in the entry by inserting the result of the
    /// default function if empty, and returns a mutable reference to the
    /// value in the entry.
    ///
    /// # Complexity
    ///
    /// O(log n) if vacant (insertion), O(1) if occupied.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<&str, String> = RBTreeMap::new();
    /// let s = "hoho".to_string();
    ///
    /// map.entry("meadow").or_insert_with(|| s);
    ///
    /// assert_eq!(map["meadow"], "hoho".to_string());
    /// ```
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(default()),
        }
    }

    /// Returns a reference to this entry's key.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<&str, usize> = RBTreeMap::new();
    /// assert_eq!(map.entry("meadow").key(), &"meadow");
    /// ```
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(o) => o.key(),
            Entry::Vacant(v) => v.key(),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts into the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<&str, usize> = RBTreeMap::new();
    ///
    /// map.entry("meadow").and_modify(|e| *e += 1).or_insert(42);
    /// assert_eq!(map["meadow"], 42);
    ///
    /// map.entry("meadow").and_modify(|e| *e += 1).or_insert(42);
    /// assert_eq!(map["meadow"], 43);
    /// ```
    #[must_use]
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut o) => {
                f(o.get_mut());
                Entry::Occupied(o)
            }
            Entry::Vacant(v) => Entry::Vacant(v),
        }
    }
}

impl<'a, K: Ord, V: Default> Entry<'a, K, V> {
    /// Ensures a value is in the entry by inserting the default value if
    /// empty, and returns a mutable reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<&str, Option<usize>> = RBTreeMap::new();
    /// map.entry("meadow").or_default();
    ///
    /// assert_eq!(map["meadow"], None);
    /// ```
    pub fn or_default(self) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(V::default()),
        }
    }
}

impl<'a, K: Ord, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a
    /// value through the `VacantEntry`.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes ownership of the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    /// use crimson_tree::rbtree_map::Entry;
    ///
    /// let mut map: RBTreeMap<&str, usize> = RBTreeMap::new();
    ///
    /// if let Entry::Vacant(v) = map.entry("meadow") {
    ///     assert_eq!(v.into_key(), "meadow");
    /// }
    /// ```
    #[must_use]
    pub fn into_key(self) -> K {
        self.key
    }

    /// Sets the value of the entry with the `VacantEntry`'s key, and
    /// returns a mutable reference to it.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<&str, u32> = RBTreeMap::new();
    /// map.entry("meadow").or_insert(37);
    /// assert_eq!(map["meadow"], 37);
    /// ```
    pub fn insert(self, value: V) -> &'a mut V {
        let tree = self.tree;
        match tree.insert(self.key, value, Handle::NIL) {
            InsertResult::Inserted(node) => {
                let value_handle = tree.node(node).value();
                tree.value_mut(value_handle)
            }
            InsertResult::Duplicate { .. } => {
                unreachable!("`VacantEntry::insert()` - the key is already present!")
            }
        }
    }
}

impl<'a, K: Ord, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    #[must_use]
    pub fn key(&self) -> &K {
        self.tree.node(self.node).key()
    }

    /// Gets a reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    /// use crimson_tree::rbtree_map::Entry;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert("meadow", 12);
    ///
    /// if let Entry::Occupied(o) = map.entry("meadow") {
    ///     assert_eq!(o.get(), &12);
    /// }
    /// ```
    #[must_use]
    pub fn get(&self) -> &V {
        let value = self.tree.node(self.node).value();
        self.tree.value(value)
    }

    /// Gets a mutable reference to the value in the entry.
    ///
    /// If you need a reference to the `OccupiedEntry` that may outlive the
    /// destruction of the `Entry` value, see [`into_mut`].
    ///
    /// [`into_mut`]: OccupiedEntry::into_mut
    pub fn get_mut(&mut self) -> &mut V {
        let value = self.tree.node(self.node).value();
        self.tree.value_mut(value)
    }

    /// Converts the entry into a mutable reference to its value.
    ///
    /// If you need multiple references to the `OccupiedEntry`, see
    /// [`get_mut`].
    ///
    /// [`get_mut`]: OccupiedEntry::get_mut
    #[must_use]
    pub fn into_mut(self) -> &'a mut V {
        let value = self.tree.node(self.node).value();
        self.tree.value_mut(value)
    }

    /// Sets the value of the entry with the `OccupiedEntry`'s key, and
    /// returns the entry's old value.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    /// use crimson_tree::rbtree_map::Entry;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert("meadow", 12);
    ///
    /// if let Entry::Occupied(mut o) = map.entry("meadow") {
    ///     assert_eq!(o.insert(15), 12);
    /// }
    /// assert_eq!(map["meadow"], 15);
    /// ```
    pub fn insert(&mut self, value: V) -> V {
        self.tree.replace_value(self.node, value)
    }

    /// Takes the key and value of the entry out of the map, and returns
    /// them.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    /// use crimson_tree::rbtree_map::Entry;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert("meadow", 12);
    ///
    /// if let Entry::Occupied(o) = map.entry("meadow") {
    ///     assert_eq!(o.remove_entry(), ("meadow", 12));
    /// }
    /// assert!(!map.contains_key("meadow"));
    /// ```
    #[must_use = "use `remove` if the key and value are not needed"]
    pub fn remove_entry(self) -> (K, V) {
        match self.tree.erase(self.node) {
            Some(entry) => entry,
            None => unreachable!("`OccupiedEntry::remove_entry()` - the node is always live!"),
        }
    }

    /// Takes the value of the entry out of the map, and returns it.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    /// use crimson_tree::rbtree_map::Entry;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert("meadow", 12);
    ///
    /// if let Entry::Occupied(o) = map.entry("meadow") {
    ///     assert_eq!(o.remove(), 12);
    /// }
    /// assert!(!map.contains_key("meadow"));
    /// ```
    pub fn remove(self) -> V {
        self.remove_entry().1
    }
}
