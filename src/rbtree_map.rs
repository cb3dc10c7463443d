use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ops::{Bound, Index, RangeBounds};

use crate::raw::{Handle, InsertResult, RawRBTreeMap};

mod capacity;
mod entry;

pub use entry::{Entry, OccupiedEntry, VacantEntry};

/// Validates that the start bound does not exceed the end bound.
///
/// # Panics
///
/// Panics if `start > end` or if `start == end` and both bounds are `Excluded`.
fn validate_range_bounds<T, R>(range: &R)
where
    T: ?Sized + Ord,
    R: RangeBounds<T>,
{
    if let (Bound::Included(start) | Bound::Excluded(start), Bound::Included(end) | Bound::Excluded(end)) =
        (range.start_bound(), range.end_bound())
    {
        let valid =
            if matches!(range.start_bound(), Bound::Excluded(_)) && matches!(range.end_bound(), Bound::Excluded(_)) {
                start < end
            } else {
                start <= end
            };
        assert!(valid, "range start is greater than range end in RBTreeMap");
    }
}

/// An ordered map based on a [red-black tree].
///
/// Given a key type with a [total order], an ordered map stores its entries
/// in key order. That means that keys must be of a type that implements the
/// [`Ord`] trait, such that two keys can always be compared to determine
/// their [`Ordering`]. Examples of keys with a total order are strings with
/// lexicographical order, and numbers with their natural order.
///
/// Iterators obtained from functions such as [`RBTreeMap::iter`],
/// [`RBTreeMap::into_iter`], [`RBTreeMap::values`], or [`RBTreeMap::keys`]
/// produce their items in key order, and take worst-case logarithmic time
/// per item returned.
///
/// Every entry occupies its own tree node, and nodes never move while they
/// live: inserting or removing one key leaves references obtained for other
/// keys untouched. Insertion, lookup, and removal are all O(log n) in the
/// worst case, kept that way by the red-black rebalancing rules.
///
/// It is a logic error for a key to be modified in such a way that the
/// key's ordering relative to any other key, as determined by the [`Ord`]
/// trait, changes while it is in the map. This is normally only possible
/// through [`Cell`], [`RefCell`], global state, I/O, or unsafe code. The
/// behavior resulting from such a logic error is not specified (it could
/// include panics, incorrect results, or non-termination) but will not be
/// undefined behavior.
///
/// # Examples
///
/// ```
/// use crimson_tree::RBTreeMap;
///
/// // type inference lets us omit an explicit type signature (which
/// // would be `RBTreeMap<&str, u32>` in this example).
/// let mut tide_tables = RBTreeMap::new();
///
/// // chart some harbors.
/// tide_tables.insert("Anchorage", 350);
/// tide_tables.insert("Bristol", 1300);
/// tide_tables.insert("Saint-Malo", 1200);
///
/// // check for a specific one.
/// if !tide_tables.contains_key("Fundy") {
///     println!("We chart {} harbors, but not Fundy.", tide_tables.len());
/// }
///
/// // oops, that reading was in the wrong unit.
/// tide_tables.remove("Anchorage");
///
/// // look up the values associated with some keys.
/// let to_find = ["Bristol", "Fundy"];
/// for harbor in &to_find {
///     match tide_tables.get(harbor) {
///         Some(range) => println!("{harbor}: {range} cm"),
///         None => println!("{harbor} is uncharted."),
///     }
/// }
///
/// // iterate over everything, in alphabetical order.
/// for (harbor, range) in &tide_tables {
///     println!("{harbor}: {range} cm");
/// }
/// ```
///
/// An `RBTreeMap` with a known list of items can be initialized from an array:
///
/// ```
/// use crimson_tree::RBTreeMap;
///
/// let solar_distance = RBTreeMap::from([
///     ("Mercury", 0.4),
///     ("Venus", 0.7),
///     ("Earth", 1.0),
///     ("Mars", 1.5),
/// ]);
/// ```
///
/// `RBTreeMap` implements an [`Entry API`], which allows for complex
/// methods of getting, setting, updating and removing keys and their values:
///
/// [`Entry API`]: RBTreeMap::entry
///
/// ```
/// use crimson_tree::RBTreeMap;
///
/// let mut sightings = RBTreeMap::new();
///
/// // count a sighting, whether or not the species is already known.
/// *sightings.entry("heron").or_insert(0) += 1;
/// *sightings.entry("heron").or_insert(0) += 1;
/// *sightings.entry("curlew").or_insert(0) += 1;
///
/// assert_eq!(sightings["heron"], 2);
/// assert_eq!(sightings["curlew"], 1);
/// ```
///
/// [red-black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
/// [total order]: https://en.wikipedia.org/wiki/Total_order
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
pub struct RBTreeMap<K, V> {
    raw: RawRBTreeMap<K, V>,
}

/// An iterator over the entries of a `RBTreeMap`.
///
/// This `struct` is created by the [`iter`] method on [`RBTreeMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use crimson_tree::RBTreeMap;
///
/// let map = RBTreeMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: RBTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    tree: *const RawRBTreeMap<K, V>,
    front: Handle,
    back: Handle,
    remaining: usize,
    _marker: PhantomData<&'a RawRBTreeMap<K, V>>,
}

// SAFETY: Iter behaves as &RawRBTreeMap<K, V>, so it is Send/Sync when the
// tree is Sync.
unsafe impl<K: Sync, V: Sync> Send for Iter<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for Iter<'_, K, V> {}

/// A mutable iterator over the entries of a `RBTreeMap`.
///
/// This `struct` is created by the [`iter_mut`] method on [`RBTreeMap`]. See
/// its documentation for more.
///
/// # Examples
///
/// ```
/// use crimson_tree::RBTreeMap;
///
/// let mut map = RBTreeMap::from([(1, 10), (2, 20)]);
/// for (_, value) in map.iter_mut() {
///     *value += 1;
/// }
/// let values: Vec<_> = map.values().copied().collect();
/// assert_eq!(values, [11, 21]);
/// ```
///
/// [`iter_mut`]: RBTreeMap::iter_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, K: 'a, V: 'a> {
    tree: *mut RawRBTreeMap<K, V>,
    front: Handle,
    back: Handle,
    remaining: usize,
    _marker: PhantomData<&'a mut (K, V)>,
}

// SAFETY: IterMut behaves as &mut RawRBTreeMap<K, V>, so it is Send when K
// and V are Send. It is NOT Sync because mutable iterators should not be
// shared across threads.
unsafe impl<K: Send, V: Send> Send for IterMut<'_, K, V> {}

/// An owning iterator over the entries of a `RBTreeMap`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`RBTreeMap`]
/// (provided by the [`IntoIterator`] trait). See its documentation for more.
///
/// # Examples
///
/// ```
/// use crimson_tree::RBTreeMap;
///
/// let map = RBTreeMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.into_iter();
/// assert_eq!(iter.next(), Some((1, "a")));
/// assert_eq!(iter.next_back(), Some((2, "b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

/// An iterator over the keys of a `RBTreeMap`.
///
/// This `struct` is created by the [`keys`] method on [`RBTreeMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use crimson_tree::RBTreeMap;
///
/// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, [1, 2]);
/// ```
///
/// [`keys`]: RBTreeMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of a `RBTreeMap`.
///
/// This `struct` is created by the [`values`] method on [`RBTreeMap`]. See
/// its documentation for more.
///
/// # Examples
///
/// ```
/// use crimson_tree::RBTreeMap;
///
/// let map = RBTreeMap::from([(1, "a"), (2, "b")]);
/// let values: Vec<_> = map.values().copied().collect();
/// assert_eq!(values, ["a", "b"]);
/// ```
///
/// [`values`]: RBTreeMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// A mutable iterator over the values of a `RBTreeMap`.
///
/// This `struct` is created by the [`values_mut`] method on [`RBTreeMap`].
/// See its documentation for more.
///
/// # Examples
///
/// ```
/// use crimson_tree::RBTreeMap;
///
/// let mut map = RBTreeMap::from([(1, String::from("hello"))]);
/// for value in map.values_mut() {
///     value.push('!');
/// }
/// assert_eq!(map[&1], "hello!");
/// ```
///
/// [`values_mut`]: RBTreeMap::values_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

// SAFETY: ValuesMut is Send when its inner IterMut is Send.
unsafe impl<K: Send, V: Send> Send for ValuesMut<'_, K, V> {}

/// An owning iterator over the keys of a `RBTreeMap`.
///
/// This `struct` is created by the [`into_keys`] method on [`RBTreeMap`].
/// See its documentation for more.
///
/// # Examples
///
/// ```
/// use crimson_tree::RBTreeMap;
///
/// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
/// let mut keys = map.into_keys();
/// assert_eq!(keys.next(), Some(1));
/// assert_eq!(keys.next_back(), Some(2));
/// assert_eq!(keys.next(), None);
/// ```
///
/// [`into_keys`]: RBTreeMap::into_keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoKeys<K, V> {
    inner: IntoIter<K, V>,
}

/// An owning iterator over the values of a `RBTreeMap`.
///
/// This `struct` is created by the [`into_values`] method on [`RBTreeMap`].
/// See its documentation for more.
///
/// # Examples
///
/// ```
/// use crimson_tree::RBTreeMap;
///
/// let map = RBTreeMap::from([(1, "hello"), (2, "goodbye")]);
/// let mut values = map.into_values();
/// assert_eq!(values.next(), Some("hello"));
/// assert_eq!(values.next_back(), Some("goodbye"));
/// assert_eq!(values.next(), None);
/// ```
///
/// [`into_values`]: RBTreeMap::into_values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoValues<K, V> {
    inner: IntoIter<K, V>,
}

/// An iterator over a sub-range of entries in a `RBTreeMap`.
///
/// This `struct` is created by the [`range`] method on [`RBTreeMap`]. See
/// its documentation for more.
///
/// # Examples
///
/// ```
/// use crimson_tree::RBTreeMap;
///
/// let map = RBTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
/// let mut range = map.range(2..=3);
/// assert_eq!(range.next(), Some((&2, &"b")));
/// assert_eq!(range.next_back(), Some((&3, &"c")));
/// assert_eq!(range.next(), None);
/// ```
///
/// [`range`]: RBTreeMap::range
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, K: 'a, V: 'a> {
    tree: *const RawRBTreeMap<K, V>,
    front: Handle,
    back: Handle,
    /// Set once the cursors have crossed (or the range was empty to begin
    /// with); the handles are not dereferenced afterwards.
    finished: bool,
    _marker: PhantomData<&'a RawRBTreeMap<K, V>>,
}

// SAFETY: Range behaves as &RawRBTreeMap<K, V>, so it is Send/Sync when the
// tree is Sync.
unsafe impl<K: Sync, V: Sync> Send for Range<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for Range<'_, K, V> {}

impl<K, V> RBTreeMap<K, V> {
    /// Makes a new, empty `RBTreeMap`.
    ///
    /// Allocates the tree's shared sentinel node; no per-entry allocation
    /// happens until the first insertion.
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
    /// let mut map = RBTreeMap::new();
    ///
    /// // entries can now be inserted into the empty map
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub fn new() -> RBTreeMap<K, V> {
        RBTreeMap {
            raw: RawRBTreeMap::new(),
        }
    }

    /// Returns the number of elements in the map.
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
    /// let mut a = RBTreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
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
    /// let mut a = RBTreeMap::new();
    /// assert!(a.is_empty());
    /// a.insert(1, "a");
    /// assert!(!a.is_empty());
    /// ```
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the map, removing all elements.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// a.insert(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(3, "c"), (2, "b"), (1, "a")]);
    ///
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            tree: core::ptr::from_ref(&self.raw),
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
            _marker: PhantomData,
        }
    }

    /// Gets a mutable iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([("a", 1), ("b", 2), ("c", 3)]);
    ///
    /// // add 10 to the value if the key isn't "a"
    /// for (key, value) in map.iter_mut() {
    ///     if key != &"a" {
    ///         *value += 10;
    ///     }
    /// }
    /// assert_eq!(map["b"], 12);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
            tree: core::ptr::from_mut(&mut self.raw),
            _marker: PhantomData,
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// let keys: Vec<_> = map.keys().copied().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, "hello"), (2, "goodbye")]);
    /// let values: Vec<_> = map.values().copied().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Gets a mutable iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([(1, String::from("hello"))]);
    /// for value in map.values_mut() {
    ///     value.push_str("!");
    /// }
    /// assert_eq!(map[&1], "hello!");
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut { inner: self.iter_mut() }
    }

    /// Creates a consuming iterator visiting all the keys, in sorted order.
    /// The map cannot be used after calling this.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// let keys: Vec<_> = map.into_keys().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn into_keys(self) -> IntoKeys<K, V> {
        IntoKeys {
            inner: self.into_iter(),
        }
    }

    /// Creates a consuming iterator visiting all the values, in order by
    /// key. The map cannot be used after calling this.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, "hello"), (2, "goodbye")]);
    /// let values: Vec<_> = map.into_values().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn into_values(self) -> IntoValues<K, V> {
        IntoValues {
            inner: self.into_iter(),
        }
    }
}

impl<K: Ord, V> RBTreeMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form *must* match the ordering on the key
    /// type.
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
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key)
    }

    /// Returns the key-value pair corresponding to the supplied key. This is
    /// potentially useful:
    /// - for key types where non-identical keys can be considered equal;
    /// - for getting the `&K` stored key value from a borrowed `&Q` lookup
    ///   key; or
    /// - for getting a reference to a key with the same lifetime as the
    ///   collection.
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
    /// let map = RBTreeMap::from([(1, "a"), (2, "b")]);
    /// assert_eq!(map.get_key_value(&1), Some((&1, &"a")));
    /// assert_eq!(map.get_key_value(&3), None);
    /// ```
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_key_value(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
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
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_mut(key)
    }

    /// Returns `true` if the map contains a value for the specified key.
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
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert!(map.contains_key(&1));
    /// assert!(!map.contains_key(&2));
    /// ```
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.contains_key(key)
    }

    /// Returns the first key-value pair in the map.
    /// The key in this pair is the minimum key in the map.
    ///
    /// # Complexity
    ///
    /// O(1) - uses the cached minimum node.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.first_key_value(), None);
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.first_key_value(), Some((&1, &"b")));
    /// ```
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first_key_value()
    }

    /// Returns the last key-value pair in the map.
    /// The key in this pair is the maximum key in the map.
    ///
    /// # Complexity
    ///
    /// O(1) - uses the cached maximum node.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.last_key_value(), Some((&2, &"a")));
    /// ```
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last_key_value()
    }

    /// Returns the first entry in the map for in-place manipulation.
    /// The key of this entry is the minimum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([(1, "a"), (2, "b")]);
    /// if let Some(mut entry) = map.first_entry() {
    ///     entry.insert("first");
    /// }
    /// assert_eq!(map[&1], "first");
    /// assert_eq!(map[&2], "b");
    /// ```
    pub fn first_entry(&mut self) -> Option<OccupiedEntry<'_, K, V>> {
        let node = self.raw.first();
        if node.is_nil() {
            return None;
        }
        Some(OccupiedEntry {
            node,
            tree: &mut self.raw,
        })
    }

    /// Returns the last entry in the map for in-place manipulation.
    /// The key of this entry is the maximum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([(1, "a"), (2, "b")]);
    /// if let Some(mut entry) = map.last_entry() {
    ///     entry.insert("last");
    /// }
    /// assert_eq!(map[&1], "a");
    /// assert_eq!(map[&2], "last");
    /// ```
    pub fn last_entry(&mut self) -> Option<OccupiedEntry<'_, K, V>> {
        let node = self.raw.last();
        if node.is_nil() {
            return None;
        }
        Some(OccupiedEntry {
            node,
            tree: &mut self.raw,
        })
    }

    /// Removes and returns the first element in the map.
    /// The key of this element is the minimum key that was in the map.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// Draining elements in ascending order, while keeping a usable map
    /// each iteration.
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([(1, "a"), (2, "b")]);
    /// while let Some((key, _val)) = map.pop_first() {
    ///     assert!(map.iter().all(|(k, _v)| *k > key));
    /// }
    /// assert!(map.is_empty());
    /// ```
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.raw.first();
        self.raw.erase(first)
    }

    /// Removes and returns the last element in the map.
    /// The key of this element is the maximum key that was in the map.
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
    /// let mut map = RBTreeMap::from([(1, "a"), (2, "b")]);
    /// assert_eq!(map.pop_last(), Some((2, "b")));
    /// assert_eq!(map.pop_last(), Some((1, "a")));
    /// assert_eq!(map.pop_last(), None);
    /// ```
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.raw.last();
        self.raw.erase(last)
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned.
    ///
    /// If the map did have this key present, the value is updated in place
    /// and the old value is returned. The key is not updated, which matters
    /// for types that can be `==` without being identical; the tree
    /// structure is untouched in that case.
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
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.is_empty(), false);
    ///
    /// map.insert(37, "b");
    /// assert_eq!(map.insert(37, "c"), Some("b"));
    /// assert_eq!(map[&37], "c");
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.raw.insert(key, value, Handle::NIL) {
            InsertResult::Inserted(_) => None,
            InsertResult::Duplicate { node, value, .. } => Some(self.raw.replace_value(node, value)),
        }
    }

    /// Removes a key from the map, returning the value at the key if the
    /// key was previously in the map.
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
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value if
    /// the key was previously in the map.
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
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove_entry(&1), Some((1, "a")));
    /// assert_eq!(map.remove_entry(&1), None);
    /// ```
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        // Locate first; erasing the sentinel is the no-op "absent" path.
        let node = self.raw.find(key);
        self.raw.erase(node)
    }

    /// Returns the first entry whose key is not less than `key`, if any.
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
    /// let map = RBTreeMap::from([(2, "b"), (4, "d")]);
    /// assert_eq!(map.lower_bound(&3), Some((&4, &"d")));
    /// assert_eq!(map.lower_bound(&4), Some((&4, &"d")));
    /// assert_eq!(map.lower_bound(&5), None);
    /// ```
    pub fn lower_bound<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let node = self.raw.lower_bound(key);
        if node.is_nil() {
            return None;
        }
        let node = self.raw.node(node);
        Some((node.key(), self.raw.value(node.value())))
    }

    /// Returns the first entry whose key is strictly greater than `key`,
    /// if any.
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
    /// let map = RBTreeMap::from([(2, "b"), (4, "d")]);
    /// assert_eq!(map.upper_bound(&3), Some((&4, &"d")));
    /// assert_eq!(map.upper_bound(&4), None);
    /// ```
    pub fn upper_bound<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let node = self.raw.upper_bound(key);
        if node.is_nil() {
            return None;
        }
        let node = self.raw.node(node);
        Some((node.key(), self.raw.value(node.value())))
    }

    /// Constructs a double-ended iterator over a sub-range of elements in
    /// the map. The simplest way is to use the range syntax `min..max`,
    /// thus `range(min..max)` will yield elements from min (inclusive) to
    /// max (exclusive). The range may also be entered as
    /// `(Bound<T>, Bound<T>)`, so for example
    /// `range((Excluded(4), Included(10)))` will yield a left-exclusive,
    /// right-inclusive range from 4 to 10.
    ///
    /// # Panics
    ///
    /// Panics if range `start > end`. Panics if range `start == end` and
    /// both bounds are `Excluded`.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(3, "a");
    /// map.insert(5, "b");
    /// map.insert(8, "c");
    /// for (&key, &value) in map.range(4..) {
    ///     println!("{key}: {value}");
    /// }
    /// assert_eq!(map.range(4..).next(), Some((&5, &"b")));
    /// ```
    pub fn range<T, R>(&self, range: R) -> Range<'_, K, V>
    where
        T: ?Sized + Ord,
        K: Borrow<T>,
        R: RangeBounds<T>,
    {
        validate_range_bounds(&range);

        let raw = &self.raw;
        let front = match range.start_bound() {
            Bound::Included(key) => raw.lower_bound(key),
            Bound::Excluded(key) => raw.upper_bound(key),
            Bound::Unbounded => raw.first(),
        };
        // The back cursor is the last element inside the end bound: one
        // step before the first element past it.
        let back = match range.end_bound() {
            Bound::Included(key) => raw.predecessor(raw.upper_bound(key)),
            Bound::Excluded(key) => raw.predecessor(raw.lower_bound(key)),
            Bound::Unbounded => raw.last(),
        };

        let finished = front.is_nil()
            || back.is_nil()
            || raw.node(front).key() > raw.node(back).key();
        Range {
            tree: core::ptr::from_ref(raw),
            front,
            back,
            finished,
            _marker: PhantomData,
        }
    }

    /// Gets the given key's corresponding entry in the map for in-place
    /// manipulation.
    ///
    /// # Examples
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let mut count: RBTreeMap<&str, usize> = RBTreeMap::new();
    ///
    /// // count the number of occurrences of letters in the vec
    /// for x in ["a", "b", "a", "c", "a", "b"] {
    ///     *count.entry(x).or_insert(0) += 1;
    /// }
    ///
    /// assert_eq!(count["a"], 3);
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let node = self.raw.find(&key);
        if node.is_nil() {
            Entry::Vacant(VacantEntry {
                key,
                tree: &mut self.raw,
            })
        } else {
            Entry::Occupied(OccupiedEntry {
                node,
                tree: &mut self.raw,
            })
        }
    }
}

impl<K: Clone, V: Clone> Clone for RBTreeMap<K, V> {
    fn clone(&self) -> Self {
        RBTreeMap {
            raw: self.raw.clone(),
        }
    }
}

impl<K: Hash, V: Hash> Hash for RBTreeMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for entry in self {
            entry.hash(state);
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for RBTreeMap<K, V> {
    fn eq(&self, other: &RBTreeMap<K, V>) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq> Eq for RBTreeMap<K, V> {}

impl<K: PartialOrd, V: PartialOrd> PartialOrd for RBTreeMap<K, V> {
    fn partial_cmp(&self, other: &RBTreeMap<K, V>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord, V: Ord> Ord for RBTreeMap<K, V> {
    fn cmp(&self, other: &RBTreeMap<K, V>) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RBTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Default for RBTreeMap<K, V> {
    /// Creates an empty `RBTreeMap`.
    fn default() -> RBTreeMap<K, V> {
        RBTreeMap::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RBTreeMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> RBTreeMap<K, V> {
        let mut map = RBTreeMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for RBTreeMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        // Each insertion hints at the previously touched node, which turns
        // mostly-sorted input into near-O(1) descents.
        let mut hint = Handle::NIL;
        for (key, value) in iter {
            hint = match self.raw.insert(key, value, hint) {
                InsertResult::Inserted(node) => node,
                InsertResult::Duplicate { node, value, .. } => {
                    self.raw.replace_value(node, value);
                    node
                }
            };
        }
    }
}

impl<'a, K: Ord + Copy, V: Copy> Extend<(&'a K, &'a V)> for RBTreeMap<K, V> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        self.extend(iter.into_iter().map(|(&key, &value)| (key, value)));
    }
}

impl<'a, K, V> IntoIterator for &'a RBTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut RBTreeMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V> IntoIterator for RBTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<K, Q, V> Index<&Q> for RBTreeMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `RBTreeMap`.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RBTreeMap<K, V> {
    /// Converts a `[(K, V); N]` into a `RBTreeMap<K, V>`.
    ///
    /// ```
    /// use crimson_tree::RBTreeMap;
    ///
    /// let map1 = RBTreeMap::from([(1, 2), (3, 4)]);
    /// let map2: RBTreeMap<_, _> = [(1, 2), (3, 4)].into();
    /// assert_eq!(map1, map2);
    /// ```
    fn from(arr: [(K, V); N]) -> RBTreeMap<K, V> {
        RBTreeMap::from_iter(arr)
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        // SAFETY: When remaining > 0 the pointer came from a live borrow in
        // iter() and `front` is a live node.
        let tree = unsafe { &*self.tree };
        let node = tree.node(self.front);
        let key = node.key();
        let value = tree.value(node.value());

        self.front = tree.successor(self.front);
        self.remaining -= 1;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: 'a, V: 'a> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        // SAFETY: When remaining > 0 the pointer came from a live borrow in
        // iter() and `back` is a live node.
        let tree = unsafe { &*self.tree };
        let node = tree.node(self.back);
        let key = node.key();
        let value = tree.value(node.value());

        self.back = tree.predecessor(self.back);
        self.remaining -= 1;
        Some((key, value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("remaining", &self.remaining).finish()
    }
}

impl<'a, K: 'a, V: 'a> Default for Iter<'a, K, V> {
    /// Creates an empty `rbtree_map::Iter`.
    ///
    /// ```
    /// # use crimson_tree::rbtree_map;
    /// let iter: rbtree_map::Iter<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter {
            // SAFETY: the pointer is never dereferenced while remaining == 0.
            tree: core::ptr::NonNull::dangling().as_ptr(),
            front: Handle::NIL,
            back: Handle::NIL,
            remaining: 0,
            _marker: PhantomData,
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        // SAFETY: We have exclusive access to the tree through the raw
        // pointer and visit each node exactly once. Keys and links live in
        // the nodes arena and values in the values arena, accessed through
        // separate raw pointers to avoid aliasing violations.
        unsafe {
            let node = RawRBTreeMap::node_ptr(self.tree, self.front);
            let key = node.key();
            let value = RawRBTreeMap::value_mut_ptr(self.tree, node.value());

            self.front = RawRBTreeMap::successor_ptr(self.tree, self.front);
            self.remaining -= 1;
            Some((key, value))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        // SAFETY: Same as in next() - exclusive access, each node visited
        // once, nodes and values reached through separate pointers.
        unsafe {
            let node = RawRBTreeMap::node_ptr(self.tree, self.back);
            let key = node.key();
            let value = RawRBTreeMap::value_mut_ptr(self.tree, node.value());

            self.back = RawRBTreeMap::predecessor_ptr(self.tree, self.back);
            self.remaining -= 1;
            Some((key, value))
        }
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IterMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.remaining).finish()
    }
}

impl<'a, K: 'a, V: 'a> Default for IterMut<'a, K, V> {
    /// Creates an empty `rbtree_map::IterMut`.
    ///
    /// ```
    /// # use crimson_tree::rbtree_map;
    /// let iter: rbtree_map::IterMut<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IterMut {
            tree: core::ptr::null_mut(),
            front: Handle::NIL,
            back: Handle::NIL,
            remaining: 0,
            _marker: PhantomData,
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("remaining", &self.inner.len()).finish()
    }
}

impl<K, V> Default for IntoIter<K, V> {
    /// Creates an empty `rbtree_map::IntoIter`.
    fn default() -> Self {
        IntoIter {
            inner: alloc::vec::Vec::new().into_iter(),
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keys").field("remaining", &self.inner.remaining).finish()
    }
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Values").field("remaining", &self.inner.remaining).finish()
    }
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

impl<K, V: fmt::Debug> fmt::Debug for ValuesMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuesMut").field("remaining", &self.inner.remaining).finish()
    }
}

impl<K, V> Iterator for IntoKeys<K, V> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoKeys<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for IntoKeys<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoKeys<K, V> {}

impl<K, V> Iterator for IntoValues<K, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoValues<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for IntoValues<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoValues<K, V> {}

impl<'a, K: 'a, V: 'a> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        // SAFETY: Until finished, the pointer came from a live borrow in
        // range() and `front` is a live node at or before `back`.
        let tree = unsafe { &*self.tree };
        let node = tree.node(self.front);
        let key = node.key();
        let value = tree.value(node.value());

        if self.front == self.back {
            self.finished = true;
        } else {
            self.front = tree.successor(self.front);
        }
        Some((key, value))
    }
}

impl<K, V> DoubleEndedIterator for Range<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        // SAFETY: Until finished, the pointer came from a live borrow in
        // range() and `back` is a live node at or after `front`.
        let tree = unsafe { &*self.tree };
        let node = tree.node(self.back);
        let key = node.key();
        let value = tree.value(node.value());

        if self.front == self.back {
            self.finished = true;
        } else {
            self.back = tree.predecessor(self.back);
        }
        Some((key, value))
    }
}

impl<K, V> FusedIterator for Range<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Range<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Range").field("finished", &self.finished).finish()
    }
}

impl<K, V> Clone for Range<'_, K, V> {
    fn clone(&self) -> Self {
        Range {
            tree: self.tree,
            front: self.front,
            back: self.back,
            finished: self.finished,
            _marker: PhantomData,
        }
    }
}
