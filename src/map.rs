//! An ordered map based on a red-black tree.

use compare::{Compare, Natural};
use crate::cursor::Cursor;
use crate::error::Result;
use crate::key::First;
use crate::node::{self, Link};
use crate::tree::Tree;
use std::cmp::Ordering::{self, *};
use std::fmt::{self, Debug};
use std::hash::{self, Hash};
use std::iter;
use std::ops::{self, Bound};

/// An ordered map based on a red-black tree.
///
/// The behavior of this map is unspecified if a key's ordering relative to any other key changes
/// while the key is in the map. This is normally only possible through `Cell`, `RefCell`, or
/// unsafe code.
///
/// # Panics
///
/// The `Clone`, `Extend` and `FromIterator` implementations panic if a node cannot be allocated
/// or the map would grow past its `max_len`. `try_clone` and `try_extend` report these conditions
/// as errors instead.
pub struct Map<K, V, C = Natural<K>> where C: Compare<K> {
    tree: Tree<(K, V), C, First>,
}

impl<K, V> Map<K, V> where K: Ord {
    /// Creates an empty map ordered according to the natural order of its keys.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = ordtree::Map::new();
    ///
    /// map.insert(2, "b").unwrap();
    /// map.insert(1, "a").unwrap();
    /// map.insert(3, "c").unwrap();
    ///
    /// let mut it = map.iter();
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), Some((&3, &"c")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn new() -> Self { Map::with_cmp(compare::natural()) }
}

impl<K, V, C> Map<K, V, C> where C: Compare<K> {
    /// Creates an empty map ordered according to the given comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{Compare, natural};
    ///
    /// let mut map = ordtree::Map::with_cmp(natural().rev());
    ///
    /// map.insert(2, "b").unwrap();
    /// map.insert(1, "a").unwrap();
    /// map.insert(3, "c").unwrap();
    ///
    /// let mut it = map.iter();
    /// assert_eq!(it.next(), Some((&3, &"c")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn with_cmp(cmp: C) -> Self { Map { tree: Tree::new(cmp) } }

    /// Checks if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = ordtree::Map::new();
    /// assert!(map.is_empty());
    ///
    /// map.insert(2, "b").unwrap();
    /// assert!(!map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool { self.tree.is_empty() }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = ordtree::Map::new();
    /// assert_eq!(map.len(), 0);
    ///
    /// map.insert(2, "b").unwrap();
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize { self.tree.len() }

    /// Returns a reference to the map's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{Compare, natural};
    /// use ordtree::Map;
    ///
    /// let map: Map<i32, &str> = Map::new();
    /// assert!(map.cmp().compares_lt(&1, &2));
    ///
    /// let map: Map<i32, &str, _> = Map::with_cmp(natural().rev());
    /// assert!(map.cmp().compares_gt(&1, &2));
    /// ```
    pub fn cmp(&self) -> &C { self.tree.cmp() }

    /// Returns the largest number of entries the map may hold.
    pub fn max_len(&self) -> usize { self.tree.max_len() }

    /// Limits the number of entries the map may hold.
    ///
    /// The limit only affects later insertions; it never removes entries. It is capped at the
    /// largest number of entries that can be addressed.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::{Error, Map};
    ///
    /// let mut map = Map::new();
    /// map.set_max_len(1);
    ///
    /// map.insert(1, "a").unwrap();
    /// assert_eq!(map.insert(2, "b"), Err(Error::CapacityExceeded { max: 1 }));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn set_max_len(&mut self, max_len: usize) { self.tree.set_max_len(max_len); }

    /// Removes all entries from the map.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = ordtree::Map::new();
    ///
    /// map.insert(2, "b").unwrap();
    /// map.insert(1, "a").unwrap();
    /// map.insert(3, "c").unwrap();
    ///
    /// assert_eq!(map.len(), 3);
    /// assert_eq!(map.iter().next(), Some((&1, &"a")));
    ///
    /// map.clear();
    ///
    /// assert_eq!(map.len(), 0);
    /// assert_eq!(map.iter().next(), None);
    /// assert_eq!(map.begin(), map.end());
    /// ```
    pub fn clear(&mut self) { self.tree.clear(); }

    /// Inserts an entry into the map unless the map already contains an equivalent key.
    ///
    /// Returns a cursor to the inserted entry and `true`, or a cursor to the existing entry and
    /// `false`. An existing entry is left untouched and the given key and value are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = ordtree::Map::new();
    ///
    /// let (a, inserted) = map.insert(1, "a").unwrap();
    /// assert!(inserted);
    ///
    /// let (b, inserted) = map.insert(1, "b").unwrap();
    /// assert!(!inserted);
    /// assert_eq!(a, b);
    /// assert_eq!(map.get_at(b), Some((&1, &"a")));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<(Cursor, bool)> {
        self.tree.insert((key, value)).map(|(link, inserted)| (Cursor(link), inserted))
    }

    /// Inserts an entry into the map, using `hint` as a guess for the position of the entry
    /// that should follow it.
    ///
    /// A correct hint makes the insertion take constant time apart from rebalancing. An incorrect
    /// hint is ignored. Returns a cursor to the inserted entry, or to the existing entry whose
    /// key is equivalent to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = ordtree::Map::new();
    ///
    /// for i in 0..10 {
    ///     let end = map.end();
    ///     map.insert_hint(end, i, i * 10).unwrap();
    /// }
    ///
    /// assert_eq!(map.len(), 10);
    /// assert_eq!(map.iter().map(|e| *e.0).collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
    /// ```
    pub fn insert_hint(&mut self, hint: Cursor, key: K, value: V) -> Result<Cursor> {
        self.tree.insert_hint(hint.0, (key, value)).map(Cursor)
    }

    /// Inserts every entry of an iterator, keeping existing entries for keys already present.
    ///
    /// Stops at the first failure. Entries inserted before the failure remain in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = ordtree::Map::new();
    /// map.insert(1, "a").unwrap();
    ///
    /// map.try_extend(vec![(1, "x"), (2, "b")]).unwrap();
    /// assert_eq!(map.iter().collect::<Vec<_>>(), [(&1, &"a"), (&2, &"b")]);
    /// ```
    pub fn try_extend<I>(&mut self, it: I) -> Result<()> where I: IntoIterator<Item=(K, V)> {
        let mut hint = self.end();
        for (k, v) in it { hint = self.insert_hint(hint, k, v).map(|c| self.next(c))?; }
        Ok(())
    }

    /// Removes and returns the entry whose key is equivalent to the given key, returning
    /// `None` if the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = ordtree::Map::new();
    ///
    /// map.insert(2, "b").unwrap();
    /// map.insert(1, "a").unwrap();
    /// map.insert(3, "c").unwrap();
    ///
    /// assert_eq!(map.len(), 3);
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.remove(&1), Some((1, "a")));
    ///
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.get(&1), None);
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)> where C: Compare<Q, K> {
        let link = self.tree.find(key);
        if link.is_nil() { None } else { self.tree.erase(link).ok() }
    }

    /// Removes the entry at the given cursor and returns it.
    ///
    /// Cursors to other entries remain valid. Fails with `Error::InvalidCursor` if the cursor is
    /// at the end, or if its entry was removed and nothing has been inserted since.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::{Error, Map};
    ///
    /// let mut map = Map::new();
    ///
    /// map.insert(2, "b").unwrap();
    /// let (a, _) = map.insert(1, "a").unwrap();
    ///
    /// assert_eq!(map.erase(a), Ok((1, "a")));
    /// assert_eq!(map.len(), 1);
    ///
    /// let end = map.end();
    /// assert_eq!(map.erase(end), Err(Error::InvalidCursor));
    /// ```
    pub fn erase(&mut self, cursor: Cursor) -> Result<(K, V)> { self.tree.erase(cursor.0) }

    /// Removes the entries in the half-open range `[first, last)`, returning how many were
    /// removed.
    ///
    /// Fails with `Error::InvalidCursor`, removing nothing, if `last` does not follow `first`.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map: ordtree::Map<_, _> = (0..10).map(|i| (i, i)).collect();
    ///
    /// let first = map.lower_bound(&3);
    /// let last = map.lower_bound(&7);
    /// assert_eq!(map.erase_range(first, last), Ok(4));
    ///
    /// assert_eq!(map.iter().map(|e| *e.0).collect::<Vec<_>>(), [0, 1, 2, 7, 8, 9]);
    /// ```
    pub fn erase_range(&mut self, first: Cursor, last: Cursor) -> Result<usize> {
        self.tree.erase_range(first.0, last.0)
    }

    /// Returns the map's entry corresponding to the given key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut counts = ordtree::Map::new();
    ///
    /// for s in vec!["a", "b", "a", "c", "a", "b"] {
    ///     *counts.entry(s).or_insert(0).unwrap() += 1;
    /// }
    ///
    /// assert_eq!(counts[&"a"], 3);
    /// assert_eq!(counts[&"b"], 2);
    /// assert_eq!(counts[&"c"], 1);
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<K, V, C> {
        match self.tree.locate(&key) {
            Ok(link) => Entry::Occupied(OccupiedEntry { tree: &mut self.tree, link }),
            Err(hint) => Entry::Vacant(VacantEntry { tree: &mut self.tree, hint, key }),
        }
    }

    /// Returns a mutable reference to the value associated with the given key, inserting the
    /// default value first if the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = ordtree::Map::new();
    ///
    /// *map.get_or_default("a").unwrap() += 2;
    /// *map.get_or_default("a").unwrap() += 3;
    ///
    /// assert_eq!(map.get(&"a"), Some(&5));
    /// ```
    pub fn get_or_default(&mut self, key: K) -> Result<&mut V> where V: Default {
        self.entry(key).or_default()
    }

    /// Checks if the map contains the given key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = ordtree::Map::new();
    /// assert!(!map.contains_key(&1));
    /// map.insert(1, "a").unwrap();
    /// assert!(map.contains_key(&1));
    /// ```
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool where C: Compare<Q, K> {
        !self.tree.find(key).is_nil()
    }

    /// Returns a reference to the value associated with the given key, or `None` if the
    /// map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = ordtree::Map::new();
    /// assert_eq!(map.get(&1), None);
    /// map.insert(1, "a").unwrap();
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// ```
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V> where C: Compare<Q, K> {
        self.tree.get(self.tree.find(key)).map(|e| &e.1)
    }

    /// Returns a mutable reference to the value associated with the given key, or `None`
    /// if the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = ordtree::Map::new();
    /// assert_eq!(map.get(&1), None);
    /// map.insert(1, "a").unwrap();
    ///
    /// {
    ///     let value = map.get_mut(&1).unwrap();
    ///     assert_eq!(*value, "a");
    ///     *value = "b";
    /// }
    ///
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// ```
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V> where C: Compare<Q, K> {
        let link = self.tree.find(key);
        self.tree.get_mut(link).map(|e| &mut e.1)
    }

    /// Returns a cursor to the entry whose key is equivalent to the given key, or the end cursor
    /// if the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = ordtree::Map::new();
    /// map.insert(1, "a").unwrap();
    ///
    /// assert_eq!(map.get_at(map.find(&1)), Some((&1, &"a")));
    /// assert_eq!(map.find(&2), map.end());
    /// ```
    pub fn find<Q: ?Sized>(&self, key: &Q) -> Cursor where C: Compare<Q, K> {
        Cursor(self.tree.find(key))
    }

    /// Returns a cursor to the first entry whose key is not ordered before the given key, or
    /// the end cursor if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = ordtree::Map::new();
    /// map.insert(1, "a").unwrap();
    /// map.insert(3, "c").unwrap();
    ///
    /// assert_eq!(map.lower_bound(&0), map.begin());
    /// assert_eq!(map.get_at(map.lower_bound(&1)), Some((&1, &"a")));
    /// assert_eq!(map.get_at(map.lower_bound(&2)), Some((&3, &"c")));
    /// assert_eq!(map.lower_bound(&4), map.end());
    /// ```
    pub fn lower_bound<Q: ?Sized>(&self, key: &Q) -> Cursor where C: Compare<Q, K> {
        Cursor(self.tree.lower_bound(key))
    }

    /// Returns a cursor to the first entry whose key is ordered after the given key, or the end
    /// cursor if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = ordtree::Map::new();
    /// map.insert(1, "a").unwrap();
    /// map.insert(3, "c").unwrap();
    ///
    /// assert_eq!(map.upper_bound(&0), map.begin());
    /// assert_eq!(map.get_at(map.upper_bound(&1)), Some((&3, &"c")));
    /// assert_eq!(map.upper_bound(&3), map.end());
    /// ```
    pub fn upper_bound<Q: ?Sized>(&self, key: &Q) -> Cursor where C: Compare<Q, K> {
        Cursor(self.tree.upper_bound(key))
    }

    /// Returns the lower and upper bound of the given key.
    ///
    /// The cursors are equal if the map does not contain the key, and otherwise delimit the one
    /// entry whose key is equivalent to it.
    pub fn equal_range<Q: ?Sized>(&self, key: &Q) -> (Cursor, Cursor) where C: Compare<Q, K> {
        let (lower, upper) = self.tree.equal_range(key);
        (Cursor(lower), Cursor(upper))
    }

    /// Returns the number of entries whose key is equivalent to the given key: zero or one.
    pub fn count<Q: ?Sized>(&self, key: &Q) -> usize where C: Compare<Q, K> {
        self.tree.count(key)
    }

    /// Returns a cursor to the entry with the minimum key, or the end cursor if the map is empty.
    pub fn begin(&self) -> Cursor { Cursor(self.tree.begin()) }

    /// Returns the past-the-end cursor.
    pub fn end(&self) -> Cursor { Cursor(self.tree.end()) }

    /// Advances a cursor to the next entry in order. Advancing the end cursor leaves it at the end.
    pub fn next(&self, cursor: Cursor) -> Cursor { Cursor(self.tree.next(cursor.0)) }

    /// Moves a cursor back to the previous entry in order.
    ///
    /// Moving back from the end cursor yields the entry with the maximum key. Moving back from
    /// the minimum yields the end cursor.
    ///
    /// # Examples
    ///
    /// ```
    /// let map: ordtree::Map<_, _> = vec![(1, "a"), (2, "b")].into_iter().collect();
    ///
    /// let last = map.prev(map.end());
    /// assert_eq!(map.get_at(last), Some((&2, &"b")));
    /// assert_eq!(map.get_at(map.prev(last)), Some((&1, &"a")));
    /// ```
    pub fn prev(&self, cursor: Cursor) -> Cursor { Cursor(self.tree.prev(cursor.0)) }

    /// Returns the entry at the given cursor, or `None` for the end cursor.
    pub fn get_at(&self, cursor: Cursor) -> Option<(&K, &V)> {
        self.tree.get(cursor.0).map(|e| (&e.0, &e.1))
    }

    /// Returns the entry at the given cursor with a mutable reference to its value, or `None`
    /// for the end cursor.
    pub fn get_at_mut(&mut self, cursor: Cursor) -> Option<(&K, &mut V)> {
        self.tree.get_mut(cursor.0).map(|e| (&e.0, &mut e.1))
    }

    /// Returns a reference to the map's minimum key and a reference to its associated
    /// value, or `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = ordtree::Map::new();
    /// assert_eq!(map.first(), None);
    ///
    /// map.insert(2, "b").unwrap();
    /// map.insert(1, "a").unwrap();
    /// map.insert(3, "c").unwrap();
    ///
    /// assert_eq!(map.first(), Some((&1, &"a")));
    /// ```
    pub fn first(&self) -> Option<(&K, &V)> { self.tree.first().map(|e| (&e.0, &e.1)) }

    /// Returns a reference to the map's maximum key and a reference to its associated
    /// value, or `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = ordtree::Map::new();
    /// assert_eq!(map.last(), None);
    ///
    /// map.insert(2, "b").unwrap();
    /// map.insert(1, "a").unwrap();
    /// map.insert(3, "c").unwrap();
    ///
    /// assert_eq!(map.last(), Some((&3, &"c")));
    /// ```
    pub fn last(&self) -> Option<(&K, &V)> { self.tree.last().map(|e| (&e.0, &e.1)) }

    /// Removes the map's minimum key and returns it and its associated value, or `None` if the map
    /// is empty.
    pub fn remove_min(&mut self) -> Option<(K, V)> {
        let begin = self.tree.begin();
        self.tree.erase(begin).ok()
    }

    /// Removes the map's maximum key and returns it and its associated value, or `None` if the map
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = ordtree::Map::new();
    /// assert_eq!(map.remove_max(), None);
    ///
    /// map.insert(2, "b").unwrap();
    /// map.insert(1, "a").unwrap();
    /// map.insert(3, "c").unwrap();
    ///
    /// assert_eq!(map.remove_max(), Some((3, "c")));
    /// assert_eq!(map.remove_min(), Some((1, "a")));
    /// ```
    pub fn remove_max(&mut self) -> Option<(K, V)> {
        let last = self.tree.prev(self.tree.end());
        self.tree.erase(last).ok()
    }

    /// Returns an iterator over the map's entries with immutable references to the values.
    ///
    /// The iterator yields the entries in ascending order according to the map's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = ordtree::Map::new();
    ///
    /// map.insert(2, "b").unwrap();
    /// map.insert(1, "a").unwrap();
    /// map.insert(3, "c").unwrap();
    ///
    /// let mut it = map.iter();
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next_back(), Some((&3, &"c")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<K, V> { Iter(self.tree.iter()) }

    /// Returns an iterator over the map's entries with mutable references to the values.
    ///
    /// The iterator yields the entries in ascending order according to the map's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = ordtree::Map::new();
    ///
    /// map.insert("b", 2).unwrap();
    /// map.insert("a", 1).unwrap();
    /// map.insert("c", 3).unwrap();
    ///
    /// let mut i = 1;
    ///
    /// for (_, value) in map.iter_mut() {
    ///     assert_eq!(i, *value);
    ///     *value *= 2;
    ///     i += 1;
    /// }
    ///
    /// assert_eq!(map[&"a"], 2);
    /// assert_eq!(map[&"b"], 4);
    /// assert_eq!(map[&"c"], 6);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<K, V> { IterMut(self.tree.iter_mut()) }

    /// Returns an iterator over the map's entries whose keys lie in the given range with immutable
    /// references to the values.
    ///
    /// The iterator yields the entries in ascending order according to the map's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::ops::Bound::{Included, Excluded, Unbounded};
    ///
    /// let mut map = ordtree::Map::new();
    ///
    /// map.insert("b", 2).unwrap();
    /// map.insert("a", 1).unwrap();
    /// map.insert("c", 3).unwrap();
    ///
    /// assert_eq!(map.range::<&str, &str>(Unbounded, Unbounded).collect::<Vec<_>>(),
    ///     [(&"a", &1), (&"b", &2), (&"c", &3)]);
    /// assert_eq!(map.range(Excluded(&"a"), Included(&"f")).collect::<Vec<_>>(),
    ///     [(&"b", &2), (&"c", &3)]);
    /// assert_eq!(map.range(Included(&"a"), Excluded(&"b")).collect::<Vec<_>>(),
    ///     [(&"a", &1)]);
    /// assert_eq!(map.range(Included(&"c"), Excluded(&"a")).next(), None);
    /// ```
    pub fn range<Min: ?Sized, Max: ?Sized>(&self, min: Bound<&Min>, max: Bound<&Max>)
        -> Range<K, V> where C: Compare<Min, K> + Compare<Max, K> {

        let (first, last) = self.tree.bounds(min, max);
        Range(self.tree.span(first, last))
    }

    /// Returns an iterator over the map's entries whose keys lie in the given range with mutable
    /// references to the values.
    ///
    /// The iterator yields the entries in ascending order according to the map's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::ops::Bound;
    ///
    /// let mut map = ordtree::Map::new();
    ///
    /// map.insert("b", 2).unwrap();
    /// map.insert("a", 1).unwrap();
    /// map.insert("c", 3).unwrap();
    ///
    /// let mut i = 1;
    ///
    /// for (_, value) in map.range_mut::<&str, _>(Bound::Unbounded, Bound::Excluded(&"c")) {
    ///     assert_eq!(i, *value);
    ///     *value *= 2;
    ///     i += 1;
    /// }
    ///
    /// assert_eq!(map[&"a"], 2);
    /// assert_eq!(map[&"b"], 4);
    /// assert_eq!(map[&"c"], 3);
    /// ```
    pub fn range_mut<Min: ?Sized, Max: ?Sized>(&mut self, min: Bound<&Min>, max: Bound<&Max>)
        -> RangeMut<K, V> where C: Compare<Min, K> + Compare<Max, K> {

        let (first, last) = self.tree.bounds(min, max);
        RangeMut(self.tree.span_mut(first, last))
    }

    /// Returns an iterator over the entries in the half-open cursor range `[first, last)`.
    ///
    /// `last` should be reachable from `first`. If it is not, the iterator runs from `first`
    /// through the maximum entry. Unlike `erase_range`, this does not walk the range up front.
    ///
    /// # Examples
    ///
    /// ```
    /// let map: ordtree::Map<_, _> = (0..6).map(|i| (i, i * i)).collect();
    ///
    /// let (first, last) = (map.find(&2), map.find(&5));
    /// assert_eq!(map.span(first, last).map(|e| *e.1).collect::<Vec<_>>(), [4, 9, 16]);
    /// assert_eq!(map.span(map.begin(), map.end()).count(), 6);
    /// ```
    pub fn span(&self, first: Cursor, last: Cursor) -> Range<K, V> {
        Range(self.tree.span(first.0, last.0))
    }

    /// Exchanges the contents and comparators of two maps in constant time.
    ///
    /// Cursors keep referring to the same entries, which now belong to the other map.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut a: ordtree::Map<_, _> = vec![(1, "a")].into_iter().collect();
    /// let mut b = ordtree::Map::new();
    ///
    /// a.swap(&mut b);
    /// assert!(a.is_empty());
    /// assert_eq!(b.get(&1), Some(&"a"));
    /// ```
    pub fn swap(&mut self, other: &mut Self) { self.tree.swap(&mut other.tree); }

    /// Returns a copy of the map, or an error if storage for the copy could not be obtained.
    ///
    /// The copy has the same shape as the original. On failure nothing is leaked.
    pub fn try_clone(&self) -> Result<Self> where K: Clone, V: Clone, C: Clone {
        self.tree.try_clone().map(|tree| Map { tree })
    }

    #[cfg(test)]
    pub(crate) fn tree(&self) -> &Tree<(K, V), C, First> { &self.tree }
}

impl<K, V, C> Clone for Map<K, V, C> where K: Clone, V: Clone, C: Clone + Compare<K> {
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(map) => map,
            Err(e) => panic!("failed to clone map: {}", e),
        }
    }
}

impl<K, V, C> Debug for Map<K, V, C> where K: Debug, V: Debug, C: Compare<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C> Default for Map<K, V, C> where C: Compare<K> + Default {
    fn default() -> Self { Map::with_cmp(Default::default()) }
}

impl<K, V, C> Extend<(K, V)> for Map<K, V, C> where C: Compare<K> {
    fn extend<I: IntoIterator<Item=(K, V)>>(&mut self, it: I) {
        if let Err(e) = self.try_extend(it) { panic!("failed to extend map: {}", e); }
    }
}

impl<K, V, C> iter::FromIterator<(K, V)> for Map<K, V, C> where C: Compare<K> + Default {
    fn from_iter<I: IntoIterator<Item=(K, V)>>(it: I) -> Self {
        let mut map: Self = Default::default();
        map.extend(it);
        map
    }
}

impl<K, V, C> Hash for Map<K, V, C> where K: Hash, V: Hash, C: Compare<K> {
    fn hash<H: hash::Hasher>(&self, h: &mut H) {
        for e in self.iter() { e.hash(h); }
    }
}

impl<'a, K, V, C, Q: ?Sized> ops::Index<&'a Q> for Map<K, V, C>
    where C: Compare<K> + Compare<Q, K> {

    type Output = V;
    fn index(&self, key: &Q) -> &V { self.get(key).expect("key not found") }
}

impl<'a, K, V, C> IntoIterator for &'a Map<K, V, C> where C: Compare<K> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> { self.iter() }
}

impl<'a, K, V, C> IntoIterator for &'a mut Map<K, V, C> where C: Compare<K> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> IterMut<'a, K, V> { self.iter_mut() }
}

impl<K, V, C> IntoIterator for Map<K, V, C> where C: Compare<K> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Returns an iterator that consumes the map.
    ///
    /// The iterator yields the entries in ascending order according to the map's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = ordtree::Map::new();
    ///
    /// map.insert(2, "b").unwrap();
    /// map.insert(1, "a").unwrap();
    /// map.insert(3, "c").unwrap();
    ///
    /// let mut it = map.into_iter();
    /// assert_eq!(it.next(), Some((1, "a")));
    /// assert_eq!(it.next(), Some((2, "b")));
    /// assert_eq!(it.next(), Some((3, "c")));
    /// assert_eq!(it.next(), None);
    /// ```
    fn into_iter(self) -> IntoIter<K, V> { IntoIter(self.tree.into_iter()) }
}

impl<K, V, C> PartialEq for Map<K, V, C> where V: PartialEq, C: Compare<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(l, r)| {
            self.cmp().compares_eq(l.0, r.0) && l.1 == r.1
        })
    }
}

impl<K, V, C> Eq for Map<K, V, C> where V: Eq, C: Compare<K> {}

impl<K, V, C> PartialOrd for Map<K, V, C> where V: PartialOrd, C: Compare<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let mut l = self.iter();
        let mut r = other.iter();

        loop {
            match (l.next(), r.next()) {
                (None, None) => return Some(Equal),
                (None, Some(_)) => return Some(Less),
                (Some(_), None) => return Some(Greater),
                (Some(l), Some(r)) => match self.cmp().compare(l.0, r.0) {
                    Equal => match l.1.partial_cmp(r.1) {
                        Some(Equal) => {}
                        non_eq => return non_eq,
                    },
                    non_eq => return Some(non_eq),
                },
            }
        }
    }
}

impl<K, V, C> Ord for Map<K, V, C> where V: Ord, C: Compare<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut l = self.iter();
        let mut r = other.iter();

        loop {
            match (l.next(), r.next()) {
                (None, None) => return Equal,
                (None, Some(_)) => return Less,
                (Some(_), None) => return Greater,
                (Some(l), Some(r)) => match self.tree.cmp().compare(l.0, r.0) {
                    Equal => match l.1.cmp(r.1) {
                        Equal => {}
                        non_eq => return non_eq,
                    },
                    non_eq => return non_eq,
                },
            }
        }
    }
}

/// An iterator that consumes the map.
///
/// The iterator yields the entries in ascending order according to the map's comparator.
///
/// # Examples
///
/// Acquire through the `IntoIterator` trait:
///
/// ```
/// let mut map = ordtree::Map::new();
///
/// map.insert(2, "b").unwrap();
/// map.insert(1, "a").unwrap();
/// map.insert(3, "c").unwrap();
///
/// for (key, value) in map {
///     println!("{:?}: {:?}", key, value);
/// }
/// ```
pub struct IntoIter<K, V>(node::IntoIter<(K, V)>);

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);
    fn next(&mut self) -> Option<(K, V)> { self.0.next() }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> { self.0.next_back() }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

/// An iterator over the map's entries with immutable references to the values.
///
/// The iterator yields the entries in ascending order according to the map's comparator.
///
/// # Examples
///
/// Acquire through [`Map::iter`](struct.Map.html#method.iter) or the `IntoIterator` trait:
///
/// ```
/// let mut map = ordtree::Map::new();
///
/// map.insert(2, "b").unwrap();
/// map.insert(1, "a").unwrap();
/// map.insert(3, "c").unwrap();
///
/// for (key, value) in &map {
///     println!("{:?}: {:?}", key, value);
/// }
/// ```
pub struct Iter<'a, K: 'a, V: 'a>(node::Iter<'a, (K, V)>);

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Iter<'a, K, V> { Iter(self.0.clone()) }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<(&'a K, &'a V)> { self.0.next().map(|e| (&e.0, &e.1)) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> { self.0.next_back().map(|e| (&e.0, &e.1)) }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

/// An iterator over the map's entries with mutable references to the values.
///
/// The iterator yields the entries in ascending order according to the map's comparator.
///
/// # Examples
///
/// Acquire through [`Map::iter_mut`](struct.Map.html#method.iter_mut) or the
/// `IntoIterator` trait:
///
/// ```
/// let mut map = ordtree::Map::new();
///
/// map.insert(2, "b").unwrap();
/// map.insert(1, "a").unwrap();
/// map.insert(3, "c").unwrap();
///
/// for (key, value) in &mut map {
///     println!("{:?}: {:?}", key, value);
/// }
/// ```
pub struct IterMut<'a, K: 'a, V: 'a>(node::IterMut<'a, (K, V)>);

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    fn next(&mut self) -> Option<(&'a K, &'a mut V)> { self.0.next().map(|e| (&e.0, &mut e.1)) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a mut V)> {
        self.0.next_back().map(|e| (&e.0, &mut e.1))
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}

/// An iterator over a range of the map's entries with immutable references to the values.
///
/// The iterator yields the entries in ascending order according to the map's comparator.
///
/// Acquire through [`Map::range`](struct.Map.html#method.range) or
/// [`Map::span`](struct.Map.html#method.span).
pub struct Range<'a, K: 'a, V: 'a>(node::Iter<'a, (K, V)>);

impl<'a, K, V> Clone for Range<'a, K, V> {
    fn clone(&self) -> Range<'a, K, V> { Range(self.0.clone()) }
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<(&'a K, &'a V)> { self.0.next().map(|e| (&e.0, &e.1)) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.bound_size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for Range<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> { self.0.next_back().map(|e| (&e.0, &e.1)) }
}

/// An iterator over a range of the map's entries with mutable references to the values.
///
/// The iterator yields the entries in ascending order according to the map's comparator.
///
/// Acquire through [`Map::range_mut`](struct.Map.html#method.range_mut).
pub struct RangeMut<'a, K: 'a, V: 'a>(node::IterMut<'a, (K, V)>);

impl<'a, K, V> Iterator for RangeMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    fn next(&mut self) -> Option<(&'a K, &'a mut V)> { self.0.next().map(|e| (&e.0, &mut e.1)) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.bound_size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for RangeMut<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a mut V)> {
        self.0.next_back().map(|e| (&e.0, &mut e.1))
    }
}

/// An entry in the map.
///
/// See [`Map::entry`](struct.Map.html#method.entry) for an example.
pub enum Entry<'a, K: 'a, V: 'a, C: 'a> where C: Compare<K> {
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V, C>),
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V, C>),
}

impl<'a, K, V, C> Entry<'a, K, V, C> where C: Compare<K> {
    /// Returns the entry's key.
    pub fn key(&self) -> &K {
        match *self {
            Entry::Occupied(ref e) => e.key(),
            Entry::Vacant(ref e) => e.key(),
        }
    }

    /// Returns the entry's value, inserting the given default if the entry is vacant.
    pub fn or_insert(self, default: V) -> Result<&'a mut V> {
        match self {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => e.insert(default),
        }
    }

    /// Returns the entry's value, inserting the given function's result if the entry is vacant.
    pub fn or_insert_with<F>(self, default: F) -> Result<&'a mut V> where F: FnOnce() -> V {
        match self {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => e.insert(default()),
        }
    }

    /// Returns the entry's value, inserting the default value if the entry is vacant.
    pub fn or_default(self) -> Result<&'a mut V> where V: Default {
        self.or_insert_with(V::default)
    }
}

/// An occupied entry.
///
/// See [`Map::entry`](struct.Map.html#method.entry) for an example.
pub struct OccupiedEntry<'a, K: 'a, V: 'a, C: 'a> {
    tree: &'a mut Tree<(K, V), C, First>,
    link: Link,
}

impl<'a, K, V, C> OccupiedEntry<'a, K, V, C> where C: Compare<K> {
    /// Returns a reference to the entry's key.
    pub fn key(&self) -> &K { &self.tree.value(self.link).0 }

    /// Returns a reference to the entry's value.
    pub fn get(&self) -> &V { &self.tree.value(self.link).1 }

    /// Returns a mutable reference to the entry's value.
    pub fn get_mut(&mut self) -> &mut V { &mut self.tree.value_mut(self.link).1 }

    /// Returns a mutable reference to the entry's value with the same lifetime as the map.
    pub fn into_mut(self) -> &'a mut V { &mut self.tree.value_mut(self.link).1 }

    /// Returns a cursor to the entry.
    pub fn cursor(&self) -> Cursor { Cursor(self.link) }

    /// Replaces the entry's value with the given value, returning the old one.
    pub fn insert(&mut self, value: V) -> V { std::mem::replace(self.get_mut(), value) }

    /// Removes the entry from the map and returns its key and value.
    pub fn remove(self) -> (K, V) {
        let key_value = self.tree.erase(self.link);
        match key_value {
            Ok(key_value) => key_value,
            Err(e) => unreachable!("occupied entry at the end cursor: {}", e),
        }
    }
}

/// A vacant entry.
///
/// See [`Map::entry`](struct.Map.html#method.entry) for an example.
pub struct VacantEntry<'a, K: 'a, V: 'a, C: 'a> {
    tree: &'a mut Tree<(K, V), C, First>,
    hint: Link,
    key: K,
}

impl<'a, K, V, C> VacantEntry<'a, K, V, C> where C: Compare<K> {
    /// Returns a reference to the entry's key.
    pub fn key(&self) -> &K { &self.key }

    /// Returns the entry's key, consuming the entry.
    pub fn into_key(self) -> K { self.key }

    /// Inserts the entry into the map with its key and the given value, returning a mutable
    /// reference to the value with the same lifetime as the map.
    pub fn insert(self, value: V) -> Result<&'a mut V> {
        let tree = self.tree;
        let link = tree.insert_hint(self.hint, (self.key, value))?;
        Ok(&mut tree.value_mut(link).1)
    }
}
