//! An ordered set based on a red-black tree.

use compare::{Compare, Natural};
use crate::cursor::Cursor;
use crate::error::Result;
use crate::key::Identity;
use crate::node;
use crate::tree::Tree;
use std::cmp::Ordering::{self, *};
use std::fmt::{self, Debug};
use std::hash::{self, Hash};
use std::iter;
use std::ops::Bound;

/// An ordered set based on a red-black tree.
///
/// The behavior of this set is unspecified if an item's ordering relative to any other item changes
/// while the item is in the set. This is normally only possible through `Cell`, `RefCell`, or
/// unsafe code.
///
/// # Panics
///
/// The `Clone`, `Extend` and `FromIterator` implementations panic if a node cannot be allocated
/// or the set would grow past its `max_len`.
pub struct Set<T, C = Natural<T>> where C: Compare<T> {
    tree: Tree<T, C, Identity>,
}

impl<T> Set<T> where T: Ord {
    /// Creates an empty set ordered according to the natural order of its items.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = ordtree::Set::new();
    ///
    /// set.insert(2).unwrap();
    /// set.insert(1).unwrap();
    /// set.insert(3).unwrap();
    ///
    /// let mut it = set.iter();
    /// assert_eq!(it.next(), Some(&1));
    /// assert_eq!(it.next(), Some(&2));
    /// assert_eq!(it.next(), Some(&3));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn new() -> Self { Set::with_cmp(compare::natural()) }
}

impl<T, C> Set<T, C> where C: Compare<T> {
    /// Creates an empty set ordered according to the given comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{Compare, natural};
    ///
    /// let mut set = ordtree::Set::with_cmp(natural().rev());
    ///
    /// set.insert(2).unwrap();
    /// set.insert(1).unwrap();
    /// set.insert(3).unwrap();
    ///
    /// let mut it = set.iter();
    /// assert_eq!(it.next(), Some(&3));
    /// assert_eq!(it.next(), Some(&2));
    /// assert_eq!(it.next(), Some(&1));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn with_cmp(cmp: C) -> Self { Set { tree: Tree::new(cmp) } }

    /// Checks if the set is empty.
    pub fn is_empty(&self) -> bool { self.tree.is_empty() }

    /// Returns the number of items in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = ordtree::Set::new();
    /// assert_eq!(set.len(), 0);
    ///
    /// set.insert(2).unwrap();
    /// set.insert(2).unwrap();
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize { self.tree.len() }

    /// Returns a reference to the set's comparator.
    pub fn cmp(&self) -> &C { self.tree.cmp() }

    /// Returns the largest number of items the set may hold.
    pub fn max_len(&self) -> usize { self.tree.max_len() }

    /// Limits the number of items the set may hold. Existing items are kept.
    pub fn set_max_len(&mut self, max_len: usize) { self.tree.set_max_len(max_len); }

    /// Removes all items from the set.
    pub fn clear(&mut self) { self.tree.clear(); }

    /// Inserts an item into the set unless the set already contains an equivalent item.
    ///
    /// Returns a cursor to the inserted item and `true`, or a cursor to the existing item and
    /// `false`, in which case the given item is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = ordtree::Set::new();
    ///
    /// assert!(set.insert(1).unwrap().1);
    /// assert!(!set.insert(1).unwrap().1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, item: T) -> Result<(Cursor, bool)> {
        self.tree.insert(item).map(|(link, inserted)| (Cursor(link), inserted))
    }

    /// Inserts an item into the set, using `hint` as a guess for the position of the item that
    /// should follow it. An incorrect hint is ignored.
    pub fn insert_hint(&mut self, hint: Cursor, item: T) -> Result<Cursor> {
        self.tree.insert_hint(hint.0, item).map(Cursor)
    }

    /// Inserts every item of an iterator, stopping at the first failure.
    pub fn try_extend<I>(&mut self, it: I) -> Result<()> where I: IntoIterator<Item=T> {
        let mut hint = self.end();
        for item in it { hint = self.insert_hint(hint, item).map(|c| self.next(c))?; }
        Ok(())
    }

    /// Removes the item equivalent to the given item from the set, returning `true` if the set
    /// contained it.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = ordtree::Set::new();
    ///
    /// set.insert(2).unwrap();
    /// set.insert(1).unwrap();
    ///
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn remove<Q: ?Sized>(&mut self, item: &Q) -> bool where C: Compare<Q, T> {
        self.take(item).is_some()
    }

    /// Removes and returns the item equivalent to the given item.
    pub fn take<Q: ?Sized>(&mut self, item: &Q) -> Option<T> where C: Compare<Q, T> {
        let link = self.tree.find(item);
        if link.is_nil() { None } else { self.tree.erase(link).ok() }
    }

    /// Removes the item at the given cursor and returns it.
    ///
    /// Fails with `Error::InvalidCursor` if the cursor is at the end, or if its item was removed and
    /// nothing has been inserted since.
    pub fn erase(&mut self, cursor: Cursor) -> Result<T> { self.tree.erase(cursor.0) }

    /// Removes the items in the half-open range `[first, last)`, returning how many were removed.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set: ordtree::Set<_> = (0..5).collect();
    ///
    /// let (begin, end) = (set.begin(), set.end());
    /// assert_eq!(set.erase_range(begin, end), Ok(5));
    /// assert!(set.is_empty());
    /// ```
    pub fn erase_range(&mut self, first: Cursor, last: Cursor) -> Result<usize> {
        self.tree.erase_range(first.0, last.0)
    }

    /// Checks if the set contains the given item.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = ordtree::Set::new();
    /// assert!(!set.contains(&1));
    /// set.insert(1).unwrap();
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains<Q: ?Sized>(&self, item: &Q) -> bool where C: Compare<Q, T> {
        !self.tree.find(item).is_nil()
    }

    /// Returns a reference to the set's item equivalent to the given item.
    pub fn get<Q: ?Sized>(&self, item: &Q) -> Option<&T> where C: Compare<Q, T> {
        self.tree.get(self.tree.find(item))
    }

    /// Returns a cursor to the item equivalent to the given item, or the end cursor.
    pub fn find<Q: ?Sized>(&self, item: &Q) -> Cursor where C: Compare<Q, T> {
        Cursor(self.tree.find(item))
    }

    /// Returns a cursor to the first item not ordered before the given item, or the end cursor.
    ///
    /// # Examples
    ///
    /// ```
    /// let set: ordtree::Set<_> = vec![10, 20, 30].into_iter().collect();
    ///
    /// assert_eq!(set.get_at(set.lower_bound(&20)), Some(&20));
    /// assert_eq!(set.get_at(set.lower_bound(&21)), Some(&30));
    /// assert_eq!(set.get_at(set.upper_bound(&20)), Some(&30));
    /// assert!(set.upper_bound(&30).is_end());
    /// ```
    pub fn lower_bound<Q: ?Sized>(&self, item: &Q) -> Cursor where C: Compare<Q, T> {
        Cursor(self.tree.lower_bound(item))
    }

    /// Returns a cursor to the first item ordered after the given item, or the end cursor.
    pub fn upper_bound<Q: ?Sized>(&self, item: &Q) -> Cursor where C: Compare<Q, T> {
        Cursor(self.tree.upper_bound(item))
    }

    /// Returns the lower and upper bound of the given item.
    pub fn equal_range<Q: ?Sized>(&self, item: &Q) -> (Cursor, Cursor) where C: Compare<Q, T> {
        let (lower, upper) = self.tree.equal_range(item);
        (Cursor(lower), Cursor(upper))
    }

    /// Returns the number of items equivalent to the given item: zero or one.
    pub fn count<Q: ?Sized>(&self, item: &Q) -> usize where C: Compare<Q, T> {
        self.tree.count(item)
    }

    /// Returns a cursor to the minimum item, or the end cursor if the set is empty.
    pub fn begin(&self) -> Cursor { Cursor(self.tree.begin()) }

    /// Returns the past-the-end cursor.
    pub fn end(&self) -> Cursor { Cursor(self.tree.end()) }

    /// Advances a cursor to the next item. Advancing the end cursor leaves it at the end.
    pub fn next(&self, cursor: Cursor) -> Cursor { Cursor(self.tree.next(cursor.0)) }

    /// Moves a cursor back to the previous item. Moving back from the end cursor yields the
    /// maximum item.
    pub fn prev(&self, cursor: Cursor) -> Cursor { Cursor(self.tree.prev(cursor.0)) }

    /// Returns the item at the given cursor, or `None` for the end cursor.
    pub fn get_at(&self, cursor: Cursor) -> Option<&T> { self.tree.get(cursor.0) }

    /// Returns a reference to the set's minimum item, or `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = ordtree::Set::new();
    /// assert_eq!(set.first(), None);
    ///
    /// set.insert(2).unwrap();
    /// set.insert(1).unwrap();
    /// set.insert(3).unwrap();
    ///
    /// assert_eq!(set.first(), Some(&1));
    /// ```
    pub fn first(&self) -> Option<&T> { self.tree.first() }

    /// Returns a reference to the set's maximum item, or `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = ordtree::Set::new();
    /// assert_eq!(set.last(), None);
    ///
    /// set.insert(2).unwrap();
    /// set.insert(1).unwrap();
    /// set.insert(3).unwrap();
    ///
    /// assert_eq!(set.last(), Some(&3));
    /// ```
    pub fn last(&self) -> Option<&T> { self.tree.last() }

    /// Removes the set's maximum item and returns it, or `None` if the set is empty.
    pub fn remove_max(&mut self) -> Option<T> {
        let last = self.tree.prev(self.tree.end());
        self.tree.erase(last).ok()
    }

    /// Removes the set's minimum item and returns it, or `None` if the set is empty.
    pub fn remove_min(&mut self) -> Option<T> {
        let begin = self.tree.begin();
        self.tree.erase(begin).ok()
    }

    /// Returns an iterator over the set.
    ///
    /// The iterator yields the items in ascending order according to the set's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = ordtree::Set::new();
    ///
    /// set.insert(2).unwrap();
    /// set.insert(1).unwrap();
    /// set.insert(3).unwrap();
    ///
    /// let mut it = set.iter();
    /// assert_eq!(it.next(), Some(&1));
    /// assert_eq!(it.next_back(), Some(&3));
    /// assert_eq!(it.next(), Some(&2));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<T> { Iter(self.tree.iter()) }

    /// Returns an iterator over the set's items that lie in the given range.
    ///
    /// The iterator yields the items in ascending order according to the set's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::ops::Bound::{Included, Excluded, Unbounded};
    ///
    /// let set: ordtree::Set<_> = (1..6).collect();
    ///
    /// assert_eq!(set.range(Excluded(&1), Included(&3)).collect::<Vec<_>>(), [&2, &3]);
    /// assert_eq!(set.range::<i32, i32>(Included(&4), Unbounded).collect::<Vec<_>>(), [&4, &5]);
    /// assert_eq!(set.range(Included(&4), Excluded(&2)).next(), None);
    /// ```
    pub fn range<Min: ?Sized, Max: ?Sized>(&self, min: Bound<&Min>, max: Bound<&Max>) -> Range<T>
        where C: Compare<Min, T> + Compare<Max, T> {

        let (first, last) = self.tree.bounds(min, max);
        Range(self.tree.span(first, last))
    }

    /// Returns an iterator over the items in the half-open cursor range `[first, last)`.
    ///
    /// `last` should be reachable from `first`. If it is not, the iterator runs from `first`
    /// through the maximum item.
    pub fn span(&self, first: Cursor, last: Cursor) -> Range<T> {
        Range(self.tree.span(first.0, last.0))
    }

    /// Exchanges the contents and comparators of two sets in constant time.
    pub fn swap(&mut self, other: &mut Self) { self.tree.swap(&mut other.tree); }

    /// Returns a copy of the set, or an error if storage for the copy could not be obtained.
    pub fn try_clone(&self) -> Result<Self> where T: Clone, C: Clone {
        self.tree.try_clone().map(|tree| Set { tree })
    }

    #[cfg(test)]
    pub(crate) fn tree(&self) -> &Tree<T, C, Identity> { &self.tree }
}

impl<T, C> Clone for Set<T, C> where T: Clone, C: Clone + Compare<T> {
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(set) => set,
            Err(e) => panic!("failed to clone set: {}", e),
        }
    }
}

impl<T, C> Debug for Set<T, C> where T: Debug, C: Compare<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C> Default for Set<T, C> where C: Compare<T> + Default {
    fn default() -> Self { Set::with_cmp(Default::default()) }
}

impl<T, C> Extend<T> for Set<T, C> where C: Compare<T> {
    fn extend<I: IntoIterator<Item=T>>(&mut self, it: I) {
        if let Err(e) = self.try_extend(it) { panic!("failed to extend set: {}", e); }
    }
}

impl<T, C> iter::FromIterator<T> for Set<T, C> where C: Compare<T> + Default {
    fn from_iter<I: IntoIterator<Item=T>>(it: I) -> Self {
        let mut set: Self = Default::default();
        set.extend(it);
        set
    }
}

impl<T, C> Hash for Set<T, C> where T: Hash, C: Compare<T> {
    fn hash<H: hash::Hasher>(&self, h: &mut H) {
        for item in self.iter() { item.hash(h); }
    }
}

impl<'a, T, C> IntoIterator for &'a Set<T, C> where C: Compare<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Iter<'a, T> { self.iter() }
}

impl<T, C> IntoIterator for Set<T, C> where C: Compare<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Returns an iterator that consumes the set.
    ///
    /// The iterator yields the items in ascending order according to the set's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = ordtree::Set::new();
    ///
    /// set.insert(2).unwrap();
    /// set.insert(1).unwrap();
    /// set.insert(3).unwrap();
    ///
    /// let mut it = set.into_iter();
    /// assert_eq!(it.next(), Some(1));
    /// assert_eq!(it.next(), Some(2));
    /// assert_eq!(it.next(), Some(3));
    /// assert_eq!(it.next(), None);
    /// ```
    fn into_iter(self) -> IntoIter<T> { IntoIter(self.tree.into_iter()) }
}

impl<T, C> PartialEq for Set<T, C> where C: Compare<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().zip(other.iter()).all(|(l, r)| self.cmp().compares_eq(l, r))
    }
}

impl<T, C> Eq for Set<T, C> where C: Compare<T> {}

impl<T, C> PartialOrd for Set<T, C> where C: Compare<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(Ord::cmp(self, other)) }
}

impl<T, C> Ord for Set<T, C> where C: Compare<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut l = self.iter();
        let mut r = other.iter();

        loop {
            match (l.next(), r.next()) {
                (None, None) => return Equal,
                (None, Some(_)) => return Less,
                (Some(_), None) => return Greater,
                (Some(l), Some(r)) => match self.tree.cmp().compare(l, r) {
                    Equal => {}
                    non_eq => return non_eq,
                },
            }
        }
    }
}

/// An iterator that consumes the set.
///
/// The iterator yields the items in ascending order according to the set's comparator.
///
/// # Examples
///
/// Acquire through the `IntoIterator` trait:
///
/// ```
/// let mut set = ordtree::Set::new();
///
/// set.insert(2).unwrap();
/// set.insert(1).unwrap();
/// set.insert(3).unwrap();
///
/// for item in set {
///     println!("{:?}", item);
/// }
/// ```
pub struct IntoIter<T>(node::IntoIter<T>);

impl<T> Iterator for IntoIter<T> {
    type Item = T;
    fn next(&mut self) -> Option<T> { self.0.next() }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> { self.0.next_back() }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

/// An iterator over the set.
///
/// The iterator yields the items in ascending order according to the set's comparator.
///
/// # Examples
///
/// Acquire through [`Set::iter`](struct.Set.html#method.iter) or the `IntoIterator` trait:
///
/// ```
/// let mut set = ordtree::Set::new();
///
/// set.insert(2).unwrap();
/// set.insert(1).unwrap();
/// set.insert(3).unwrap();
///
/// for item in &set {
///     println!("{:?}", item);
/// }
/// ```
pub struct Iter<'a, T: 'a>(node::Iter<'a, T>);

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Iter<'a, T> { Iter(self.0.clone()) }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<&'a T> { self.0.next() }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> { self.0.next_back() }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

/// An iterator over a range of the set's items.
///
/// Acquire through [`Set::range`](struct.Set.html#method.range) or
/// [`Set::span`](struct.Set.html#method.span).
pub struct Range<'a, T: 'a>(node::Iter<'a, T>);

impl<'a, T> Clone for Range<'a, T> {
    fn clone(&self) -> Range<'a, T> { Range(self.0.clone()) }
}

impl<'a, T> Iterator for Range<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<&'a T> { self.0.next() }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.bound_size_hint() }
}

impl<'a, T> DoubleEndedIterator for Range<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> { self.0.next_back() }
}
