//! The red-black tree shared by `Map` and `Set`.
//!
//! A tree is parameterized by the stored value type `T`, a comparator `C` over keys, and a key
//! projection `P` that extracts the key from a stored value. All operations speak in `Link`s; the
//! front-ends wrap them into `Cursor`s.
//!
//! Erasure relinks nodes rather than moving values between them, so a link stays attached to its
//! element until that element is erased.

mod insert;
mod remove;
mod rotate;

#[cfg(test)]
mod test;

use compare::Compare;
use crate::error::Result;
use crate::key::KeyOf;
use crate::node::{IntoIter, Iter, IterMut, Link, Nodes, NIL};
use log::debug;
use std::marker::PhantomData;
use std::mem;
use std::ops::Bound;

pub struct Tree<T, C, P> {
    nodes: Nodes<T>,
    root: Link,
    leftmost: Link,
    rightmost: Link,
    len: usize,
    max_len: usize,
    cmp: C,
    _key: PhantomData<P>,
}

impl<T, C, P> Tree<T, C, P> {
    pub fn new(cmp: C) -> Self {
        Tree {
            nodes: Nodes::new(),
            root: NIL,
            leftmost: NIL,
            rightmost: NIL,
            len: 0,
            max_len: Nodes::<T>::max_len(),
            cmp,
            _key: PhantomData,
        }
    }

    pub fn is_empty(&self) -> bool { self.root.is_nil() }

    pub fn len(&self) -> usize { self.len }

    pub fn cmp(&self) -> &C { &self.cmp }

    pub fn max_len(&self) -> usize { self.max_len }

    pub fn set_max_len(&mut self, max_len: usize) {
        self.max_len = max_len.min(Nodes::<T>::max_len());
    }

    /// The minimum element, or the sentinel if the tree is empty.
    pub fn begin(&self) -> Link { self.leftmost }

    pub fn end(&self) -> Link { NIL }

    /// Steps forward in order. Stepping past the end stays at the end.
    pub fn next(&self, link: Link) -> Link { self.nodes.next(link) }

    /// Steps backward in order. Stepping back from the end yields the maximum element; stepping
    /// back from the minimum yields the end.
    pub fn prev(&self, link: Link) -> Link {
        if link.is_nil() { self.rightmost } else { self.nodes.prev(link) }
    }

    pub fn get(&self, link: Link) -> Option<&T> { self.nodes.get(link) }

    /// Returns a mutable reference to an element.
    ///
    /// Callers must not change the element's key.
    pub fn get_mut(&mut self, link: Link) -> Option<&mut T> { self.nodes.get_mut(link) }

    /// Returns the element at a live link.
    pub fn value(&self, link: Link) -> &T { self.nodes.value(link) }

    /// Returns the element at a live link mutably. Callers must not change its key.
    pub fn value_mut(&mut self, link: Link) -> &mut T { self.nodes.value_mut(link) }

    pub fn first(&self) -> Option<&T> { self.nodes.get(self.leftmost) }

    pub fn last(&self) -> Option<&T> { self.nodes.get(self.rightmost) }

    pub fn iter(&self) -> Iter<T> { self.nodes.iter(self.leftmost, self.rightmost, self.len) }

    pub fn iter_mut(&mut self) -> IterMut<T> {
        self.nodes.iter_mut(self.leftmost, self.rightmost, self.len)
    }

    pub fn into_iter(self) -> IntoIter<T> {
        self.nodes.into_iter(self.leftmost, self.rightmost, self.len)
    }

    /// Iterates over the half-open range `[first, last)`.
    ///
    /// If `last` is not reachable from `first`, iteration runs from `first` through the maximum.
    pub fn span(&self, first: Link, last: Link) -> Iter<T> {
        if first == last { return self.nodes.iter(NIL, NIL, 0); }
        self.nodes.iter(first, self.prev(last), self.len)
    }

    pub fn span_mut(&mut self, first: Link, last: Link) -> IterMut<T> {
        if first == last { return self.nodes.iter_mut(NIL, NIL, 0); }
        let back = self.prev(last);
        self.nodes.iter_mut(first, back, self.len)
    }

    /// Destroys every element.
    pub fn clear(&mut self) {
        if !self.is_empty() { debug!("clear: destroying {} nodes", self.len); }
        self.nodes.clear();
        self.root = NIL;
        self.leftmost = NIL;
        self.rightmost = NIL;
        self.len = 0;
    }

    /// Exchanges the contents and comparators of two trees without touching any node.
    pub fn swap(&mut self, other: &mut Self) {
        debug!("swap: exchanging trees of {} and {} nodes", self.len, other.len);
        mem::swap(self, other);
    }

    // Frees a detached subtree in post-order. Does not adjust `len`.
    fn erase_subtree(&mut self, mut link: Link) {
        while !link.is_nil() {
            let right = self.nodes.right(link);
            self.erase_subtree(right);
            let left = self.nodes.left(link);
            drop(self.nodes.free(link));
            link = left;
        }
    }
}

impl<T, C, P> Tree<T, C, P> where P: KeyOf<T>, C: Compare<P::Key> {
    fn key(&self, link: Link) -> &P::Key { P::key(self.nodes.value(link)) }

    /// Returns the first element whose key is not ordered before `key`, or the sentinel.
    pub fn lower_bound<Q: ?Sized>(&self, key: &Q) -> Link where C: Compare<Q, P::Key> {
        let mut link = self.root;
        let mut bound = NIL;

        while !link.is_nil() {
            if <C as Compare<Q, P::Key>>::compares_gt(&self.cmp, key, self.key(link)) {
                link = self.nodes.right(link);
            } else {
                bound = link;
                link = self.nodes.left(link);
            }
        }

        bound
    }

    /// Returns the first element whose key is ordered after `key`, or the sentinel.
    pub fn upper_bound<Q: ?Sized>(&self, key: &Q) -> Link where C: Compare<Q, P::Key> {
        let mut link = self.root;
        let mut bound = NIL;

        while !link.is_nil() {
            if <C as Compare<Q, P::Key>>::compares_lt(&self.cmp, key, self.key(link)) {
                bound = link;
                link = self.nodes.left(link);
            } else {
                link = self.nodes.right(link);
            }
        }

        bound
    }

    pub fn equal_range<Q: ?Sized>(&self, key: &Q) -> (Link, Link) where C: Compare<Q, P::Key> {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Searches for `key`, returning `Ok` with the element whose key is equivalent to it, or `Err`
    /// with the lower bound where such an element would be inserted.
    pub fn locate<Q: ?Sized>(&self, key: &Q) -> ::std::result::Result<Link, Link>
        where C: Compare<Q, P::Key> {

        let link = self.lower_bound(key);
        if link.is_nil() || <C as Compare<Q, P::Key>>::compares_lt(&self.cmp, key, self.key(link)) {
            Err(link)
        } else {
            Ok(link)
        }
    }

    /// Returns the element whose key is equivalent to `key`, or the sentinel.
    pub fn find<Q: ?Sized>(&self, key: &Q) -> Link where C: Compare<Q, P::Key> {
        self.locate(key).unwrap_or(NIL)
    }

    pub fn count<Q: ?Sized>(&self, key: &Q) -> usize where C: Compare<Q, P::Key> {
        let (mut link, upper) = self.equal_range(key);
        let mut count = 0;

        while link != upper {
            count += 1;
            link = self.nodes.next(link);
        }

        count
    }

    /// Resolves a pair of bounds into the half-open link range `[first, last)`.
    ///
    /// The range is empty when the lower bound does not precede the upper one.
    pub fn bounds<Min: ?Sized, Max: ?Sized>(&self, min: Bound<&Min>, max: Bound<&Max>)
        -> (Link, Link) where C: Compare<Min, P::Key> + Compare<Max, P::Key> {

        let first = match min {
            Bound::Included(key) => self.lower_bound(key),
            Bound::Excluded(key) => self.upper_bound(key),
            Bound::Unbounded => self.leftmost,
        };

        let last = match max {
            Bound::Included(key) => self.upper_bound(key),
            Bound::Excluded(key) => self.lower_bound(key),
            Bound::Unbounded => NIL,
        };

        let ordered = |first: Link, last: Link| {
            <C as Compare<P::Key>>::compares_lt(&self.cmp, self.key(first), self.key(last))
        };

        if first.is_nil() || (!last.is_nil() && !ordered(first, last)) {
            (NIL, NIL)
        } else {
            (first, last)
        }
    }

    /// Makes a structural copy: same shape, same colors, cloned values.
    ///
    /// If a node cannot be allocated, everything copied so far is freed and the error is returned.
    pub fn try_clone(&self) -> Result<Self> where T: Clone, C: Clone {
        let mut tree = Tree::new(self.cmp.clone());
        tree.max_len = self.max_len;

        let root = match tree.copy_subtree(self, self.root, NIL) {
            Ok(root) => root,
            Err(e) => {
                debug!("copy: abandoned copy of {} nodes: {}", self.len, e);
                return Err(e);
            }
        };

        if !root.is_nil() {
            tree.root = root;
            tree.leftmost = tree.nodes.min(root);
            tree.rightmost = tree.nodes.max(root);
            tree.len = self.len;
        }

        debug!("copy: {} nodes", self.len);
        Ok(tree)
    }

    // Copies the subtree of `src` rooted at `link` in pre-order, attaching it below `parent`.
    //
    // On failure the partial copy made by this call is freed before the error propagates.
    fn copy_subtree(&mut self, src: &Self, link: Link, parent: Link) -> Result<Link>
        where T: Clone {

        if link.is_nil() { return Ok(NIL); }

        let value = src.nodes.value(link).clone();
        let copy = self.nodes.alloc(parent, src.nodes.color(link), value)?;

        match self.copy_subtree(src, src.nodes.left(link), copy) {
            Ok(left) => self.nodes.set_left(copy, left),
            Err(e) => {
                self.erase_subtree(copy);
                return Err(e);
            }
        }

        match self.copy_subtree(src, src.nodes.right(link), copy) {
            Ok(right) => self.nodes.set_right(copy, right),
            Err(e) => {
                self.erase_subtree(copy);
                return Err(e);
            }
        }

        Ok(copy)
    }
}
