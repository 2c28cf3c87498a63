use std::marker::PhantomData;
use super::{Link, Links, NIL, live, predecessor, successor};

// An inclusive span of nodes in in-order sequence, consumed from either end.
//
// `len` is exact when the span covers the whole tree and an upper bound otherwise.
#[derive(Clone)]
struct Span {
    front: Link,
    back: Link,
    len: usize,
}

impl Span {
    fn new(front: Link, back: Link, len: usize) -> Span {
        if front.is_nil() || back.is_nil() || len == 0 {
            Span { front: NIL, back: NIL, len: 0 }
        } else {
            Span { front, back, len }
        }
    }

    fn pop_front(&mut self, links: &[Links]) -> Option<Link> {
        if self.front.is_nil() { return None; }

        let link = self.front;
        if link == self.back {
            self.front = NIL;
            self.back = NIL;
        } else {
            self.front = successor(links, link);
        }

        self.len -= 1;
        Some(link)
    }

    fn pop_back(&mut self, links: &[Links]) -> Option<Link> {
        if self.back.is_nil() { return None; }

        let link = self.back;
        if link == self.front {
            self.front = NIL;
            self.back = NIL;
        } else {
            self.back = predecessor(links, link);
        }

        self.len -= 1;
        Some(link)
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }

    fn bound_size_hint(&self) -> (usize, Option<usize>) {
        (if self.front.is_nil() { 0 } else { 1 }, Some(self.len))
    }
}

/// An in-order iterator over shared references to a span of node values.
pub struct Iter<'a, T: 'a> {
    links: &'a [Links],
    values: &'a [Option<T>],
    span: Span,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(links: &'a [Links], values: &'a [Option<T>], front: Link, back: Link,
                      len: usize) -> Iter<'a, T> {
        Iter { links, values, span: Span::new(front, back, len) }
    }

    /// The size hint of a span that may not cover the whole tree.
    pub fn bound_size_hint(&self) -> (usize, Option<usize>) { self.span.bound_size_hint() }
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Iter<'a, T> {
        Iter { links: self.links, values: self.values, span: self.span.clone() }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let values = self.values;
        self.span.pop_front(self.links).map(|link| live(values[link.0].as_ref(), link))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { self.span.size_hint() }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        let values = self.values;
        self.span.pop_back(self.links).map(|link| live(values[link.0].as_ref(), link))
    }
}

/// An in-order iterator over mutable references to a span of node values.
pub struct IterMut<'a, T: 'a> {
    links: &'a [Links],
    values: *mut Option<T>,
    span: Span,
    _values: PhantomData<&'a mut [Option<T>]>,
}

impl<'a, T> IterMut<'a, T> {
    pub(super) fn new(links: &'a [Links], values: &'a mut [Option<T>], front: Link, back: Link,
                      len: usize) -> IterMut<'a, T> {
        IterMut {
            links,
            values: values.as_mut_ptr(),
            span: Span::new(front, back, len),
            _values: PhantomData,
        }
    }

    pub fn bound_size_hint(&self) -> (usize, Option<usize>) { self.span.bound_size_hint() }

    fn value(&mut self, link: Link) -> &'a mut T {
        debug_assert!(link.0 < self.links.len());
        // A span yields each link at most once, so no two returned references alias.
        let slot = unsafe { &mut *self.values.add(link.0) };
        live(slot.as_mut(), link)
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        self.span.pop_front(self.links).map(|link| self.value(link))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { self.span.size_hint() }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        self.span.pop_back(self.links).map(|link| self.value(link))
    }
}

unsafe impl<'a, T> Send for IterMut<'a, T> where T: Send {}
unsafe impl<'a, T> Sync for IterMut<'a, T> where T: Sync {}

/// An in-order iterator that moves values out of a span of nodes.
///
/// Values outside the span, and values not yet yielded, are dropped with the iterator.
pub struct IntoIter<T> {
    links: Vec<Links>,
    values: Vec<Option<T>>,
    span: Span,
}

impl<T> IntoIter<T> {
    pub(super) fn new(links: Vec<Links>, values: Vec<Option<T>>, front: Link, back: Link,
                      len: usize) -> IntoIter<T> {
        IntoIter { links, values, span: Span::new(front, back, len) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let link = self.span.pop_front(&self.links)?;
        Some(live(self.values[link.0].take(), link))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { self.span.size_hint() }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        let link = self.span.pop_back(&self.links)?;
        Some(live(self.values[link.0].take(), link))
    }
}
