//! The node arena.
//!
//! Nodes live in two parallel vectors indexed by `Link`: one holds the structural links and color
//! of every slot, the other holds the stored values. Erased slots are threaded onto a free list
//! through their `parent` links and reused by later insertions.
//!
//! The nil sentinel is not stored. It is the distinguished link `NIL`, which is always black and
//! terminates every descent and every walk up the tree. The roles the sentinel plays as the root's
//! parent and as the leftmost/rightmost cache belong to the tree itself.

mod iter;

use crate::error::Result;
use std::cmp;
use std::fmt::{self, Debug};
use std::mem;

pub use self::iter::{IntoIter, Iter, IterMut};

#[cfg(test)]
thread_local! {
    /// When set, the number of allocations on this thread that succeed before `alloc` fails.
    pub static FAIL_AFTER: std::cell::Cell<Option<usize>> = std::cell::Cell::new(None);
}

#[cfg(test)]
fn injected_failure() -> Result<()> {
    FAIL_AFTER.with(|fail_after| match fail_after.get() {
        None => Ok(()),
        Some(0) => Err(Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err().into()),
        Some(n) => {
            fail_after.set(Some(n - 1));
            Ok(())
        }
    })
}

/// A link to a node, or to the nil sentinel.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Link(usize);

/// The nil sentinel.
pub const NIL: Link = Link(usize::MAX);

impl Link {
    pub fn is_nil(self) -> bool { self == NIL }
}

impl Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_nil() { write!(f, "nil") } else { write!(f, "#{}", self.0) }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

#[derive(Clone, Copy, Debug)]
struct Links {
    parent: Link,
    left: Link,
    right: Link,
    color: Color,
}

fn live<T>(value: Option<T>, link: Link) -> T {
    match value {
        Some(value) => value,
        None => panic!("{:?} does not refer to a live node", link),
    }
}

fn min(links: &[Links], mut link: Link) -> Link {
    while !links[link.0].left.is_nil() { link = links[link.0].left; }
    link
}

fn max(links: &[Links], mut link: Link) -> Link {
    while !links[link.0].right.is_nil() { link = links[link.0].right; }
    link
}

// The in-order successor of a live node, or `NIL` past the maximum.
fn successor(links: &[Links], link: Link) -> Link {
    if link.is_nil() { return NIL; }

    let right = links[link.0].right;
    if !right.is_nil() { return min(links, right); }

    let mut child = link;
    let mut parent = links[link.0].parent;
    while !parent.is_nil() && child == links[parent.0].right {
        child = parent;
        parent = links[parent.0].parent;
    }
    parent
}

// The in-order predecessor of a live node, or `NIL` before the minimum.
fn predecessor(links: &[Links], link: Link) -> Link {
    let left = links[link.0].left;
    if !left.is_nil() { return max(links, left); }

    let mut child = link;
    let mut parent = links[link.0].parent;
    while !parent.is_nil() && child == links[parent.0].left {
        child = parent;
        parent = links[parent.0].parent;
    }
    parent
}

pub struct Nodes<T> {
    links: Vec<Links>,
    values: Vec<Option<T>>,
    free: Link,
}

impl<T> Nodes<T> {
    pub fn new() -> Self {
        Nodes { links: Vec::new(), values: Vec::new(), free: NIL }
    }

    /// The largest number of nodes the arena can address.
    pub fn max_len() -> usize {
        let node = mem::size_of::<Links>() + mem::size_of::<Option<T>>();
        isize::MAX as usize / cmp::max(node, 1)
    }

    /// Allocates a node holding `value`, with nil children.
    ///
    /// Storage is reserved before anything is modified, so on failure the arena is unchanged.
    pub fn alloc(&mut self, parent: Link, color: Color, value: T) -> Result<Link> {
        let links = Links { parent, left: NIL, right: NIL, color };

        #[cfg(test)]
        injected_failure()?;

        if self.free.is_nil() {
            self.links.try_reserve(1)?;
            self.values.try_reserve(1)?;
            self.links.push(links);
            self.values.push(Some(value));
            Ok(Link(self.links.len() - 1))
        } else {
            let link = self.free;
            self.free = self.links[link.0].parent;
            self.links[link.0] = links;
            self.values[link.0] = Some(value);
            Ok(link)
        }
    }

    /// Releases a node, returning its value.
    pub fn free(&mut self, link: Link) -> T {
        let value = live(self.values[link.0].take(), link);
        self.links[link.0].parent = self.free;
        self.free = link;
        value
    }

    /// Releases every node at once.
    pub fn clear(&mut self) {
        self.links.clear();
        self.values.clear();
        self.free = NIL;
    }

    pub fn get(&self, link: Link) -> Option<&T> {
        self.values.get(link.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, link: Link) -> Option<&mut T> {
        self.values.get_mut(link.0).and_then(Option::as_mut)
    }

    pub fn value(&self, link: Link) -> &T { live(self.get(link), link) }

    pub fn value_mut(&mut self, link: Link) -> &mut T { live(self.get_mut(link), link) }

    pub fn parent(&self, link: Link) -> Link { self.links[link.0].parent }

    pub fn left(&self, link: Link) -> Link { self.links[link.0].left }

    pub fn right(&self, link: Link) -> Link { self.links[link.0].right }

    /// Returns the color of a node. The sentinel is black.
    pub fn color(&self, link: Link) -> Color {
        if link.is_nil() { Color::Black } else { self.links[link.0].color }
    }

    pub fn is_red(&self, link: Link) -> bool { self.color(link) == Color::Red }

    // The sentinel's links are never written: it has no parent, no children and stays black.

    pub fn set_parent(&mut self, link: Link, parent: Link) {
        if !link.is_nil() { self.links[link.0].parent = parent; }
    }

    pub fn set_left(&mut self, link: Link, left: Link) {
        if !link.is_nil() { self.links[link.0].left = left; }
    }

    pub fn set_right(&mut self, link: Link, right: Link) {
        if !link.is_nil() { self.links[link.0].right = right; }
    }

    pub fn set_color(&mut self, link: Link, color: Color) {
        if link.is_nil() {
            debug_assert_eq!(color, Color::Black, "the sentinel must stay black");
        } else {
            self.links[link.0].color = color;
        }
    }

    /// Returns the minimum node of the subtree rooted at a live node.
    pub fn min(&self, link: Link) -> Link { min(&self.links, link) }

    /// Returns the maximum node of the subtree rooted at a live node.
    pub fn max(&self, link: Link) -> Link { max(&self.links, link) }

    /// Returns the in-order successor of a node. The successor of the sentinel is the sentinel.
    pub fn next(&self, link: Link) -> Link { successor(&self.links, link) }

    /// Returns the in-order predecessor of a live node, or the sentinel if it is the minimum.
    pub fn prev(&self, link: Link) -> Link { predecessor(&self.links, link) }

    pub fn iter(&self, front: Link, back: Link, len: usize) -> Iter<T> {
        Iter::new(&self.links, &self.values, front, back, len)
    }

    pub fn iter_mut(&mut self, front: Link, back: Link, len: usize) -> IterMut<T> {
        IterMut::new(&self.links, &mut self.values, front, back, len)
    }

    pub fn into_iter(self, front: Link, back: Link, len: usize) -> IntoIter<T> {
        IntoIter::new(self.links, self.values, front, back, len)
    }

    #[cfg(test)]
    pub fn live_count(&self) -> usize { self.values.iter().filter(|v| v.is_some()).count() }
}

/// A side of a node, so that mirror-image rebalancing cases are written once.
pub trait Dir {
    type Opposite: Dir<Opposite = Self>;

    fn child<T>(nodes: &Nodes<T>, link: Link) -> Link;
    fn set_child<T>(nodes: &mut Nodes<T>, link: Link, child: Link);
}

#[allow(unused)]
pub enum Left {}

impl Dir for Left {
    type Opposite = Right;

    fn child<T>(nodes: &Nodes<T>, link: Link) -> Link { nodes.left(link) }
    fn set_child<T>(nodes: &mut Nodes<T>, link: Link, child: Link) { nodes.set_left(link, child) }
}

#[allow(unused)]
pub enum Right {}

impl Dir for Right {
    type Opposite = Left;

    fn child<T>(nodes: &Nodes<T>, link: Link) -> Link { nodes.right(link) }
    fn set_child<T>(nodes: &mut Nodes<T>, link: Link, child: Link) { nodes.set_right(link, child) }
}
