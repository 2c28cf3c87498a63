use compare::Compare;
use crate::error::{Error, Result};
use crate::key::KeyOf;
use crate::node::{Color, Dir, Left, Link, Right, NIL};
use log::{debug, trace};
use super::Tree;

impl<T, C, P> Tree<T, C, P> where P: KeyOf<T>, C: Compare<P::Key> {
    /// Inserts `value` unless an element with an equivalent key is already present.
    ///
    /// Returns the link to the new element and `true`, or the link to the existing element and
    /// `false`, in which case `value` is dropped.
    pub fn insert(&mut self, value: T) -> Result<(Link, bool)> {
        let mut link = self.root;
        let mut parent = NIL;
        let mut add_left = true;

        while !link.is_nil() {
            parent = link;
            add_left = self.cmp.compares_lt(P::key(&value), self.key(link));
            link = if add_left { self.nodes.left(link) } else { self.nodes.right(link) };
        }

        // An equivalent key can only be held by the in-order predecessor of the insertion point.
        let mut neighbor = parent;

        if add_left {
            if neighbor == self.leftmost {
                return self.insert_at(true, parent, value).map(|link| (link, true));
            }
            neighbor = self.nodes.prev(neighbor);
        }

        if self.cmp.compares_lt(self.key(neighbor), P::key(&value)) {
            self.insert_at(add_left, parent, value).map(|link| (link, true))
        } else {
            trace!("insert: equivalent key already at {:?}", neighbor);
            Ok((neighbor, false))
        }
    }

    /// Inserts `value`, using `hint` as a guess for the element that should follow it.
    ///
    /// When `value` belongs immediately before `hint` it is linked without a search; otherwise
    /// this behaves exactly like `insert`. Returns the link to the new or the existing element.
    pub fn insert_hint(&mut self, hint: Link, value: T) -> Result<Link> {
        if self.is_empty() { return self.insert_at(true, NIL, value); }

        if hint == self.leftmost {
            if self.cmp.compares_lt(P::key(&value), self.key(self.leftmost)) {
                return self.insert_at(true, self.leftmost, value);
            }
        } else if hint.is_nil() {
            if self.cmp.compares_lt(self.key(self.rightmost), P::key(&value)) {
                return self.insert_at(false, self.rightmost, value);
            }
        } else {
            let before = self.nodes.prev(hint);

            if self.cmp.compares_lt(self.key(before), P::key(&value))
                && self.cmp.compares_lt(P::key(&value), self.key(hint)) {

                // Either `before` has no right child or `hint` has no left child.
                return if self.nodes.right(before).is_nil() {
                    self.insert_at(false, before, value)
                } else {
                    self.insert_at(true, hint, value)
                };
            }
        }

        trace!("insert_hint: {:?} does not fit, searching", hint);
        self.insert(value).map(|(link, _)| link)
    }

    // Links a new red node holding `value` as the `add_left` child of `parent`, then rebalances.
    // A nil parent makes the node the root of an empty tree.
    fn insert_at(&mut self, add_left: bool, parent: Link, value: T) -> Result<Link> {
        if self.len >= self.max_len {
            debug!("insert: refusing to grow past {} elements", self.max_len);
            return Err(Error::CapacityExceeded { max: self.max_len });
        }

        let link = match self.nodes.alloc(parent, Color::Red, value) {
            Ok(link) => link,
            Err(e) => {
                debug!("insert: {}", e);
                return Err(e);
            }
        };

        self.len += 1;

        if parent.is_nil() {
            self.root = link;
            self.leftmost = link;
            self.rightmost = link;
        } else if add_left {
            self.nodes.set_left(parent, link);
            if parent == self.leftmost { self.leftmost = link; }
        } else {
            self.nodes.set_right(parent, link);
            if parent == self.rightmost { self.rightmost = link; }
        }

        trace!("insert: linked {:?} below {:?}", link, parent);
        self.fixup_insert(link);
        Ok(link)
    }

    // Restores the red-black invariants after `link` was linked as a red leaf.
    fn fixup_insert(&mut self, mut link: Link) {
        while self.nodes.is_red(self.nodes.parent(link)) {
            let parent = self.nodes.parent(link);
            let grandparent = self.nodes.parent(parent);

            link = if parent == self.nodes.left(grandparent) {
                self.fixup_insert_step::<Left>(link)
            } else {
                self.fixup_insert_step::<Right>(link)
            };
        }

        let root = self.root;
        self.nodes.set_color(root, Color::Black);
    }

    // One step of the insertion fix-up for a red `link` below a red parent hanging on side `D` of
    // the grandparent. Returns the node to continue from.
    fn fixup_insert_step<D: Dir>(&mut self, mut link: Link) -> Link {
        let parent = self.nodes.parent(link);
        let grandparent = self.nodes.parent(parent);
        let uncle = D::Opposite::child(&self.nodes, grandparent);

        if self.nodes.is_red(uncle) {
            trace!("fixup_insert: red uncle, recoloring at {:?}", grandparent);
            self.nodes.set_color(parent, Color::Black);
            self.nodes.set_color(uncle, Color::Black);
            self.nodes.set_color(grandparent, Color::Red);
            return grandparent;
        }

        if link == D::Opposite::child(&self.nodes, parent) {
            trace!("fixup_insert: inner grandchild {:?}, rotating at parent", link);
            link = parent;
            self.rotate::<D>(link);
        }

        let parent = self.nodes.parent(link);
        let grandparent = self.nodes.parent(parent);

        trace!("fixup_insert: outer grandchild {:?}, rotating at {:?}", link, grandparent);
        self.nodes.set_color(parent, Color::Black);
        self.nodes.set_color(grandparent, Color::Red);
        self.rotate::<D::Opposite>(grandparent);
        link
    }
}
