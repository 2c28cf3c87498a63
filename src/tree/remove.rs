use crate::error::{Error, Result};
use crate::node::{Color, Dir, Left, Link, Right};
use log::{debug, trace};
use super::Tree;

impl<T, C, P> Tree<T, C, P> {
    /// Erases the element at `link` and returns its value.
    ///
    /// Only links to the erased element are invalidated. Fails with `InvalidCursor`, leaving the
    /// tree unchanged, if `link` is the sentinel or its slot holds no element.
    pub fn erase(&mut self, link: Link) -> Result<T> {
        if link.is_nil() {
            debug!("erase: refusing to erase through the end cursor");
            return Err(Error::InvalidCursor);
        }
        if self.nodes.get(link).is_none() {
            debug!("erase: {:?} does not refer to a live node", link);
            return Err(Error::InvalidCursor);
        }

        let left = self.nodes.left(link);
        let right = self.nodes.right(link);

        // The node that leaves its position, its color, the child that takes its place, and the
        // parent of that child afterwards.
        let (removed, replace, replace_parent) = if left.is_nil() || right.is_nil() {
            let replace = if left.is_nil() { right } else { left };
            let parent = self.nodes.parent(link);

            self.nodes.set_parent(replace, parent);
            self.replace_child(parent, link, replace);

            if self.leftmost == link {
                self.leftmost = if replace.is_nil() { parent } else { self.nodes.min(replace) };
            }
            if self.rightmost == link {
                self.rightmost = if replace.is_nil() { parent } else { self.nodes.max(replace) };
            }

            (self.nodes.color(link), replace, parent)
        } else {
            // Relink the successor into the erased node's position. It has no left child.
            let successor = self.nodes.min(right);
            let replace = self.nodes.right(successor);

            self.nodes.set_parent(left, successor);
            self.nodes.set_left(successor, left);

            let replace_parent = if successor == right {
                successor
            } else {
                let parent = self.nodes.parent(successor);
                self.nodes.set_parent(replace, parent);
                self.nodes.set_left(parent, replace);
                self.nodes.set_right(successor, right);
                self.nodes.set_parent(right, successor);
                parent
            };

            let parent = self.nodes.parent(link);
            self.replace_child(parent, link, successor);
            self.nodes.set_parent(successor, parent);

            // The successor inherits the erased node's color, so the color that leaves the tree is
            // the successor's own.
            let removed = self.nodes.color(successor);
            self.nodes.set_color(successor, self.nodes.color(link));

            (removed, replace, replace_parent)
        };

        if removed == Color::Black { self.fixup_remove(replace, replace_parent); }

        self.len -= 1;
        trace!("erase: unlinked {:?}", link);
        Ok(self.nodes.free(link))
    }

    /// Erases the elements of the half-open range `[first, last)`, returning how many were erased.
    ///
    /// Erasing the whole tree destroys every node at once. Fails with `InvalidCursor`, erasing
    /// nothing, if `last` cannot be reached from `first`.
    pub fn erase_range(&mut self, first: Link, last: Link) -> Result<usize> {
        if !self.is_empty() && first == self.leftmost && last.is_nil() {
            let len = self.len;
            debug!("erase_range: erasing all {} elements", len);
            self.clear();
            return Ok(len);
        }

        if !first.is_nil() && self.nodes.get(first).is_none() {
            debug!("erase_range: {:?} does not refer to a live node", first);
            return Err(Error::InvalidCursor);
        }

        let mut count = 0;
        let mut link = first;

        while link != last {
            if link.is_nil() {
                debug!("erase_range: {:?} is not reachable from {:?}", last, first);
                return Err(Error::InvalidCursor);
            }
            count += 1;
            link = self.nodes.next(link);
        }

        link = first;
        while link != last {
            let next = self.nodes.next(link);
            drop(self.erase(link)?);
            link = next;
        }

        Ok(count)
    }

    // Restores the black height after a black node left the tree. `link` is the child that took
    // its place, possibly the sentinel, and `parent` is that child's parent.
    fn fixup_remove(&mut self, mut link: Link, mut parent: Link) {
        while link != self.root && !self.nodes.is_red(link) {
            let next = if link == self.nodes.left(parent) {
                self.fixup_remove_step::<Left>(link, parent)
            } else {
                self.fixup_remove_step::<Right>(link, parent)
            };

            match next {
                Some(up) => {
                    link = up;
                    parent = self.nodes.parent(up);
                }
                None => break,
            }
        }

        self.nodes.set_color(link, Color::Black);
    }

    // One step of the deletion fix-up for a doubly black `link` on side `D` of `parent`.
    // Returns the node the deficiency moved up to, or `None` once it has been absorbed.
    fn fixup_remove_step<D: Dir>(&mut self, link: Link, parent: Link) -> Option<Link> {
        let mut sibling = D::Opposite::child(&self.nodes, parent);

        if self.nodes.is_red(sibling) {
            trace!("fixup_remove: red sibling {:?}, rotating at {:?}", sibling, parent);
            self.nodes.set_color(sibling, Color::Black);
            self.nodes.set_color(parent, Color::Red);
            self.rotate::<D>(parent);
            sibling = D::Opposite::child(&self.nodes, parent);
        }

        if sibling.is_nil() { return Some(parent); }

        let near = D::child(&self.nodes, sibling);
        let far = D::Opposite::child(&self.nodes, sibling);

        if !self.nodes.is_red(near) && !self.nodes.is_red(far) {
            trace!("fixup_remove: black nephews, moving up from {:?}", link);
            self.nodes.set_color(sibling, Color::Red);
            return Some(parent);
        }

        if !self.nodes.is_red(far) {
            trace!("fixup_remove: red near nephew {:?}, rotating at sibling", near);
            self.nodes.set_color(near, Color::Black);
            self.nodes.set_color(sibling, Color::Red);
            self.rotate::<D::Opposite>(sibling);
            sibling = D::Opposite::child(&self.nodes, parent);
        }

        trace!("fixup_remove: red far nephew, rotating at {:?}", parent);
        self.nodes.set_color(sibling, self.nodes.color(parent));
        self.nodes.set_color(parent, Color::Black);
        let far = D::Opposite::child(&self.nodes, sibling);
        self.nodes.set_color(far, Color::Black);
        self.rotate::<D>(parent);
        None
    }
}
