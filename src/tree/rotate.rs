use crate::node::{Dir, Link};
use super::Tree;

impl<T, C, P> Tree<T, C, P> {
    /// Rotates the subtree rooted at `link` so that `link` moves down on side `D` and its child on
    /// the opposite side takes its place. `rotate::<Left>` is a left rotation.
    ///
    /// Colors, the element count and the in-order sequence are unchanged.
    pub(super) fn rotate<D: Dir>(&mut self, link: Link) {
        let child = D::Opposite::child(&self.nodes, link);
        let inner = D::child(&self.nodes, child);

        D::Opposite::set_child(&mut self.nodes, link, inner);
        self.nodes.set_parent(inner, link);

        let parent = self.nodes.parent(link);
        self.nodes.set_parent(child, parent);
        self.replace_child(parent, link, child);

        D::set_child(&mut self.nodes, child, link);
        self.nodes.set_parent(link, child);
    }

    // Points whichever slot of `parent` holds `old` at `new`. A nil parent means `old` is the root.
    pub(super) fn replace_child(&mut self, parent: Link, old: Link, new: Link) {
        if parent.is_nil() {
            self.root = new;
        } else if self.nodes.left(parent) == old {
            self.nodes.set_left(parent, new);
        } else {
            self.nodes.set_right(parent, new);
        }
    }
}
