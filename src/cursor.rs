//! Positions within a map or set.

use crate::node::Link;

/// A position in a map or set: one of its elements, or the past-the-end position.
///
/// A cursor is a plain handle. It does not borrow its container, so it can be kept across
/// mutations and handed back to the container that produced it, which steps it with `next` and
/// `prev`, reads through it with `get_at`, and erases through it with `erase`.
///
/// Insertions never invalidate a cursor, and erasing an element invalidates only the cursors
/// positioned at that element. Using an invalidated cursor, or a cursor obtained from a different
/// container, is a logic error: the result is unspecified and may be a panic or a position at an
/// unrelated element, but it is never memory-unsafe.
///
/// # Examples
///
/// ```
/// let mut set = ordtree::Set::new();
///
/// for x in vec![3, 1, 2] { set.insert(x).unwrap(); }
///
/// let end = set.end();
/// assert!(end.is_end());
///
/// // Stepping back from the end reaches the maximum.
/// let last = set.prev(end);
/// assert_eq!(set.get_at(last), Some(&3));
/// assert_eq!(set.get_at(set.next(last)), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cursor(pub(crate) Link);

impl Cursor {
    /// Checks if the cursor is at the past-the-end position.
    pub fn is_end(&self) -> bool { self.0.is_nil() }
}
