//! Ordered maps and sets based on a red-black tree.
//!
//! [`Map`] and [`Set`] share one tree implementation, differing only in how a stored value yields
//! its key. Both are ordered by a [`compare::Compare`] comparator, the natural order of the keys
//! by default, and hold at most one element per equivalence class of keys.
//!
//! Besides borrowing iterators, both containers hand out [`Cursor`]s: copyable positions that
//! follow the usual begin/end protocol. `begin()` is the minimum element, `end()` is the
//! past-the-end position, and stepping back from `end()` reaches the maximum.
//!
//! Operations that may allocate or that take a cursor return a [`Result`]; a failed operation
//! leaves its container unchanged.

#![warn(missing_docs)]

pub mod map;
pub mod set;

mod cursor;
mod error;
mod key;
mod node;
mod tree;

#[cfg(feature = "ordered_iter")]
mod ordered_iter;

#[cfg(feature = "quickcheck")]
mod quickcheck;

pub use cursor::Cursor;
pub use error::{Error, Result};
pub use map::Map;
pub use set::Set;
