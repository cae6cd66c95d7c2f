//! Lazily evaluated, possibly infinite sequences.
//!
//! ```
//! use lazyseq::LazySeq;
//!
//! let evens = LazySeq::iterate(1, |x| x + 1).filter(|x| x % 2 == 0);
//! assert_eq!(evens.limit(3).to_vec(), vec![2, 4, 6]);
//! assert_eq!(evens.find_first(|x| *x > 100), Some(102));
//! ```
//!
//! Every element and every tail is computed at most once and cached in the
//! node that owns it. Filtering marks elements instead of removing them, and
//! every terminal operation skips the marked ones.

pub mod error;
pub mod seq;

pub use error::{Result, SeqError};
pub use seq::{Iter, LazySeq, Node};
