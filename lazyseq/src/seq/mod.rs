//! The lazily evaluated sequence type.
//!
//! A [`LazySeq`] is either [`LazySeq::Empty`] or a shared [`Node`]. A node
//! owns two one-shot memo cells (its head element and its continuation) plus
//! the filtering state attached by [`LazySeq::filter`]. Elements a filter
//! rejected stay in the chain and are skipped by every consumer.

mod combinators;
mod terminal;
mod thunk;


use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::error::{Result, SeqError};

pub use terminal::Iter;
pub(crate) use thunk::{Thunk, Verdict};

/// Shared predicate attached to filtered nodes and threaded through tails
pub(crate) type Predicate<T> = Rc<dyn Fn(&T) -> bool>;

/// A lazily evaluated, possibly infinite sequence.
///
/// Cloning is cheap and shares nodes: anything forced through one clone is
/// cached for all of them.
pub enum LazySeq<T> {
    /// Terminal marker
    Empty,
    /// An element and the rest of the sequence, both deferred
    Node(Rc<Node<T>>),
}

/// One position in a [`LazySeq`] chain.
///
/// Opaque: its state is reached through the methods on [`LazySeq`].
pub struct Node<T> {
    head: Thunk<T>,
    tail: Thunk<LazySeq<T>>,
    predicate: Option<Predicate<T>>,
    verdict: Cell<Verdict>,
}

impl<T> Node<T> {
    pub(crate) fn link(
        head: Thunk<T>,
        tail: Thunk<LazySeq<T>>,
        predicate: Option<Predicate<T>>,
        verdict: Verdict,
    ) -> LazySeq<T> {
        LazySeq::Node(Rc::new(Node {
            head,
            tail,
            predicate,
            verdict: Cell::new(verdict),
        }))
    }

    /// Verdict as currently cached, without resolving it.
    pub(crate) fn cached_verdict(&self) -> Verdict {
        self.verdict.get()
    }
}

impl<T: Clone + 'static> Node<T> {
    pub(crate) fn head(&self) -> T {
        self.head.force()
    }

    pub(crate) fn tail(&self) -> LazySeq<T> {
        self.tail.force()
    }

    /// Resolves and caches whether this element is excluded.
    pub(crate) fn is_filtered(&self) -> bool {
        match self.verdict.get() {
            Verdict::Excluded => true,
            Verdict::Included => false,
            Verdict::Unknown => {
                let excluded = match &self.predicate {
                    Some(predicate) => !predicate(&self.head()),
                    None => false,
                };
                self.verdict.set(Verdict::from_excluded(excluded));
                excluded
            }
        }
    }

    /// A head cell for a derived node: the cached value when there is one,
    /// otherwise a delegate that forces this node's own cell.
    pub(crate) fn shared_head(self: &Rc<Self>) -> Thunk<T> {
        match self.head.peek() {
            Some(value) => Thunk::resolved(value),
            None => {
                let node = Rc::clone(self);
                Thunk::deferred(move || node.head())
            }
        }
    }
}

impl<T> Drop for Node<T> {
    fn drop(&mut self) {
        // Unlink resolved tails one at a time so long chains don't recurse.
        let mut next = self.tail.take_resolved();
        while let Some(LazySeq::Node(node)) = next {
            next = match Rc::try_unwrap(node) {
                Ok(mut node) => node.tail.take_resolved(),
                Err(_) => None,
            };
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("head", &self.head)
            .field("tail_resolved", &self.tail.is_resolved())
            .field("filter", &self.predicate.is_some())
            .field("verdict", &self.verdict.get())
            .finish()
    }
}

impl<T: Clone + 'static> LazySeq<T> {
    /// The empty sequence.
    pub fn empty() -> Self {
        LazySeq::Empty
    }

    /// Infinite sequence whose every element comes from calling `supplier`.
    pub fn generate(supplier: impl Fn() -> T + 'static) -> Self {
        Self::generate_shared(Rc::new(supplier))
    }

    fn generate_shared(supplier: Rc<dyn Fn() -> T>) -> Self {
        let head = {
            let supplier = Rc::clone(&supplier);
            Thunk::deferred(move || supplier())
        };
        let tail = Thunk::deferred(move || Self::generate_shared(supplier));
        Node::link(head, tail, None, Verdict::Unknown)
    }

    /// Infinite sequence `initial, next(initial), next(next(initial)), ...`.
    ///
    /// The first element is known up front; each later one is computed when
    /// the preceding tail is forced.
    pub fn iterate(initial: T, next: impl Fn(&T) -> T + 'static) -> Self {
        Self::iterate_shared(initial, Rc::new(next))
    }

    fn iterate_shared(initial: T, next: Rc<dyn Fn(&T) -> T>) -> Self {
        let seed = initial.clone();
        let tail = Thunk::deferred(move || {
            let following = next(&seed);
            Self::iterate_shared(following, next)
        });
        Node::link(Thunk::resolved(initial), tail, None, Verdict::Unknown)
    }

    /// First element of the chain, computing and caching it on first access.
    ///
    /// Does not skip filtered elements; check [`LazySeq::is_filtered`] or use
    /// a terminal operation for the logical content.
    pub fn head(&self) -> Result<T> {
        match self {
            LazySeq::Empty => Err(SeqError::InvalidState { operation: "head" }),
            LazySeq::Node(node) => Ok(node.head()),
        }
    }

    /// The rest of the chain, computing and caching it on first access.
    pub fn tail(&self) -> Result<LazySeq<T>> {
        match self {
            LazySeq::Empty => Err(SeqError::InvalidState { operation: "tail" }),
            LazySeq::Node(node) => Ok(node.tail()),
        }
    }

    /// Whether the first element of the chain is excluded by a filter.
    pub fn is_filtered(&self) -> Result<bool> {
        match self {
            LazySeq::Empty => Err(SeqError::InvalidState {
                operation: "is_filtered",
            }),
            LazySeq::Node(node) => Ok(node.is_filtered()),
        }
    }

    /// True once every remaining element is filtered out or the chain ends.
    ///
    /// Forces tails across a filtered prefix; on an infinite sequence whose
    /// elements are all filtered out this never returns.
    pub fn is_empty(&self) -> bool {
        matches!(self.first_visible(), LazySeq::Empty)
    }

    /// Skips the filtered prefix, returning either `Empty` or a node whose
    /// element is visible.
    pub(crate) fn first_visible(&self) -> LazySeq<T> {
        let mut cursor = self.clone();
        loop {
            match cursor {
                LazySeq::Node(node) if node.is_filtered() => cursor = node.tail(),
                visible => return visible,
            }
        }
    }
}

impl<T> LazySeq<T> {
    /// Cached head, if it has been computed. Never forces anything.
    pub fn peek_head(&self) -> Option<T>
    where
        T: Clone,
    {
        match self {
            LazySeq::Empty => None,
            LazySeq::Node(node) => node.head.peek(),
        }
    }

    pub fn is_head_evaluated(&self) -> bool {
        match self {
            LazySeq::Empty => false,
            LazySeq::Node(node) => node.head.is_resolved(),
        }
    }

    pub fn is_tail_evaluated(&self) -> bool {
        match self {
            LazySeq::Empty => false,
            LazySeq::Node(node) => node.tail.is_resolved(),
        }
    }

    /// Writes the already evaluated part of the chain: each head (`?` if
    /// pending) followed by `,` and the tail (`?` if pending), `-` at the end.
    fn render(
        &self,
        f: &mut fmt::Formatter<'_>,
        write_head: impl Fn(&T, &mut fmt::Formatter<'_>) -> fmt::Result,
    ) -> fmt::Result {
        let mut cursor = self.clone();
        loop {
            let node = match cursor {
                LazySeq::Empty => return write!(f, "-"),
                LazySeq::Node(node) => node,
            };
            node.head
                .peek_with(|head| write_head(head, f))
                .unwrap_or_else(|| write!(f, "?"))?;
            write!(f, ",")?;
            cursor = match node.tail.peek() {
                Some(next) => next,
                None => return write!(f, "?"),
            };
        }
    }
}

impl<T> Clone for LazySeq<T> {
    fn clone(&self) -> Self {
        match self {
            LazySeq::Empty => LazySeq::Empty,
            LazySeq::Node(node) => LazySeq::Node(Rc::clone(node)),
        }
    }
}

impl<T> Default for LazySeq<T> {
    fn default() -> Self {
        LazySeq::Empty
    }
}

impl<T: fmt::Display> fmt::Display for LazySeq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, |head, f| write!(f, "{head}"))
    }
}

impl<T: fmt::Debug> fmt::Debug for LazySeq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LazySeq(")?;
        self.render(f, |head, f| write!(f, "{head:?}"))?;
        write!(f, ")")
    }
}
