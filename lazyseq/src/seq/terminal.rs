use std::iter::FusedIterator;
use std::ops::ControlFlow;
use std::rc::Rc;

use super::{LazySeq, Node};

impl<T: Clone + 'static> LazySeq<T> {
    /// Folds over the unfiltered nodes in order, stopping early when `visit`
    /// breaks.
    fn fold_visible<A>(
        &self,
        operation: &'static str,
        init: A,
        mut visit: impl FnMut(A, &Node<T>) -> ControlFlow<A, A>,
    ) -> A {
        let mut acc = init;
        let mut cursor = self.clone();
        let mut visited = 0usize;
        let mut skipped = 0usize;

        while let LazySeq::Node(node) = cursor {
            visited += 1;
            if node.is_filtered() {
                skipped += 1;
            } else {
                match visit(acc, &node) {
                    ControlFlow::Continue(next) => acc = next,
                    ControlFlow::Break(done) => {
                        tracing::trace!(operation, visited, skipped, "walk stopped early");
                        return done;
                    }
                }
            }
            cursor = node.tail();
        }

        tracing::trace!(operation, visited, skipped, "walk reached end of sequence");
        acc
    }

    /// First unfiltered element matching `predicate`.
    ///
    /// Never returns on an infinite sequence without a match.
    pub fn find_first(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<T> {
        self.fold_visible("find_first", None, |_, node| {
            let head = node.head();
            if predicate(&head) {
                ControlFlow::Break(Some(head))
            } else {
                ControlFlow::Continue(None)
            }
        })
    }

    /// Left fold over the unfiltered elements, in order.
    pub fn reduce<U>(&self, identity: U, mut accumulator: impl FnMut(U, T) -> U) -> U {
        self.fold_visible("reduce", identity, |running, node| {
            ControlFlow::Continue(accumulator(running, node.head()))
        })
    }

    /// Number of unfiltered elements. Heads are only computed when a filter
    /// needs them.
    pub fn count(&self) -> usize {
        self.fold_visible("count", 0, |count, _| ControlFlow::Continue(count + 1))
    }

    /// Collects the unfiltered elements, in order.
    pub fn to_vec(&self) -> Vec<T> {
        self.fold_visible("to_vec", Vec::new(), |mut out, node| {
            out.push(node.head());
            ControlFlow::Continue(out)
        })
    }

    pub fn for_each(&self, mut action: impl FnMut(T)) {
        self.fold_visible("for_each", (), |(), node| {
            action(node.head());
            ControlFlow::Continue(())
        })
    }

    /// Iterator over the unfiltered elements, sharing this sequence's cache.
    pub fn iter(&self) -> Iter<T> {
        Iter {
            next: self.clone(),
            yielded: None,
        }
    }
}

/// Iterator over the unfiltered elements of a [`LazySeq`].
///
/// A tail is only forced when the element after it is requested, so
/// `seq.iter().take(n)` evaluates exactly as much as `seq.limit(n)` would.
pub struct Iter<T> {
    next: LazySeq<T>,
    yielded: Option<Rc<Node<T>>>,
}

impl<T: Clone + 'static> Iterator for Iter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if let Some(node) = self.yielded.take() {
            self.next = node.tail();
        }

        match self.next.first_visible() {
            LazySeq::Node(node) => {
                let head = node.head();
                self.next = LazySeq::Empty;
                self.yielded = Some(node);
                Some(head)
            }
            LazySeq::Empty => {
                self.next = LazySeq::Empty;
                None
            }
        }
    }
}

impl<T: Clone + 'static> FusedIterator for Iter<T> {}

impl<T: Clone + 'static> IntoIterator for LazySeq<T> {
    type Item = T;
    type IntoIter = Iter<T>;

    fn into_iter(self) -> Iter<T> {
        Iter {
            next: self,
            yielded: None,
        }
    }
}

impl<T: Clone + 'static> IntoIterator for &LazySeq<T> {
    type Item = T;
    type IntoIter = Iter<T>;

    fn into_iter(self) -> Iter<T> {
        self.iter()
    }
}
