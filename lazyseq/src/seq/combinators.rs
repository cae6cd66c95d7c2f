use std::rc::Rc;

use super::{LazySeq, Node, Predicate, Thunk, Verdict};

impl<T: Clone + 'static> LazySeq<T> {
    /// Applies `mapper` to every element, lazily.
    ///
    /// The mapped node copies the source node's filter verdict as it is
    /// cached right now and carries no predicate of its own. A source element
    /// whose verdict has not been resolved yet is therefore treated as
    /// unfiltered by the mapped sequence, even if the source would exclude it
    /// later. Query [`LazySeq::is_filtered`] or [`LazySeq::is_empty`] on the
    /// source first to carry its verdict over.
    pub fn map<R: Clone + 'static>(&self, mapper: impl Fn(&T) -> R + 'static) -> LazySeq<R> {
        self.map_shared(Rc::new(mapper))
    }

    fn map_shared<R: Clone + 'static>(&self, mapper: Rc<dyn Fn(&T) -> R>) -> LazySeq<R> {
        let LazySeq::Node(node) = self else {
            return LazySeq::Empty;
        };

        let head = {
            let (node, mapper) = (Rc::clone(node), Rc::clone(&mapper));
            Thunk::deferred(move || mapper(&node.head()))
        };
        let tail = {
            let node = Rc::clone(node);
            Thunk::deferred(move || node.tail().map_shared(mapper))
        };
        Node::link(head, tail, None, node.cached_verdict())
    }

    /// Keeps the elements satisfying `predicate`.
    ///
    /// Nothing is dropped from the chain: rejected elements are marked and
    /// skipped by consumers. The predicate runs at most once per element, when
    /// something first asks whether that element is filtered. Elements an
    /// upstream filter already excluded are never shown to `predicate`.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> Self {
        self.filter_shared(Rc::new(predicate))
    }

    fn filter_shared(&self, predicate: Predicate<T>) -> Self {
        let LazySeq::Node(node) = self else {
            return LazySeq::Empty;
        };

        let verdict = if node.is_filtered() {
            Verdict::Excluded
        } else {
            Verdict::Unknown
        };
        let tail = {
            let (node, predicate) = (Rc::clone(node), Rc::clone(&predicate));
            Thunk::deferred(move || node.tail().filter_shared(predicate))
        };
        Node::link(node.shared_head(), tail, Some(predicate), verdict)
    }

    /// Truncates to at most `n` unfiltered elements.
    ///
    /// Filtered elements pass through without using up the budget, so a
    /// limited sequence whose source never produces another visible element
    /// is still unbounded.
    pub fn limit(&self, n: usize) -> Self {
        let LazySeq::Node(node) = self else {
            return LazySeq::Empty;
        };
        if n == 0 {
            return LazySeq::Empty;
        }

        if node.is_filtered() {
            let tail = {
                let node = Rc::clone(node);
                Thunk::deferred(move || node.tail().limit(n))
            };
            return Node::link(node.shared_head(), tail, None, Verdict::Excluded);
        }

        let tail = if n == 1 {
            Thunk::deferred(|| LazySeq::Empty)
        } else {
            let node = Rc::clone(node);
            Thunk::deferred(move || node.tail().limit(n - 1))
        };
        Node::link(node.shared_head(), tail, None, Verdict::Included)
    }

    /// Keeps elements while `predicate` holds, ending at the first unfiltered
    /// element that fails it.
    ///
    /// The first unfiltered element is tested immediately; filtered elements
    /// are never tested.
    pub fn take_while(&self, predicate: impl Fn(&T) -> bool + 'static) -> Self {
        self.take_while_shared(Rc::new(predicate))
    }

    fn take_while_shared(&self, predicate: Predicate<T>) -> Self {
        let LazySeq::Node(node) = self else {
            return LazySeq::Empty;
        };

        if node.is_filtered() {
            let tail = {
                let node = Rc::clone(node);
                Thunk::deferred(move || node.tail().take_while_shared(predicate))
            };
            return Node::link(node.shared_head(), tail, None, Verdict::Excluded);
        }

        let head = node.head();
        if !predicate(&head) {
            return LazySeq::Empty;
        }
        let tail = {
            let node = Rc::clone(node);
            Thunk::deferred(move || node.tail().take_while_shared(predicate))
        };
        Node::link(Thunk::resolved(head), tail, None, Verdict::Included)
    }

    /// Combines the visible elements of `self` and `other` pairwise, ending
    /// with the shorter of the two.
    ///
    /// The filtered prefix of both sides is skipped immediately; the combined
    /// elements and everything after them stay deferred.
    pub fn zip_with<U, R>(
        &self,
        other: &LazySeq<U>,
        combiner: impl Fn(&T, &U) -> R + 'static,
    ) -> LazySeq<R>
    where
        U: Clone + 'static,
        R: Clone + 'static,
    {
        self.zip_shared(other, Rc::new(combiner))
    }

    fn zip_shared<U, R>(&self, other: &LazySeq<U>, combiner: Rc<dyn Fn(&T, &U) -> R>) -> LazySeq<R>
    where
        U: Clone + 'static,
        R: Clone + 'static,
    {
        let (LazySeq::Node(left), LazySeq::Node(right)) = (self.first_visible(), other.first_visible())
        else {
            return LazySeq::Empty;
        };

        let head = {
            let (left, right) = (Rc::clone(&left), Rc::clone(&right));
            let combiner = Rc::clone(&combiner);
            Thunk::deferred(move || combiner(&left.head(), &right.head()))
        };
        let tail = Thunk::deferred(move || left.tail().zip_shared(&right.tail(), combiner));
        Node::link(head, tail, None, Verdict::Included)
    }
}
