//! Per-element load state.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::host::LazyElement;

/// Lifecycle of a single candidate. `Loaded` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Loaded,
}

/// Counts of candidates by state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LazyLoadStats {
    pub total: usize,
    pub pending: usize,
    pub loaded: usize,
}

#[derive(Debug)]
struct Candidate<E> {
    element: E,
    state: LoadState,
}

/// Ordered candidate elements with their load state.
///
/// The set is fixed at construction; elements added to the document later
/// are never picked up. Repeated handles to one node collapse into a single
/// candidate.
#[derive(Debug)]
pub struct CandidateSet<E> {
    candidates: Vec<Candidate<E>>,
    by_key: FxHashMap<usize, usize>,
}

/// Candidate table shared between a controller and its strategy callback.
pub type SharedCandidates<E> = Rc<RefCell<CandidateSet<E>>>;

impl<E: LazyElement> CandidateSet<E> {
    pub fn new(elements: impl IntoIterator<Item = E>) -> Self {
        let mut set = Self {
            candidates: Vec::new(),
            by_key: FxHashMap::default(),
        };
        for element in elements {
            if set.find(&element).is_some() {
                log::debug!("lazyload: skipping repeated element");
                continue;
            }
            if let Some(key) = element.node_key() {
                set.by_key.insert(key, set.candidates.len());
            }
            set.candidates.push(Candidate {
                element,
                state: LoadState::Pending,
            });
        }
        set
    }

    pub fn shared(self) -> SharedCandidates<E> {
        Rc::new(RefCell::new(self))
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn elements(&self) -> impl Iterator<Item = &E> {
        self.candidates.iter().map(|candidate| &candidate.element)
    }

    /// Clones of the elements still waiting to load, in order.
    pub fn pending(&self) -> Vec<E> {
        self.candidates
            .iter()
            .filter(|candidate| candidate.state == LoadState::Pending)
            .map(|candidate| candidate.element.clone())
            .collect()
    }

    pub fn state_of(&self, element: &E) -> Option<LoadState> {
        self.find(element).map(|index| self.candidates[index].state)
    }

    /// Moves `element` from `Pending` to `Loaded`.
    ///
    /// Returns `false` if it was already loaded or is not a candidate.
    pub fn mark_loaded(&mut self, element: &E) -> bool {
        match self.find(element) {
            Some(index) if self.candidates[index].state == LoadState::Pending => {
                self.candidates[index].state = LoadState::Loaded;
                true
            }
            _ => false,
        }
    }

    pub fn stats(&self) -> LazyLoadStats {
        let loaded = self
            .candidates
            .iter()
            .filter(|candidate| candidate.state == LoadState::Loaded)
            .count();
        LazyLoadStats {
            total: self.candidates.len(),
            pending: self.candidates.len() - loaded,
            loaded,
        }
    }

    fn find(&self, element: &E) -> Option<usize> {
        match element.node_key() {
            Some(key) => self
                .by_key
                .get(&key)
                .copied()
                .filter(|&index| self.candidates[index].element.same_node(element)),
            None => self
                .candidates
                .iter()
                .position(|candidate| candidate.element.same_node(element)),
        }
    }
}
