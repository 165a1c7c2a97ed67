use rdf_interop_model::{Quad, QuadTermName, Term, TermRef};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// Maps the term of each quad position to the quads that hold it in that position.
#[derive(Clone, Debug, Default)]
pub(crate) struct QuadIndex {
    slots: [FxHashMap<Term, FxHashSet<Arc<Quad>>>; 4],
}

impl QuadIndex {
    pub(crate) fn insert(&mut self, quad: &Arc<Quad>) {
        for (slot, term) in self.slots.iter_mut().zip(quad.terms()) {
            slot.entry(term.into_owned())
                .or_default()
                .insert(Arc::clone(quad));
        }
    }

    pub(crate) fn remove(&mut self, quad: &Quad) {
        for (slot, term) in self.slots.iter_mut().zip(quad.terms()) {
            let key = term.into_owned();
            if let Some(quads) = slot.get_mut(&key) {
                quads.remove(quad);
                if quads.is_empty() {
                    slot.remove(&key);
                }
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
    }

    /// Returns the quads that hold `term` in the position `name`.
    pub(crate) fn get(&self, name: QuadTermName, term: &Term) -> Option<&FxHashSet<Arc<Quad>>> {
        self.slots[slot_index(name)].get(term)
    }

    /// Like [QuadIndex::get] for a borrowed term.
    pub(crate) fn get_ref(
        &self,
        name: QuadTermName,
        term: TermRef<'_>,
    ) -> Option<&FxHashSet<Arc<Quad>>> {
        self.get(name, &term.into_owned())
    }
}

fn slot_index(name: QuadTermName) -> usize {
    match name {
        QuadTermName::Subject => 0,
        QuadTermName::Predicate => 1,
        QuadTermName::Object => 2,
        QuadTermName::Graph => 3,
    }
}
