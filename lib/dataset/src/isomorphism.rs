//! Searches a renaming of blank nodes that embeds one dataset into another.

use crate::{Dataset, DatasetError};
use rdf_interop_model::{BlankNode, Quad, QuadTermName, TermRef};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use std::sync::Arc;

/// Decides whether a blank node of the embedded dataset may be renamed to a blank node of the
/// target dataset.
pub(crate) type Compatibility<'c> = &'c dyn Fn(&BlankNode, &BlankNode) -> bool;

/// Searches an injective renaming of the blank nodes of `from` to blank nodes of `into` such that
/// every renamed quad of `from` is a quad of `into`.
///
/// Returns the renaming, or [None] if there is none. `compatible` prunes the search. It must
/// accept every pair that is part of a valid renaming. Fails once more than `max_attempts`
/// candidate quads were tried.
pub(crate) fn find_embedding<'a>(
    from: &'a Dataset,
    into: &'a Dataset,
    compatible: Option<Compatibility<'_>>,
    max_attempts: usize,
) -> Result<Option<FxHashMap<&'a BlankNode, &'a BlankNode>>, DatasetError> {
    if from.len() > into.len() {
        return Ok(None);
    }

    let mut blank_quads = Vec::new();
    for quad in from.iter() {
        if quad_has_blank_node(quad) {
            blank_quads.push(quad);
        } else if !into.has(quad) {
            return Ok(None);
        }
    }

    let order = search_order(blank_quads);
    let mut renaming = Renaming::default();
    let mut stack: Vec<Frame<'a>> = Vec::with_capacity(order.len());
    let mut depth = 0;
    let mut attempts = 0_usize;
    loop {
        let Some(quad) = order.get(depth).copied() else {
            return Ok(Some(renaming.forward));
        };
        if stack.len() == depth {
            stack.push(Frame {
                candidates: candidates(into, quad, &renaming),
                next: 0,
                bound: Vec::new(),
            });
        }

        let frame = &mut stack[depth];
        renaming.undo(&mut frame.bound);
        let mut found = false;
        while let Some(candidate) = frame.candidates.get(frame.next).copied() {
            frame.next += 1;
            attempts += 1;
            if attempts > max_attempts {
                return Err(DatasetError::CanonicalizationTooComplex {
                    limit: max_attempts,
                    unit: "embedding attempts",
                });
            }
            let unified = quad
                .terms()
                .into_iter()
                .zip(candidate.terms())
                .all(|(from, into)| renaming.unify(from, into, &mut frame.bound, compatible));
            if unified {
                found = true;
                break;
            }
            renaming.undo(&mut frame.bound);
        }

        if found {
            depth += 1;
        } else {
            stack.pop();
            if depth == 0 {
                return Ok(None);
            }
            depth -= 1;
        }
    }
}

/// Returns whether both maps assign the same multiset of hashes.
pub(crate) fn same_hash_distribution(
    left: &FxHashMap<&BlankNode, String>,
    right: &FxHashMap<&BlankNode, String>,
) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut left = left.values().collect::<Vec<_>>();
    let mut right = right.values().collect::<Vec<_>>();
    left.sort_unstable();
    right.sort_unstable();
    left == right
}

/// The state of one quad in the backtracking search.
struct Frame<'a> {
    candidates: Vec<&'a Quad>,
    next: usize,
    /// The blank nodes that the current candidate bound.
    bound: Vec<&'a BlankNode>,
}

#[derive(Default)]
struct Renaming<'a> {
    forward: FxHashMap<&'a BlankNode, &'a BlankNode>,
    targets: FxHashSet<&'a BlankNode>,
}

impl<'a> Renaming<'a> {
    fn unify(
        &mut self,
        from: TermRef<'a>,
        into: TermRef<'a>,
        bound: &mut Vec<&'a BlankNode>,
        compatible: Option<Compatibility<'_>>,
    ) -> bool {
        match (from, into) {
            (TermRef::BlankNode(source), TermRef::BlankNode(target)) => {
                if let Some(mapped) = self.forward.get(source) {
                    return *mapped == target;
                }
                if self.targets.contains(target)
                    || !compatible.map_or(true, |compatible| compatible(source, target))
                {
                    return false;
                }
                self.forward.insert(source, target);
                self.targets.insert(target);
                bound.push(source);
                true
            }
            (TermRef::Quad(from), TermRef::Quad(into)) => from
                .terms()
                .into_iter()
                .zip(into.terms())
                .all(|(from, into)| self.unify(from, into, bound, compatible)),
            (from, into) => from == into,
        }
    }

    fn undo(&mut self, bound: &mut Vec<&'a BlankNode>) {
        for source in bound.drain(..) {
            if let Some(target) = self.forward.remove(source) {
                self.targets.remove(target);
            }
        }
    }
}

/// Returns the quads of `into` that `quad` may be renamed to, using the most selective position
/// that is fixed under the current renaming.
fn candidates<'a>(into: &'a Dataset, quad: &Quad, renaming: &Renaming<'_>) -> Vec<&'a Quad> {
    let mut best: Option<&FxHashSet<Arc<Quad>>> = None;
    for name in QuadTermName::ALL {
        let key = match quad.term(name) {
            TermRef::BlankNode(node) => match renaming.forward.get(node) {
                Some(target) => TermRef::BlankNode(target),
                None => continue,
            },
            term if has_blank_node(term) => continue,
            term => term,
        };
        match into.index().get_ref(name, key) {
            None => return Vec::new(),
            Some(quads) => {
                if best.map_or(true, |best| quads.len() < best.len()) {
                    best = Some(quads);
                }
            }
        }
    }
    match best {
        Some(quads) => quads.iter().map(|quad| &**quad).collect(),
        None => into.iter().filter(|quad| quad_has_blank_node(quad)).collect(),
    }
}

/// Orders the quads breadth-first along shared blank nodes, so that each quad after the first of
/// its component meets at least one blank node that is already renamed.
fn search_order(quads: Vec<&Quad>) -> Vec<&Quad> {
    let mut blank_nodes = quads
        .iter()
        .map(|quad| {
            let mut nodes = quad.blank_nodes();
            nodes.sort_unstable_by(|a, b| a.as_str().cmp(b.as_str()));
            nodes.dedup();
            nodes
        })
        .collect::<Vec<_>>();
    let mut quads_of_node: FxHashMap<&BlankNode, Vec<usize>> = FxHashMap::default();
    for (position, nodes) in blank_nodes.iter().enumerate() {
        for node in nodes {
            quads_of_node.entry(*node).or_default().push(position);
        }
    }

    let mut starts = (0..quads.len()).collect::<Vec<_>>();
    starts.sort_by_key(|position| blank_nodes[*position].len());

    let mut visited = vec![false; quads.len()];
    let mut order = Vec::with_capacity(quads.len());
    let mut queue = VecDeque::new();
    for start in starts {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        queue.push_back(start);
        while let Some(position) = queue.pop_front() {
            order.push(quads[position]);
            for node in std::mem::take(&mut blank_nodes[position]) {
                for neighbour in quads_of_node.get(node).into_iter().flatten() {
                    if !visited[*neighbour] {
                        visited[*neighbour] = true;
                        queue.push_back(*neighbour);
                    }
                }
            }
        }
    }
    order
}

fn has_blank_node(term: TermRef<'_>) -> bool {
    match term {
        TermRef::BlankNode(_) => true,
        TermRef::Quad(quad) => quad_has_blank_node(quad),
        _ => false,
    }
}

pub(crate) fn quad_has_blank_node(quad: &Quad) -> bool {
    quad.terms().into_iter().any(has_blank_node)
}
