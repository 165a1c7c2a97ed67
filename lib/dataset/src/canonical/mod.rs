//! Canonical labeling of blank nodes following the
//! [RDF Dataset Canonicalization](https://www.w3.org/TR/rdf-canon/) algorithm (RDFC-1.0) with
//! SHA-256.
//!
//! Blank nodes inside nested quads take part in the labeling. Their position in a related blank
//! node hash is the position of the nested quad in the enclosing quad.

mod issuer;

use crate::dataset::relabel_blank_nodes;
use crate::{Dataset, DatasetError};
use issuer::IdentifierIssuer;
use itertools::Itertools;
use rdf_interop_model::{BlankNode, Quad, TermRef};
use rustc_hash::FxHashMap;
use sha2::{Digest, Sha256};
use std::cell::Cell;
use std::collections::BTreeMap;

/// Limits the work spent on canonicalizing and comparing blank nodes.
///
/// Blank nodes that cannot be told apart by their direct neighbourhood require the Hash N-Degree
/// Quads algorithm, which explores permutations of related blank nodes. Comparing datasets with
/// [Dataset::try_equals_with] searches a renaming of their blank nodes by backtracking. For
/// adversarial inputs both grow exponentially. Exceeding a limit fails with
/// [DatasetError::CanonicalizationTooComplex].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CanonicalizationOptions {
    /// The maximum number of Hash N-Degree Quads invocations.
    pub max_n_degree_calls: usize,
    /// The maximum number of permutations explored across all invocations.
    pub max_permutations: usize,
    /// The maximum number of candidate quads tried while searching a blank node renaming.
    pub max_embedding_attempts: usize,
}

impl CanonicalizationOptions {
    #[must_use]
    pub fn with_max_n_degree_calls(mut self, max_n_degree_calls: usize) -> Self {
        self.max_n_degree_calls = max_n_degree_calls;
        self
    }

    #[must_use]
    pub fn with_max_permutations(mut self, max_permutations: usize) -> Self {
        self.max_permutations = max_permutations;
        self
    }

    #[must_use]
    pub fn with_max_embedding_attempts(mut self, max_embedding_attempts: usize) -> Self {
        self.max_embedding_attempts = max_embedding_attempts;
        self
    }
}

impl Default for CanonicalizationOptions {
    fn default() -> Self {
        Self {
            max_n_degree_calls: 8192,
            max_permutations: 65_536,
            max_embedding_attempts: 1_000_000,
        }
    }
}

/// Computes the canonical labels of the blank nodes of one dataset.
pub(crate) struct Canonicalizer<'a> {
    options: CanonicalizationOptions,
    /// The quads that mention each blank node, each quad once.
    quads_of_node: FxHashMap<&'a BlankNode, Vec<&'a Quad>>,
    first_degree: FxHashMap<&'a BlankNode, String>,
    n_degree_calls: Cell<usize>,
    permutations: Cell<usize>,
}

/// The result of the Hash N-Degree Quads algorithm.
struct NDegreeHash<'a> {
    hash: String,
    issuer: IdentifierIssuer<'a>,
}

impl<'a> Canonicalizer<'a> {
    pub(crate) fn new(dataset: &'a Dataset) -> Self {
        let mut quads_of_node: FxHashMap<&'a BlankNode, Vec<&'a Quad>> = FxHashMap::default();
        for quad in dataset.iter() {
            let mut nodes = quad.blank_nodes();
            nodes.sort_unstable_by(|a, b| a.as_str().cmp(b.as_str()));
            nodes.dedup();
            for node in nodes {
                quads_of_node.entry(node).or_default().push(quad);
            }
        }
        let first_degree = quads_of_node
            .iter()
            .map(|(node, quads)| (*node, hash_first_degree_quads(node, quads)))
            .collect();
        Self {
            options: CanonicalizationOptions::default(),
            quads_of_node,
            first_degree,
            n_degree_calls: Cell::new(0),
            permutations: Cell::new(0),
        }
    }

    #[must_use]
    pub(crate) fn with_options(mut self, options: CanonicalizationOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the first degree hash of every blank node. Isomorphic datasets have the same
    /// multiset of hashes.
    pub(crate) fn first_degree_hashes(self) -> FxHashMap<&'a BlankNode, String> {
        self.first_degree
    }

    /// Assigns every blank node a canonical label `c14n<n>`.
    pub(crate) fn canonical_labels(self) -> Result<FxHashMap<BlankNode, BlankNode>, DatasetError> {
        let mut canonical = IdentifierIssuer::new("c14n");

        let mut nodes_of_hash: BTreeMap<&str, Vec<&'a BlankNode>> = BTreeMap::new();
        for (node, hash) in &self.first_degree {
            nodes_of_hash.entry(hash.as_str()).or_default().push(*node);
        }

        let mut shared_hashes = Vec::new();
        for nodes in nodes_of_hash.into_values() {
            match nodes.as_slice() {
                [node] => {
                    canonical.issue(*node);
                }
                _ => shared_hashes.push(nodes),
            }
        }

        for mut nodes in shared_hashes {
            nodes.sort_unstable_by(|a, b| a.as_str().cmp(b.as_str()));
            let mut results = Vec::new();
            for node in nodes {
                if canonical.get(node).is_some() {
                    continue;
                }
                let mut issuer = IdentifierIssuer::new("b");
                issuer.issue(node);
                results.push(self.hash_n_degree_quads(node, &issuer, &canonical)?);
            }
            results.sort_by(|a, b| a.hash.cmp(&b.hash));
            for result in results {
                for node in result.issuer.issued_order() {
                    canonical.issue(node);
                }
            }
        }

        tracing::debug!(
            blank_nodes = self.first_degree.len(),
            n_degree_calls = self.n_degree_calls.get(),
            permutations = self.permutations.get(),
            "Canonicalized blank nodes."
        );
        Ok(canonical
            .into_issued()
            .map(|(node, label)| (node.clone(), BlankNode::new_unchecked(label)))
            .collect())
    }

    fn hash_n_degree_quads(
        &self,
        node: &'a BlankNode,
        issuer: &IdentifierIssuer<'a>,
        canonical: &IdentifierIssuer<'a>,
    ) -> Result<NDegreeHash<'a>, DatasetError> {
        let calls = self.n_degree_calls.get() + 1;
        if calls > self.options.max_n_degree_calls {
            return Err(DatasetError::CanonicalizationTooComplex {
                limit: self.options.max_n_degree_calls,
                unit: "Hash N-Degree Quads calls",
            });
        }
        self.n_degree_calls.set(calls);

        let mut related_of_hash: BTreeMap<String, Vec<&'a BlankNode>> = BTreeMap::new();
        for &quad in self.quads_of(node) {
            let positions = [
                ('s', quad.subject.as_ref()),
                ('o', quad.object.as_ref()),
                ('g', quad.graph.as_ref()),
            ];
            for (position, term) in positions {
                for related in blank_nodes_of(term) {
                    if related == node {
                        continue;
                    }
                    let hash =
                        self.hash_related_blank_node(related, quad, issuer, canonical, position);
                    related_of_hash.entry(hash).or_default().push(related);
                }
            }
        }

        let mut issuer = issuer.clone();
        let mut data_to_hash = String::new();
        for (related_hash, mut related) in related_of_hash {
            data_to_hash.push_str(&related_hash);
            related.sort_unstable_by(|a, b| a.as_str().cmp(b.as_str()));
            related.dedup();

            let mut chosen: Option<(String, IdentifierIssuer<'a>)> = None;
            'permutations: for permutation in related.iter().copied().permutations(related.len()) {
                self.count_permutation()?;
                let mut issuer_copy = issuer.clone();
                let mut path = String::new();
                let mut recursion_list = Vec::new();

                for node in permutation {
                    if let Some(label) = canonical.get(node) {
                        path.push_str("_:");
                        path.push_str(label);
                    } else {
                        if issuer_copy.get(node).is_none() {
                            recursion_list.push(node);
                        }
                        path.push_str("_:");
                        path.push_str(issuer_copy.issue(node));
                    }
                    if is_worse_path(&path, chosen.as_ref()) {
                        continue 'permutations;
                    }
                }

                for node in recursion_list {
                    let result = self.hash_n_degree_quads(node, &issuer_copy, canonical)?;
                    path.push_str("_:");
                    path.push_str(issuer_copy.issue(node));
                    path.push('<');
                    path.push_str(&result.hash);
                    path.push('>');
                    issuer_copy = result.issuer;
                    if is_worse_path(&path, chosen.as_ref()) {
                        continue 'permutations;
                    }
                }

                if chosen
                    .as_ref()
                    .map_or(true, |(chosen_path, _)| path < *chosen_path)
                {
                    chosen = Some((path, issuer_copy));
                }
            }

            if let Some((path, chosen_issuer)) = chosen {
                data_to_hash.push_str(&path);
                issuer = chosen_issuer;
            }
        }

        Ok(NDegreeHash {
            hash: sha256_hex(&data_to_hash),
            issuer,
        })
    }

    fn hash_related_blank_node(
        &self,
        related: &BlankNode,
        quad: &Quad,
        issuer: &IdentifierIssuer<'a>,
        canonical: &IdentifierIssuer<'a>,
        position: char,
    ) -> String {
        let mut input = String::from(position);
        if position != 'g' {
            input.push_str(&quad.predicate.to_string());
        }
        if let Some(label) = canonical.get(related).or_else(|| issuer.get(related)) {
            input.push_str("_:");
            input.push_str(label);
        } else if let Some(hash) = self.first_degree.get(related) {
            input.push_str(hash);
        }
        sha256_hex(&input)
    }

    fn quads_of(&self, node: &BlankNode) -> &[&'a Quad] {
        self.quads_of_node
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn count_permutation(&self) -> Result<(), DatasetError> {
        let permutations = self.permutations.get() + 1;
        if permutations > self.options.max_permutations {
            return Err(DatasetError::CanonicalizationTooComplex {
                limit: self.options.max_permutations,
                unit: "permutations",
            });
        }
        self.permutations.set(permutations);
        Ok(())
    }
}

/// Returns whether `path` can no longer become smaller than the chosen path.
fn is_worse_path(path: &str, chosen: Option<&(String, IdentifierIssuer<'_>)>) -> bool {
    chosen.is_some_and(|(chosen, _)| path.len() >= chosen.len() && path > chosen.as_str())
}

/// Hashes the quads of `node` with `node` replaced by `_:a` and every other blank node by `_:z`.
fn hash_first_degree_quads(node: &BlankNode, quads: &[&Quad]) -> String {
    let reference = BlankNode::new_unchecked("a");
    let other = BlankNode::new_unchecked("z");
    let label = |candidate: &BlankNode| {
        if candidate == node {
            reference.clone()
        } else {
            other.clone()
        }
    };
    let mut lines = quads
        .iter()
        .map(|quad| format!("{}\n", relabel_blank_nodes(quad, &label)))
        .collect::<Vec<_>>();
    lines.sort_unstable();
    sha256_hex(&lines.concat())
}

/// Returns the blank nodes in `term`, descending into nested quads.
fn blank_nodes_of(term: TermRef<'_>) -> Vec<&BlankNode> {
    match term {
        TermRef::BlankNode(node) => vec![node],
        TermRef::Quad(quad) => quad.blank_nodes(),
        _ => Vec::new(),
    }
}

fn sha256_hex(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}
