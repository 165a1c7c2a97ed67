use crate::canonical::{CanonicalizationOptions, Canonicalizer};
use crate::index::QuadIndex;
use crate::isomorphism;
use crate::DatasetError;
use futures::StreamExt;
use itertools::Either;
use rdf_interop_model::{
    BlankNode, GraphName, Object, Quad, QuadPattern, QuadTermName, Subject, Term,
    VariableMatchingMode,
};
use rdf_interop_stream::{ResultStream, Source};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// An in-memory [RDF dataset](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-dataset).
///
/// The dataset is a set of quads under structural equality: adding a quad that is already present
/// does nothing. Every position of a quad is indexed, so membership tests and the size are
/// constant-time, and pattern matches only visit the quads that share the most selective term of
/// the pattern.
///
/// Matching with [Dataset::match_terms] and [Dataset::match_pattern] treats every given term,
/// including variables, as a constant. [Source::match_quads] uses wildcard semantics for
/// variables instead.
///
/// Comparing datasets with [Dataset::equals] and [Dataset::contains] normalizes blank nodes.
/// The set algebra ([Dataset::union], [Dataset::intersection], [Dataset::difference]) is
/// structural.
///
/// ```
/// use rdf_interop_dataset::Dataset;
/// use rdf_interop_model::*;
///
/// let s = NamedNode::new("http://example.com/s")?;
/// let p = NamedNode::new("http://example.com/p")?;
///
/// let mut dataset = Dataset::new();
/// dataset
///     .add(Quad::in_default_graph(s.clone(), p.clone(), Literal::from("v")))
///     .add(Quad::in_default_graph(s.clone(), p.clone(), Literal::from("v")));
/// assert_eq!(dataset.len(), 1);
///
/// let s = Term::from(s);
/// assert_eq!(dataset.match_terms(Some(&s), None, None, None).len(), 1);
/// let other = Term::from(NamedNode::new("http://example.com/other")?);
/// assert!(dataset.match_terms(Some(&other), None, None, None).is_empty());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone, Default)]
pub struct Dataset {
    quads: FxHashSet<Arc<Quad>>,
    index: QuadIndex,
}

/// The quads that may match a pattern, as determined by the index.
enum Candidates<'a> {
    All,
    Indexed(&'a FxHashSet<Arc<Quad>>),
    Nothing,
}

impl Dataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of quads in the dataset.
    #[inline]
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Returns whether the dataset holds a quad equal to `quad`.
    #[inline]
    pub fn has(&self, quad: &Quad) -> bool {
        self.quads.contains(quad)
    }

    /// Adds `quad` and returns whether it was not present before.
    pub fn insert(&mut self, quad: Quad) -> bool {
        if self.quads.contains(&quad) {
            return false;
        }
        let quad = Arc::new(quad);
        self.index.insert(&quad);
        self.quads.insert(quad)
    }

    /// Removes `quad` and returns whether it was present.
    pub fn remove(&mut self, quad: &Quad) -> bool {
        if self.quads.remove(quad) {
            self.index.remove(quad);
            true
        } else {
            false
        }
    }

    /// Adds `quad` unless an equal quad is already present.
    pub fn add(&mut self, quad: Quad) -> &mut Self {
        self.insert(quad);
        self
    }

    /// Removes the quad equal to `quad`, if present.
    pub fn delete(&mut self, quad: &Quad) -> &mut Self {
        self.remove(quad);
        self
    }

    /// Adds all `quads`.
    pub fn add_all(&mut self, quads: impl IntoIterator<Item = Quad>) -> &mut Self {
        self.extend(quads);
        self
    }

    /// Removes all quads that [Dataset::match_terms] would return for the same arguments.
    pub fn delete_matches(
        &mut self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> &mut Self {
        let pattern = pattern_from_terms(subject, predicate, object, graph);
        self.remove_pattern(&pattern, VariableMatchingMode::Constant);
        self
    }

    /// Removes all quads matching `pattern` and returns how many were removed.
    pub fn remove_pattern(&mut self, pattern: &QuadPattern, mode: VariableMatchingMode) -> usize {
        let matching = self
            .candidate_quads(pattern, mode)
            .filter(|quad| pattern.matches(quad, mode))
            .cloned()
            .collect::<Vec<_>>();
        for quad in &matching {
            self.remove(quad);
        }
        matching.len()
    }

    /// Removes all quads.
    pub fn clear(&mut self) {
        self.quads.clear();
        self.index.clear();
    }

    /// Iterates over the quads in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Quad> + '_ {
        self.quads.iter().map(|quad| &**quad)
    }

    /// Returns a new dataset with the quads that match the given terms.
    ///
    /// An absent term matches everything in its position. In particular, an absent graph matches
    /// quads in all graphs, whereas [Term::DefaultGraph] only matches quads in the default graph.
    /// Every given term must be equal to the term in its position.
    pub fn match_terms(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> Dataset {
        self.match_pattern(&pattern_from_terms(subject, predicate, object, graph))
    }

    /// Returns a new dataset with the quads that match `pattern`, treating variables as constants.
    pub fn match_pattern(&self, pattern: &QuadPattern) -> Dataset {
        self.quads_for_pattern(pattern, VariableMatchingMode::Constant)
            .cloned()
            .collect()
    }

    /// Iterates over the quads that match `pattern` without copying them.
    pub fn quads_for_pattern<'a>(
        &'a self,
        pattern: &'a QuadPattern,
        mode: VariableMatchingMode,
    ) -> impl Iterator<Item = &'a Quad> + 'a {
        self.candidate_quads(pattern, mode)
            .filter(move |quad| pattern.matches(quad, mode))
    }

    fn candidate_quads<'a>(
        &'a self,
        pattern: &QuadPattern,
        mode: VariableMatchingMode,
    ) -> impl Iterator<Item = &'a Quad> + 'a {
        let candidates = match self.candidates(pattern, mode) {
            Candidates::All => Either::Left(self.quads.iter()),
            Candidates::Indexed(quads) => Either::Right(Either::Left(quads.iter())),
            Candidates::Nothing => {
                Either::Right(Either::Right(std::iter::empty::<&Arc<Quad>>()))
            }
        };
        candidates.map(|quad| &**quad)
    }

    /// Picks the smallest index entry among the positions that `pattern` fixes.
    fn candidates(&self, pattern: &QuadPattern, mode: VariableMatchingMode) -> Candidates<'_> {
        let mut best: Option<&FxHashSet<Arc<Quad>>> = None;
        for name in QuadTermName::ALL {
            let Some(term) = pattern.get(name) else {
                continue;
            };
            if mode == VariableMatchingMode::Wildcard && !term.is_ground() {
                continue;
            }
            match self.index.get(name, term) {
                None => return Candidates::Nothing,
                Some(quads) if best.map_or(true, |best| quads.len() < best.len()) => {
                    best = Some(quads);
                }
                Some(_) => {}
            }
        }
        best.map_or(Candidates::All, Candidates::Indexed)
    }

    pub(crate) fn index(&self) -> &QuadIndex {
        &self.index
    }

    /// Returns a new dataset with the quads of both datasets.
    pub fn union(&self, other: &Dataset) -> Dataset {
        let (larger, smaller) = if self.len() >= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        let mut result = larger.clone();
        result.extend(smaller.iter().cloned());
        result
    }

    /// Returns a new dataset with the quads that are in both datasets.
    pub fn intersection(&self, other: &Dataset) -> Dataset {
        let (larger, smaller) = if self.len() >= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        smaller.filter(|quad| larger.has(quad))
    }

    /// Returns a new dataset with the quads of this dataset that are not in `other`.
    pub fn difference(&self, other: &Dataset) -> Dataset {
        self.filter(|quad| !other.has(quad))
    }

    /// Returns whether this dataset is a superset of `other` once blank nodes are normalized.
    ///
    /// This holds if the blank nodes of `other` can be renamed injectively to blank nodes of this
    /// dataset such that every renamed quad of `other` is in this dataset.
    ///
    /// The search for a renaming is bounded by the default [CanonicalizationOptions]. If it
    /// exceeds them, the datasets are reported as not contained. Use [Dataset::try_contains_with]
    /// to tell both cases apart.
    pub fn contains(&self, other: &Dataset) -> bool {
        self.try_contains_with(other, &CanonicalizationOptions::default())
            .unwrap_or_else(|error| {
                tracing::warn!("Gave up on dataset containment: {error}");
                false
            })
    }

    /// Like [Dataset::contains], but fails with [DatasetError::CanonicalizationTooComplex] once
    /// the search exceeds `options`.
    pub fn try_contains_with(
        &self,
        other: &Dataset,
        options: &CanonicalizationOptions,
    ) -> Result<bool, DatasetError> {
        let embedding =
            isomorphism::find_embedding(other, self, None, options.max_embedding_attempts)?;
        Ok(embedding.is_some())
    }

    /// Returns whether both datasets have the same structure once blank nodes are normalized.
    ///
    /// ```
    /// use rdf_interop_dataset::Dataset;
    /// use rdf_interop_model::*;
    ///
    /// let p = NamedNode::new("http://example.com/knows")?;
    /// let a: Dataset = [Quad::in_default_graph(
    ///     BlankNode::new("alice")?,
    ///     p.clone(),
    ///     BlankNode::new("bob")?,
    /// )]
    /// .into_iter()
    /// .collect();
    /// let b: Dataset = [Quad::in_default_graph(
    ///     BlankNode::new("x")?,
    ///     p.clone(),
    ///     BlankNode::new("y")?,
    /// )]
    /// .into_iter()
    /// .collect();
    /// assert!(a.equals(&b));
    /// assert_eq!(a.to_canonical()?, b.to_canonical()?);
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    ///
    /// Like [Dataset::contains], the comparison gives up and returns false once it exceeds the
    /// default [CanonicalizationOptions]. Use [Dataset::try_equals_with] to tell both cases apart.
    pub fn equals(&self, other: &Dataset) -> bool {
        self.try_equals_with(other, &CanonicalizationOptions::default())
            .unwrap_or_else(|error| {
                tracing::warn!("Gave up on dataset comparison: {error}");
                false
            })
    }

    /// Like [Dataset::equals], but fails with [DatasetError::CanonicalizationTooComplex] once the
    /// search for a blank node renaming exceeds `options`.
    pub fn try_equals_with(
        &self,
        other: &Dataset,
        options: &CanonicalizationOptions,
    ) -> Result<bool, DatasetError> {
        if self.len() != other.len() {
            return Ok(false);
        }
        let own_hashes = Canonicalizer::new(self).first_degree_hashes();
        let other_hashes = Canonicalizer::new(other).first_degree_hashes();
        if !isomorphism::same_hash_distribution(&own_hashes, &other_hashes) {
            return Ok(false);
        }
        let compatible =
            |from: &BlankNode, to: &BlankNode| other_hashes.get(from) == own_hashes.get(to);
        let embedding = isomorphism::find_embedding(
            other,
            self,
            Some(&compatible),
            options.max_embedding_attempts,
        )?;
        Ok(embedding.is_some())
    }

    /// Returns whether every quad passes `predicate`. This is true for an empty dataset.
    pub fn every(&self, predicate: impl FnMut(&Quad) -> bool) -> bool {
        self.iter().all(predicate)
    }

    /// Returns whether at least one quad passes `predicate`.
    pub fn some(&self, predicate: impl FnMut(&Quad) -> bool) -> bool {
        self.iter().any(predicate)
    }

    /// Returns a new dataset with the quads that pass `predicate`.
    pub fn filter(&self, mut predicate: impl FnMut(&Quad) -> bool) -> Dataset {
        self.iter()
            .filter(|quad| predicate(quad))
            .cloned()
            .collect()
    }

    /// Returns a new dataset with the quads that `mapper` returns for each quad.
    pub fn map(&self, mapper: impl FnMut(&Quad) -> Quad) -> Dataset {
        self.iter().map(mapper).collect()
    }

    pub fn for_each(&self, action: impl FnMut(&Quad)) {
        self.iter().for_each(action);
    }

    /// Folds all quads into an accumulator, starting with `initial`.
    pub fn reduce<A>(&self, initial: A, reducer: impl FnMut(A, &Quad) -> A) -> A {
        self.iter().fold(initial, reducer)
    }

    /// Copies the quads into a [Vec] in arbitrary order.
    pub fn to_vec(&self) -> Vec<Quad> {
        self.iter().cloned().collect()
    }

    /// Returns the canonical N-Quads serialization of the dataset.
    ///
    /// Blank nodes are relabeled deterministically, so isomorphic datasets produce identical
    /// strings. Uses the default [CanonicalizationOptions].
    pub fn to_canonical(&self) -> Result<String, DatasetError> {
        self.to_canonical_with(&CanonicalizationOptions::default())
    }

    /// Like [Dataset::to_canonical] with explicit `options`.
    pub fn to_canonical_with(
        &self,
        options: &CanonicalizationOptions,
    ) -> Result<String, DatasetError> {
        let labels = Canonicalizer::new(self).with_options(*options).canonical_labels()?;
        let mut lines = self
            .iter()
            .map(|quad| {
                let relabeled = relabel_blank_nodes(quad, &|node: &BlankNode| {
                    labels.get(node).cloned().unwrap_or_else(|| node.clone())
                });
                format!("{relabeled}\n")
            })
            .collect::<Vec<_>>();
        lines.sort_unstable();
        Ok(lines.concat())
    }

    /// Returns the canonical label of every blank node in the dataset.
    pub fn canonical_labels(&self) -> Result<FxHashMap<BlankNode, BlankNode>, DatasetError> {
        Canonicalizer::new(self).canonical_labels()
    }

    /// Returns a stream over a snapshot of the quads.
    pub fn to_stream(&self) -> ResultStream<Quad> {
        self.to_vec().into_iter().collect()
    }

    /// Adds every quad of `stream` to the dataset.
    ///
    /// Resolves once the stream has ended. If the stream fails, its error is returned and the
    /// quads that were read before the error stay in the dataset.
    pub async fn import(
        &mut self,
        mut stream: ResultStream<Quad>,
    ) -> Result<&mut Self, DatasetError> {
        let mut count = 0_usize;
        while let Some(quad) = stream.next().await {
            match quad {
                Ok(quad) => {
                    self.insert(quad);
                    count += 1;
                }
                Err(error) => {
                    tracing::debug!(count, "Import into dataset failed after {count} quads.");
                    return Err(error.into());
                }
            }
        }
        tracing::debug!(count, size = self.len(), "Imported quads into dataset.");
        Ok(self)
    }
}

impl Source for Dataset {
    fn match_quads(&self, pattern: &QuadPattern) -> ResultStream<Quad> {
        self.quads_for_pattern(pattern, VariableMatchingMode::Wildcard)
            .cloned()
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    }
}

impl FromIterator<Quad> for Dataset {
    fn from_iter<T: IntoIterator<Item = Quad>>(iter: T) -> Self {
        let mut dataset = Dataset::new();
        dataset.extend(iter);
        dataset
    }
}

impl Extend<Quad> for Dataset {
    fn extend<T: IntoIterator<Item = Quad>>(&mut self, iter: T) {
        for quad in iter {
            self.insert(quad);
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Quad;
    type IntoIter = Box<dyn Iterator<Item = &'a Quad> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl IntoIterator for Dataset {
    type Item = Quad;
    type IntoIter = std::iter::Map<
        std::collections::hash_set::IntoIter<Arc<Quad>>,
        fn(Arc<Quad>) -> Quad,
    >;

    fn into_iter(mut self) -> Self::IntoIter {
        // Drops the references held by the index so that the quads can be moved out.
        self.index.clear();
        let quads = std::mem::take(&mut self.quads);
        quads.into_iter().map(Arc::unwrap_or_clone as fn(Arc<Quad>) -> Quad)
    }
}

impl Debug for Dataset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Writes the dataset as N-Quads, one quad per line.
///
/// The lines are sorted to keep the output stable for the same dataset. Blank node labels are
/// written as they are, so isomorphic datasets may produce different strings. Use
/// [Dataset::to_canonical] for a normalized serialization.
impl Display for Dataset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut lines = self.iter().map(Quad::to_string).collect::<Vec<_>>();
        lines.sort_unstable();
        for line in lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn pattern_from_terms(
    subject: Option<&Term>,
    predicate: Option<&Term>,
    object: Option<&Term>,
    graph: Option<&Term>,
) -> QuadPattern {
    QuadPattern::new(
        subject.cloned(),
        predicate.cloned(),
        object.cloned(),
        graph.cloned(),
    )
}

/// Returns a copy of `quad` in which every blank node, including those in nested quads, is
/// replaced by `label(node)`.
pub(crate) fn relabel_blank_nodes(quad: &Quad, label: &dyn Fn(&BlankNode) -> BlankNode) -> Quad {
    let subject = match &quad.subject {
        Subject::BlankNode(node) => Subject::BlankNode(label(node)),
        Subject::Quad(inner) => Subject::from(relabel_blank_nodes(inner, label)),
        subject => subject.clone(),
    };
    let object = match &quad.object {
        Object::BlankNode(node) => Object::BlankNode(label(node)),
        Object::Quad(inner) => Object::from(relabel_blank_nodes(inner, label)),
        object => object.clone(),
    };
    let graph = match &quad.graph {
        GraphName::BlankNode(node) => GraphName::BlankNode(label(node)),
        graph => graph.clone(),
    };
    Quad::new(subject, quad.predicate.clone(), object, graph)
}
