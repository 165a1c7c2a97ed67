use crate::{Quad, QuadTermName, Term, TermRef, Variable};

/// Defines how variables within a [QuadPattern] are interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VariableMatchingMode {
    /// A variable matches any term. Repeated occurrences of the same variable must match equal
    /// terms.
    #[default]
    Wildcard,
    /// A variable is a constant that only matches an equal variable.
    Constant,
}

/// A pattern with an optional term per quad position.
///
/// An absent position matches any term. Note that an absent graph matches quads in all graphs
/// while an explicit [Term::DefaultGraph] only matches quads in the default graph.
///
/// ```
/// use rdf_interop_model::*;
///
/// let ex = NamedNode::new("http://example.com")?;
/// let quad = Quad::new(ex.clone(), ex.clone(), ex.clone(), ex.clone());
///
/// assert!(QuadPattern::any().matches(&quad, VariableMatchingMode::Constant));
/// assert!(!QuadPattern::any()
///     .with_graph(Term::DefaultGraph)
///     .matches(&quad, VariableMatchingMode::Constant));
/// # Result::<_, rdf_interop_model::TermError>::Ok(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct QuadPattern {
    pub subject: Option<Term>,
    pub predicate: Option<Term>,
    pub object: Option<Term>,
    pub graph: Option<Term>,
}

impl QuadPattern {
    pub fn new(
        subject: Option<Term>,
        predicate: Option<Term>,
        object: Option<Term>,
        graph: Option<Term>,
    ) -> Self {
        Self {
            subject,
            predicate,
            object,
            graph,
        }
    }

    /// A pattern that matches every quad.
    pub fn any() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<Term>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    #[must_use]
    pub fn with_predicate(mut self, predicate: impl Into<Term>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    #[must_use]
    pub fn with_object(mut self, object: impl Into<Term>) -> Self {
        self.object = Some(object.into());
        self
    }

    #[must_use]
    pub fn with_graph(mut self, graph: impl Into<Term>) -> Self {
        self.graph = Some(graph.into());
        self
    }

    pub fn get(&self, name: QuadTermName) -> Option<&Term> {
        match name {
            QuadTermName::Subject => self.subject.as_ref(),
            QuadTermName::Predicate => self.predicate.as_ref(),
            QuadTermName::Object => self.object.as_ref(),
            QuadTermName::Graph => self.graph.as_ref(),
        }
    }

    /// Returns the distinct variables of the pattern in position order, including those inside
    /// nested quads.
    pub fn variables(&self) -> Vec<&Variable> {
        let mut result: Vec<&Variable> = Vec::new();
        for term in QuadTermName::ALL.into_iter().filter_map(|name| self.get(name)) {
            let found = match term {
                Term::Variable(variable) => vec![variable],
                Term::Quad(quad) => quad.variables(),
                _ => Vec::new(),
            };
            for variable in found {
                if !result.contains(&variable) {
                    result.push(variable);
                }
            }
        }
        result
    }

    /// Returns whether `quad` matches this pattern.
    pub fn matches(&self, quad: &Quad, mode: VariableMatchingMode) -> bool {
        self.bind(quad, mode).is_some()
    }

    /// Matches `quad` against this pattern and returns the terms the variables of the pattern
    /// are bound to, or [None] if the quad does not match.
    ///
    /// In [VariableMatchingMode::Constant] the returned list is always empty.
    pub fn bind(&self, quad: &Quad, mode: VariableMatchingMode) -> Option<Vec<(Variable, Term)>> {
        let mut bindings = Vec::new();
        for name in QuadTermName::ALL {
            if let Some(pattern) = self.get(name) {
                if !unify(pattern.as_ref(), quad.term(name), mode, &mut bindings) {
                    return None;
                }
            }
        }
        Some(bindings)
    }

    /// Replaces the top-level variables of the pattern for which `lookup` returns a term.
    #[must_use]
    pub fn substitute(&self, lookup: impl Fn(&Variable) -> Option<Term>) -> Self {
        let replace = |slot: &Option<Term>| match slot {
            Some(Term::Variable(variable)) => lookup(variable).or_else(|| slot.clone()),
            slot => slot.clone(),
        };
        Self {
            subject: replace(&self.subject),
            predicate: replace(&self.predicate),
            object: replace(&self.object),
            graph: replace(&self.graph),
        }
    }
}

impl From<&Quad> for QuadPattern {
    fn from(quad: &Quad) -> Self {
        Self::new(
            Some(quad.subject.clone().into()),
            Some(quad.predicate.clone().into()),
            Some(quad.object.clone().into()),
            Some(quad.graph.clone().into()),
        )
    }
}

fn unify(
    pattern: TermRef<'_>,
    actual: TermRef<'_>,
    mode: VariableMatchingMode,
    bindings: &mut Vec<(Variable, Term)>,
) -> bool {
    if mode == VariableMatchingMode::Constant {
        return pattern == actual;
    }
    match (pattern, actual) {
        (TermRef::Variable(variable), actual) => {
            match bindings.iter().find(|(bound, _)| bound == variable) {
                Some((_, value)) => *value == actual,
                None => {
                    bindings.push((variable.clone(), actual.into_owned()));
                    true
                }
            }
        }
        (TermRef::Quad(pattern), TermRef::Quad(actual)) => pattern
            .terms()
            .into_iter()
            .zip(actual.terms())
            .all(|(pattern, actual)| unify(pattern, actual, mode, bindings)),
        (pattern, actual) => pattern == actual,
    }
}
