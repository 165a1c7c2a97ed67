use crate::{BlankNode, Literal, NamedNode, Quad, Variable};
use std::fmt::{Display, Formatter};

/// The discriminant of a term, identifying its variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TermType {
    NamedNode,
    BlankNode,
    Literal,
    Variable,
    DefaultGraph,
    Quad,
}

impl TermType {
    pub fn as_str(self) -> &'static str {
        match self {
            TermType::NamedNode => "NamedNode",
            TermType::BlankNode => "BlankNode",
            TermType::Literal => "Literal",
            TermType::Variable => "Variable",
            TermType::DefaultGraph => "DefaultGraph",
            TermType::Quad => "Quad",
        }
    }
}

impl Display for TermType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The name of a position within a quad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QuadTermName {
    Subject,
    Predicate,
    Object,
    Graph,
}

impl QuadTermName {
    pub const ALL: [QuadTermName; 4] = [
        QuadTermName::Subject,
        QuadTermName::Predicate,
        QuadTermName::Object,
        QuadTermName::Graph,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuadTermName::Subject => "subject",
            QuadTermName::Predicate => "predicate",
            QuadTermName::Object => "object",
            QuadTermName::Graph => "graph",
        }
    }
}

impl Display for QuadTermName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An owned RDF term.
///
/// The set of variants is closed. Two terms are equal iff they are of the same variant and all
/// fields of that variant are equal. Nested quads compare recursively.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Term {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Literal(Literal),
    Variable(Variable),
    /// The default graph. All instances are equal.
    DefaultGraph,
    /// A quad used as a term ([RDF-star](https://w3c.github.io/rdf-star/cg-spec/)).
    Quad(Box<Quad>),
}

impl Term {
    #[inline]
    pub fn term_type(&self) -> TermType {
        self.as_ref().term_type()
    }

    /// Returns the primary scalar payload of the term.
    ///
    /// This is the IRI, the blank node identifier, the lexical form, or the variable name. The
    /// default graph and quads have the empty string as value.
    #[inline]
    pub fn value(&self) -> &str {
        self.as_ref().value()
    }

    /// Returns whether `other` is present and equal to this term.
    #[inline]
    pub fn equals(&self, other: Option<&Term>) -> bool {
        other.is_some_and(|other| self == other)
    }

    #[inline]
    pub fn as_ref(&self) -> TermRef<'_> {
        match self {
            Term::NamedNode(node) => TermRef::NamedNode(node),
            Term::BlankNode(node) => TermRef::BlankNode(node),
            Term::Literal(literal) => TermRef::Literal(literal),
            Term::Variable(variable) => TermRef::Variable(variable),
            Term::DefaultGraph => TermRef::DefaultGraph,
            Term::Quad(quad) => TermRef::Quad(quad),
        }
    }

    #[inline]
    pub fn is_blank_node(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    #[inline]
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// Returns whether the term contains no variables, including inside nested quads.
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::Quad(quad) => quad.is_ground(),
            _ => true,
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.as_ref().fmt(f)
    }
}

impl From<NamedNode> for Term {
    #[inline]
    fn from(node: NamedNode) -> Self {
        Term::NamedNode(node)
    }
}

impl From<BlankNode> for Term {
    #[inline]
    fn from(node: BlankNode) -> Self {
        Term::BlankNode(node)
    }
}

impl From<Literal> for Term {
    #[inline]
    fn from(literal: Literal) -> Self {
        Term::Literal(literal)
    }
}

impl From<Variable> for Term {
    #[inline]
    fn from(variable: Variable) -> Self {
        Term::Variable(variable)
    }
}

impl From<Quad> for Term {
    #[inline]
    fn from(quad: Quad) -> Self {
        Term::Quad(Box::new(quad))
    }
}

impl From<Box<Quad>> for Term {
    #[inline]
    fn from(quad: Box<Quad>) -> Self {
        Term::Quad(quad)
    }
}

/// A borrowed RDF term.
///
/// Used to compare and inspect terms stored in the role types of a [Quad] without cloning them.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum TermRef<'a> {
    NamedNode(&'a NamedNode),
    BlankNode(&'a BlankNode),
    Literal(&'a Literal),
    Variable(&'a Variable),
    DefaultGraph,
    Quad(&'a Quad),
}

impl<'a> TermRef<'a> {
    pub fn term_type(self) -> TermType {
        match self {
            TermRef::NamedNode(_) => TermType::NamedNode,
            TermRef::BlankNode(_) => TermType::BlankNode,
            TermRef::Literal(_) => TermType::Literal,
            TermRef::Variable(_) => TermType::Variable,
            TermRef::DefaultGraph => TermType::DefaultGraph,
            TermRef::Quad(_) => TermType::Quad,
        }
    }

    pub fn value(self) -> &'a str {
        match self {
            TermRef::NamedNode(node) => node.as_str(),
            TermRef::BlankNode(node) => node.as_str(),
            TermRef::Literal(literal) => literal.value(),
            TermRef::Variable(variable) => variable.as_str(),
            TermRef::DefaultGraph | TermRef::Quad(_) => "",
        }
    }

    pub fn into_owned(self) -> Term {
        match self {
            TermRef::NamedNode(node) => Term::NamedNode(node.clone()),
            TermRef::BlankNode(node) => Term::BlankNode(node.clone()),
            TermRef::Literal(literal) => Term::Literal(literal.clone()),
            TermRef::Variable(variable) => Term::Variable(variable.clone()),
            TermRef::DefaultGraph => Term::DefaultGraph,
            TermRef::Quad(quad) => Term::Quad(Box::new(quad.clone())),
        }
    }
}

impl Display for TermRef<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TermRef::NamedNode(node) => node.fmt(f),
            TermRef::BlankNode(node) => node.fmt(f),
            TermRef::Literal(literal) => literal.fmt(f),
            TermRef::Variable(variable) => variable.fmt(f),
            TermRef::DefaultGraph => Ok(()),
            TermRef::Quad(quad) => quad.fmt_nested(f),
        }
    }
}

impl<'a> From<&'a Term> for TermRef<'a> {
    #[inline]
    fn from(term: &'a Term) -> Self {
        term.as_ref()
    }
}

impl PartialEq<Term> for TermRef<'_> {
    fn eq(&self, other: &Term) -> bool {
        *self == other.as_ref()
    }
}

impl PartialEq<TermRef<'_>> for Term {
    fn eq(&self, other: &TermRef<'_>) -> bool {
        self.as_ref() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphName;

    fn all_variants() -> Vec<Term> {
        let ex = NamedNode::new_unchecked("http://example.com/a");
        vec![
            ex.clone().into(),
            BlankNode::new_unchecked("a").into(),
            Literal::new_simple_literal("http://example.com/a").into(),
            Variable::new_unchecked("a").into(),
            Term::DefaultGraph,
            Quad::new(ex.clone(), ex.clone(), ex, GraphName::DefaultGraph).into(),
        ]
    }

    #[test]
    fn differing_variants_are_never_equal() {
        let terms = all_variants();
        for (i, left) in terms.iter().enumerate() {
            for (j, right) in terms.iter().enumerate() {
                assert_eq!(left.equals(Some(right)), i == j, "{left} vs {right}");
                assert_eq!(left == right, right == left);
            }
        }
    }

    #[test]
    fn absent_terms_are_not_equal() {
        for term in all_variants() {
            assert!(!term.equals(None));
            assert!(term.equals(Some(&term.clone())));
        }
    }

    #[test]
    fn default_graph_and_quads_have_empty_values() {
        let terms = all_variants();
        assert_eq!(terms[4].value(), "");
        assert_eq!(terms[5].value(), "");
        assert_eq!(terms[0].value(), "http://example.com/a");
        assert_eq!(Term::DefaultGraph, Term::DefaultGraph);
    }

    #[test]
    fn term_types_are_reported() {
        let types = all_variants()
            .iter()
            .map(|t| t.term_type().as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            types,
            ["NamedNode", "BlankNode", "Literal", "Variable", "DefaultGraph", "Quad"]
        );
    }
}
