//! The role types restrict the term variants that may appear in each position of a quad.

use crate::{
    BlankNode, Literal, NamedNode, Quad, QuadTermName, Term, TermError, TermRef, TermType,
    Variable,
};
use std::fmt::{Display, Formatter};

/// The term variants allowed as the subject of a quad.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Subject {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Variable(Variable),
    Quad(Box<Quad>),
}

/// The term variants allowed as the predicate of a quad.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Predicate {
    NamedNode(NamedNode),
    Variable(Variable),
}

/// The term variants allowed as the object of a quad.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Object {
    NamedNode(NamedNode),
    Literal(Literal),
    BlankNode(BlankNode),
    Variable(Variable),
    Quad(Box<Quad>),
}

/// The term variants allowed as the graph of a quad.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Default)]
pub enum GraphName {
    #[default]
    DefaultGraph,
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Variable(Variable),
}

impl Subject {
    #[inline]
    pub fn as_ref(&self) -> TermRef<'_> {
        match self {
            Subject::NamedNode(node) => TermRef::NamedNode(node),
            Subject::BlankNode(node) => TermRef::BlankNode(node),
            Subject::Variable(variable) => TermRef::Variable(variable),
            Subject::Quad(quad) => TermRef::Quad(quad),
        }
    }
}

impl Predicate {
    #[inline]
    pub fn as_ref(&self) -> TermRef<'_> {
        match self {
            Predicate::NamedNode(node) => TermRef::NamedNode(node),
            Predicate::Variable(variable) => TermRef::Variable(variable),
        }
    }
}

impl Object {
    #[inline]
    pub fn as_ref(&self) -> TermRef<'_> {
        match self {
            Object::NamedNode(node) => TermRef::NamedNode(node),
            Object::Literal(literal) => TermRef::Literal(literal),
            Object::BlankNode(node) => TermRef::BlankNode(node),
            Object::Variable(variable) => TermRef::Variable(variable),
            Object::Quad(quad) => TermRef::Quad(quad),
        }
    }
}

impl GraphName {
    #[inline]
    pub fn as_ref(&self) -> TermRef<'_> {
        match self {
            GraphName::DefaultGraph => TermRef::DefaultGraph,
            GraphName::NamedNode(node) => TermRef::NamedNode(node),
            GraphName::BlankNode(node) => TermRef::BlankNode(node),
            GraphName::Variable(variable) => TermRef::Variable(variable),
        }
    }

    #[inline]
    pub fn is_default_graph(&self) -> bool {
        matches!(self, GraphName::DefaultGraph)
    }
}

/// Implements the accessors, conversions and comparisons that all role types share.
macro_rules! impl_role {
    ($role:ident, $position:expr, { $($variant:ident($inner:ty)),* }) => {
        impl $role {
            #[inline]
            pub fn term_type(&self) -> TermType {
                self.as_ref().term_type()
            }

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
            pub fn into_term(self) -> Term {
                self.into()
            }
        }

        impl Display for $role {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                self.as_ref().fmt(f)
            }
        }

        $(
            impl From<$inner> for $role {
                #[inline]
                fn from(value: $inner) -> Self {
                    $role::$variant(value.into())
                }
            }
        )*

        impl From<$role> for Term {
            fn from(value: $role) -> Self {
                match value {
                    $($role::$variant(inner) => inner.into(),)*
                    #[allow(unreachable_patterns, reason = "Not every role has a default graph.")]
                    _ => Term::DefaultGraph,
                }
            }
        }

        impl TryFrom<Term> for $role {
            type Error = TermError;

            fn try_from(term: Term) -> Result<Self, Self::Error> {
                let term_type = term.term_type();
                match term {
                    $(Term::$variant(inner) => Ok($role::$variant(inner)),)*
                    _ => $role::try_from_remaining(term_type)
                        .ok_or(TermError::RoleViolation { position: $position, term_type }),
                }
            }
        }

        impl PartialEq<Term> for $role {
            fn eq(&self, other: &Term) -> bool {
                self.as_ref() == other.as_ref()
            }
        }

        impl PartialEq<$role> for Term {
            fn eq(&self, other: &$role) -> bool {
                self.as_ref() == other.as_ref()
            }
        }
    };
}

impl_role!(Subject, QuadTermName::Subject, {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Variable(Variable),
    Quad(Box<Quad>)
});
impl_role!(Predicate, QuadTermName::Predicate, {
    NamedNode(NamedNode),
    Variable(Variable)
});
impl_role!(Object, QuadTermName::Object, {
    NamedNode(NamedNode),
    Literal(Literal),
    BlankNode(BlankNode),
    Variable(Variable),
    Quad(Box<Quad>)
});
impl_role!(GraphName, QuadTermName::Graph, {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Variable(Variable)
});

impl Subject {
    fn try_from_remaining(_: TermType) -> Option<Self> {
        None
    }
}

impl Predicate {
    fn try_from_remaining(_: TermType) -> Option<Self> {
        None
    }
}

impl Object {
    fn try_from_remaining(_: TermType) -> Option<Self> {
        None
    }
}

impl GraphName {
    fn try_from_remaining(term_type: TermType) -> Option<Self> {
        (term_type == TermType::DefaultGraph).then_some(GraphName::DefaultGraph)
    }
}

impl From<Quad> for Subject {
    #[inline]
    fn from(quad: Quad) -> Self {
        Subject::Quad(Box::new(quad))
    }
}

impl From<Quad> for Object {
    #[inline]
    fn from(quad: Quad) -> Self {
        Object::Quad(Box::new(quad))
    }
}

impl From<Subject> for Object {
    fn from(subject: Subject) -> Self {
        match subject {
            Subject::NamedNode(node) => Object::NamedNode(node),
            Subject::BlankNode(node) => Object::BlankNode(node),
            Subject::Variable(variable) => Object::Variable(variable),
            Subject::Quad(quad) => Object::Quad(quad),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_is_not_a_predicate() {
        let error = Predicate::try_from(Term::from(Literal::new_simple_literal("p")));
        assert!(matches!(
            error,
            Err(TermError::RoleViolation {
                position: QuadTermName::Predicate,
                term_type: TermType::Literal
            })
        ));
    }

    #[test]
    fn default_graph_is_only_a_graph() {
        assert_eq!(
            GraphName::try_from(Term::DefaultGraph).ok(),
            Some(GraphName::DefaultGraph)
        );
        assert!(Subject::try_from(Term::DefaultGraph).is_err());
        assert!(Object::try_from(Term::DefaultGraph).is_err());
    }

    #[test]
    fn roles_compare_with_terms() {
        let node = NamedNode::new_unchecked("http://example.com/s");
        let subject = Subject::from(node.clone());
        let object = Object::from(node.clone());
        assert!(subject == Term::from(node.clone()));
        assert!(subject.equals(Some(&Term::from(node))));
        assert!(subject.as_ref() == object.as_ref());
        assert_eq!(Term::from(GraphName::DefaultGraph), Term::DefaultGraph);
    }
}
