use crate::{
    BlankNode, GraphName, Object, Predicate, QuadTermName, Subject, Term, TermError,
    TermProfile, TermRef, TermType, Variable,
};
use std::fmt::{Display, Formatter};

/// An RDF [quad](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-dataset).
///
/// A quad is identified by its structure: two quads are equal iff all four positions are equal.
/// A quad may itself be used as a subject or object of another quad (RDF-star), in which case
/// equality is checked recursively.
///
/// The default string formatter returns an N-Quads compatible representation:
/// ```
/// use rdf_interop_model::*;
///
/// assert_eq!(
///     "<http://example.com/s> <http://example.com/p> <http://example.com/o> <http://example.com/g> .",
///     Quad::new(
///         NamedNode::new("http://example.com/s")?,
///         NamedNode::new("http://example.com/p")?,
///         NamedNode::new("http://example.com/o")?,
///         NamedNode::new("http://example.com/g")?,
///     ).to_string()
/// );
/// # Result::<_, rdf_interop_model::TermError>::Ok(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Quad {
    /// The [subject](https://www.w3.org/TR/rdf11-concepts/#dfn-subject) of this quad.
    pub subject: Subject,
    /// The [predicate](https://www.w3.org/TR/rdf11-concepts/#dfn-predicate) of this quad.
    pub predicate: Predicate,
    /// The [object](https://www.w3.org/TR/rdf11-concepts/#dfn-object) of this quad.
    pub object: Object,
    /// The name of the RDF [graph](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-graph) in which
    /// the quad is.
    pub graph: GraphName,
}

impl Quad {
    /// Builds a quad from terms that already satisfy the role constraints.
    #[inline]
    pub fn new(
        subject: impl Into<Subject>,
        predicate: impl Into<Predicate>,
        object: impl Into<Object>,
        graph: impl Into<GraphName>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            graph: graph.into(),
        }
    }

    /// Builds a quad in the default graph.
    #[inline]
    pub fn in_default_graph(
        subject: impl Into<Subject>,
        predicate: impl Into<Predicate>,
        object: impl Into<Object>,
    ) -> Self {
        Self::new(subject, predicate, object, GraphName::DefaultGraph)
    }

    /// Builds a quad from arbitrary terms and checks the role constraints of every position.
    ///
    /// An absent `graph` stands for the default graph.
    ///
    /// ```
    /// use rdf_interop_model::*;
    ///
    /// let s = Term::from(NamedNode::new("http://example.com/s")?);
    /// let literal = Term::from(Literal::new_simple_literal("p"));
    /// let result = Quad::try_new(s.clone(), literal.clone(), s, None);
    /// assert!(matches!(result, Err(TermError::RoleViolation { .. })));
    /// # Result::<_, rdf_interop_model::TermError>::Ok(())
    /// ```
    pub fn try_new(
        subject: Term,
        predicate: Term,
        object: Term,
        graph: Option<Term>,
    ) -> Result<Self, TermError> {
        Ok(Self {
            subject: subject.try_into()?,
            predicate: predicate.try_into()?,
            object: object.try_into()?,
            graph: match graph {
                Some(graph) => graph.try_into()?,
                None => GraphName::DefaultGraph,
            },
        })
    }

    /// Always [TermType::Quad].
    #[inline]
    pub fn term_type(&self) -> TermType {
        TermType::Quad
    }

    /// Quads have no scalar value of their own. This is always the empty string.
    #[inline]
    pub fn value(&self) -> &str {
        ""
    }

    /// Returns whether `other` is a quad that is equal to this one.
    #[inline]
    pub fn equals(&self, other: Option<&Term>) -> bool {
        matches!(other, Some(Term::Quad(other)) if self == &**other)
    }

    /// Returns the term in the position `name`.
    pub fn term(&self, name: QuadTermName) -> TermRef<'_> {
        match name {
            QuadTermName::Subject => self.subject.as_ref(),
            QuadTermName::Predicate => self.predicate.as_ref(),
            QuadTermName::Object => self.object.as_ref(),
            QuadTermName::Graph => self.graph.as_ref(),
        }
    }

    /// Returns the four terms of this quad in subject, predicate, object, graph order.
    pub fn terms(&self) -> [TermRef<'_>; 4] {
        QuadTermName::ALL.map(|name| self.term(name))
    }

    /// Returns whether the subject or the object is a nested quad.
    pub fn is_nested(&self) -> bool {
        matches!(self.subject, Subject::Quad(_)) || matches!(self.object, Object::Quad(_))
    }

    /// Returns whether the quad contains no variables, including inside nested quads.
    pub fn is_ground(&self) -> bool {
        self.variables().is_empty()
    }

    /// Checks that the quad only uses term variants allowed by `profile`.
    pub fn check_profile(&self, profile: TermProfile) -> Result<(), TermError> {
        if !profile.allows_nested_quads() && self.is_nested() {
            return Err(TermError::ProfileViolation {
                profile,
                term_type: TermType::Quad,
            });
        }
        if !profile.allows_variables() && !self.is_ground() {
            return Err(TermError::ProfileViolation {
                profile,
                term_type: TermType::Variable,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn conforms_to(&self, profile: TermProfile) -> bool {
        self.check_profile(profile).is_ok()
    }

    /// Returns all blank nodes of the quad, including those inside nested quads.
    ///
    /// A blank node that occurs multiple times is returned multiple times.
    pub fn blank_nodes(&self) -> Vec<&BlankNode> {
        let mut result = Vec::new();
        self.visit_terms(&mut |term| {
            if let TermRef::BlankNode(node) = term {
                result.push(node);
            }
        });
        result
    }

    /// Returns all variables of the quad, including those inside nested quads.
    pub fn variables(&self) -> Vec<&Variable> {
        let mut result = Vec::new();
        self.visit_terms(&mut |term| {
            if let TermRef::Variable(variable) = term {
                result.push(variable);
            }
        });
        result
    }

    /// Calls `visitor` for every non-quad term, descending into nested quads.
    fn visit_terms<'a>(&'a self, visitor: &mut impl FnMut(TermRef<'a>)) {
        for term in self.terms() {
            match term {
                TermRef::Quad(quad) => quad.visit_terms(visitor),
                term => visitor(term),
            }
        }
    }

    /// Formats the quad as an embedded (RDF-star) term.
    pub(crate) fn fmt_nested(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<< {} {} {}", self.subject, self.predicate, self.object)?;
        if !self.graph.is_default_graph() {
            write!(f, " {}", self.graph)?;
        }
        f.write_str(" >>")
    }
}

impl Display for Quad {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if !self.graph.is_default_graph() {
            write!(f, " {}", self.graph)?;
        }
        f.write_str(" .")
    }
}

impl PartialEq<Term> for Quad {
    fn eq(&self, other: &Term) -> bool {
        self.equals(Some(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Literal, NamedNode};

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.com/{name}"))
    }

    fn sample() -> Quad {
        Quad::in_default_graph(ex("s"), ex("p"), Literal::new_simple_literal("v"))
    }

    #[test]
    fn changing_a_slot_breaks_equality() {
        let quad = sample();
        assert_eq!(quad, quad.clone());

        let mut other = quad.clone();
        other.subject = ex("other").into();
        assert_ne!(quad, other);

        let mut other = quad.clone();
        other.predicate = ex("other").into();
        assert_ne!(quad, other);

        let mut other = quad.clone();
        other.object = ex("other").into();
        assert_ne!(quad, other);

        let mut other = quad.clone();
        other.graph = ex("other").into();
        assert_ne!(quad, other);
    }

    #[test]
    fn nested_quads_round_trip() {
        let inner = sample();
        let outer = Quad::in_default_graph(inner.clone(), ex("source"), ex("wiki"));
        assert_eq!(outer.subject.term_type(), TermType::Quad);
        assert!(outer.subject.equals(Some(&Term::from(inner.clone()))));
        assert!(inner.equals(Some(&outer.subject.clone().into_term())));
        assert!(outer.is_nested());
        assert_eq!(
            outer.to_string(),
            "<< <http://example.com/s> <http://example.com/p> \"v\" >> \
             <http://example.com/source> <http://example.com/wiki> ."
        );
    }

    #[test]
    fn profiles_restrict_variables_and_nesting() {
        let nested = Quad::in_default_graph(sample(), ex("p"), ex("o"));
        assert!(nested.conforms_to(TermProfile::Star));
        assert!(!nested.conforms_to(TermProfile::Plain));

        let pattern = Quad::in_default_graph(Variable::new_unchecked("s"), ex("p"), ex("o"));
        assert!(pattern.conforms_to(TermProfile::Pattern));
        assert!(matches!(
            pattern.check_profile(TermProfile::Star),
            Err(TermError::ProfileViolation {
                term_type: TermType::Variable,
                ..
            })
        ));
    }

    #[test]
    fn try_new_checks_roles() {
        let s = Term::from(ex("s"));
        assert!(Quad::try_new(s.clone(), s.clone(), s.clone(), None).is_ok());
        assert!(matches!(
            Quad::try_new(s.clone(), BlankNode::new_unchecked("b").into(), s.clone(), None),
            Err(TermError::RoleViolation {
                position: QuadTermName::Predicate,
                ..
            })
        ));
        assert!(matches!(
            Quad::try_new(s.clone(), s.clone(), s, Some(Literal::from("g").into())),
            Err(TermError::RoleViolation {
                position: QuadTermName::Graph,
                ..
            })
        ));
    }

    #[test]
    fn collects_nested_blank_nodes() {
        let inner = Quad::in_default_graph(BlankNode::new_unchecked("a"), ex("p"), ex("o"));
        let outer = Quad::new(inner, ex("p"), BlankNode::new_unchecked("b"), ex("g"));
        let ids = outer
            .blank_nodes()
            .into_iter()
            .map(BlankNode::as_str)
            .collect::<Vec<_>>();
        assert_eq!(ids, ["a", "b"]);
    }
}
