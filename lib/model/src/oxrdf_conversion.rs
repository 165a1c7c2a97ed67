//! Conversions between this model and the [oxrdf] model.
//!
//! Converting from oxrdf never fails. Converting into oxrdf fails for terms that oxrdf cannot
//! represent: variables outside of [oxrdf::Variable], directional literals, the default graph used
//! as a term, and nested quads that are not in the default graph.

use crate::{
    BlankNode, GraphName, Literal, NamedNode, Object, Predicate, Quad, Subject, Term, TermError,
    Variable,
};

impl From<oxrdf::NamedNode> for NamedNode {
    fn from(node: oxrdf::NamedNode) -> Self {
        NamedNode::new_unchecked(node.into_string())
    }
}

impl From<NamedNode> for oxrdf::NamedNode {
    fn from(node: NamedNode) -> Self {
        oxrdf::NamedNode::new_unchecked(node.into_string())
    }
}

impl From<oxrdf::BlankNode> for BlankNode {
    fn from(node: oxrdf::BlankNode) -> Self {
        BlankNode::new_unchecked(node.as_str())
    }
}

impl From<BlankNode> for oxrdf::BlankNode {
    fn from(node: BlankNode) -> Self {
        oxrdf::BlankNode::new_unchecked(node.into_string())
    }
}

impl From<oxrdf::Variable> for Variable {
    fn from(variable: oxrdf::Variable) -> Self {
        Variable::new_unchecked(variable.into_string())
    }
}

impl From<Variable> for oxrdf::Variable {
    fn from(variable: Variable) -> Self {
        oxrdf::Variable::new_unchecked(variable.into_string())
    }
}

impl From<oxrdf::Literal> for Literal {
    fn from(literal: oxrdf::Literal) -> Self {
        match literal.language() {
            Some(language) => {
                Literal::new_language_tagged_literal_unchecked(literal.value(), language)
            }
            None => Literal::new_typed_literal(
                literal.value(),
                NamedNode::new_unchecked(literal.datatype().as_str()),
            ),
        }
    }
}

impl TryFrom<Literal> for oxrdf::Literal {
    type Error = TermError;

    fn try_from(literal: Literal) -> Result<Self, Self::Error> {
        if literal.direction().is_some() {
            return Err(TermError::UnsupportedConversion(format!(
                "The directional literal {literal}"
            )));
        }
        let (value, language, _, datatype) = literal.destruct();
        Ok(if language.is_empty() {
            oxrdf::Literal::new_typed_literal(value, oxrdf::NamedNode::from(datatype))
        } else {
            oxrdf::Literal::new_language_tagged_literal_unchecked(value, language)
        })
    }
}

/// Triples become quads in the default graph.
impl From<oxrdf::Triple> for Quad {
    fn from(triple: oxrdf::Triple) -> Self {
        Quad::in_default_graph(
            Subject::from(triple.subject),
            NamedNode::from(triple.predicate),
            Object::from(triple.object),
        )
    }
}

impl TryFrom<Quad> for oxrdf::Triple {
    type Error = TermError;

    fn try_from(quad: Quad) -> Result<Self, Self::Error> {
        if !quad.graph.is_default_graph() {
            return Err(TermError::UnsupportedConversion(format!(
                "The nested quad {quad} outside of the default graph"
            )));
        }
        Ok(oxrdf::Triple::new(
            oxrdf::Subject::try_from(quad.subject)?,
            oxrdf::NamedNode::try_from(quad.predicate)?,
            oxrdf::Term::try_from(quad.object)?,
        ))
    }
}

impl From<oxrdf::Quad> for Quad {
    fn from(quad: oxrdf::Quad) -> Self {
        Quad::new(
            Subject::from(quad.subject),
            NamedNode::from(quad.predicate),
            Object::from(quad.object),
            GraphName::from(quad.graph_name),
        )
    }
}

impl TryFrom<Quad> for oxrdf::Quad {
    type Error = TermError;

    fn try_from(quad: Quad) -> Result<Self, Self::Error> {
        Ok(oxrdf::Quad::new(
            oxrdf::Subject::try_from(quad.subject)?,
            oxrdf::NamedNode::try_from(quad.predicate)?,
            oxrdf::Term::try_from(quad.object)?,
            oxrdf::GraphName::try_from(quad.graph)?,
        ))
    }
}

impl From<oxrdf::Subject> for Subject {
    fn from(subject: oxrdf::Subject) -> Self {
        match subject {
            oxrdf::Subject::NamedNode(node) => Subject::NamedNode(node.into()),
            oxrdf::Subject::BlankNode(node) => Subject::BlankNode(node.into()),
            oxrdf::Subject::Triple(triple) => Subject::from(Quad::from(*triple)),
        }
    }
}

impl TryFrom<Subject> for oxrdf::Subject {
    type Error = TermError;

    fn try_from(subject: Subject) -> Result<Self, Self::Error> {
        match subject {
            Subject::NamedNode(node) => Ok(oxrdf::Subject::NamedNode(node.into())),
            Subject::BlankNode(node) => Ok(oxrdf::Subject::BlankNode(node.into())),
            Subject::Quad(quad) => Ok(oxrdf::Subject::Triple(Box::new((*quad).try_into()?))),
            Subject::Variable(variable) => Err(unsupported_variable(&variable)),
        }
    }
}

impl TryFrom<Predicate> for oxrdf::NamedNode {
    type Error = TermError;

    fn try_from(predicate: Predicate) -> Result<Self, Self::Error> {
        match predicate {
            Predicate::NamedNode(node) => Ok(node.into()),
            Predicate::Variable(variable) => Err(unsupported_variable(&variable)),
        }
    }
}

impl From<oxrdf::Term> for Object {
    fn from(term: oxrdf::Term) -> Self {
        match term {
            oxrdf::Term::NamedNode(node) => Object::NamedNode(node.into()),
            oxrdf::Term::BlankNode(node) => Object::BlankNode(node.into()),
            oxrdf::Term::Literal(literal) => Object::Literal(literal.into()),
            oxrdf::Term::Triple(triple) => Object::from(Quad::from(*triple)),
        }
    }
}

impl TryFrom<Object> for oxrdf::Term {
    type Error = TermError;

    fn try_from(object: Object) -> Result<Self, Self::Error> {
        match object {
            Object::NamedNode(node) => Ok(oxrdf::Term::NamedNode(node.into())),
            Object::BlankNode(node) => Ok(oxrdf::Term::BlankNode(node.into())),
            Object::Literal(literal) => Ok(oxrdf::Term::Literal(literal.try_into()?)),
            Object::Quad(quad) => Ok(oxrdf::Term::Triple(Box::new((*quad).try_into()?))),
            Object::Variable(variable) => Err(unsupported_variable(&variable)),
        }
    }
}

impl From<oxrdf::GraphName> for GraphName {
    fn from(graph: oxrdf::GraphName) -> Self {
        match graph {
            oxrdf::GraphName::NamedNode(node) => GraphName::NamedNode(node.into()),
            oxrdf::GraphName::BlankNode(node) => GraphName::BlankNode(node.into()),
            oxrdf::GraphName::DefaultGraph => GraphName::DefaultGraph,
        }
    }
}

impl TryFrom<GraphName> for oxrdf::GraphName {
    type Error = TermError;

    fn try_from(graph: GraphName) -> Result<Self, Self::Error> {
        match graph {
            GraphName::NamedNode(node) => Ok(oxrdf::GraphName::NamedNode(node.into())),
            GraphName::BlankNode(node) => Ok(oxrdf::GraphName::BlankNode(node.into())),
            GraphName::DefaultGraph => Ok(oxrdf::GraphName::DefaultGraph),
            GraphName::Variable(variable) => Err(unsupported_variable(&variable)),
        }
    }
}

impl From<oxrdf::Term> for Term {
    fn from(term: oxrdf::Term) -> Self {
        Object::from(term).into()
    }
}

impl TryFrom<Term> for oxrdf::Term {
    type Error = TermError;

    fn try_from(term: Term) -> Result<Self, Self::Error> {
        match term {
            Term::DefaultGraph => Err(TermError::UnsupportedConversion(
                "The default graph as a term".to_owned(),
            )),
            term => Object::try_from(term)?.try_into(),
        }
    }
}

fn unsupported_variable(variable: &Variable) -> TermError {
    TermError::UnsupportedConversion(format!("The variable {variable}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BaseDirection;

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.com/{name}"))
    }

    #[test]
    fn nested_quads_become_triples() -> Result<(), TermError> {
        let inner = Quad::in_default_graph(ex("s"), ex("p"), Literal::from("v"));
        let outer = Quad::new(inner, ex("source"), BlankNode::new_unchecked("b"), ex("g"));
        let converted = oxrdf::Quad::try_from(outer.clone())?;
        assert!(matches!(converted.subject, oxrdf::Subject::Triple(_)));
        assert_eq!(Quad::from(converted), outer);
        Ok(())
    }

    #[test]
    fn language_tags_survive_the_conversion() -> Result<(), TermError> {
        let literal = Literal::new_language_tagged_literal("chat", "fr")?;
        let converted = oxrdf::Literal::try_from(literal.clone())?;
        assert_eq!(converted.language(), Some("fr"));
        assert_eq!(Literal::from(converted), literal);
        Ok(())
    }

    #[test]
    fn unrepresentable_terms_are_rejected() -> Result<(), TermError> {
        let directional =
            Literal::new_directional_language_tagged_literal("a", "ar", BaseDirection::Rtl)?;
        assert!(oxrdf::Literal::try_from(directional).is_err());
        assert!(oxrdf::Term::try_from(Term::DefaultGraph).is_err());
        assert!(oxrdf::Term::try_from(Term::from(Variable::new_unchecked("x"))).is_err());

        let named_inner = Quad::new(ex("s"), ex("p"), ex("o"), ex("g"));
        let outer = Quad::in_default_graph(named_inner, ex("p"), ex("o"));
        assert!(matches!(
            oxrdf::Quad::try_from(outer),
            Err(TermError::UnsupportedConversion(_))
        ));
        Ok(())
    }
}
