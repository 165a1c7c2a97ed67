use crate::{
    BaseDirection, BlankNode, GraphName, Literal, NamedNode, Quad, Term, TermError, TermProfile,
    TermType, Variable,
};

/// A language tag together with an optional base direction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DirectionalLanguage {
    pub language: String,
    pub direction: Option<BaseDirection>,
}

/// The optional second argument of [DataFactory::literal].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LanguageOrDatatype {
    /// Creates a language-tagged string.
    Language(String),
    /// Creates a typed literal.
    Datatype(NamedNode),
    /// Creates a language-tagged string with an optional base direction.
    Directional(DirectionalLanguage),
}

impl From<&str> for LanguageOrDatatype {
    fn from(language: &str) -> Self {
        LanguageOrDatatype::Language(language.to_owned())
    }
}

impl From<NamedNode> for LanguageOrDatatype {
    fn from(datatype: NamedNode) -> Self {
        LanguageOrDatatype::Datatype(datatype)
    }
}

impl From<DirectionalLanguage> for LanguageOrDatatype {
    fn from(language: DirectionalLanguage) -> Self {
        LanguageOrDatatype::Directional(language)
    }
}

/// A factory for instantiating terms and quads from unchecked input.
///
/// Every operation validates its input. `from_term` and `from_quad` create new instances that are
/// equal to, but independent of, the original. This allows moving terms between components
/// without sharing state.
pub trait DataFactory {
    /// Creates a named node from an IRI.
    fn named_node(&self, iri: &str) -> Result<NamedNode, TermError> {
        NamedNode::new(iri)
    }

    /// Creates a blank node. If `id` is [None], a fresh identifier is generated for each call.
    fn blank_node(&self, id: Option<&str>) -> Result<BlankNode, TermError> {
        match id {
            Some(id) => BlankNode::new(id),
            None => Ok(BlankNode::default()),
        }
    }

    /// Creates a literal.
    ///
    /// Without `language_or_datatype`, a simple literal is created.
    fn literal(
        &self,
        value: &str,
        language_or_datatype: Option<LanguageOrDatatype>,
    ) -> Result<Literal, TermError> {
        match language_or_datatype {
            None => Ok(Literal::new_simple_literal(value)),
            Some(LanguageOrDatatype::Language(language)) => {
                Literal::new_language_tagged_literal(value, language)
            }
            Some(LanguageOrDatatype::Datatype(datatype)) => {
                Ok(Literal::new_typed_literal(value, datatype))
            }
            Some(LanguageOrDatatype::Directional(DirectionalLanguage {
                language,
                direction: None,
            })) => Literal::new_language_tagged_literal(value, language),
            Some(LanguageOrDatatype::Directional(DirectionalLanguage {
                language,
                direction: Some(direction),
            })) => Literal::new_directional_language_tagged_literal(value, language, direction),
        }
    }

    /// Creates a variable.
    fn variable(&self, name: &str) -> Result<Variable, TermError>;

    /// Returns the default graph.
    fn default_graph(&self) -> GraphName {
        GraphName::DefaultGraph
    }

    /// Creates a quad from arbitrary terms, checking the role constraints.
    ///
    /// An absent `graph` stands for the default graph.
    fn quad(
        &self,
        subject: Term,
        predicate: Term,
        object: Term,
        graph: Option<Term>,
    ) -> Result<Quad, TermError>;

    /// Creates a new instance of `original` that is equal to it.
    #[allow(
        clippy::wrong_self_convention,
        reason = "Named after the factory operation, the factory is not converted."
    )]
    fn from_term(&self, original: &Term) -> Result<Term, TermError> {
        match original {
            Term::Variable(variable) => self.variable(variable.as_str()).map(Term::Variable),
            Term::Quad(quad) => self.from_quad(quad).map(Term::from),
            term => Ok(term.clone()),
        }
    }

    /// Creates a new instance of `original` that is equal to it.
    #[allow(
        clippy::wrong_self_convention,
        reason = "Named after the factory operation, the factory is not converted."
    )]
    fn from_quad(&self, original: &Quad) -> Result<Quad, TermError> {
        self.quad(
            original.subject.clone().into(),
            original.predicate.clone().into(),
            original.object.clone().into(),
            Some(original.graph.clone().into()),
        )
    }
}

/// The [DataFactory] of this crate.
///
/// The factory enforces a [TermProfile]. By default, it accepts all role-valid quads, including
/// variables and nested quads.
///
/// ```
/// use rdf_interop_model::*;
///
/// let factory = DefaultDataFactory::with_profile(TermProfile::Plain);
/// let s = Term::from(factory.named_node("http://example.com/s")?);
/// let p = Term::from(factory.named_node("http://example.com/p")?);
/// let o = Term::from(factory.literal("o", Some("en".into()))?);
/// let quad = factory.quad(s.clone(), p.clone(), o, None)?;
/// assert!(quad.graph.is_default_graph());
///
/// let nested = factory.quad(Term::from(quad), p.clone(), s, None);
/// assert!(matches!(nested, Err(TermError::ProfileViolation { .. })));
/// # Result::<_, rdf_interop_model::TermError>::Ok(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultDataFactory {
    profile: TermProfile,
}

impl DefaultDataFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: TermProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> TermProfile {
        self.profile
    }
}

impl DataFactory for DefaultDataFactory {
    fn variable(&self, name: &str) -> Result<Variable, TermError> {
        if !self.profile.allows_variables() {
            return Err(TermError::ProfileViolation {
                profile: self.profile,
                term_type: TermType::Variable,
            });
        }
        Variable::new(name)
    }

    fn quad(
        &self,
        subject: Term,
        predicate: Term,
        object: Term,
        graph: Option<Term>,
    ) -> Result<Quad, TermError> {
        let quad = Quad::try_new(subject, predicate, object, graph)?;
        quad.check_profile(self.profile)?;
        Ok(quad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{rdf, xsd};

    #[test]
    fn literal_arguments_select_the_kind() -> Result<(), TermError> {
        let factory = DefaultDataFactory::new();
        assert_eq!(factory.literal("a", None)?.datatype(), &xsd::STRING);
        assert_eq!(factory.literal("a", Some("EN".into()))?.language(), "en");
        let integer = NamedNode::new(xsd::INTEGER)?;
        assert_eq!(
            factory.literal("1", Some(integer.clone().into()))?.datatype(),
            &integer
        );
        let directional = factory.literal(
            "a",
            Some(
                DirectionalLanguage {
                    language: "ar".into(),
                    direction: Some(BaseDirection::Rtl),
                }
                .into(),
            ),
        )?;
        assert_eq!(directional.direction(), Some(BaseDirection::Rtl));
        assert_eq!(directional.datatype(), &rdf::DIR_LANG_STRING);
        Ok(())
    }

    #[test]
    fn fresh_blank_nodes_per_call() -> Result<(), TermError> {
        let factory = DefaultDataFactory::new();
        assert_ne!(factory.blank_node(None)?, factory.blank_node(None)?);
        assert_eq!(factory.blank_node(Some("a"))?, factory.blank_node(Some("a"))?);
        Ok(())
    }

    #[test]
    fn from_term_copies_nested_quads() -> Result<(), TermError> {
        let factory = DefaultDataFactory::new();
        let ex = Term::from(factory.named_node("http://example.com/a")?);
        let inner = factory.quad(ex.clone(), ex.clone(), ex.clone(), None)?;
        let outer = Term::from(factory.quad(inner.into(), ex.clone(), ex, None)?);
        let copy = factory.from_term(&outer)?;
        assert!(copy.equals(Some(&outer)));
        assert_eq!(factory.default_graph(), GraphName::DefaultGraph);
        Ok(())
    }

    #[test]
    fn plain_profile_rejects_variables() {
        let factory = DefaultDataFactory::with_profile(TermProfile::Plain);
        assert!(factory.variable("x").is_err());
        assert!(DefaultDataFactory::new().variable("x").is_ok());
    }
}
