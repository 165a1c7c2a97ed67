use crate::{Term, TermError};
use oxiri::Iri;
use std::fmt::{Display, Formatter};

/// An RDF [IRI](https://www.w3.org/TR/rdf11-concepts/#dfn-iri).
///
/// The default string formatter returns an N-Triples compatible representation:
/// ```
/// use rdf_interop_model::NamedNode;
///
/// assert_eq!(
///     "<http://example.com/foo>",
///     NamedNode::new("http://example.com/foo")?.to_string()
/// );
/// # Result::<_, rdf_interop_model::TermError>::Ok(())
/// ```
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct NamedNode {
    iri: String,
}

impl NamedNode {
    /// Builds and validates an RDF [IRI](https://www.w3.org/TR/rdf11-concepts/#dfn-iri).
    pub fn new(iri: impl Into<String>) -> Result<Self, TermError> {
        let iri = iri.into();
        match Iri::parse(iri.as_str()).map(|_| ()) {
            Ok(()) => Ok(Self::new_unchecked(iri)),
            Err(error) => Err(TermError::InvalidIri { iri, error }),
        }
    }

    /// Builds an RDF [IRI](https://www.w3.org/TR/rdf11-concepts/#dfn-iri) from a string.
    ///
    /// It is the caller's responsibility to ensure that `iri` is a valid IRI.
    #[inline]
    pub fn new_unchecked(iri: impl Into<String>) -> Self {
        Self { iri: iri.into() }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.iri.as_str()
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.iri
    }
}

impl Display for NamedNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>", self.iri)
    }
}

impl PartialEq<str> for NamedNode {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for NamedNode {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<Term> for NamedNode {
    fn eq(&self, other: &Term) -> bool {
        matches!(other, Term::NamedNode(other) if self == other)
    }
}
