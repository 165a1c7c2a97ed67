use crate::{QuadTermName, TermProfile, TermType};
use oxiri::IriParseError;

/// An error raised while constructing or converting terms and quads.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TermError {
    /// The IRI of a named node is not a valid absolute IRI.
    #[error("Invalid IRI '{iri}': {error}")]
    InvalidIri {
        /// The IRI itself.
        iri: String,
        /// The parsing error.
        #[source]
        error: IriParseError,
    },
    #[error("Invalid blank node identifier '{0}'")]
    InvalidBlankNodeId(String),
    #[error("Invalid language tag '{0}'")]
    InvalidLanguageTag(String),
    #[error("Invalid variable name '{0}'")]
    InvalidVariableName(String),
    #[error("Invalid base direction '{0}', expected 'ltr' or 'rtl'")]
    InvalidDirection(String),
    #[error("A base direction requires a language tag")]
    DirectionWithoutLanguage,
    /// A term was placed in a quad position that does not accept its variant, for example a
    /// literal as predicate.
    #[error("A {term_type} is not allowed as the {position} of a quad")]
    RoleViolation {
        position: QuadTermName,
        term_type: TermType,
    },
    /// A quad uses a term variant that the requested [TermProfile] does not allow.
    #[error("A {term_type} is not allowed by the {profile} profile")]
    ProfileViolation {
        profile: TermProfile,
        term_type: TermType,
    },
    #[error("{0} cannot be represented in the oxrdf model")]
    UnsupportedConversion(String),
}
