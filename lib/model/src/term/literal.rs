use crate::term::format::write_quoted_string;
use crate::vocab::{rdf, xsd};
use crate::{NamedNode, Term, TermError};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The [base direction](https://www.w3.org/TR/rdf12-concepts/#dfn-base-direction) of a
/// language-tagged string.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub enum BaseDirection {
    /// Left-to-right.
    Ltr,
    /// Right-to-left.
    Rtl,
}

impl BaseDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            BaseDirection::Ltr => "ltr",
            BaseDirection::Rtl => "rtl",
        }
    }

    /// Parses a direction where the empty string stands for "no direction".
    pub fn parse_optional(value: &str) -> Result<Option<Self>, TermError> {
        if value.is_empty() {
            Ok(None)
        } else {
            value.parse().map(Some)
        }
    }
}

impl FromStr for BaseDirection {
    type Err = TermError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ltr" => Ok(BaseDirection::Ltr),
            "rtl" => Ok(BaseDirection::Rtl),
            _ => Err(TermError::InvalidDirection(s.to_owned())),
        }
    }
}

impl Display for BaseDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An RDF [literal](https://www.w3.org/TR/rdf11-concepts/#dfn-literal).
///
/// Every literal carries a datatype. Simple literals have the datatype `xsd:string`,
/// language-tagged strings `rdf:langString` and directional language-tagged strings
/// `rdf:dirLangString`. The language tag is stored in lowercase and is empty for literals that
/// are not language-tagged.
///
/// The default string formatter returns an N-Triples compatible representation:
/// ```
/// use rdf_interop_model::{Literal, NamedNode};
///
/// assert_eq!(
///     "\"foo\\nbar\"",
///     Literal::new_simple_literal("foo\nbar").to_string()
/// );
///
/// assert_eq!(
///     r#""1999-01-01"^^<http://www.w3.org/2001/XMLSchema#date>"#,
///     Literal::new_typed_literal(
///         "1999-01-01",
///         NamedNode::new("http://www.w3.org/2001/XMLSchema#date")?
///     ).to_string()
/// );
///
/// assert_eq!(
///     r#""foo"@en"#,
///     Literal::new_language_tagged_literal("foo", "EN")?.to_string()
/// );
/// # Result::<_, rdf_interop_model::TermError>::Ok(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Literal {
    value: String,
    language: String,
    direction: Option<BaseDirection>,
    datatype: NamedNode,
}

impl Literal {
    /// Builds an RDF [simple literal](https://www.w3.org/TR/rdf11-concepts/#dfn-simple-literal).
    #[inline]
    pub fn new_simple_literal(value: impl Into<String>) -> Self {
        Self::new_typed_literal(value, NamedNode::new_unchecked(xsd::STRING))
    }

    /// Builds an RDF [literal](https://www.w3.org/TR/rdf11-concepts/#dfn-literal) with a
    /// [datatype](https://www.w3.org/TR/rdf11-concepts/#dfn-datatype-iri).
    #[inline]
    pub fn new_typed_literal(value: impl Into<String>, datatype: impl Into<NamedNode>) -> Self {
        Self {
            value: value.into(),
            language: String::new(),
            direction: None,
            datatype: datatype.into(),
        }
    }

    /// Builds an RDF [language-tagged string](https://www.w3.org/TR/rdf11-concepts/#dfn-language-tagged-string).
    ///
    /// The language tag is validated and normalized to lowercase.
    pub fn new_language_tagged_literal(
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, TermError> {
        let language = normalize_language_tag(language.into())?;
        Ok(Self::new_language_tagged_literal_unchecked(value, language))
    }

    /// Builds an RDF [language-tagged string](https://www.w3.org/TR/rdf11-concepts/#dfn-language-tagged-string).
    ///
    /// It is the caller's responsibility to ensure that `language` is a valid, lowercase
    /// [BCP47](https://tools.ietf.org/html/bcp47) language tag.
    #[inline]
    pub fn new_language_tagged_literal_unchecked(
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            language: language.into(),
            direction: None,
            datatype: NamedNode::new_unchecked(rdf::LANG_STRING),
        }
    }

    /// Builds a language-tagged string with a [base direction](https://www.w3.org/TR/rdf12-concepts/#dfn-base-direction).
    pub fn new_directional_language_tagged_literal(
        value: impl Into<String>,
        language: impl Into<String>,
        direction: BaseDirection,
    ) -> Result<Self, TermError> {
        let language = language.into();
        if language.is_empty() {
            return Err(TermError::DirectionWithoutLanguage);
        }
        let language = normalize_language_tag(language)?;
        Ok(Self {
            value: value.into(),
            language,
            direction: Some(direction),
            datatype: NamedNode::new_unchecked(rdf::DIR_LANG_STRING),
        })
    }

    /// The literal [lexical form](https://www.w3.org/TR/rdf11-concepts/#dfn-lexical-form).
    #[inline]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// The lowercase [language tag](https://www.w3.org/TR/rdf11-concepts/#dfn-language-tag), or
    /// an empty string if the literal is not language-tagged.
    #[inline]
    pub fn language(&self) -> &str {
        self.language.as_str()
    }

    #[inline]
    pub fn direction(&self) -> Option<BaseDirection> {
        self.direction
    }

    /// The literal [datatype](https://www.w3.org/TR/rdf11-concepts/#dfn-datatype-iri).
    #[inline]
    pub fn datatype(&self) -> &NamedNode {
        &self.datatype
    }

    #[inline]
    pub fn is_language_tagged(&self) -> bool {
        !self.language.is_empty()
    }

    /// Checks if this literal is a [simple literal](https://www.w3.org/TR/rdf11-concepts/#dfn-simple-literal).
    #[inline]
    pub fn is_simple(&self) -> bool {
        self.datatype == xsd::STRING
    }

    pub fn destruct(self) -> (String, String, Option<BaseDirection>, NamedNode) {
        (self.value, self.language, self.direction, self.datatype)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_quoted_string(f, &self.value)?;
        if self.is_language_tagged() {
            write!(f, "@{}", self.language)?;
            if let Some(direction) = self.direction {
                write!(f, "--{direction}")?;
            }
            Ok(())
        } else if self.is_simple() {
            Ok(())
        } else {
            write!(f, "^^{}", self.datatype)
        }
    }
}

impl PartialEq<Term> for Literal {
    fn eq(&self, other: &Term) -> bool {
        matches!(other, Term::Literal(other) if self == other)
    }
}

impl From<&str> for Literal {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new_simple_literal(value)
    }
}

impl From<String> for Literal {
    #[inline]
    fn from(value: String) -> Self {
        Self::new_simple_literal(value)
    }
}

impl From<bool> for Literal {
    #[inline]
    fn from(value: bool) -> Self {
        Self::new_typed_literal(value.to_string(), NamedNode::new_unchecked(xsd::BOOLEAN))
    }
}

impl From<i64> for Literal {
    #[inline]
    fn from(value: i64) -> Self {
        Self::new_typed_literal(value.to_string(), NamedNode::new_unchecked(xsd::INTEGER))
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        let lexical = if value.is_nan() {
            "NaN".to_owned()
        } else if value.is_infinite() {
            let lexical = if value.is_sign_positive() { "INF" } else { "-INF" };
            lexical.to_owned()
        } else {
            value.to_string()
        };
        Self::new_typed_literal(lexical, NamedNode::new_unchecked(xsd::DOUBLE))
    }
}

/// Validates a [BCP47](https://tools.ietf.org/html/bcp47) language tag syntactically and turns it
/// into lowercase.
fn normalize_language_tag(language: String) -> Result<String, TermError> {
    let mut subtags = language.split('-');
    let primary_is_valid = subtags
        .next()
        .is_some_and(|s| (1..=8).contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphabetic()));
    let rest_is_valid = subtags
        .all(|s| (1..=8).contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphanumeric()));
    if primary_is_valid && rest_is_valid {
        Ok(language.to_ascii_lowercase())
    } else {
        Err(TermError::InvalidLanguageTag(language))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datatype_defaults_follow_the_literal_kind() -> Result<(), TermError> {
        assert_eq!(Literal::new_simple_literal("a").datatype(), &xsd::STRING);
        assert_eq!(
            Literal::new_language_tagged_literal("a", "en")?.datatype(),
            &rdf::LANG_STRING
        );
        assert_eq!(
            Literal::new_directional_language_tagged_literal("a", "ar", BaseDirection::Rtl)?
                .datatype(),
            &rdf::DIR_LANG_STRING
        );
        Ok(())
    }

    #[test]
    fn language_tags_are_normalized() -> Result<(), TermError> {
        let literal = Literal::new_language_tagged_literal("colour", "en-GB")?;
        assert_eq!(literal.language(), "en-gb");
        assert!(Literal::new_language_tagged_literal("a", "not a tag").is_err());
        assert!(Literal::new_language_tagged_literal("a", "").is_err());
        Ok(())
    }

    #[test]
    fn equality_covers_direction() -> Result<(), TermError> {
        let ltr = Literal::new_directional_language_tagged_literal("a", "en", BaseDirection::Ltr)?;
        let rtl = Literal::new_directional_language_tagged_literal("a", "en", BaseDirection::Rtl)?;
        assert_ne!(ltr, rtl);
        assert_eq!(ltr.to_string(), r#""a"@en--ltr"#);
        Ok(())
    }

    #[test]
    fn direction_requires_language() {
        assert!(matches!(
            Literal::new_directional_language_tagged_literal("a", "", BaseDirection::Ltr),
            Err(TermError::DirectionWithoutLanguage)
        ));
    }

    #[test]
    fn parses_optional_direction() -> Result<(), TermError> {
        assert_eq!(BaseDirection::parse_optional("")?, None);
        assert_eq!(BaseDirection::parse_optional("rtl")?, Some(BaseDirection::Rtl));
        assert!(BaseDirection::parse_optional("up").is_err());
        Ok(())
    }
}
