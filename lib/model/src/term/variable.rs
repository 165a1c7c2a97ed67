use crate::{Term, TermError};
use std::borrow::Borrow;
use std::fmt::{Display, Formatter};

/// A [SPARQL query](https://www.w3.org/TR/sparql11-query/) variable.
///
/// The name does not contain the leading `?` or `$`.
///
/// ```
/// use rdf_interop_model::Variable;
///
/// assert_eq!("?foo", Variable::new("foo")?.to_string());
/// # Result::<_, rdf_interop_model::TermError>::Ok(())
/// ```
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct Variable {
    name: String,
}

impl Variable {
    /// Creates a variable and validates its name.
    pub fn new(name: impl Into<String>) -> Result<Self, TermError> {
        let name = name.into();
        if !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            Ok(Self::new_unchecked(name))
        } else {
            Err(TermError::InvalidVariableName(name))
        }
    }

    #[inline]
    pub fn new_unchecked(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.name.as_str()
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.name
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "?{}", self.name)
    }
}

/// Allows looking up variables by name in hash maps.
impl Borrow<str> for Variable {
    fn borrow(&self) -> &str {
        &self.name
    }
}

impl PartialEq<Term> for Variable {
    fn eq(&self, other: &Term) -> bool {
        matches!(other, Term::Variable(other) if self == other)
    }
}
