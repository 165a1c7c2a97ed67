use crate::{Term, TermError};
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::LazyLock;

/// Identifiers generated by [BlankNode::default] share this prefix for the lifetime of the process.
static FRESH_PREFIX: LazyLock<String> =
    LazyLock::new(|| format!("b{:08x}", rand::random::<u32>()));
static FRESH_COUNTER: AtomicU64 = AtomicU64::new(0);

/// An RDF [blank node](https://www.w3.org/TR/rdf11-concepts/#dfn-blank-node).
///
/// The identifier is only meaningful within the dataset or document the blank node belongs to.
/// Two blank nodes are equal iff their identifiers are equal.
///
/// The default string formatter returns an N-Triples compatible representation:
/// ```
/// use rdf_interop_model::BlankNode;
///
/// assert_eq!("_:a122", BlankNode::new("a122")?.to_string());
/// # Result::<_, rdf_interop_model::TermError>::Ok(())
/// ```
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct BlankNode {
    id: String,
}

impl BlankNode {
    /// Creates a blank node from an identifier without any serialization specific prefix (i.e.,
    /// without `_:`).
    pub fn new(id: impl Into<String>) -> Result<Self, TermError> {
        let id = id.into();
        if is_valid_id(&id) {
            Ok(Self::new_unchecked(id))
        } else {
            Err(TermError::InvalidBlankNodeId(id))
        }
    }

    /// Creates a blank node from an identifier.
    ///
    /// It is the caller's responsibility to ensure that `id` is a valid blank node identifier.
    #[inline]
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.id.as_str()
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.id
    }
}

impl Default for BlankNode {
    /// Builds a new blank node with an identifier that is unique within this process.
    fn default() -> Self {
        let counter = FRESH_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::new_unchecked(format!("{}x{counter}", FRESH_PREFIX.as_str()))
    }
}

impl Display for BlankNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "_:{}", self.id)
    }
}

impl PartialEq<Term> for BlankNode {
    fn eq(&self, other: &Term) -> bool {
        matches!(other, Term::BlankNode(other) if self == other)
    }
}

/// A relaxed version of the N-Triples `BLANK_NODE_LABEL` production.
fn is_valid_id(id: &str) -> bool {
    let mut chars = id.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphanumeric() || first == '_') || id.ends_with('.') {
        return false;
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_blank_nodes_are_distinct() {
        let first = BlankNode::default();
        let second = BlankNode::default();
        assert_ne!(first, second);
        assert!(is_valid_id(first.as_str()));
    }

    #[test]
    fn rejects_invalid_ids() {
        assert!(BlankNode::new("").is_err());
        assert!(BlankNode::new("a b").is_err());
        assert!(BlankNode::new("a.").is_err());
        assert!(BlankNode::new("-a").is_err());
        assert!(BlankNode::new("b0.c_1-2").is_ok());
    }
}
