use rdf_interop_model::BlankNode;
use rustc_hash::FxHashMap;

/// Issues identifiers `<prefix><counter>` to blank nodes, in order of first request.
#[derive(Clone, Debug)]
pub(super) struct IdentifierIssuer<'a> {
    prefix: &'static str,
    issued: FxHashMap<&'a BlankNode, String>,
    order: Vec<&'a BlankNode>,
}

impl<'a> IdentifierIssuer<'a> {
    pub(super) fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            issued: FxHashMap::default(),
            order: Vec::new(),
        }
    }

    /// Returns the identifier of `node`, issuing a new one if there is none yet.
    pub(super) fn issue(&mut self, node: &'a BlankNode) -> &str {
        let next = self.order.len();
        let identifier = self.issued.entry(node).or_insert_with(|| {
            self.order.push(node);
            format!("{}{next}", self.prefix)
        });
        identifier.as_str()
    }

    pub(super) fn get(&self, node: &BlankNode) -> Option<&str> {
        self.issued.get(node).map(String::as_str)
    }

    /// Returns the blank nodes in the order in which they received their identifier.
    pub(super) fn issued_order(&self) -> impl Iterator<Item = &'a BlankNode> + '_ {
        self.order.iter().copied()
    }

    pub(super) fn into_issued(self) -> impl Iterator<Item = (&'a BlankNode, String)> {
        self.issued.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_stable_and_sequential() {
        let a = BlankNode::new_unchecked("a");
        let b = BlankNode::new_unchecked("b");
        let mut issuer = IdentifierIssuer::new("c14n");
        assert_eq!(issuer.issue(&b), "c14n0");
        assert_eq!(issuer.issue(&a), "c14n1");
        assert_eq!(issuer.issue(&b), "c14n0");
        assert_eq!(issuer.get(&a), Some("c14n1"));
        assert_eq!(issuer.issued_order().collect::<Vec<_>>(), [&b, &a]);
    }
}
