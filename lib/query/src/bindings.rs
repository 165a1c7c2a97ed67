use rdf_interop_model::{Term, Variable};
use rustc_hash::FxHashMap;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// Identifies a variable in [Bindings].
///
/// Implemented for [Variable] and for variable names. A name may carry the leading `?` or `$` of
/// the SPARQL syntax, which is ignored.
pub trait VariableKey {
    /// The name of the variable without a leading `?` or `$`.
    fn variable_name(&self) -> &str;
}

impl VariableKey for Variable {
    fn variable_name(&self) -> &str {
        self.as_str()
    }
}

impl VariableKey for str {
    fn variable_name(&self) -> &str {
        self.strip_prefix(&['?', '$'][..]).unwrap_or(self)
    }
}

impl VariableKey for String {
    fn variable_name(&self) -> &str {
        self.as_str().variable_name()
    }
}

impl<T: VariableKey + ?Sized> VariableKey for &T {
    fn variable_name(&self) -> &str {
        (**self).variable_name()
    }
}

/// One solution of a query: an immutable mapping from variables to terms.
///
/// Operations that "modify" bindings return a new instance and leave the receiver untouched.
/// Clones share their entries, so passing bindings around is cheap. Two instances are equal if
/// they bind the same variables to equal terms, regardless of the order of the entries.
///
/// ```
/// use rdf_interop_model::*;
/// use rdf_interop_query::Bindings;
///
/// let x = Variable::new("x")?;
/// let a = Term::from(NamedNode::new("http://example.com/a")?);
///
/// let empty = Bindings::new();
/// let bound = empty.set(x.clone(), a.clone());
/// assert!(empty.is_empty());
/// assert_eq!(bound.get(&x), Some(&a));
/// assert_eq!(bound.get("?x"), Some(&a));
/// # Result::<_, TermError>::Ok(())
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    entries: Arc<FxHashMap<Variable, Term>>,
}

impl Bindings {
    /// Creates bindings without any entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of bound variables.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the term bound to `key`.
    pub fn get<K: VariableKey + ?Sized>(&self, key: &K) -> Option<&Term> {
        self.entries.get(key.variable_name())
    }

    pub fn has<K: VariableKey + ?Sized>(&self, key: &K) -> bool {
        self.entries.contains_key(key.variable_name())
    }

    /// Iterates over the bound variables in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.entries.keys()
    }

    /// Iterates over the bound terms in arbitrary order.
    pub fn values(&self) -> impl Iterator<Item = &Term> + '_ {
        self.entries.values()
    }

    /// Iterates over the entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Term)> + '_ {
        self.entries.iter()
    }

    /// Returns new bindings in which `variable` is bound to `term`, replacing an existing entry.
    #[must_use]
    pub fn set(&self, variable: Variable, term: Term) -> Bindings {
        let mut entries = Arc::clone(&self.entries);
        Arc::make_mut(&mut entries).insert(variable, term);
        Self { entries }
    }

    /// Returns new bindings without an entry for `key`.
    #[must_use]
    pub fn delete<K: VariableKey + ?Sized>(&self, key: &K) -> Bindings {
        if !self.has(key) {
            return self.clone();
        }
        let mut entries = Arc::clone(&self.entries);
        Arc::make_mut(&mut entries).remove(key.variable_name());
        Self { entries }
    }

    /// Returns new bindings with the entries for which `predicate` returns true.
    #[must_use]
    pub fn filter(&self, mut predicate: impl FnMut(&Term, &Variable) -> bool) -> Bindings {
        self.iter()
            .filter(|(variable, term)| predicate(term, variable))
            .map(|(variable, term)| (variable.clone(), term.clone()))
            .collect()
    }

    /// Returns new bindings in which every term is replaced by the result of `mapper`.
    #[must_use]
    pub fn map(&self, mut mapper: impl FnMut(&Term, &Variable) -> Term) -> Bindings {
        self.iter()
            .map(|(variable, term)| (variable.clone(), mapper(term, variable)))
            .collect()
    }

    /// Returns whether both bindings bind their shared variables to equal terms.
    pub fn is_compatible(&self, other: &Bindings) -> bool {
        let (smaller, larger) = self.by_size(other);
        smaller
            .iter()
            .all(|(variable, term)| larger.get(variable).map_or(true, |other| other == term))
    }

    /// Combines the entries of both bindings.
    ///
    /// Returns [None] if a variable is bound to different terms on both sides. Such a conflict is
    /// a regular outcome of joining solutions, not an error.
    ///
    /// ```
    /// use rdf_interop_model::*;
    /// use rdf_interop_query::Bindings;
    ///
    /// let x = Variable::new("x")?;
    /// let y = Variable::new("y")?;
    /// let a = Term::from(NamedNode::new("http://example.com/a")?);
    /// let b = Term::from(NamedNode::new("http://example.com/b")?);
    ///
    /// let left = Bindings::new().set(x.clone(), a.clone());
    /// let right = left.set(y, Term::from(Literal::from("v")));
    /// assert_eq!(left.merge(&right), Some(right.clone()));
    /// assert_eq!(left.merge(&Bindings::new().set(x, b)), None);
    /// # Result::<_, TermError>::Ok(())
    /// ```
    pub fn merge(&self, other: &Bindings) -> Option<Bindings> {
        if !self.is_compatible(other) {
            return None;
        }
        Some(self.merge_with(other, |left, _, _| left.clone()))
    }

    /// Combines the entries of both bindings, calling `merger` with the left term, the right
    /// term and the variable to resolve each conflict.
    #[must_use]
    pub fn merge_with(
        &self,
        other: &Bindings,
        mut merger: impl FnMut(&Term, &Term, &Variable) -> Term,
    ) -> Bindings {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut entries = Arc::clone(&self.entries);
        let target = Arc::make_mut(&mut entries);
        for (variable, right) in other.iter() {
            match self.entries.get(variable) {
                Some(left) if left != right => {
                    let merged = merger(left, right, variable);
                    target.insert(variable.clone(), merged);
                }
                Some(_) => {}
                None => {
                    target.insert(variable.clone(), right.clone());
                }
            }
        }
        Self { entries }
    }

    /// Returns whether `other` is present and equal to these bindings.
    pub fn equals(&self, other: Option<&Bindings>) -> bool {
        other.is_some_and(|other| self == other)
    }

    fn by_size<'a>(&'a self, other: &'a Bindings) -> (&'a Bindings, &'a Bindings) {
        if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        }
    }

    /// Returns the entries sorted by variable name.
    fn sorted(&self) -> Vec<(&Variable, &Term)> {
        let mut entries = self.iter().collect::<Vec<_>>();
        entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        entries
    }
}

impl FromIterator<(Variable, Term)> for Bindings {
    /// Collects the entries. A later entry for the same variable replaces an earlier one.
    fn from_iter<T: IntoIterator<Item = (Variable, Term)>>(iter: T) -> Self {
        Self {
            entries: Arc::new(iter.into_iter().collect()),
        }
    }
}

impl<'a> IntoIterator for &'a Bindings {
    type Item = (&'a Variable, &'a Term);
    type IntoIter = std::collections::hash_map::Iter<'a, Variable, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Debug for Bindings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.sorted()).finish()
    }
}

/// Writes the entries sorted by variable name, for example `{?x: <http://example.com/a>}`.
impl Display for Bindings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, (variable, term)) in self.sorted().into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{variable}: {term}")?;
        }
        f.write_str("}")
    }
}

/// Creates [Bindings].
pub trait BindingsFactory {
    /// Creates bindings from variable-term entries. A later entry for the same variable replaces
    /// an earlier one.
    fn bindings<I: IntoIterator<Item = (Variable, Term)>>(&self, entries: I) -> Bindings {
        entries.into_iter().collect()
    }

    /// Creates bindings equal to `bindings` that do not share their entries with it.
    fn from_bindings(&self, bindings: &Bindings) -> Bindings {
        self.bindings(
            bindings
                .iter()
                .map(|(variable, term)| (variable.clone(), term.clone())),
        )
    }
}

/// The default [BindingsFactory].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultBindingsFactory;

impl BindingsFactory for DefaultBindingsFactory {}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_interop_model::{Literal, NamedNode};

    fn var(name: &str) -> Variable {
        Variable::new_unchecked(name)
    }

    fn ex(name: &str) -> Term {
        NamedNode::new_unchecked(format!("http://example.com/{name}")).into()
    }

    #[test]
    fn merge_without_conflict_yields_union() {
        let b1 = DefaultBindingsFactory.bindings([(var("x"), ex("a"))]);
        let b2 = DefaultBindingsFactory.bindings([
            (var("x"), ex("a")),
            (var("y"), Literal::from("v").into()),
        ]);
        assert_eq!(b1.merge(&b2), Some(b2.clone()));
        assert_eq!(b2.merge(&b1), Some(b2));
    }

    #[test]
    fn merge_with_conflict_yields_none() {
        let b1 = DefaultBindingsFactory.bindings([(var("x"), ex("a"))]);
        let b2 = DefaultBindingsFactory.bindings([(var("x"), ex("b"))]);
        assert_eq!(b1.merge(&b2), None);
    }

    #[test]
    fn merge_with_resolves_conflicts() {
        let b1 = DefaultBindingsFactory.bindings([(var("x"), ex("a")), (var("y"), ex("c"))]);
        let b2 = DefaultBindingsFactory.bindings([(var("x"), ex("b"))]);
        let mut conflicts = Vec::new();
        let merged = b1.merge_with(&b2, |_, right, variable| {
            conflicts.push(variable.clone());
            right.clone()
        });
        assert_eq!(conflicts, [var("x")]);
        assert_eq!(merged.get("x"), Some(&ex("b")));
        assert_eq!(merged.get("y"), Some(&ex("c")));
        assert_eq!(b1.get("x"), Some(&ex("a")));
    }

    #[test]
    fn updates_leave_the_original_untouched() {
        let original = DefaultBindingsFactory.bindings([(var("x"), ex("a"))]);
        let with_y = original.set(var("y"), ex("b"));
        let without_x = with_y.delete("$x");
        assert_eq!(original.len(), 1);
        assert_eq!(with_y.len(), 2);
        assert_eq!(without_x.len(), 1);
        assert!(without_x.has(&var("y")));
        assert!(!without_x.has("x"));

        let mapped = with_y.map(|_, _| ex("z"));
        assert!(mapped.values().all(|term| *term == ex("z")));
        assert_eq!(with_y.get("y"), Some(&ex("b")));

        let filtered = with_y.filter(|_, variable| variable.as_str() == "x");
        assert_eq!(filtered.keys().collect::<Vec<_>>(), [&var("x")]);
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a = DefaultBindingsFactory.bindings([(var("x"), ex("a")), (var("y"), ex("b"))]);
        let b = DefaultBindingsFactory.bindings([(var("y"), ex("b")), (var("x"), ex("a"))]);
        assert_eq!(a, b);
        assert!(a.equals(Some(&b)));
        assert!(!a.equals(None));
        assert_ne!(a, b.delete("x"));
        assert_eq!(DefaultBindingsFactory.from_bindings(&a), a);
    }

    #[test]
    fn display_is_sorted() {
        let bindings = DefaultBindingsFactory.bindings([(var("y"), ex("b")), (var("x"), ex("a"))]);
        assert_eq!(
            bindings.to_string(),
            "{?x: <http://example.com/a>, ?y: <http://example.com/b>}"
        );
    }
}
