use std::fmt::{Display, Formatter};

/// The family of quads a component accepts.
///
/// All families share the same role constraints. They differ in whether variables and nested
/// quads may appear.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TermProfile {
    /// Ground RDF 1.1 data: no variables and no nested quads.
    Plain,
    /// RDF-star data: nested quads may appear as subject or object, variables may not.
    Star,
    /// Query patterns: variables may appear in every position.
    #[default]
    Pattern,
}

impl TermProfile {
    /// Returns whether variables are allowed in this profile.
    pub fn allows_variables(self) -> bool {
        matches!(self, TermProfile::Pattern)
    }

    /// Returns whether nested quads are allowed in this profile.
    pub fn allows_nested_quads(self) -> bool {
        !matches!(self, TermProfile::Plain)
    }
}

impl Display for TermProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TermProfile::Plain => "plain",
            TermProfile::Star => "RDF-star",
            TermProfile::Pattern => "pattern",
        })
    }
}
