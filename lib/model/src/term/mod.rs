mod blank_node;
mod format;
mod literal;
mod named_node;
mod quad;
mod role;
#[allow(clippy::module_inception, reason = "The module contains the Term enum.")]
mod term;
mod variable;

pub use blank_node::BlankNode;
pub use literal::{BaseDirection, Literal};
pub use named_node::NamedNode;
pub use quad::Quad;
pub use role::{GraphName, Object, Predicate, Subject};
pub use term::{QuadTermName, Term, TermRef, TermType};
pub use variable::Variable;
