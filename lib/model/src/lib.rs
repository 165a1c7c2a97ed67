//! The RDF term and quad model shared by all layers of RDF Interop.
//!
//! Terms form a closed set of variants ([Term]). Quads constrain the variants per position through
//! the role types [Subject], [Predicate], [Object], and [GraphName], which makes role-violating
//! quads unrepresentable for statically typed callers. Dynamically assembled quads go through the
//! checked constructors ([Quad::try_new] and the [DataFactory]).
//!
//! ```
//! use rdf_interop_model::*;
//!
//! let inner = Quad::new(
//!     NamedNode::new("http://example.com/alice")?,
//!     NamedNode::new("http://example.com/knows")?,
//!     NamedNode::new("http://example.com/bob")?,
//!     GraphName::DefaultGraph,
//! );
//! let outer = Quad::new(
//!     inner.clone(),
//!     NamedNode::new("http://example.com/since")?,
//!     Literal::new_simple_literal("2020"),
//!     GraphName::DefaultGraph,
//! );
//! assert_eq!(outer.subject.term_type(), TermType::Quad);
//! assert!(outer.subject.as_ref() == Term::from(inner).as_ref());
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

mod error;
mod factory;
mod oxrdf_conversion;
mod pattern;
mod profile;
mod term;
pub mod vocab;

pub use error::*;
pub use factory::*;
pub use pattern::*;
pub use profile::*;
pub use term::*;
