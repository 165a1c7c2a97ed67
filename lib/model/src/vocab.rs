//! IRIs of the vocabularies the model refers to.

pub mod rdf {
    //! [RDF](https://www.w3.org/TR/rdf11-concepts/) vocabulary.

    pub const NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// The datatype of language-tagged string literals.
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
    /// The datatype of language-tagged string literals with a base direction.
    pub const DIR_LANG_STRING: &str =
        "http://www.w3.org/1999/02/22-rdf-syntax-ns#dirLangString";
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const SUBJECT: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#subject";
    pub const PREDICATE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#predicate";
    pub const OBJECT: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#object";
}

pub mod xsd {
    //! [XML Schema](https://www.w3.org/TR/xmlschema11-2/) datatypes.

    pub const NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
    pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
    pub const SHORT: &str = "http://www.w3.org/2001/XMLSchema#short";
    pub const BYTE: &str = "http://www.w3.org/2001/XMLSchema#byte";
    pub const NON_NEGATIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";
    pub const POSITIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#positiveInteger";
    pub const NON_POSITIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#nonPositiveInteger";
    pub const NEGATIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#negativeInteger";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
    pub const ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";

    /// Returns whether `datatype` is one of the numeric datatypes that the expression evaluation
    /// compares by value.
    pub fn is_numeric(datatype: &str) -> bool {
        matches!(
            datatype,
            INTEGER
                | DECIMAL
                | DOUBLE
                | FLOAT
                | INT
                | LONG
                | SHORT
                | BYTE
                | NON_NEGATIVE_INTEGER
                | POSITIVE_INTEGER
                | NON_POSITIVE_INTEGER
                | NEGATIVE_INTEGER
        )
    }
}
