use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::time::SystemTime;

/// The language of a query string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryFormat {
    /// The query language, for example `sparql`.
    pub language: String,
    /// The version of the language, for example `1.1`.
    pub version: String,
    /// Extensions of the language. Their representation is up to the engine.
    pub extensions: Vec<String>,
}

impl QueryFormat {
    pub fn new(language: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            version: version.into(),
            extensions: Vec::new(),
        }
    }

    /// SPARQL 1.1, the format assumed when a context does not name one.
    pub fn sparql_1_1() -> Self {
        Self::new("sparql", "1.1")
    }

    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extensions.push(extension.into());
        self
    }
}

impl Default for QueryFormat {
    fn default() -> Self {
        Self::sparql_1_1()
    }
}

impl Display for QueryFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.language, self.version)?;
        if !self.extensions.is_empty() {
            write!(f, " ({})", self.extensions.join(", "))?;
        }
        Ok(())
    }
}

/// Additional information passed to a query engine together with a query.
///
/// `query_format` and `base_iri` only apply to queries given as strings.
#[derive(Clone, Debug)]
pub struct QueryContext<S> {
    sources: Vec<S>,
    /// The time that operations such as `NOW()` use.
    pub query_timestamp: Option<SystemTime>,
    pub query_format: Option<QueryFormat>,
    /// The base IRI for resolving relative IRIs in a query string.
    pub base_iri: Option<String>,
    /// Engine-specific options.
    pub options: BTreeMap<String, String>,
}

impl<S> QueryContext<S> {
    /// Creates a context without any source.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            query_timestamp: None,
            query_format: None,
            base_iri: None,
            options: BTreeMap::new(),
        }
    }

    /// Creates a context with `first` and `rest` as sources, so that the list of sources is never
    /// empty.
    pub fn with_sources(first: S, rest: impl IntoIterator<Item = S>) -> Self {
        let mut context = Self::new();
        context.sources.push(first);
        context.sources.extend(rest);
        context
    }

    #[must_use]
    pub fn with_source(mut self, source: S) -> Self {
        self.sources.push(source);
        self
    }

    #[must_use]
    pub fn with_query_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.query_timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub fn with_query_format(mut self, format: QueryFormat) -> Self {
        self.query_format = Some(format);
        self
    }

    #[must_use]
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Self {
        self.base_iri = Some(base_iri.into());
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// The sources the query must be evaluated over. May be empty, in which case the engine
    /// decides which sources to use or rejects the query.
    pub fn sources(&self) -> &[S] {
        &self.sources
    }

    /// The query format, falling back to [QueryFormat::sparql_1_1].
    pub fn query_format_or_default(&self) -> QueryFormat {
        self.query_format.clone().unwrap_or_default()
    }
}

impl<S> Default for QueryContext<S> {
    fn default() -> Self {
        Self::new()
    }
}
