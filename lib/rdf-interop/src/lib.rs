#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod model {
    pub use rdf_interop_model::*;
}

pub mod stream {
    pub use rdf_interop_stream::*;
}

pub mod dataset {
    pub use rdf_interop_dataset::*;
}

pub mod query {
    pub use rdf_interop_query::*;
}
