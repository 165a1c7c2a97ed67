//! Streams of quads and bindings, together with the contracts of the components that produce
//! and consume them.
//!
//! A [ResultStream] replaces event-based streams with a native asynchronous sequence. Producers
//! either wrap an existing [futures::Stream] or push into a channel created with
//! [ResultStream::channel]. Consumers poll it with [futures::StreamExt::next] or drain it with
//! [ResultStream::try_collect_to_vec].
//!
//! ```
//! use rdf_interop_stream::{ResultStream, StreamError};
//!
//! let (sender, stream) = ResultStream::channel(16);
//! let collected = tokio_test::block_on(async move {
//!     sender.send("a").await?;
//!     sender.send("b").await?;
//!     drop(sender);
//!     stream.try_collect_to_vec().await
//! })?;
//! assert_eq!(collected, ["a", "b"]);
//! # Result::<_, StreamError>::Ok(())
//! ```

mod error;
mod result_stream;
mod store;

pub use error::*;
pub use result_stream::*;
pub use store::*;
