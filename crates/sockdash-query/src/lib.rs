//! # sockdash-query
//!
//! A small keyed cache for periodically polled data.
//!
//! - **Keys with parameters**: [`QueryKey`] includes its parameters, so two
//!   parameterizations of one endpoint never share an entry.
//! - **Coalescing**: concurrent fetches of one key share a single request.
//! - **Retry**: a failed fetch is retried `retry` times (one by default).
//! - **Polling**: [`Query::poll`] refetches on an interval until its
//!   [`PollHandle`] is dropped.
//! - **Stale data**: failed refetches keep the last good value; views read
//!   [`QueryState`] and decide how to show loading, error and data.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use sockdash_query::{Query, QueryClient, QueryKey, QueryOptions};
//!
//! # async fn example() {
//! let cache = QueryClient::new();
//! let uptime = Query::new(
//!     &cache,
//!     QueryKey::new("uptime"),
//!     QueryOptions::poll_every(Duration::from_secs(5)),
//!     || async { Ok::<u64, std::io::Error>(42) },
//! );
//!
//! let _handle = uptime.poll();
//! if let Some(seconds) = uptime.state().data() {
//!     println!("up {seconds}s");
//! }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod key;
pub mod options;
pub mod query;
pub mod state;

pub use client::{Fetcher, QueryClient, QueryEvent};
pub use error::{BoxError, QueryError, QueryResult};
pub use key::QueryKey;
pub use options::QueryOptions;
pub use query::{PollHandle, Query};
pub use state::{QueryState, QueryStatus};
