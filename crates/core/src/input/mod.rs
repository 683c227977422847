//! Input acquisition: turning whatever a caller supplied into bytes.
//!
//! Requests can carry input as an uploaded file, a base64 field, or a URL
//! to download. This module applies the precedence order between those
//! channels and resolves the winner into an in-memory payload.

mod fetch;
mod resolve;

pub use fetch::{Fetcher, FetcherConfig};
pub use resolve::{InputResolver, InputSource, RawInput};
