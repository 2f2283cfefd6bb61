//! Request construction
//!
//! Maps each marketplace operation to its endpoint, query parameters and
//! form-encoded RPC envelope. Nothing here touches the network.

mod builder;
pub mod envelope;
mod types;

pub use builder::{is_numeric_developer, search_request, RequestBuilder, DEFAULT_BASE_URL};
pub use types::{Operation, RequestDescriptor};
