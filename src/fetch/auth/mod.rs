//! Auth decorators for [`HttpClient`](super::HttpClient).

mod api_key;

pub use api_key::ApiKey;
