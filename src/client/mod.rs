//! Client Module
//!
//! HTTP client and response decoding.

pub mod http;
pub mod response;

pub use http::{HttpClient, DEFAULT_TIMEOUT};
pub use response::{Completion, ResponseShape};
