//! HTTP exchange described as plain data.
//!
//! # Design
//! The client builds `HttpRequest` values and parses `HttpResponse` values;
//! the actual network round-trip happens behind the [`crate::transport::Transport`]
//! seam. Keeping both sides as owned plain data makes every operation
//! independently testable without a live endpoint and keeps the I/O boundary
//! explicit.

/// HTTP method for a request.
///
/// The platform API is POST-only, but the transport seam stays general so a
/// caller can issue ad-hoc requests through the same machinery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// A pending request described as plain data.
///
/// Built by `Client::build_*` methods: full URL, the `applyId` authentication
/// header, and the JSON payload. Consumed by exactly one dispatch.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Produced by a [`crate::transport::Transport`] implementation, then handed
/// to `Client::parse_response` for envelope normalization.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
