//! In-memory model of an HTTP message: its headers and its body.
//!
//! [`HttpHeaders`](headers::HttpHeaders) and
//! [`MessageStream`](stream::MessageStream) do not know about each other. A
//! request or response type owns one of each and delegates to them.

pub mod headers;
pub mod stream;
