//! HTTP message building blocks.
//!
//! - [`HttpHeaders`]: header names canonicalized on every access, each name
//!   mapping to an ordered list of values.
//! - [`MessageStream`]: a body stream over any [`Resource`], with the
//!   resource's capabilities cached when it is attached.
//!
//! Neither type is synchronised. Give every in-flight message its own
//! instances rather than sharing them between threads.

pub mod config;
pub mod error;
pub mod http;
pub mod resource;

pub use error::{ConfigError, MessageError};
pub use http::headers::{HttpHeaders, canonical_name};
pub use http::stream::{MessageStream, StreamCache};
pub use resource::{Resource, ResourceMeta, ResourceStat, WrapperKind};
