//! HTTP protocol layer module
//!
//! Protocol-level helpers shared by the request handlers: MIME inference,
//! conditional-request caching, and response builders.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_403_response, build_404_response, build_405_response,
};
