//! Data models for the school portal.
//!
//! These models serialize to the same camelCase JSON the site has always
//! stored, so existing local and remote copies stay readable.

mod defaults;
mod document;
mod records;

pub use defaults::*;
pub use document::*;
pub use records::*;
