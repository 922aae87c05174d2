//! Wire codecs for patch documents.

pub mod json;
