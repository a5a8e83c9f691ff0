//! Mastodon status length counting and URL-preserving truncation.
//!
//! Mastodon enforces status limits on an "effective" character count in which
//! every `http://` or `https://` URL counts as exactly 23 characters, no
//! matter how long it really is. This crate implements that counting rule and
//! a truncation routine that fits text to a budget without ever emitting a
//! partially-cut URL.
//!
//! All lengths and span offsets are counted in Unicode scalar values
//! (`char`s); there is no grapheme-cluster awareness.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod length;

pub use length::{
    MAX_STATUS_LENGTH, URL_RESERVED_LENGTH, UrlSpan, extract_urls, mastodon_length,
    truncate_preserving_urls,
};
