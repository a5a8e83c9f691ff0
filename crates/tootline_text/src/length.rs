//! Effective length calculation and truncation.

use derive_getters::Getters;
use tracing::debug;

/// The default maximum character length for Mastodon status posts.
pub const MAX_STATUS_LENGTH: usize = 500;

/// Character count that Mastodon charges for every URL regardless of its
/// actual length.
///
/// Matches `StatusLengthValidator::URL_PLACEHOLDER_CHARS` in the Mastodon
/// server.
pub const URL_RESERVED_LENGTH: usize = 23;

/// Punctuation excluded from the tail of a matched URL.
const TRAILING_PUNCTUATION: [char; 4] = ['.', ',', '!', '?'];

/// A URL found while scanning a status text.
///
/// `start` and `end` are character offsets into the scanned text, with `end`
/// exclusive. Spans are produced in left-to-right order and never overlap.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct UrlSpan {
    /// The matched URL, trailing punctuation excluded.
    url: String,
    /// Character offset of the first character of the URL.
    start: usize,
    /// Character offset one past the last character of the URL.
    end: usize,
}

impl UrlSpan {
    /// Length of the matched URL in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when the span is empty (never produced by [`extract_urls`]).
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Scan `text` left-to-right for `http://` and `https://` URLs.
///
/// A URL token extends through a maximal run of non-whitespace characters;
/// trailing `.`, `,`, `!` and `?` are excluded from the match. The match is
/// purely lexical: punycode and internationalized hosts are treated exactly
/// like ASCII hosts, with no decoding.
///
/// # Examples
///
/// ```
/// use tootline_text::extract_urls;
///
/// let spans = extract_urls("Check https://example.com out");
/// assert_eq!(spans.len(), 1);
/// assert_eq!(spans[0].url(), "https://example.com");
/// assert_eq!(*spans[0].start(), 6);
/// assert_eq!(*spans[0].end(), 25);
/// ```
pub fn extract_urls(text: &str) -> Vec<UrlSpan> {
    let chars: Vec<char> = text.chars().collect();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let scheme_len = if starts_with_at(&chars, i, "https://") {
            8
        } else if starts_with_at(&chars, i, "http://") {
            7
        } else {
            i += 1;
            continue;
        };

        let start = i;
        let mut end = start + scheme_len;
        while end < chars.len() && !chars[end].is_whitespace() {
            end += 1;
        }
        while end > start + scheme_len && TRAILING_PUNCTUATION.contains(&chars[end - 1]) {
            end -= 1;
        }

        // A bare scheme with nothing after it is not a URL.
        if end == start + scheme_len {
            i = end;
            continue;
        }

        spans.push(UrlSpan {
            url: chars[start..end].iter().collect(),
            start,
            end,
        });
        i = end;
    }

    spans
}

/// Calculate the effective character length Mastodon uses for status limits.
///
/// Every URL counts as [`URL_RESERVED_LENGTH`] characters; everything else
/// counts one character per Unicode scalar value.
///
/// # Examples
///
/// ```
/// use tootline_text::mastodon_length;
///
/// assert_eq!(mastodon_length(""), 0);
/// assert_eq!(mastodon_length("hello"), 5);
/// // "Check " (6) + 23 + " out" (4)
/// assert_eq!(mastodon_length("Check https://example.com out"), 33);
/// ```
pub fn mastodon_length(text: &str) -> usize {
    let total = text.chars().count();
    extract_urls(text)
        .iter()
        .fold(total, |len, span| len - span.len() + URL_RESERVED_LENGTH)
}

/// Truncate `text` so its effective length fits within `limit`, without ever
/// cutting a URL in half.
///
/// Text already within the limit is returned unchanged. Otherwise the text is
/// walked left to right, plain characters accumulating 1 each and URLs a flat
/// [`URL_RESERVED_LENGTH`]; output stops at the last position where the
/// accumulated effective length stays within `limit`. A URL that would push
/// the total past the limit is dropped whole: the cut lands immediately
/// before its start, even when that leaves the result shorter than strictly
/// necessary.
///
/// # Examples
///
/// ```
/// use tootline_text::truncate_preserving_urls;
///
/// assert_eq!(truncate_preserving_urls("short", 500), "short");
/// assert_eq!(truncate_preserving_urls("abcdef", 3), "abc");
///
/// // The URL counts 23; it does not fit in 20, so it is dropped whole.
/// assert_eq!(truncate_preserving_urls("see https://example.com/long/path", 20), "see ");
/// ```
pub fn truncate_preserving_urls(text: &str, limit: usize) -> String {
    if mastodon_length(text) <= limit {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let spans = extract_urls(text);
    let mut spans = spans.iter().peekable();

    let mut effective = 0usize;
    let mut cut = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        if let Some(span) = spans.peek()
            && *span.start() == i
        {
            if effective + URL_RESERVED_LENGTH > limit {
                break;
            }
            effective += URL_RESERVED_LENGTH;
            i = *span.end();
            spans.next();
        } else {
            if effective + 1 > limit {
                break;
            }
            effective += 1;
            i += 1;
        }
        cut = i;
    }

    debug!(
        limit,
        effective,
        cut,
        total = chars.len(),
        "truncated status text"
    );
    chars[..cut].iter().collect()
}

fn starts_with_at(chars: &[char], at: usize, pattern: &str) -> bool {
    let mut i = at;
    for p in pattern.chars() {
        if chars.get(i) != Some(&p) {
            return false;
        }
        i += 1;
    }
    true
}
