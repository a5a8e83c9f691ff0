use tootline_text::{
    MAX_STATUS_LENGTH, URL_RESERVED_LENGTH, extract_urls, mastodon_length,
    truncate_preserving_urls,
};

#[test]
fn test_plain_text_counts_chars() {
    assert_eq!(mastodon_length(""), 0);
    assert_eq!(mastodon_length("hello world"), 11);
    // Unicode scalar values count one each, including emoji.
    assert_eq!(mastodon_length("héllo"), 5);
    assert_eq!(mastodon_length("🦀🦀🦀"), 3);
}

#[test]
fn test_every_url_counts_reserved_length() {
    let short = "go https://a.io now";
    let long = "go https://example.com/a/very/long/path?with=query&and=more now";
    // "go " (3) + 23 + " now" (4)
    assert_eq!(mastodon_length(short), 3 + URL_RESERVED_LENGTH + 4);
    assert_eq!(mastodon_length(long), 3 + URL_RESERVED_LENGTH + 4);
}

#[test]
fn test_multiple_urls() {
    let text = "a https://one.example b http://two.example c";
    // "a " + 23 + " b " + 23 + " c"
    assert_eq!(mastodon_length(text), 2 + 23 + 3 + 23 + 2);
    let spans = extract_urls(text);
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].url(), "https://one.example");
    assert_eq!(spans[1].url(), "http://two.example");
    assert!(spans[0].end() <= spans[1].start());
}

#[test]
fn test_extract_reports_char_offsets() {
    let spans = extract_urls("Check https://example.com out");
    assert_eq!(spans.len(), 1);
    // "Check " is 6 chars and the URL is 19, so the exclusive end is 25.
    assert_eq!(*spans[0].start(), 6);
    assert_eq!(*spans[0].end(), 25);
    assert_eq!(spans[0].len(), 19);
    assert_eq!(spans[0].url().chars().count(), spans[0].len());
}

#[test]
fn test_trailing_punctuation_excluded() {
    let spans = extract_urls("Read https://example.com/post.");
    assert_eq!(spans[0].url(), "https://example.com/post");

    let spans = extract_urls("Really? https://example.com/post?!");
    assert_eq!(spans[0].url(), "https://example.com/post");
}

#[test]
fn test_bare_scheme_is_not_a_url() {
    assert!(extract_urls("https:// is how secure links start").is_empty());
    assert!(extract_urls("http://").is_empty());
    assert_eq!(mastodon_length("https:// "), 9);
}

#[test]
fn test_url_at_boundaries() {
    let spans = extract_urls("https://start.example and more");
    assert_eq!(*spans[0].start(), 0);

    let text = "ends with https://end.example";
    let spans = extract_urls(text);
    assert_eq!(*spans[0].end(), text.chars().count());
}

#[test]
fn test_truncate_within_limit_is_identity() {
    let text = "short status with https://example.com/some/long/url attached";
    assert_eq!(truncate_preserving_urls(text, MAX_STATUS_LENGTH), text);
    assert_eq!(truncate_preserving_urls("", 10), "");
}

#[test]
fn test_truncate_plain_text() {
    assert_eq!(truncate_preserving_urls("abcdefgh", 3), "abc");
    assert_eq!(truncate_preserving_urls("🦀🦀🦀🦀", 2), "🦀🦀");
}

#[test]
fn test_truncate_never_cuts_a_url() {
    let text = "see https://example.com/long/path and more words here";
    // "see " is 4; the URL would bring the total to 27 > 20, so it is
    // dropped whole.
    assert_eq!(truncate_preserving_urls(text, 20), "see ");

    // With room for the URL it survives intact.
    let kept = truncate_preserving_urls(text, 27);
    assert_eq!(kept, "see https://example.com/long/path");
    assert_eq!(mastodon_length(&kept), 27);
}

#[test]
fn test_truncated_text_fits_limit() {
    let mut text = String::new();
    for i in 0..40 {
        text.push_str(&format!("word{i} https://example.com/{i} "));
    }
    for limit in [10, 50, 123, 400, 500] {
        let truncated = truncate_preserving_urls(&text, limit);
        assert!(
            mastodon_length(&truncated) <= limit,
            "limit {limit} exceeded: {}",
            mastodon_length(&truncated)
        );
        // Every URL in the output is one of the originals, uncut.
        for span in extract_urls(&truncated) {
            assert!(span.url().starts_with("https://example.com/"));
            assert!(text.contains(&format!("{} ", span.url())));
        }
    }
}

#[test]
fn test_truncation_is_idempotent() {
    let text = "a long post https://example.com/one with https://example.com/two urls and padding text";
    let once = truncate_preserving_urls(text, 40);
    let twice = truncate_preserving_urls(&once, 40);
    assert_eq!(once, twice);
}
