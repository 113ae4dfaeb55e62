//! Tests for the shared utilities.

use quire_common::url::{Url, UrlError, resolve_url};
use quire_common::warning::{clear_warnings, has_warned, warn_once};

#[test]
fn test_absolute_url_ignores_base() {
    let base = Url::parse("https://example.com/docs/index.html").unwrap();
    let url = resolve_url("http://other.org/a.png", Some(&base)).unwrap();
    assert_eq!(url.as_str(), "http://other.org/a.png");
}

#[test]
fn test_relative_url_joins_base() {
    let base = Url::parse("https://example.com/docs/index.html").unwrap();
    let url = resolve_url("img/logo.png", Some(&base)).unwrap();
    assert_eq!(url.as_str(), "https://example.com/docs/img/logo.png");

    let url = resolve_url("/root.png", Some(&base)).unwrap();
    assert_eq!(url.as_str(), "https://example.com/root.png");
}

#[test]
fn test_relative_url_without_base() {
    assert_eq!(
        resolve_url("logo.png", None),
        Err(UrlError::RelativeWithoutBase("logo.png".to_string()))
    );
}

#[test]
fn test_empty_url() {
    assert_eq!(resolve_url("  \n", None), Err(UrlError::Empty));
}

#[test]
fn test_data_url_is_absolute() {
    let url = resolve_url(" data:image/png;base64,AAAA ", None).unwrap();
    assert_eq!(url.scheme(), "data");
}

#[test]
fn test_warn_once_deduplicates() {
    clear_warnings();
    assert!(!has_warned("Test", "dedup message"));
    warn_once("Test", "dedup message");
    warn_once("Test", "dedup message");
    assert!(has_warned("Test", "dedup message"));
    assert!(!has_warned("Other", "dedup message"), "component is part of the key");
}
