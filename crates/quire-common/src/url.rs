//! URL resolution utilities.
//!
//! [§ 2.4 URLs](https://html.spec.whatwg.org/multipage/urls-and-fetching.html#resolving-urls)
//! [URL Standard](https://url.spec.whatwg.org/)

pub use url::Url;

/// Errors raised when an attribute value cannot be turned into a URL.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlError {
    /// The attribute value was empty or only whitespace.
    #[error("empty URL")]
    Empty,
    /// A relative reference was found but the document has no base URL.
    #[error("relative URL '{0}' without a base URL")]
    RelativeWithoutBase(String),
    /// The URL parser rejected the value.
    #[error("invalid URL '{href}': {source}")]
    Parse {
        /// The offending attribute value.
        href: String,
        /// The parser's reason.
        #[source]
        source: url::ParseError,
    },
}

/// [§ 2.4.1 Parsing URLs](https://html.spec.whatwg.org/multipage/urls-and-fetching.html#encoding-parsing-a-url)
///
/// Resolve a potentially relative URL against a base URL.
///
/// STEP 1: "Strip leading and trailing ASCII whitespace from url."
///
/// STEP 2: "If url is an absolute URL, return url."
///
/// STEP 3: "Otherwise, parse url relative to base."
///
/// # Errors
///
/// Returns [`UrlError`] when the value is empty, relative with no base, or
/// rejected by the URL parser.
pub fn resolve_url(href: &str, base_url: Option<&Url>) -> Result<Url, UrlError> {
    // STEP 1
    let href = href.trim_matches(|c: char| c.is_ascii_whitespace());
    if href.is_empty() {
        return Err(UrlError::Empty);
    }

    // STEP 2
    match Url::parse(href) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            // STEP 3
            let Some(base) = base_url else {
                return Err(UrlError::RelativeWithoutBase(href.to_string()));
            };
            base.join(href).map_err(|source| UrlError::Parse {
                href: href.to_string(),
                source,
            })
        }
        Err(source) => Err(UrlError::Parse {
            href: href.to_string(),
            source,
        }),
    }
}
