//! Generated content, counter and list-style values.
//!
//! [CSS Generated Content Level 3](https://www.w3.org/TR/css-content-3/)
//! [CSS Lists and Counters Level 3](https://www.w3.org/TR/css-lists-3/)

use serde::Serialize;
use strum_macros::{Display, EnumString};

/// `(counter name, integer)` pairs as written in `counter-reset`,
/// `counter-set` and `counter-increment`. Names are case-sensitive.
pub type CounterList = Vec<(String, i32)>;

/// [§ 4.3 Incrementing a Counter](https://www.w3.org/TR/css-lists-3/#increment-set)
///
/// Computed `counter-increment`. `Auto` is the value of an element with no
/// declaration: list items then implicitly increment `list-item` by one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum CounterIncrement {
    /// No declaration.
    #[default]
    Auto,
    /// Explicit list; empty for `none`.
    List(CounterList),
}

/// [§ 3.1 The symbols() function](https://www.w3.org/TR/css-counter-styles-3/#symbols-function)
///
/// "`symbols() = symbols( <symbols-type>? [ <string> | <image> ]+ )`"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum SymbolsType {
    /// Cycles through the symbols.
    Cyclic,
    /// Positional numbering with the symbols as digits.
    Numeric,
    /// Bijective numbering with the symbols as letters.
    Alphabetic,
    /// Cycles, doubling the symbol on each pass.
    #[default]
    Symbolic,
    /// Each symbol is used once, starting at 1.
    Fixed,
}

/// [§ 3.1 'list-style-type'](https://www.w3.org/TR/css-lists-3/#text-markers)
///
/// Also the `<counter-style>` argument of `counter()` and `counters()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ListStyleType {
    /// `none`: no marker, empty counter text.
    None,
    /// A `<counter-style-name>` such as `decimal` or `lower-roman`.
    Named(String),
    /// "`<string>`: The marker's text is the given string."
    String(String),
    /// An anonymous style from `symbols()`.
    Symbols {
        /// The counter system.
        system: SymbolsType,
        /// The symbols, in order.
        symbols: Vec<String>,
    },
}

impl ListStyleType {
    /// A named counter style.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl Default for ListStyleType {
    /// The initial value is `disc`.
    fn default() -> Self {
        Self::named("disc")
    }
}

/// [§ 2.2 'list-style-position'](https://www.w3.org/TR/css-lists-3/#list-style-position-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ListStylePosition {
    /// "The ::marker pseudo-element is an inline element placed immediately
    /// before the ::before pseudo-element in the list item's principal box."
    Inside,
    /// "the marker box is outside the principal block box"
    #[default]
    Outside,
}

/// [§ 2.2 The content() function](https://www.w3.org/TR/css-gcpm-3/#content-function-header)
///
/// Which text of an element `content()` and `target-text()` copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum TextExtractor {
    /// "The string value of the element", without its pseudo-elements.
    #[default]
    Text,
    /// The text of the element's `::before`.
    Before,
    /// The text of the element's `::after`.
    After,
    /// "The first letter of the element, as defined for the ::first-letter
    /// pseudo-element"
    FirstLetter,
}

/// One component of a `content` list.
///
/// [§ 1.1 'content'](https://www.w3.org/TR/css-content-3/#content-property)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ContentItem {
    /// A literal string.
    String(String),
    /// `counter(name, style)`
    Counter {
        /// Counter name.
        name: String,
        /// Counter style, `decimal` when omitted.
        style: ListStyleType,
    },
    /// `counters(name, separator, style)`
    Counters {
        /// Counter name.
        name: String,
        /// String placed between the levels.
        separator: String,
        /// Counter style, `decimal` when omitted.
        style: ListStyleType,
    },
    /// `url(...)`: a replaced element, resolved against the base URL.
    Url(String),
    /// `content(...)`: text of the element the list belongs to.
    Content(TextExtractor),
    /// [§ 1.3 The string() function](https://www.w3.org/TR/css-gcpm-3/#using-named-strings)
    ///
    /// `string(name)`: a named string. Only page margin boxes can use it.
    NamedString(String),
    /// [§ 4.1 target-counter()](https://www.w3.org/TR/css-content-3/#target-counter)
    ///
    /// The value of a counter at the element an anchor points to.
    TargetCounter {
        /// `"#name"` or an internal `url(#name)`.
        anchor: String,
        /// Counter name.
        name: String,
        /// Counter style, `decimal` when omitted.
        style: ListStyleType,
    },
    /// [§ 4.2 target-counters()](https://www.w3.org/TR/css-content-3/#target-counters)
    TargetCounters {
        /// `"#name"` or an internal `url(#name)`.
        anchor: String,
        /// Counter name.
        name: String,
        /// String placed between the levels.
        separator: String,
        /// Counter style, `decimal` when omitted.
        style: ListStyleType,
    },
    /// [§ 4.3 target-text()](https://www.w3.org/TR/css-content-3/#target-text)
    TargetText {
        /// `"#name"` or an internal `url(#name)`.
        anchor: String,
        /// Which text of the target to copy.
        extractor: TextExtractor,
    },
    /// `open-quote`
    OpenQuote,
    /// `close-quote`
    CloseQuote,
    /// `no-open-quote`
    NoOpenQuote,
    /// `no-close-quote`
    NoCloseQuote,
}

/// Computed `content`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum ContentValue {
    /// `normal`
    #[default]
    Normal,
    /// `none`
    None,
    /// `inhibit` (for `::marker`, suppresses the marker)
    Inhibit,
    /// A list of content items.
    Items(Vec<ContentItem>),
}

/// [§ 3.3 'quotes'](https://www.w3.org/TR/css-content-3/#quotes)
///
/// Pairs of `(open, close)` quote strings by nesting level; empty for `none`.
pub type Quotes = Vec<(String, String)>;

/// English quotation marks, used for `quotes: auto`.
#[must_use]
pub fn default_quotes() -> Quotes {
    vec![
        ("\u{201C}".to_string(), "\u{201D}".to_string()),
        ("\u{2018}".to_string(), "\u{2019}".to_string()),
    ]
}
