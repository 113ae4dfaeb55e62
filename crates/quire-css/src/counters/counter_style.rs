//! Counter styles: turning counter values into marker and content text.
//!
//! [CSS Counter Styles Level 3](https://www.w3.org/TR/css-counter-styles-3/)
//!
//! "A counter style defines how to convert a counter value into a string."

use std::str::FromStr;

use strum_macros::{Display, EnumString};

use quire_common::warning::warn_once;

use crate::style::{ListStyleType, SymbolsType};

/// [§ 6 Simple Predefined Counter Styles](https://www.w3.org/TR/css-counter-styles-3/#simple-predefined-counters)
///
/// The predefined styles this engine knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum PredefinedStyle {
    /// Western decimal numbers.
    Decimal,
    /// Decimal numbers padded to two digits.
    DecimalLeadingZero,
    /// Lowercase ASCII roman numerals.
    LowerRoman,
    /// Uppercase ASCII roman numerals.
    UpperRoman,
    /// Traditional Georgian numbering.
    Georgian,
    /// Traditional uppercase Armenian numbering.
    Armenian,
    /// Lowercase ASCII letters.
    LowerAlpha,
    /// Uppercase ASCII letters.
    UpperAlpha,
    /// Alias of lower-alpha.
    LowerLatin,
    /// Alias of upper-alpha.
    UpperLatin,
    /// Lowercase classical Greek letters.
    LowerGreek,
    /// A filled circular bullet.
    Disc,
    /// A hollow circular bullet.
    Circle,
    /// A filled square bullet.
    Square,
}

/// [§ 3.1 Counter algorithms: the system descriptor](https://www.w3.org/TR/css-counter-styles-3/#counter-style-system)
///
/// Generic over the symbol type so that predefined tables (`&str`) and
/// `symbols()` arguments (`String`) share the algorithms.
#[derive(Debug, Clone, Copy)]
enum System<'a, S> {
    Cyclic(&'a [S]),
    Fixed(&'a [S]),
    Symbolic(&'a [S]),
    Alphabetic(&'a [S]),
    Numeric(&'a [S]),
    Additive(&'a [(u32, &'a str)]),
}

/// Longest symbol repetition of the `symbolic` system. Larger values use the
/// fallback style.
const MAX_SYMBOLIC_REPEAT: usize = 60;

const DECIMAL: &[&str] = &["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

const LOWER_ALPHA: &[&str] = &[
    "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r",
    "s", "t", "u", "v", "w", "x", "y", "z",
];

const UPPER_ALPHA: &[&str] = &[
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R",
    "S", "T", "U", "V", "W", "X", "Y", "Z",
];

const LOWER_GREEK: &[&str] = &[
    "α", "β", "γ", "δ", "ε", "ζ", "η", "θ", "ι", "κ", "λ", "μ", "ν", "ξ", "ο", "π", "ρ", "σ",
    "τ", "υ", "φ", "χ", "ψ", "ω",
];

const LOWER_ROMAN: &[(u32, &str)] = &[
    (1000, "m"), (900, "cm"), (500, "d"), (400, "cd"), (100, "c"), (90, "xc"), (50, "l"),
    (40, "xl"), (10, "x"), (9, "ix"), (5, "v"), (4, "iv"), (1, "i"),
];

const UPPER_ROMAN: &[(u32, &str)] = &[
    (1000, "M"), (900, "CM"), (500, "D"), (400, "CD"), (100, "C"), (90, "XC"), (50, "L"),
    (40, "XL"), (10, "X"), (9, "IX"), (5, "V"), (4, "IV"), (1, "I"),
];

const GEORGIAN: &[(u32, &str)] = &[
    (10000, "ჵ"), (9000, "ჰ"), (8000, "ჯ"), (7000, "ჴ"), (6000, "ხ"), (5000, "ჭ"),
    (4000, "წ"), (3000, "ძ"), (2000, "ც"), (1000, "ჩ"), (900, "შ"), (800, "ყ"), (700, "ღ"),
    (600, "ქ"), (500, "ფ"), (400, "ჳ"), (300, "ტ"), (200, "ს"), (100, "რ"), (90, "ჟ"),
    (80, "პ"), (70, "ო"), (60, "ჲ"), (50, "ნ"), (40, "მ"), (30, "ლ"), (20, "კ"), (10, "ი"),
    (9, "თ"), (8, "ჱ"), (7, "ზ"), (6, "ვ"), (5, "ე"), (4, "დ"), (3, "გ"), (2, "ბ"), (1, "ა"),
];

const ARMENIAN: &[(u32, &str)] = &[
    (9000, "Ք"), (8000, "Փ"), (7000, "Ւ"), (6000, "Ց"), (5000, "Ր"), (4000, "Տ"),
    (3000, "Վ"), (2000, "Ս"), (1000, "Ռ"), (900, "Ջ"), (800, "Պ"), (700, "Չ"), (600, "Ո"),
    (500, "Շ"), (400, "Ն"), (300, "Յ"), (200, "Մ"), (100, "Ճ"), (90, "Ղ"), (80, "Ձ"),
    (70, "Հ"), (60, "Կ"), (50, "Ծ"), (40, "Խ"), (30, "Լ"), (20, "Ի"), (10, "Ժ"), (9, "Թ"),
    (8, "Ը"), (7, "Է"), (6, "Զ"), (5, "Ե"), (4, "Դ"), (3, "Գ"), (2, "Բ"), (1, "Ա"),
];

/// A fully described counter style.
#[derive(Debug, Clone, Copy)]
struct Definition<'a> {
    system: System<'a, &'a str>,
    /// [§ 3.5 the range descriptor](https://www.w3.org/TR/css-counter-styles-3/#counter-style-range)
    range: Option<(i64, i64)>,
    /// [§ 3.6 the pad descriptor](https://www.w3.org/TR/css-counter-styles-3/#counter-style-pad)
    pad: Option<(usize, &'a str)>,
    /// [§ 3.4 the prefix and suffix descriptors](https://www.w3.org/TR/css-counter-styles-3/#counter-style-suffix)
    suffix: &'a str,
}

impl<'a> Definition<'a> {
    const fn new(system: System<'a, &'a str>) -> Self {
        Self {
            system,
            range: None,
            pad: None,
            suffix: ". ",
        }
    }

    const fn with_range(mut self, low: i64, high: i64) -> Self {
        self.range = Some((low, high));
        self
    }

    const fn with_suffix(mut self, suffix: &'a str) -> Self {
        self.suffix = suffix;
        self
    }
}

impl PredefinedStyle {
    const fn definition(self) -> Definition<'static> {
        match self {
            Self::Decimal => Definition::new(System::Numeric(DECIMAL)),
            Self::DecimalLeadingZero => Definition {
                pad: Some((2, "0")),
                ..Definition::new(System::Numeric(DECIMAL))
            },
            Self::LowerRoman => Definition::new(System::Additive(LOWER_ROMAN)).with_range(1, 4999),
            Self::UpperRoman => Definition::new(System::Additive(UPPER_ROMAN)).with_range(1, 4999),
            Self::Georgian => Definition::new(System::Additive(GEORGIAN)).with_range(1, 19999),
            Self::Armenian => Definition::new(System::Additive(ARMENIAN)).with_range(1, 9999),
            Self::LowerAlpha | Self::LowerLatin => Definition::new(System::Alphabetic(LOWER_ALPHA)),
            Self::UpperAlpha | Self::UpperLatin => Definition::new(System::Alphabetic(UPPER_ALPHA)),
            Self::LowerGreek => Definition::new(System::Alphabetic(LOWER_GREEK)),
            Self::Disc => Definition::new(System::Cyclic(&["•"])).with_suffix(" "),
            Self::Circle => Definition::new(System::Cyclic(&["◦"])).with_suffix(" "),
            Self::Square => Definition::new(System::Cyclic(&["▪"])).with_suffix(" "),
        }
    }
}

/// [§ 3.5 the range descriptor](https://www.w3.org/TR/css-counter-styles-3/#counter-style-range)
///
/// "auto: The range depends on the counter system."
const fn auto_range<S>(system: &System<'_, S>) -> (i64, i64) {
    match system {
        System::Cyclic(_) | System::Numeric(_) | System::Fixed(_) => (i64::MIN, i64::MAX),
        System::Alphabetic(_) | System::Symbolic(_) => (1, i64::MAX),
        System::Additive(_) => (0, i64::MAX),
    }
}

/// [§ 3.1 Counter algorithms](https://www.w3.org/TR/css-counter-styles-3/#counter-style-system)
///
/// Representation of a non-negative (or, for cyclic and fixed, any) value,
/// without negative sign, padding, prefix or suffix. `None` means the
/// algorithm cannot represent the value and the fallback style is used.
fn initial_representation<S: AsRef<str>>(value: i64, system: &System<'_, S>) -> Option<String> {
    match system {
        // "cycles repeatedly through its provided symbols, looping back to
        // the beginning when it reaches the end of the list."
        System::Cyclic(symbols) => {
            let n = i64::try_from(symbols.len()).ok().filter(|n| *n > 0)?;
            let index = usize::try_from((value - 1).rem_euclid(n)).ok()?;
            Some(symbols[index].as_ref().to_string())
        }
        // "runs through its list of counter symbols once, then falls back."
        System::Fixed(symbols) => {
            let index = usize::try_from(value - 1).ok()?;
            symbols.get(index).map(|s| s.as_ref().to_string())
        }
        // "cycles repeatedly through its provided symbols, doubling,
        // tripling, etc. the symbols on each successive pass through the list."
        System::Symbolic(symbols) => {
            let n = i64::try_from(symbols.len()).ok().filter(|n| *n > 0)?;
            if value < 1 {
                return None;
            }
            let index = usize::try_from((value - 1) % n).ok()?;
            let repeat = usize::try_from((value + n - 1) / n).ok()?;
            if repeat > MAX_SYMBOLIC_REPEAT {
                return None;
            }
            Some(symbols[index].as_ref().repeat(repeat))
        }
        // "interprets the list of counter symbols as digits to an alphabetic
        // numbering system"
        System::Alphabetic(symbols) => {
            let n = i64::try_from(symbols.len()).ok().filter(|n| *n >= 2)?;
            if value < 1 {
                return None;
            }
            let mut value = value;
            let mut digits = Vec::new();
            while value != 0 {
                value -= 1;
                digits.push(symbols[usize::try_from(value % n).ok()?].as_ref());
                value /= n;
            }
            Some(digits.iter().rev().copied().collect())
        }
        // "interprets the list of counter symbols as digits to a
        // 'place-value' numbering system"
        System::Numeric(symbols) => {
            let n = i64::try_from(symbols.len()).ok().filter(|n| *n >= 2)?;
            if value == 0 {
                return Some(symbols[0].as_ref().to_string());
            }
            let mut value = value;
            let mut digits = Vec::new();
            while value != 0 {
                digits.push(symbols[usize::try_from(value % n).ok()?].as_ref());
                value /= n;
            }
            Some(digits.iter().rev().copied().collect())
        }
        // "represents 'sign-value' numbering systems, which ... represent a
        // value by repeating symbols and summing their weights."
        System::Additive(tuples) => {
            if value == 0 {
                return tuples
                    .iter()
                    .find(|(weight, _)| *weight == 0)
                    .map(|(_, symbol)| (*symbol).to_string());
            }
            let mut value = value;
            let mut result = String::new();
            for &(weight, symbol) in *tuples {
                let weight = i64::from(weight);
                if weight == 0 || weight > value {
                    continue;
                }
                let reps = usize::try_from(value / weight).ok()?;
                result.push_str(&symbol.repeat(reps));
                value %= weight;
                if value == 0 {
                    return Some(result);
                }
            }
            None
        }
    }
}

/// [§ 2 Defining Custom Counter Styles](https://www.w3.org/TR/css-counter-styles-3/#counter-style-generate)
///
/// "To generate a counter representation for a value using a counter style":
fn generate<S: AsRef<str>>(
    value: i32,
    system: &System<'_, S>,
    range: (i64, i64),
    pad: Option<(usize, &str)>,
) -> Option<String> {
    let value = i64::from(value);

    // STEP 1: "If value is outside the range of the counter style, exit this
    // algorithm and instead generate a counter representation using the
    // counter style's fallback style and the same value."
    if value < range.0 || value > range.1 {
        return None;
    }

    // STEP 2: "Using the counter value and the counter algorithm for the
    // counter style, generate an initial representation for the counter
    // value. If the counter value is negative and the counter style uses a
    // negative sign, instead generate an initial representation using the
    // absolute value of the counter value."
    let uses_negative = matches!(
        system,
        System::Symbolic(_) | System::Alphabetic(_) | System::Numeric(_) | System::Additive(_)
    );
    let negative = uses_negative && value < 0;
    let mut representation = initial_representation(if negative { value.abs() } else { value }, system)?;

    // STEP 3: "Prepend symbols to the representation as specified in the pad
    // descriptor." The negative sign counts towards the padded length.
    if let Some((width, symbol)) = pad {
        let length = representation.chars().count() + usize::from(negative);
        if length < width {
            representation = symbol.repeat(width - length) + &representation;
        }
    }

    // STEP 4: "If the counter value is negative and the counter style uses a
    // negative sign, wrap the representation in the counter style's negative
    // sign as specified in the negative descriptor."
    if negative {
        representation.insert(0, '-');
    }
    Some(representation)
}

/// Look up a predefined style by name, falling back to `decimal` with a
/// warning for unknown names.
fn predefined(name: &str) -> PredefinedStyle {
    PredefinedStyle::from_str(name).unwrap_or_else(|_| {
        warn_once("CSS", &format!("unsupported counter style '{name}', using decimal"));
        PredefinedStyle::Decimal
    })
}

fn render_predefined(value: i32, style: PredefinedStyle) -> String {
    let definition = style.definition();
    let range = definition.range.unwrap_or_else(|| auto_range(&definition.system));
    generate(value, &definition.system, range, definition.pad)
        // [§ 3.7 the fallback descriptor] "If the value of the fallback
        // descriptor isn't the name of any defined counter style, the used
        // value of the fallback descriptor is decimal instead."
        .unwrap_or_else(|| render_predefined(value, PredefinedStyle::Decimal))
}

fn render_symbols(value: i32, system: SymbolsType, symbols: &[String]) -> String {
    let system = match system {
        SymbolsType::Cyclic => System::Cyclic(symbols),
        SymbolsType::Fixed => System::Fixed(symbols),
        SymbolsType::Symbolic => System::Symbolic(symbols),
        SymbolsType::Alphabetic => System::Alphabetic(symbols),
        SymbolsType::Numeric => System::Numeric(symbols),
    };
    generate(value, &system, auto_range(&system), None)
        .unwrap_or_else(|| render_predefined(value, PredefinedStyle::Decimal))
}

/// [§ 3 'counter()' and 'counters()'](https://www.w3.org/TR/css-lists-3/#counter-functions)
///
/// Text of `value` in `style`, without prefix or suffix. `none` renders
/// nothing; a `<string>` style renders the string.
#[must_use]
pub fn render_value(value: i32, style: &ListStyleType) -> String {
    match style {
        ListStyleType::None => String::new(),
        ListStyleType::Named(name) => render_predefined(value, predefined(name)),
        ListStyleType::String(text) => text.clone(),
        ListStyleType::Symbols { system, symbols } => render_symbols(value, *system, symbols),
    }
}

/// [§ 3.1 Text-based Markers](https://www.w3.org/TR/css-lists-3/#text-markers)
///
/// Marker text of `value` in `style`, including the style's suffix:
/// `". "` for numbering styles, `" "` for bullets and `symbols()`.
/// A `<string>` style is used as-is.
#[must_use]
pub fn render_marker(value: i32, style: &ListStyleType) -> String {
    match style {
        ListStyleType::None => String::new(),
        ListStyleType::Named(name) => {
            let style = predefined(name);
            let mut text = render_predefined(value, style);
            text.push_str(style.definition().suffix);
            text
        }
        ListStyleType::String(text) => text.clone(),
        ListStyleType::Symbols { system, symbols } => {
            // [§ 3.1 symbols()] "the counter style has a suffix of " " (U+0020 SPACE)"
            let mut text = render_symbols(value, *system, symbols);
            text.push(' ');
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(value: i32, name: &str) -> String {
        render_value(value, &ListStyleType::named(name))
    }

    #[test]
    fn test_decimal_leading_zero_counts_sign() {
        assert_eq!(named(-1, "decimal-leading-zero"), "-1");
        assert_eq!(named(0, "decimal-leading-zero"), "00");
        assert_eq!(named(1, "decimal-leading-zero"), "01");
        assert_eq!(named(-9, "decimal-leading-zero"), "-9");
        assert_eq!(named(-10, "decimal-leading-zero"), "-10");
        assert_eq!(named(123, "decimal-leading-zero"), "123");
    }

    #[test]
    fn test_alphabetic_boundaries() {
        assert_eq!(named(1, "lower-alpha"), "a");
        assert_eq!(named(26, "lower-alpha"), "z");
        assert_eq!(named(27, "lower-alpha"), "aa");
        assert_eq!(named(2002, "lower-alpha"), "bxz");
        assert_eq!(named(2003, "upper-latin"), "BYA");
        assert_eq!(named(0, "lower-alpha"), "0", "out of range falls back");
    }

    #[test]
    fn test_additive_limits() {
        assert_eq!(named(4999, "upper-roman"), "MMMMCMXCIX");
        assert_eq!(named(5000, "upper-roman"), "5000");
        assert_eq!(named(19999, "georgian"), "ჵჰშჟთ");
        assert_eq!(named(9999, "armenian"), "ՔՋՂԹ");
        assert_eq!(named(10000, "armenian"), "10000");
    }

    #[test]
    fn test_symbolic_repetition_is_capped() {
        let style = ListStyleType::Symbols {
            system: SymbolsType::Symbolic,
            symbols: vec!["*".to_string(), "\u{2020}".to_string()],
        };
        assert_eq!(render_value(5, &style), "***");
        assert_eq!(render_value(120, &style), "\u{2020}".repeat(60));
        assert_eq!(render_value(121, &style), "121");
        assert_eq!(render_value(i32::MAX, &style), i32::MAX.to_string());
    }

    #[test]
    fn test_initial_representation_additive_zero() {
        let system = System::<&str>::Additive(LOWER_ROMAN);
        assert_eq!(initial_representation(0, &system), None);
    }
}
