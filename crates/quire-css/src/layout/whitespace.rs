//! White space processing and text transformation.
//!
//! [§ 4 White Space Processing](https://www.w3.org/TR/css-text-3/#white-space-processing)
//!
//! Both passes rewrite Text boxes in place (copy-on-write) and leave every
//! other box kind alone.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::style::{ComputedStyle, Hyphens, TextTransform};

use super::boxes::{BoxKind, BoxRef};

/// U+00AD SOFT HYPHEN.
const SOFT_HYPHEN: char = '\u{00AD}';

fn line_break_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\r\n?").expect("valid regex"))
}

fn space_around_newline_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\t ]*\n[\t ]*").expect("valid regex"))
}

fn space_run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" +").expect("valid regex"))
}

/// [§ 4.1.1 Phase I: Collapsing and Transformation](https://www.w3.org/TR/css-text-3/#white-space-phase-1)
///
/// Collapse white space in `b` and its descendants.
///
/// `following_collapsible_space` says whether the text laid out just before
/// `b` ended with a collapsible space. Returns the new box and the same flag
/// for the text that follows `b`.
///
/// "Any collapsible space immediately following another collapsible
/// space, even one outside the boundary of the inline containing that
/// space, provided both spaces are within the same inline formatting
/// context, is collapsed to have zero advance width."
#[must_use]
pub fn process_whitespace(b: &BoxRef, following_collapsible_space: bool) -> (BoxRef, bool) {
    if let BoxKind::Text(text) = &b.kind {
        return process_text(b, text, following_collapsible_space);
    }
    if !b.is_parent() {
        return (Arc::clone(b), following_collapsible_space);
    }

    let mut following = following_collapsible_space;
    let mut changed = false;
    let mut children = Vec::with_capacity(b.children.len());
    for child in &b.children {
        let new_child = if matches!(child.kind, BoxKind::Text(_) | BoxKind::Inline) {
            let (new_child, state) = process_whitespace(child, following);
            following = state;
            new_child
        } else {
            let (new_child, _) = process_whitespace(child, false);
            if child.is_in_normal_flow() {
                following = false;
            }
            new_child
        };
        changed |= !Arc::ptr_eq(&new_child, child);
        children.push(new_child);
    }

    let new_box = if changed {
        Arc::new(b.with_children(children))
    } else {
        Arc::clone(b)
    };
    (new_box, following)
}

fn process_text(b: &BoxRef, text: &str, following_collapsible_space: bool) -> (BoxRef, bool) {
    if text.is_empty() {
        return (Arc::clone(b), following_collapsible_space);
    }

    let white_space = b.style.white_space;
    let mut text = line_break_regex().replace_all(text, "\n").into_owned();

    // STEP 1: Remove spaces and tabs around segment breaks.
    if white_space.collapses_spaces() {
        text = space_around_newline_regex().replace_all(&text, "\n").into_owned();
    }

    // STEP 2: Segment breaks become spaces.
    if white_space.collapses_newlines() {
        text = text.replace('\n', " ");
    }

    // STEP 3: Tabs become spaces, runs of spaces collapse, and a space
    // following a collapsible space is removed.
    let mut leading_removed = false;
    let next_state = if white_space.collapses_spaces() {
        text = text.replace('\t', " ");
        text = space_run_regex().replace_all(&text, " ").into_owned();
        let ends_with_space = text.ends_with(' ');
        if following_collapsible_space && text.starts_with(' ') {
            let _ = text.remove(0);
            leading_removed = true;
        }
        ends_with_space
    } else {
        false
    };

    let flags_unchanged = !leading_removed || b.flags.leading_collapsible_space;
    if b.text() == Some(text.as_str()) && flags_unchanged {
        return (Arc::clone(b), next_state);
    }

    let mut new_box = b.shallow_copy();
    new_box.kind = BoxKind::Text(text);
    new_box.flags.leading_collapsible_space |= leading_removed;
    (Arc::new(new_box), next_state)
}

/// [§ 2.1 Case Transforms](https://www.w3.org/TR/css-text-3/#text-transform-property)
///
/// Apply `text-transform` and remove soft hyphens under `hyphens: none`, for
/// every Text box below `b`.
#[must_use]
pub fn process_text_transform(b: &BoxRef) -> BoxRef {
    if let BoxKind::Text(text) = &b.kind {
        let transformed = transform_text(text, &b.style);
        if transformed == *text {
            return Arc::clone(b);
        }
        let mut new_box = b.shallow_copy();
        new_box.kind = BoxKind::Text(transformed);
        return Arc::new(new_box);
    }
    if !b.is_parent() {
        return Arc::clone(b);
    }

    let children: Vec<BoxRef> = b.children.iter().map(process_text_transform).collect();
    if children.iter().zip(&b.children).all(|(new, old)| Arc::ptr_eq(new, old)) {
        Arc::clone(b)
    } else {
        Arc::new(b.with_children(children))
    }
}

fn transform_text(text: &str, style: &ComputedStyle) -> String {
    let mut text = match style.text_transform {
        TextTransform::None => text.to_owned(),
        TextTransform::Uppercase => text.to_uppercase(),
        TextTransform::Lowercase => text.to_lowercase(),
        TextTransform::Capitalize => capitalize(text),
        TextTransform::FullWidth => text.chars().map(full_width).collect(),
    };
    if style.hyphens == Hyphens::None {
        text.retain(|c| c != SOFT_HYPHEN);
    }
    text
}

/// "Puts the first typographic letter unit of each word, if lowercase, in
/// titlecase; other characters are unaffected."
fn capitalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_word_bounds() {
        let mut chars = word.chars();
        match chars.next() {
            Some(first) if first.is_alphabetic() => {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
            _ => out.push_str(word),
        }
    }
    out
}

/// "Puts all typographic character units in full-width form."
///
/// Printable ASCII maps onto the Halfwidth and Fullwidth Forms block, the
/// space onto U+3000 IDEOGRAPHIC SPACE, and the hyphen-minus onto U+2212
/// MINUS SIGN.
fn full_width(c: char) -> char {
    match c {
        ' ' => '\u{3000}',
        '-' => '\u{2212}',
        '\u{21}'..='\u{7E}' => char::from_u32(u32::from(c) + 0xFEE0).unwrap_or(c),
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_keeps_the_rest_of_each_word() {
        assert_eq!(capitalize("hello wORLD, l'été"), "Hello WORLD, L'été");
        assert_eq!(capitalize("  42 apples"), "  42 Apples");
    }

    #[test]
    fn test_full_width_mapping() {
        let converted: String = "Ab 1-!".chars().map(full_width).collect();
        assert_eq!(converted, "\u{FF21}\u{FF42}\u{3000}\u{FF11}\u{2212}\u{FF01}");
        assert_eq!(full_width('é'), 'é');
    }
}
