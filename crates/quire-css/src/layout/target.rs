//! Cross-references between elements.
//!
//! [§ 4 Cross references](https://www.w3.org/TR/css-content-3/#cross-references)
//!
//! `target-counter()`, `target-counters()` and `target-text()` read the
//! counters and text of the element an anchor names. Anchors are stored as
//! the element tree is walked; a function that names an anchor further down
//! the document finds nothing on the first walk, so the builder walks the
//! tree a second time with the anchors of the first.

use std::collections::{HashMap, HashSet};

use tracing::debug;
use unicode_categories::UnicodeCategories;

use quire_common::warning::warn_once;

use crate::counters::CounterValues;
use crate::style::TextExtractor;

use super::boxes::{BoxKind, BoxRef, LayoutBox};

/// What a named element offers to `target-*()` functions.
#[derive(Debug, Clone)]
pub struct Target {
    /// Counter stacks at the element, after its `::before`.
    pub counters: CounterValues,
    /// The finished box of the element; `None` while its children are
    /// still being built.
    pub target_box: Option<BoxRef>,
}

impl Target {
    /// Innermost value of `name` at the target, 0 when it does not exist.
    #[must_use]
    pub fn counter_value(&self, name: &str) -> i32 {
        self.counters
            .get(name)
            .and_then(|stack| stack.last().copied())
            .unwrap_or(0)
    }

    /// Every level of `name` at the target, outermost first.
    #[must_use]
    pub fn counter_stack(&self, name: &str) -> Vec<i32> {
        match self.counters.get(name) {
            Some(stack) if !stack.is_empty() => stack.clone(),
            _ => vec![0],
        }
    }
}

/// Anchors seen during box generation.
#[derive(Debug, Default)]
pub struct TargetCollector {
    /// Anchors stored by the current walk.
    targets: HashMap<String, Target>,
    /// Anchors stored by the previous walk.
    previous: HashMap<String, Target>,
    /// Anchor names looked up before they were stored.
    pending: HashSet<String>,
    /// Set for the second walk: a missing anchor is then undefined.
    resolving: bool,
}

impl TargetCollector {
    /// An empty collector for the first walk.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the anchor `name` with the counter values of its element.
    ///
    /// Returns `false` when the name was already taken by an earlier
    /// element, which keeps it.
    pub fn store_target(&mut self, name: &str, counters: CounterValues) -> bool {
        if self.targets.contains_key(name) {
            warn_once("CSS", &format!("anchor defined twice: '{name}'"));
            return false;
        }
        let target = Target {
            counters,
            target_box: None,
        };
        let _ = self.targets.insert(name.to_string(), target);
        true
    }

    /// Attach the finished box of the element that owns `name`.
    pub fn store_target_box(&mut self, name: &str, target_box: BoxRef) {
        if let Some(target) = self.targets.get_mut(name) {
            target.target_box = Some(target_box);
        }
    }

    /// The target an anchor token points to.
    ///
    /// `needs_box` asks for a target whose box is complete, as `target-text()`
    /// does. An anchor not stored yet is remembered as pending on the first
    /// walk; on the second it is undefined and the function produces nothing.
    pub fn lookup(&mut self, token: &str, needs_box: bool) -> Option<&Target> {
        let Some(name) = anchor_name(token) else {
            warn_once("CSS", &format!("'{token}' is not an anchor reference"));
            return None;
        };
        let ready = |target: &Target| !needs_box || target.target_box.is_some();
        if self.targets.get(name).is_some_and(ready) {
            return self.targets.get(name);
        }
        if self.previous.get(name).is_some_and(ready) {
            return self.previous.get(name);
        }
        if self.resolving {
            warn_once("CSS", &format!("content discarded: target points to undefined anchor '{name}'"));
        } else {
            let _ = self.pending.insert(name.to_string());
        }
        None
    }

    /// Whether a second walk would resolve a lookup the first one could
    /// not: a pending name that was stored later in the document.
    #[must_use]
    pub fn needs_second_walk(&self) -> bool {
        !self.resolving && self.pending.iter().any(|name| self.targets.contains_key(name))
    }

    /// Prepare for the second walk, keeping the anchors of the first.
    pub fn start_second_walk(&mut self) {
        debug!(pending = self.pending.len(), "anchors referenced before their element");
        self.previous = std::mem::take(&mut self.targets);
        self.pending.clear();
        self.resolving = true;
    }
}

/// The anchor name in a `target-*()` token: `#name` as a string, or an
/// internal `url(#name)`.
#[must_use]
pub fn anchor_name(token: &str) -> Option<&str> {
    token.strip_prefix('#').filter(|name| !name.is_empty())
}

/// [§ 2.2 The content() function](https://www.w3.org/TR/css-gcpm-3/#content-function-header)
///
/// Text of `b` selected by `extractor`, before white space trimming.
#[must_use]
pub fn box_text(b: &LayoutBox, extractor: TextExtractor) -> String {
    let pseudo = match extractor {
        TextExtractor::Text => {
            if let BoxKind::Text(text) = &b.kind {
                return text.clone();
            }
            return b
                .descendants()
                .into_iter()
                .filter(|child| !["::before", "::after", "::marker"].iter().any(|suffix| child.element_tag.ends_with(suffix)))
                .filter_map(LayoutBox::text)
                .collect();
        }
        TextExtractor::FirstLetter => {
            return first_letter(box_text(b, TextExtractor::Text).trim_start()).to_string();
        }
        TextExtractor::Before => "::before",
        TextExtractor::After => "::after",
    };
    b.descendants()
        .into_iter()
        .filter(|child| child.element_tag.ends_with(pseudo))
        .filter_map(LayoutBox::text)
        .collect()
}

/// [§ 5.1 The ::first-letter pseudo-element](https://www.w3.org/TR/css-pseudo-4/#first-letter-pattern)
///
/// "Punctuation (i.e, characters that belong to the Punctuation (P*)
/// general category ...) that precedes or follows the first typographic
/// letter unit must be included." Connector and dash punctuation are left
/// out.
fn first_letter(text: &str) -> &str {
    let is_punctuation = |c: char| {
        c.is_punctuation_open()
            || c.is_punctuation_close()
            || c.is_punctuation_initial_quote()
            || c.is_punctuation_final_quote()
            || c.is_punctuation_other()
    };
    let mut found = false;
    for (index, c) in text.char_indices() {
        if !is_punctuation(c) {
            if found {
                return &text[..index];
            }
            found = true;
        }
    }
    text
}
