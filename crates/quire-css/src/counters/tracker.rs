//! Scoped counter state.
//!
//! [§ 4 Automatic Numbering With Containment: Counters](https://www.w3.org/TR/css-lists-3/#auto-numbering)
//!
//! "Counters are inherited, like other properties, but through document
//! order rather than tree order." A counter name maps to a stack of values,
//! one per nested scope, and every tree depth owns the set of names it
//! instantiated so that they can be popped when the depth is left.

use std::collections::{HashMap, HashSet};
use std::ops::{Deref, DerefMut};

use tracing::trace;

use crate::style::{ComputedStyle, CounterIncrement};

/// The `list-item` counter used for list markers.
pub const LIST_ITEM: &str = "list-item";

/// Counter name to its stack of nested values, outermost first.
pub type CounterValues = HashMap<String, Vec<i32>>;

/// Counter values and scopes threaded through box tree construction.
#[derive(Debug, Clone)]
pub struct CounterTracker {
    /// Counter name to its stack of nested values.
    values: CounterValues,
    /// One set of instantiated names per open tree depth.
    scopes: Vec<HashSet<String>>,
    /// [§ 3.2 Quotes](https://www.w3.org/TR/css-content-3/#quotes)
    ///
    /// Nesting depth of `open-quote`, carried in document order like counters.
    pub quote_depth: usize,
}

impl Default for CounterTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterTracker {
    /// A tracker with one (document-level) scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            scopes: vec![HashSet::new()],
            quote_depth: 0,
        }
    }

    /// Push an empty scope for the children of the current element.
    pub fn enter_scope(&mut self) {
        self.scopes.push(HashSet::new());
    }

    /// Pop the innermost scope and every counter instantiated in it.
    ///
    /// # Panics
    ///
    /// Panics when called more often than [`Self::enter_scope`].
    pub fn leave_scope(&mut self) {
        let scope = self.scopes.pop().expect("leave_scope without matching enter_scope");
        for name in scope {
            if let Some(stack) = self.values.get_mut(&name) {
                let _ = stack.pop();
                if stack.is_empty() {
                    let _ = self.values.remove(&name);
                }
            }
        }
    }

    /// Enter a scope that is left again when the returned guard drops.
    pub fn scope(&mut self) -> CounterScope<'_> {
        self.enter_scope();
        CounterScope { tracker: self }
    }

    fn sibling_scope(&mut self) -> &mut HashSet<String> {
        if self.scopes.is_empty() {
            self.scopes.push(HashSet::new());
        }
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// Instantiate `name` in the current scope with value 0 if it has no
    /// active stack, and return the stack.
    fn instantiate(&mut self, name: &str) -> &mut Vec<i32> {
        if !self.values.contains_key(name) {
            let _ = self.sibling_scope().insert(name.to_string());
        }
        self.values.entry(name.to_string()).or_insert_with(|| vec![0])
    }

    /// [§ 4.2 Creating Counters: the counter-reset property](https://www.w3.org/TR/css-lists-3/#counter-reset)
    ///
    /// A counter reset twice in the same scope keeps a single level; the
    /// later value wins.
    pub fn apply_counter_reset(&mut self, name: &str, value: i32) {
        let reset_in_scope = !self.sibling_scope().insert(name.to_string());
        let stack = self.values.entry(name.to_string()).or_default();
        if reset_in_scope {
            if let Some(top) = stack.last_mut() {
                *top = value;
                return;
            }
        }
        stack.push(value);
    }

    /// [§ 4.3 Manipulating Counter Values: the counter-set property](https://www.w3.org/TR/css-lists-3/#increment-set)
    ///
    /// "If there is not currently a counter of the given name on the element,
    /// the element instantiates a new counter of the given name with a
    /// starting value of 0 before setting or incrementing its value."
    pub fn apply_counter_set(&mut self, name: &str, value: i32) {
        if let Some(top) = self.instantiate(name).last_mut() {
            *top = value;
        }
    }

    /// [§ 4.3 the counter-increment property](https://www.w3.org/TR/css-lists-3/#increment-set)
    pub fn apply_counter_increment(&mut self, name: &str, delta: i32) {
        if let Some(top) = self.instantiate(name).last_mut() {
            *top = top.saturating_add(delta);
        }
    }

    /// [§ 4.4 Counters in elements](https://www.w3.org/TR/css-lists-3/#counters-without-boxes)
    ///
    /// Apply an element's `counter-reset`, then `counter-set`, then
    /// `counter-increment`, in the current (sibling) scope.
    ///
    /// [§ 4.5 The Implicit list-item Counter](https://www.w3.org/TR/css-lists-3/#list-item-counter)
    ///
    /// "list items automatically increment the special list-item counter.
    /// Unless the counter-increment property manually specifies a different
    /// increment for the list-item counter, it must be incremented by 1 on
    /// every list item."
    pub fn update_counters(&mut self, style: &ComputedStyle) {
        for (name, value) in &style.counter_reset {
            self.apply_counter_reset(name, *value);
        }
        for (name, value) in &style.counter_set {
            self.apply_counter_set(name, *value);
        }
        match &style.counter_increment {
            CounterIncrement::Auto => {
                if style.display.is_list_item() {
                    self.apply_counter_increment(LIST_ITEM, 1);
                }
            }
            CounterIncrement::List(list) => {
                for (name, delta) in list {
                    self.apply_counter_increment(name, *delta);
                }
            }
        }
        trace!(depth = self.scopes.len(), counters = self.values.len(), "counters updated");
    }

    /// Innermost value of `name`, 0 when the counter does not exist.
    #[must_use]
    pub fn current_value(&self, name: &str) -> i32 {
        self.values
            .get(name)
            .and_then(|stack| stack.last().copied())
            .unwrap_or(0)
    }

    /// Every level of `name`, outermost first; `[0]` when it does not exist.
    #[must_use]
    pub fn current_stack(&self, name: &str) -> Vec<i32> {
        match self.values.get(name) {
            Some(stack) if !stack.is_empty() => stack.clone(),
            _ => vec![0],
        }
    }

    /// A copy of every active counter stack.
    #[must_use]
    pub fn snapshot(&self) -> CounterValues {
        self.values.clone()
    }

    /// Number of open scopes, including the document scope.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

/// RAII guard for a counter scope; derefs to the tracker.
#[derive(Debug)]
pub struct CounterScope<'a> {
    tracker: &'a mut CounterTracker,
}

impl Deref for CounterScope<'_> {
    type Target = CounterTracker;

    fn deref(&self) -> &Self::Target {
        self.tracker
    }
}

impl DerefMut for CounterScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.tracker
    }
}

impl Drop for CounterScope<'_> {
    fn drop(&mut self) {
        self.tracker.leave_scope();
    }
}
