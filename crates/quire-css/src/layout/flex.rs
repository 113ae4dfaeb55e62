//! Flex item fixup.
//!
//! [§ 4 Flex Items](https://www.w3.org/TR/css-flexbox-1/#flex-items)

use std::sync::Arc;

use super::boxes::{BoxKind, BoxRef, LayoutBox};

/// Turn the children of every flex container below `b` into flex items.
///
/// "Each in-flow child of a flex container becomes a flex item, and each
/// contiguous sequence of child text runs is wrapped in an anonymous block
/// container flex item. However, if the entire sequence of child text runs
/// contains only white space it is instead not rendered."
#[must_use]
pub fn flex_boxes(b: &BoxRef) -> BoxRef {
    if !b.is_parent() {
        return Arc::clone(b);
    }
    let children: Vec<BoxRef> = b.children.iter().map(flex_boxes).collect();
    if b.is_flex_container() {
        return Arc::new(b.with_children(flex_items(b, children)));
    }
    if children.iter().zip(&b.children).all(|(new, old)| Arc::ptr_eq(new, old)) {
        Arc::clone(b)
    } else {
        Arc::new(b.with_children(children))
    }
}

fn flex_items(container: &LayoutBox, children: Vec<BoxRef>) -> Vec<BoxRef> {
    let mut items = Vec::with_capacity(children.len());
    for mut child in children {
        if !child.is_absolutely_positioned() {
            Arc::make_mut(&mut child).flags.is_flex_item = true;
        }
        if child.text().is_some_and(|text| text.trim_matches(' ').is_empty()) {
            continue;
        }
        if !child.is_inline_level() {
            items.push(child);
            continue;
        }

        // An inline-level child is blockified. A parent keeps its children
        // and lends its style to the anonymous block.
        let mut anonymous = if child.is_parent() {
            let mut block = LayoutBox::anonymous_from(container, BoxKind::Block, child.children.clone());
            block.style = Arc::clone(&child.style);
            block
        } else {
            LayoutBox::anonymous_from(container, BoxKind::Block, vec![child])
        };
        anonymous.flags.is_flex_item = true;
        items.push(Arc::new(anonymous));
    }
    items
}
