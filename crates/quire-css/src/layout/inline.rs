//! Line boxes and anonymous block boxes.
//!
//! [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
//!
//! Two passes, run in this order:
//!
//! 1. [`inline_in_block`] wraps runs of inline-level children of a block
//!    container into Line boxes, so a block container holds either only
//!    block-level boxes or a single Line.
//! 2. [`block_in_inline`] splits Inline boxes that contain block-level boxes
//!    around them, each side ending up in an anonymous Block.

use std::mem;
use std::sync::Arc;

use super::boxes::{BoxKind, BoxRef, LayoutBox};

/// [§ 9.2.1.1](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
///
/// "If a block container box has a block-level box inside it, then we force
/// it to have only block-level boxes inside it."
///
/// Consecutive inline-level children of every block container below `b`
/// are wrapped in a Line box. If the container also has block-level
/// children, each Line is wrapped in an anonymous Block. Empty Text boxes
/// left by white space processing are removed; the collapsible space they
/// stood for moves to the next sibling's `leading_collapsible_space`.
///
/// ```text
/// Block[Text("a"), Block[..], Inline[..]]
///   => Block[Block[Line[Text("a")]], Block[..], Block[Line[Inline[..]]]]
/// ```
///
/// # Panics
///
/// Panics if a Line box is found, which means the pass already ran.
#[must_use]
pub fn inline_in_block(b: &BoxRef) -> BoxRef {
    if !b.is_parent() {
        return Arc::clone(b);
    }

    let mut new_box = b.shallow_copy();
    if let Some(first) = b.children.first() {
        new_box.flags.leading_collapsible_space |= first.flags.leading_collapsible_space;
    }

    let mut trailing_collapsible_space = false;
    let mut children = Vec::with_capacity(b.children.len());
    for child in &b.children {
        let mut child = Arc::clone(child);
        if trailing_collapsible_space {
            Arc::make_mut(&mut child).flags.leading_collapsible_space = true;
        }
        if child.is_empty_text() {
            trailing_collapsible_space = child.flags.leading_collapsible_space;
        } else {
            trailing_collapsible_space = false;
            children.push(inline_in_block(&child));
        }
    }
    new_box.flags.trailing_collapsible_space |= trailing_collapsible_space;

    if !b.is_block_container() {
        new_box.children = children;
        return Arc::new(new_box);
    }

    let mut line_children: Vec<BoxRef> = Vec::new();
    let mut new_children: Vec<BoxRef> = Vec::new();
    for child in children {
        assert!(
            !matches!(child.kind, BoxKind::Line),
            "line box found before inline-in-block wrapping"
        );
        if !line_children.is_empty() && child.is_absolutely_positioned() {
            line_children.push(child);
        } else if child.is_inline_level() || (!line_children.is_empty() && child.is_floated()) {
            // A collapsed space at the start of a line would be removed by
            // line layout anyway.
            let collapsed_space = child.text() == Some(" ") && child.style.white_space.collapses_spaces();
            if !line_children.is_empty() || !collapsed_space {
                line_children.push(child);
            }
        } else {
            if !line_children.is_empty() {
                let line = LayoutBox::anonymous_from(&new_box, BoxKind::Line, mem::take(&mut line_children));
                new_children.push(anonymous_block(&new_box, Arc::new(line)));
            }
            new_children.push(child);
        }
    }

    if !line_children.is_empty() {
        let line = Arc::new(LayoutBox::anonymous_from(&new_box, BoxKind::Line, line_children));
        if new_children.is_empty() {
            new_children.push(line);
        } else {
            new_children.push(anonymous_block(&new_box, line));
        }
    }

    new_box.children = new_children;
    Arc::new(new_box)
}

fn anonymous_block(parent: &LayoutBox, line: BoxRef) -> BoxRef {
    Arc::new(LayoutBox::anonymous_from(parent, BoxKind::Block, vec![line]))
}

/// [§ 9.2.1.1](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
///
/// "When an inline box contains an in-flow block-level box, the inline box
/// (and its inline ancestors within the same line box) are broken around
/// the block-level box (and any block-level siblings that are consecutive
/// or separated only by collapsible whitespace and/or out-of-flow
/// elements), splitting the inline box into two boxes (even if either side
/// is empty), one on each side of the block-level box(es). The line boxes
/// before the break and after the break are enclosed in anonymous block
/// boxes, and the block-level box becomes a sibling of those anonymous
/// boxes."
///
/// ```text
/// Block[Line[Inline[Text("a"), Block[..], Text("b")]]]
///   => Block[Block[Line[Inline[Text("a")]]], Block[..], Block[Line[Inline[Text("b")]]]]
/// ```
///
/// # Panics
///
/// Panics if a Line box has siblings, which means [`inline_in_block`] did
/// not run first.
#[must_use]
pub fn block_in_inline(b: &BoxRef) -> BoxRef {
    if !b.is_parent() {
        return Arc::clone(b);
    }

    let mut new_children: Vec<BoxRef> = Vec::with_capacity(b.children.len());
    let mut changed = false;
    for child in &b.children {
        let new_child = if matches!(child.kind, BoxKind::Line) {
            assert_eq!(b.children.len(), 1, "line boxes should have no siblings at this stage");

            let mut skip_stack = Vec::new();
            let new_line = loop {
                let (new_line, block, resume_at) = split_at_block(child, &skip_stack);
                let Some(block) = block else {
                    break new_line;
                };
                new_children.push(anonymous_block(b, new_line));
                new_children.push(block_in_inline(&block));
                skip_stack = resume_at;
            };

            if new_children.is_empty() {
                // Keep the single line box without an anonymous block.
                new_line
            } else {
                anonymous_block(b, new_line)
            }
        } else {
            block_in_inline(child)
        };

        changed |= !Arc::ptr_eq(&new_child, child);
        new_children.push(new_child);
    }

    if changed {
        Arc::new(b.with_children(new_children))
    } else {
        Arc::clone(b)
    }
}

/// Find the next in-flow block-level box inside the inline content of `b`.
///
/// `skip_stack` holds one child index per nesting level telling where to
/// resume; empty means from the start. Returns the content of `b` before
/// the block, the block if one was found, and the skip stack that resumes
/// right after it.
fn split_at_block(b: &BoxRef, skip_stack: &[usize]) -> (BoxRef, Option<BoxRef>, Vec<usize>) {
    let (skip, mut nested_skip): (usize, &[usize]) = match skip_stack.split_first() {
        Some((&skip, rest)) => (skip, rest),
        None => (0, &[]),
    };

    let mut new_children: Vec<BoxRef> = Vec::new();
    let mut changed = false;
    for (index, child) in b.children.iter().enumerate().skip(skip) {
        if child.is_block_level() && child.is_in_normal_flow() {
            assert!(nested_skip.is_empty(), "cannot resume inside a block-level box");
            let before = Arc::new(b.with_children(new_children));
            return (before, Some(Arc::clone(child)), vec![index + 1]);
        }

        let new_child = if matches!(child.kind, BoxKind::Inline) {
            let (new_child, block, resume_at) = split_at_block(child, nested_skip);
            nested_skip = &[];
            if let Some(block) = block {
                new_children.push(new_child);
                let before = Arc::new(b.with_children(new_children));
                let mut resume = vec![index];
                resume.extend(resume_at);
                return (before, Some(block), resume);
            }
            new_child
        } else {
            assert!(nested_skip.is_empty(), "cannot resume inside a non-inline box");
            block_in_inline(child)
        };

        changed |= !Arc::ptr_eq(&new_child, child);
        new_children.push(new_child);
    }

    if changed || skip > 0 {
        (Arc::new(b.with_children(new_children)), None, Vec::new())
    } else {
        (Arc::clone(b), None, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{ComputedStyle, Display};

    fn styled(kind: BoxKind, display: Display, children: Vec<BoxRef>) -> BoxRef {
        let style = ComputedStyle {
            display,
            ..ComputedStyle::default()
        };
        Arc::new(LayoutBox::new(kind, "x", None, Arc::new(style), children))
    }

    fn text(value: &str) -> BoxRef {
        styled(BoxKind::Text(value.to_owned()), Display::inline(), Vec::new())
    }

    #[test]
    fn test_resume_stack_points_after_nested_block() {
        let block = styled(BoxKind::Block, Display::block(), vec![text("b")]);
        let inline = styled(BoxKind::Inline, Display::inline(), vec![text("a"), block, text("c")]);
        let line = styled(BoxKind::Line, Display::inline(), vec![text("0"), inline]);

        let (before, found, resume) = split_at_block(&line, &[]);
        assert!(found.is_some());
        assert_eq!(resume, vec![1, 2], "child 1 of the line, then after the block");
        assert_eq!(before.children.len(), 2);
        assert_eq!(before.children[1].children.len(), 1);

        let (after, found, resume) = split_at_block(&line, &resume);
        assert!(found.is_none());
        assert!(resume.is_empty());
        assert_eq!(after.children.len(), 1, "only the split inline remains");
        assert_eq!(after.children[0].children[0].text(), Some("c"));
    }
}
